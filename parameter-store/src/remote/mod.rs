pub mod adapters;
pub mod client;
pub mod factory;

pub use client::ParameterClient;
pub use factory::ParameterClientFactory;
