pub mod in_memory;
pub mod ssm_client;

pub use in_memory::InMemoryParameterClient;
pub use ssm_client::SsmParameterClient;
