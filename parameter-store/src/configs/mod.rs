pub mod client;
pub mod environment;
pub mod store;

pub use client::{ClientBackend, ClientConfig, FileClientConfig, SsmClientConfig};
pub use store::StoreConfig;

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug)]
pub struct ParameterStoreConfig {
    pub client_config: ClientConfig,
    pub store_config: StoreConfig,
}

#[async_trait::async_trait]
impl Configs for ParameterStoreConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            client_config: ClientConfig::load().await?,
            store_config: StoreConfig::load().await?,
        })
    }
}
