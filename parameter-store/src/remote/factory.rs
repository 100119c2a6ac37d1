use std::sync::Arc;

use tracing::info;

use crate::{
    configs::{ClientBackend, ParameterStoreConfig},
    remote::{
        adapters::{InMemoryParameterClient, SsmParameterClient},
        client::ParameterClient,
    },
};

pub struct ParameterClientFactory {
    config: Arc<ParameterStoreConfig>,
}

impl ParameterClientFactory {
    pub fn new(config: Arc<ParameterStoreConfig>) -> Self {
        Self { config }
    }

    pub async fn create(
        &self,
    ) -> Result<Arc<dyn ParameterClient>, Box<dyn std::error::Error + Send + Sync>> {
        let client: Arc<dyn ParameterClient> = match self.config.client_config.backend {
            ClientBackend::Ssm => {
                let ssm_config = self.config.client_config.ssm_client_config.clone();
                let ssm = SsmParameterClient::new(ssm_config).await?;
                info!("Using SSM Parameter Store backend");
                Arc::new(ssm)
            }
            ClientBackend::File => {
                let path = &self.config.client_config.file_client_config.path;
                let in_memory = InMemoryParameterClient::from_json_file(path)?;
                info!("Using file backend from {}", path);
                Arc::new(in_memory)
            }
        };

        Ok(client)
    }
}
