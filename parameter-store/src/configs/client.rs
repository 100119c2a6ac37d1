use super::{
    Configs,
    environment::{env_or, optional_env},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientBackend {
    Ssm,
    File,
}

#[derive(Debug, Clone, Default)]
pub struct SsmClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FileClientConfig {
    pub is_enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ssm_client_config: SsmClientConfig,
    pub file_client_config: FileClientConfig,
    pub backend: ClientBackend,
}

fn load_client_backend() -> ClientBackend {
    match env_or("PARAMETER_STORE_BACKEND", "ssm")
        .to_lowercase()
        .as_str()
    {
        "file" | "json" => ClientBackend::File,
        _ => ClientBackend::Ssm,
    }
}

#[async_trait::async_trait]
impl Configs for SsmClientConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(SsmClientConfig {
            region: optional_env("AWS_REGION"),
            profile: optional_env("AWS_PROFILE"),
            endpoint_url: optional_env("AWS_ENDPOINT").or_else(|| optional_env("SSM_ENDPOINT")),
        })
    }
}

#[async_trait::async_trait]
impl Configs for FileClientConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if load_client_backend() == ClientBackend::File {
            Ok(FileClientConfig {
                is_enabled: true,
                path: optional_env("PARAMETER_STORE_FILE")
                    .ok_or("Missing required environment variable: PARAMETER_STORE_FILE")?,
            })
        } else {
            Ok(Default::default())
        }
    }
}

#[async_trait::async_trait]
impl Configs for ClientConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ClientConfig {
            ssm_client_config: SsmClientConfig::load().await?,
            file_client_config: FileClientConfig::load().await?,
            backend: load_client_backend(),
        })
    }
}
