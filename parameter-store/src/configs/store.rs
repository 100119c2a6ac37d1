use super::{Configs, environment::parse_env_or};
use crate::{domain::DEFAULT_PATH_DELIMITER, error::ParameterStoreError};

pub const DEFAULT_MAX_PAGES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub path_delimiter: char,
    /// Upper bound on pages fetched by one paginated call.
    pub max_pages: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path_delimiter: DEFAULT_PATH_DELIMITER,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[async_trait::async_trait]
impl Configs for StoreConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let path_delimiter =
            parse_env_or("PARAMETER_STORE_PATH_DELIMITER", DEFAULT_PATH_DELIMITER)?;
        let max_pages = parse_env_or("PARAMETER_STORE_MAX_PAGES", DEFAULT_MAX_PAGES)?;

        if max_pages == 0 {
            return Err(ParameterStoreError::Configuration(
                "PARAMETER_STORE_MAX_PAGES must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(StoreConfig {
            path_delimiter,
            max_pages,
        })
    }
}
