use std::sync::Arc;

use tracing::debug;

pub mod collector;
pub mod environment;

pub use collector::PaginationCollector;
pub use environment::set_environment;

use crate::{
    configs::{ParameterStoreConfig, StoreConfig},
    domain::{FlatMapping, HierarchyTree, PathQuery, build_hierarchy},
    error::StoreResult,
    remote::{ParameterClient, ParameterClientFactory},
};

/// Per-call retrieval flags. Every flag defaults to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalOptions {
    pub decrypt: bool,
    /// Only consulted by by-path retrieval.
    pub recursive: bool,
    /// Key results by the final path segment instead of the full name.
    pub strip_path: bool,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            decrypt: true,
            recursive: true,
            strip_path: true,
        }
    }
}

impl RetrievalOptions {
    pub fn decrypt(mut self, decrypt: bool) -> Self {
        self.decrypt = decrypt;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn strip_path(mut self, strip_path: bool) -> Self {
        self.strip_path = strip_path;
        self
    }
}

/// Read-only view over a remote parameter service.
///
/// Each call is a fresh round-trip; nothing is cached between calls.
#[derive(Clone)]
pub struct ParameterStore {
    client: Arc<dyn ParameterClient>,
    config: StoreConfig,
}

impl ParameterStore {
    pub fn new(client: Arc<dyn ParameterClient>) -> Self {
        Self::with_config(client, StoreConfig::default())
    }

    pub fn with_config(client: Arc<dyn ParameterClient>, config: StoreConfig) -> Self {
        Self { client, config }
    }

    pub async fn from_config(
        config: Arc<ParameterStoreConfig>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = ParameterClientFactory::new(Arc::clone(&config)).create().await?;
        Ok(Self::with_config(client, config.store_config))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn collector(&self) -> PaginationCollector {
        PaginationCollector::new(self.config.path_delimiter, self.config.max_pages)
    }

    /// Returns a mapping with exactly one entry.
    pub async fn get_parameter(
        &self,
        name: &str,
        options: RetrievalOptions,
    ) -> StoreResult<FlatMapping> {
        let record = self.client.get_parameter(name, options.decrypt).await?;
        Ok(FlatMapping::from([
            record.into_entry(options.strip_path, self.config.path_delimiter),
        ]))
    }

    /// Names the service does not know are left out of the result.
    pub async fn get_parameters<S: AsRef<str>>(
        &self,
        names: &[S],
        options: RetrievalOptions,
    ) -> StoreResult<FlatMapping> {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let client = self.client.as_ref();

        self.collector()
            .collect(
                |token| client.get_parameters(&names, options.decrypt, token),
                options.strip_path,
            )
            .await
    }

    pub async fn get_parameters_by_path(
        &self,
        path: &str,
        options: RetrievalOptions,
    ) -> StoreResult<FlatMapping> {
        let query = PathQuery::new(path, options.decrypt, options.recursive);
        let client = self.client.as_ref();

        self.collector()
            .collect(
                |token| client.get_parameters_by_path(&query, token),
                options.strip_path,
            )
            .await
    }

    /// Recursively fetches everything under `path` and nests it by path
    /// segment. `options.recursive` is ignored. With `strip_path` the tree is
    /// rooted at `path`, otherwise at the first segment of the full names.
    pub async fn get_parameters_with_hierarchy(
        &self,
        path: &str,
        options: RetrievalOptions,
    ) -> StoreResult<HierarchyTree> {
        let flat = self
            .get_parameters_by_path(path, options.recursive(true).strip_path(false))
            .await?;

        debug!(path, parameters = flat.len(), "Building parameter hierarchy");

        build_hierarchy(
            &flat,
            options.strip_path.then_some(path),
            self.config.path_delimiter,
        )
    }

    /// See [`environment::set_environment`].
    pub fn set_environment(mapping: &FlatMapping) {
        set_environment(mapping)
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("config", &self.config)
            .finish()
    }
}
