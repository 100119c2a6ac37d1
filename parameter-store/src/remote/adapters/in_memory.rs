use std::collections::BTreeMap;
use std::fs;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicUsize, Ordering},
};

use tracing::{debug, info};

use crate::{
    domain::{ParameterPage, ParameterRecord, PathQuery},
    error::{ParameterStoreError, StoreResult},
    remote::client::ParameterClient,
};

/// Matches the SSM limit for GetParametersByPath responses.
pub const DEFAULT_PAGE_SIZE: usize = 10;

const HIERARCHY_SEPARATOR: char = '/';

/// Parameter service held in process memory, following SSM listing rules.
///
/// Records keep insertion order and every listing is split into pages of
/// `page_size` records with the offset of the next page as continuation token.
#[derive(Clone)]
pub struct InMemoryParameterClient {
    records: Arc<RwLock<Vec<ParameterRecord>>>,
    page_size: usize,
    requests: Arc<AtomicUsize>,
}

impl InMemoryParameterClient {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            page_size: DEFAULT_PAGE_SIZE,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_records(records: Vec<ParameterRecord>) -> Self {
        let client = Self::new();
        for record in records {
            // poisoning is impossible before the client is shared
            let _ = client.put(record);
        }
        client
    }

    /// Loads a JSON object mapping parameter names to string values.
    pub fn from_json_file(path: &str) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParameterStoreError::Configuration(format!("Failed to read file '{}': {}", path, e))
        })?;
        let parameters: BTreeMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            ParameterStoreError::Configuration(format!(
                "Failed to parse parameters from '{}': {}",
                path, e
            ))
        })?;

        info!("Loaded {} parameters from {}", parameters.len(), path);

        Ok(Self::with_records(
            parameters
                .into_iter()
                .map(|(name, value)| ParameterRecord::new(name, value))
                .collect(),
        ))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds `record`, replacing a stored record of the same name in place.
    pub fn put(&self, record: ParameterRecord) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        match records.iter_mut().find(|r| r.name() == record.name()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    /// Number of requests served so far, one per page for listings.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn paginate(
        &self,
        matching: Vec<ParameterRecord>,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage> {
        let offset = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                ParameterStoreError::RemoteFetch(format!("Invalid continuation token: '{}'", token))
            })?,
            None => 0,
        };
        let next = offset + self.page_size;
        let next_token = (next < matching.len()).then(|| next.to_string());
        let page = matching
            .into_iter()
            .skip(offset)
            .take(self.page_size)
            .collect();

        Ok(ParameterPage::new(page, next_token))
    }
}

impl Default for InMemoryParameterClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryParameterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryParameterClient")
            .field("page_size", &self.page_size)
            .field("requests", &self.request_count())
            .finish()
    }
}

fn poisoned() -> ParameterStoreError {
    ParameterStoreError::RemoteFetch("In-memory parameter table is poisoned".to_string())
}

/// SSM by-path rule: the path names a hierarchy level, `recursive` selects
/// everything below it, otherwise only its direct children.
fn matches_path(name: &str, query: &PathQuery) -> bool {
    let level = query.path.trim_end_matches(HIERARCHY_SEPARATOR);
    let Some(rest) = name
        .strip_prefix(level)
        .and_then(|rest| rest.strip_prefix(HIERARCHY_SEPARATOR))
    else {
        return false;
    };

    !rest.is_empty() && (query.recursive || !rest.contains(HIERARCHY_SEPARATOR))
}

#[async_trait::async_trait]
impl ParameterClient for InMemoryParameterClient {
    async fn get_parameter(&self, name: &str, _decrypt: bool) -> StoreResult<ParameterRecord> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().map_err(|_| poisoned())?;

        records
            .iter()
            .find(|r| r.name() == name)
            .cloned()
            .ok_or_else(|| ParameterStoreError::NotFound(name.to_string()))
    }

    async fn get_parameters(
        &self,
        names: &[String],
        _decrypt: bool,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let found: Vec<ParameterRecord> = {
            let records = self.records.read().map_err(|_| poisoned())?;
            names
                .iter()
                .filter_map(|name| records.iter().find(|r| r.name() == name).cloned())
                .collect()
        };

        debug!(
            requested = names.len(),
            found = found.len(),
            "Serving named parameters from memory"
        );

        self.paginate(found, next_token)
    }

    async fn get_parameters_by_path(
        &self,
        query: &PathQuery,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !query.path.starts_with(HIERARCHY_SEPARATOR) {
            return Err(ParameterStoreError::RemoteFetch(format!(
                "Path '{}' must start with '{}'",
                query.path, HIERARCHY_SEPARATOR
            )));
        }

        let matching: Vec<ParameterRecord> = {
            let records = self.records.read().map_err(|_| poisoned())?;
            records
                .iter()
                .filter(|r| matches_path(r.name(), query))
                .cloned()
                .collect()
        };

        self.paginate(matching, next_token)
    }
}
