use std::future::Future;

use tracing::{debug, warn};

use crate::{
    domain::{FlatMapping, ParameterPage, ParameterRecord},
    error::{ParameterStoreError, StoreResult},
};

/// Drives a token-paginated fetch to exhaustion.
///
/// `fetch` receives `None` for the first page and the previous page's token
/// afterwards. Pages are requested one after another, never concurrently, and
/// any error aborts the whole collection.
#[derive(Debug, Clone, Copy)]
pub struct PaginationCollector {
    delimiter: char,
    max_pages: usize,
}

impl PaginationCollector {
    pub fn new(delimiter: char, max_pages: usize) -> Self {
        Self {
            delimiter,
            max_pages,
        }
    }

    pub async fn collect_pages<F, Fut>(&self, mut fetch: F) -> StoreResult<Vec<ParameterRecord>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = StoreResult<ParameterPage>>,
    {
        let mut records = Vec::new();
        let mut next_token = None;

        for page in 1..=self.max_pages {
            let (batch, token) = fetch(next_token.take()).await?.into_parts();
            records.extend(batch);

            match token {
                Some(token) => next_token = Some(token),
                None => {
                    debug!(pages = page, records = records.len(), "Pagination finished");
                    return Ok(records);
                }
            }
        }

        warn!(
            max_pages = self.max_pages,
            records = records.len(),
            "Remote service kept returning continuation tokens"
        );
        Err(ParameterStoreError::RemoteFetch(format!(
            "Pagination did not finish within {} pages",
            self.max_pages
        )))
    }

    pub async fn collect<F, Fut>(&self, fetch: F, strip_path: bool) -> StoreResult<FlatMapping>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = StoreResult<ParameterPage>>,
    {
        let records = self.collect_pages(fetch).await?;
        Ok(to_flat_mapping(records, strip_path, self.delimiter))
    }
}

/// Later records win when two of them reduce to the same key.
pub fn to_flat_mapping(
    records: Vec<ParameterRecord>,
    strip_path: bool,
    delimiter: char,
) -> FlatMapping {
    let mut mapping = FlatMapping::new();
    for record in records {
        let (key, value) = record.into_entry(strip_path, delimiter);
        if mapping.contains_key(&key) {
            debug!(key = key.as_str(), "Parameter key collision, keeping the later value");
        }
        mapping.insert(key, value);
    }
    mapping
}
