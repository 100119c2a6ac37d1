use crate::{
    domain::{ParameterPage, ParameterRecord, PathQuery},
    error::StoreResult,
};

/// The three read primitives of the remote parameter service.
///
/// Paginated operations take the continuation token of the previous page, or
/// `None` for the first request, and return the next token alongside the
/// records. An absent token means the listing is exhausted.
#[async_trait::async_trait]
pub trait ParameterClient: Send + Sync {
    /// Fails with `NotFound` when the service does not know `name`.
    async fn get_parameter(&self, name: &str, decrypt: bool) -> StoreResult<ParameterRecord>;

    /// Names unknown to the service are omitted from the result.
    async fn get_parameters(
        &self,
        names: &[String],
        decrypt: bool,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage>;

    async fn get_parameters_by_path(
        &self,
        query: &PathQuery,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage>;
}
