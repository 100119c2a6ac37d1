use anyhow::Result as AnyResult;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::{
    Client,
    error::DisplayErrorContext,
    types::{Parameter, ParameterType},
};
use aws_types::region::Region;
use tracing::{debug, warn};

use crate::{
    configs::SsmClientConfig,
    domain::{ParameterPage, ParameterRecord, PathQuery},
    error::{ParameterStoreError, StoreResult},
    remote::client::ParameterClient,
};

/// GetParameters accepts at most this many names per request.
const GET_PARAMETERS_BATCH_SIZE: usize = 10;

/// AWS Systems Manager Parameter Store client.
///
/// Name lists longer than one GetParameters batch are served as several pages;
/// the continuation token is the offset of the next batch in the name list.
#[derive(Clone)]
pub struct SsmParameterClient {
    client: Client,
}

impl SsmParameterClient {
    pub async fn new(config: SsmClientConfig) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let shared_config = loader.load().await;

        Ok(Self::with_client(Client::new(&shared_config)))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for SsmParameterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterClient")
            .field("region", &self.client.config().region())
            .finish()
    }
}

fn record_from_parameter(parameter: &Parameter) -> StoreResult<ParameterRecord> {
    let name = parameter.name().ok_or_else(|| {
        ParameterStoreError::RemoteFetch("Response contains a parameter without a name".to_string())
    })?;
    let value = parameter.value().ok_or_else(|| {
        ParameterStoreError::RemoteFetch(format!("Parameter '{}' has no value", name))
    })?;

    Ok(match parameter.r#type() {
        Some(ParameterType::SecureString) => ParameterRecord::secret(name, value),
        _ => ParameterRecord::new(name, value),
    })
}

fn records_from_parameters(parameters: &[Parameter]) -> StoreResult<Vec<ParameterRecord>> {
    parameters.iter().map(record_from_parameter).collect()
}

fn parse_batch_offset(next_token: Option<&str>) -> StoreResult<usize> {
    next_token
        .map(|token| {
            token.parse::<usize>().map_err(|_| {
                ParameterStoreError::RemoteFetch(format!(
                    "Invalid continuation token for named parameters: '{}'",
                    token
                ))
            })
        })
        .transpose()
        .map(|offset| offset.unwrap_or(0))
}

fn next_batch_token(offset: usize, total: usize) -> Option<String> {
    let next = offset + GET_PARAMETERS_BATCH_SIZE;
    (next < total).then(|| next.to_string())
}

#[async_trait::async_trait]
impl ParameterClient for SsmParameterClient {
    async fn get_parameter(&self, name: &str, decrypt: bool) -> StoreResult<ParameterRecord> {
        debug!(name, decrypt, "Getting parameter from SSM");

        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found())
                {
                    ParameterStoreError::NotFound(name.to_string())
                } else {
                    ParameterStoreError::RemoteFetch(format!(
                        "Failed to get parameter '{}': {}",
                        name,
                        DisplayErrorContext(&err)
                    ))
                }
            })?;

        let parameter = response.parameter().ok_or_else(|| {
            ParameterStoreError::RemoteFetch(format!(
                "Response for parameter '{}' contains no parameter",
                name
            ))
        })?;

        record_from_parameter(parameter)
    }

    async fn get_parameters(
        &self,
        names: &[String],
        decrypt: bool,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage> {
        let offset = parse_batch_offset(next_token.as_deref())?;
        let batch: Vec<String> = names
            .iter()
            .skip(offset)
            .take(GET_PARAMETERS_BATCH_SIZE)
            .cloned()
            .collect();

        if batch.is_empty() {
            return Ok(ParameterPage::default());
        }

        debug!(
            offset,
            count = batch.len(),
            decrypt,
            "Getting named parameters from SSM"
        );

        let response = self
            .client
            .get_parameters()
            .set_names(Some(batch))
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(|err| {
                ParameterStoreError::RemoteFetch(format!(
                    "Failed to get parameters: {}",
                    DisplayErrorContext(&err)
                ))
            })?;

        if !response.invalid_parameters().is_empty() {
            debug!(
                missing = ?response.invalid_parameters(),
                "SSM does not know some of the requested parameters"
            );
        }

        Ok(ParameterPage::new(
            records_from_parameters(response.parameters())?,
            next_batch_token(offset, names.len()),
        ))
    }

    async fn get_parameters_by_path(
        &self,
        query: &PathQuery,
        next_token: Option<String>,
    ) -> StoreResult<ParameterPage> {
        debug!(
            path = query.path.as_str(),
            recursive = query.recursive,
            decrypt = query.decrypt,
            continued = next_token.is_some(),
            "Getting parameters by path from SSM"
        );

        let response = self
            .client
            .get_parameters_by_path()
            .path(&query.path)
            .with_decryption(query.decrypt)
            .recursive(query.recursive)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| {
                ParameterStoreError::RemoteFetch(format!(
                    "Failed to get parameters by path '{}': {}",
                    query.path,
                    DisplayErrorContext(&err)
                ))
            })?;

        let next_token = match response.next_token() {
            Some("") => {
                warn!(path = query.path.as_str(), "SSM returned an empty continuation token");
                None
            }
            token => token.map(str::to_string),
        };

        Ok(ParameterPage::new(
            records_from_parameters(response.parameters())?,
            next_token,
        ))
    }
}
