use rize_client::RizeClient;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::logging::Logging;
use crate::errors::ServerError;

/// Configuration for the MCP server
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Rize API access
    pub rize: RizeConfig,

    /// Logging configuration
    pub logging: Logging,
}

/// Credentials and endpoint for the Rize API
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RizeConfig {
    /// Personal API token. Can also be set with `RIZE_API_TOKEN`.
    #[schemars(with = "Option<String>")]
    pub api_token: Option<SecretString>,

    /// The Rize GraphQL endpoint. Defaults to the production API.
    /// Can also be set with `RIZE_API_URL`.
    pub api_url: Option<Url>,
}

impl RizeConfig {
    /// Build an API client, failing when no usable token is configured
    pub fn client(&self) -> Result<RizeClient, ServerError> {
        let token = self
            .api_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or(ServerError::MissingToken)?;

        Ok(RizeClient::builder()
            .token(token.clone())
            .maybe_endpoint(self.api_url.clone())
            .build()?)
    }
}
