//! Runtime utilities
//!
//! Configuration loading and logging setup used by the binaries.

mod config;
pub mod logging;

use std::path::Path;

pub use config::{Config, RizeConfig};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Prefix of the environment variables that override config file values
const ENV_PREFIX: &str = "RIZE_MCP_";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(rize_common_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment.
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(rize_common_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file_exact(yaml_path))
        .extract()
}

/// Figment provider that maps the conventional Rize variables into the nested config structure
fn rize_common_env() -> Env {
    Env::prefixed("RIZE_")
        .only(&["api_token", "api_url"])
        .map(|key| match key.to_string().to_lowercase().as_str() {
            "api_token" => "RIZE:API_TOKEN".into(),
            "api_url" => "RIZE:API_URL".into(),

            // Filtered out by `only`
            other => other.to_string().into(),
        })
        .split(":")
}
