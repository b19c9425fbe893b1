use tokio::task::JoinError;

/// Message shown when no API token could be found at startup
const MISSING_TOKEN_HELP: &str = "No Rize API token configured. Set the RIZE_API_TOKEN environment \
    variable (or rize.api_token in the config file). A token can be generated under \
    Settings > API in the Rize web app.";

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{}", MISSING_TOKEN_HELP)]
    MissingToken,

    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Client(#[from] rize_client::RizeError),

    #[error("Failed to initialize MCP server: {0}")]
    McpInitializeError(#[from] Box<rmcp::service::ServerInitializeError>),

    #[error("Failed to start server: {0}")]
    StartupError(#[from] JoinError),
}

impl From<figment::Error> for ServerError {
    fn from(e: figment::Error) -> Self {
        ServerError::Config(Box::new(e))
    }
}

/// An MCP protocol error. Tool failures are never reported this way.
pub type McpError = rmcp::model::ErrorData;
