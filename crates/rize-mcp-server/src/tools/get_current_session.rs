use rize_client::model::{Session, extract};
use rize_client::{RizeClient, RizeError};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::format::or_default;
use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to show the running session
pub const GET_CURRENT_SESSION_TOOL_NAME: &str = "get_current_session";

#[derive(Clone)]
pub struct GetCurrentSession {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the get current session tool
#[derive(JsonSchema, Deserialize, Debug)]
pub struct Input {}

impl GetCurrentSession {
    pub fn new(client: RizeClient) -> Self {
        Self {
            client,
            tool: Tool::new(
                GET_CURRENT_SESSION_TOOL_NAME,
                "Show the session that is currently running in Rize, if any.",
                schema_from_type!(Input),
            ),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> String {
        self.describe()
            .await
            .unwrap_or_else(|e| failure("Failed to get current session", &e))
    }

    async fn describe(&self) -> Result<String, RizeError> {
        let response = self.client.current_session().await?;
        Ok(match extract::<Session>(&response, "/data/currentSession")? {
            None => "[INFO] No active session. Use start_session_timer to begin one.".to_string(),
            Some(session) => format!(
                "[SUCCESS] Active session: {} (ID: {}, Type: {}, Started: {})",
                or_default(session.title.as_deref(), "Current session"),
                session.id,
                session.session_type.as_deref().unwrap_or_default(),
                session.start_time.as_deref().unwrap_or_default(),
            ),
        })
    }
}
