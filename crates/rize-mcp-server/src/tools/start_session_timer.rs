use rize_client::model::{MutationPayload, Session, extract};
use rize_client::{RizeClient, RizeError};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to start the session timer
pub const START_SESSION_TIMER_TOOL_NAME: &str = "start_session_timer";

const DEFAULT_SESSION_TYPE: &str = "FOCUS";

#[derive(Clone)]
pub struct StartSessionTimer {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the start session timer tool
#[derive(JsonSchema, Deserialize, Debug, Default)]
pub struct Input {
    /// Kind of session, such as FOCUS, MEETING or BREAK
    #[schemars(extend("default" = "FOCUS"))]
    session_type: Option<String>,
}

impl StartSessionTimer {
    pub fn new(client: RizeClient) -> Self {
        Self {
            client,
            tool: Tool::new(
                START_SESSION_TIMER_TOOL_NAME,
                "Start the Rize session timer now.",
                schema_from_type!(Input),
            ),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: Input) -> String {
        let session_type = input
            .session_type
            .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string());
        self.start(&session_type)
            .await
            .unwrap_or_else(|e| failure("Failed to start timer", &e))
    }

    async fn start(&self, session_type: &str) -> Result<String, RizeError> {
        let response = self.client.start_session_timer(session_type).await?;
        let payload = extract::<MutationPayload<Session>>(&response, "/data/startSessionTimer")?;

        if let Some(message) = payload.as_ref().and_then(MutationPayload::error_message) {
            return Ok(format!("[ERROR] Failed to start timer: {message}"));
        }

        Ok(match payload.and_then(|payload| payload.entity) {
            Some(session) => format!(
                "[SUCCESS] Timer started! Session ID: {}, Start time: {}",
                session.id,
                session.start_time.unwrap_or_default()
            ),
            None => "[ERROR] Failed to start timer: No response data".to_string(),
        })
    }
}
