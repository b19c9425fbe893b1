use rize_client::RizeClient;
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to check the API token
pub const TEST_CONNECTION_TOOL_NAME: &str = "test_connection";

#[derive(Clone)]
pub struct TestConnection {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the test connection tool
#[derive(JsonSchema, Deserialize, Debug)]
pub struct Input {}

impl TestConnection {
    pub fn new(client: RizeClient) -> Self {
        Self {
            client,
            tool: Tool::new(
                TEST_CONNECTION_TOOL_NAME,
                "Test the connection to the Rize API and show which account the token belongs to.",
                schema_from_type!(Input),
            ),
        }
    }

    #[tracing::instrument(skip(self), ret)]
    pub async fn execute(&self) -> String {
        match self.client.test_connection().await {
            Ok(email) => format!("[OK] Connection successful! User: {email}"),
            Err(e) => failure("Connection failed", &e),
        }
    }
}
