use rize_client::model::{MutationPayload, Project, extract};
use rize_client::{RizeClient, RizeError, operations};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to create a project
pub const CREATE_PROJECT_TOOL_NAME: &str = "create_project";

#[derive(Clone)]
pub struct CreateProject {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the create project tool
#[derive(JsonSchema, Deserialize, Debug)]
pub struct Input {
    /// Name of the new project
    name: Option<String>,

    /// Emoji shown next to the project in Rize
    emoji: Option<String>,
}

impl CreateProject {
    pub fn new(client: RizeClient) -> Self {
        // Kept optional when parsing so a missing name gets a dedicated message
        let mut schema = schema_from_type!(Input);
        schema.insert("required".to_string(), json!(["name"]));

        Self {
            client,
            tool: Tool::new(
                CREATE_PROJECT_TOOL_NAME,
                "Create a new project in Rize.",
                schema,
            ),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: Input) -> String {
        let Some(name) = input.name.filter(|name| !name.trim().is_empty()) else {
            return "[ERROR] Missing required parameter: name".to_string();
        };

        let args = operations::CreateProject::builder()
            .name(name)
            .maybe_emoji(input.emoji)
            .build();
        self.create(&args)
            .await
            .unwrap_or_else(|e| failure("Failed to create project", &e))
    }

    async fn create(&self, args: &operations::CreateProject) -> Result<String, RizeError> {
        let response = self.client.create_project(args).await?;
        let Some(payload) =
            extract::<MutationPayload<Project>>(&response, "/data/createProject")?
        else {
            return Ok("[ERROR] Failed to create project: No response data".to_string());
        };

        if let Some(message) = payload.error_message() {
            return Ok(format!("[ERROR] Failed to create project: {message}"));
        }

        Ok(match payload.entity {
            Some(project) => format!(
                "[SUCCESS] Project created: {} (ID: {})",
                project.name, project.id
            ),
            None => "[ERROR] Failed to create project: No response data".to_string(),
        })
    }
}
