use rize_client::model::{Connection, Project, extract};
use rize_client::{RizeClient, RizeError};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to list projects
pub const LIST_PROJECTS_TOOL_NAME: &str = "list_projects";

const DEFAULT_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct ListProjects {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the list projects tool
#[derive(JsonSchema, Deserialize, Debug, Default)]
pub struct Input {
    /// Maximum number of projects to return
    #[schemars(range(min = 1), extend("default" = 10))]
    limit: Option<u32>,
}

impl ListProjects {
    pub fn new(client: RizeClient) -> Self {
        Self {
            client,
            tool: Tool::new(
                LIST_PROJECTS_TOOL_NAME,
                "List the projects in the Rize account with their IDs.",
                schema_from_type!(Input),
            ),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: Input) -> String {
        self.list(input.limit.unwrap_or(DEFAULT_LIMIT))
            .await
            .unwrap_or_else(|e| failure("Failed to list projects", &e))
    }

    async fn list(&self, limit: u32) -> Result<String, RizeError> {
        let response = self.client.projects(limit).await?;
        let projects = extract::<Connection<Project>>(&response, "/data/projects")?
            .map(Connection::into_nodes)
            .unwrap_or_default();

        if projects.is_empty() {
            return Ok("[INFO] No projects found. Use create_project to create one.".to_string());
        }

        let lines = projects
            .iter()
            .map(|project| format!("{} (ID: {})", project.name, project.id))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!(
            "[SUCCESS] Found {} projects:\n\n{lines}",
            projects.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use crate::tools::test_support::client_for;

    use super::*;

    #[tokio::test]
    async fn lists_one_line_per_project() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "first": 3 } })))
            .with_body(
                r#"{"data": {"projects": {"edges": [
                    {"node": {"id": "p1", "name": "Writing", "emoji": "✍️"}},
                    {"node": {"id": "p2", "name": "Admin", "emoji": null}}
                ]}}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let text = ListProjects::new(client_for(&server))
            .execute(Input { limit: Some(3) })
            .await;

        mock.assert_async().await;
        insta::assert_snapshot!(text, @r"
        [SUCCESS] Found 2 projects:

        Writing (ID: p1)
        Admin (ID: p2)
        ");
    }

    #[tokio::test]
    async fn empty_list_suggests_create_project() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_body(r#"{"data": {"projects": {"edges": []}}}"#)
            .create_async()
            .await;

        let text = ListProjects::new(client_for(&server))
            .execute(Input::default())
            .await;

        assert!(text.starts_with("[INFO]"));
        assert!(text.contains("create_project"));
    }

    #[tokio::test]
    async fn graphql_errors_are_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_body(r#"{"errors": [{"message": "Field 'projects' is unavailable"}]}"#)
            .create_async()
            .await;

        let text = ListProjects::new(client_for(&server))
            .execute(Input::default())
            .await;

        assert_eq!(
            text,
            "[ERROR] Failed to list projects: GraphQL error: Field 'projects' is unavailable"
        );
    }
}
