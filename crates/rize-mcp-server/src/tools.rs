//! The tool catalog
//!
//! Every tool is a struct carrying its [`Tool`] descriptor and a handle on the Rize client.
//! [`ToolName`] is the registry: names are parsed once, then dispatched with an exhaustive match.

pub mod create_project;
pub mod create_session;
pub mod get_current_session;
pub mod list_projects;
pub mod start_session_timer;
pub mod stop_session_timer;
pub mod test_connection;

use std::fmt;
use std::str::FromStr;

use rize_client::RizeClient;
use rmcp::model::{JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::format::strip_emoji;
use create_project::{CREATE_PROJECT_TOOL_NAME, CreateProject};
use create_session::{CREATE_SESSION_TOOL_NAME, CreateSession};
use get_current_session::{GET_CURRENT_SESSION_TOOL_NAME, GetCurrentSession};
use list_projects::{LIST_PROJECTS_TOOL_NAME, ListProjects};
use start_session_timer::{START_SESSION_TIMER_TOOL_NAME, StartSessionTimer};
use stop_session_timer::{STOP_SESSION_TIMER_TOOL_NAME, StopSessionTimer};
use test_connection::{TEST_CONNECTION_TOOL_NAME, TestConnection};

/// Names of the tools exposed by this server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    TestConnection,
    ListProjects,
    CreateProject,
    StartSessionTimer,
    StopSessionTimer,
    GetCurrentSession,
    CreateSession,
}

impl ToolName {
    /// Every tool, in the order they are listed to clients
    pub const ALL: [ToolName; 7] = [
        ToolName::TestConnection,
        ToolName::ListProjects,
        ToolName::CreateProject,
        ToolName::StartSessionTimer,
        ToolName::StopSessionTimer,
        ToolName::GetCurrentSession,
        ToolName::CreateSession,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::TestConnection => TEST_CONNECTION_TOOL_NAME,
            ToolName::ListProjects => LIST_PROJECTS_TOOL_NAME,
            ToolName::CreateProject => CREATE_PROJECT_TOOL_NAME,
            ToolName::StartSessionTimer => START_SESSION_TIMER_TOOL_NAME,
            ToolName::StopSessionTimer => STOP_SESSION_TIMER_TOOL_NAME,
            ToolName::GetCurrentSession => GET_CURRENT_SESSION_TOOL_NAME,
            ToolName::CreateSession => CREATE_SESSION_TOOL_NAME,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool name that is not part of the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| UnknownTool(name.to_string()))
    }
}

/// All tools, bound to one Rize client
#[derive(Clone)]
pub struct Toolbox {
    test_connection: TestConnection,
    list_projects: ListProjects,
    create_project: CreateProject,
    start_session_timer: StartSessionTimer,
    stop_session_timer: StopSessionTimer,
    get_current_session: GetCurrentSession,
    create_session: CreateSession,
}

impl Toolbox {
    pub fn new(client: RizeClient) -> Self {
        Self {
            test_connection: TestConnection::new(client.clone()),
            list_projects: ListProjects::new(client.clone()),
            create_project: CreateProject::new(client.clone()),
            start_session_timer: StartSessionTimer::new(client.clone()),
            stop_session_timer: StopSessionTimer::new(client.clone()),
            get_current_session: GetCurrentSession::new(client.clone()),
            create_session: CreateSession::new(client),
        }
    }

    /// Descriptors for every tool in the catalog
    pub fn list(&self) -> Vec<Tool> {
        ToolName::ALL
            .iter()
            .map(|name| self.descriptor(*name).clone())
            .collect()
    }

    fn descriptor(&self, name: ToolName) -> &Tool {
        match name {
            ToolName::TestConnection => &self.test_connection.tool,
            ToolName::ListProjects => &self.list_projects.tool,
            ToolName::CreateProject => &self.create_project.tool,
            ToolName::StartSessionTimer => &self.start_session_timer.tool,
            ToolName::StopSessionTimer => &self.stop_session_timer.tool,
            ToolName::GetCurrentSession => &self.get_current_session.tool,
            ToolName::CreateSession => &self.create_session.tool,
        }
    }

    /// Run the named tool and return its text output.
    ///
    /// This never fails: unknown tools, bad arguments and upstream failures all come back as
    /// `[ERROR]` text.
    #[tracing::instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> String {
        let text = match name.parse::<ToolName>() {
            Ok(tool) => {
                debug!("Calling {tool}");
                self.dispatch(tool, Value::Object(arguments.unwrap_or_default()))
                    .await
                    .unwrap_or_else(|invalid| invalid)
            }
            Err(unknown) => {
                warn!("{unknown}");
                format!("[ERROR] {unknown}")
            }
        };
        strip_emoji(&text)
    }

    async fn dispatch(&self, tool: ToolName, arguments: Value) -> Result<String, String> {
        Ok(match tool {
            ToolName::TestConnection => self.test_connection.execute().await,
            ToolName::ListProjects => {
                self.list_projects
                    .execute(convert_arguments(tool, arguments)?)
                    .await
            }
            ToolName::CreateProject => {
                self.create_project
                    .execute(convert_arguments(tool, arguments)?)
                    .await
            }
            ToolName::StartSessionTimer => {
                self.start_session_timer
                    .execute(convert_arguments(tool, arguments)?)
                    .await
            }
            ToolName::StopSessionTimer => {
                self.stop_session_timer
                    .execute(convert_arguments(tool, arguments)?)
                    .await
            }
            ToolName::GetCurrentSession => self.get_current_session.execute().await,
            ToolName::CreateSession => {
                self.create_session
                    .execute(convert_arguments(tool, arguments)?)
                    .await
            }
        })
    }
}

fn convert_arguments<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T, String> {
    serde_json::from_value(arguments).map_err(|e| {
        warn!("Invalid arguments for {tool}: {e}");
        format!("[ERROR] Invalid arguments for {tool}: {e}")
    })
}

/// Text for a failed upstream call
pub(crate) fn failure(context: &str, error: &dyn fmt::Display) -> String {
    warn!("{context}: {error}");
    format!("[ERROR] {context}: {error}")
}

#[cfg(test)]
pub(crate) mod test_support {
    use rize_client::{RizeClient, SecretString};
    use url::Url;

    pub(crate) fn client_for(server: &mockito::ServerGuard) -> RizeClient {
        RizeClient::builder()
            .token(SecretString::from("rize_test_token_0123456789"))
            .endpoint(Url::parse(&format!("{}/graphql", server.url())).unwrap())
            .build()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use rstest::rstest;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::test_support::client_for;
    use super::*;

    #[rstest]
    #[case("test_connection", ToolName::TestConnection)]
    #[case("list_projects", ToolName::ListProjects)]
    #[case("create_project", ToolName::CreateProject)]
    #[case("start_session_timer", ToolName::StartSessionTimer)]
    #[case("stop_session_timer", ToolName::StopSessionTimer)]
    #[case("get_current_session", ToolName::GetCurrentSession)]
    #[case("create_session", ToolName::CreateSession)]
    fn names_round_trip(#[case] name: &str, #[case] expected: ToolName) {
        let parsed: ToolName = name.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), name);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "delete_everything".parse::<ToolName>(),
            Err(UnknownTool("delete_everything".to_string()))
        );
    }

    #[tokio::test]
    async fn lists_the_whole_catalog() {
        let server = mockito::Server::new_async().await;
        let toolbox = Toolbox::new(client_for(&server));

        let names: Vec<String> = toolbox
            .list()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        insta::assert_debug_snapshot!(names, @r#"
        [
            "test_connection",
            "list_projects",
            "create_project",
            "start_session_timer",
            "stop_session_timer",
            "get_current_session",
            "create_session",
        ]
        "#);
    }

    #[tokio::test]
    async fn every_tool_has_a_description_and_object_schema() {
        let server = mockito::Server::new_async().await;
        for tool in Toolbox::new(client_for(&server)).list() {
            assert!(tool.description.is_some_and(|d| !d.is_empty()), "{}", tool.name);
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")), "{}", tool.name);
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_as_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let text = Toolbox::new(client_for(&server))
            .invoke("delete_everything", None)
            .await;

        mock.assert_async().await;
        assert_eq!(text, "[ERROR] Unknown tool: delete_everything");
    }

    #[tokio::test]
    async fn mistyped_arguments_are_reported_as_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let arguments = json!({ "limit": "many" }).as_object().cloned();
        let text = Toolbox::new(client_for(&server))
            .invoke("list_projects", arguments)
            .await;

        mock.assert_async().await;
        assert!(
            text.starts_with("[ERROR] Invalid arguments for list_projects: "),
            "{text}"
        );
    }

    #[tokio::test]
    async fn absent_arguments_use_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "first": 10 } })))
            .with_body(r#"{"data": {"projects": {"edges": []}}}"#)
            .expect(1)
            .create_async()
            .await;

        let text = Toolbox::new(client_for(&server))
            .invoke("list_projects", None)
            .await;

        mock.assert_async().await;
        assert_eq!(text, "[INFO] No projects found. Use create_project to create one.");
    }

    #[tokio::test]
    async fn output_is_stripped_of_emoji() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_body(
                r#"{"data": {"projects": {"edges": [{"node": {"id": "p1", "name": "🚀 Launch", "emoji": "🚀"}}]}}}"#,
            )
            .create_async()
            .await;

        let text = Toolbox::new(client_for(&server))
            .invoke("list_projects", None)
            .await;

        assert_eq!(text, "[SUCCESS] Found 1 projects:\n\nLaunch (ID: p1)");
    }

    #[tokio::test]
    async fn upstream_failures_are_reported_as_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(429)
            .create_async()
            .await;

        let text = Toolbox::new(client_for(&server))
            .invoke("get_current_session", None)
            .await;

        assert_eq!(
            text,
            "[ERROR] Failed to get current session: API rate limit exceeded, try again later"
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn failures_are_logged_without_the_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(401)
            .create_async()
            .await;

        let text = Toolbox::new(client_for(&server))
            .invoke("test_connection", None)
            .await;

        assert!(text.starts_with("[ERROR] Connection failed"));
        assert!(logs_contain("Connection failed"));
        assert!(!logs_contain("rize_test_token_0123456789"));
    }
}
