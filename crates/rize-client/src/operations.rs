//! Operations
//!
//! Every function here is a pure mapping from typed arguments to a GraphQL document and its
//! variables. Optional arguments are only sent when provided, so the upstream partial-update
//! mutations leave untouched fields alone.

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RizeError;
use crate::time_window::{DEFAULT_SESSION_MINUTES, SessionWindow};

/// Variables of a GraphQL request
pub type JsonObject = Map<String, Value>;

/// Default page size used by the list queries
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Default number of minutes added by [`extend_current_session`]
pub const DEFAULT_EXTEND_MINUTES: u32 = 30;

/// A GraphQL operation ready to be sent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    #[serde(skip)]
    pub name: &'static str,
    pub query: &'static str,
    pub variables: JsonObject,
}

impl Operation {
    fn new(name: &'static str, query: &'static str) -> Self {
        Self {
            name,
            query,
            variables: JsonObject::new(),
        }
    }

    fn variable(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(key.to_string(), value.into());
        self
    }

    fn input(self, input: Fields) -> Self {
        self.variable("input", Value::Object(input.0))
    }
}

/// Field collector that drops absent optional values
#[derive(Debug, Default)]
struct Fields(JsonObject);

impl Fields {
    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn with_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }
}

/// Arguments for [`create_project`]
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct CreateProject {
    pub name: String,
    pub client_id: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub time_budget: Option<i64>,
    pub time_budget_interval: Option<String>,
}

/// Arguments for [`update_project`]
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct UpdateProject {
    pub id: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub time_budget: Option<i64>,
    pub time_budget_interval: Option<String>,
}

/// Arguments for [`create_task`]
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct CreateTask {
    pub name: String,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub time_budget: Option<i64>,
    pub time_budget_interval: Option<String>,
}

/// Arguments for [`update_task`]
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct UpdateTask {
    pub id: String,
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub time_budget: Option<i64>,
    pub time_budget_interval: Option<String>,
}

/// Arguments for [`create_session`]
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct CreateSession {
    /// Accepted for parity with the timer tools; the upstream mutation has no type field
    #[builder(default = "focus".to_string())]
    pub session_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[builder(default = DEFAULT_SESSION_MINUTES)]
    pub duration_minutes: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Arguments for [`update_session`]
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct UpdateSession {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub fn test_connection() -> Operation {
    Operation::new(
        "TestConnection",
        include_str!("operations/test_connection.graphql"),
    )
}

pub fn current_user() -> Operation {
    Operation::new("GetCurrentUser", include_str!("operations/current_user.graphql"))
}

pub fn projects(limit: u32) -> Operation {
    Operation::new("GetProjects", include_str!("operations/projects.graphql"))
        .variable("first", limit)
}

pub fn project(id: &str) -> Operation {
    Operation::new("GetProject", include_str!("operations/project.graphql")).variable("id", id)
}

pub fn create_project(args: &CreateProject) -> Operation {
    Operation::new("CreateProject", include_str!("operations/create_project.graphql")).input(
        Fields::default()
            .with("name", args.name.as_str())
            .with_opt("clientId", args.client_id.as_deref())
            .with_opt("color", args.color.as_deref())
            .with_opt("emoji", args.emoji.as_deref())
            .with_opt("timeBudget", args.time_budget)
            .with_opt("timeBudgetInterval", args.time_budget_interval.as_deref()),
    )
}

pub fn update_project(args: &UpdateProject) -> Operation {
    Operation::new("UpdateProject", include_str!("operations/update_project.graphql")).input(
        Fields::default()
            .with("id", args.id.as_str())
            .with_opt("name", args.name.as_deref())
            .with_opt("color", args.color.as_deref())
            .with_opt("emoji", args.emoji.as_deref())
            .with_opt("timeBudget", args.time_budget)
            .with_opt("timeBudgetInterval", args.time_budget_interval.as_deref()),
    )
}

pub fn delete_project(id: &str) -> Operation {
    Operation::new("DeleteProject", include_str!("operations/delete_project.graphql"))
        .input(Fields::default().with("id", id))
}

pub fn tasks(limit: u32, project_id: Option<&str>) -> Operation {
    let operation = Operation::new("GetTasks", include_str!("operations/tasks.graphql"))
        .variable("first", limit);
    match project_id {
        Some(project_id) => operation.variable("projectId", project_id),
        None => operation,
    }
}

pub fn task(id: &str) -> Operation {
    Operation::new("GetTask", include_str!("operations/task.graphql")).variable("id", id)
}

pub fn create_task(args: &CreateTask) -> Operation {
    Operation::new("CreateTask", include_str!("operations/create_task.graphql")).input(
        Fields::default()
            .with("name", args.name.as_str())
            .with_opt("projectId", args.project_id.as_deref())
            .with_opt("assigneeId", args.assignee_id.as_deref())
            .with_opt("color", args.color.as_deref())
            .with_opt("emoji", args.emoji.as_deref())
            .with_opt("timeBudget", args.time_budget)
            .with_opt("timeBudgetInterval", args.time_budget_interval.as_deref()),
    )
}

pub fn update_task(args: &UpdateTask) -> Operation {
    Operation::new("UpdateTask", include_str!("operations/update_task.graphql")).input(
        Fields::default()
            .with("id", args.id.as_str())
            .with_opt("name", args.name.as_deref())
            .with_opt("projectId", args.project_id.as_deref())
            .with_opt("assigneeId", args.assignee_id.as_deref())
            .with_opt("color", args.color.as_deref())
            .with_opt("emoji", args.emoji.as_deref())
            .with_opt("timeBudget", args.time_budget)
            .with_opt("timeBudgetInterval", args.time_budget_interval.as_deref()),
    )
}

pub fn delete_task(id: &str) -> Operation {
    Operation::new("DeleteTask", include_str!("operations/delete_task.graphql"))
        .input(Fields::default().with("id", id))
}

pub fn sessions(limit: u32) -> Operation {
    Operation::new("GetSessions", include_str!("operations/sessions.graphql"))
        .variable("first", limit)
}

pub fn current_session() -> Operation {
    Operation::new(
        "GetCurrentSession",
        include_str!("operations/current_session.graphql"),
    )
}

/// Build the create session mutation, resolving the time window against `now`.
///
/// The upstream expects the session fields wrapped in an extra `args` object inside `input`.
pub fn create_session(args: &CreateSession, now: DateTime<Utc>) -> Result<Operation, RizeError> {
    let window = SessionWindow::resolve(
        args.start_time.as_deref(),
        args.end_time.as_deref(),
        args.duration_minutes,
        now,
    )?;

    let session_args = Fields::default()
        .with("startTime", window.start_time())
        .with("endTime", window.end_time())
        .with_opt("title", args.title.as_deref())
        .with_opt("description", args.description.as_deref());

    Ok(
        Operation::new("CreateSession", include_str!("operations/create_session.graphql"))
            .input(Fields::default().with("args", Value::Object(session_args.0))),
    )
}

pub fn update_session(args: &UpdateSession) -> Operation {
    Operation::new("UpdateSession", include_str!("operations/update_session.graphql")).input(
        Fields::default()
            .with("id", args.id.as_str())
            .with_opt("title", args.title.as_deref())
            .with_opt("description", args.description.as_deref()),
    )
}

pub fn delete_session(id: &str) -> Operation {
    Operation::new("DeleteSession", include_str!("operations/delete_session.graphql"))
        .input(Fields::default().with("id", id))
}

/// The upstream timer mutation takes no session type; the input only carries a mutation id.
pub fn start_session_timer(now: DateTime<Utc>) -> Operation {
    Operation::new(
        "StartSessionTimer",
        include_str!("operations/start_session_timer.graphql"),
    )
    .input(Fields::default().with(
        "clientMutationId",
        format!("start_timer_{}", now.timestamp()),
    ))
}

/// `input` must be an empty object here, the upstream rejects `null`.
pub fn stop_session_timer() -> Operation {
    Operation::new(
        "StopSessionTimer",
        include_str!("operations/stop_session_timer.graphql"),
    )
    .input(Fields::default())
}

pub fn extend_current_session(minutes: u32) -> Operation {
    Operation::new(
        "ExtendCurrentSession",
        include_str!("operations/extend_current_session.graphql"),
    )
    .input(Fields::default().with("minutes", minutes))
}
