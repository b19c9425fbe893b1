use std::time::Duration;

use bon::bon;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::RizeError;
use crate::model::{User, extract};
use crate::operations::{self, JsonObject, Operation};

/// The production Rize GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.rize.io/api/v1/graphql";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: &'a JsonObject,
}

/// Client for the Rize GraphQL API.
///
/// Holds no connection state: each request builds its own HTTP client and drops it when the
/// request completes.
#[derive(Clone)]
pub struct RizeClient {
    endpoint: Url,
    token: SecretString,
    timeout: Duration,
    connect_timeout: Duration,
}

impl std::fmt::Debug for RizeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RizeClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

#[bon]
impl RizeClient {
    #[builder]
    pub fn new(
        token: SecretString,
        endpoint: Option<Url>,
        #[builder(default = REQUEST_TIMEOUT)] timeout: Duration,
        #[builder(default = CONNECT_TIMEOUT)] connect_timeout: Duration,
    ) -> Result<Self, RizeError> {
        bearer_header(&token)?;
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(DEFAULT_ENDPOINT)?,
        };
        Ok(Self {
            endpoint,
            token,
            timeout,
            connect_timeout,
        })
    }
}

impl RizeClient {
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn headers(&self) -> Result<HeaderMap, RizeError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_header(&self.token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("rize-mcp/", env!("CARGO_PKG_VERSION"))),
        );
        Ok(headers)
    }

    /// Execute a raw GraphQL document.
    ///
    /// Missing variables are sent as an empty object. The full response (including `data`) is
    /// returned untouched on success.
    #[tracing::instrument(skip_all)]
    pub async fn execute_query(
        &self,
        query: &str,
        variables: Option<&JsonObject>,
    ) -> Result<Value, RizeError> {
        let empty = JsonObject::new();
        let body = RequestBody {
            query,
            variables: variables.unwrap_or(&empty),
        };

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(RizeError::from_transport)?;

        let response = http
            .post(self.endpoint.clone())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(RizeError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("Could not read the body of a failed Rize API response: {e}");
                String::new()
            });
            let error = RizeError::from_status(status, body, self.token.expose_secret());
            warn!("Rize API request failed: {error}");
            return Err(error);
        }

        let text = response.text().await.map_err(RizeError::from_transport)?;
        let result: Value = serde_json::from_str(&text)
            .map_err(|e| RizeError::InvalidResponse(format!("body is not JSON: {e}")))?;

        if let Some(errors) = result.get("errors").filter(|errors| has_errors(errors)) {
            let message = graphql_error_message(errors);
            warn!("Rize API returned GraphQL errors: {message}");
            return Err(RizeError::GraphQL(message));
        }

        Ok(result)
    }

    /// Execute one of the prepared [`operations`]
    #[tracing::instrument(skip(self, operation), fields(operation = operation.name))]
    pub async fn execute(&self, operation: &Operation) -> Result<Value, RizeError> {
        debug!("Executing {}", operation.name);
        self.execute_query(operation.query, Some(&operation.variables))
            .await
    }

    /// Check that the token works by fetching the current user's email
    pub async fn test_connection(&self) -> Result<String, RizeError> {
        let response = self.execute(&operations::test_connection()).await?;
        let email = extract::<User>(&response, "/data/currentUser")?
            .and_then(|user| user.email)
            .unwrap_or_else(|| "Unknown".to_string());
        Ok(email)
    }

    pub async fn current_user(&self) -> Result<Value, RizeError> {
        self.execute(&operations::current_user()).await
    }

    pub async fn projects(&self, limit: u32) -> Result<Value, RizeError> {
        self.execute(&operations::projects(limit)).await
    }

    pub async fn project(&self, id: &str) -> Result<Value, RizeError> {
        self.execute(&operations::project(id)).await
    }

    pub async fn create_project(
        &self,
        args: &operations::CreateProject,
    ) -> Result<Value, RizeError> {
        self.execute(&operations::create_project(args)).await
    }

    pub async fn update_project(
        &self,
        args: &operations::UpdateProject,
    ) -> Result<Value, RizeError> {
        self.execute(&operations::update_project(args)).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<Value, RizeError> {
        self.execute(&operations::delete_project(id)).await
    }

    pub async fn tasks(&self, limit: u32, project_id: Option<&str>) -> Result<Value, RizeError> {
        self.execute(&operations::tasks(limit, project_id)).await
    }

    pub async fn task(&self, id: &str) -> Result<Value, RizeError> {
        self.execute(&operations::task(id)).await
    }

    pub async fn create_task(&self, args: &operations::CreateTask) -> Result<Value, RizeError> {
        self.execute(&operations::create_task(args)).await
    }

    pub async fn update_task(&self, args: &operations::UpdateTask) -> Result<Value, RizeError> {
        self.execute(&operations::update_task(args)).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<Value, RizeError> {
        self.execute(&operations::delete_task(id)).await
    }

    pub async fn sessions(&self, limit: u32) -> Result<Value, RizeError> {
        self.execute(&operations::sessions(limit)).await
    }

    pub async fn current_session(&self) -> Result<Value, RizeError> {
        self.execute(&operations::current_session()).await
    }

    pub async fn create_session(
        &self,
        args: &operations::CreateSession,
    ) -> Result<Value, RizeError> {
        let operation = operations::create_session(args, Utc::now())?;
        self.execute(&operation).await
    }

    pub async fn update_session(
        &self,
        args: &operations::UpdateSession,
    ) -> Result<Value, RizeError> {
        self.execute(&operations::update_session(args)).await
    }

    pub async fn delete_session(&self, id: &str) -> Result<Value, RizeError> {
        self.execute(&operations::delete_session(id)).await
    }

    /// Start the session timer. The session type is not part of the upstream input.
    pub async fn start_session_timer(&self, session_type: &str) -> Result<Value, RizeError> {
        debug!(session_type, "Starting session timer");
        self.execute(&operations::start_session_timer(Utc::now()))
            .await
    }

    pub async fn stop_session_timer(&self) -> Result<Value, RizeError> {
        self.execute(&operations::stop_session_timer()).await
    }

    pub async fn extend_current_session(&self, minutes: u32) -> Result<Value, RizeError> {
        self.execute(&operations::extend_current_session(minutes))
            .await
    }
}

/// The token must be valid header text; the value is never echoed back in the error
fn bearer_header(token: &SecretString) -> Result<HeaderValue, RizeError> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| RizeError::InvalidToken)?;
    bearer.set_sensitive(true);
    Ok(bearer)
}

/// `null` and `[]` both mean the request succeeded
fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(errors) => !errors.is_empty(),
        _ => true,
    }
}

fn graphql_error_message(errors: &Value) -> String {
    match errors {
        Value::Array(errors) => errors
            .iter()
            .map(|error| {
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown error")
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
