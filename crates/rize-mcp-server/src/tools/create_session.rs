use rize_client::model::{MutationPayload, Session, extract};
use rize_client::time_window::DEFAULT_SESSION_MINUTES;
use rize_client::{RizeClient, RizeError, operations};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::or_default;
use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to record a session
pub const CREATE_SESSION_TOOL_NAME: &str = "create_session";

const DEFAULT_SESSION_TYPE: &str = "focus";
const MIN_DURATION_MINUTES: i64 = 5;
const MAX_DURATION_MINUTES: i64 = 480;

#[derive(Clone)]
pub struct CreateSession {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the create session tool
#[derive(JsonSchema, Deserialize, Serialize, Debug, Default)]
pub struct Input {
    /// Kind of session, such as focus, meeting or break
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(extend("default" = "focus"))]
    session_type: Option<String>,

    /// Title of the session
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    /// Longer description of the session
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Length of the session in minutes, used when only one of start_time and end_time is given
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 5, max = 480), extend("default" = 90))]
    duration_minutes: Option<i64>,

    /// Start of the session in UTC, e.g. `2025-07-21 14:00` or `2025-07-21T14:00:00Z`
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,

    /// End of the session in UTC, e.g. `2025-07-21 15:30` or `2025-07-21T15:30:00Z`
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
}

impl Input {
    fn start_time(&self) -> Option<&str> {
        present(self.start_time.as_deref())
    }

    fn end_time(&self) -> Option<&str> {
        present(self.end_time.as_deref())
    }

    fn title(&self) -> Option<&str> {
        present(self.title.as_deref())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

impl CreateSession {
    pub fn new(client: RizeClient) -> Self {
        Self {
            client,
            tool: Tool::new(
                CREATE_SESSION_TOOL_NAME,
                "Record a session in Rize. Give a title and at least one of start_time or \
                end_time; the other end is derived from duration_minutes. Calls with missing or \
                unusual parameters are answered with a confirmation request instead.",
                schema_from_type!(Input),
            ),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: Input) -> String {
        if let Some(confirmation) = review(&input) {
            return confirmation;
        }

        let args = operations::CreateSession::builder()
            .session_type(
                input
                    .session_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
            )
            .maybe_title(input.title().map(str::to_string))
            .maybe_description(input.description.clone())
            .duration_minutes(input.duration_minutes.unwrap_or(DEFAULT_SESSION_MINUTES))
            .maybe_start_time(input.start_time().map(str::to_string))
            .maybe_end_time(input.end_time().map(str::to_string))
            .build();

        self.create(&args)
            .await
            .unwrap_or_else(|e| failure("Failed to create session", &e))
    }

    async fn create(&self, args: &operations::CreateSession) -> Result<String, RizeError> {
        let response = self.client.create_session(args).await?;
        let payload = extract::<MutationPayload<Session>>(&response, "/data/createSession")?;

        if let Some(message) = payload.as_ref().and_then(MutationPayload::error_message) {
            return Ok(format!("[ERROR] Failed to create session: {message}"));
        }

        Ok(match payload.and_then(|payload| payload.entity) {
            Some(session) => format!(
                "[SUCCESS] Session created: {} (ID: {}, Type: {}, Duration: {} to {})",
                or_default(session.title.as_deref(), "New session"),
                session.id,
                session
                    .session_type
                    .as_deref()
                    .unwrap_or(args.session_type.as_str()),
                session.start_time.as_deref().unwrap_or_default(),
                session.end_time.as_deref().unwrap_or_default(),
            ),
            None => "[ERROR] Failed to create session: No response data".to_string(),
        })
    }
}

/// Check the arguments before anything is sent.
///
/// Returns the confirmation request when something is missing or looks off.
fn review(input: &Input) -> Option<String> {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if input.start_time().is_none() && input.end_time().is_none() {
        issues.push("Neither start_time nor end_time was given".to_string());
        suggestions.push("start_time, e.g. start_time='2025-07-21 14:00'");
        suggestions.push("or end_time, e.g. end_time='2025-07-21 15:30'");
    }

    if input.title().is_none() {
        issues.push("No session title was given".to_string());
        suggestions.push("title, e.g. title='Deep work'");
    }

    if let Some(minutes) = input.duration_minutes
        && !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes)
    {
        issues.push(format!("A duration of {minutes} minutes looks unusual"));
        suggestions.push("duration_minutes between 5 and 480");
    }

    if issues.is_empty() {
        return None;
    }

    let mut lines = vec![
        "[CONFIRM] Some details need confirming before the session is created:".to_string(),
        String::new(),
        "Issues found:".to_string(),
    ];
    lines.extend(issues.iter().map(|issue| format!("  - {issue}")));
    lines.push(String::new());
    lines.push("Suggested parameters:".to_string());
    lines.extend(suggestions.iter().map(|suggestion| format!("  - {suggestion}")));
    lines.push(String::new());
    lines.push("Current parameters:".to_string());
    lines.extend(current_parameters(input));
    lines.push(String::new());
    lines.push("Call create_session again with the missing parameters filled in.".to_string());

    Some(lines.join("\n"))
}

fn current_parameters(input: &Input) -> Vec<String> {
    let parameters = match serde_json::to_value(input) {
        Ok(Value::Object(parameters)) if !parameters.is_empty() => parameters,
        _ => return vec!["  (none)".to_string()],
    };

    parameters
        .iter()
        .map(|(key, value)| match value {
            Value::String(value) => format!("  - {key}: {value}"),
            value => format!("  - {key}: {value}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use rstest::rstest;
    use serde_json::json;

    use crate::tools::test_support::client_for;

    use super::*;

    const CREATED: &str = r#"{"data": {"createSession": {"session": {"id": "s9", "title": "Writing", "type": "focus", "startTime": "2025-07-21T09:00:00Z", "endTime": "2025-07-21T10:30:00Z"}, "errors": []}}}"#;

    async fn never_called(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn missing_everything_asks_for_confirmation() {
        let mut server = mockito::Server::new_async().await;
        let mock = never_called(&mut server).await;

        let text = CreateSession::new(client_for(&server))
            .execute(Input::default())
            .await;

        mock.assert_async().await;
        insta::assert_snapshot!(text, @r"
        [CONFIRM] Some details need confirming before the session is created:

        Issues found:
          - Neither start_time nor end_time was given
          - No session title was given

        Suggested parameters:
          - start_time, e.g. start_time='2025-07-21 14:00'
          - or end_time, e.g. end_time='2025-07-21 15:30'
          - title, e.g. title='Deep work'

        Current parameters:
          (none)

        Call create_session again with the missing parameters filled in.
        ");
    }

    #[tokio::test]
    async fn short_duration_is_flagged() {
        let mut server = mockito::Server::new_async().await;
        let mock = never_called(&mut server).await;

        let text = CreateSession::new(client_for(&server))
            .execute(Input {
                title: Some("Stretch".to_string()),
                start_time: Some("2025-07-21 09:00".to_string()),
                duration_minutes: Some(3),
                ..Default::default()
            })
            .await;

        mock.assert_async().await;
        insta::assert_snapshot!(text, @r"
        [CONFIRM] Some details need confirming before the session is created:

        Issues found:
          - A duration of 3 minutes looks unusual

        Suggested parameters:
          - duration_minutes between 5 and 480

        Current parameters:
          - duration_minutes: 3
          - start_time: 2025-07-21 09:00
          - title: Stretch

        Call create_session again with the missing parameters filled in.
        ");
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(481)]
    #[case(-30)]
    fn out_of_range_durations_are_flagged(#[case] minutes: i64) {
        let input = Input {
            title: Some("Focus".to_string()),
            end_time: Some("2025-07-21 17:00".to_string()),
            duration_minutes: Some(minutes),
            ..Default::default()
        };
        let confirmation = review(&input).unwrap();
        assert!(confirmation.contains(&format!("A duration of {minutes} minutes")));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(5))]
    #[case(Some(480))]
    fn acceptable_input_needs_no_confirmation(#[case] minutes: Option<i64>) {
        let input = Input {
            title: Some("Focus".to_string()),
            end_time: Some("2025-07-21 17:00".to_string()),
            duration_minutes: minutes,
            ..Default::default()
        };
        assert_eq!(review(&input), None);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let input = Input {
            title: Some("  ".to_string()),
            start_time: Some(String::new()),
            ..Default::default()
        };
        let confirmation = review(&input).unwrap();
        assert!(confirmation.contains("Neither start_time nor end_time was given"));
        assert!(confirmation.contains("No session title was given"));
    }

    #[tokio::test]
    async fn creates_session_from_start_and_duration() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "input": { "args": {
                    "startTime": "2025-07-21T09:00:00Z",
                    "endTime": "2025-07-21T10:30:00Z",
                    "title": "Writing"
                } } }
            })))
            .with_body(CREATED)
            .expect(1)
            .create_async()
            .await;

        let text = CreateSession::new(client_for(&server))
            .execute(Input {
                title: Some("Writing".to_string()),
                start_time: Some("2025-07-21 09:00".to_string()),
                ..Default::default()
            })
            .await;

        mock.assert_async().await;
        assert_eq!(
            text,
            "[SUCCESS] Session created: Writing (ID: s9, Type: focus, Duration: 2025-07-21T09:00:00Z to 2025-07-21T10:30:00Z)"
        );
    }

    #[tokio::test]
    async fn creates_session_ending_at_end_time() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "input": { "args": {
                    "startTime": "2025-07-21T16:15:00Z",
                    "endTime": "2025-07-21T17:00:00Z"
                } } }
            })))
            .with_body(CREATED)
            .expect(1)
            .create_async()
            .await;

        CreateSession::new(client_for(&server))
            .execute(Input {
                title: Some("Review".to_string()),
                end_time: Some("2025-07-21T17:00:00Z".to_string()),
                duration_minutes: Some(45),
                ..Default::default()
            })
            .await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unparseable_time_is_reported_without_a_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = never_called(&mut server).await;

        let text = CreateSession::new(client_for(&server))
            .execute(Input {
                title: Some("Review".to_string()),
                start_time: Some("tomorrow morning".to_string()),
                ..Default::default()
            })
            .await;

        mock.assert_async().await;
        assert!(
            text.starts_with("[ERROR] Failed to create session: Cannot parse time string"),
            "{text}"
        );
    }

    #[tokio::test]
    async fn payload_errors_are_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_body(
                r#"{"data": {"createSession": {"session": null, "errors": [{"message": "Overlaps an existing session"}]}}}"#,
            )
            .create_async()
            .await;

        let text = CreateSession::new(client_for(&server))
            .execute(Input {
                title: Some("Review".to_string()),
                start_time: Some("2025-07-21 09:00".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(
            text,
            "[ERROR] Failed to create session: Overlaps an existing session"
        );
    }
}
