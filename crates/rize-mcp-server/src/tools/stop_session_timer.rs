use rize_client::model::{MutationPayload, Session, extract};
use rize_client::{RizeClient, RizeError};
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::format::or_default;
use crate::schema_from_type;
use crate::tools::failure;

/// The name of the tool to stop the session timer
pub const STOP_SESSION_TIMER_TOOL_NAME: &str = "stop_session_timer";

#[derive(Clone)]
pub struct StopSessionTimer {
    pub tool: Tool,
    client: RizeClient,
}

/// Input for the stop session timer tool
#[derive(JsonSchema, Deserialize, Debug, Default)]
pub struct Input {
    /// Set to true to actually stop the session. Without it the active session is only shown.
    #[schemars(extend("default" = false))]
    confirm: Option<bool>,

    /// ID of the session that is expected to be active, as shown by the confirmation step.
    /// When given, nothing is stopped if a different session is now running.
    session_id: Option<String>,
}

impl StopSessionTimer {
    pub fn new(client: RizeClient) -> Self {
        Self {
            client,
            tool: Tool::new(
                STOP_SESSION_TIMER_TOOL_NAME,
                "Stop the running Rize session timer. The first call shows the active session; \
                call again with `confirm=true` and the `session_id` it reports to stop it.",
                schema_from_type!(Input),
            ),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, input: Input) -> String {
        if input.confirm.unwrap_or(false) {
            self.stop(input.session_id.as_deref())
                .await
                .unwrap_or_else(|e| failure("Failed to stop timer", &e))
        } else {
            self.ask_confirmation()
                .await
                .unwrap_or_else(|e| failure("Failed to process stop request", &e))
        }
    }

    async fn current_session(&self) -> Result<Option<Session>, RizeError> {
        let response = self.client.current_session().await?;
        extract::<Session>(&response, "/data/currentSession")
    }

    async fn ask_confirmation(&self) -> Result<String, RizeError> {
        let Some(session) = self.current_session().await? else {
            return Ok("[INFO] No active session to stop.".to_string());
        };

        Ok(format!(
            "[CONFIRM] About to stop the following session:\n\
            \n  - Session ID: {id}\
            \n  - Title: {title}\
            \n  - Start time: {start}\n\
            \nThis ends the session and records its time.\
            \nTo stop it, call stop_session_timer again with confirm=true and session_id={id}",
            id = session.id,
            title = or_default(session.title.as_deref(), "Current session"),
            start = session.start_time.as_deref().unwrap_or_default(),
        ))
    }

    async fn stop(&self, expected: Option<&str>) -> Result<String, RizeError> {
        if let Some(expected) = expected {
            match self.current_session().await? {
                Some(active) if active.id == expected => {}
                Some(active) => {
                    return Ok(format!(
                        "[ERROR] Session {expected} is no longer the active session (active: {}). \
                        Nothing was stopped.",
                        active.id
                    ));
                }
                None => {
                    return Ok(format!(
                        "[ERROR] Session {expected} is no longer active. Nothing was stopped."
                    ));
                }
            }
        }

        let response = self.client.stop_session_timer().await?;
        let payload = extract::<MutationPayload<Session>>(&response, "/data/stopSessionTimer")?;

        if let Some(message) = payload.as_ref().and_then(MutationPayload::error_message) {
            return Ok(format!("[ERROR] Failed to stop timer: {message}"));
        }

        Ok(match payload.and_then(|payload| payload.entity) {
            Some(session) => {
                info!(session_id = %session.id, "Session timer stopped");
                format!(
                    "[SUCCESS] Timer stopped! Session ID: {}, End time: {}",
                    session.id,
                    session.end_time.unwrap_or_default()
                )
            }
            None => "[ERROR] Failed to stop timer: No response data".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use crate::tools::test_support::client_for;

    use super::*;

    const CURRENT_SESSION: &str = r#"{"data": {"currentSession": {"id": "s42", "title": "Deep work", "type": "focus", "startTime": "2025-07-21T09:00:00Z"}}}"#;
    const STOPPED: &str = r#"{"data": {"stopSessionTimer": {"session": {"id": "s42", "endTime": "2025-07-21T10:30:00Z"}, "errors": []}}}"#;

    async fn mock_current_session(
        server: &mut mockito::ServerGuard,
        body: &str,
        hits: usize,
    ) -> mockito::Mock {
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("GetCurrentSession".to_string()))
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    async fn mock_stop(server: &mut mockito::ServerGuard, hits: usize) -> mockito::Mock {
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("StopSessionTimer".to_string()))
            .with_body(STOPPED)
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn without_confirm_only_shows_the_session() {
        let mut server = mockito::Server::new_async().await;
        let current = mock_current_session(&mut server, CURRENT_SESSION, 1).await;
        let stop = mock_stop(&mut server, 0).await;

        let text = StopSessionTimer::new(client_for(&server))
            .execute(Input::default())
            .await;

        current.assert_async().await;
        stop.assert_async().await;
        insta::assert_snapshot!(text, @r"
        [CONFIRM] About to stop the following session:

          - Session ID: s42
          - Title: Deep work
          - Start time: 2025-07-21T09:00:00Z

        This ends the session and records its time.
        To stop it, call stop_session_timer again with confirm=true and session_id=s42
        ");
    }

    #[tokio::test]
    async fn without_confirm_and_no_session() {
        let mut server = mockito::Server::new_async().await;
        mock_current_session(&mut server, r#"{"data": {"currentSession": null}}"#, 1).await;
        let stop = mock_stop(&mut server, 0).await;

        let text = StopSessionTimer::new(client_for(&server))
            .execute(Input {
                confirm: Some(false),
                session_id: None,
            })
            .await;

        stop.assert_async().await;
        assert_eq!(text, "[INFO] No active session to stop.");
    }

    #[tokio::test]
    async fn confirmed_stop_issues_exactly_one_mutation() {
        let mut server = mockito::Server::new_async().await;
        let stop = mock_stop(&mut server, 1).await;

        let text = StopSessionTimer::new(client_for(&server))
            .execute(Input {
                confirm: Some(true),
                session_id: None,
            })
            .await;

        stop.assert_async().await;
        assert_eq!(
            text,
            "[SUCCESS] Timer stopped! Session ID: s42, End time: 2025-07-21T10:30:00Z"
        );
    }

    #[tokio::test]
    async fn confirmed_stop_of_the_expected_session() {
        let mut server = mockito::Server::new_async().await;
        let current = mock_current_session(&mut server, CURRENT_SESSION, 1).await;
        let stop = mock_stop(&mut server, 1).await;

        let text = StopSessionTimer::new(client_for(&server))
            .execute(Input {
                confirm: Some(true),
                session_id: Some("s42".to_string()),
            })
            .await;

        current.assert_async().await;
        stop.assert_async().await;
        assert!(text.starts_with("[SUCCESS] Timer stopped! Session ID: s42"));
    }

    #[tokio::test]
    async fn confirmed_stop_of_a_replaced_session_is_refused() {
        let mut server = mockito::Server::new_async().await;
        mock_current_session(&mut server, CURRENT_SESSION, 1).await;
        let stop = mock_stop(&mut server, 0).await;

        let text = StopSessionTimer::new(client_for(&server))
            .execute(Input {
                confirm: Some(true),
                session_id: Some("s41".to_string()),
            })
            .await;

        stop.assert_async().await;
        assert_eq!(
            text,
            "[ERROR] Session s41 is no longer the active session (active: s42). Nothing was stopped."
        );
    }

    #[tokio::test]
    async fn confirmed_stop_of_a_finished_session_is_refused() {
        let mut server = mockito::Server::new_async().await;
        mock_current_session(&mut server, r#"{"data": {"currentSession": null}}"#, 1).await;
        let stop = mock_stop(&mut server, 0).await;

        let text = StopSessionTimer::new(client_for(&server))
            .execute(Input {
                confirm: Some(true),
                session_id: Some("s42".to_string()),
            })
            .await;

        stop.assert_async().await;
        assert_eq!(
            text,
            "[ERROR] Session s42 is no longer active. Nothing was stopped."
        );
    }
}
