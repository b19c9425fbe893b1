use schemars::JsonSchema;
use serde::Deserialize;

/// Log line layout, one of the formats provided by tracing-subscriber
#[derive(Debug, Default, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// Human-readable single-line logs
    #[default]
    Full,
    /// Single-line logs tuned for short line lengths
    Compact,
    /// Newline-delimited JSON
    Json,
    /// Multi-line logs with source locations
    Pretty,
}
