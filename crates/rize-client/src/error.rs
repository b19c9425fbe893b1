use reqwest::StatusCode;

/// Broad class of a [`RizeError`], used by callers that only care about how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    Authentication,
    RateLimit,
    Http,
    GraphQL,
    Format,
}

/// A classified failure from the Rize API boundary
#[derive(Debug, thiserror::Error)]
pub enum RizeError {
    #[error("Connection to the Rize API timed out, check your network connection")]
    Timeout,

    #[error("Network request failed: {0}")]
    Network(reqwest::Error),

    #[error("Rize server error ({})", status.as_u16())]
    Server { status: StatusCode },

    #[error(
        "API authentication failed, check that the token is correct (current token: {redacted_token})"
    )]
    Unauthorized { redacted_token: String },

    #[error("API rate limit exceeded, try again later")]
    RateLimited,

    #[error("HTTP error {}: {body}", status.as_u16())]
    Http { status: StatusCode, body: String },

    #[error("GraphQL error: {0}")]
    GraphQL(String),

    #[error("Invalid response from the Rize API: {0}")]
    InvalidResponse(String),

    #[error("Cannot parse time string: {0}")]
    TimeFormat(String),

    #[error("Session duration of {0} minutes is out of range")]
    DurationOutOfRange(i64),

    #[error("The API token contains characters that cannot be sent in an HTTP header")]
    InvalidToken,

    #[error("Invalid Rize API URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl RizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RizeError::Timeout | RizeError::Network(_) | RizeError::Server { .. } => {
                ErrorKind::Connectivity
            }
            RizeError::Unauthorized { .. } => ErrorKind::Authentication,
            RizeError::RateLimited => ErrorKind::RateLimit,
            RizeError::Http { .. } => ErrorKind::Http,
            RizeError::GraphQL(_) => ErrorKind::GraphQL,
            RizeError::InvalidResponse(_)
            | RizeError::TimeFormat(_)
            | RizeError::DurationOutOfRange(_)
            | RizeError::InvalidToken
            | RizeError::InvalidEndpoint(_) => ErrorKind::Format,
        }
    }

    /// Returns `true` if the caller may reasonably try the same request again later.
    ///
    /// Nothing in this crate retries; this only informs the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Connectivity | ErrorKind::RateLimit)
    }

    /// Classify a transport-level failure from reqwest
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RizeError::Timeout
        } else {
            RizeError::Network(error)
        }
    }

    /// Classify a non-2xx response
    pub(crate) fn from_status(status: StatusCode, body: String, token: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => RizeError::Unauthorized {
                redacted_token: redact_token(token),
            },
            StatusCode::TOO_MANY_REQUESTS => RizeError::RateLimited,
            status if status.is_server_error() => RizeError::Server { status },
            status => RizeError::Http { status, body },
        }
    }
}

/// Show only the first 8 and last 4 characters of a token.
///
/// Tokens shorter than 12 characters would leak most of their content this way, so they are
/// fully masked instead.
pub fn redact_token(token: &str) -> String {
    let count = token.chars().count();
    if count < 12 {
        return "***".to_string();
    }
    let head: String = token.chars().take(8).collect();
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{head}...{tail}")
}
