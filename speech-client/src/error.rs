use thiserror::Error;

/// Whether a failed synthesis call is worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network trouble, timeouts, rate limits, service-side failures.
    Transient,
    /// Credential, configuration or request problems that a retry cannot fix.
    Fatal,
}

#[derive(Error, Debug, Clone)]
pub enum SpeechError {
    #[error(
        "API key not found for {provider}. Set {env_var} environment variable or add to config."
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("Authentication rejected by {provider} (HTTP {status_code}): {message}")]
    Unauthorized {
        provider: String,
        status_code: u16,
        message: String,
    },

    #[error("Rate limit exceeded{}", .retry_after.map(|s| format!(". Retry after {} seconds", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("Service error (HTTP {status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    #[error("Request rejected (HTTP {status_code}): {message}")]
    Rejected { status_code: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Refusing to synthesize empty text")]
    EmptyText,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SpeechError {
    /// Classify the error for retry decisions.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. }
            | Self::ServerError { .. }
            | Self::Timeout(_)
            | Self::Network(_) => ErrorKind::Transient,
            Self::MissingApiKey { .. }
            | Self::Unauthorized { .. }
            | Self::Rejected { .. }
            | Self::EmptyText
            | Self::ConfigError(_) => ErrorKind::Fatal,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Map a non-success HTTP status to the matching error.
    pub fn from_status(
        provider: &str,
        status_code: u16,
        message: String,
        retry_after: Option<u64>,
    ) -> Self {
        match status_code {
            401 | 403 => Self::Unauthorized {
                provider: provider.to_string(),
                status_code,
                message,
            },
            408 => Self::Timeout(message),
            429 => Self::RateLimited { retry_after },
            500..=599 => Self::ServerError {
                status_code,
                message,
            },
            _ => Self::Rejected {
                status_code,
                message,
            },
        }
    }
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_builder() {
            Self::ConfigError(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SpeechError>;
