use thiserror::Error;

/// All errors generated in `coinwatch-data`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(
        "transport error (http_status: {http_status:?}, error_code: {error_code:?}): {message}"
    )]
    Transport {
        http_status: Option<u16>,
        error_code: Option<i64>,
        message: String,
    },

    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

impl DataError {
    /// Construct a [`DataError::Transport`] for a request that never produced a response.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport {
            http_status: None,
            error_code: None,
            message: message.into(),
        }
    }

    /// Determine if the provider explicitly rate limited the request.
    pub fn is_rate_limited(&self) -> bool {
        self.matches_code(429)
    }

    /// Determine if the provider reported an internal server error.
    pub fn is_server_error(&self) -> bool {
        self.matches_code(500)
    }

    /// Determine if the error is a connection level failure that is worth re-issuing the
    /// whole request batch for.
    ///
    /// Any response the provider actually answered (non-2xx with a status) is not retryable.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Transport {
                http_status: None,
                error_code: None,
                ..
            } => true,
            _ => false,
        }
    }

    /// Provider error code carried by the error, falling back to the HTTP status.
    pub fn code(&self) -> Option<i64> {
        match self {
            DataError::Transport {
                http_status,
                error_code,
                ..
            } => error_code.or(http_status.map(i64::from)),
            _ => None,
        }
    }

    fn matches_code(&self, code: i64) -> bool {
        match self {
            DataError::Transport {
                http_status,
                error_code,
                ..
            } => *error_code == Some(code) || http_status.map(i64::from) == Some(code),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport {
            http_status: value.status().map(|status| status.as_u16()),
            error_code: None,
            message: value.to_string(),
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Configuration(value.to_string())
    }
}
