use thiserror::Error;
use tracing::debug;

/// Every failure the lookup pipeline can surface.
///
/// The set is closed on purpose: callers branch on exactly these three kinds
/// and each variant already carries its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The city name or coordinates did not resolve to a known place.
    #[error("{0}")]
    NotFound(String),

    /// The provider rejected the request: non-2xx status, or missing/invalid
    /// credentials.
    #[error("{0}")]
    Api(String),

    /// Transport-level failure, or any failure that does not already carry
    /// one of the known kinds.
    #[error("{0}")]
    Network(String),
}

impl WeatherError {
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// The user-facing message carried by any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::Api(message) | Self::Network(message) => message,
        }
    }
}

/// Transport and body-decode failures collapse into `Network` with a fixed
/// connectivity message; the underlying cause is only logged.
impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        debug!(error = %err, "transport-level failure");
        Self::Network("Masalah jaringan. Silakan periksa koneksi Anda.".to_string())
    }
}
