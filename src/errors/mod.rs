//! Error types for the Omada integration.

use thiserror::Error;

/// Result type for Omada operations.
pub type OmadaResult<T> = Result<T, OmadaError>;

/// Top-level error type for the Omada integration.
#[derive(Debug, Error)]
pub enum OmadaError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The request could not be built.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// No response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response was received but is not a valid envelope.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The credential was rejected and could not be recovered.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// The controller reported a non-authentication failure.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl OmadaError {
    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        OmadaError::Configuration(ConfigurationError::InvalidConfiguration(msg.into()))
    }

    /// Creates a protocol error for a response that could not be parsed.
    pub fn protocol(path: impl Into<String>, status: u16, msg: impl Into<String>) -> Self {
        OmadaError::Protocol(ProtocolError::InvalidEnvelope {
            path: path.into(),
            status,
            message: msg.into(),
        })
    }

    /// Returns the HTTP status code if the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OmadaError::Remote(RemoteError::Status { status, .. }) => Some(*status),
            OmadaError::Protocol(ProtocolError::InvalidEnvelope { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Returns the controller `errorCode` if the error carries one.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            OmadaError::Remote(RemoteError::Code { code, .. }) => Some(*code),
            OmadaError::Authentication(AuthenticationError::CredentialsRejected {
                code, ..
            }) => Some(*code),
            _ => None,
        }
    }

    /// Returns true for credential failures.
    pub fn is_authentication(&self) -> bool {
        matches!(self, OmadaError::Authentication(_))
    }

    /// Returns true if the failure happened before any response arrived.
    ///
    /// The request engine never retries these; callers may apply their own
    /// retry policy.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OmadaError::Transport(TransportError::Network(_))
                | OmadaError::Transport(TransportError::Timeout(_))
        )
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing credentials.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Missing required setting.
    #[error("Missing setting: {0}")]
    MissingSetting(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Request building errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value is not representable.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

/// Protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The body is not an `{errorCode, msg, result}` envelope.
    #[error("Invalid envelope from {path} (HTTP {status}): {message}")]
    InvalidEnvelope {
        /// Request path.
        path: String,
        /// HTTP status of the response.
        status: u16,
        /// Parser message.
        message: String,
    },

    /// The envelope parsed but `result` does not have the expected shape.
    #[error("Unexpected result from {path}: {message}")]
    UnexpectedResult {
        /// Request path.
        path: String,
        /// Parser message.
        message: String,
    },
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The credential provider could not supply a token.
    #[error("Token unavailable: {0}")]
    TokenUnavailable(String),

    /// The token authority refused the client credentials.
    #[error("Credentials rejected (code {code}): {message}")]
    CredentialsRejected {
        /// Controller error code.
        code: i64,
        /// Controller message.
        message: String,
    },

    /// The controller kept rejecting the token after a refresh.
    #[error("Credential rejected for {path}: {reason}")]
    Rejected {
        /// Request path.
        path: String,
        /// The auth-failure signal that was observed last.
        reason: String,
    },
}

/// Errors reported by the controller that are not authentication related.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-success HTTP status.
    #[error("{path} returned HTTP {status}: {body}")]
    Status {
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Envelope with a non-zero `errorCode`.
    #[error("{path} returned error code {code}: {message}")]
    Code {
        /// Request path.
        path: String,
        /// Controller error code.
        code: i64,
        /// Controller message, empty when absent.
        message: String,
    },
}
