//! Detection of "your token is stale" responses.
//!
//! The controller reports token expiry through two channels that do not
//! always agree: a numeric `errorCode` and the free-text `msg`. Both are
//! checked here and nowhere else.
//!
//! The phrase list is a heuristic over server wording. If the controller
//! rewords its messages, detection fails closed: the response surfaces as
//! an ordinary remote error instead of triggering a token refresh.

use crate::types::Envelope;
use std::fmt;

/// Controller error codes meaning the presented token can no longer be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureCode {
    /// The access token has expired.
    AccessTokenExpired,
    /// The access token is not recognised.
    AccessTokenInvalid,
    /// The refresh token has expired.
    RefreshTokenExpired,
    /// The refresh token is not recognised.
    RefreshTokenInvalid,
}

impl AuthFailureCode {
    /// Every known code.
    pub const ALL: [AuthFailureCode; 4] = [
        AuthFailureCode::AccessTokenExpired,
        AuthFailureCode::AccessTokenInvalid,
        AuthFailureCode::RefreshTokenExpired,
        AuthFailureCode::RefreshTokenInvalid,
    ];

    /// The numeric `errorCode`.
    pub fn code(self) -> i64 {
        match self {
            AuthFailureCode::AccessTokenExpired => -44112,
            AuthFailureCode::AccessTokenInvalid => -44113,
            AuthFailureCode::RefreshTokenExpired => -44114,
            AuthFailureCode::RefreshTokenInvalid => -44116,
        }
    }

    /// Looks up a numeric `errorCode`.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.code() == code)
    }
}

/// Lower-case phrases in `msg` that indicate an expired or rejected token.
pub const EXPIRY_PHRASES: &[&str] = &[
    "access token has expired",
    "access token is invalid",
    "token has expired",
    "token expired",
    "invalid access token",
    "re-authenticate",
    "login again",
];

/// Why a response was classified as an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    /// A known `errorCode`.
    Code(AuthFailureCode),
    /// `msg` contained one of [`EXPIRY_PHRASES`].
    Message(&'static str),
    /// HTTP 401 whose body was not an envelope.
    Unauthorized,
}

impl fmt::Display for AuthSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthSignal::Code(code) => write!(f, "error code {} ({:?})", code.code(), code),
            AuthSignal::Message(phrase) => write!(f, "message matched \"{}\"", phrase),
            AuthSignal::Unauthorized => f.write_str("HTTP 401 without envelope"),
        }
    }
}

/// Classifies a parsed envelope. The error code is checked before the message.
pub fn detect<T>(envelope: &Envelope<T>) -> Option<AuthSignal> {
    if let Some(code) = AuthFailureCode::from_code(envelope.error_code) {
        return Some(AuthSignal::Code(code));
    }
    envelope
        .msg
        .as_deref()
        .and_then(match_phrase)
        .map(AuthSignal::Message)
}

/// Returns the first expiry phrase contained in `msg`, ignoring case.
pub fn match_phrase(msg: &str) -> Option<&'static str> {
    let msg = msg.to_lowercase();
    EXPIRY_PHRASES
        .iter()
        .copied()
        .find(|phrase| msg.contains(phrase))
}
