//! Error types for zone-atlas clients.

use thiserror::Error;

/// Result type alias using AtlasError.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Primary error type for API and session operations.
#[derive(Debug, Error)]
pub enum AtlasError {
    // === Transport Errors ===
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // === Session Errors ===
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    // === Input Errors ===
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Local Errors ===
    #[error("I/O error: {0}")]
    Io(String),
}

impl AtlasError {
    /// Shorthand for a field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AtlasError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the server rejected our credentials or token.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            AtlasError::Unauthorized | AtlasError::SessionExpired => true,
            AtlasError::Status { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            AtlasError::Status { status, .. } => Some(*status),
            AtlasError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Server-provided messages are shown verbatim; everything else falls back
    /// to a generic text.
    pub fn user_message(&self) -> String {
        match self {
            AtlasError::Status { message, .. } if !message.is_empty() => message.clone(),
            AtlasError::Validation { .. } | AtlasError::Config(_) => self.to_string(),
            AtlasError::Unauthorized | AtlasError::SessionExpired => {
                "Session expirée, veuillez vous reconnecter".to_string()
            }
            _ => "Erreur serveur".to_string(),
        }
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(err: std::io::Error) -> Self {
        AtlasError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::Decode(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_detection() {
        assert!(AtlasError::Unauthorized.is_auth_failure());
        assert!(AtlasError::Status {
            status: 401,
            message: String::new()
        }
        .is_auth_failure());
        assert!(!AtlasError::Status {
            status: 500,
            message: String::new()
        }
        .is_auth_failure());
        assert!(!AtlasError::Timeout.is_auth_failure());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = AtlasError::Status {
            status: 400,
            message: "Email déjà utilisé".to_string(),
        };
        assert_eq!(err.user_message(), "Email déjà utilisé");
        assert_eq!(AtlasError::Timeout.user_message(), "Erreur serveur");
    }
}
