// Error handling module
// Defines the client error taxonomy shared by all services

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Per-field validation messages, keyed by form field name.
///
/// Validation runs locally and synchronously; a non-empty map means the
/// submit was rejected before any network call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return `Err(Error::Validation)` if any field failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by the PolicyPulse client
#[derive(Error, Debug)]
pub enum Error {
    /// Local form validation failed; nothing was sent
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The session could not be refreshed; credentials have been cleared
    /// and the host should navigate to the login entry point
    #[error("session expired: re-authentication required")]
    SessionExpired,

    /// Non-success response from the backend API
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, timeout, decode)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Credential store failure
    #[error("credential store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Status code for API errors, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Api {
            status: 401,
            message: "Could not validate credentials".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error: 401 - Could not validate credentials"
        );
        assert_eq!(err.status(), Some(401));

        let err = Error::SessionExpired;
        assert_eq!(
            err.to_string(),
            "session expired: re-authentication required"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_validation_errors_collect() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("email", "邮箱不能为空");
        errors.add("password", "密码长度至少8位");

        assert_eq!(errors.get("password"), Some("密码长度至少8位"));
        assert!(errors.get("code").is_none());

        match errors.into_result() {
            Err(Error::Validation(v)) => assert_eq!(v.0.len(), 2),
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }
}
