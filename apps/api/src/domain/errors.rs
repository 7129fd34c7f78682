use thiserror::Error;

/// Boxed cause carried by server errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the authentication core
///
/// Every failure is scoped to a single request. `InvalidParameter` is safe to
/// echo back to the caller; `Server` details should only be logged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("{context}: {source}")]
    Server {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl AuthError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub fn server(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Server {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Returns the rejection reason for invalid-parameter errors
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let err = AuthError::invalid("otp", "incorrect otp");
        assert_eq!(err.to_string(), "invalid otp: incorrect otp");
        assert_eq!(err.reason(), Some("incorrect otp"));
    }

    #[test]
    fn server_error_keeps_source() {
        let err = AuthError::server("unable to send otp", "gateway timeout");
        assert_eq!(err.to_string(), "unable to send otp: gateway timeout");
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.reason(), None);
    }
}
