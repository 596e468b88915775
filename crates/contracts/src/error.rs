use thiserror::Error;

/// Error taxonomy shared by the engagement service and its clients.
///
/// Every mutating operation resolves to exactly one of these; handlers map
/// them onto HTTP status codes and clients use them to decide whether an
/// optimistic update must be rolled back.
#[derive(Error, Debug)]
pub enum EngagementError {
    /// Anonymous principal attempting a mutating action.
    #[error("authentication required")]
    Unauthorized,

    /// Malformed or empty input, rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Structurally valid request that the domain rules forbid
    /// (self-follow, illegal publish-state transition).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Target record does not exist; the payload names the record kind.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Backend write/read failure. Transient; callers revert optimistic
    /// state and let the user retry.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl EngagementError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Stable machine-readable code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Validation(_) => "validation_error",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "persistence_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(EngagementError::Unauthorized.code(), "unauthorized");
        assert_eq!(EngagementError::NotFound("content").code(), "not_found");
        assert_eq!(
            EngagementError::NotFound("content").to_string(),
            "content not found"
        );
    }
}
