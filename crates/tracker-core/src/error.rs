use thiserror::Error;

/// Core error types for tracker domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid UID: {0}")]
    InvalidUid(String),

    #[error("Invalid date: {0}")]
    InvalidDateTime(String),

    #[error("Duration is not valid: {0}")]
    InvalidDuration(String),

    #[error("Invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    #[error("Date is out of range: {0}")]
    DateOutOfRange(String),
}

impl CoreError {
    /// Create a new InvalidUid error
    pub fn invalid_uid(uid: impl Into<String>) -> Self {
        Self::InvalidUid(uid.into())
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(value: impl Into<String>) -> Self {
        Self::InvalidDateTime(value.into())
    }

    /// Create a new InvalidDuration error
    pub fn invalid_duration(value: impl Into<String>) -> Self {
        Self::InvalidDuration(value.into())
    }

    /// Create a new InvalidEnumValue error for the named enumeration
    pub fn invalid_enum_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUid(_)
            | Self::InvalidDateTime(_)
            | Self::InvalidDuration(_)
            | Self::InvalidEnumValue { .. } => ErrorCategory::Validation,
            Self::DateOutOfRange(_) => ErrorCategory::Range,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Range,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Range => write!(f, "range"),
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::invalid_uid("x").to_string(), "Invalid UID: x");
        assert_eq!(
            CoreError::invalid_duration("20").to_string(),
            "Duration is not valid: 20"
        );
        assert_eq!(
            CoreError::invalid_enum_value("ouMode", "UP").to_string(),
            "Invalid ouMode value: UP"
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            CoreError::invalid_date_time("bad").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            CoreError::DateOutOfRange("9999-12-31".into()).category(),
            ErrorCategory::Range
        );
        assert_eq!(ErrorCategory::Range.to_string(), "range");
    }
}
