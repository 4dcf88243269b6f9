use thiserror::Error;
use tracker_storage::StorageError;

/// A search request that cannot be turned into query parameters.
///
/// The `Display` text of each variant is the message returned to clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Attribute does not exist: {0}")]
    AttributeNotFound(String),

    #[error("Program does not exist: {0}")]
    ProgramNotFound(String),

    #[error("Tracked entity type does not exist: {0}")]
    TrackedEntityTypeNotFound(String),

    #[error("Organisation unit does not exist: {0}")]
    OrganisationUnitNotFound(String),

    #[error("Organisation unit is not part of the search scope: {0}")]
    OrganisationUnitNotInSearchScope(String),

    #[error("Assigned User uid(s) cannot be specified if selectionMode is not PROVIDED")]
    AssignedUsersWithoutProvidedMode,

    #[error("Query item or filter is invalid: {0}")]
    InvalidQueryItem(String),

    #[error("Query operator is not valid: {0}")]
    InvalidQueryOperator(String),

    #[error("Duration is not valid: {0}")]
    InvalidDuration(String),

    #[error(
        "Last updated from and/or to and last updated duration cannot be specified simultaneously"
    )]
    LastUpdatedDurationConflict,

    #[error("Page must be greater than zero")]
    InvalidPage,

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Page size must not exceed {0}")]
    PageSizeTooLarge(u32),

    #[error("Unknown search parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid value for {param}: {message}")]
    InvalidValue { param: String, message: String },
}

impl ValidationError {
    pub fn invalid_value(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            param: param.into(),
            message: message.into(),
        }
    }

    /// The UID of the missing or out-of-scope object, if this error is about one.
    pub fn uid(&self) -> Option<&str> {
        match self {
            Self::AttributeNotFound(uid)
            | Self::ProgramNotFound(uid)
            | Self::TrackedEntityTypeNotFound(uid)
            | Self::OrganisationUnitNotFound(uid)
            | Self::OrganisationUnitNotInSearchScope(uid) => Some(uid),
            _ => None,
        }
    }

    /// Returns `true` if a referenced UID does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AttributeNotFound(_)
                | Self::ProgramNotFound(_)
                | Self::TrackedEntityTypeNotFound(_)
                | Self::OrganisationUnitNotFound(_)
        )
    }

    /// Returns `true` if an existing organisation unit lies outside the user's scope.
    pub fn is_scope_violation(&self) -> bool {
        matches!(self, Self::OrganisationUnitNotInSearchScope(_))
    }
}

/// Failure of [`crate::TrackedEntityCriteriaMapper::map`].
#[derive(Debug, Error)]
pub enum MapperError {
    /// The criteria are invalid; the message is meant for the client.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lookup store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl MapperError {
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ValidationError::AttributeNotFound("missing".into()).to_string(),
            "Attribute does not exist: missing"
        );
        assert_eq!(
            ValidationError::OrganisationUnitNotInSearchScope("DiszpKrYNg8".into()).to_string(),
            "Organisation unit is not part of the search scope: DiszpKrYNg8"
        );
        assert_eq!(
            ValidationError::AssignedUsersWithoutProvidedMode.to_string(),
            "Assigned User uid(s) cannot be specified if selectionMode is not PROVIDED"
        );
    }

    #[test]
    fn not_found_and_scope_are_distinct() {
        let missing = ValidationError::OrganisationUnitNotFound("a".into());
        let outside = ValidationError::OrganisationUnitNotInSearchScope("a".into());
        assert!(missing.is_not_found() && !missing.is_scope_violation());
        assert!(outside.is_scope_violation() && !outside.is_not_found());
        assert_eq!(missing.uid(), outside.uid());
        assert_eq!(ValidationError::InvalidPage.uid(), None);
    }

    #[test]
    fn mapper_error_keeps_validation_message() {
        let err: MapperError = ValidationError::ProgramNotFound("IpHINAT79UWA".into()).into();
        assert_eq!(err.to_string(), "Program does not exist: IpHINAT79UWA");
        assert!(err.as_validation().is_some());

        let err: MapperError = StorageError::connection_error("down").into();
        assert_eq!(err.to_string(), "storage error: Connection error: down");
        assert!(err.as_validation().is_none());
    }
}
