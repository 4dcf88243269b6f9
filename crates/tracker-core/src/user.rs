//! Authenticated users and their organisation-unit assignments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::OrganisationUnit;

/// A user as seen by tracker searches.
///
/// Only the organisation-unit assignments matter here; credentials and
/// roles live with the authentication layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub username: String,
    /// Units assigned for tracked-entity search.
    #[serde(default)]
    pub search_organisation_units: Vec<OrganisationUnit>,
    /// Units assigned for data capture.
    #[serde(default)]
    pub data_capture_organisation_units: Vec<OrganisationUnit>,
}

impl User {
    pub fn new(uid: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_search_organisation_units(mut self, units: Vec<OrganisationUnit>) -> Self {
        self.search_organisation_units = units;
        self
    }

    #[must_use]
    pub fn with_data_capture_organisation_units(mut self, units: Vec<OrganisationUnit>) -> Self {
        self.data_capture_organisation_units = units;
        self
    }

    /// Organisation units explicitly assigned to this user for tracked-entity search.
    pub fn search_organisation_units(&self) -> &[OrganisationUnit] {
        &self.search_organisation_units
    }

    /// Returns `true` if `unit` is one of the user's search units or a
    /// descendant of one.
    pub fn is_in_search_scope(&self, unit: &OrganisationUnit) -> bool {
        unit.is_descendant_of_any(&self.search_organisation_units)
    }
}

/// Access to the user making the current request.
#[async_trait]
pub trait CurrentUserService: Send + Sync {
    /// The authenticated user, or `None` for anonymous requests.
    async fn current_user(&self) -> Option<User>;
}

/// A `CurrentUserService` that always returns the same user.
#[derive(Debug, Clone, Default)]
pub struct FixedUserService {
    user: Option<User>,
}

impl FixedUserService {
    pub fn new(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl CurrentUserService for FixedUserService {
    async fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn search_scope_includes_descendants() {
        let district = OrganisationUnit::new("O6uvpzGd5pu", "Bo");
        let facility = OrganisationUnit::new("YuQRtpLP10I", "Badjia").with_parent(&district);
        let elsewhere = OrganisationUnit::new("lc3eMKXaEfw", "Bonthe");

        let user = User::new("xE7jOejl9FI", "admin")
            .with_search_organisation_units(vec![district.clone()]);

        assert!(user.is_in_search_scope(&district));
        assert!(user.is_in_search_scope(&facility));
        assert!(!user.is_in_search_scope(&elsewhere));
    }

    #[test]
    fn user_without_search_units_has_empty_scope() {
        let unit = OrganisationUnit::new("DiszpKrYNg8", "Ngelehun");
        let user = User::new("xE7jOejl9FI", "nobody");
        assert!(user.search_organisation_units().is_empty());
        assert!(!user.is_in_search_scope(&unit));
    }

    #[test]
    fn fixed_user_service() {
        let svc = FixedUserService::new(User::new("xE7jOejl9FI", "admin"));
        let user = block_on(svc.current_user()).expect("user");
        assert_eq!(user.username, "admin");
        assert!(block_on(FixedUserService::anonymous().current_user()).is_none());
    }
}
