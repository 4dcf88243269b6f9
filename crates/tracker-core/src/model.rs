//! Metadata objects referenced by tracked-entity searches.

use serde::{Deserialize, Serialize};

/// A node in the organisation-unit hierarchy.
///
/// `path` lists the UIDs from the root down to this unit, each prefixed with
/// `/` (e.g. `/ImspTQPwCqd/O6uvpzGd5pu/YuQRtpLP10I`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUnit {
    pub uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl OrganisationUnit {
    /// Create a root unit.
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        let uid = uid.into();
        Self {
            path: format!("/{uid}"),
            uid,
            name: name.into(),
            code: None,
            parent: None,
        }
    }

    /// Place this unit directly below `parent`, recomputing its path.
    #[must_use]
    pub fn with_parent(mut self, parent: &OrganisationUnit) -> Self {
        self.path = format!("{}/{}", parent.hierarchy_path(), self.uid);
        self.parent = Some(parent.uid.clone());
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The hierarchy path, falling back to `/uid` when none was stored.
    pub fn hierarchy_path(&self) -> String {
        if self.path.is_empty() {
            format!("/{}", self.uid)
        } else {
            self.path.clone()
        }
    }

    /// UIDs of this unit's ancestors followed by its own UID.
    pub fn path_uids(&self) -> Vec<String> {
        self.hierarchy_path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Depth in the hierarchy, roots are level 1.
    pub fn level(&self) -> usize {
        self.path_uids().len()
    }

    /// Returns `true` if this unit is `ancestor` or lies anywhere below it.
    pub fn is_descendant_of(&self, ancestor: &OrganisationUnit) -> bool {
        self.uid == ancestor.uid || self.path_uids().iter().any(|uid| *uid == ancestor.uid)
    }

    /// Returns `true` if this unit is any of `ancestors` or lies below one.
    pub fn is_descendant_of_any<'a>(
        &self,
        ancestors: impl IntoIterator<Item = &'a OrganisationUnit>,
    ) -> bool {
        let path = self.path_uids();
        ancestors
            .into_iter()
            .any(|a| self.uid == a.uid || path.iter().any(|uid| *uid == a.uid))
    }
}

/// A tracker program that tracked entities enroll into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracked_entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organisation_units: Vec<String>,
}

impl Program {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            tracked_entity_type: None,
            organisation_units: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tracked_entity_type(mut self, type_uid: impl Into<String>) -> Self {
        self.tracked_entity_type = Some(type_uid.into());
        self
    }

    #[must_use]
    pub fn with_organisation_units(mut self, units: Vec<String>) -> Self {
        self.organisation_units = units;
        self
    }
}

/// Attribute definition for tracked entities (e.g. first name, date of birth).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityAttribute {
    pub uid: String,
    pub name: String,
    #[serde(default = "default_value_type")]
    pub value_type: String,
    #[serde(default)]
    pub unique: bool,
}

fn default_value_type() -> String {
    "TEXT".to_string()
}

impl TrackedEntityAttribute {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            value_type: default_value_type(),
            unique: false,
        }
    }

    #[must_use]
    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    #[must_use]
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

/// Kind of tracked entity, e.g. "Person".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityType {
    pub uid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TrackedEntityType {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Custom HTML data entry form attached to a program or data set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntryForm {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub html_code: String,
}

impl DataEntryForm {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            html_code: String::new(),
        }
    }
}
