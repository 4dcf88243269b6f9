//! Bulk loading of metadata into the in-memory stores.
//!
//! A snapshot is a JSON document with one array per metadata type:
//!
//! ```json
//! {
//!   "organisationUnits": [{ "uid": "ImspTQPwCqd", "name": "Sierra Leone" },
//!                         { "uid": "O6uvpzGd5pu", "name": "Bo", "parent": "ImspTQPwCqd" }],
//!   "programs": [{ "uid": "IpHINAT79UW", "name": "Child Programme" }],
//!   "trackedEntityAttributes": [{ "uid": "w75KJ2mc4zz", "name": "First name" }],
//!   "trackedEntityTypes": [{ "uid": "nEenWmSyUEp", "name": "Person" }],
//!   "users": [{ "uid": "xE7jOejl9FI", "username": "admin",
//!               "searchOrganisationUnits": ["ImspTQPwCqd"] }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracker_core::{
    DataEntryForm, OrganisationUnit, Program, TrackedEntityAttribute, TrackedEntityType, User,
};

use crate::error::{StorageError, StorageResult};
use crate::memory::{
    InMemoryAttributeStore, InMemoryDataEntryFormStore, InMemoryOrganisationUnitStore,
    InMemoryProgramStore, InMemoryTrackedEntityTypeStore,
};

/// A user entry in a snapshot, with organisation units referenced by UID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub username: String,
    #[serde(default)]
    pub search_organisation_units: Vec<String>,
    #[serde(default)]
    pub data_capture_organisation_units: Vec<String>,
}

/// Serializable set of metadata objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSnapshot {
    #[serde(default)]
    pub organisation_units: Vec<OrganisationUnit>,
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub tracked_entity_attributes: Vec<TrackedEntityAttribute>,
    #[serde(default)]
    pub tracked_entity_types: Vec<TrackedEntityType>,
    #[serde(default)]
    pub data_entry_forms: Vec<DataEntryForm>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl MetadataSnapshot {
    pub fn from_json(json: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }
}

/// The full set of in-memory stores plus the users of a snapshot.
#[derive(Debug, Default)]
pub struct MetadataStores {
    pub organisation_units: Arc<InMemoryOrganisationUnitStore>,
    pub programs: Arc<InMemoryProgramStore>,
    pub attributes: Arc<InMemoryAttributeStore>,
    pub tracked_entity_types: Arc<InMemoryTrackedEntityTypeStore>,
    pub data_entry_forms: Arc<InMemoryDataEntryFormStore>,
    users: HashMap<String, User>,
}

impl MetadataStores {
    /// Load every object of `snapshot` into fresh stores.
    ///
    /// Organisation units without a stored path get one derived from their
    /// parent chain. Fails on duplicate UIDs, unknown parents, parent cycles
    /// and users referring to unknown organisation units.
    pub fn from_snapshot(snapshot: MetadataSnapshot) -> StorageResult<Self> {
        let stores = Self::default();

        let units = with_hierarchy_paths(snapshot.organisation_units)?;
        let units_by_uid: HashMap<String, OrganisationUnit> =
            units.iter().map(|u| (u.uid.clone(), u.clone())).collect();
        for unit in units {
            stores.organisation_units.insert(unit)?;
        }
        for program in snapshot.programs {
            stores.programs.insert(program)?;
        }
        for attribute in snapshot.tracked_entity_attributes {
            stores.attributes.insert(attribute)?;
        }
        for tracked_entity_type in snapshot.tracked_entity_types {
            stores.tracked_entity_types.insert(tracked_entity_type)?;
        }
        for form in snapshot.data_entry_forms {
            stores.data_entry_forms.insert(form)?;
        }

        let mut users = HashMap::new();
        for record in snapshot.users {
            let resolve = |uids: &[String]| -> StorageResult<Vec<OrganisationUnit>> {
                uids.iter()
                    .map(|uid| {
                        units_by_uid.get(uid).cloned().ok_or_else(|| {
                            StorageError::invalid_metadata(format!(
                                "user {} refers to unknown organisation unit {uid}",
                                record.uid
                            ))
                        })
                    })
                    .collect()
            };
            let user = User::new(record.uid.clone(), record.username.clone())
                .with_search_organisation_units(resolve(&record.search_organisation_units)?)
                .with_data_capture_organisation_units(resolve(
                    &record.data_capture_organisation_units,
                )?);
            if users.insert(record.uid.clone(), user).is_some() {
                return Err(StorageError::already_exists("User", record.uid));
            }
        }

        tracing::debug!(
            organisation_units = stores.organisation_units.len(),
            programs = stores.programs.len(),
            attributes = stores.attributes.len(),
            tracked_entity_types = stores.tracked_entity_types.len(),
            data_entry_forms = stores.data_entry_forms.len(),
            users = users.len(),
            "Loaded metadata snapshot"
        );

        Ok(Self { users, ..stores })
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// A user of the snapshot by UID or username.
    pub fn user(&self, uid_or_username: &str) -> Option<&User> {
        self.users.get(uid_or_username).or_else(|| {
            self.users
                .values()
                .find(|u| u.username == uid_or_username)
        })
    }
}

fn with_hierarchy_paths(units: Vec<OrganisationUnit>) -> StorageResult<Vec<OrganisationUnit>> {
    let parents: HashMap<String, Option<String>> = units
        .iter()
        .map(|u| (u.uid.clone(), u.parent.clone()))
        .collect();

    units
        .into_iter()
        .map(|mut unit| {
            if unit.path.is_empty() {
                unit.path = derive_path(&unit.uid, &parents)?;
            }
            Ok(unit)
        })
        .collect()
}

fn derive_path(uid: &str, parents: &HashMap<String, Option<String>>) -> StorageResult<String> {
    let mut chain = vec![uid.to_string()];
    let mut current = uid.to_string();
    while let Some(parent) = parents.get(&current).cloned().flatten() {
        if !parents.contains_key(&parent) {
            return Err(StorageError::invalid_metadata(format!(
                "organisation unit {current} has unknown parent {parent}"
            )));
        }
        if chain.contains(&parent) {
            return Err(StorageError::invalid_metadata(format!(
                "organisation unit hierarchy has a cycle at {parent}"
            )));
        }
        chain.push(parent.clone());
        current = parent;
    }
    chain.reverse();
    Ok(format!("/{}", chain.join("/")))
}
