//! Lookup traits for the metadata a tracked-entity search refers to.
//!
//! Every lookup is read-only. A UID that does not exist yields `Ok(None)`;
//! `Err` is reserved for failures of the backend itself.

use std::sync::Arc;

use async_trait::async_trait;
use tracker_core::{
    DataEntryForm, OrganisationUnit, Program, TrackedEntityAttribute, TrackedEntityType,
};

use crate::error::StorageResult;

/// Lookup of tracked-entity attribute definitions.
///
/// # Example
///
/// ```ignore
/// use tracker_storage::{StorageResult, TrackedEntityAttributeStore};
///
/// async fn attribute_name(store: &dyn TrackedEntityAttributeStore, uid: &str) -> StorageResult<Option<String>> {
///     Ok(store.find_by_uid(uid).await?.map(|a| a.name.clone()))
/// }
/// ```
#[async_trait]
pub trait TrackedEntityAttributeStore: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<TrackedEntityAttribute>>>;
}

/// Lookup of tracker programs.
#[async_trait]
pub trait ProgramStore: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<Program>>>;
}

/// Lookup of organisation units and their hierarchy.
#[async_trait]
pub trait OrganisationUnitStore: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<OrganisationUnit>>>;

    /// Immediate children of the unit with the given UID.
    async fn children(&self, uid: &str) -> StorageResult<Vec<Arc<OrganisationUnit>>>;
}

/// Lookup of tracked-entity types.
#[async_trait]
pub trait TrackedEntityTypeStore: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<TrackedEntityType>>>;
}

/// Lookup of custom data entry forms.
#[async_trait]
pub trait DataEntryFormStore: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<DataEntryForm>>>;

    /// The form with exactly this name, if any.
    async fn find_by_name(&self, name: &str) -> StorageResult<Option<Arc<DataEntryForm>>>;
}
