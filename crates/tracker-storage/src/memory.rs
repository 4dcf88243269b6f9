//! In-memory metadata stores.
//!
//! Uses DashMap for lock-free concurrent reads, so one set of stores can be
//! shared by every request handler.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracker_core::{
    DataEntryForm, OrganisationUnit, Program, TrackedEntityAttribute, TrackedEntityType,
};

use crate::error::{StorageError, StorageResult};
use crate::traits::{
    DataEntryFormStore, OrganisationUnitStore, ProgramStore, TrackedEntityAttributeStore,
    TrackedEntityTypeStore,
};

/// Generic UID-keyed map behind every in-memory store.
#[derive(Debug)]
struct UidMap<T> {
    object_type: &'static str,
    by_uid: DashMap<String, Arc<T>>,
}

impl<T> UidMap<T> {
    fn new(object_type: &'static str) -> Self {
        Self {
            object_type,
            by_uid: DashMap::new(),
        }
    }

    fn insert(&self, uid: &str, object: T) -> StorageResult<Arc<T>> {
        if self.by_uid.contains_key(uid) {
            return Err(StorageError::already_exists(self.object_type, uid));
        }
        let object = Arc::new(object);
        self.by_uid.insert(uid.to_string(), object.clone());
        Ok(object)
    }

    fn get(&self, uid: &str) -> Option<Arc<T>> {
        self.by_uid.get(uid).map(|entry| entry.value().clone())
    }

    fn len(&self) -> usize {
        self.by_uid.len()
    }
}

macro_rules! uid_store {
    ($name:ident, $object:ty, $label:literal) => {
        #[doc = concat!("In-memory store of `", stringify!($object), "` keyed by UID.")]
        #[derive(Debug)]
        pub struct $name {
            objects: UidMap<$object>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    objects: UidMap::new($label),
                }
            }

            /// Add an object; fails if its UID is already present.
            pub fn insert(&self, object: $object) -> StorageResult<Arc<$object>> {
                let uid = object.uid.clone();
                self.objects.insert(&uid, object)
            }

            pub fn len(&self) -> usize {
                self.objects.len()
            }

            pub fn is_empty(&self) -> bool {
                self.objects.len() == 0
            }
        }
    };
}

uid_store!(
    InMemoryAttributeStore,
    TrackedEntityAttribute,
    "TrackedEntityAttribute"
);
uid_store!(InMemoryProgramStore, Program, "Program");
uid_store!(
    InMemoryTrackedEntityTypeStore,
    TrackedEntityType,
    "TrackedEntityType"
);

#[async_trait]
impl TrackedEntityAttributeStore for InMemoryAttributeStore {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<TrackedEntityAttribute>>> {
        Ok(self.objects.get(uid))
    }
}

#[async_trait]
impl ProgramStore for InMemoryProgramStore {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<Program>>> {
        Ok(self.objects.get(uid))
    }
}

#[async_trait]
impl TrackedEntityTypeStore for InMemoryTrackedEntityTypeStore {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<TrackedEntityType>>> {
        Ok(self.objects.get(uid))
    }
}

/// In-memory organisation-unit store with a parent → children index.
#[derive(Debug)]
pub struct InMemoryOrganisationUnitStore {
    objects: UidMap<OrganisationUnit>,
    children: DashMap<String, Vec<Arc<OrganisationUnit>>>,
}

impl Default for InMemoryOrganisationUnitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrganisationUnitStore {
    pub fn new() -> Self {
        Self {
            objects: UidMap::new("OrganisationUnit"),
            children: DashMap::new(),
        }
    }

    /// Add a unit; fails if its UID is already present.
    pub fn insert(&self, unit: OrganisationUnit) -> StorageResult<Arc<OrganisationUnit>> {
        let uid = unit.uid.clone();
        let unit = self.objects.insert(&uid, unit)?;
        if let Some(parent) = &unit.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(unit.clone());
        }
        Ok(unit)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.len() == 0
    }
}

#[async_trait]
impl OrganisationUnitStore for InMemoryOrganisationUnitStore {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<OrganisationUnit>>> {
        Ok(self.objects.get(uid))
    }

    async fn children(&self, uid: &str) -> StorageResult<Vec<Arc<OrganisationUnit>>> {
        Ok(self
            .children
            .get(uid)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

/// In-memory data entry form store with a name index.
#[derive(Debug)]
pub struct InMemoryDataEntryFormStore {
    objects: UidMap<DataEntryForm>,
    by_name: DashMap<String, Arc<DataEntryForm>>,
}

impl Default for InMemoryDataEntryFormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDataEntryFormStore {
    pub fn new() -> Self {
        Self {
            objects: UidMap::new("DataEntryForm"),
            by_name: DashMap::new(),
        }
    }

    /// Add a form; fails if its UID or name is already present.
    pub fn insert(&self, form: DataEntryForm) -> StorageResult<Arc<DataEntryForm>> {
        if self.by_name.contains_key(&form.name) {
            return Err(StorageError::already_exists("DataEntryForm", &form.name));
        }
        let uid = form.uid.clone();
        let form = self.objects.insert(&uid, form)?;
        self.by_name.insert(form.name.clone(), form.clone());
        Ok(form)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.len() == 0
    }
}

#[async_trait]
impl DataEntryFormStore for InMemoryDataEntryFormStore {
    async fn find_by_uid(&self, uid: &str) -> StorageResult<Option<Arc<DataEntryForm>>> {
        Ok(self.objects.get(uid))
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Option<Arc<DataEntryForm>>> {
        Ok(self.by_name.get(name).map(|entry| entry.value().clone()))
    }
}
