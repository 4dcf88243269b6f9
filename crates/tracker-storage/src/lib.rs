//! # tracker-storage
//!
//! Lookup stores for the metadata referenced by tracked-entity searches:
//! attributes, programs, organisation units, tracked-entity types and data
//! entry forms.
//!
//! The traits in [`traits`] are the seam the search layer depends on. The
//! in-memory implementations in [`memory`] back tests and the CLI, and can be
//! bulk-loaded from a JSON [`MetadataSnapshot`].

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{ErrorCategory, StorageError, StorageResult};
pub use memory::{
    InMemoryAttributeStore, InMemoryDataEntryFormStore, InMemoryOrganisationUnitStore,
    InMemoryProgramStore, InMemoryTrackedEntityTypeStore,
};
pub use snapshot::{MetadataSnapshot, MetadataStores, UserRecord};
pub use traits::{
    DataEntryFormStore, OrganisationUnitStore, ProgramStore, TrackedEntityAttributeStore,
    TrackedEntityTypeStore,
};
