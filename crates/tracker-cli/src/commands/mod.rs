pub mod map;
pub mod metadata;
pub mod oidc;

use std::path::Path;

use anyhow::{Context, Result};
use tracker_storage::{MetadataSnapshot, MetadataStores};

/// Read a metadata snapshot and load it into in-memory stores.
pub fn load_stores(path: &Path) -> Result<MetadataStores> {
    let snapshot = MetadataSnapshot::from_file(path)
        .with_context(|| format!("failed to read metadata from {}", path.display()))?;
    MetadataStores::from_snapshot(snapshot)
        .with_context(|| format!("invalid metadata in {}", path.display()))
}
