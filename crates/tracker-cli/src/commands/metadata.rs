use anyhow::Result;

use crate::cli::MetadataArgs;
use crate::commands::load_stores;
use crate::output::{print_field, print_success};

pub fn run(args: &MetadataArgs) -> Result<()> {
    let stores = load_stores(&args.metadata)?;
    print_success(&format!("Loaded {}", args.metadata.display()));
    print_field("Organisation units", stores.organisation_units.len());
    print_field("Programs", stores.programs.len());
    print_field("Attributes", stores.attributes.len());
    print_field("Tracked entity types", stores.tracked_entity_types.len());
    print_field("Data entry forms", stores.data_entry_forms.len());
    print_field("Users", stores.user_count());
    Ok(())
}
