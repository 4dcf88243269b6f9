use anyhow::{Result, anyhow};
use tracker_search::{QueryParameters, SearchCriteria, SearchSettings, TrackedEntityCriteriaMapper};

use crate::cli::MapArgs;
use crate::commands::load_stores;
use crate::output::print_json;

pub async fn run(args: &MapArgs, settings: &SearchSettings) -> Result<()> {
    let params = map_query(args, settings).await?;
    print_json(&params, args.compact)
}

/// Parse the query string of `args` and map it for the named user.
pub async fn map_query(args: &MapArgs, settings: &SearchSettings) -> Result<QueryParameters> {
    let stores = load_stores(&args.metadata)?;
    let user = stores
        .user(&args.user)
        .ok_or_else(|| anyhow!("user not found in metadata: {}", args.user))?;

    let criteria = SearchCriteria::from_query(&args.query)?;
    let mapper = TrackedEntityCriteriaMapper::from_stores(&stores).with_settings(settings.clone());
    Ok(mapper.map(criteria, user).await?)
}
