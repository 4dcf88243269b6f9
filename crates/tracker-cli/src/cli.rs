use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Validate tracked-entity search criteria against tracker metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./tracker.toml when present)
    #[arg(short, long, global = true, env = "TRACKER_CONFIG")]
    pub config: Option<String>,

    /// Log level (overrides the configured level; RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map a search query string to query parameters
    Map(MapArgs),
    /// Load a metadata file and summarize its contents
    Metadata(MetadataArgs),
    /// List the OIDC client registrations configured in a properties file
    Oidc(OidcArgs),
}

#[derive(clap::Args)]
pub struct MapArgs {
    /// Metadata snapshot (JSON)
    #[arg(short, long)]
    pub metadata: PathBuf,
    /// UID or username of the searching user
    #[arg(short, long)]
    pub user: String,
    /// Query string, e.g. "ou=DiszpKrYNg8&filter=w75KJ2mc4zz:LIKE:ja"
    pub query: String,
    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(clap::Args)]
pub struct MetadataArgs {
    /// Metadata snapshot (JSON)
    pub metadata: PathBuf,
}

#[derive(clap::Args)]
pub struct OidcArgs {
    /// Properties file (defaults to auth.properties_file from the configuration)
    #[arg(short, long)]
    pub properties: Option<PathBuf>,
}
