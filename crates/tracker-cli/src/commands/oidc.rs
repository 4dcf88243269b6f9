use anyhow::{Result, bail};
use colored::Colorize;
use tracker_auth::{AzureAdProvider, Properties};

use crate::cli::OidcArgs;
use crate::config::AuthConfig;
use crate::output::print_field;

pub fn run(args: &OidcArgs, auth: &AuthConfig) -> Result<()> {
    let path = match (&args.properties, &auth.properties_file) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) => path.clone(),
        (None, None) => bail!("no properties file given; pass --properties or set auth.properties_file"),
    };

    let properties = Properties::from_file(&path)?;
    let clients = AzureAdProvider::build_list(&properties)?;
    if clients.is_empty() {
        println!("No OIDC providers configured in {path}.");
        return Ok(());
    }

    for client in clients {
        println!("{}", client.registration_id.bold());
        let reg = &client.registration;
        print_field("  Client id", &reg.client_id);
        print_field("  Authorization", &reg.authorization_uri);
        print_field("  Token", &reg.token_uri);
        print_field("  Redirect", reg.redirect_uri());
        print_field("  Mapping claim", &client.mapping_claim_key);
    }
    Ok(())
}
