//! Azure AD tenants configured through numbered properties.
//!
//! Each tenant lives under `oidc.provider.azure.<i>.`, numbered from 0
//! without gaps:
//!
//! ```text
//! oidc.provider.azure.0.tenant = contoso
//! oidc.provider.azure.0.client_id = 1e0a...
//! oidc.provider.azure.0.client_secret = ...
//! oidc.provider.azure.0.redirect_baseurl = https://play.example.org
//! oidc.provider.azure.0.mapping_claim = email
//! ```

use url::Url;

use crate::error::ProviderConfigError;
use crate::properties::Properties;
use crate::registration::{
    AuthorizationGrantType, ClientAuthenticationMethod, ClientRegistration,
    OidcClientRegistration, UserInfoAuthenticationMethod,
};

pub const PROVIDER_ID: &str = "azure";
pub const PROVIDER_PREFIX: &str = "oidc.provider.azure.";

const DEFAULT_REDIRECT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_MAPPING_CLAIM: &str = "email";
const LOGIN_BASE: &str = "https://login.microsoftonline.com";
const USER_INFO_URI: &str = "https://graph.microsoft.com/oidc/userinfo";

pub struct AzureAdProvider;

impl AzureAdProvider {
    /// Build one registration per configured tenant.
    ///
    /// Reading stops at the first index whose tenant is missing or blank.
    pub fn build_list(
        properties: &Properties,
    ) -> Result<Vec<OidcClientRegistration>, ProviderConfigError> {
        let mut clients = Vec::new();

        for index in 0.. {
            let Some(tenant) = properties.get_non_empty(&key(index, "tenant")) else {
                break;
            };

            let client_id = properties
                .get_non_empty(&key(index, "client_id"))
                .ok_or_else(|| ProviderConfigError::MissingClientId {
                    tenant: tenant.to_string(),
                })?;
            let client_secret = properties
                .get_non_empty(&key(index, "client_secret"))
                .ok_or_else(|| ProviderConfigError::MissingClientSecret {
                    tenant: tenant.to_string(),
                })?;

            let redirect_key = key(index, "redirect_baseurl");
            let redirect_base = properties
                .get_non_empty(&redirect_key)
                .unwrap_or(DEFAULT_REDIRECT_BASE_URL);
            Url::parse(redirect_base)
                .map_err(|e| ProviderConfigError::invalid_url(redirect_key.clone(), e))?;

            let mapping_claim = properties
                .get_non_empty(&key(index, "mapping_claim"))
                .unwrap_or(DEFAULT_MAPPING_CLAIM);

            let registration = ClientRegistration {
                registration_id: tenant.to_string(),
                client_name: tenant.to_string(),
                client_id: client_id.to_string(),
                client_secret: client_secret.to_string(),
                client_authentication_method: ClientAuthenticationMethod::ClientSecretBasic,
                authorization_grant_type: AuthorizationGrantType::AuthorizationCode,
                redirect_uri_template: format!(
                    "{}/oauth2/code/{{registrationId}}",
                    redirect_base.trim_end_matches('/')
                ),
                scopes: ["openid", "profile", "email"].map(String::from).to_vec(),
                authorization_uri: tenant_url(tenant, "oauth2/v2.0/authorize")?,
                token_uri: tenant_url(tenant, "oauth2/v2.0/token")?,
                jwk_set_uri: tenant_url(tenant, "discovery/v2.0/keys")?,
                user_info_uri: Url::parse(USER_INFO_URI)
                    .map_err(|e| ProviderConfigError::invalid_url("user_info_uri", e))?,
                user_info_authentication_method: UserInfoAuthenticationMethod::Header,
                user_name_attribute_name: "sub".to_string(),
                end_session_endpoint: Some(tenant_url(tenant, "oauth2/v2.0/logout")?),
            };

            tracing::debug!(tenant, mapping_claim, "Registered Azure AD OIDC client");
            clients.push(OidcClientRegistration {
                registration_id: tenant.to_string(),
                mapping_claim_key: mapping_claim.to_string(),
                registration,
            });
        }

        Ok(clients)
    }
}

fn key(index: usize, suffix: &str) -> String {
    format!("{PROVIDER_PREFIX}{index}.{suffix}")
}

fn tenant_url(tenant: &str, path: &str) -> Result<Url, ProviderConfigError> {
    Url::parse(&format!("{LOGIN_BASE}/{tenant}/{path}"))
        .map_err(|e| ProviderConfigError::invalid_url(path, e))
}
