//! OAuth 2.0 / OpenID Connect client registrations.
//!
//! # Example
//!
//! ```ignore
//! use tracker_auth::{ClientRegistration, Properties, AzureAdProvider};
//!
//! let properties = Properties::from_file("/opt/dhis2/dhis.conf")?;
//! for client in AzureAdProvider::build_list(&properties)? {
//!     println!("{} -> {}", client.registration_id, client.registration.authorization_uri);
//! }
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

/// How the client authenticates against the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthenticationMethod {
    /// HTTP Basic with client id and secret.
    ClientSecretBasic,
    /// Client id and secret in the request body.
    ClientSecretPost,
    /// Public client, no secret.
    None,
}

/// OAuth grant used by a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationGrantType {
    AuthorizationCode,
    ClientCredentials,
    RefreshToken,
}

/// How the access token is sent to the userinfo endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInfoAuthenticationMethod {
    Header,
    Form,
    Query,
}

/// A client registered with an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRegistration {
    pub registration_id: String,
    pub client_name: String,
    pub client_id: String,
    /// Never serialized.
    #[serde(skip_serializing, default)]
    pub client_secret: String,
    pub client_authentication_method: ClientAuthenticationMethod,
    pub authorization_grant_type: AuthorizationGrantType,
    /// Redirect URI; `{registrationId}` is substituted at request time.
    pub redirect_uri_template: String,
    pub scopes: Vec<String>,
    pub authorization_uri: Url,
    pub token_uri: Url,
    pub jwk_set_uri: Url,
    pub user_info_uri: Url,
    pub user_info_authentication_method: UserInfoAuthenticationMethod,
    /// Claim holding the end-user name.
    pub user_name_attribute_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<Url>,
}

impl ClientRegistration {
    /// Redirect URI for this registration.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        self.redirect_uri_template
            .replace("{registrationId}", &self.registration_id)
    }

    /// Returns `true` if `scope` is requested.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// A client registration plus the claim used to match the external identity
/// to a local user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcClientRegistration {
    pub registration_id: String,
    /// ID-token claim compared against the local user's OpenID mapping.
    pub mapping_claim_key: String,
    pub registration: ClientRegistration,
}
