//! # tracker-auth
//!
//! OpenID Connect client registrations built from deployment properties.
//!
//! Only Azure AD is supported at the moment; each configured tenant becomes
//! one [`OidcClientRegistration`].

pub mod azure;
pub mod error;
pub mod properties;
pub mod registration;

pub use azure::AzureAdProvider;
pub use error::ProviderConfigError;
pub use properties::Properties;
pub use registration::{
    AuthorizationGrantType, ClientAuthenticationMethod, ClientRegistration,
    OidcClientRegistration, UserInfoAuthenticationMethod,
};
