//! Errors raised while building OIDC client registrations.

/// A provider section in the configuration properties is incomplete or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderConfigError {
    /// A tenant is configured without a client id.
    #[error("Azure client id is missing! tenant={tenant}")]
    MissingClientId {
        /// The tenant whose section is incomplete.
        tenant: String,
    },

    /// A tenant is configured without a client secret.
    #[error("Azure client secret is missing! tenant={tenant}")]
    MissingClientSecret {
        /// The tenant whose section is incomplete.
        tenant: String,
    },

    /// A configured or derived URL cannot be parsed.
    #[error("Invalid URL for {key}: {message}")]
    InvalidUrl {
        /// Property key (or endpoint name) the URL came from.
        key: String,
        /// Parser error.
        message: String,
    },

    /// A properties file line is not of the form `key = value`.
    #[error("Invalid property on line {line}: {content}")]
    InvalidProperty {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// A properties file cannot be read.
    #[error("Failed to read {path}: {message}")]
    Unreadable {
        /// Path of the file.
        path: String,
        /// I/O error.
        message: String,
    },
}

impl ProviderConfigError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(key: impl Into<String>, error: url::ParseError) -> Self {
        Self::InvalidUrl {
            key: key.into(),
            message: error.to_string(),
        }
    }

    /// The tenant this error refers to, if any.
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        match self {
            Self::MissingClientId { tenant } | Self::MissingClientSecret { tenant } => Some(tenant),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_tenant() {
        let err = ProviderConfigError::MissingClientSecret {
            tenant: "contoso".into(),
        };
        assert_eq!(err.to_string(), "Azure client secret is missing! tenant=contoso");
        assert_eq!(err.tenant(), Some("contoso"));
    }

    #[test]
    fn invalid_url_keeps_parser_message() {
        let parse_error = url::Url::parse("not a url").unwrap_err();
        let err = ProviderConfigError::invalid_url("redirect_baseurl", parse_error);
        assert!(err.to_string().starts_with("Invalid URL for redirect_baseurl:"));
        assert_eq!(err.tenant(), None);
    }
}
