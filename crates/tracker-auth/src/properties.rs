//! Flat `key = value` configuration properties, as read from `dhis.conf`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ProviderConfigError;

/// Flat string properties, as found in a deployment's `.conf` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a subset of the Java properties format.
    ///
    /// Keys are separated from values by the first `=` or `:`. Blank lines and
    /// lines starting with `#` or `!` are skipped. A line ending in an odd
    /// number of backslashes continues on the next line, whose leading
    /// whitespace is dropped. Keys and values are trimmed; no other escape
    /// sequences are decoded, and whitespace alone does not separate a key.
    pub fn parse(content: &str) -> Result<Self, ProviderConfigError> {
        let mut properties = Self::new();
        let mut lines = content.lines().enumerate();
        while let Some((index, line)) = lines.next() {
            let mut logical = line.trim_start().to_string();
            if logical.trim_end().is_empty() || logical.starts_with(['#', '!']) {
                continue;
            }
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let invalid = || ProviderConfigError::InvalidProperty {
                line: index + 1,
                content: logical.trim_end().to_string(),
            };
            let at = logical.find(['=', ':']).ok_or_else(invalid)?;
            let key = logical[..at].trim();
            if key.is_empty() {
                return Err(invalid());
            }
            properties.insert(key, logical[at + 1..].trim());
        }
        Ok(properties)
    }

    /// Read and [`parse`](Self::parse) a properties file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ProviderConfigError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::parse(&content)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The value for `key`, or `None` if it is missing or blank.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_conf_lines() {
        let properties = Properties::parse(
            "# OIDC\n\
             oidc.provider.azure.0.tenant = contoso\n\
             \n\
             connection.url=jdbc:postgresql:dhis2?ssl=true\n",
        )
        .unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("oidc.provider.azure.0.tenant"), Some("contoso"));
        assert_eq!(
            properties.get("connection.url"),
            Some("jdbc:postgresql:dhis2?ssl=true")
        );
    }

    #[test]
    fn accepts_colon_separator() {
        let properties = Properties::parse(
            "! legacy comment\n\
             oidc.provider.azure.0.tenant: contoso\n\
             server.base.url = http://localhost:8080\n",
        )
        .unwrap();
        assert_eq!(properties.get("oidc.provider.azure.0.tenant"), Some("contoso"));
        assert_eq!(
            properties.get("server.base.url"),
            Some("http://localhost:8080")
        );
        assert_eq!(properties.len(), 2);
    }

    #[test]
    fn joins_continued_lines() {
        let content = concat!(
            "oidc.provider.azure.0.client_id = abc\\\n",
            "    def\n",
            "path = C:\\\\\n",
            "next = 1\n",
        );
        let properties = Properties::parse(content).unwrap();
        assert_eq!(properties.get("oidc.provider.azure.0.client_id"), Some("abcdef"));
        assert_eq!(properties.get("path"), Some("C:\\\\"));
        assert_eq!(properties.get("next"), Some("1"));

        let trailing = Properties::parse("a = 1\\").unwrap();
        assert_eq!(trailing.get("a"), Some("1"));
    }

    #[test]
    fn rejects_lines_without_separator() {
        let err = Properties::parse("a = 1\nnot a property\n").unwrap_err();
        assert_eq!(
            err,
            ProviderConfigError::InvalidProperty {
                line: 2,
                content: "not a property".into()
            }
        );
        assert!(Properties::parse(" = value").is_err());
    }

    #[test]
    fn blank_values_are_not_non_empty() {
        let properties: Properties = [("a", " "), ("b", "x")].into_iter().collect();
        assert_eq!(properties.get("a"), Some(" "));
        assert_eq!(properties.get_non_empty("a"), None);
        assert_eq!(properties.get_non_empty("b"), Some("x"));
        assert_eq!(properties.get_non_empty("c"), None);
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "oidc.provider.azure.0.tenant = fabrikam").unwrap();
        let properties = Properties::from_file(file.path()).unwrap();
        assert_eq!(properties.get("oidc.provider.azure.0.tenant"), Some("fabrikam"));

        let missing = Properties::from_file(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(missing, ProviderConfigError::Unreadable { .. }));
    }
}
