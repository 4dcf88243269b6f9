use serde::{Deserialize, Serialize};

/// Paging limits applied when mapping search criteria.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page_size() -> u32 {
    50
}
fn default_max_page_size() -> u32 {
    1000
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl SearchSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_size == 0 {
            return Err("search.default_page_size must be > 0".into());
        }
        if self.max_page_size == 0 {
            return Err("search.max_page_size must be > 0".into());
        }
        if self.default_page_size > self.max_page_size {
            return Err("search.default_page_size must be <= search.max_page_size".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = SearchSettings::default();
        assert_eq!(settings.default_page_size, 50);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn default_above_max_is_rejected() {
        let settings = SearchSettings {
            default_page_size: 100,
            max_page_size: 10,
        };
        assert!(settings.validate().unwrap_err().contains("default_page_size"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: SearchSettings = serde_json::from_str(r#"{"max_page_size": 200}"#).unwrap();
        assert_eq!(settings.default_page_size, 50);
        assert_eq!(settings.max_page_size, 200);
    }
}
