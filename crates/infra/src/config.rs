//! Configuration loading and representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE_VAR: &str = "SALESDESK_DEFAULT_PAGE_SIZE";
pub const MAX_PAGE_SIZE_VAR: &str = "SALESDESK_MAX_PAGE_SIZE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than 0")]
    ZeroPageSize(&'static str),
    #[error("default page size {default} exceeds max page size {max}")]
    DefaultExceedsMax { default: u32, max: u32 },
}

/// Paging limits for sale listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size used when a listing request does not give one.
    pub default_page_size: u32,
    /// Largest page size a listing request may ask for.
    pub max_page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl ListingConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// Unparseable values and inconsistent combinations fall back to the
    /// defaults with a warning rather than failing startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &'static str, fallback: u32| match lookup(key) {
            None => fallback,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, fallback, "invalid page size; using default");
                fallback
            }),
        };

        let config = Self {
            default_page_size: read(DEFAULT_PAGE_SIZE_VAR, defaults.default_page_size),
            max_page_size: read(MAX_PAGE_SIZE_VAR, defaults.max_page_size),
        };

        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!(error = %e, "invalid listing configuration; using defaults");
                defaults
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize(DEFAULT_PAGE_SIZE_VAR));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize(MAX_PAGE_SIZE_VAR));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::DefaultExceedsMax {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(ListingConfig::from_lookup(lookup(&[])), ListingConfig::default());
    }

    #[test]
    fn reads_both_sizes() {
        let config = ListingConfig::from_lookup(lookup(&[
            (DEFAULT_PAGE_SIZE_VAR, "25"),
            (MAX_PAGE_SIZE_VAR, " 50 "),
        ]));
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 50);
    }

    #[test]
    fn garbage_falls_back_per_key() {
        let config = ListingConfig::from_lookup(lookup(&[
            (DEFAULT_PAGE_SIZE_VAR, "ten"),
            (MAX_PAGE_SIZE_VAR, "40"),
        ]));
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 40);
    }

    #[test]
    fn inconsistent_values_fall_back_entirely() {
        let config = ListingConfig::from_lookup(lookup(&[
            (DEFAULT_PAGE_SIZE_VAR, "80"),
            (MAX_PAGE_SIZE_VAR, "20"),
        ]));
        assert_eq!(config, ListingConfig::default());
    }

    #[test]
    fn validate_rejects_zero() {
        let config = ListingConfig {
            default_page_size: 0,
            max_page_size: 10,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroPageSize(DEFAULT_PAGE_SIZE_VAR))
        );
    }
}
