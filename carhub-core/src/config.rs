//! # Configuration
//!
//! A minimal string key/value store. Views and services read typed values
//! out of a [`CarHubConfigSnapshot`] so they never hold the live store.
//!
//! ```rust
//! use carhub_core::CarHubConfig;
//! let mut config = CarHubConfig::new();
//!
//! config.set("catalog.page_size", "8");
//!
//! assert_eq!(config.snapshot().get_usize("catalog.page_size"), Some(8));
//! ```
//!
//! ## Environment overrides
//! [`CarHubConfig::load_env`] maps `PREFIX` + `SECTION__KEY` variables to
//! `section.key`:
//!
//! ```bash
//! export CARHUB__CATALOG__PAGE_SIZE=24   # → catalog.page_size
//! ```

use std::collections::HashMap;

/// Default prefix for environment overrides.
pub const ENV_PREFIX: &str = "CARHUB__";

#[derive(Debug, Default, Clone)]
pub struct CarHubConfig {
    values: HashMap<String, String>,
}

impl CarHubConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Layer overrides from an iterator of `(NAME, value)` pairs.
    ///
    /// Only names starting with `prefix` are taken; the rest of the name is
    /// lower-cased and `__` becomes `.`.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut loaded = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                tracing::debug!(key = %normalized, "config override from environment");
                self.set(normalized, value);
                loaded += 1;
            }
        }
        loaded
    }

    /// Layer overrides from the process environment.
    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    pub fn snapshot(&self) -> CarHubConfigSnapshot {
        CarHubConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarHubConfigSnapshot {
    map: HashMap<String, String>,
}

impl CarHubConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }
}
