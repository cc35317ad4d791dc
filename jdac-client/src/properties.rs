use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat string key/value bag handed to token providers.
///
/// Lookups are relaxed: `authEndpoint`, `auth-endpoint`, `auth_endpoint` and
/// `authendpoint` all name the same property. An exact match always wins over
/// a relaxed one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property by name
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.entries.get(key) {
            return Some(value.as_str());
        }

        let wanted = canonical_key(key);
        self.entries
            .iter()
            .find(|(k, _)| canonical_key(k) == wanted)
            .map(|(_, v)| v.as_str())
    }

    /// Get a property, failing when it is absent or blank
    pub fn require(&self, key: &str) -> Result<&str, String> {
        match self.get(key).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(format!("missing required property '{}'", key)),
        }
    }

    /// Insert a property, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Relaxed form of a property key: lowercase, without `-` and `_`
pub fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
