//! # Configuration Map
//!
//! The flat `key -> value` map descriptors compile into and the runtime stream
//! manager consumes.
//!
//! Entries are kept ordered by key so a compiled job always renders to the same
//! text. Externally supplied configuration is merged with
//! [`Config::merge_overrides`], which lets the external side win: descriptors
//! only ever establish defaults.
//!
//! ## Example
//!
//! ```rust
//! use streamweave_descriptors::config::Config;
//!
//! let mut generated = Config::new();
//! generated.insert("streams.orders.physical.name", "orders");
//!
//! let external = Config::from_properties_str("streams.orders.physical.name=orders-v2\n")?;
//! generated.merge_overrides(&external);
//! assert_eq!(generated.get("streams.orders.physical.name"), Some("orders-v2"));
//! # Ok::<(), streamweave_descriptors::error::ConfigError>(())
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::debug;

/// An ordered, flat string-to-string configuration map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
  entries: BTreeMap<String, String>,
}

impl Config {
  /// Creates an empty configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the value for `key`.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  /// Returns the value for `key` parsed as a boolean.
  pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
    match self.get(key) {
      None => Ok(None),
      Some(value) => match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(invalid_value(key, value)),
      },
    }
  }

  /// Returns the value for `key` parsed as an `i32`.
  pub fn get_i32(&self, key: &str) -> Result<Option<i32>, ConfigError> {
    self
      .get(key)
      .map(|value| value.trim().parse().map_err(|_| invalid_value(key, value)))
      .transpose()
  }

  /// Returns true if `key` is present.
  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  /// Sets `key` to `value`, returning the previous value.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    self.entries.insert(key.into(), value.into())
  }

  /// Removes `key`, returning its value.
  pub fn remove(&mut self, key: &str) -> Option<String> {
    self.entries.remove(key)
  }

  /// Number of entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns true if there are no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterates entries in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }

  /// Returns the entries under `prefix`, with the prefix stripped.
  pub fn subset(&self, prefix: &str) -> Config {
    self
      .entries
      .range(prefix.to_string()..)
      .take_while(|(key, _)| key.starts_with(prefix))
      .filter_map(|(key, value)| {
        let rest = &key[prefix.len()..];
        (!rest.is_empty()).then(|| (rest.to_string(), value.clone()))
      })
      .collect()
  }

  /// Merges `overrides` into this map. Entries in `overrides` win.
  pub fn merge_overrides(&mut self, overrides: &Config) {
    for (key, value) in &overrides.entries {
      match self.entries.insert(key.clone(), value.clone()) {
        Some(previous) if previous != *value => {
          debug!(
            key = %key,
            generated = %previous,
            external = %value,
            "external configuration overrides descriptor value"
          );
        }
        _ => {}
      }
    }
  }

  /// Consuming form of [`Config::merge_overrides`].
  #[must_use]
  pub fn with_overrides(mut self, overrides: &Config) -> Self {
    self.merge_overrides(overrides);
    self
  }

  /// Parses `.properties` style text.
  ///
  /// Blank lines and lines starting with `#` or `!` are skipped. Each other
  /// line must hold `key=value` or `key:value`; whitespace around the key and
  /// before the value is trimmed. Later lines win.
  pub fn from_properties_str(text: &str) -> Result<Self, ConfigError> {
    let mut config = Config::new();
    for (index, raw) in text.lines().enumerate() {
      let line = raw.trim();
      if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        continue;
      }
      let Some(split) = line.find(['=', ':']) else {
        return Err(ConfigError::Parse {
          line: index + 1,
          message: format!("expected 'key=value', found '{line}'"),
        });
      };
      let key = line[..split].trim();
      if key.is_empty() {
        return Err(ConfigError::Parse {
          line: index + 1,
          message: "empty key".to_string(),
        });
      }
      config.insert(key, line[split + 1..].trim_start());
    }
    Ok(config)
  }

  /// Renders the map as `.properties` text, one `key=value` per line.
  pub fn to_properties_string(&self) -> String {
    let mut out = String::new();
    for (key, value) in &self.entries {
      out.push_str(key);
      out.push('=');
      out.push_str(value);
      out.push('\n');
    }
    out
  }

  /// Parses a flat JSON object of string values.
  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(text)?)
  }

  /// Renders the map as a pretty printed JSON object.
  pub fn to_json_string(&self) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

fn invalid_value(key: &str, value: &str) -> ConfigError {
  ConfigError::InvalidValue {
    key: key.to_string(),
    value: value.to_string(),
  }
}

impl<K, V> FromIterator<(K, V)> for Config
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut config = Config::new();
    config.extend(iter);
    config
  }
}

impl<K, V> Extend<(K, V)> for Config
where
  K: Into<String>,
  V: Into<String>,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.entries.insert(key.into(), value.into());
    }
  }
}

impl IntoIterator for Config {
  type Item = (String, String);
  type IntoIter = btree_map::IntoIter<String, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl<'c> IntoIterator for &'c Config {
  type Item = (&'c String, &'c String);
  type IntoIter = btree_map::Iter<'c, String, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}

impl From<BTreeMap<String, String>> for Config {
  fn from(entries: BTreeMap<String, String>) -> Self {
    Self { entries }
  }
}
