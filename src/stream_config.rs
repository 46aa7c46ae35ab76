//! # Stream Configuration View
//!
//! Reads the effective properties of one stream out of a compiled
//! configuration map, applying the key precedence of the wire contract.
//!
//! For a stream `S` of system `Y` with physical name `P`, a property `k` is
//! looked up in this order, first match wins:
//!
//! 1. `streams.S.k`
//! 2. `systems.Y.streams.P.k`
//! 3. `systems.Y.default.stream.k`
//! 4. `systems.Y.k`
//!
//! External overrides are expected to be merged into the map already (see
//! [`crate::config::Config::merge_overrides`]), so they win at every level.

use crate::config::Config;
use crate::error::ConfigError;
use crate::keys::{self, stream_property};
use crate::offset::OffsetType;

/// The resolved configuration of one stream.
#[derive(Clone, Debug)]
pub struct StreamConfig<'c> {
  config: &'c Config,
  stream_id: String,
  system: &'c str,
  physical_name: String,
}

impl<'c> StreamConfig<'c> {
  /// Resolves `stream_id` within `config`.
  ///
  /// The system comes from `streams.<id>.samza.system`, falling back to
  /// `job.default.system`. The physical name falls back to the stream id.
  ///
  /// # Errors
  ///
  /// Fails with [`ConfigError::MissingSystem`] if no system can be found.
  pub fn new(config: &'c Config, stream_id: &str) -> Result<Self, ConfigError> {
    let system = config
      .get(&keys::stream_system(stream_id))
      .or_else(|| config.get(keys::JOB_DEFAULT_SYSTEM))
      .ok_or_else(|| ConfigError::MissingSystem {
        stream_id: stream_id.to_string(),
      })?;
    let physical_name = config
      .get(&keys::stream_physical_name(stream_id))
      .unwrap_or(stream_id)
      .to_string();
    Ok(Self {
      config,
      stream_id: stream_id.to_string(),
      system,
      physical_name,
    })
  }

  /// The logical stream id.
  pub fn stream_id(&self) -> &str {
    &self.stream_id
  }

  /// The system the stream belongs to.
  pub fn system_name(&self) -> &str {
    self.system
  }

  /// The wire-level stream name.
  pub fn physical_name(&self) -> &str {
    &self.physical_name
  }

  /// Looks up property `key`, most specific level first.
  pub fn property(&self, key: &str) -> Option<&'c str> {
    let config = self.config;
    config
      .get(&keys::stream_config(&self.stream_id, key))
      .or_else(|| config.get(&keys::system_stream_config(self.system, &self.physical_name, key)))
      .or_else(|| config.get(&keys::default_stream_config(self.system, key)))
      .or_else(|| config.get(&keys::system_config(self.system, key)))
  }

  /// All properties visible to this stream, with precedence applied.
  ///
  /// System-level entries that address other streams or the default-stream
  /// namespace are not properties of this stream and are left out.
  pub fn properties(&self) -> Config {
    let system_prefix = keys::system_prefix(self.system);
    let mut merged: Config = self
      .config
      .subset(&system_prefix)
      .into_iter()
      .filter(|(key, _)| !key.starts_with("default.stream.") && !key.starts_with("streams."))
      .collect();
    merged.merge_overrides(&self.config.subset(&keys::default_stream_prefix(self.system)));
    merged.merge_overrides(
      &self
        .config
        .subset(&keys::system_stream_prefix(self.system, &self.physical_name)),
    );
    merged.merge_overrides(&self.config.subset(&keys::stream_prefix(&self.stream_id)));
    merged
  }

  /// Registry name of the key serde.
  ///
  /// # Errors
  ///
  /// Fails with [`ConfigError::MissingSerde`] if neither the stream nor its
  /// system names one.
  pub fn key_serde(&self) -> Result<&'c str, ConfigError> {
    self
      .property(stream_property::KEY_SERDE)
      .ok_or_else(|| self.missing_serde("key"))
  }

  /// Registry name of the message serde.
  ///
  /// # Errors
  ///
  /// Fails with [`ConfigError::MissingSerde`] if neither the stream nor its
  /// system names one.
  pub fn msg_serde(&self) -> Result<&'c str, ConfigError> {
    self
      .property(stream_property::MSG_SERDE)
      .ok_or_else(|| self.missing_serde("msg"))
  }

  fn missing_serde(&self, which: &'static str) -> ConfigError {
    ConfigError::MissingSerde {
      stream_id: self.stream_id.clone(),
      which,
    }
  }

  /// Where to start consuming without a checkpoint.
  pub fn offset_default(&self) -> Result<Option<OffsetType>, ConfigError> {
    self
      .property(stream_property::OFFSET_DEFAULT)
      .map(|value| {
        value.parse().map_err(|_| ConfigError::InvalidValue {
          key: stream_property::OFFSET_DEFAULT.to_string(),
          value: value.to_string(),
        })
      })
      .transpose()
  }

  /// Whether checkpoints are ignored on start. Defaults to false.
  pub fn reset_offset(&self) -> Result<bool, ConfigError> {
    self.flag(stream_property::RESET_OFFSET)
  }

  /// Whether the stream is bootstrapped. Defaults to false.
  pub fn bootstrap(&self) -> Result<bool, ConfigError> {
    self.flag(stream_property::BOOTSTRAP)
  }

  /// Whether the stream is bounded. Defaults to false.
  pub fn bounded(&self) -> Result<bool, ConfigError> {
    self.flag(stream_property::BOUNDED)
  }

  /// Relative consumption priority. Defaults to 0.
  pub fn priority(&self) -> Result<i32, ConfigError> {
    match self.property(stream_property::PRIORITY) {
      None => Ok(0),
      Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: stream_property::PRIORITY.to_string(),
        value: value.to_string(),
      }),
    }
  }

  fn flag(&self, key: &str) -> Result<bool, ConfigError> {
    match self.property(key) {
      None => Ok(false),
      Some(value) => match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
          key: key.to_string(),
          value: value.to_string(),
        }),
      },
    }
  }
}
