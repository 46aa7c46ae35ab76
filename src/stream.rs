//! # Stream Descriptors
//!
//! A stream descriptor declares one directional stream of a system: its
//! logical id inside the job, the serde of its messages, an optional physical
//! (wire-level) name and a stream-scoped configuration overlay.
//!
//! Stream descriptors are only created by their system's provider methods and
//! borrow that system for their whole life (`&'a dyn SystemDescriptor`). The
//! borrow checker therefore guarantees the system outlives its streams and is
//! not mutated while they exist.
//!
//! Mutators return `&mut Self`, which is the concrete descriptor type, so a
//! chain such as
//!
//! ```rust
//! use streamweave_descriptors::generic::{GenericOutputDescriptor, GenericSystemDescriptor};
//! use streamweave_descriptors::provider::OutputDescriptorProvider;
//! use streamweave_descriptors::serdes::StringSerde;
//! use streamweave_descriptors::stream::StreamDescriptor;
//!
//! let system = GenericSystemDescriptor::new("kafka", "com.example.KafkaFactory")?;
//! let mut output = system.get_output_descriptor("alerts", StringSerde)?;
//! let chained: &mut GenericOutputDescriptor<'_, String> = output
//!   .with_physical_name("alerts-v2")?
//!   .with_stream_configs([("replication.factor", "3")]);
//! assert_eq!(chained.physical_name(), "alerts-v2");
//! # Ok::<(), streamweave_descriptors::error::DescriptorError>(())
//! ```
//!
//! keeps the generic output type rather than widening to a base type.

use crate::config::Config;
use crate::error::{DescriptorError, IdentifierKind};
use crate::keys::{self, stream_property};
use crate::offset::OffsetType;
use crate::serdes::SerdeNames;
use crate::system::SystemDescriptor;
use crate::validation::{require_key_segment, require_non_empty};
use std::collections::BTreeMap;
use std::fmt;

/// State shared by every stream descriptor.
pub struct StreamDescriptorCore<'a> {
  stream_id: String,
  system: &'a dyn SystemDescriptor,
  serde_names: SerdeNames,
  physical_name: Option<String>,
  stream_configs: BTreeMap<String, String>,
}

impl<'a> StreamDescriptorCore<'a> {
  /// Creates the core of a stream descriptor bound to `system`.
  ///
  /// # Errors
  ///
  /// Fails if the stream id is empty or not a single key segment.
  pub fn new(
    stream_id: impl Into<String>,
    system: &'a dyn SystemDescriptor,
    serde_names: SerdeNames,
  ) -> Result<Self, DescriptorError> {
    let stream_id = stream_id.into();
    require_key_segment(IdentifierKind::StreamId, &stream_id)?;
    Ok(Self {
      stream_id,
      system,
      serde_names,
      physical_name: None,
      stream_configs: BTreeMap::new(),
    })
  }

  /// The logical stream id.
  pub fn stream_id(&self) -> &str {
    &self.stream_id
  }

  /// The owning system.
  pub fn system(&self) -> &'a dyn SystemDescriptor {
    self.system
  }

  /// Name of the owning system.
  pub fn system_name(&self) -> &str {
    self.system.system_name()
  }

  /// The physical name, falling back to the stream id.
  pub fn physical_name(&self) -> &str {
    self.physical_name.as_deref().unwrap_or(&self.stream_id)
  }

  /// Key and message serde names.
  pub fn serde_names(&self) -> &SerdeNames {
    &self.serde_names
  }

  /// Raw stream-level overlay.
  pub fn stream_configs(&self) -> &BTreeMap<String, String> {
    &self.stream_configs
  }

  /// Sets the physical name.
  ///
  /// # Errors
  ///
  /// Fails on an empty name, leaving the previous physical name in place.
  pub fn set_physical_name(&mut self, physical_name: impl Into<String>) -> Result<(), DescriptorError> {
    let physical_name = physical_name.into();
    require_non_empty(IdentifierKind::PhysicalName, &physical_name)?;
    self.physical_name = Some(physical_name);
    Ok(())
  }

  /// Merges entries into the stream overlay. Later writes win.
  pub fn extend_stream_configs<I, K, V>(&mut self, configs: I)
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .stream_configs
      .extend(configs.into_iter().map(|(k, v)| (k.into(), v.into())));
  }

  /// Compiles the stream's base contribution to the job configuration.
  ///
  /// The raw overlay is written first so the typed entries win over a raw
  /// entry for the same key.
  pub fn to_config(&self) -> Config {
    let id = &self.stream_id;
    let mut config = Config::new();
    for (key, value) in &self.stream_configs {
      config.insert(keys::stream_config(id, key), value.as_str());
    }
    config.insert(keys::stream_system(id), self.system_name());
    config.insert(keys::stream_physical_name(id), self.physical_name());
    config.insert(keys::stream_key_serde(id), self.serde_names.key.as_str());
    config.insert(keys::stream_msg_serde(id), self.serde_names.msg.as_str());
    config
  }
}

impl fmt::Debug for StreamDescriptorCore<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StreamDescriptorCore")
      .field("stream_id", &self.stream_id)
      .field("system", &self.system.system_name())
      .field("serde_names", &self.serde_names)
      .field("physical_name", &self.physical_name)
      .field("stream_configs", &self.stream_configs)
      .finish()
  }
}

/// Consumption settings specific to input streams.
///
/// Flags are tri-state: unset flags are left to the system defaults, while an
/// explicit `false` is written so it overrides a system-level `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSettings {
  offset_default: Option<OffsetType>,
  reset_offset: Option<bool>,
  priority: Option<i32>,
  bootstrap: Option<bool>,
  bounded: Option<bool>,
  delete_committed_messages: Option<bool>,
}

impl InputSettings {
  /// Where to start without a checkpoint.
  pub fn offset_default(&self) -> Option<OffsetType> {
    self.offset_default
  }

  /// Sets where to start without a checkpoint.
  pub fn set_offset_default(&mut self, offset: OffsetType) {
    self.offset_default = Some(offset);
  }

  /// Whether checkpoints are ignored on start.
  pub fn reset_offset(&self) -> bool {
    self.reset_offset.unwrap_or(false)
  }

  /// Sets whether checkpoints are ignored on start.
  pub fn set_reset_offset(&mut self, reset: bool) {
    self.reset_offset = Some(reset);
  }

  /// Relative consumption priority.
  pub fn priority(&self) -> Option<i32> {
    self.priority
  }

  /// Sets the relative consumption priority.
  pub fn set_priority(&mut self, priority: i32) {
    self.priority = Some(priority);
  }

  /// Whether the stream is bootstrapped before other inputs.
  pub fn bootstrap(&self) -> bool {
    self.bootstrap.unwrap_or(false)
  }

  /// Sets whether the stream is bootstrapped before other inputs.
  pub fn set_bootstrap(&mut self, bootstrap: bool) {
    self.bootstrap = Some(bootstrap);
  }

  /// Whether the stream has a finite end.
  pub fn bounded(&self) -> bool {
    self.bounded.unwrap_or(false)
  }

  /// Sets whether the stream has a finite end.
  pub fn set_bounded(&mut self, bounded: bool) {
    self.bounded = Some(bounded);
  }

  /// Whether committed messages are deleted.
  pub fn delete_committed_messages(&self) -> bool {
    self.delete_committed_messages.unwrap_or(false)
  }

  /// Sets whether committed messages are deleted.
  pub fn set_delete_committed_messages(&mut self, delete: bool) {
    self.delete_committed_messages = Some(delete);
  }

  /// Writes every setting that was set explicitly.
  pub fn write_config(&self, stream_id: &str, config: &mut Config) {
    let mut put = |key: &str, value: String| {
      config.insert(keys::stream_config(stream_id, key), value);
    };
    if let Some(offset) = self.offset_default {
      put(stream_property::OFFSET_DEFAULT, offset.to_string());
    }
    if let Some(reset) = self.reset_offset {
      put(stream_property::RESET_OFFSET, reset.to_string());
    }
    if let Some(priority) = self.priority {
      put(stream_property::PRIORITY, priority.to_string());
    }
    if let Some(bootstrap) = self.bootstrap {
      put(stream_property::BOOTSTRAP, bootstrap.to_string());
    }
    if let Some(bounded) = self.bounded {
      put(stream_property::BOUNDED, bounded.to_string());
    }
    if let Some(delete) = self.delete_committed_messages {
      put(stream_property::DELETE_COMMITTED_MESSAGES, delete.to_string());
    }
  }
}

/// A stream belonging to a system.
pub trait StreamDescriptor<'a>: Send + Sync {
  /// Shared stream state.
  fn core(&self) -> &StreamDescriptorCore<'a>;

  /// Mutable shared stream state.
  fn core_mut(&mut self) -> &mut StreamDescriptorCore<'a>;

  /// The logical stream id.
  fn stream_id<'s>(&'s self) -> &'s str
  where
    'a: 's,
  {
    self.core().stream_id()
  }

  /// The owning system.
  fn system(&self) -> &'a dyn SystemDescriptor {
    self.core().system()
  }

  /// Name of the owning system.
  fn system_name<'s>(&'s self) -> &'s str
  where
    'a: 's,
  {
    self.core().system_name()
  }

  /// The physical name, falling back to the stream id.
  fn physical_name<'s>(&'s self) -> &'s str
  where
    'a: 's,
  {
    self.core().physical_name()
  }

  /// Key and message serde names.
  fn serde_names<'s>(&'s self) -> &'s SerdeNames
  where
    'a: 's,
  {
    self.core().serde_names()
  }

  /// Raw stream-level overlay.
  fn stream_configs<'s>(&'s self) -> &'s BTreeMap<String, String>
  where
    'a: 's,
  {
    self.core().stream_configs()
  }

  /// Overrides the wire-level name used by the real system.
  ///
  /// # Errors
  ///
  /// Fails on an empty name; the descriptor keeps its previous physical name.
  fn with_physical_name(&mut self, physical_name: impl Into<String>) -> Result<&mut Self, DescriptorError>
  where
    Self: Sized,
  {
    self.core_mut().set_physical_name(physical_name)?;
    Ok(self)
  }

  /// Merges entries into the stream overlay (`streams.<id>.<key>`).
  ///
  /// Later writes for the same key win, and stream entries win over the
  /// system's entries for the same property.
  fn with_stream_configs<I, K, V>(&mut self, configs: I) -> &mut Self
  where
    Self: Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.core_mut().extend_stream_configs(configs);
    self
  }

  /// Compiles the stream's contribution to the job configuration.
  fn to_config(&self) -> Config {
    self.core().to_config()
  }
}

/// An input stream.
pub trait InputDescriptor<'a>: StreamDescriptor<'a> {
  /// Input consumption settings.
  fn input_settings(&self) -> &InputSettings;

  /// Mutable input consumption settings.
  fn input_settings_mut(&mut self) -> &mut InputSettings;

  /// Sets where to start consuming when there is no checkpoint.
  fn with_offset_default(&mut self, offset: OffsetType) -> &mut Self
  where
    Self: Sized,
  {
    self.input_settings_mut().set_offset_default(offset);
    self
  }

  /// Ignores existing checkpoints and starts from the offset default.
  fn with_reset_offset(&mut self, reset: bool) -> &mut Self
  where
    Self: Sized,
  {
    self.input_settings_mut().set_reset_offset(reset);
    self
  }

  /// Sets the relative consumption priority. Higher values are read first.
  fn with_priority(&mut self, priority: i32) -> &mut Self
  where
    Self: Sized,
  {
    self.input_settings_mut().set_priority(priority);
    self
  }

  /// Consumes this stream fully before any other input is processed.
  fn with_bootstrap(&mut self, bootstrap: bool) -> &mut Self
  where
    Self: Sized,
  {
    self.input_settings_mut().set_bootstrap(bootstrap);
    self
  }

  /// Marks the stream as finite.
  fn with_bounded(&mut self, bounded: bool) -> &mut Self
  where
    Self: Sized,
  {
    self.input_settings_mut().set_bounded(bounded);
    self
  }

  /// Deletes messages from the system once they are committed.
  fn with_delete_committed_messages(&mut self, delete: bool) -> &mut Self
  where
    Self: Sized,
  {
    self.input_settings_mut().set_delete_committed_messages(delete);
    self
  }

  /// Base stream configuration plus the input settings.
  fn input_config(&self) -> Config {
    let mut config = self.core().to_config();
    self
      .input_settings()
      .write_config(self.core().stream_id(), &mut config);
    config
  }
}

/// An output stream.
pub trait OutputDescriptor<'a>: StreamDescriptor<'a> {}
