//! # System Descriptors
//!
//! A system descriptor names one external system (a messaging cluster, a
//! database change feed, ...) and the connector factory the runtime uses to
//! talk to it. It owns the system-scoped configuration overlay and, for typed
//! systems, a default serde.
//!
//! Concrete systems wrap a [`SystemDescriptorCore`] and implement
//! [`SystemDescriptor`]; the mutators provided by the trait return `&mut Self`
//! so a chain stays typed as the concrete system. Which stream descriptors a
//! system can mint is advertised separately through the traits in
//! [`crate::provider`].
//!
//! The system name is fixed at construction. It is the namespace prefix of
//! every key the system contributes (`systems.<name>.`) and the identity the
//! job assembler uses to detect two systems fighting over one name.

use crate::config::Config;
use crate::error::{DescriptorError, IdentifierKind};
use crate::keys;
use crate::offset::OffsetType;
use crate::serdes::SerdeNames;
use crate::validation::{require_key_segment, require_non_empty};
use std::collections::BTreeMap;
use tracing::debug;

/// State shared by every system descriptor.
#[derive(Debug)]
pub struct SystemDescriptorCore {
  system_name: String,
  factory_class_name: String,
  default_serde: Option<SerdeNames>,
  default_stream_offset_default: Option<OffsetType>,
  system_configs: BTreeMap<String, String>,
  default_stream_configs: BTreeMap<String, String>,
}

impl SystemDescriptorCore {
  /// Creates the core of a system descriptor.
  ///
  /// # Errors
  ///
  /// Fails if the system name is empty or not a single key segment, or if the
  /// factory class name is empty.
  pub fn new(
    system_name: impl Into<String>,
    factory_class_name: impl Into<String>,
  ) -> Result<Self, DescriptorError> {
    let system_name = system_name.into();
    let factory_class_name = factory_class_name.into();
    require_key_segment(IdentifierKind::SystemName, &system_name)?;
    require_non_empty(IdentifierKind::FactoryClassName, &factory_class_name)?;
    debug!(system = %system_name, factory = %factory_class_name, "created system descriptor");
    Ok(Self {
      system_name,
      factory_class_name,
      default_serde: None,
      default_stream_offset_default: None,
      system_configs: BTreeMap::new(),
      default_stream_configs: BTreeMap::new(),
    })
  }

  /// The system name.
  pub fn system_name(&self) -> &str {
    &self.system_name
  }

  /// The connector factory identifier.
  pub fn factory_class_name(&self) -> &str {
    &self.factory_class_name
  }

  /// Serde names streams of this system fall back to.
  pub fn default_serde(&self) -> Option<&SerdeNames> {
    self.default_serde.as_ref()
  }

  /// Sets the serde names streams of this system fall back to.
  pub fn set_default_serde(&mut self, serde: SerdeNames) {
    self.default_serde = Some(serde);
  }

  /// Offset default applied to every stream of this system.
  pub fn default_stream_offset_default(&self) -> Option<OffsetType> {
    self.default_stream_offset_default
  }

  /// Sets the offset default applied to every stream of this system.
  pub fn set_default_stream_offset_default(&mut self, offset: OffsetType) {
    self.default_stream_offset_default = Some(offset);
  }

  /// Raw system-level overlay.
  pub fn system_configs(&self) -> &BTreeMap<String, String> {
    &self.system_configs
  }

  /// Raw system-level defaults for every stream.
  pub fn default_stream_configs(&self) -> &BTreeMap<String, String> {
    &self.default_stream_configs
  }

  /// Merges entries into the system overlay. Later writes win.
  pub fn extend_system_configs<I, K, V>(&mut self, configs: I)
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .system_configs
      .extend(configs.into_iter().map(|(k, v)| (k.into(), v.into())));
  }

  /// Merges entries into the default-stream overlay. Later writes win.
  pub fn extend_default_stream_configs<I, K, V>(&mut self, configs: I)
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .default_stream_configs
      .extend(configs.into_iter().map(|(k, v)| (k.into(), v.into())));
  }

  /// Compiles the system's contribution to the job configuration.
  ///
  /// Raw overlays are written first, so the typed entries (factory, serde,
  /// offset default) win over a raw entry for the same key.
  pub fn to_config(&self) -> Config {
    let name = &self.system_name;
    let mut config = Config::new();
    for (key, value) in &self.system_configs {
      config.insert(keys::system_config(name, key), value.as_str());
    }
    for (key, value) in &self.default_stream_configs {
      config.insert(keys::default_stream_config(name, key), value.as_str());
    }
    config.insert(keys::system_factory(name), self.factory_class_name.as_str());
    if let Some(serde) = &self.default_serde {
      config.insert(keys::system_key_serde(name), serde.key.as_str());
      config.insert(keys::system_msg_serde(name), serde.msg.as_str());
    }
    if let Some(offset) = self.default_stream_offset_default {
      config.insert(
        keys::default_stream_config(name, keys::stream_property::OFFSET_DEFAULT),
        offset.as_str(),
      );
    }
    config
  }
}

/// A named external system.
///
/// Implementors only provide access to their [`SystemDescriptorCore`]; every
/// accessor and mutator is supplied by the trait. Systems with typed
/// properties override [`SystemDescriptor::to_config`] to add them.
pub trait SystemDescriptor: Send + Sync {
  /// Shared system state.
  fn core(&self) -> &SystemDescriptorCore;

  /// Mutable shared system state.
  fn core_mut(&mut self) -> &mut SystemDescriptorCore;

  /// The system name.
  fn system_name(&self) -> &str {
    self.core().system_name()
  }

  /// The connector factory identifier.
  fn factory_class_name(&self) -> &str {
    self.core().factory_class_name()
  }

  /// Serde names streams of this system fall back to.
  fn default_serde(&self) -> Option<&SerdeNames> {
    self.core().default_serde()
  }

  /// Raw system-level overlay.
  fn system_configs(&self) -> &BTreeMap<String, String> {
    self.core().system_configs()
  }

  /// Merges entries into the system overlay (`systems.<name>.<key>`).
  ///
  /// Later writes for the same key win. Returns the same descriptor.
  fn with_system_configs<I, K, V>(&mut self, configs: I) -> &mut Self
  where
    Self: Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.core_mut().extend_system_configs(configs);
    self
  }

  /// Merges defaults for every stream of this system
  /// (`systems.<name>.default.stream.<key>`).
  ///
  /// A stream's own overlay wins over these.
  fn with_default_stream_configs<I, K, V>(&mut self, configs: I) -> &mut Self
  where
    Self: Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.core_mut().extend_default_stream_configs(configs);
    self
  }

  /// Sets the offset default for every stream of this system.
  fn with_default_stream_offset_default(&mut self, offset: OffsetType) -> &mut Self
  where
    Self: Sized,
  {
    self.core_mut().set_default_stream_offset_default(offset);
    self
  }

  /// Compiles the system's contribution to the job configuration.
  fn to_config(&self) -> Config {
    self.core().to_config()
  }
}

/// Returns true if both references point at the same descriptor instance.
pub fn same_system(a: &dyn SystemDescriptor, b: &dyn SystemDescriptor) -> bool {
  std::ptr::addr_eq(a, b)
}
