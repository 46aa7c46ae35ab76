//! # Generic Descriptors
//!
//! Descriptors for systems that have no dedicated descriptor type. They expose
//! no typed per-system properties; anything system specific is passed as raw
//! key/value overlays through [`SystemDescriptor::with_system_configs`] and
//! [`StreamDescriptor::with_stream_configs`].
//!
//! If a system ships its own descriptors (see [`crate::kafka`]), prefer those.
//! Properties supplied in external configuration override anything set here.
//!
//! ## Example
//!
//! ```rust
//! use streamweave_descriptors::generic::GenericSystemDescriptor;
//! use streamweave_descriptors::provider::SimpleInputDescriptorProvider;
//! use streamweave_descriptors::serdes::StringSerde;
//! use streamweave_descriptors::stream::StreamDescriptor;
//! use streamweave_descriptors::system::SystemDescriptor;
//!
//! let mut system = GenericSystemDescriptor::new("kafka", "com.example.KafkaFactory")?;
//! system.with_system_configs([("consumer.zookeeper.connect", "zk:2181")]);
//!
//! let orders = system.get_input_descriptor("orders", StringSerde)?;
//! let config = orders.to_config();
//! assert_eq!(config.get("streams.orders.physical.name"), Some("orders"));
//! assert_eq!(config.get("streams.orders.samza.system"), Some("kafka"));
//! # Ok::<(), streamweave_descriptors::error::DescriptorError>(())
//! ```

use crate::config::Config;
use crate::error::DescriptorError;
use crate::provider::{OutputDescriptorProvider, SimpleInputDescriptorProvider};
use crate::serdes::Serde;
use crate::stream::{
  InputDescriptor, InputSettings, OutputDescriptor, StreamDescriptor, StreamDescriptorCore,
};
use crate::system::{SystemDescriptor, SystemDescriptorCore};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A system without a dedicated descriptor type.
///
/// Has no default serde: every stream names its serde explicitly.
#[derive(Debug)]
pub struct GenericSystemDescriptor {
  core: SystemDescriptorCore,
}

impl GenericSystemDescriptor {
  /// Creates a generic system descriptor.
  ///
  /// # Errors
  ///
  /// Fails if the system name or the factory class name is empty, or if the
  /// system name contains characters other than ASCII letters, digits, `_`
  /// and `-`.
  pub fn new(
    system_name: impl Into<String>,
    factory_class_name: impl Into<String>,
  ) -> Result<Self, DescriptorError> {
    Ok(Self {
      core: SystemDescriptorCore::new(system_name, factory_class_name)?,
    })
  }
}

impl SystemDescriptor for GenericSystemDescriptor {
  fn core(&self) -> &SystemDescriptorCore {
    &self.core
  }

  fn core_mut(&mut self) -> &mut SystemDescriptorCore {
    &mut self.core
  }
}

impl SimpleInputDescriptorProvider for GenericSystemDescriptor {
  type Input<'a, M: 'static>
    = GenericInputDescriptor<'a, M>
  where
    Self: 'a;

  fn get_input_descriptor<'a, M, S>(
    &'a self,
    stream_id: impl Into<String>,
    serde: S,
  ) -> Result<Self::Input<'a, M>, DescriptorError>
  where
    M: 'static,
    S: Serde<M> + 'static,
  {
    GenericInputDescriptor::new(stream_id, self, Arc::new(serde))
  }
}

impl OutputDescriptorProvider for GenericSystemDescriptor {
  type Output<'a, M: 'static>
    = GenericOutputDescriptor<'a, M>
  where
    Self: 'a;

  fn get_output_descriptor<'a, M, S>(
    &'a self,
    stream_id: impl Into<String>,
    serde: S,
  ) -> Result<Self::Output<'a, M>, DescriptorError>
  where
    M: 'static,
    S: Serde<M> + 'static,
  {
    GenericOutputDescriptor::new(stream_id, self, Arc::new(serde))
  }
}

/// An input stream of a [`GenericSystemDescriptor`].
pub struct GenericInputDescriptor<'a, M> {
  core: StreamDescriptorCore<'a>,
  input: InputSettings,
  serde: Arc<dyn Serde<M>>,
}

impl<'a, M: 'static> GenericInputDescriptor<'a, M> {
  pub(crate) fn new(
    stream_id: impl Into<String>,
    system: &'a dyn SystemDescriptor,
    serde: Arc<dyn Serde<M>>,
  ) -> Result<Self, DescriptorError> {
    let core = StreamDescriptorCore::new(stream_id, system, serde.serde_names())?;
    debug!(
      stream = %core.stream_id(),
      system = %core.system_name(),
      "created generic input descriptor"
    );
    Ok(Self {
      core,
      input: InputSettings::default(),
      serde,
    })
  }

  /// The serde of this stream's messages.
  pub fn serde(&self) -> &Arc<dyn Serde<M>> {
    &self.serde
  }
}

impl<'a, M: 'static> StreamDescriptor<'a> for GenericInputDescriptor<'a, M> {
  fn core(&self) -> &StreamDescriptorCore<'a> {
    &self.core
  }

  fn core_mut(&mut self) -> &mut StreamDescriptorCore<'a> {
    &mut self.core
  }

  fn to_config(&self) -> Config {
    self.input_config()
  }
}

impl<'a, M: 'static> InputDescriptor<'a> for GenericInputDescriptor<'a, M> {
  fn input_settings(&self) -> &InputSettings {
    &self.input
  }

  fn input_settings_mut(&mut self) -> &mut InputSettings {
    &mut self.input
  }
}

impl<M> fmt::Debug for GenericInputDescriptor<'_, M> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GenericInputDescriptor")
      .field("core", &self.core)
      .field("input", &self.input)
      .finish_non_exhaustive()
  }
}

/// An output stream of a [`GenericSystemDescriptor`].
pub struct GenericOutputDescriptor<'a, M> {
  core: StreamDescriptorCore<'a>,
  serde: Arc<dyn Serde<M>>,
}

impl<'a, M: 'static> GenericOutputDescriptor<'a, M> {
  pub(crate) fn new(
    stream_id: impl Into<String>,
    system: &'a dyn SystemDescriptor,
    serde: Arc<dyn Serde<M>>,
  ) -> Result<Self, DescriptorError> {
    let core = StreamDescriptorCore::new(stream_id, system, serde.serde_names())?;
    debug!(
      stream = %core.stream_id(),
      system = %core.system_name(),
      "created generic output descriptor"
    );
    Ok(Self { core, serde })
  }

  /// The serde of this stream's messages.
  pub fn serde(&self) -> &Arc<dyn Serde<M>> {
    &self.serde
  }
}

impl<'a, M: 'static> StreamDescriptor<'a> for GenericOutputDescriptor<'a, M> {
  fn core(&self) -> &StreamDescriptorCore<'a> {
    &self.core
  }

  fn core_mut(&mut self) -> &mut StreamDescriptorCore<'a> {
    &mut self.core
  }
}

impl<'a, M: 'static> OutputDescriptor<'a> for GenericOutputDescriptor<'a, M> {}

impl<M> fmt::Debug for GenericOutputDescriptor<'_, M> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GenericOutputDescriptor")
      .field("core", &self.core)
      .finish_non_exhaustive()
  }
}
