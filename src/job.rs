//! # Job Descriptor
//!
//! The job assembler: collects the systems and streams of one job, rejects
//! conflicting declarations as they are added, and compiles everything into
//! the flat configuration map handed to the runtime.
//!
//! ## Identity rules
//!
//! - A stream id may be registered once per job, as either an input or an
//!   output. A second registration fails with
//!   [`DescriptorError::DuplicateStream`] instead of silently shadowing the first.
//! - A system name may belong to one system descriptor instance per job. Two
//!   distinct instances with the same name fail with
//!   [`DescriptorError::DuplicateSystem`], even if configured identically.
//!
//! ## Precedence
//!
//! Within the compiled map, `streams.<id>.*` entries override the
//! `systems.<name>.*` entries for the same stream property (see
//! [`crate::stream_config::StreamConfig`]). Configuration supplied from outside
//! the job always wins; merge it with [`JobDescriptor::to_config_with_overrides`].
//!
//! ## Example
//!
//! ```rust
//! use streamweave_descriptors::config::Config;
//! use streamweave_descriptors::generic::GenericSystemDescriptor;
//! use streamweave_descriptors::job::JobDescriptor;
//! use streamweave_descriptors::provider::{OutputDescriptorProvider, SimpleInputDescriptorProvider};
//! use streamweave_descriptors::serdes::StringSerde;
//!
//! let kafka = GenericSystemDescriptor::new("kafka", "com.example.KafkaFactory")?;
//! let mut job = JobDescriptor::new("order-enricher")?;
//! job
//!   .add_input_stream(kafka.get_input_descriptor("orders", StringSerde)?)?
//!   .add_output_stream(kafka.get_output_descriptor("enriched", StringSerde)?)?;
//!
//! let external = Config::from_properties_str("streams.orders.physical.name=orders-v2")?;
//! let config = job.to_config_with_overrides(&external);
//! assert_eq!(config.get("streams.orders.physical.name"), Some("orders-v2"));
//! assert_eq!(config.get("systems.kafka.samza.factory"), Some("com.example.KafkaFactory"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::Config;
use crate::error::{DescriptorError, IdentifierKind};
use crate::keys;
use crate::stream::{InputDescriptor, OutputDescriptor};
use crate::system::{SystemDescriptor, same_system};
use crate::validation::require_non_empty;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// Assembles the descriptors of one job.
pub struct JobDescriptor<'a> {
  name: String,
  job_id: Option<String>,
  job_configs: BTreeMap<String, String>,
  default_system: Option<&'a dyn SystemDescriptor>,
  systems: BTreeMap<String, &'a dyn SystemDescriptor>,
  inputs: BTreeMap<String, Box<dyn InputDescriptor<'a> + 'a>>,
  outputs: BTreeMap<String, Box<dyn OutputDescriptor<'a> + 'a>>,
}

impl<'a> JobDescriptor<'a> {
  /// Creates an empty job.
  ///
  /// # Errors
  ///
  /// Fails if the job name is empty.
  pub fn new(name: impl Into<String>) -> Result<Self, DescriptorError> {
    let name = name.into();
    require_non_empty(IdentifierKind::JobName, &name)?;
    Ok(Self {
      name,
      job_id: None,
      job_configs: BTreeMap::new(),
      default_system: None,
      systems: BTreeMap::new(),
      inputs: BTreeMap::new(),
      outputs: BTreeMap::new(),
    })
  }

  /// The job name.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Sets the instance id, for running several copies of one job.
  ///
  /// # Errors
  ///
  /// Fails if the id is empty.
  pub fn with_job_id(&mut self, job_id: impl Into<String>) -> Result<&mut Self, DescriptorError> {
    let job_id = job_id.into();
    require_non_empty(IdentifierKind::JobId, &job_id)?;
    self.job_id = Some(job_id);
    Ok(self)
  }

  /// The instance id, if one was set.
  pub fn job_id(&self) -> Option<&str> {
    self.job_id.as_deref()
  }

  /// Merges raw job-level entries. Keys are used verbatim.
  ///
  /// Entries generated from descriptors win over these for the same key.
  pub fn with_job_configs<I, K, V>(&mut self, configs: I) -> &mut Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .job_configs
      .extend(configs.into_iter().map(|(k, v)| (k.into(), v.into())));
    self
  }

  /// Sets the system used for streams the runtime creates on its own.
  ///
  /// # Errors
  ///
  /// Fails if a different system instance is already registered under the
  /// same name.
  pub fn with_default_system(
    &mut self,
    system: &'a dyn SystemDescriptor,
  ) -> Result<&mut Self, DescriptorError> {
    self.register_system(system)?;
    self.default_system = Some(system);
    Ok(self)
  }

  /// The default system, if one was set.
  pub fn default_system(&self) -> Option<&'a dyn SystemDescriptor> {
    self.default_system
  }

  /// Registers a system without adding any of its streams.
  ///
  /// Registering the same instance again is a no-op.
  ///
  /// # Errors
  ///
  /// Fails if a different system instance is already registered under the
  /// same name.
  pub fn register_system(&mut self, system: &'a dyn SystemDescriptor) -> Result<(), DescriptorError> {
    let name = system.system_name();
    match self.systems.get(name) {
      Some(existing) if same_system(*existing, system) => Ok(()),
      Some(_) => Err(DescriptorError::DuplicateSystem(name.to_string())),
      None => {
        debug!(job = %self.name, system = %name, "registered system");
        self.systems.insert(name.to_string(), system);
        Ok(())
      }
    }
  }

  /// Adds an input stream, registering its system.
  ///
  /// # Errors
  ///
  /// Fails if the stream id is already used by this job, or if its system
  /// name belongs to a different system instance. Nothing is registered on
  /// failure.
  pub fn add_input_stream<D>(&mut self, descriptor: D) -> Result<&mut Self, DescriptorError>
  where
    D: InputDescriptor<'a> + 'a,
  {
    let stream_id = descriptor.stream_id().to_string();
    self.check_stream_id(&stream_id)?;
    self.register_system(descriptor.system())?;
    debug!(job = %self.name, stream = %stream_id, "added input stream");
    self.inputs.insert(stream_id, Box::new(descriptor));
    Ok(self)
  }

  /// Adds an output stream, registering its system.
  ///
  /// # Errors
  ///
  /// Same as [`JobDescriptor::add_input_stream`].
  pub fn add_output_stream<D>(&mut self, descriptor: D) -> Result<&mut Self, DescriptorError>
  where
    D: OutputDescriptor<'a> + 'a,
  {
    let stream_id = descriptor.stream_id().to_string();
    self.check_stream_id(&stream_id)?;
    self.register_system(descriptor.system())?;
    debug!(job = %self.name, stream = %stream_id, "added output stream");
    self.outputs.insert(stream_id, Box::new(descriptor));
    Ok(self)
  }

  fn check_stream_id(&self, stream_id: &str) -> Result<(), DescriptorError> {
    if self.inputs.contains_key(stream_id) || self.outputs.contains_key(stream_id) {
      return Err(DescriptorError::DuplicateStream(stream_id.to_string()));
    }
    Ok(())
  }

  /// The registered system with `name`.
  pub fn system(&self, name: &str) -> Option<&'a dyn SystemDescriptor> {
    self.systems.get(name).copied()
  }

  /// The input stream with `stream_id`.
  pub fn input_stream(&self, stream_id: &str) -> Option<&(dyn InputDescriptor<'a> + 'a)> {
    self.inputs.get(stream_id).map(|d| &**d)
  }

  /// The output stream with `stream_id`.
  pub fn output_stream(&self, stream_id: &str) -> Option<&(dyn OutputDescriptor<'a> + 'a)> {
    self.outputs.get(stream_id).map(|d| &**d)
  }

  /// Ids of the input streams, in order.
  pub fn input_stream_ids(&self) -> impl Iterator<Item = &str> {
    self.inputs.keys().map(String::as_str)
  }

  /// Ids of the output streams, in order.
  pub fn output_stream_ids(&self) -> impl Iterator<Item = &str> {
    self.outputs.keys().map(String::as_str)
  }

  /// Ids of every stream, inputs and outputs together, sorted.
  pub fn stream_ids(&self) -> Vec<&str> {
    let mut ids: Vec<&str> = self.input_stream_ids().chain(self.output_stream_ids()).collect();
    ids.sort_unstable();
    ids
  }

  /// Compiles every registered descriptor into one configuration map.
  ///
  /// The result only depends on the declarations, not on the order they were
  /// added in.
  pub fn to_config(&self) -> Config {
    let mut config: Config = self
      .job_configs
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
      .collect();
    config.insert(keys::JOB_NAME, self.name.as_str());
    if let Some(job_id) = &self.job_id {
      config.insert(keys::JOB_ID, job_id.as_str());
    }
    if let Some(system) = self.default_system {
      config.insert(keys::JOB_DEFAULT_SYSTEM, system.system_name());
    }
    for system in self.systems.values() {
      config.extend(system.to_config());
    }
    for input in self.inputs.values() {
      config.extend(input.to_config());
    }
    for output in self.outputs.values() {
      config.extend(output.to_config());
    }
    if let Some(inputs) = self.task_inputs(&config) {
      config.insert(keys::TASK_INPUTS, inputs);
    }
    trace!(job = %self.name, entries = config.len(), "compiled job configuration");
    config
  }

  /// Compiles the job and lets `external` override any generated entry.
  ///
  /// Entries derived from a stream's system or physical name follow an
  /// external override of either: `task.inputs` is rebuilt from the merged
  /// map, and per-stream system entries (`systems.<Y>.streams.<P>.*`) are
  /// copied to the overridden name. Entries under the old name stay in place.
  pub fn to_config_with_overrides(&self, external: &Config) -> Config {
    let mut config = self.to_config().with_overrides(external);
    let streams = self
      .inputs
      .values()
      .map(|input| {
        (
          input.stream_id(),
          input.system_name(),
          input.physical_name(),
          input.to_config(),
        )
      })
      .chain(self.outputs.values().map(|output| {
        (
          output.stream_id(),
          output.system_name(),
          output.physical_name(),
          output.to_config(),
        )
      }));
    for (stream_id, system, physical_name, generated) in streams {
      follow_renamed_stream(&mut config, external, stream_id, system, physical_name, &generated);
    }
    if !external.contains_key(keys::TASK_INPUTS) {
      if let Some(inputs) = self.task_inputs(&config) {
        config.insert(keys::TASK_INPUTS, inputs);
      }
    }
    config
  }

  /// `<system>.<physical name>` of every input as resolved in `config`,
  /// ordered by stream id.
  fn task_inputs(&self, config: &Config) -> Option<String> {
    if self.inputs.is_empty() {
      return None;
    }
    let inputs = self
      .inputs
      .iter()
      .map(|(stream_id, input)| {
        let system = config
          .get(&keys::stream_system(stream_id))
          .unwrap_or(input.system_name());
        let physical_name = config
          .get(&keys::stream_physical_name(stream_id))
          .unwrap_or(input.physical_name());
        format!("{system}.{physical_name}")
      })
      .collect::<Vec<_>>()
      .join(",");
    Some(inputs)
  }
}

/// Copies the `systems.<Y>.streams.<P>.*` entries a stream generated to the
/// system and physical name the merged map now resolves it to.
fn follow_renamed_stream(
  config: &mut Config,
  external: &Config,
  stream_id: &str,
  system: &str,
  physical_name: &str,
  generated: &Config,
) {
  let resolved_system = config
    .get(&keys::stream_system(stream_id))
    .unwrap_or(system)
    .to_string();
  let resolved_physical = config
    .get(&keys::stream_physical_name(stream_id))
    .unwrap_or(physical_name)
    .to_string();
  if resolved_system == system && resolved_physical == physical_name {
    return;
  }
  for (key, _) in generated.subset(&keys::system_stream_prefix(system, physical_name)) {
    let target = keys::system_stream_config(&resolved_system, &resolved_physical, &key);
    if external.contains_key(&target) {
      continue;
    }
    let value = config
      .get(&keys::system_stream_config(system, physical_name, &key))
      .map(str::to_string);
    if let Some(value) = value {
      config.insert(target, value);
    }
  }
  debug!(
    stream = %stream_id,
    system = %resolved_system,
    physical = %resolved_physical,
    "stream renamed by external configuration"
  );
}

impl fmt::Debug for JobDescriptor<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JobDescriptor")
      .field("name", &self.name)
      .field("job_id", &self.job_id)
      .field(
        "default_system",
        &self.default_system.map(|system| system.system_name()),
      )
      .field("systems", &self.systems.keys().collect::<Vec<_>>())
      .field("inputs", &self.inputs.keys().collect::<Vec<_>>())
      .field("outputs", &self.outputs.keys().collect::<Vec<_>>())
      .finish()
  }
}
