//! # Kafka Descriptors
//!
//! Typed descriptors for a Kafka system. On top of the raw overlays every
//! descriptor has, they expose the consumer and producer properties a Kafka
//! job usually sets, so those no longer have to be spelled as raw keys.
//!
//! Typed values are written after the raw overlays and therefore win over a
//! raw entry for the same key. External configuration still overrides both.
//!
//! ```rust
//! use streamweave_descriptors::kafka::KafkaSystemDescriptor;
//! use streamweave_descriptors::offset::OffsetType;
//! use streamweave_descriptors::provider::SimpleInputDescriptorProvider;
//! use streamweave_descriptors::serdes::StringSerde;
//! use streamweave_descriptors::stream::{InputDescriptor, StreamDescriptor};
//! use streamweave_descriptors::system::SystemDescriptor;
//!
//! let mut kafka = KafkaSystemDescriptor::new("kafka")?;
//! kafka
//!   .with_consumer_zk_connect(["zk-1:2181", "zk-2:2181"])
//!   .with_producer_bootstrap_servers(["broker-1:9092"]);
//!
//! let mut page_views = kafka.get_input_descriptor("page-views", StringSerde)?;
//! page_views
//!   .with_consumer_auto_offset_reset("smallest")
//!   .with_offset_default(OffsetType::Oldest);
//!
//! let config = kafka.to_config();
//! assert_eq!(config.get("systems.kafka.consumer.zookeeper.connect"), Some("zk-1:2181,zk-2:2181"));
//! assert_eq!(
//!   page_views.to_config().get("systems.kafka.streams.page-views.consumer.auto.offset.reset"),
//!   Some("smallest")
//! );
//! # Ok::<(), streamweave_descriptors::error::DescriptorError>(())
//! ```

use crate::config::Config;
use crate::error::DescriptorError;
use crate::keys;
use crate::provider::{OutputDescriptorProvider, SimpleInputDescriptorProvider};
use crate::serdes::Serde;
use crate::stream::{
  InputDescriptor, InputSettings, OutputDescriptor, StreamDescriptor, StreamDescriptorCore,
};
use crate::system::{SystemDescriptor, SystemDescriptorCore};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Connector factory the runtime uses for Kafka systems.
pub const KAFKA_FACTORY_CLASS_NAME: &str = "org.apache.samza.system.kafka.KafkaSystemFactory";

const CONSUMER_ZK_CONNECT: &str = "consumer.zookeeper.connect";
const CONSUMER_AUTO_OFFSET_RESET: &str = "consumer.auto.offset.reset";
const CONSUMER_FETCH_MESSAGE_MAX_BYTES: &str = "consumer.fetch.message.max.bytes";
const FETCH_THRESHOLD: &str = "samza.fetch.threshold";
const FETCH_THRESHOLD_BYTES: &str = "samza.fetch.threshold.bytes";
const PRODUCER_BOOTSTRAP_SERVERS: &str = "producer.bootstrap.servers";

/// A Kafka cluster.
#[derive(Debug)]
pub struct KafkaSystemDescriptor {
  core: SystemDescriptorCore,
  consumer_zk_connect: Vec<String>,
  consumer_auto_offset_reset: Option<String>,
  consumer_fetch_threshold: Option<u32>,
  consumer_fetch_threshold_bytes: Option<u64>,
  consumer_fetch_message_max_bytes: Option<u32>,
  consumer_configs: BTreeMap<String, String>,
  producer_bootstrap_servers: Vec<String>,
  producer_configs: BTreeMap<String, String>,
}

impl KafkaSystemDescriptor {
  /// Creates a Kafka system descriptor using [`KAFKA_FACTORY_CLASS_NAME`].
  ///
  /// # Errors
  ///
  /// Fails if the system name is empty or not a single key segment.
  pub fn new(system_name: impl Into<String>) -> Result<Self, DescriptorError> {
    Ok(Self {
      core: SystemDescriptorCore::new(system_name, KAFKA_FACTORY_CLASS_NAME)?,
      consumer_zk_connect: Vec::new(),
      consumer_auto_offset_reset: None,
      consumer_fetch_threshold: None,
      consumer_fetch_threshold_bytes: None,
      consumer_fetch_message_max_bytes: None,
      consumer_configs: BTreeMap::new(),
      producer_bootstrap_servers: Vec::new(),
      producer_configs: BTreeMap::new(),
    })
  }

  /// Sets the serde streams of this system fall back to when the runtime
  /// creates streams that have no descriptor, such as intermediate streams.
  pub fn with_default_serde<T>(&mut self, serde: &impl Serde<T>) -> &mut Self {
    self.core.set_default_serde(serde.serde_names());
    self
  }

  /// ZooKeeper hosts the consumer coordinates through.
  pub fn with_consumer_zk_connect<I, S>(&mut self, hosts: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.consumer_zk_connect = hosts.into_iter().map(Into::into).collect();
    self
  }

  /// What the consumer does when it has no valid offset, for every stream.
  pub fn with_consumer_auto_offset_reset(&mut self, reset: impl Into<String>) -> &mut Self {
    self.consumer_auto_offset_reset = Some(reset.into());
    self
  }

  /// Maximum number of buffered messages across all partitions.
  pub fn with_consumer_fetch_threshold(&mut self, messages: u32) -> &mut Self {
    self.consumer_fetch_threshold = Some(messages);
    self
  }

  /// Maximum number of buffered bytes across all partitions.
  pub fn with_consumer_fetch_threshold_bytes(&mut self, bytes: u64) -> &mut Self {
    self.consumer_fetch_threshold_bytes = Some(bytes);
    self
  }

  /// Maximum message size fetched from any partition.
  pub fn with_consumer_fetch_message_max_bytes(&mut self, bytes: u32) -> &mut Self {
    self.consumer_fetch_message_max_bytes = Some(bytes);
    self
  }

  /// Raw consumer properties (`systems.<name>.consumer.<key>`).
  pub fn with_consumer_configs<I, K, V>(&mut self, configs: I) -> &mut Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .consumer_configs
      .extend(configs.into_iter().map(|(k, v)| (k.into(), v.into())));
    self
  }

  /// Brokers the producer bootstraps from.
  pub fn with_producer_bootstrap_servers<I, S>(&mut self, servers: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.producer_bootstrap_servers = servers.into_iter().map(Into::into).collect();
    self
  }

  /// Raw producer properties (`systems.<name>.producer.<key>`).
  pub fn with_producer_configs<I, K, V>(&mut self, configs: I) -> &mut Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .producer_configs
      .extend(configs.into_iter().map(|(k, v)| (k.into(), v.into())));
    self
  }
}

impl SystemDescriptor for KafkaSystemDescriptor {
  fn core(&self) -> &SystemDescriptorCore {
    &self.core
  }

  fn core_mut(&mut self) -> &mut SystemDescriptorCore {
    &mut self.core
  }

  fn to_config(&self) -> Config {
    let name = self.core.system_name();
    let mut config = self.core.to_config();
    for (key, value) in &self.consumer_configs {
      config.insert(keys::system_config(name, &format!("consumer.{key}")), value.as_str());
    }
    for (key, value) in &self.producer_configs {
      config.insert(keys::system_config(name, &format!("producer.{key}")), value.as_str());
    }
    if !self.consumer_zk_connect.is_empty() {
      config.insert(
        keys::system_config(name, CONSUMER_ZK_CONNECT),
        self.consumer_zk_connect.join(","),
      );
    }
    if let Some(reset) = &self.consumer_auto_offset_reset {
      config.insert(keys::system_config(name, CONSUMER_AUTO_OFFSET_RESET), reset.as_str());
    }
    if let Some(threshold) = self.consumer_fetch_threshold {
      config.insert(keys::system_config(name, FETCH_THRESHOLD), threshold.to_string());
    }
    if let Some(bytes) = self.consumer_fetch_threshold_bytes {
      config.insert(keys::system_config(name, FETCH_THRESHOLD_BYTES), bytes.to_string());
    }
    if let Some(bytes) = self.consumer_fetch_message_max_bytes {
      config.insert(
        keys::system_config(name, CONSUMER_FETCH_MESSAGE_MAX_BYTES),
        bytes.to_string(),
      );
    }
    if !self.producer_bootstrap_servers.is_empty() {
      config.insert(
        keys::system_config(name, PRODUCER_BOOTSTRAP_SERVERS),
        self.producer_bootstrap_servers.join(","),
      );
    }
    config
  }
}

impl SimpleInputDescriptorProvider for KafkaSystemDescriptor {
  type Input<'a, M: 'static>
    = KafkaInputDescriptor<'a, M>
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
    let serde: Arc<dyn Serde<M>> = Arc::new(serde);
    let core = StreamDescriptorCore::new(stream_id, self, serde.serde_names())?;
    debug!(stream = %core.stream_id(), system = %core.system_name(), "created kafka input descriptor");
    Ok(KafkaInputDescriptor {
      core,
      input: InputSettings::default(),
      serde,
      consumer_auto_offset_reset: None,
      consumer_fetch_message_max_bytes: None,
    })
  }
}

impl OutputDescriptorProvider for KafkaSystemDescriptor {
  type Output<'a, M: 'static>
    = KafkaOutputDescriptor<'a, M>
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
    let serde: Arc<dyn Serde<M>> = Arc::new(serde);
    let core = StreamDescriptorCore::new(stream_id, self, serde.serde_names())?;
    debug!(stream = %core.stream_id(), system = %core.system_name(), "created kafka output descriptor");
    Ok(KafkaOutputDescriptor { core, serde })
  }
}

/// An input topic of a [`KafkaSystemDescriptor`].
pub struct KafkaInputDescriptor<'a, M> {
  core: StreamDescriptorCore<'a>,
  input: InputSettings,
  serde: Arc<dyn Serde<M>>,
  consumer_auto_offset_reset: Option<String>,
  consumer_fetch_message_max_bytes: Option<u32>,
}

impl<M: 'static> KafkaInputDescriptor<'_, M> {
  /// The serde of this topic's messages.
  pub fn serde(&self) -> &Arc<dyn Serde<M>> {
    &self.serde
  }

  /// What the consumer does when it has no valid offset for this topic.
  pub fn with_consumer_auto_offset_reset(&mut self, reset: impl Into<String>) -> &mut Self {
    self.consumer_auto_offset_reset = Some(reset.into());
    self
  }

  /// Maximum message size fetched from any partition of this topic.
  pub fn with_consumer_fetch_message_max_bytes(&mut self, bytes: u32) -> &mut Self {
    self.consumer_fetch_message_max_bytes = Some(bytes);
    self
  }
}

impl<'a, M: 'static> StreamDescriptor<'a> for KafkaInputDescriptor<'a, M> {
  fn core(&self) -> &StreamDescriptorCore<'a> {
    &self.core
  }

  fn core_mut(&mut self) -> &mut StreamDescriptorCore<'a> {
    &mut self.core
  }

  /// Per-topic consumer properties are keyed by physical name under the
  /// system namespace, where the Kafka consumer looks them up.
  fn to_config(&self) -> Config {
    let mut config = self.input_config();
    let system = self.core.system_name();
    let topic = self.core.physical_name();
    if let Some(reset) = &self.consumer_auto_offset_reset {
      config.insert(
        keys::system_stream_config(system, topic, CONSUMER_AUTO_OFFSET_RESET),
        reset.as_str(),
      );
    }
    if let Some(bytes) = self.consumer_fetch_message_max_bytes {
      config.insert(
        keys::system_stream_config(system, topic, CONSUMER_FETCH_MESSAGE_MAX_BYTES),
        bytes.to_string(),
      );
    }
    config
  }
}

impl<'a, M: 'static> InputDescriptor<'a> for KafkaInputDescriptor<'a, M> {
  fn input_settings(&self) -> &InputSettings {
    &self.input
  }

  fn input_settings_mut(&mut self) -> &mut InputSettings {
    &mut self.input
  }
}

impl<M> fmt::Debug for KafkaInputDescriptor<'_, M> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("KafkaInputDescriptor")
      .field("core", &self.core)
      .field("input", &self.input)
      .field("consumer_auto_offset_reset", &self.consumer_auto_offset_reset)
      .field(
        "consumer_fetch_message_max_bytes",
        &self.consumer_fetch_message_max_bytes,
      )
      .finish_non_exhaustive()
  }
}

/// An output topic of a [`KafkaSystemDescriptor`].
pub struct KafkaOutputDescriptor<'a, M> {
  core: StreamDescriptorCore<'a>,
  serde: Arc<dyn Serde<M>>,
}

impl<M: 'static> KafkaOutputDescriptor<'_, M> {
  /// The serde of this topic's messages.
  pub fn serde(&self) -> &Arc<dyn Serde<M>> {
    &self.serde
  }
}

impl<'a, M: 'static> StreamDescriptor<'a> for KafkaOutputDescriptor<'a, M> {
  fn core(&self) -> &StreamDescriptorCore<'a> {
    &self.core
  }

  fn core_mut(&mut self) -> &mut StreamDescriptorCore<'a> {
    &mut self.core
  }
}

impl<'a, M: 'static> OutputDescriptor<'a> for KafkaOutputDescriptor<'a, M> {}

impl<M> fmt::Debug for KafkaOutputDescriptor<'_, M> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("KafkaOutputDescriptor")
      .field("core", &self.core)
      .finish_non_exhaustive()
  }
}
