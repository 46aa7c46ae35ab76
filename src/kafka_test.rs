//! # Kafka Descriptor Test Suite
//!
//! Tests for the typed Kafka system, input and output descriptors.

use crate::kafka::{KAFKA_FACTORY_CLASS_NAME, KafkaInputDescriptor, KafkaSystemDescriptor};
use crate::offset::OffsetType;
use crate::provider::{OutputDescriptorProvider, SimpleInputDescriptorProvider};
use crate::serdes::{ByteSerde, JsonSerde, KvSerde, Serde, StringSerde};
use crate::stream::{InputDescriptor, StreamDescriptor};
use crate::system::{SystemDescriptor, same_system};

// ============================================================================
// System Tests
// ============================================================================

#[test]
fn test_kafka_system_uses_kafka_factory() {
  let kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  assert_eq!(kafka.factory_class_name(), KAFKA_FACTORY_CLASS_NAME);
  assert_eq!(
    kafka.to_config().get("systems.kafka.samza.factory"),
    Some(KAFKA_FACTORY_CLASS_NAME)
  );
}

#[test]
fn test_kafka_system_rejects_invalid_name() {
  assert!(KafkaSystemDescriptor::new("").is_err());
  assert!(KafkaSystemDescriptor::new("kafka cluster").is_err());
}

#[test]
fn test_kafka_system_typed_properties() {
  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka
    .with_consumer_zk_connect(["zk-1:2181", "zk-2:2181"])
    .with_consumer_auto_offset_reset("largest")
    .with_consumer_fetch_threshold(50_000)
    .with_consumer_fetch_threshold_bytes(100_000_000)
    .with_consumer_fetch_message_max_bytes(1_048_576)
    .with_producer_bootstrap_servers(["broker-1:9092", "broker-2:9092"]);

  let config = kafka.to_config();
  assert_eq!(
    config.get("systems.kafka.consumer.zookeeper.connect"),
    Some("zk-1:2181,zk-2:2181")
  );
  assert_eq!(
    config.get("systems.kafka.consumer.auto.offset.reset"),
    Some("largest")
  );
  assert_eq!(config.get("systems.kafka.samza.fetch.threshold"), Some("50000"));
  assert_eq!(
    config.get("systems.kafka.samza.fetch.threshold.bytes"),
    Some("100000000")
  );
  assert_eq!(
    config.get("systems.kafka.consumer.fetch.message.max.bytes"),
    Some("1048576")
  );
  assert_eq!(
    config.get("systems.kafka.producer.bootstrap.servers"),
    Some("broker-1:9092,broker-2:9092")
  );
}

#[test]
fn test_kafka_system_unset_properties_not_emitted() {
  let kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  let config = kafka.to_config();
  assert_eq!(config.len(), 1);
}

#[test]
fn test_kafka_system_raw_consumer_and_producer_configs() {
  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka
    .with_consumer_configs([("socket.timeout.ms", "30000")])
    .with_producer_configs([("compression.type", "lz4")]);

  let config = kafka.to_config();
  assert_eq!(
    config.get("systems.kafka.consumer.socket.timeout.ms"),
    Some("30000")
  );
  assert_eq!(
    config.get("systems.kafka.producer.compression.type"),
    Some("lz4")
  );
}

#[test]
fn test_kafka_system_typed_beats_raw() {
  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka
    .with_consumer_configs([("auto.offset.reset", "smallest")])
    .with_producer_configs([("bootstrap.servers", "raw:9092")])
    .with_consumer_auto_offset_reset("largest")
    .with_producer_bootstrap_servers(["typed:9092"]);

  let config = kafka.to_config();
  assert_eq!(
    config.get("systems.kafka.consumer.auto.offset.reset"),
    Some("largest")
  );
  assert_eq!(
    config.get("systems.kafka.producer.bootstrap.servers"),
    Some("typed:9092")
  );
}

#[test]
fn test_kafka_system_default_serde() {
  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka.with_default_serde(&KvSerde::of(StringSerde, JsonSerde::<serde_json::Value>::new()));

  let names = kafka.default_serde().unwrap();
  assert_eq!(names.key, "string");
  assert_eq!(names.msg, "json");

  let config = kafka.to_config();
  assert_eq!(config.get("systems.kafka.samza.key.serde"), Some("string"));
  assert_eq!(config.get("systems.kafka.samza.msg.serde"), Some("json"));
}

#[test]
fn test_kafka_system_inherits_generic_overlays() {
  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka
    .with_system_configs([("samza.offset.reset", "false")])
    .with_default_stream_offset_default(OffsetType::Oldest)
    .with_consumer_fetch_threshold(10);

  let config = kafka.to_config();
  assert_eq!(config.get("systems.kafka.samza.offset.reset"), Some("false"));
  assert_eq!(
    config.get("systems.kafka.default.stream.samza.offset.default"),
    Some("oldest")
  );
  assert_eq!(config.get("systems.kafka.samza.fetch.threshold"), Some("10"));
}

// ============================================================================
// Input Descriptor Tests
// ============================================================================

#[test]
fn test_kafka_input_references_system() {
  let kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  let input = kafka.get_input_descriptor("page-views", StringSerde).unwrap();
  assert!(same_system(input.system(), &kafka));
  assert_eq!(input.serde().name(), "string");
}

#[test]
fn test_kafka_input_typed_properties_keyed_by_physical_name() {
  let kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  let mut input = kafka.get_input_descriptor("page-views", ByteSerde).unwrap();
  input
    .with_consumer_auto_offset_reset("smallest")
    .with_consumer_fetch_message_max_bytes(2048)
    .with_physical_name("PageViewEvent")
    .unwrap();

  let config = input.to_config();
  assert_eq!(
    config.get("systems.kafka.streams.PageViewEvent.consumer.auto.offset.reset"),
    Some("smallest")
  );
  assert_eq!(
    config.get("systems.kafka.streams.PageViewEvent.consumer.fetch.message.max.bytes"),
    Some("2048")
  );
  assert_eq!(
    config.get("streams.page-views.physical.name"),
    Some("PageViewEvent")
  );
}

#[test]
fn test_kafka_input_keeps_input_settings() {
  let kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  let mut input = kafka.get_input_descriptor("page-views", StringSerde).unwrap();
  let chained: &mut KafkaInputDescriptor<'_, String> = input
    .with_consumer_auto_offset_reset("smallest")
    .with_offset_default(OffsetType::Oldest)
    .with_bootstrap(true);
  assert!(chained.input_settings().bootstrap());

  let config = input.to_config();
  assert_eq!(
    config.get("streams.page-views.samza.offset.default"),
    Some("oldest")
  );
  assert_eq!(config.get("streams.page-views.samza.bootstrap"), Some("true"));
}

// ============================================================================
// Output Descriptor Tests
// ============================================================================

#[test]
fn test_kafka_output_to_config() {
  let kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  let mut output = kafka.get_output_descriptor("alerts", StringSerde).unwrap();
  output
    .with_physical_name("Alerts")
    .unwrap()
    .with_stream_configs([("replication.factor", "3")]);

  let config = output.to_config();
  assert_eq!(config.get("streams.alerts.samza.system"), Some("kafka"));
  assert_eq!(config.get("streams.alerts.physical.name"), Some("Alerts"));
  assert_eq!(config.get("streams.alerts.replication.factor"), Some("3"));
  assert_eq!(config.get("streams.alerts.samza.msg.serde"), Some("string"));
}
