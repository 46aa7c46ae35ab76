//! End-to-end job assembly: declare systems and streams, compile, load an
//! external override file and resolve the effective stream settings.

use streamweave_descriptors::config::Config;
use streamweave_descriptors::error::DescriptorError;
use streamweave_descriptors::generic::GenericSystemDescriptor;
use streamweave_descriptors::job::JobDescriptor;
use streamweave_descriptors::kafka::KafkaSystemDescriptor;
use streamweave_descriptors::offset::OffsetType;
use streamweave_descriptors::provider::{OutputDescriptorProvider, SimpleInputDescriptorProvider};
use streamweave_descriptors::serdes::{JsonSerde, KvSerde, StringSerde};
use streamweave_descriptors::stream::{InputDescriptor, StreamDescriptor};
use streamweave_descriptors::stream_config::StreamConfig;
use streamweave_descriptors::system::SystemDescriptor;

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_test_writer()
    .try_init();
}

#[test]
fn compiled_job_round_trips_through_external_overrides() {
  init_tracing();

  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka
    .with_consumer_zk_connect(["zk:2181"])
    .with_producer_bootstrap_servers(["broker:9092"])
    .with_default_serde(&KvSerde::of(StringSerde, JsonSerde::<serde_json::Value>::new()))
    .with_default_stream_offset_default(OffsetType::Upcoming);
  let mut hdfs = GenericSystemDescriptor::new("hdfs", "com.example.HdfsSystemFactory").unwrap();
  hdfs.with_system_configs([("producer.base.output.dir", "/tmp/out")]);

  let mut page_views = kafka.get_input_descriptor("page-views", StringSerde).unwrap();
  page_views
    .with_consumer_auto_offset_reset("smallest")
    .with_physical_name("PageViewEvent")
    .unwrap()
    .with_offset_default(OffsetType::Oldest)
    .with_bootstrap(true);
  let archive = hdfs.get_output_descriptor("archive", StringSerde).unwrap();

  let mut job = JobDescriptor::new("page-view-archiver").unwrap();
  job
    .with_default_system(&kafka)
    .unwrap()
    .add_input_stream(page_views)
    .unwrap()
    .add_output_stream(archive)
    .unwrap();

  let generated = job.to_config();
  assert_eq!(generated.get("task.inputs"), Some("kafka.PageViewEvent"));
  assert_eq!(
    generated.get("systems.hdfs.producer.base.output.dir"),
    Some("/tmp/out")
  );

  let external = Config::from_properties_str(
    "# deployment overrides\n\
     streams.page-views.samza.bootstrap=false\n\
     systems.kafka.producer.bootstrap.servers=prod-broker:9092\n",
  )
  .unwrap();
  let merged = job.to_config_with_overrides(&external);
  assert_eq!(merged.get("streams.page-views.samza.bootstrap"), Some("false"));
  assert_eq!(
    merged.get("systems.kafka.producer.bootstrap.servers"),
    Some("prod-broker:9092")
  );

  let reloaded = Config::from_json_str(&merged.to_json_string().unwrap()).unwrap();
  assert_eq!(reloaded, merged);

  let stream = StreamConfig::new(&reloaded, "page-views").unwrap();
  assert_eq!(stream.system_name(), "kafka");
  assert_eq!(stream.physical_name(), "PageViewEvent");
  assert_eq!(stream.offset_default().unwrap(), Some(OffsetType::Oldest));
  assert!(!stream.bootstrap().unwrap());
  assert_eq!(stream.key_serde().unwrap(), "noop");
  assert_eq!(stream.msg_serde().unwrap(), "string");
  assert_eq!(
    stream.property("consumer.auto.offset.reset"),
    Some("smallest")
  );

  let archive = StreamConfig::new(&reloaded, "archive").unwrap();
  assert_eq!(archive.system_name(), "hdfs");
  assert_eq!(archive.offset_default().unwrap(), None);
}

#[test]
fn runtime_created_streams_fall_back_to_default_system() {
  init_tracing();

  let mut kafka = KafkaSystemDescriptor::new("kafka").unwrap();
  kafka
    .with_default_serde(&KvSerde::of(StringSerde, StringSerde))
    .with_default_stream_offset_default(OffsetType::Oldest);

  let mut job = JobDescriptor::new("repartitioner").unwrap();
  job.with_default_system(&kafka).unwrap();
  let config = job.to_config();

  let intermediate = StreamConfig::new(&config, "repartition-1").unwrap();
  assert_eq!(intermediate.system_name(), "kafka");
  assert_eq!(intermediate.physical_name(), "repartition-1");
  assert_eq!(intermediate.key_serde().unwrap(), "string");
  assert_eq!(intermediate.msg_serde().unwrap(), "string");
  assert_eq!(
    intermediate.offset_default().unwrap(),
    Some(OffsetType::Oldest)
  );
}

#[test]
fn conflicting_declarations_are_rejected_at_assembly() {
  init_tracing();

  let primary = GenericSystemDescriptor::new("events", "com.example.Factory").unwrap();
  let shadow = GenericSystemDescriptor::new("events", "com.example.Factory").unwrap();

  let mut job = JobDescriptor::new("conflicts").unwrap();
  job
    .add_input_stream(primary.get_input_descriptor("clicks", StringSerde).unwrap())
    .unwrap();

  assert_eq!(
    job
      .add_input_stream(primary.get_input_descriptor("clicks", StringSerde).unwrap())
      .unwrap_err(),
    DescriptorError::DuplicateStream("clicks".to_string())
  );
  assert_eq!(
    job
      .add_output_stream(shadow.get_output_descriptor("views", StringSerde).unwrap())
      .unwrap_err(),
    DescriptorError::DuplicateSystem("events".to_string())
  );
  assert_eq!(job.stream_ids(), vec!["clicks"]);
}
