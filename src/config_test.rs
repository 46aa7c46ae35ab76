//! # Config Test Suite
//!
//! Tests for the flat configuration map: accessors, prefix subsets, override
//! merging and the properties/JSON loaders.

use crate::config::Config;
use crate::error::ConfigError;
use proptest::prelude::*;

// ============================================================================
// Accessor Tests
// ============================================================================

#[test]
fn test_config_new_is_empty() {
  let config = Config::new();
  assert!(config.is_empty());
  assert_eq!(config.len(), 0);
  assert_eq!(config.get("job.name"), None);
}

#[test]
fn test_config_insert_returns_previous_value() {
  let mut config = Config::new();
  assert_eq!(config.insert("job.name", "first"), None);
  assert_eq!(config.insert("job.name", "second"), Some("first".to_string()));
  assert_eq!(config.get("job.name"), Some("second"));
  assert_eq!(config.len(), 1);
}

#[test]
fn test_config_remove() {
  let mut config: Config = [("a", "1"), ("b", "2")].into_iter().collect();
  assert_eq!(config.remove("a"), Some("1".to_string()));
  assert!(!config.contains_key("a"));
  assert!(config.contains_key("b"));
}

#[test]
fn test_config_get_bool() {
  let config: Config = [("yes", "true"), ("no", " FALSE "), ("bad", "maybe")]
    .into_iter()
    .collect();
  assert_eq!(config.get_bool("yes").unwrap(), Some(true));
  assert_eq!(config.get_bool("no").unwrap(), Some(false));
  assert_eq!(config.get_bool("missing").unwrap(), None);
  assert!(matches!(
    config.get_bool("bad"),
    Err(ConfigError::InvalidValue { ref key, ref value }) if key == "bad" && value == "maybe"
  ));
}

#[test]
fn test_config_get_i32() {
  let config: Config = [("priority", "7"), ("negative", "-3"), ("bad", "high")]
    .into_iter()
    .collect();
  assert_eq!(config.get_i32("priority").unwrap(), Some(7));
  assert_eq!(config.get_i32("negative").unwrap(), Some(-3));
  assert_eq!(config.get_i32("missing").unwrap(), None);
  assert!(config.get_i32("bad").is_err());
}

#[test]
fn test_config_iter_is_key_ordered() {
  let config: Config = [("c", "3"), ("a", "1"), ("b", "2")].into_iter().collect();
  let keys: Vec<&str> = config.iter().map(|(key, _)| key).collect();
  assert_eq!(keys, vec!["a", "b", "c"]);
}

// ============================================================================
// Subset Tests
// ============================================================================

#[test]
fn test_config_subset_strips_prefix() {
  let config: Config = [
    ("systems.kafka.samza.factory", "F"),
    ("systems.kafka.consumer.zookeeper.connect", "zk:2181"),
    ("systems.kafka2.samza.factory", "G"),
    ("streams.orders.samza.system", "kafka"),
  ]
  .into_iter()
  .collect();

  let subset = config.subset("systems.kafka.");
  assert_eq!(subset.len(), 2);
  assert_eq!(subset.get("samza.factory"), Some("F"));
  assert_eq!(subset.get("consumer.zookeeper.connect"), Some("zk:2181"));
}

#[test]
fn test_config_subset_skips_bare_prefix() {
  let config: Config = [("streams.", "x"), ("streams.a", "1")].into_iter().collect();
  let subset = config.subset("streams.");
  assert_eq!(subset.len(), 1);
  assert_eq!(subset.get("a"), Some("1"));
}

// ============================================================================
// Override Tests
// ============================================================================

#[test]
fn test_config_merge_overrides_external_wins() {
  let mut generated: Config = [("streams.orders.physical.name", "orders"), ("job.name", "j")]
    .into_iter()
    .collect();
  let external: Config = [("streams.orders.physical.name", "orders-v2"), ("extra", "1")]
    .into_iter()
    .collect();

  generated.merge_overrides(&external);
  assert_eq!(generated.get("streams.orders.physical.name"), Some("orders-v2"));
  assert_eq!(generated.get("job.name"), Some("j"));
  assert_eq!(generated.get("extra"), Some("1"));
}

#[test]
fn test_config_with_overrides_is_consuming_merge() {
  let generated: Config = [("a", "1")].into_iter().collect();
  let external: Config = [("a", "2")].into_iter().collect();
  let merged = generated.clone().with_overrides(&external);
  assert_eq!(merged.get("a"), Some("2"));
  assert_eq!(generated.get("a"), Some("1"));
}

// ============================================================================
// Loader Tests
// ============================================================================

#[test]
fn test_config_from_properties_str() {
  let text = "\
# job settings
job.name = page-view-counter
! legacy comment

streams.page-views.physical.name:PageViewEvent
systems.kafka.producer.bootstrap.servers=b1:9092,b2:9092
";
  let config = Config::from_properties_str(text).unwrap();
  assert_eq!(config.len(), 3);
  assert_eq!(config.get("job.name"), Some("page-view-counter"));
  assert_eq!(
    config.get("streams.page-views.physical.name"),
    Some("PageViewEvent")
  );
  assert_eq!(
    config.get("systems.kafka.producer.bootstrap.servers"),
    Some("b1:9092,b2:9092")
  );
}

#[test]
fn test_config_from_properties_str_splits_on_first_separator() {
  let config = Config::from_properties_str("systems.kafka.url=http://host:80").unwrap();
  assert_eq!(config.get("systems.kafka.url"), Some("http://host:80"));
}

#[test]
fn test_config_from_properties_str_later_lines_win() {
  let config = Config::from_properties_str("a=1\na=2\n").unwrap();
  assert_eq!(config.get("a"), Some("2"));
}

#[test]
fn test_config_from_properties_str_rejects_missing_separator() {
  let err = Config::from_properties_str("a=1\njust-a-key\n").unwrap_err();
  assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
}

#[test]
fn test_config_from_properties_str_rejects_empty_key() {
  let err = Config::from_properties_str(" = value").unwrap_err();
  assert!(matches!(err, ConfigError::Parse { line: 1, .. }));
}

#[test]
fn test_config_properties_text_reloads() {
  let config: Config = [("job.name", "j"), ("streams.s.physical.name", "S")]
    .into_iter()
    .collect();
  let reloaded = Config::from_properties_str(&config.to_properties_string()).unwrap();
  assert_eq!(reloaded, config);
}

#[test]
fn test_config_from_json_str() {
  let config =
    Config::from_json_str(r#"{"job.name": "j", "streams.s.samza.system": "kafka"}"#).unwrap();
  assert_eq!(config.get("job.name"), Some("j"));
  assert_eq!(config.get("streams.s.samza.system"), Some("kafka"));
}

#[test]
fn test_config_from_json_str_rejects_non_string_values() {
  let err = Config::from_json_str(r#"{"job.name": 5}"#).unwrap_err();
  assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_config_to_json_string_is_flat_object() {
  let config: Config = [("b", "2"), ("a", "1")].into_iter().collect();
  let json = config.to_json_string().unwrap();
  let value: serde_json::Value = serde_json::from_str(&json).unwrap();
  assert_eq!(value, serde_json::json!({"a": "1", "b": "2"}));
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
  #[test]
  fn prop_merge_overrides_right_side_wins(
    base in prop::collection::btree_map("[a-z]{1,3}", "[a-z0-9]{0,4}", 0..16),
    overrides in prop::collection::btree_map("[a-z]{1,3}", "[a-z0-9]{0,4}", 0..16),
  ) {
    let merged = Config::from(base.clone()).with_overrides(&Config::from(overrides.clone()));
    for (key, value) in &overrides {
      prop_assert_eq!(merged.get(key), Some(value.as_str()));
    }
    for (key, value) in &base {
      if !overrides.contains_key(key) {
        prop_assert_eq!(merged.get(key), Some(value.as_str()));
      }
    }
  }

  #[test]
  fn prop_insert_last_write_wins(
    key in "[a-z.]{1,8}",
    values in prop::collection::vec("[a-z0-9]{0,6}", 1..8),
  ) {
    let mut config = Config::new();
    for value in &values {
      config.insert(key.as_str(), value.as_str());
    }
    prop_assert_eq!(config.get(&key), values.last().map(String::as_str));
    prop_assert_eq!(config.len(), 1);
  }
}
