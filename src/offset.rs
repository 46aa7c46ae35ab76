//! Starting offsets for input streams.
//!
//! When an input has no checkpoint, or its checkpoint is reset, the runtime
//! starts from the stream's offset default.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Where to start consuming an input stream that has no usable checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OffsetType {
  /// Start from the oldest message still retained.
  Oldest,
  /// Start from the next message written after the job starts.
  #[default]
  Upcoming,
}

impl OffsetType {
  /// The configuration value for this offset type.
  pub fn as_str(self) -> &'static str {
    match self {
      OffsetType::Oldest => "oldest",
      OffsetType::Upcoming => "upcoming",
    }
  }
}

impl Display for OffsetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error returned when parsing an unknown offset type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown offset type '{0}', expected 'oldest' or 'upcoming'")]
pub struct ParseOffsetTypeError(pub String);

impl FromStr for OffsetType {
  type Err = ParseOffsetTypeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "oldest" => Ok(OffsetType::Oldest),
      "upcoming" => Ok(OffsetType::Upcoming),
      _ => Err(ParseOffsetTypeError(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_offset_type_default_is_upcoming() {
    assert_eq!(OffsetType::default(), OffsetType::Upcoming);
  }

  #[test]
  fn test_offset_type_parse() {
    assert_eq!("oldest".parse::<OffsetType>(), Ok(OffsetType::Oldest));
    assert_eq!(" Upcoming ".parse::<OffsetType>(), Ok(OffsetType::Upcoming));
    assert_eq!(
      "earliest".parse::<OffsetType>(),
      Err(ParseOffsetTypeError("earliest".to_string()))
    );
  }

  #[test]
  fn test_offset_type_display_matches_config_value() {
    assert_eq!(OffsetType::Oldest.to_string(), "oldest");
    assert_eq!(
      serde_json::to_string(&OffsetType::Upcoming).unwrap(),
      "\"upcoming\""
    );
  }
}
