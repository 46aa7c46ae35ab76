//! # Error Types
//!
//! Errors raised while declaring descriptors and while reading compiled
//! configuration back.
//!
//! Every [`DescriptorError`] is returned by the constructor or mutator that
//! detected the problem, so a malformed descriptor is reported at the call site
//! that built it and never later, when the job configuration is compiled.
//! None of them are retryable: they are programming or configuration mistakes.

use std::fmt;
use thiserror::Error;

/// The kind of identifier a validation error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
  /// Name of an external system.
  SystemName,
  /// Opaque identifier of the connector factory for a system.
  FactoryClassName,
  /// Logical id of a stream within a job.
  StreamId,
  /// Wire-level name of a stream in the real system.
  PhysicalName,
  /// Name of the job being assembled.
  JobName,
  /// Instance id of the job being assembled.
  JobId,
}

impl IdentifierKind {
  /// Returns a human readable label for this identifier kind.
  pub fn as_str(self) -> &'static str {
    match self {
      IdentifierKind::SystemName => "system name",
      IdentifierKind::FactoryClassName => "factory class name",
      IdentifierKind::StreamId => "stream id",
      IdentifierKind::PhysicalName => "physical name",
      IdentifierKind::JobName => "job name",
      IdentifierKind::JobId => "job id",
    }
  }
}

impl fmt::Display for IdentifierKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error raised when a descriptor is constructed, mutated or registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
  /// A required identifier was empty.
  #[error("{kind} must not be empty")]
  EmptyIdentifier {
    /// Which identifier was empty.
    kind: IdentifierKind,
  },
  /// An identifier contained characters that would break key namespacing.
  #[error("invalid {kind} '{value}': only ASCII letters, digits, '_' and '-' are allowed")]
  InvalidIdentifier {
    /// Which identifier was rejected.
    kind: IdentifierKind,
    /// The rejected value.
    value: String,
  },
  /// Two distinct system descriptor instances share one system name.
  #[error("system '{0}' is already registered by a different system descriptor")]
  DuplicateSystem(String),
  /// A stream id was registered twice in the same job.
  #[error("stream '{0}' is already registered in this job")]
  DuplicateStream(String),
}

/// Error raised while parsing or resolving a configuration map.
#[derive(Error, Debug)]
pub enum ConfigError {
  /// A line of properties text could not be parsed.
  #[error("line {line}: {message}")]
  Parse {
    /// One-based line number.
    line: usize,
    /// What was wrong with the line.
    message: String,
  },
  /// JSON input could not be decoded or encoded.
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
  /// No system is configured for a stream and no default system exists.
  #[error("no system configured for stream '{stream_id}'")]
  MissingSystem {
    /// The stream being resolved.
    stream_id: String,
  },
  /// Neither the stream nor its system configures a serde.
  #[error("no {which} serde configured for stream '{stream_id}'")]
  MissingSerde {
    /// The stream being resolved.
    stream_id: String,
    /// `key` or `msg`.
    which: &'static str,
  },
  /// A value could not be interpreted as the requested type.
  #[error("invalid value '{value}' for key '{key}'")]
  InvalidValue {
    /// The configuration key.
    key: String,
    /// The offending value.
    value: String,
  },
}
