//! # StreamWeave Descriptors
//!
//! Type-safe descriptors for the external systems and streams of a stream
//! processing job.
//!
//! A job declares its systems (a Kafka cluster, a change feed, ...) and the
//! input and output streams it reads from and writes to. Every declaration is
//! validated when it is made, and the whole job compiles into one flat
//! `key -> value` [`Config`] that the runtime stream manager consumes.
//!
//! ## Key Features
//!
//! - **Typed Streams**: every stream carries the serde of its message type
//! - **Capability Traits**: a system only mints the descriptors it supports
//! - **Borrowed Systems**: streams borrow their system, so it always outlives them
//! - **Fixed Precedence**: `systems.*` < `streams.*` < external configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use streamweave_descriptors::generic::GenericSystemDescriptor;
//! use streamweave_descriptors::job::JobDescriptor;
//! use streamweave_descriptors::provider::SimpleInputDescriptorProvider;
//! use streamweave_descriptors::serdes::StringSerde;
//!
//! let kafka = GenericSystemDescriptor::new("kafka", "com.example.KafkaFactory")?;
//! let mut job = JobDescriptor::new("word-count")?;
//! job.add_input_stream(kafka.get_input_descriptor("lines", StringSerde)?)?;
//!
//! let config = job.to_config();
//! assert_eq!(config.get("task.inputs"), Some("kafka.lines"));
//! # Ok::<(), streamweave_descriptors::error::DescriptorError>(())
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Flat configuration map and its loaders.
pub mod config;
/// Error types for descriptors and configuration.
pub mod error;
/// Descriptors for systems without a dedicated descriptor type.
pub mod generic;
/// Job assembler compiling descriptors into configuration.
pub mod job;
/// Typed Kafka system and stream descriptors.
pub mod kafka;
/// Configuration key namespace.
pub mod keys;
/// Offset defaults for input streams.
pub mod offset;
/// Capability traits for minting stream descriptors.
pub mod provider;
/// Serde capability and built-in serdes.
pub mod serdes;
/// Stream descriptor core and traits.
pub mod stream;
/// Resolved per-stream view of a compiled configuration.
pub mod stream_config;
/// System descriptor core and trait.
pub mod system;
/// Identifier validation.
pub mod validation;

pub use config::Config;
pub use error::{ConfigError, DescriptorError};
pub use job::JobDescriptor;
pub use stream::{InputDescriptor, OutputDescriptor, StreamDescriptor};
pub use system::SystemDescriptor;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod kafka_test;
