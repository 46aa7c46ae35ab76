//! Capability contracts for minting stream descriptors.
//!
//! A system type implements only the providers it supports. Asking a system for
//! a kind of descriptor it does not advertise is rejected by the compiler, so
//! there is no runtime capability check.
//!
//! The descriptor types are generic associated types: each system hands out
//! its own concrete descriptors (typed Kafka inputs from a Kafka system,
//! generic inputs from a generic system), borrowing the system for `'a`.

use crate::error::DescriptorError;
use crate::serdes::Serde;
use crate::stream::{InputDescriptor, OutputDescriptor};
use crate::system::SystemDescriptor;

/// A system that can create input descriptors from a stream id and a serde.
pub trait SimpleInputDescriptorProvider: SystemDescriptor {
  /// The input descriptor type this system creates.
  type Input<'a, M: 'static>: InputDescriptor<'a>
  where
    Self: 'a;

  /// Creates an input descriptor for `stream_id` bound to this system.
  ///
  /// # Errors
  ///
  /// Fails if the stream id is empty or not a single key segment.
  fn get_input_descriptor<'a, M, S>(
    &'a self,
    stream_id: impl Into<String>,
    serde: S,
  ) -> Result<Self::Input<'a, M>, DescriptorError>
  where
    M: 'static,
    S: Serde<M> + 'static;
}

/// A system that can create output descriptors from a stream id and a serde.
pub trait OutputDescriptorProvider: SystemDescriptor {
  /// The output descriptor type this system creates.
  type Output<'a, M: 'static>: OutputDescriptor<'a>
  where
    Self: 'a;

  /// Creates an output descriptor for `stream_id` bound to this system.
  ///
  /// # Errors
  ///
  /// Fails if the stream id is empty or not a single key segment.
  fn get_output_descriptor<'a, M, S>(
    &'a self,
    stream_id: impl Into<String>,
    serde: S,
  ) -> Result<Self::Output<'a, M>, DescriptorError>
  where
    M: 'static,
    S: Serde<M> + 'static;
}
