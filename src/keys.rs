//! Configuration key namespace.
//!
//! These keys are the wire contract with the runtime stream manager. System
//! entries live under `systems.<system>.`, stream entries under
//! `streams.<stream>.`, and the runtime resolves stream properties with
//! `systems.*` overridden by `streams.*`, which is in turn overridden by any
//! externally supplied configuration.

/// Name of the job.
pub const JOB_NAME: &str = "job.name";
/// Instance id of the job.
pub const JOB_ID: &str = "job.id";
/// System used for streams that do not name one.
pub const JOB_DEFAULT_SYSTEM: &str = "job.default.system";
/// Comma separated `<system>.<physical name>` list of all job inputs.
pub const TASK_INPUTS: &str = "task.inputs";

/// Prefix of every system-scoped key.
pub fn system_prefix(system: &str) -> String {
  format!("systems.{system}.")
}

/// Prefix of every stream-scoped key.
pub fn stream_prefix(stream_id: &str) -> String {
  format!("streams.{stream_id}.")
}

/// A raw system-level entry.
pub fn system_config(system: &str, key: &str) -> String {
  format!("systems.{system}.{key}")
}

/// The connector factory of a system.
pub fn system_factory(system: &str) -> String {
  format!("systems.{system}.samza.factory")
}

/// The default key serde of a system.
pub fn system_key_serde(system: &str) -> String {
  format!("systems.{system}.samza.key.serde")
}

/// The default message serde of a system.
pub fn system_msg_serde(system: &str) -> String {
  format!("systems.{system}.samza.msg.serde")
}

/// Prefix of system-level defaults that apply to every stream of the system.
pub fn default_stream_prefix(system: &str) -> String {
  format!("systems.{system}.default.stream.")
}

/// A system-level default for every stream of the system.
pub fn default_stream_config(system: &str, key: &str) -> String {
  format!("systems.{system}.default.stream.{key}")
}

/// Prefix of system-level entries for one physical stream.
pub fn system_stream_prefix(system: &str, physical_name: &str) -> String {
  format!("systems.{system}.streams.{physical_name}.")
}

/// A system-level entry for one physical stream.
pub fn system_stream_config(system: &str, physical_name: &str, key: &str) -> String {
  format!("systems.{system}.streams.{physical_name}.{key}")
}

/// A raw stream-level entry.
pub fn stream_config(stream_id: &str, key: &str) -> String {
  format!("streams.{stream_id}.{key}")
}

/// The system a stream belongs to.
pub fn stream_system(stream_id: &str) -> String {
  format!("streams.{stream_id}.samza.system")
}

/// The wire-level name of a stream.
pub fn stream_physical_name(stream_id: &str) -> String {
  format!("streams.{stream_id}.physical.name")
}

/// The key serde of a stream.
pub fn stream_key_serde(stream_id: &str) -> String {
  format!("streams.{stream_id}.samza.key.serde")
}

/// The message serde of a stream.
pub fn stream_msg_serde(stream_id: &str) -> String {
  format!("streams.{stream_id}.samza.msg.serde")
}

/// Stream property keys relative to a stream or default-stream prefix.
pub mod stream_property {
  /// Where to start consuming when no checkpoint exists.
  pub const OFFSET_DEFAULT: &str = "samza.offset.default";
  /// Ignore checkpoints and start from the offset default.
  pub const RESET_OFFSET: &str = "samza.reset.offset";
  /// Relative consumption priority.
  pub const PRIORITY: &str = "samza.priority";
  /// Fully consume the stream before processing other inputs.
  pub const BOOTSTRAP: &str = "samza.bootstrap";
  /// The stream has a finite end.
  pub const BOUNDED: &str = "samza.bounded";
  /// Delete messages once they are committed.
  pub const DELETE_COMMITTED_MESSAGES: &str = "samza.delete.committed.messages";
  /// See [`super::stream_key_serde`].
  pub const KEY_SERDE: &str = "samza.key.serde";
  /// See [`super::stream_msg_serde`].
  pub const MSG_SERDE: &str = "samza.msg.serde";
  /// See [`super::stream_system`].
  pub const SYSTEM: &str = "samza.system";
  /// See [`super::stream_physical_name`].
  pub const PHYSICAL_NAME: &str = "physical.name";
}
