//! Identifier validation shared by all descriptors.

use crate::error::{DescriptorError, IdentifierKind};

/// Checks that an identifier is present.
pub fn require_non_empty(kind: IdentifierKind, value: &str) -> Result<(), DescriptorError> {
  if value.trim().is_empty() {
    return Err(DescriptorError::EmptyIdentifier { kind });
  }
  Ok(())
}

/// Checks that an identifier can be embedded as one segment of a dotted key.
///
/// System names and stream ids become `systems.<name>.` and `streams.<id>.`
/// prefixes, so a `.` or whitespace would let one entity's keys alias another's.
pub fn require_key_segment(kind: IdentifierKind, value: &str) -> Result<(), DescriptorError> {
  require_non_empty(kind, value)?;
  let valid = value
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
  if !valid {
    return Err(DescriptorError::InvalidIdentifier {
      kind,
      value: value.to_string(),
    });
  }
  Ok(())
}
