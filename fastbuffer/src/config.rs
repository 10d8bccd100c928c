//! Buffer construction settings read from JSON
//!
//! ```json
//! {"initial_capacity": 128}
//! ```
//!
//! Missing fields take their defaults. The capacity is signed on purpose:
//! a negative value is rejected when the buffer is built, not silently
//! wrapped while parsing.

use serde::Deserialize;

use crate::buffer::DEFAULT_CAPACITY;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    pub initial_capacity: i64,
}

impl Default for BufferConfig {
    #[allow(clippy::cast_possible_wrap)]
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY as i64,
        }
    }
}

impl BufferConfig {
    /// Parses a `BufferConfig` from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, has unknown fields or a
    /// field of the wrong type.
    pub fn from_json_str(json: &str) -> Result<BufferConfig, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse buffer config JSON: {e}"))
    }

    /// Reads a `BufferConfig` as JSON from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are I/O errors reading from the provided reader
    /// - The JSON input is invalid or malformed
    pub fn from_reader(reader: impl std::io::Read) -> Result<BufferConfig, String> {
        serde_json::from_reader(reader)
            .map_err(|e| format!("Failed to read buffer config JSON: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BufferConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BufferConfig::default());
        assert_eq!(config.initial_capacity, 64);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = BufferConfig::from_json_str(r#"{"capacity": 3}"#).unwrap_err();
        assert!(err.starts_with("Failed to parse buffer config JSON"));
    }

    #[test]
    fn test_negative_capacity_parses() {
        let config = BufferConfig::from_json_str(r#"{"initial_capacity": -5}"#).unwrap();
        assert_eq!(config.initial_capacity, -5);
    }
}
