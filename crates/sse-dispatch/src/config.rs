//! Decoder configuration

use serde::{Deserialize, Serialize};

/// Event type used when a stream does not name one
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// Tunables for a single decode run
///
/// Every field has a default, so the struct can be embedded in a larger
/// TOML or YAML configuration and only the overrides need to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Event type for events without an `event:` line, and the fallback handler key
    pub default_event_type: String,
    /// Try to parse each payload as JSON before falling back to text
    pub parse_json: bool,
    /// Drop a leading U+FEFF byte-order mark at the start of the stream
    pub strip_bom: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            default_event_type: DEFAULT_EVENT_TYPE.to_string(),
            parse_json: true,
            strip_bom: true,
        }
    }
}

impl DecoderConfig {
    /// Configuration that delivers every payload as raw text
    pub fn raw_text() -> Self {
        Self {
            parse_json: false,
            ..Self::default()
        }
    }

    /// Override the default event type
    pub fn with_default_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.default_event_type = event_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.default_event_type, "message");
        assert!(config.parse_json);
        assert!(config.strip_bom);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DecoderConfig = toml::from_str("parse_json = false").unwrap();
        assert!(!config.parse_json);
        assert_eq!(config.default_event_type, DEFAULT_EVENT_TYPE);
        assert!(config.strip_bom);
    }

    #[test]
    fn test_nested_in_caller_config() {
        #[derive(Deserialize)]
        struct AppConfig {
            events: DecoderConfig,
        }

        let app: AppConfig = toml::from_str(
            r#"
            [events]
            default_event_type = "update"
            "#,
        )
        .unwrap();
        assert_eq!(app.events, DecoderConfig::default().with_default_event_type("update"));
    }
}
