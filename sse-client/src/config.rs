//! Node-level configuration, set once when the node instance is created and
//! shared by every subscription the node opens.

use crate::error::Error;
use serde::Deserialize;
use std::collections::HashMap;

/// How the node decodes event payloads before emitting them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Attempt to parse the payload as JSON, falling back to the raw string
    /// when parsing fails.
    Json,
    /// Pass the payload through untouched.
    #[default]
    Raw,
}

/// Configuration for one SSE client node instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    /// Named SSE event type every subscription on this node listens for.
    pub event: String,

    #[serde(default)]
    pub output: OutputMode,

    /// Default header set as a JSON-encoded object string, e.g.
    /// `{"Authorization": "Bearer ..."}`. Individual requests may override
    /// the whole set.
    #[serde(default)]
    pub headers: Option<String>,
}

impl NodeConfig {
    /// Parse the configured default header set.
    ///
    /// An absent or blank string means no default headers. A present but
    /// malformed string is a configuration error.
    pub fn default_headers(&self) -> Result<HashMap<String, String>, Error> {
        match &self.headers {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(raw)?),
            _ => Ok(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_headers_absent() {
        let config = NodeConfig::default();
        assert!(config.default_headers().unwrap().is_empty());
    }

    #[test]
    fn test_default_headers_parsed() {
        let config = NodeConfig {
            headers: Some(r#"{"Authorization": "Bearer token"}"#.to_string()),
            ..Default::default()
        };
        let headers = config.default_headers().unwrap();
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer token");
    }

    #[test]
    fn test_default_headers_malformed_is_config_error() {
        let config = NodeConfig {
            headers: Some("{bad".to_string()),
            ..Default::default()
        };
        let err = config.default_headers().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_output_mode_deserializes_lowercase() {
        let config: NodeConfig =
            serde_json::from_str(r#"{"event": "message", "output": "json"}"#).unwrap();
        assert_eq!(config.output, OutputMode::Json);

        let config: NodeConfig = serde_json::from_str(r#"{"event": "message"}"#).unwrap();
        assert_eq!(config.output, OutputMode::Raw);
    }
}
