//! Error types for the `sse-client` node.
use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for the node.
///
/// Errors carry a `kind` for dispatch plus the original error (when one
/// exists) in `source`, so the host's error channel can show a cause without
/// this crate leaking dependency error types through its API.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub kind: ErrorKind,
}

/// The kinds of failures an open attempt can produce.
///
/// Runtime errors on an already-open stream are not represented here: they
/// trigger the forced-close path (entry removed, close message emitted) and
/// are never surfaced as `Error` values.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The request's subscription id is already open.
    DuplicateSubscription(String),
    /// Constructing or opening the stream connection failed.
    ConnectionOpenFailure,
    /// A required inbound request field is missing or not a string.
    InvalidRequest(&'static str),
    /// The node-level header configuration is not a valid JSON object.
    InvalidConfig,
}

impl Error {
    pub(crate) fn duplicate(id: &str) -> Self {
        Error {
            source: None,
            kind: ErrorKind::DuplicateSubscription(id.to_string()),
        }
    }

    pub(crate) fn invalid_request(field: &'static str) -> Self {
        Error {
            source: None,
            kind: ErrorKind::InvalidRequest(field),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ErrorKind::DuplicateSubscription(id) => {
                write!(f, "Duplicate uuid refused: {id}")
            }
            ErrorKind::ConnectionOpenFailure => match &self.source {
                Some(source) => write!(f, "Failed to open event stream: {source}"),
                None => write!(f, "Failed to open event stream"),
            },
            ErrorKind::InvalidRequest(field) => {
                write!(f, "Request payload field missing or not a string: {field}")
            }
            ErrorKind::InvalidConfig => {
                write!(f, "Node headers configuration is not a valid JSON object")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<eventsource_client::Error> for Error {
    fn from(err: eventsource_client::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            kind: ErrorKind::ConnectionOpenFailure,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            kind: ErrorKind::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display_names_the_id() {
        let err = Error::duplicate("sub-1");
        assert_eq!(err.to_string(), "Duplicate uuid refused: sub-1");
        assert_eq!(err.kind, ErrorKind::DuplicateSubscription("sub-1".to_string()));
    }

    #[test]
    fn test_config_error_from_bad_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: Error = parse_err.into();
        assert_eq!(err.kind, ErrorKind::InvalidConfig);
        assert!(err.source.is_some());
    }
}
