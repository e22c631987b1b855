//! Host-runtime abstraction for flow nodes.
//!
//! A node runs inside a flow-automation runtime that owns message routing,
//! error reporting, and the node's visible status indicator. None of that
//! machinery lives in this workspace; a node only ever talks to it through
//! the [`FlowHost`] trait defined here.
//!
//! # Architecture
//!
//! - **FlowHost**: Trait the runtime implements. Nodes call it to emit
//!   outbound messages, report recoverable errors, and update their status.
//! - **FlowMessage**: One outbound message. Every message carries a freshly
//!   generated unique id, an optional topic, and a JSON payload.
//! - **NodeStatus**: The `{fill, shape, text}` triple shown next to a node
//!   in the runtime's editor.
//!
//! This crate has no dependencies on other internal crates, avoiding
//! circular dependencies. Payload data is carried as serialized JSON values.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier attached to every outbound message.
pub type MessageId = String;

/// Generate a fresh message id.
pub fn generate_message_id() -> MessageId {
    Uuid::new_v4().simple().to_string()
}

/// One message emitted by a node into the flow.
#[derive(Debug, Clone, Serialize)]
pub struct FlowMessage {
    #[serde(rename = "_msid")]
    pub msid: MessageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub payload: Value,
}

impl FlowMessage {
    /// Build a message with a freshly generated id.
    pub fn new(topic: Option<String>, payload: Value) -> Self {
        Self {
            msid: generate_message_id(),
            topic,
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFill {
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusShape {
    Dot,
}

/// Visible status indicator for a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStatus {
    pub fill: StatusFill,
    pub shape: StatusShape,
    pub text: String,
}

impl NodeStatus {
    /// Green dot with the given text.
    pub fn active(text: impl Into<String>) -> Self {
        Self {
            fill: StatusFill::Green,
            shape: StatusShape::Dot,
            text: text.into(),
        }
    }

    /// Red dot with the given error text.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            fill: StatusFill::Red,
            shape: StatusShape::Dot,
            text: text.into(),
        }
    }
}

/// Services a flow runtime provides to a running node.
///
/// `send` is async because routing a message downstream may suspend;
/// error reporting and status updates are fire-and-forget.
#[async_trait]
pub trait FlowHost: Send + Sync {
    /// Route an outbound message to downstream nodes.
    async fn send(&self, message: FlowMessage);

    /// Report a recoverable error through the runtime's error channel.
    fn report_error(&self, message: String);

    /// Update the node's visible status indicator.
    fn set_status(&self, status: NodeStatus);
}
