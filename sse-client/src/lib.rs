//! SSE client node for the flow runtime.
//!
//! This crate implements a flow node that opens Server-Sent-Event
//! subscriptions on demand and forwards received events back into the flow.
//! Each inbound request names a subscription id and an endpoint URL; the node
//! keeps one open stream per id and relays the stream's events and lifecycle
//! notifications as outbound messages.
//!
//! # Architecture
//!
//! - **Subscription lifecycle**: `absent -> open -> closed`. A stream never
//!   reconnects on its own; once closed (by a stream error or by node
//!   teardown) its id is free to be reopened by a later request.
//! - **SubscriptionRegistry**: Concurrent map from caller-supplied id to the
//!   open subscription, enforcing at most one subscription per id.
//! - **SseClientNode**: Adapter between the host runtime and the registry.
//!   Translates inbound requests into open attempts and stream callbacks
//!   into outbound messages and status updates.
//! - **Derived status**: The visible status text is always recomputed from
//!   the registry (`"active clients: N"`), never stored.
//!
//! The SSE wire protocol itself (framing, connection handling) is delegated
//! to the `eventsource-client` crate; reconnection is explicitly disabled.

pub mod config;
pub mod error;
pub mod node;
pub mod registry;
mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{NodeConfig, OutputMode};
pub use error::{Error, ErrorKind};
pub use node::SseClientNode;
pub use registry::{Subscription, SubscriptionRegistry};
