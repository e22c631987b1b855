//! Adapter between the host runtime and the subscription registry.

use crate::config::{NodeConfig, OutputMode};
use crate::error::{Error, ErrorKind};
use crate::registry::{Subscription, SubscriptionRegistry};
use crate::subscription;
use host::{FlowHost, FlowMessage, NodeStatus};
use log::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// One SSE client node instance.
///
/// Owns the registry of open subscriptions and talks to the runtime through
/// the [`FlowHost`] trait. Cloning is cheap and shares the registry; each
/// stream task holds a clone so its callbacks can reach the registry and the
/// host without capturing ambient node state.
#[derive(Clone)]
pub struct SseClientNode {
    config: NodeConfig,
    default_headers: HashMap<String, String>,
    registry: Arc<SubscriptionRegistry>,
    host: Arc<dyn FlowHost>,
}

impl std::fmt::Debug for SseClientNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseClientNode")
            .field("config", &self.config)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl SseClientNode {
    /// Create a node instance and push its initial status.
    ///
    /// Fails when the configured default header string is malformed; the
    /// caller surfaces that as a red status on the node.
    pub fn new(config: NodeConfig, host: Arc<dyn FlowHost>) -> Result<Self, Error> {
        let default_headers = config.default_headers()?;
        let node = Self {
            config,
            default_headers,
            registry: Arc::new(SubscriptionRegistry::new()),
            host,
        };
        node.push_status();
        Ok(node)
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub(crate) fn event_name(&self) -> &str {
        &self.config.event
    }

    /// Handle one inbound open request. Must be called from within a tokio
    /// runtime; the connection is established asynchronously and the caller
    /// is never blocked.
    ///
    /// Every failure is recovered locally: the error is reported through the
    /// host's error channel, the registry is left unchanged, and the message
    /// counts as handled. A duplicate id additionally skips the connection
    /// attempt entirely and leaves the status indicator alone.
    pub fn handle_input(&self, msg: &Value) {
        if let Err(err) = self.try_open(msg) {
            match err.kind {
                ErrorKind::DuplicateSubscription(_) => {
                    self.host.report_error(err.to_string());
                }
                _ => {
                    error!("{err}");
                    self.host.report_error(err.to_string());
                    self.host.set_status(NodeStatus::error(err.to_string()));
                }
            }
        }
    }

    fn try_open(&self, msg: &Value) -> Result<(), Error> {
        let payload = msg
            .get("payload")
            .ok_or_else(|| Error::invalid_request("payload"))?;
        let url = payload
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_request("url"))?;
        let id = payload
            .get("uuid")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_request("uuid"))?;

        if self.registry.contains(id) {
            return Err(Error::duplicate(id));
        }

        let headers = self.resolve_headers(payload);
        let client = subscription::build_client(url, &headers)?;
        let task = tokio::spawn(subscription::run_stream(
            self.clone(),
            id.to_string(),
            client,
        ));

        self.registry.insert(Subscription::new(id, url, task))?;
        info!("opened subscription {id} to {url}");
        self.push_status();
        Ok(())
    }

    /// Per-request headers replace the node-level default set wholesale;
    /// there is no per-key merge.
    fn resolve_headers(&self, payload: &Value) -> HashMap<String, String> {
        match payload.get("headers").and_then(Value::as_object) {
            Some(map) => map
                .iter()
                .filter_map(|(name, value)| {
                    value.as_str().map(|v| (name.clone(), v.to_string()))
                })
                .collect(),
            None => self.default_headers.clone(),
        }
    }

    /// Relay one received event downstream.
    pub(crate) async fn handle_stream_event(&self, id: &str, event_type: &str, data: &str) {
        debug!("received event on subscription {id}: {event_type}");

        let payload = json!({
            "uuid": id,
            "data": self.decode_payload(data),
            "event": "message",
        });
        self.host
            .send(FlowMessage::new(Some(event_type.to_string()), payload))
            .await;
    }

    /// Forced-close path for a stream that errored or ended.
    ///
    /// The entry is removed without aborting its task: this runs on the
    /// stream task itself, which winds down right after and drops the
    /// connection. Idempotent, so a late duplicate signal is a no-op.
    pub(crate) async fn handle_stream_close(&self, id: &str) {
        if self.registry.remove(id).is_none() {
            return;
        }

        self.push_status();
        self.host
            .send(FlowMessage::new(None, json!({"uuid": id, "event": "close"})))
            .await;
    }

    /// Node teardown: close every remaining subscription.
    pub fn close(&self) {
        info!(
            "tearing down node, closing {} open subscription(s)",
            self.registry.count()
        );
        self.registry.close_all();
    }

    fn decode_payload(&self, data: &str) -> Value {
        match self.config.output {
            OutputMode::Json => serde_json::from_str(data)
                .unwrap_or_else(|_| Value::String(data.to_string())),
            OutputMode::Raw => Value::String(data.to_string()),
        }
    }

    fn push_status(&self) {
        self.host
            .set_status(NodeStatus::active(self.registry.status_text()));
    }
}
