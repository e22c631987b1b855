//! Test double for the flow host, shared by the node and stream tests.

use async_trait::async_trait;
use host::{FlowHost, FlowMessage, NodeStatus};
use std::sync::Mutex;

/// Records everything the node pushes at the runtime.
pub(crate) struct RecordingHost {
    messages: Mutex<Vec<FlowMessage>>,
    errors: Mutex<Vec<String>>,
    statuses: Mutex<Vec<NodeStatus>>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            statuses: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn messages(&self) -> Vec<FlowMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub(crate) fn statuses(&self) -> Vec<NodeStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlowHost for RecordingHost {
    async fn send(&self, message: FlowMessage) {
        self.messages.lock().unwrap().push(message);
    }

    fn report_error(&self, message: String) {
        self.errors.lock().unwrap().push(message);
    }

    fn set_status(&self, status: NodeStatus) {
        self.statuses.lock().unwrap().push(status);
    }
}
