//! Stream task: owns one `eventsource-client` connection and relays its
//! events back into the node.

use crate::error::Error;
use crate::node::SseClientNode;
use eventsource_client::{self as es, Client};
use futures::stream::StreamExt;
use log::*;
use std::collections::HashMap;

/// Build a connection for `url` with the resolved header set.
///
/// Reconnection is disabled: a subscription that loses its stream is closed,
/// not retried. The id stays free for a later open request.
pub(crate) fn build_client(
    url: &str,
    headers: &HashMap<String, String>,
) -> Result<impl es::Client, Error> {
    let mut builder = es::ClientBuilder::for_url(url)?;
    for (name, value) in headers {
        builder = builder.header(name, value)?;
    }
    Ok(builder
        .reconnect(es::ReconnectOptions::reconnect(false).build())
        .build())
}

/// Drive one subscription's stream to completion.
///
/// Events whose type matches the node's configured event name are relayed
/// downstream; other named events are ignored, as are SSE comments
/// (keep-alives). The first stream error, or the stream ending, triggers the
/// forced-close path and terminates the task. Returning from this function
/// drops the client, which closes the connection.
pub(crate) async fn run_stream(node: SseClientNode, id: String, client: impl es::Client) {
    let mut stream = client.stream();

    loop {
        match stream.next().await {
            Some(Ok(es::SSE::Event(event))) => {
                if event.event_type == node.event_name() {
                    node.handle_stream_event(&id, &event.event_type, &event.data)
                        .await;
                } else {
                    debug!(
                        "ignoring event of type {} on subscription {id}",
                        event.event_type
                    );
                }
            }
            Some(Ok(es::SSE::Comment(_))) => {
                // Keep-alive, nothing to relay
            }
            Some(Err(err)) => {
                warn!("stream error on subscription {id}: {err}");
                node.handle_stream_close(&id).await;
                break;
            }
            None => {
                debug!("stream ended for subscription {id}");
                node.handle_stream_close(&id).await;
                break;
            }
        }
    }
}
