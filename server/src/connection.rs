//! Per-connection task
//!
//! Each connection reads newline-delimited JSON frames, forwards them
//! to the coordinator, and fans session snapshots back out. Every
//! `joinParty` takes a fresh subscription to that session's broadcast
//! stream, replacing any earlier one for the same id; closing the
//! socket drops the subscriptions but does not leave any party (leaving
//! is an explicit client action, as in the original protocol).

use crate::protocol::{ClientMessage, ServerMessage};
use reelmatch_application::CoordinatorHandle;
use std::collections::HashMap;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Outbound frame buffer per connection
const OUTBOUND_CAPACITY: usize = 64;

pub async fn handle_connection<S>(stream: S, coordinator: CoordinatorHandle)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let (out_tx, mut out_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);

    let writer: JoinHandle<()> = tokio::spawn(async move {
        while let Some(line) = out_rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if write_half.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    let mut forwarders: HashMap<String, JoinHandle<()>> = HashMap::new();
    let mut lines = BufReader::new(read_half).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let message: ClientMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, "ignoring malformed frame");
                continue;
            }
        };

        // Joining a party is also this connection's subscription to it.
        // Every join takes a fresh subscription: if the session was
        // destroyed since the last one, the old channel is closed and
        // its forwarder dead, and relying on having noticed that would
        // race the re-join. Subscribe before sending the action so the
        // join snapshot is the first frame the client sees.
        if let ClientMessage::JoinParty { party_id, .. } = &message {
            if let Some(stale) = forwarders.remove(party_id) {
                stale.abort();
            }
            match coordinator.subscribe(party_id.clone()).await {
                Ok(rx) => {
                    forwarders.insert(
                        party_id.clone(),
                        tokio::spawn(forward_snapshots(rx, out_tx.clone())),
                    );
                }
                Err(error) => {
                    warn!(%error, "subscribe failed, coordinator down");
                    break;
                }
            }
        }

        if coordinator.send(message.into_action()).await.is_err() {
            warn!("coordinator down, closing connection");
            break;
        }
    }

    debug!("connection closed");
    writer.abort();
    for handle in forwarders.into_values() {
        handle.abort();
    }
}

async fn forward_snapshots(
    mut rx: tokio::sync::broadcast::Receiver<reelmatch_domain::SessionSnapshot>,
    out_tx: mpsc::Sender<String>,
) {
    use tokio::sync::broadcast::error::RecvError;

    loop {
        match rx.recv().await {
            Ok(snapshot) => {
                let frame = match serde_json::to_string(&ServerMessage::PartyUpdated(snapshot)) {
                    Ok(frame) => frame,
                    Err(error) => {
                        warn!(%error, "snapshot serialization failed");
                        continue;
                    }
                };
                if out_tx.send(frame).await.is_err() {
                    break;
                }
            }
            // A slow client missed intermediate snapshots; the next
            // received one is the freshest state, which is all it needs
            Err(RecvError::Lagged(missed)) => {
                debug!(missed, "subscriber lagged, skipping stale snapshots");
            }
            // Session destroyed or coordinator gone
            Err(RecvError::Closed) => break,
        }
    }
}
