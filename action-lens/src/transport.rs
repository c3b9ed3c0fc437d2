//! Host connection
//!
//! The instrumented application connects over TCP and writes one JSON message
//! per line:
//!
//! ```text
//! {"method":"actionDispatched","params":{"id":1,"time":"..","took":"..","action":{..},"before":{..},"after":{..}}}
//! {"method":"actionInit","params":{..}}
//! ```
//!
//! The inspector answers on the same connection with
//! `{"method":"dispatchAction","params":{"type":..,"payload":..}}`.
//! A new connection replaces the previous one.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use action_lens_core::{ActionRecord, DispatchedAction};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

use crate::action::Action;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8347";

const DISPATCH_METHOD: &str = "dispatchAction";
const ACCEPT_RETRY: Duration = Duration::from_millis(100);

/// A decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    ActionDispatched(ActionRecord),
    ActionInit(ActionRecord),
}

impl HostMessage {
    pub fn into_action(self) -> Action {
        match self {
            HostMessage::ActionDispatched(record) => Action::RecordDispatched(Box::new(record)),
            HostMessage::ActionInit(record) => Action::RecordInit(Box::new(record)),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct Outbound<'a, T> {
    method: &'a str,
    params: &'a T,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read replay file {}: {source}", .path.display())]
    Replay {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("connection error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no client connected")]
    NotConnected,
}

/// Decode one line of the inbound stream.
///
/// Blank lines and unknown methods yield `Ok(None)`.
pub fn decode_line(line: &str) -> Result<Option<HostMessage>, TransportError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let envelope: Envelope = serde_json::from_str(line)?;
    let message = match envelope.method.as_str() {
        "actionDispatched" => HostMessage::ActionDispatched(serde_json::from_value(envelope.params)?),
        "actionInit" => HostMessage::ActionInit(serde_json::from_value(envelope.params)?),
        other => {
            tracing::debug!(method = other, "Ignoring unknown host method");
            return Ok(None);
        }
    };
    Ok(Some(message))
}

/// Encode a synthetic action as one outbound line, newline included
pub fn encode_dispatch(action: &DispatchedAction) -> Result<Vec<u8>, TransportError> {
    let mut bytes = serde_json::to_vec(&Outbound {
        method: DISPATCH_METHOD,
        params: action,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

struct Connection {
    generation: u64,
    writer: OwnedWriteHalf,
}

/// Write side of the current host connection, shared with dispatch tasks
#[derive(Clone, Default)]
pub struct HostLink {
    current: Arc<Mutex<Option<Connection>>>,
}

impl HostLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_connected(&self) -> bool {
        self.current.lock().await.is_some()
    }

    /// Send a synthetic action to the connected host
    pub async fn send(&self, action: &DispatchedAction) -> Result<(), TransportError> {
        let bytes = encode_dispatch(action)?;
        let mut current = self.current.lock().await;
        let connection = current.as_mut().ok_or(TransportError::NotConnected)?;
        connection.writer.write_all(&bytes).await?;
        connection.writer.flush().await?;
        tracing::debug!(action_type = %action.action_type, "Dispatched to host");
        Ok(())
    }

    async fn attach(&self, generation: u64, writer: OwnedWriteHalf) {
        *self.current.lock().await = Some(Connection { generation, writer });
    }

    /// Drop the writer if it still belongs to `generation`
    async fn detach(&self, generation: u64) -> bool {
        let mut current = self.current.lock().await;
        match current.as_ref() {
            Some(connection) if connection.generation == generation => {
                *current = None;
                true
            }
            _ => false,
        }
    }
}

pub async fn bind(addr: &str) -> Result<TcpListener, TransportError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Accept host connections until `cancel` fires.
///
/// The returned stream yields connection changes and decoded records as
/// actions; register it as a subscription.
pub fn spawn_listener(
    listener: TcpListener,
    link: HostLink,
    cancel: CancellationToken,
) -> impl Stream<Item = Action> + Send + 'static {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(accept_loop(listener, link, tx, cancel));
    UnboundedReceiverStream::new(rx)
}

async fn accept_loop(
    listener: TcpListener,
    link: HostLink,
    tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut generation = 0u64;
    let mut reader_token: Option<CancellationToken> = None;

    loop {
        let accepted = tokio::select! {
            _ = cancel.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(error = %err, "Accept failed");
                tokio::time::sleep(ACCEPT_RETRY).await;
                continue;
            }
        };

        generation += 1;
        if let Some(previous) = reader_token.take() {
            tracing::info!("Replacing previous host connection");
            previous.cancel();
        }
        let token = cancel.child_token();
        reader_token = Some(token.clone());

        tracing::info!(%peer, "Host connected");
        let (reader, writer) = stream.into_split();
        link.attach(generation, writer).await;
        if tx.send(Action::HostDidConnect(peer.to_string())).is_err() {
            break;
        }
        tokio::spawn(read_connection(
            reader,
            generation,
            link.clone(),
            tx.clone(),
            token,
        ));
    }
    tracing::debug!("Listener stopped");
}

async fn read_connection(
    reader: OwnedReadHalf,
    generation: u64,
    link: HostLink,
    tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = tokio::select! {
            // replaced by a newer connection or shutting down
            _ = cancel.cancelled() => return,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => match decode_line(&line) {
                Ok(Some(message)) => {
                    if tx.send(message.into_action()).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "Skipping malformed host message"),
            },
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "Host connection failed");
                break;
            }
        }
    }

    if link.detach(generation).await {
        tracing::info!("Host disconnected");
        let _ = tx.send(Action::HostDidDisconnect);
    }
}

/// Read a recorded session in the wire format.
///
/// Malformed lines are skipped with a warning.
pub async fn read_replay(path: &Path) -> Result<Vec<Action>, TransportError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TransportError::Replay {
            path: path.to_path_buf(),
            source,
        })?;

    let mut actions = Vec::new();
    for (index, line) in text.lines().enumerate() {
        match decode_line(line) {
            Ok(Some(message)) => actions.push(message.into_action()),
            Ok(None) => {}
            Err(err) => tracing::warn!(line = index + 1, error = %err, "Skipping malformed replay line"),
        }
    }
    tracing::info!(path = %path.display(), records = actions.len(), "Replay loaded");
    Ok(actions)
}
