//! Websocket protocol.
//!
//! Clients send JSON requests tagged by `cmd`; the server answers with JSON
//! messages tagged by `type`. After `subscribe` a client receives the table's
//! schema, a snapshot of every row so far, then one `update` per appended batch.

use crate::table::{Subscription, TableManager, Update};
use axum::extract::ws::{Message, WebSocket};
use log::{debug, info, warn};
use market::{Row, Schema};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Stream the table: schema, snapshot, then updates. Replaces any
    /// previous subscription on this socket.
    Subscribe { table: String },
    Schema { table: String },
    Size { table: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    Schema { table: &'a str, fields: &'a Schema },
    Snapshot { table: &'a str, rows: &'a [Row] },
    Update { table: &'a str, rows: &'a [Row] },
    Size { table: &'a str, size: usize },
    Error { message: String },
}

/// The table a socket is currently streaming.
struct Stream {
    table: String,
    updates: tokio::sync::broadcast::Receiver<Update>,
}

/// Drives one websocket connection until the client leaves.
pub async fn handle_socket(mut socket: WebSocket, tables: TableManager) {
    info!("WebSocket: client connected");
    let mut stream: Option<Stream> = None;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("WebSocket: receive error: {}", e);
                        break;
                    }
                };
                if handle_request(&mut socket, &tables, &mut stream, &text).await.is_err() {
                    break;
                }
            }
            update = next_update(&mut stream) => {
                let sent = match update {
                    Ok(rows) => {
                        let table = stream.as_ref().map(|s| s.table.as_str()).unwrap_or_default();
                        send(&mut socket, &ServerMessage::Update { table, rows: &rows }).await
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("WebSocket: subscriber lagged by {} batches, resyncing", skipped);
                        resync(&mut socket, &tables, &mut stream).await
                    }
                    Err(RecvError::Closed) => {
                        stream = None;
                        Ok(())
                    }
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    info!("WebSocket: client disconnected");
}

async fn next_update(stream: &mut Option<Stream>) -> Result<Update, RecvError> {
    match stream {
        Some(s) => s.updates.recv().await,
        None => std::future::pending().await,
    }
}

async fn handle_request(
    socket: &mut WebSocket,
    tables: &TableManager,
    stream: &mut Option<Stream>,
    text: &str,
) -> Result<(), axum::Error> {
    let request: ClientRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            let message = format!("Invalid request: {}", e);
            return send(socket, &ServerMessage::Error { message }).await;
        }
    };
    debug!("WebSocket: request {:?}", request);

    match request {
        ClientRequest::Subscribe { table } => match tables.get(&table) {
            Ok(hosted) => {
                let sub = hosted.subscribe();
                send(
                    socket,
                    &ServerMessage::Schema {
                        table: &table,
                        fields: hosted.schema(),
                    },
                )
                .await?;
                start_stream(socket, stream, table, sub).await
            }
            Err(e) => send(socket, &error(e)).await,
        },
        ClientRequest::Schema { table } => match tables.get(&table) {
            Ok(hosted) => {
                let message = ServerMessage::Schema {
                    table: &table,
                    fields: hosted.schema(),
                };
                send(socket, &message).await
            }
            Err(e) => send(socket, &error(e)).await,
        },
        ClientRequest::Size { table } => match tables.size(&table) {
            Ok(size) => send(socket, &ServerMessage::Size { table: &table, size }).await,
            Err(e) => send(socket, &error(e)).await,
        },
    }
}

/// Sends the snapshot and makes `sub` the socket's stream.
async fn start_stream(
    socket: &mut WebSocket,
    stream: &mut Option<Stream>,
    table: String,
    sub: Subscription,
) -> Result<(), axum::Error> {
    send(
        socket,
        &ServerMessage::Snapshot {
            table: &table,
            rows: &sub.snapshot,
        },
    )
    .await?;
    *stream = Some(Stream {
        table,
        updates: sub.updates,
    });
    Ok(())
}

/// Replaces a lagged stream with a fresh snapshot of the same table.
async fn resync(
    socket: &mut WebSocket,
    tables: &TableManager,
    stream: &mut Option<Stream>,
) -> Result<(), axum::Error> {
    let Some(table) = stream.take().map(|s| s.table) else {
        return Ok(());
    };
    match tables.subscribe(&table) {
        Ok(sub) => start_stream(socket, stream, table, sub).await,
        Err(e) => send(socket, &error(e)).await,
    }
}

fn error(e: impl std::fmt::Display) -> ServerMessage<'static> {
    ServerMessage::Error {
        message: e.to_string(),
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage<'_>) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(text) => socket.send(Message::Text(text)).await,
        Err(e) => {
            warn!("WebSocket: failed to serialize message: {}", e);
            Ok(())
        }
    }
}
