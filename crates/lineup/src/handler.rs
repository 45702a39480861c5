//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running this handler:
//!   1. Register an outbound channel with the registry (which greets the
//!      player with `welcome`).
//!   2. Spawn a writer task draining that channel into text frames.
//!   3. Read frames, decode them, forward actions to the registry.
//!   4. On close or error, report the disconnect.
//!
//! There is no read timeout: a player who is connected but quiet keeps
//! their seat. Leaving a room happens only on `leave-room` or when the
//! socket closes.

use lineup_protocol::{ClientMessage, Codec, JsonCodec, PlayerId, ServerMessage};
use lineup_room::{PlayerSender, RegistryHandle};
use tokio::sync::mpsc;

use crate::LineupError;
use crate::transport::{Inbound, Outbound, WebSocketConnection};

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    registry: RegistryHandle,
) -> Result<(), LineupError> {
    let player_id = conn.id();
    tracing::debug!(%player_id, addr = %conn.peer_addr(), "handling new connection");

    let (outbound, mut inbound) = conn.split();
    let (tx, rx) = mpsc::unbounded_channel();
    registry.connect(player_id, tx.clone()).await?;
    tokio::spawn(write_loop(player_id, outbound, rx));

    let outcome = read_loop(player_id, &mut inbound, &registry, &tx).await;

    // Always leave the room, whatever ended the loop. The writer stops once
    // the registry and this task have both dropped their senders.
    registry.disconnect(player_id).await?;
    outcome
}

async fn read_loop(
    player_id: PlayerId,
    inbound: &mut Inbound,
    registry: &RegistryHandle,
    tx: &PlayerSender,
) -> Result<(), LineupError> {
    let codec = JsonCodec;

    loop {
        let data = match inbound.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let msg: ClientMessage = match codec.decode_bytes(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode message");
                let _ = tx.send(ServerMessage::Error {
                    message: format!("invalid message: {e}"),
                });
                continue;
            }
        };

        registry.dispatch(player_id, msg).await?;
    }
}

/// Drains a player's outbound channel onto the socket.
async fn write_loop(
    player_id: PlayerId,
    mut outbound: Outbound,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    let codec = JsonCodec;

    while let Some(msg) = rx.recv().await {
        let text = match codec.encode(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = outbound.send_text(text).await {
            tracing::debug!(%player_id, error = %e, "send failed, stopping writer");
            break;
        }
    }

    outbound.close().await;
}
