//! Registry actor: one Tokio task that owns every room.
//!
//! Connections never touch the [`RoomRegistry`] directly. They hold a
//! [`RegistryHandle`] and send it commands over an mpsc channel; the actor
//! applies them one at a time, to completion, and pushes the resulting
//! broadcasts into each player's outbound channel. Two actions on the same
//! room can therefore never interleave, and no locks are needed.

use std::collections::HashMap;

use lineup_protocol::{
    ClientMessage, PlayerId, RoomCode, RoomStatus, ServerMessage, ViewState,
};
use tokio::sync::{mpsc, oneshot};

use crate::{GameError, RegistryClosed, RoomRegistry};

/// Channel sender for delivering outbound messages to one player.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Who inside a room should receive a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recipient {
    /// Every current member of the room.
    All,
    /// Every member except one, typically the player who caused the event.
    AllExcept(PlayerId),
}

/// Commands sent to the actor through its channel.
///
/// Variants carrying a `oneshot::Sender` expect an answer; the rest are
/// fire-and-forget, with any outcome delivered through player channels.
enum RegistryCommand {
    /// Register a new connection's outbound channel.
    Connect {
        player_id: PlayerId,
        sender: PlayerSender,
    },

    /// Apply a client action on behalf of a player.
    Action {
        player_id: PlayerId,
        msg: ClientMessage,
    },

    /// The connection is gone: leave the room and forget the channel.
    Disconnect { player_id: PlayerId },

    /// The player's current view of their room, if they are in one.
    Snapshot {
        player_id: PlayerId,
        reply: oneshot::Sender<Option<ViewState>>,
    },

    /// Number of active rooms.
    RoomCount { reply: oneshot::Sender<usize> },

    Shutdown,
}

/// Handle to the running registry actor.
///
/// Cheap to clone: every connection task keeps its own copy.
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Registers `player_id`'s outbound channel. The player is greeted
    /// with `welcome` on it straight away.
    pub async fn connect(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), RegistryClosed> {
        self.send(RegistryCommand::Connect { player_id, sender }).await
    }

    /// Queues a client action. Results arrive on the player's channel.
    pub async fn dispatch(
        &self,
        player_id: PlayerId,
        msg: ClientMessage,
    ) -> Result<(), RegistryClosed> {
        self.send(RegistryCommand::Action { player_id, msg }).await
    }

    /// Reports that a player's connection closed.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RegistryClosed> {
        self.send(RegistryCommand::Disconnect { player_id }).await
    }

    /// Returns what `player_id` currently sees, or `None` outside a room.
    pub async fn snapshot(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<ViewState>, RegistryClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Snapshot { player_id, reply }).await?;
        rx.await.map_err(|_| RegistryClosed)
    }

    pub async fn room_count(&self) -> Result<usize, RegistryClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::RoomCount { reply }).await?;
        rx.await.map_err(|_| RegistryClosed)
    }

    /// Stops the actor. Rooms are dropped with it.
    pub async fn shutdown(&self) -> Result<(), RegistryClosed> {
        self.send(RegistryCommand::Shutdown).await
    }

    async fn send(&self, cmd: RegistryCommand) -> Result<(), RegistryClosed> {
        self.sender.send(cmd).await.map_err(|_| RegistryClosed)
    }
}

/// The actor's state. Lives inside its Tokio task.
struct RegistryActor {
    registry: RoomRegistry,
    /// Outbound channel per connected player.
    senders: HashMap<PlayerId, PlayerSender>,
    /// Which room each player is sitting in. A player is in at most one.
    seats: HashMap<PlayerId, RoomCode>,
    receiver: mpsc::Receiver<RegistryCommand>,
}

impl RegistryActor {
    async fn run(mut self) {
        tracing::info!("registry actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RegistryCommand::Connect { player_id, sender } => {
                    let _ = sender.send(ServerMessage::Welcome { player_id });
                    self.senders.insert(player_id, sender);
                    tracing::debug!(%player_id, "player connected");
                }
                RegistryCommand::Action { player_id, msg } => {
                    if let Err(e) = self.apply(player_id, msg) {
                        tracing::debug!(%player_id, error = %e, "action rejected");
                        self.send_to(
                            player_id,
                            ServerMessage::Error { message: e.to_string() },
                        );
                    }
                }
                RegistryCommand::Disconnect { player_id } => {
                    self.senders.remove(&player_id);
                    if self.seats.contains_key(&player_id) {
                        if let Err(e) = self.leave(player_id) {
                            tracing::warn!(%player_id, error = %e, "cleanup on disconnect failed");
                            self.seats.remove(&player_id);
                        }
                    }
                    tracing::debug!(%player_id, "player disconnected");
                }
                RegistryCommand::Snapshot { player_id, reply } => {
                    let view = self
                        .seats
                        .get(&player_id)
                        .and_then(|code| self.registry.project(code, player_id));
                    let _ = reply.send(view);
                }
                RegistryCommand::RoomCount { reply } => {
                    let _ = reply.send(self.registry.len());
                }
                RegistryCommand::Shutdown => {
                    tracing::info!(rooms = self.registry.len(), "registry shutting down");
                    break;
                }
            }
        }

        tracing::info!("registry actor stopped");
    }

    /// Runs one client action. On `Err` nothing was changed or sent.
    fn apply(&mut self, player: PlayerId, msg: ClientMessage) -> Result<(), GameError> {
        match msg {
            ClientMessage::CreateRoom { name } => {
                self.ensure_unseated(player)?;
                let code = self.registry.create_room(player, &name)?.code().clone();
                self.seats.insert(player, code.clone());

                self.send_to(player, ServerMessage::RoomCreated { code: code.clone() });
                self.broadcast_state(&code);
            }

            ClientMessage::JoinRoom { code, name } => {
                self.ensure_unseated(player)?;
                let code = RoomCode::normalize(&code);
                let room = self.registry.join_room(&code, player, &name)?;
                let name = room
                    .player(player)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                self.seats.insert(player, code.clone());

                self.send_to(player, ServerMessage::RoomJoined { code: code.clone() });
                self.dispatch(
                    &code,
                    vec![(
                        Recipient::AllExcept(player),
                        ServerMessage::PlayerJoined { player_id: player, name },
                    )],
                );
                self.broadcast_state(&code);
            }

            ClientMessage::StartRound | ClientMessage::PlayAgain => {
                let code = self.seat(player)?;
                let room = self.registry.start_round(&code, player)?;
                let deals: Vec<(PlayerId, u8)> = room
                    .players()
                    .iter()
                    .filter_map(|p| p.number.map(|n| (p.id, n)))
                    .collect();

                // Each number goes only to its owner.
                for (id, number) in deals {
                    self.send_to(id, ServerMessage::RoundStarted { your_number: number });
                }
                self.broadcast_state(&code);
            }

            ClientMessage::PlaceCard { position } => {
                let code = self.seat(player)?;
                let position = self.registry.place_card(&code, player, position)?;
                let player_name = self.player_name(&code, player);

                self.dispatch(
                    &code,
                    vec![(
                        Recipient::All,
                        ServerMessage::CardPlaced { player_id: player, player_name, position },
                    )],
                );
                self.broadcast_state(&code);
            }

            ClientMessage::MoveCard { from_index, to_index } => {
                let code = self.seat(player)?;
                self.registry.move_card(&code, from_index, to_index)?;

                self.dispatch(
                    &code,
                    vec![(Recipient::All, ServerMessage::CardMoved { from_index, to_index })],
                );
                self.broadcast_state(&code);
            }

            ClientMessage::StartReveal => {
                let code = self.seat(player)?;
                self.registry.start_reveal(&code)?;

                self.dispatch(&code, vec![(Recipient::All, ServerMessage::RevealStarted)]);
                self.broadcast_state(&code);
            }

            ClientMessage::RevealNext => {
                let code = self.seat(player)?;
                let (data, room) = self.registry.reveal_next(&code)?;
                let ended = room.status() == RoomStatus::Ended;

                let mut msgs = vec![(Recipient::All, ServerMessage::CardRevealed(data))];
                if ended {
                    msgs.extend(self.round_ended(&code));
                }
                self.dispatch(&code, msgs);
                self.broadcast_state(&code);
            }

            ClientMessage::LeaveRoom => self.leave(player)?,
        }
        Ok(())
    }

    /// Takes `player` out of their room and tells whoever is left.
    fn leave(&mut self, player: PlayerId) -> Result<(), GameError> {
        let code = self.seat(player)?;
        let departure = self.registry.remove_player(&code, player)?;
        self.seats.remove(&player);
        if departure.room_closed {
            return Ok(());
        }

        let mut msgs = vec![(
            Recipient::All,
            ServerMessage::PlayerLeft {
                player_id: player,
                player_name: departure.player.name,
            },
        )];
        if let Some(new_host_id) = departure.new_host {
            msgs.push((Recipient::All, ServerMessage::HostChanged { new_host_id }));
        }
        if departure.round_ended {
            msgs.extend(self.round_ended(&code));
        }
        self.dispatch(&code, msgs);
        self.broadcast_state(&code);
        Ok(())
    }

    /// The `round-ended` broadcast for a room whose round just finished.
    fn round_ended(&self, code: &RoomCode) -> Option<(Recipient, ServerMessage)> {
        let result = self.registry.get(code)?.result()?;
        let final_order = self.registry.final_results(code).ok()?;
        Some((Recipient::All, ServerMessage::RoundEnded { result, final_order }))
    }

    fn ensure_unseated(&self, player: PlayerId) -> Result<(), GameError> {
        match self.seats.get(&player) {
            Some(code) => Err(GameError::AlreadyInRoom(code.clone())),
            None => Ok(()),
        }
    }

    fn seat(&self, player: PlayerId) -> Result<RoomCode, GameError> {
        self.seats.get(&player).cloned().ok_or(GameError::NotInRoom(player))
    }

    fn player_name(&self, code: &RoomCode, player: PlayerId) -> String {
        self.registry
            .get(code)
            .and_then(|room| room.player(player))
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    /// Delivers messages to the members of `code`.
    fn dispatch(&self, code: &RoomCode, msgs: Vec<(Recipient, ServerMessage)>) {
        let Some(room) = self.registry.get(code) else {
            return;
        };
        for (recipient, msg) in msgs {
            for p in room.players() {
                if recipient == Recipient::AllExcept(p.id) {
                    continue;
                }
                self.send_to(p.id, msg.clone());
            }
        }
    }

    /// Sends every member their own projection of the room.
    fn broadcast_state(&self, code: &RoomCode) {
        let Some(room) = self.registry.get(code) else {
            return;
        };
        for p in room.players() {
            let view = crate::view::project(room, p.id);
            self.send_to(p.id, ServerMessage::RoomState(view));
        }
    }

    /// Sends to a single player. Silently dropped if their connection is
    /// already gone.
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }
}

/// Spawns the actor task around `registry` and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it fills, senders wait.
pub fn spawn_registry(registry: RoomRegistry, channel_size: usize) -> RegistryHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RegistryActor {
        registry,
        senders: HashMap::new(),
        seats: HashMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RegistryHandle { sender: tx }
}
