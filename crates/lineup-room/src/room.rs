//! The room entity: players, host, and the card line.
//!
//! Fields are private. Outside this crate a `Room` can only be read; every
//! mutation goes through the registry, which is what keeps the invariants
//! below true between operations:
//!
//! - `host_id` names a current player whenever the room is non-empty.
//! - Every id in `card_line` is a current player, and appears once.
//! - `revealed_count <= card_line.len()`.
//! - In the lobby the line is empty and nobody holds a number.

use lineup_protocol::{PlayerId, RoomCode, RoomStatus, RoundResult};

use crate::GameError;

/// A member of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Secret number for the current round.
    pub number: Option<u8>,
}

/// One game session, identified by its code.
#[derive(Debug, Clone)]
pub struct Room {
    pub(crate) code: RoomCode,
    pub(crate) host_id: PlayerId,
    /// Join order. The host is always somewhere in here.
    pub(crate) players: Vec<Player>,
    pub(crate) status: RoomStatus,
    /// Left-to-right placement order.
    pub(crate) card_line: Vec<PlayerId>,
    pub(crate) revealed_count: usize,
    pub(crate) result: Option<RoundResult>,
}

/// What happened when a player was taken out of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The player who left, as they were at the moment of leaving.
    pub player: Player,
    /// Set if the departing player was host and someone took over.
    pub new_host: Option<PlayerId>,
    /// The last player left and the room was deleted.
    pub room_closed: bool,
    /// Pulling the card finished an in-progress reveal.
    pub round_ended: bool,
}

impl Room {
    /// A fresh lobby with `host` as its only player.
    pub(crate) fn new(code: RoomCode, host: PlayerId, host_name: String) -> Self {
        Self {
            code,
            host_id: host,
            players: vec![Player { id: host, name: host_name, number: None }],
            status: RoomStatus::Lobby,
            card_line: Vec::new(),
            revealed_count: 0,
            result: None,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host_id(&self) -> PlayerId {
        self.host_id
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn card_line(&self) -> &[PlayerId] {
        &self.card_line
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    /// `Some` only once the round has ended.
    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Appends a player to the lobby.
    pub(crate) fn add_player(
        &mut self,
        id: PlayerId,
        name: String,
        max_players: usize,
    ) -> Result<(), GameError> {
        if !self.status.is_joinable() {
            return Err(GameError::RoomNotJoinable(self.code.clone()));
        }
        if self.contains(id) {
            return Err(GameError::AlreadyInRoom(self.code.clone()));
        }
        if self.players.len() >= max_players {
            return Err(GameError::RoomFull(self.code.clone()));
        }
        self.players.push(Player { id, name, number: None });
        Ok(())
    }

    /// Takes a player out of the room and out of the card line.
    ///
    /// Later cards shift left. If the card had already been revealed the
    /// reveal count shrinks with it, so the count keeps pointing at the
    /// same next card. When that leaves a reveal with nothing more to turn
    /// over, the round ends on the remaining line.
    ///
    /// `room_closed` is never set here; the registry decides that.
    pub(crate) fn remove_player(&mut self, id: PlayerId) -> Result<Departure, GameError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::NotInRoom(id))?;
        let player = self.players.remove(index);

        if let Some(pos) = self.card_line.iter().position(|&p| p == id) {
            self.card_line.remove(pos);
            if pos < self.revealed_count {
                self.revealed_count -= 1;
            }
        }

        let mut new_host = None;
        if self.host_id == id {
            // Join order is preserved in `players`, so the first remaining
            // entry is the longest-resident player.
            if let Some(next) = self.players.first() {
                self.host_id = next.id;
                new_host = Some(next.id);
            }
        }

        let mut round_ended = false;
        if self.status == RoomStatus::Revealing
            && !self.players.is_empty()
            && self.revealed_count >= self.card_line.len()
        {
            self.finish_round();
            round_ended = true;
        }

        Ok(Departure { player, new_host, room_closed: false, round_ended })
    }
}
