//! Room registry: the single owner of every active room.

use std::collections::HashMap;

use lineup_protocol::{FinalPlacement, PlayerId, RevealData, RoomCode, ViewState};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::room::Departure;
use crate::{GameConfig, GameError, Room, code, view};

/// Maps room codes to rooms and is the only way to change one.
///
/// Each method is all-or-nothing: on `Err` no room was modified. The
/// registry itself is a plain synchronous value; serializing access across
/// connections is the job of the actor in [`crate::spawn_registry`].
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    config: GameConfig,
    rng: StdRng,
}

impl RoomRegistry {
    /// Creates an empty registry seeded from the OS.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an empty registry with a fixed seed, so codes and dealt
    /// numbers are reproducible.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
            rng,
        }
    }

    /// Opens a new room in the lobby with `host` as its only player.
    pub fn create_room(
        &mut self,
        host: PlayerId,
        host_name: &str,
    ) -> Result<&Room, GameError> {
        let name = clean_name(host_name)?;
        let rooms = &self.rooms;
        let code = code::generate(&mut self.rng, self.config.max_code_attempts, |c| {
            rooms.contains_key(c)
        })?;

        tracing::info!(room = %code, %host, "room created");
        let room = Room::new(code.clone(), host, name);
        Ok(self.rooms.entry(code).or_insert(room))
    }

    /// Adds a player to a room that is still in its lobby.
    pub fn join_room(
        &mut self,
        code: &RoomCode,
        player: PlayerId,
        name: &str,
    ) -> Result<&Room, GameError> {
        let name = clean_name(name)?;
        let max_players = self.config.max_players();
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))?;

        room.add_player(player, name, max_players)?;
        tracing::info!(
            room = %code,
            %player,
            players = room.players.len(),
            "player joined"
        );
        Ok(room)
    }

    /// Takes a player out of a room, deleting the room if it empties.
    ///
    /// See [`Departure`] for what the caller learns about the aftermath.
    pub fn remove_player(
        &mut self,
        code: &RoomCode,
        player: PlayerId,
    ) -> Result<Departure, GameError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))?;

        let mut departure = room.remove_player(player)?;
        tracing::info!(
            room = %code,
            %player,
            players = room.players.len(),
            "player left"
        );

        if room.is_empty() {
            self.rooms.remove(code);
            departure.room_closed = true;
            tracing::info!(room = %code, "room closed");
        }
        Ok(departure)
    }

    /// Read-only lookup.
    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Deals numbers and starts (or restarts) a round. Host only.
    pub fn start_round(
        &mut self,
        code: &RoomCode,
        requester: PlayerId,
    ) -> Result<&Room, GameError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))?;

        room.start_round(requester, &self.config, &mut self.rng)?;
        tracing::info!(room = %code, players = room.players.len(), "round started");
        Ok(room)
    }

    /// Appends `player`'s card. Returns the position it landed at.
    pub fn place_card(
        &mut self,
        code: &RoomCode,
        player: PlayerId,
        position: usize,
    ) -> Result<usize, GameError> {
        self.room_mut(code)?.place_card(player, position)
    }

    pub fn move_card(
        &mut self,
        code: &RoomCode,
        from: usize,
        to: usize,
    ) -> Result<(), GameError> {
        self.room_mut(code)?.move_card(from, to)
    }

    pub fn start_reveal(&mut self, code: &RoomCode) -> Result<&Room, GameError> {
        let room = self.room_mut(code)?;
        room.start_reveal()?;
        tracing::debug!(room = %code, "reveal started");
        Ok(room)
    }

    /// Reveals the next card. The returned room shows whether that was the
    /// last one (`status() == Ended`).
    pub fn reveal_next(
        &mut self,
        code: &RoomCode,
    ) -> Result<(RevealData, &Room), GameError> {
        let room = self.room_mut(code)?;
        let data = room.reveal_next()?;
        Ok((data, room))
    }

    pub fn final_results(
        &self,
        code: &RoomCode,
    ) -> Result<Vec<FinalPlacement>, GameError> {
        self.rooms
            .get(code)
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))?
            .final_results()
    }

    /// The room as `viewer` is allowed to see it.
    pub fn project(&self, code: &RoomCode, viewer: PlayerId) -> Option<ViewState> {
        self.rooms.get(code).map(|room| view::project(room, viewer))
    }

    /// Number of active rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn room_mut(&mut self, code: &RoomCode) -> Result<&mut Room, GameError> {
        self.rooms
            .get_mut(code)
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

fn clean_name(name: &str) -> Result<String, GameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::EmptyName);
    }
    Ok(trimmed.to_string())
}
