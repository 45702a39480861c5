//! The round state machine.
//!
//! ```text
//! Lobby ──start_round──→ Playing ──start_reveal──→ Revealing ──reveal_next (last)──→ Ended
//!                           ↑                                                        │
//!                           └──────────────────── start_round ───────────────────────┘
//! ```
//!
//! Each operation checks every precondition before touching the room, so a
//! rejected call leaves it exactly as it was.

use lineup_protocol::{FinalPlacement, PlayerId, RevealData, RoomStatus, RoundResult};
use rand::Rng;

use crate::{GameConfig, GameError, Player, Room, dealer};

impl Room {
    /// Deals a fresh number to every player and opens the table.
    ///
    /// This is also "play again": from `Ended` it wipes the previous line
    /// and result and deals again. Numbers from earlier rounds have no
    /// influence on the new draw.
    pub(crate) fn start_round<R: Rng + ?Sized>(
        &mut self,
        requester: PlayerId,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<(), GameError> {
        if !self.contains(requester) {
            return Err(GameError::NotInRoom(requester));
        }
        if requester != self.host_id {
            return Err(GameError::NotHost);
        }
        if !self.status.can_start_round() {
            return Err(GameError::RoundInProgress);
        }
        if self.players.len() < config.min_players {
            return Err(GameError::TooFewPlayers {
                have: self.players.len(),
                need: config.min_players,
            });
        }

        let numbers =
            dealer::deal(rng, self.players.len(), config.number_min, config.number_max);
        if numbers.len() < self.players.len() {
            return Err(GameError::RoomFull(self.code.clone()));
        }

        for (player, number) in self.players.iter_mut().zip(numbers) {
            player.number = Some(number);
        }
        self.card_line.clear();
        self.revealed_count = 0;
        self.result = None;
        self.status = RoomStatus::Playing;
        Ok(())
    }

    /// Puts `player`'s card at the right end of the line.
    ///
    /// `position` must be the current line length. Cards are never inserted
    /// mid-line here; that is what [`Room::move_card`] is for.
    pub(crate) fn place_card(
        &mut self,
        player: PlayerId,
        position: usize,
    ) -> Result<usize, GameError> {
        if self.status != RoomStatus::Playing {
            return Err(GameError::NotPlaying);
        }
        if !self.contains(player) {
            return Err(GameError::NotInRoom(player));
        }
        if self.card_line.contains(&player) {
            return Err(GameError::AlreadyPlaced);
        }
        let expected = self.card_line.len();
        if position != expected {
            return Err(GameError::InvalidPosition { position, expected });
        }

        self.card_line.push(player);
        Ok(position)
    }

    /// Moves the card at `from` so it ends up at `to`.
    ///
    /// Anyone at the table may move any card.
    pub(crate) fn move_card(&mut self, from: usize, to: usize) -> Result<(), GameError> {
        if self.status != RoomStatus::Playing {
            return Err(GameError::NotPlaying);
        }
        let len = self.card_line.len();
        for index in [from, to] {
            if index >= len {
                return Err(GameError::IndexOutOfRange { index, len });
            }
        }

        let card = self.card_line.remove(from);
        self.card_line.insert(to, card);
        Ok(())
    }

    /// Locks the line. Requires every player to have placed.
    pub(crate) fn start_reveal(&mut self) -> Result<(), GameError> {
        if self.status != RoomStatus::Playing {
            return Err(GameError::NotPlaying);
        }
        if self.card_line.len() != self.players.len() {
            return Err(GameError::NotAllPlaced {
                placed: self.card_line.len(),
                players: self.players.len(),
            });
        }

        self.status = RoomStatus::Revealing;
        self.revealed_count = 0;
        Ok(())
    }

    /// Turns over the next card from the left.
    ///
    /// A card is correct if it is at least as high as everything revealed
    /// before it. A wrong card does not stop the reveal; the round ends only
    /// after the last card, and then the result is decided on the whole line.
    pub(crate) fn reveal_next(&mut self) -> Result<RevealData, GameError> {
        if self.status != RoomStatus::Revealing {
            return Err(GameError::NotRevealing);
        }
        let index = self.revealed_count;
        let Some(&player_id) = self.card_line.get(index) else {
            return Err(GameError::NothingToReveal);
        };
        let (player_name, number) = match self.player(player_id) {
            Some(Player { name, number: Some(n), .. }) => (name.clone(), *n),
            _ => return Err(GameError::NotInRoom(player_id)),
        };

        let highest_so_far = self.card_line[..index]
            .iter()
            .filter_map(|&id| self.number_of(id))
            .max();
        let is_correct = highest_so_far.is_none_or(|max| number >= max);

        self.revealed_count += 1;
        if self.revealed_count == self.card_line.len() {
            self.finish_round();
        }

        Ok(RevealData { index, player_id, player_name, number, is_correct })
    }

    /// The line as it was revealed, left to right.
    pub fn final_results(&self) -> Result<Vec<FinalPlacement>, GameError> {
        if self.status != RoomStatus::Ended {
            return Err(GameError::RoundNotEnded);
        }
        Ok(self
            .card_line
            .iter()
            .filter_map(|&id| self.player(id))
            .filter_map(|p| {
                p.number.map(|number| FinalPlacement { name: p.name.clone(), number })
            })
            .collect())
    }

    /// Ends the round and scores the line as it stands.
    pub(crate) fn finish_round(&mut self) {
        let numbers: Vec<u8> =
            self.card_line.iter().filter_map(|&id| self.number_of(id)).collect();
        let ascending = numbers.windows(2).all(|pair| pair[0] <= pair[1]);

        self.status = RoomStatus::Ended;
        self.result = Some(if ascending { RoundResult::Win } else { RoundResult::Lose });
        tracing::info!(room = %self.code, result = ?self.result, "round ended");
    }

    fn number_of(&self, id: PlayerId) -> Option<u8> {
        self.player(id).and_then(|p| p.number)
    }
}
