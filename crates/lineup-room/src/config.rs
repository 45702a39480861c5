//! Game configuration.

use serde::{Deserialize, Serialize};

/// Tunables for rooms and rounds.
///
/// The defaults are the classic rules: at least two players, secret
/// numbers from 1 to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum players required to start a round.
    pub min_players: usize,

    /// Smallest number that can be dealt.
    pub number_min: u8,

    /// Largest number that can be dealt (inclusive).
    pub number_max: u8,

    /// How many times the code generator may collide with an existing
    /// room before giving up.
    pub max_code_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            number_min: 1,
            number_max: 100,
            max_code_attempts: 10_000,
        }
    }
}

impl GameConfig {
    /// Size of the number range. Each player needs a distinct number, so
    /// this is also the most players a room can hold.
    pub fn max_players(&self) -> usize {
        if self.number_max < self.number_min {
            return 0;
        }
        usize::from(self.number_max - self.number_min) + 1
    }
}
