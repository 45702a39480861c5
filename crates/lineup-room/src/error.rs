//! Error types for room and round operations.

use lineup_protocol::{PlayerId, RoomCode};

/// Why a room or round operation was refused.
///
/// Every variant is recoverable: the operation that produced it made no
/// change to the room, and only the player who asked is told about it.
/// The `Display` text is what ends up in that player's `error` message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No active room has this code.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// The room exists but a round is running or finished; joins are only
    /// accepted in the lobby.
    #[error("room {0} is not accepting players right now")]
    RoomNotJoinable(RoomCode),

    /// There are as many players as there are distinct numbers to deal.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The player is already in a room (possibly this one).
    #[error("already in room {0}")]
    AlreadyInRoom(RoomCode),

    /// The player is not a member of the room they acted on.
    #[error("player {0} is not in this room")]
    NotInRoom(PlayerId),

    /// Player names must contain something other than whitespace.
    #[error("name must not be empty")]
    EmptyName,

    /// Only the host may start or replay a round.
    #[error("only the host can start a round")]
    NotHost,

    #[error("need at least {need} players to start, have {have}")]
    TooFewPlayers { have: usize, need: usize },

    /// A round is being played or revealed; finish it before starting again.
    #[error("a round is already in progress")]
    RoundInProgress,

    /// Cards can only be placed or moved while the round is being played.
    #[error("cards can only be placed or moved during play")]
    NotPlaying,

    #[error("you have already placed your card")]
    AlreadyPlaced,

    /// Placement is append-only: the only legal position is the end.
    #[error("invalid position {position}, the next free position is {expected}")]
    InvalidPosition { position: usize, expected: usize },

    #[error("index {index} is out of range for a line of {len} cards")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("all players must place their cards first ({placed} of {players} placed)")]
    NotAllPlaced { placed: usize, players: usize },

    #[error("the reveal has not started")]
    NotRevealing,

    #[error("every card has already been revealed")]
    NothingToReveal,

    /// Final results exist only once the round has ended.
    #[error("the round has not ended yet")]
    RoundNotEnded,

    /// The code generator kept colliding with existing rooms.
    #[error("could not allocate a room code after {0} attempts")]
    CodesExhausted(usize),
}

/// The registry actor has stopped and can no longer take commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("room registry is unavailable")]
pub struct RegistryClosed;
