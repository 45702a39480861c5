//! Core protocol types for Lineup's wire format.
//!
//! Every type in this module either travels over the socket as JSON or is
//! embedded in something that does. Field names are camelCase on the wire
//! because the browser client is written against that shape.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// The transport assigns one per socket from a process-wide counter, so it is
/// stable for the lifetime of a connection and never reused. A newtype keeps
/// it from being confused with card positions or numbers, which are also
/// small integers.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Characters a room code may contain. `I`, `O`, `0` and `1` are left out
/// so codes can be read aloud and typed without ambiguity.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in a room code.
pub const ROOM_CODE_LEN: usize = 4;

/// The short, human-typeable code that identifies a room.
///
/// Codes are always stored uppercase. Input typed by players goes through
/// [`RoomCode::normalize`] before any lookup, which is what makes joining
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Builds a code from player input: surrounding whitespace is dropped
    /// and letters are uppercased. No validation happens here; a malformed
    /// code simply won't match any room.
    pub fn normalize(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    /// Returns `true` if the code has the right length and only uses
    /// characters from [`ROOM_CODE_ALPHABET`].
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == ROOM_CODE_LEN
            && self.0.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Round lifecycle
// ---------------------------------------------------------------------------

/// Where a room is in its round lifecycle.
///
/// ```text
/// Lobby → Playing → Revealing → Ended
///            ↑                    │
///            └──── play again ────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Waiting for players. The only state that accepts joins.
    #[default]
    Lobby,
    /// Numbers are dealt; players place and reorder cards.
    Playing,
    /// The line is locked and being revealed one card at a time.
    Revealing,
    /// Every card has been revealed and the result is known.
    Ended,
}

impl RoomStatus {
    /// Returns `true` if new players may join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if a round may be (re)started from this state.
    pub fn can_start_round(&self) -> bool {
        matches!(self, Self::Lobby | Self::Ended)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Playing => write!(f, "playing"),
            Self::Revealing => write!(f, "revealing"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Outcome of a fully revealed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    /// The line was non-decreasing from left to right.
    Win,
    /// At least one card was lower than a card to its left.
    Lose,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Lose => write!(f, "lose"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The public face of a player: never carries their number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
}

/// A room as seen by one particular player.
///
/// This is the only room representation that is ever broadcast. The
/// viewer's own number is in `my_number`; nobody else's number appears
/// anywhere in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub status: RoomStatus,
    /// Players in join order.
    pub players: Vec<PlayerView>,
    /// Player ids in left-to-right placement order.
    pub card_line: Vec<PlayerId>,
    /// The viewer's own number, `None` outside a round.
    pub my_number: Option<u8>,
    /// How many cards from the left have already been revealed.
    pub revealed_count: usize,
    /// Set only once the round has ended.
    pub result: Option<RoundResult>,
}

/// One card turned over during the reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealData {
    /// Position of the card in the line.
    pub index: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub number: u8,
    /// `false` if the number is lower than some card revealed before it.
    pub is_correct: bool,
}

/// One entry of the final line-up shown when a round ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalPlacement {
    pub name: String,
    pub number: u8,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// The room code for in-room actions is implicit: the server remembers
/// which room each connection joined.
///
/// JSON shape: `{ "type": "move-card", "fromIndex": 0, "toIndex": 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Open a new room with the sender as host.
    CreateRoom { name: String },
    /// Join a room by code (case-insensitive).
    JoinRoom { code: String, name: String },
    /// Host only: deal numbers and start a round.
    StartRound,
    /// Host only: same as `StartRound`, sent from the results screen.
    PlayAgain,
    /// Put the sender's card at the right end of the line.
    PlaceCard { position: usize },
    /// Move any card in the line to another position.
    MoveCard { from_index: usize, to_index: usize },
    /// Lock the line and begin the reveal.
    StartReveal,
    /// Turn over the next card.
    RevealNext,
    /// Leave the current room without closing the connection.
    LeaveRoom,
}

/// Everything the server can push to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First message on every connection: tells the client who it is.
    Welcome { player_id: PlayerId },
    /// Reply to `create-room`.
    RoomCreated { code: RoomCode },
    /// Reply to `join-room`.
    RoomJoined { code: RoomCode },
    /// Sent to the other members when someone joins.
    PlayerJoined { player_id: PlayerId, name: String },
    /// Per-viewer room snapshot.
    RoomState(ViewState),
    /// Private: the recipient's number for the new round.
    RoundStarted { your_number: u8 },
    CardPlaced {
        player_id: PlayerId,
        player_name: String,
        position: usize,
    },
    CardMoved { from_index: usize, to_index: usize },
    RevealStarted,
    CardRevealed(RevealData),
    RoundEnded {
        result: RoundResult,
        final_order: Vec<FinalPlacement>,
    },
    PlayerLeft {
        player_id: PlayerId,
        player_name: String,
    },
    HostChanged { new_host_id: PlayerId },
    /// A request was rejected. Only the requester receives this.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
