//! Wire protocol for Lineup.
//!
//! This crate defines the vocabulary the server and browser clients share:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`ViewState`], etc.):
//!   the messages and snapshots that travel over a socket.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into frame text and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! It knows nothing about rooms or connections; the room crate decides what
//! to say and the server crate decides where to send it.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, FinalPlacement, PlayerId, PlayerView, ROOM_CODE_ALPHABET,
    ROOM_CODE_LEN, RevealData, RoomCode, RoomStatus, RoundResult, ServerMessage,
    ViewState,
};
