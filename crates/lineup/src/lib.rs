//! # Lineup
//!
//! WebSocket game server for Lineup, a cooperative party game: every
//! player is dealt a secret number and the table tries to lay its cards
//! out in ascending order without ever saying the numbers aloud.
//!
//! The server ties the layers together: transport → protocol → registry
//! actor. Game rules live in [`lineup_room`], wire types in
//! [`lineup_protocol`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lineup::prelude::*;
//!
//! # async fn start() -> Result<(), LineupError> {
//! let config = ServerConfig::from_env()?;
//! let server = LineupServer::builder().config(config).build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
pub mod transport;

pub use error::LineupError;
pub use server::{LineupServer, LineupServerBuilder, ServerConfig};

pub mod prelude {
    pub use crate::{LineupError, LineupServer, LineupServerBuilder, ServerConfig};
    pub use lineup_protocol::{
        ClientMessage, Codec, JsonCodec, PlayerId, RoomCode, RoomStatus, RoundResult,
        ServerMessage, ViewState,
    };
    pub use lineup_room::{GameConfig, GameError};
}
