//! Room registry and round state machine for Lineup.
//!
//! This crate is the authoritative model of every game room: who is in it,
//! which secret number each player holds, the order of the card line, and
//! how the staged reveal decides a win or a loss.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: owns all rooms; every mutation goes through it
//! - [`Room`]: one room, readable from outside, mutable only via the registry
//! - [`project`]: the per-viewer snapshot that hides other players' numbers
//! - [`RegistryHandle`]: talk to the actor that serializes access to the registry
//! - [`GameConfig`]: player minimum, number range, code allocation limits
//!
//! # Layout
//!
//! ```text
//! code, dealer          leaf helpers (randomness only)
//!     ↓
//! room, round           the Room entity and its lifecycle
//!     ↓
//! registry, view        lookup by code, snapshots
//!     ↓
//! actor                 one task, one writer, broadcasts to players
//! ```

mod actor;
pub mod code;
mod config;
pub mod dealer;
mod error;
mod registry;
mod room;
mod round;
mod view;

pub use actor::{PlayerSender, RegistryHandle, spawn_registry};
pub use config::GameConfig;
pub use error::{GameError, RegistryClosed};
pub use registry::RoomRegistry;
pub use room::{Departure, Player, Room};
pub use view::project;
