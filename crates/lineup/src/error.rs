//! Unified error type for the Lineup server.

use lineup_protocol::ProtocolError;
use lineup_room::RegistryClosed;

use crate::transport::TransportError;

/// Top-level error wrapping the errors of each layer.
///
/// Game rule violations are not here: those are [`lineup_room::GameError`]s,
/// which are reported to the offending player and never end a connection.
#[derive(Debug, thiserror::Error)]
pub enum LineupError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The registry actor has stopped.
    #[error(transparent)]
    Registry(#[from] RegistryClosed),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
