//! `LineupServer` builder and accept loop.

use std::net::SocketAddr;

use lineup_room::{GameConfig, RegistryHandle, RoomRegistry, spawn_registry};

use crate::LineupError;
use crate::handler::handle_connection;
use crate::transport::WebSocketListener;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Server-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub bind_addr: String,

    /// Capacity of the registry actor's command queue.
    pub channel_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }
}

impl ServerConfig {
    /// Reads `LINEUP_BIND` and `PORT` from the process environment,
    /// falling back to the defaults.
    pub fn from_env() -> Result<Self, LineupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, LineupError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("LINEUP_BIND") {
            config.bind_addr = addr;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| LineupError::Config(format!("PORT={port:?} is not a port number")))?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        Ok(config)
    }
}

/// Builder for configuring and starting a Lineup server.
///
/// # Example
///
/// ```rust,no_run
/// use lineup::prelude::*;
///
/// # async fn start() -> Result<(), LineupError> {
/// let server = LineupServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct LineupServerBuilder {
    config: ServerConfig,
    game_config: GameConfig,
    seed: Option<u64>,
}

impl LineupServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            game_config: GameConfig::default(),
            seed: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Replaces the server settings wholesale.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the game rules every room is created with.
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }

    /// Seeds the registry's random source, making room codes and dealt
    /// numbers reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Binds the listener and starts the registry actor.
    pub async fn build(self) -> Result<LineupServer, LineupError> {
        let listener = WebSocketListener::bind(&self.config.bind_addr).await?;

        let registry = match self.seed {
            Some(seed) => RoomRegistry::with_seed(self.game_config, seed),
            None => RoomRegistry::new(self.game_config),
        };
        let registry = spawn_registry(registry, self.config.channel_size);

        Ok(LineupServer { listener, registry })
    }
}

impl Default for LineupServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Lineup server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct LineupServer {
    listener: WebSocketListener,
    registry: RegistryHandle,
}

impl LineupServer {
    pub fn builder() -> LineupServerBuilder {
        LineupServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// A handle to the room registry, for inspecting a running server.
    pub fn registry(&self) -> RegistryHandle {
        self.registry.clone()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), LineupError> {
        tracing::info!(addr = ?self.local_addr().ok(), "lineup server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let registry = self.registry.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, registry).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
