//! WebSocket listener and connection halves, built on `tokio-tungstenite`.
//!
//! Every accepted socket is given a fresh [`PlayerId`]: identity lives
//! exactly as long as the connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use lineup_protocol::PlayerId;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

/// Source of player ids. Starts at 1 so `P-0` never appears.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listener or accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The peer connected over TCP but the WebSocket upgrade failed.
    #[error("websocket handshake with {addr} failed: {source}")]
    Handshake {
        addr: SocketAddr,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("send failed: {0}")]
    SendFailed(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] tokio_tungstenite::tungstenite::Error),
}

/// Listens for WebSocket clients.
pub struct WebSocketListener {
    listener: TcpListener,
}

impl WebSocketListener {
    /// Binds to `addr`. Use port 0 to let the OS pick one.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "websocket listener bound");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for the next client and completes its WebSocket upgrade.
    pub async fn accept(&self) -> Result<WebSocketConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|source| TransportError::Handshake { addr, source })?;

        let id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(player_id = %id, %addr, "accepted websocket connection");

        Ok(WebSocketConnection { id, addr, ws })
    }
}

/// One accepted client, before it is split into its two halves.
pub struct WebSocketConnection {
    id: PlayerId,
    addr: SocketAddr,
    ws: WsStream,
}

impl WebSocketConnection {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Splits the socket so reading and writing can run in separate tasks.
    pub fn split(self) -> (Outbound, Inbound) {
        let (sink, stream) = self.ws.split();
        (Outbound { sink }, Inbound { stream })
    }
}

/// Write half of a connection.
pub struct Outbound {
    sink: SplitSink<WsStream, Message>,
}

impl Outbound {
    /// Sends one text frame.
    pub async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::text(text))
            .await
            .map_err(TransportError::SendFailed)
    }

    /// Sends a close frame. Errors are ignored: the peer may already be gone.
    pub async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}

/// Read half of a connection.
pub struct Inbound {
    stream: SplitStream<WsStream>,
}

impl Inbound {
    /// Receives the payload of the next data frame.
    ///
    /// Text and binary frames are both accepted; control frames are
    /// skipped. Returns `Ok(None)` once the peer closes.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_bytes().to_vec())),
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.to_vec())),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e)),
            }
        }
    }
}
