//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task and owns its `Session`. One
//! `tokio::select!` loop waits on two sources:
//!
//! ```text
//!   client socket ──▶ IrcCodec ──▶ Registry::dispatch ─┐
//!                                                      ├──▶ Session ──▶ pending ──▶ IrcCodec ──▶ client socket
//!   input tasks ───▶ mpsc<InputEvent> ─────────────────┘
//! ```
//!
//! Each command or input line is handled to completion before the next one
//! is looked at. Input tasks it stopped are awaited, so their sockets and
//! pipes are closed, and everything it queued is written and flushed before
//! the loop waits again.

use crate::error::HandlerError;
use crate::handlers::Registry;
use crate::state::{ServerInfo, Session};
use futures_util::{SinkExt, StreamExt};
use irclogd_proto::{IrcCodec, ProtocolError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, info, instrument, trace};

/// Capacity of the queue between input tasks and the session.
const EVENT_QUEUE_DEPTH: usize = 1024;

/// A client connection handler.
pub struct Connection {
    addr: SocketAddr,
    stream: TcpStream,
    info: Arc<ServerInfo>,
    registry: Arc<Registry>,
    max_line_len: usize,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        info: Arc<ServerInfo>,
        registry: Arc<Registry>,
        max_line_len: usize,
    ) -> Self {
        Self {
            addr,
            stream,
            info,
            registry,
            max_line_len,
        }
    }

    /// Run the connection until the client quits or the transport fails.
    /// Everything the session owns is torn down on the way out.
    #[instrument(skip(self), fields(addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        info!(server = %self.info.name, "Client connected");

        let (tx, mut events) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let mut session = Session::new(Arc::clone(&self.info), tx);
        let mut framed = Framed::new(self.stream, IrcCodec::with_max_len(self.max_line_len));

        let result: anyhow::Result<()> = loop {
            let quit = tokio::select! {
                frame = framed.next() => match frame {
                    Some(Ok(msg)) => {
                        trace!(line = %msg, "Received");
                        match self.registry.dispatch(&mut session, &msg) {
                            Ok(()) => false,
                            Err(HandlerError::Quit(_)) => true,
                            Err(e) => {
                                debug!(command = %msg.command, error = %e, code = e.error_code(), "Command failed");
                                if let Some(reply) = e.to_irc_reply(session.host(), session.nick()) {
                                    session.push(reply);
                                }
                                false
                            }
                        }
                    }
                    Some(Err(e)) => break Err(e.into()),
                    None => {
                        info!(nick = %session.nick(), "Client disconnected");
                        break Ok(());
                    }
                },
                Some(event) = events.recv() => {
                    session.handle_input_event(event);
                    false
                }
            };

            session.release_stopped().await;
            if let Err(e) = flush_pending(&mut framed, &mut session).await {
                break Err(e.into());
            }

            if quit {
                break Ok(());
            }
        };

        session.close();
        session.release_stopped().await;
        result
    }
}

/// Write everything the session queued, then flush once.
async fn flush_pending(
    framed: &mut Framed<TcpStream, IrcCodec>,
    session: &mut Session,
) -> Result<(), ProtocolError> {
    let pending = session.take_pending();
    if pending.is_empty() {
        return Ok(());
    }
    for msg in pending {
        trace!(line = %msg, "Sending");
        framed.feed(msg).await?;
    }
    framed.flush().await
}
