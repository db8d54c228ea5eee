//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the configured address and spawns a Connection task
//! for each incoming client.

use crate::config::Config;
use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::ServerInfo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    info: Arc<ServerInfo>,
    registry: Arc<Registry>,
    max_line_len: usize,
}

impl Gateway {
    /// Bind the gateway to the configured listen address.
    pub async fn bind(config: &Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.listen.address).await?;
        let addr = listener.local_addr()?;
        info!(%addr, server = %config.server.name, "Listener bound");

        Ok(Self {
            listener,
            info: Arc::new(ServerInfo::from_config(config)),
            registry: Arc::new(Registry::new()),
            max_line_len: config.listen.max_line_len,
        })
    }

    /// The address actually bound, useful when the port was 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let connection = Connection::new(
                        stream,
                        addr,
                        Arc::clone(&self.info),
                        Arc::clone(&self.registry),
                        self.max_line_len,
                    );
                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            error!(%addr, error = %e, "Connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Accept error");
                }
            }
        }
    }
}
