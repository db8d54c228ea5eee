//! UDP datagram input.
//!
//! `input udp <port> [host...]` binds `0.0.0.0:<port>`. Optional hosts form
//! an allow-list compared against the sender's IP address string; datagrams
//! from anyone else are dropped without notice.

use super::{LineSink, Stopped, abort_task};
use crate::error::InputError;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const USAGE: &str = "Udp input requires one numeric port argument";

/// Largest payload a single datagram can carry.
const MAX_DATAGRAM: usize = 65_535;

/// Pause after a failed receive before trying again.
const RECV_RETRY_DELAY: Duration = Duration::from_millis(100);

/// A UDP listener bound for one virtual user.
#[derive(Debug)]
pub struct UdpInput {
    port: u16,
    allow: Option<Vec<String>>,
    socket: Option<UdpSocket>,
    task: Option<JoinHandle<()>>,
}

impl UdpInput {
    /// Parse `<port> [host...]` and bind the socket.
    pub fn bind(args: &[&str]) -> Result<Self, InputError> {
        let (port, hosts) = args
            .split_first()
            .ok_or_else(|| InputError::InvalidArgument(USAGE.to_string()))?;
        let port = parse_port(port)?;
        let allow = (!hosts.is_empty()).then(|| hosts.iter().map(|h| h.to_string()).collect());

        let std_socket = std::net::UdpSocket::bind(("0.0.0.0", port))
            .map_err(|source| InputError::Bind { port, source })?;
        std_socket
            .set_nonblocking(true)
            .map_err(|source| InputError::Bind { port, source })?;
        let socket =
            UdpSocket::from_std(std_socket).map_err(|source| InputError::Bind { port, source })?;

        Ok(Self {
            port,
            allow,
            socket: Some(socket),
            task: None,
        })
    }

    pub(super) fn start(&mut self, sink: LineSink) -> Vec<String> {
        let mut notices = vec![format!("Started listening on UDP port {}", self.port)];
        if let Some(allow) = &self.allow {
            notices.push(format!("Accepted hosts: {}", allow.join(", ")));
        }

        if let Some(socket) = self.socket.take() {
            info!(port = self.port, allow = ?self.allow, "UDP input started");
            self.task = Some(tokio::spawn(receive_loop(socket, self.allow.clone(), sink)));
        }
        notices
    }

    pub(super) fn stop(&mut self) -> Stopped {
        let task = abort_task(&mut self.task);
        self.socket = None;
        info!(port = self.port, "UDP input stopped");
        Stopped {
            notice: format!("Stopped listening on UDP port {}", self.port),
            task,
        }
    }

    pub(super) fn describe(&self) -> String {
        match &self.allow {
            Some(allow) => format!(
                "Listening on UDP port {} (accepting {})",
                self.port,
                allow.join(", ")
            ),
            None => format!("Listening on UDP port {}", self.port),
        }
    }
}

impl Drop for UdpInput {
    fn drop(&mut self) {
        abort_task(&mut self.task);
    }
}

fn parse_port(arg: &str) -> Result<u16, InputError> {
    arg.parse::<u16>()
        .ok()
        .filter(|port| *port > 0)
        .ok_or_else(|| InputError::InvalidArgument(USAGE.to_string()))
}

/// Whether a datagram from `host` passes the allow-list.
fn accepts(allow: Option<&[String]>, host: &str) -> bool {
    allow.is_none_or(|hosts| hosts.iter().any(|h| h == host))
}

async fn receive_loop(socket: UdpSocket, allow: Option<Vec<String>>, sink: LineSink) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "UDP receive failed");
                tokio::time::sleep(RECV_RETRY_DELAY).await;
                continue;
            }
        };

        let host = peer.ip().to_string();
        if !accepts(allow.as_deref(), &host) {
            debug!(%host, "Dropping datagram from host outside allow-list");
            continue;
        }

        let text = String::from_utf8_lossy(&buf[..len]);
        if !sink.emit_lines(&text).await {
            break;
        }
    }
}
