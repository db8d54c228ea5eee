//! Integration test common infrastructure.
//!
//! Provides an in-process gateway and a line-oriented test client.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;

/// Reserve a UDP port that is free right now.
#[allow(dead_code)]
pub fn free_udp_port() -> u16 {
    let socket = std::net::UdpSocket::bind(("127.0.0.1", 0)).unwrap();
    socket.local_addr().unwrap().port()
}
