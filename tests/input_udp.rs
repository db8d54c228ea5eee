//! Integration tests for UDP inputs.

mod common;

use common::{TestClient, TestServer, free_udp_port};
use std::time::Duration;
use tokio::net::UdpSocket;

const QUIET: Duration = Duration::from_millis(300);

async fn feed_in_log(server: &TestServer) -> TestClient {
    let mut alice = TestClient::connect(&server.address(), "alice").await.unwrap();
    alice.register().await.unwrap();
    alice.join("&log").await.unwrap();
    alice.invite("feed1", "&log").await.unwrap();
    alice
}

#[tokio::test]
async fn test_udp_lines_become_privmsgs() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;
    let port = free_udp_port();

    alice
        .privmsg("&log", &format!("feed1: input udp {port}"))
        .await
        .unwrap();
    let notices = alice.drain(QUIET).await;
    let texts: Vec<&str> = notices.iter().map(|m| m.params[1].as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Switching user input to udp".to_string(),
            format!("Started listening on UDP port {port}"),
        ]
    );

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender
        .send_to(b"hello\nworld", ("127.0.0.1", port))
        .await
        .unwrap();

    let first = alice.recv().await.unwrap();
    let second = alice.recv().await.unwrap();
    for (msg, text) in [(&first, "hello"), (&second, "world")] {
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.prefix.as_deref(), Some("feed1!input/udp@test.irclogd"));
        assert_eq!(msg.params, vec!["&log", text]);
    }
}

#[tokio::test]
async fn test_udp_allow_list() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;
    let port = free_udp_port();

    alice
        .privmsg("&log", &format!("feed1: input udp {port} 10.0.0.1"))
        .await
        .unwrap();
    let notices = alice.drain(QUIET).await;
    assert_eq!(notices.last().unwrap().params[1], "Accepted hosts: 10.0.0.1");

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"dropped", ("127.0.0.1", port)).await.unwrap();
    assert!(alice.drain(QUIET).await.is_empty());
}

#[tokio::test]
async fn test_udp_bad_port_and_reset() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;

    alice.privmsg("&log", "feed1: input udp nine").await.unwrap();
    let notices = alice.drain(QUIET).await;
    let texts: Vec<&str> = notices.iter().map(|m| m.params[1].as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Switching user input to udp",
            "Failed switching input!",
            "Error: Udp input requires one numeric port argument",
        ]
    );

    let port = free_udp_port();
    alice
        .privmsg("&log", &format!("feed1: input udp {port}"))
        .await
        .unwrap();
    alice.drain(QUIET).await;

    alice.privmsg("&log", "feed1: reset").await.unwrap();
    let stopped = alice.recv().await.unwrap();
    assert_eq!(stopped.params[1], format!("Stopped listening on UDP port {port}"));
    assert_eq!(
        stopped.prefix.as_deref(),
        Some("feed1!input/none@test.irclogd")
    );
}

#[tokio::test]
async fn test_kick_stops_input() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;
    let port = free_udp_port();

    alice
        .privmsg("&log", &format!("feed1: input udp {port}"))
        .await
        .unwrap();
    alice.drain(QUIET).await;

    alice.send_raw("KICK &log feed1").await.unwrap();
    assert_eq!(alice.recv().await.unwrap().command, "KICK");

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"too late", ("127.0.0.1", port)).await.unwrap();
    assert!(alice.drain(QUIET).await.is_empty());
}

#[tokio::test]
async fn test_reset_frees_port_for_next_line() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;
    let port = free_udp_port();

    alice
        .privmsg("&log", &format!("feed1: input udp {port}"))
        .await
        .unwrap();
    alice.drain(QUIET).await;

    alice.privmsg("&log", "feed1: reset").await.unwrap();
    alice
        .privmsg("&log", &format!("feed1: input udp {port}"))
        .await
        .unwrap();
    let notices = alice.drain(QUIET).await;
    let texts: Vec<&str> = notices.iter().map(|m| m.params[1].as_str()).collect();
    assert_eq!(
        texts,
        vec![
            format!("Stopped listening on UDP port {port}"),
            "Switching user input to udp".to_string(),
            format!("Started listening on UDP port {port}"),
        ]
    );

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"again", ("127.0.0.1", port)).await.unwrap();
    let relayed = alice.recv().await.unwrap();
    assert_eq!(relayed.params, vec!["&log", "again"]);
}
