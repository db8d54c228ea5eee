//! Integration tests for FIFO inputs.

mod common;

use common::{TestClient, TestServer};
use std::io::Write;
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(300);

async fn feed_in_log(server: &TestServer) -> TestClient {
    let mut alice = TestClient::connect(&server.address(), "alice").await.unwrap();
    alice.register().await.unwrap();
    alice.join("&log").await.unwrap();
    alice.invite("feed1", "&log").await.unwrap();
    alice
}

fn texts(messages: &[irclogd_proto::Message]) -> Vec<String> {
    messages.iter().map(|m| m.params[1].clone()).collect()
}

#[tokio::test]
async fn test_fifo_on_regular_file_fails() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;
    let file = tempfile::NamedTempFile::new().unwrap();

    alice
        .privmsg("&log", &format!("feed1: input fifo {}", file.path().display()))
        .await
        .unwrap();
    assert_eq!(
        texts(&alice.drain(QUIET).await),
        vec![
            "Switching user input to fifo",
            "Failed switching input!",
            "Error: Path argument is not a valid fifo!",
        ]
    );

    alice.privmsg("&log", "feed1: status").await.unwrap();
    let status = alice.drain(QUIET).await;
    assert_eq!(status[0].params[1], "Input: input/none");
}

#[tokio::test]
async fn test_fifo_missing_path() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;
    let dir = tempfile::tempdir().unwrap();

    alice
        .privmsg(
            "&log",
            &format!("feed1: input fifo {}", dir.path().join("absent").display()),
        )
        .await
        .unwrap();
    let notices = texts(&alice.drain(QUIET).await);
    assert_eq!(notices.last().unwrap(), "Error: Path argument does not exist!");
}

#[tokio::test]
async fn test_fifo_lines_become_privmsgs() {
    let server = TestServer::spawn().await.unwrap();
    let mut alice = feed_in_log(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed");
    let status = std::process::Command::new("mkfifo").arg(&path).status().unwrap();
    assert!(status.success());

    alice
        .privmsg("&log", &format!("feed1: input fifo {}", path.display()))
        .await
        .unwrap();
    assert_eq!(
        texts(&alice.drain(QUIET).await),
        vec![
            "Switching user input to fifo".to_string(),
            format!("Reading from fifo: {}", path.display()),
        ]
    );

    let writer_path = path.clone();
    tokio::task::spawn_blocking(move || {
        let mut pipe = std::fs::OpenOptions::new().write(true).open(writer_path).unwrap();
        pipe.write_all(b"build started\nbuild finished\n").unwrap();
    })
    .await
    .unwrap();

    let first = alice.recv().await.unwrap();
    let second = alice.recv().await.unwrap();
    assert_eq!(first.prefix.as_deref(), Some("feed1!input/fifo@test.irclogd"));
    assert_eq!(first.params, vec!["&log", "build started"]);
    assert_eq!(second.params, vec!["&log", "build finished"]);
}
