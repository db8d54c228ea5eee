//! Test server management.
//!
//! Runs a gateway inside the test's own runtime on an ephemeral port.

use irclogd::config::Config;
use irclogd::network::Gateway;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// Hostname every test server presents.
#[allow(dead_code)]
pub const HOST: &str = "test.irclogd";

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Bind a gateway on `127.0.0.1:0` and start accepting.
    pub async fn spawn() -> anyhow::Result<Self> {
        let config: Config = toml::from_str(&format!(
            r#"
[server]
name = "{HOST}"

[listen]
address = "127.0.0.1:0"

[motd]
lines = ["Test Server"]
"#
        ))?;

        let gateway = Gateway::bind(&config).await?;
        let addr = gateway.local_addr()?;
        let task = tokio::spawn(gateway.run());
        Ok(Self { addr, task })
    }

    /// Address clients should connect to.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
