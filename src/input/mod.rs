//! External line feeds bound to virtual users.
//!
//! An [`InputSource`] is constructed from a kind name and its arguments via
//! the [`INPUT_KINDS`] table. Construction acquires the underlying resource
//! (a bound socket, an open pipe) so that every failure is reported before
//! anything is spawned. [`InputSource::start`] then spawns the reader task,
//! which forwards each received line into the owning session as an
//! [`InputEvent`].
//!
//! The reader task owns the socket or pipe. Stopping a source aborts the
//! task and hands it back as [`Stopped`]; the resource is released once that
//! task has been awaited.

mod fifo;
mod udp;

pub use fifo::FifoInput;
pub use udp::UdpInput;

use crate::error::InputError;
use irclogd_proto::line::DEFAULT_MAX_LEN;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Longest line an input may relay, in bytes. Longer lines are discarded.
pub const MAX_INPUT_LINE: usize = DEFAULT_MAX_LEN;

/// A line received by an input task, addressed to the virtual user it was
/// bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// Name of the owning virtual user.
    pub user: String,
    /// Binding generation; events from a replaced or reset source no longer
    /// match the user's current generation and are dropped.
    pub generation: u64,
    /// The line, without its terminator.
    pub line: String,
}

/// Where an input task delivers its lines.
#[derive(Debug, Clone)]
pub struct LineSink {
    user: String,
    generation: u64,
    tx: mpsc::Sender<InputEvent>,
}

impl LineSink {
    pub fn new(user: impl Into<String>, generation: u64, tx: mpsc::Sender<InputEvent>) -> Self {
        Self {
            user: user.into(),
            generation,
            tx,
        }
    }

    /// Forward one line. Returns `false` once the session is gone.
    pub async fn emit(&self, line: String) -> bool {
        let event = InputEvent {
            user: self.user.clone(),
            generation: self.generation,
            line,
        };
        self.tx.send(event).await.is_ok()
    }

    /// Split a chunk of text on LF and forward every non-empty line that
    /// fits within [`MAX_INPUT_LINE`].
    pub async fn emit_lines(&self, text: &str) -> bool {
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            if line.len() > MAX_INPUT_LINE {
                warn!(user = %self.user, actual = line.len(), limit = MAX_INPUT_LINE, "Discarding overlong input line");
                continue;
            }
            if !self.emit(line.to_string()).await {
                return false;
            }
        }
        true
    }
}

pub type Constructor = fn(&[&str]) -> Result<InputSource, InputError>;

/// Construction table: kind name to constructor.
pub const INPUT_KINDS: &[(&str, Constructor)] = &[("udp", new_udp), ("fifo", new_fifo)];

fn new_udp(args: &[&str]) -> Result<InputSource, InputError> {
    UdpInput::bind(args).map(InputSource::Udp)
}

fn new_fifo(args: &[&str]) -> Result<InputSource, InputError> {
    FifoInput::open(args).map(InputSource::Fifo)
}

/// A bound input source.
#[derive(Debug)]
pub enum InputSource {
    Udp(UdpInput),
    Fifo(FifoInput),
}

impl InputSource {
    /// Look up the constructor for `kind`.
    pub fn constructor(kind: &str) -> Option<Constructor> {
        INPUT_KINDS
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|(_, ctor)| *ctor)
    }

    /// Kind name as used in the construction table and identities.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Udp(_) => "udp",
            Self::Fifo(_) => "fifo",
        }
    }

    /// Spawn the reader task and return the notices announcing it.
    pub fn start(&mut self, sink: LineSink) -> Vec<String> {
        match self {
            Self::Udp(udp) => udp.start(sink),
            Self::Fifo(fifo) => fifo.start(sink),
        }
    }

    /// Abort the reader task. A source that was never started releases its
    /// resource here; otherwise it goes with the returned task.
    pub fn stop(&mut self) -> Stopped {
        match self {
            Self::Udp(udp) => udp.stop(),
            Self::Fifo(fifo) => fifo.stop(),
        }
    }

    /// One-line description for the `status` directive.
    pub fn describe(&self) -> String {
        match self {
            Self::Udp(udp) => udp.describe(),
            Self::Fifo(fifo) => fifo.describe(),
        }
    }
}

/// A stopped source.
#[derive(Debug)]
pub struct Stopped {
    /// Notice announcing the stop.
    pub notice: String,
    /// The aborted reader task, still holding its socket or pipe until it
    /// has been awaited.
    pub task: Option<JoinHandle<()>>,
}

/// Abort a reader task if it is still running, handing back its handle.
fn abort_task(task: &mut Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
    let handle = task.take()?;
    handle.abort();
    Some(handle)
}
