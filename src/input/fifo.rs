//! Named pipe input.
//!
//! `input fifo <path>` requires the path to exist already and be a FIFO. The
//! pipe is opened non-blocking so a missing writer never stalls the session;
//! when every writer has gone away the pipe is reopened, so a later writer
//! keeps feeding the same user. Lines are framed with the same bounded
//! [`LineCodec`] as client input, minus the quoting.

use super::{LineSink, MAX_INPUT_LINE, Stopped, abort_task};
use crate::error::InputError;
use futures_util::StreamExt;
use irclogd_proto::LineCodec;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::unix::pipe;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tracing::{debug, info, warn};

const USAGE: &str = "Fifo input requires exactly one path argument, which must be a valid fifo!";
const MISSING: &str = "Path argument does not exist!";
const NOT_A_FIFO: &str = "Path argument is not a valid fifo!";

/// Pause before reopening a pipe whose writers all closed.
const REOPEN_DELAY: Duration = Duration::from_millis(100);

/// A FIFO reader bound for one virtual user.
#[derive(Debug)]
pub struct FifoInput {
    path: PathBuf,
    receiver: Option<pipe::Receiver>,
    task: Option<JoinHandle<()>>,
}

impl FifoInput {
    /// Validate `<path>` and open the pipe for reading.
    pub fn open(args: &[&str]) -> Result<Self, InputError> {
        let [path] = args else {
            return Err(InputError::InvalidArgument(USAGE.to_string()));
        };
        let path = PathBuf::from(*path);

        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(InputError::InvalidArgument(MISSING.to_string()));
            }
            Err(source) => return Err(InputError::Open { path, source }),
        };
        if !metadata.file_type().is_fifo() {
            return Err(InputError::InvalidArgument(NOT_A_FIFO.to_string()));
        }

        let receiver = open_receiver(&path).map_err(|source| InputError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            receiver: Some(receiver),
            task: None,
        })
    }

    pub(super) fn start(&mut self, sink: LineSink) -> Vec<String> {
        if let Some(receiver) = self.receiver.take() {
            info!(path = %self.path.display(), "FIFO input started");
            self.task = Some(tokio::spawn(read_loop(self.path.clone(), receiver, sink)));
        }
        vec![format!("Reading from fifo: {}", self.path.display())]
    }

    pub(super) fn stop(&mut self) -> Stopped {
        let task = abort_task(&mut self.task);
        self.receiver = None;
        info!(path = %self.path.display(), "FIFO input stopped");
        Stopped {
            notice: format!("Stopped reading from fifo: {}", self.path.display()),
            task,
        }
    }

    pub(super) fn describe(&self) -> String {
        format!("Reading from fifo: {}", self.path.display())
    }
}

impl Drop for FifoInput {
    fn drop(&mut self) {
        abort_task(&mut self.task);
    }
}

fn open_receiver(path: &Path) -> io::Result<pipe::Receiver> {
    let mut options = pipe::OpenOptions::new();
    // Holding a write end ourselves keeps the pipe from reporting EOF
    // between writers.
    #[cfg(target_os = "linux")]
    options.read_write(true);
    options.open_receiver(path)
}

/// Frame a pipe into lines; CRLF leaves room for a full-length line.
fn framed(receiver: pipe::Receiver) -> FramedRead<pipe::Receiver, LineCodec> {
    FramedRead::new(
        receiver,
        LineCodec::with_max_len(MAX_INPUT_LINE + 2).without_quoting(),
    )
}

async fn read_loop(path: PathBuf, receiver: pipe::Receiver, sink: LineSink) {
    let mut lines = framed(receiver);
    loop {
        match lines.next().await {
            Some(Ok(line)) => {
                if !sink.emit_lines(&line).await {
                    break;
                }
            }
            Some(Err(e)) => {
                warn!(path = %path.display(), error = %e, "FIFO read failed");
                break;
            }
            None => {
                debug!(path = %path.display(), "FIFO writers closed, reopening");
                tokio::time::sleep(REOPEN_DELAY).await;
                match open_receiver(&path) {
                    Ok(receiver) => lines = framed(receiver),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to reopen FIFO");
                        break;
                    }
                }
            }
        }
    }
}
