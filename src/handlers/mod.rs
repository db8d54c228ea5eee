//! IRC command handlers.
//!
//! Every client command is looked up by name in the [`Registry`] and run to
//! completion against the connection's [`Session`]. Handlers never write to
//! the transport themselves; they queue replies on the session, which the
//! connection flushes afterwards.

mod channel;
mod connection;
mod helpers;
mod messaging;
mod registry;
mod user_query;

pub use registry::Registry;

use crate::error::HandlerResult;
use crate::state::Session;
use irclogd_proto::Message;

/// Trait implemented by all command handlers.
pub trait Handler: Send + Sync {
    /// Handle an incoming message.
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult;
}
