//! User query handlers: WHO.

use super::Handler;
use crate::error::HandlerResult;
use crate::state::Session;
use irclogd_proto::Message;

/// Handler for WHO command.
///
/// `WHO <mask>` where the mask is the client's own nick, a channel, or a
/// virtual user. Anything else gets no reply at all.
pub struct WhoHandler;

impl Handler for WhoHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        if let Some(mask) = msg.arg(0).filter(|m| !m.is_empty()) {
            session.who(mask);
        }
        Ok(())
    }
}
