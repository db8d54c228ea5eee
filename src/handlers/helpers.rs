//! Helper functions for IRC command handlers.

use crate::error::HandlerError;
use crate::state::Session;
use irclogd_proto::Message;

/// Fetch parameter `n`, failing with ERR_NEEDMOREPARAMS when it is missing
/// or empty.
pub fn require_arg<'a>(msg: &'a Message, n: usize) -> Result<&'a str, HandlerError> {
    msg.arg(n)
        .filter(|arg| !arg.is_empty())
        .ok_or_else(|| HandlerError::NeedMoreParams(msg.command_name()))
}

/// Split a comma-separated target list, skipping empty entries.
pub fn targets(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|t| !t.is_empty())
}

/// Queue the numeric reply for `err` and keep going. Used where one
/// command covers several targets.
pub fn report(session: &mut Session, err: HandlerError) {
    if let Some(reply) = err.to_irc_reply(session.host(), session.nick()) {
        session.push(reply);
    }
}
