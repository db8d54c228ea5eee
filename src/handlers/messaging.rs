//! Messaging handlers: PRIVMSG and NOTICE.
//!
//! Text the client sends into a channel is read as a command for that
//! channel (`name: directive` or `!help`); text sent to a virtual user is a
//! directive for that user. Nothing is ever relayed anywhere else.

use super::Handler;
use crate::error::{HandlerError, HandlerResult};
use crate::state::Session;
use irclogd_proto::{ChannelExt, Message};

/// Handler for PRIVMSG command.
pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let target = msg
            .arg(0)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HandlerError::NoRecipient(msg.command_name()))?;
        let text = msg.arg(1).unwrap_or("");

        if target.is_channel_name() {
            if !session.channels.contains_key(target) {
                return Err(HandlerError::CannotSendToChannel(target.to_string()));
            }
            session.channel_command(target, text);
        } else if session.users.contains_key(target) {
            session.user_command(target, text, None);
        } else {
            return Err(HandlerError::NoRecipient(msg.command_name()));
        }
        Ok(())
    }
}

/// Handler for NOTICE command. Notices are never answered.
pub struct NoticeHandler;

impl Handler for NoticeHandler {
    fn handle(&self, _session: &mut Session, _msg: &Message) -> HandlerResult {
        Ok(())
    }
}
