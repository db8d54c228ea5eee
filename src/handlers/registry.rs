//! Command handler registry and dispatch.

use super::Handler;
use super::channel::{
    InviteHandler, JoinHandler, KickHandler, ModeHandler, NamesHandler, PartHandler, TopicHandler,
};
use super::connection::{NickHandler, PingHandler, PongHandler, QuitHandler, UserHandler};
use super::messaging::{NoticeHandler, PrivmsgHandler};
use super::user_query::WhoHandler;
use crate::error::HandlerResult;
use crate::state::Session;
use irclogd_proto::Message;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection/registration handlers
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("USER", Box::new(UserHandler));
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("PONG", Box::new(PongHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));

        // Channel handlers
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));
        handlers.insert("MODE", Box::new(ModeHandler));
        handlers.insert("TOPIC", Box::new(TopicHandler));
        handlers.insert("NAMES", Box::new(NamesHandler));
        handlers.insert("INVITE", Box::new(InviteHandler));
        handlers.insert("KICK", Box::new(KickHandler));

        // Messaging handlers
        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));
        handlers.insert("NOTICE", Box::new(NoticeHandler));

        // User query handlers
        handlers.insert("WHO", Box::new(WhoHandler));

        Self { handlers }
    }

    /// Dispatch a message to the appropriate handler.
    ///
    /// Unknown commands are logged and otherwise ignored.
    pub fn dispatch(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let cmd_name = msg.command_name();
        match self.handlers.get(cmd_name.as_str()) {
            Some(handler) => {
                trace!(command = %cmd_name, nick = %session.nick(), "Dispatching");
                handler.handle(session, msg)
            }
            None => {
                debug!(command = %cmd_name, params = ?msg.params, "Unknown command");
                Ok(())
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::test_support::{lines, registered};

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let registry = Registry::new();
        let (mut s, _rx) = registered();

        registry
            .dispatch(&mut s, &Message::new("ping", ["abc"]))
            .unwrap();
        assert_eq!(lines(&mut s), vec![":irclogd PONG irclogd :abc"]);

        registry
            .dispatch(&mut s, &Message::new("Join", ["&log"]))
            .unwrap();
        assert!(s.channels.contains_key("&log"));
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let registry = Registry::new();
        let (mut s, _rx) = registered();

        registry
            .dispatch(&mut s, &Message::new("OPER", ["root", "hunter2"]))
            .unwrap();
        assert!(lines(&mut s).is_empty());
    }

    #[test]
    fn test_handler_errors_propagate() {
        let registry = Registry::new();
        let (mut s, _rx) = registered();

        let err = registry
            .dispatch(&mut s, &Message::new("KICK", ["&log"]))
            .unwrap_err();
        assert!(matches!(err, HandlerError::NeedMoreParams(cmd) if cmd == "KICK"));
    }
}
