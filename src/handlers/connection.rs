//! Connection and registration handlers: NICK, USER, PING, PONG, QUIT.

use super::Handler;
use super::helpers::require_arg;
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Session, SessionState};
use irclogd_proto::{Message, Response};
use tracing::{debug, info};

/// Handler for NICK command.
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let nick = require_arg(msg, 0)?;

        if session.is_registered() && session.nick() != nick {
            let old = session.client_identity();
            session.send_as(&old, "NICK", [nick]);
        }
        session.nick = Some(nick.to_string());
        complete_registration(session);
        Ok(())
    }
}

/// Handler for USER command.
pub struct UserHandler;

impl Handler for UserHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        // USER <user> <mode> <unused> <realname>
        if msg.params.len() < 4 {
            return Err(HandlerError::NeedMoreParams(msg.command_name()));
        }
        let user = require_arg(msg, 0)?;

        if session.user.is_some() {
            debug!(nick = %session.nick(), "Ignoring repeated USER");
            return Ok(());
        }
        session.user = Some(user.to_string());
        session.realname = msg.arg(3).map(str::to_string);
        complete_registration(session);
        Ok(())
    }
}

/// Move to `Registered` once both NICK and USER are known, sending the
/// welcome burst and the MOTD.
fn complete_registration(session: &mut Session) {
    if session.state != SessionState::Connected || session.nick.is_none() || session.user.is_none()
    {
        return;
    }
    session.state = SessionState::Registered;

    let host = session.host().to_string();
    let info = session.info().clone();
    let identity = session.client_identity();
    info!(nick = %session.nick(), "Client registered");

    session.reply(
        Response::RPL_WELCOME,
        [format!("Welcome to the irclogd IRC gateway {identity}")],
    );
    session.reply(
        Response::RPL_YOURHOST,
        [format!("Your host is {host}, running version {}", info.version)],
    );
    session.reply(
        Response::RPL_CREATED,
        [format!(
            "This server was created {}",
            info.created.format("%Y-%m-%d %H:%M:%S UTC")
        )],
    );
    session.reply(
        Response::RPL_MYINFO,
        [host.as_str(), info.version.as_str(), "i"],
    );

    session.reply(
        Response::RPL_MOTDSTART,
        [format!("- {host} Message of the day -")],
    );
    for line in &info.motd {
        session.reply(Response::RPL_MOTD, [format!("- {line}")]);
    }
    session.reply(Response::RPL_ENDOFMOTD, ["End of /MOTD command"]);
}

/// Handler for PING command.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let host = session.host().to_string();
        let token = msg.arg(0).unwrap_or(host.as_str()).to_string();
        session.send_as(&host, "PONG", [host.as_str(), token.as_str()]);
        Ok(())
    }
}

/// Handler for PONG command.
pub struct PongHandler;

impl Handler for PongHandler {
    fn handle(&self, _session: &mut Session, _msg: &Message) -> HandlerResult {
        Ok(())
    }
}

/// Handler for QUIT command.
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let reason = msg.arg(0).unwrap_or("Client Quit").to_string();

        info!(nick = %session.nick(), message = %reason, "Client quit");
        session.reply("QUIT", [reason.as_str()]);

        // Signal quit by returning Quit error that connection loop will handle
        Err(HandlerError::Quit(Some(reason)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{lines, session};

    #[test]
    fn test_registration_after_nick_and_user() {
        let (mut s, _rx) = session();
        NickHandler
            .handle(&mut s, &Message::new("NICK", ["alice"]))
            .unwrap();
        assert!(lines(&mut s).is_empty());
        assert_eq!(s.state, SessionState::Connected);

        UserHandler
            .handle(&mut s, &Message::new("USER", ["al", "0", "*", "Alice"]))
            .unwrap();
        let out = lines(&mut s);
        assert_eq!(
            out[0],
            ":irclogd 001 alice :Welcome to the irclogd IRC gateway alice!al@irclogd"
        );
        assert!(out[1].starts_with(":irclogd 002 alice :Your host is irclogd"));
        assert!(out[2].starts_with(":irclogd 003 alice :This server was created"));
        assert!(out[3].starts_with(":irclogd 004 alice irclogd irclogd-"));
        assert_eq!(out[4], ":irclogd 375 alice :- irclogd Message of the day -");
        assert_eq!(out[5], ":irclogd 372 alice :- what's up?");
        assert_eq!(out[6], ":irclogd 376 alice :End of /MOTD command");
        assert_eq!(s.state, SessionState::Registered);
    }

    #[test]
    fn test_user_before_nick() {
        let (mut s, _rx) = session();
        UserHandler
            .handle(&mut s, &Message::new("USER", ["al", "0", "*", "Alice"]))
            .unwrap();
        assert!(lines(&mut s).is_empty());
        NickHandler
            .handle(&mut s, &Message::new("NICK", ["alice"]))
            .unwrap();
        assert!(s.is_registered());
        assert_eq!(s.realname.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_nick_change_after_registration() {
        let (mut s, _rx) = session();
        NickHandler.handle(&mut s, &Message::new("NICK", ["alice"])).unwrap();
        UserHandler
            .handle(&mut s, &Message::new("USER", ["al", "0", "*", "Alice"]))
            .unwrap();
        s.take_pending();

        NickHandler.handle(&mut s, &Message::new("NICK", ["bob"])).unwrap();
        assert_eq!(lines(&mut s), vec![":alice!al@irclogd NICK :bob"]);
        assert_eq!(s.nick(), "bob");
    }

    #[test]
    fn test_missing_params() {
        let (mut s, _rx) = session();
        assert!(matches!(
            NickHandler.handle(&mut s, &Message::new("NICK", Vec::<String>::new())),
            Err(HandlerError::NeedMoreParams(_))
        ));
        assert!(matches!(
            UserHandler.handle(&mut s, &Message::new("USER", ["al"])),
            Err(HandlerError::NeedMoreParams(_))
        ));
    }

    #[test]
    fn test_ping_pong() {
        let (mut s, _rx) = session();
        PingHandler
            .handle(&mut s, &Message::new("PING", ["12345"]))
            .unwrap();
        assert_eq!(lines(&mut s), vec![":irclogd PONG irclogd :12345"]);

        PongHandler
            .handle(&mut s, &Message::new("PONG", ["irclogd"]))
            .unwrap();
        assert!(lines(&mut s).is_empty());
    }

    #[test]
    fn test_quit() {
        let (mut s, _rx) = session();
        s.nick = Some("alice".into());
        let err = QuitHandler
            .handle(&mut s, &Message::new("QUIT", ["gone"]))
            .unwrap_err();
        assert!(matches!(err, HandlerError::Quit(Some(ref r)) if r == "gone"));
        assert_eq!(lines(&mut s), vec![":irclogd QUIT alice :gone"]);
    }
}
