//! Channel handlers: JOIN, PART, MODE, TOPIC, NAMES, INVITE, KICK.

use super::Handler;
use super::helpers::{report, require_arg, targets};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Session, unknown_mode_replies, user_name};
use irclogd_proto::{ChannelExt, Message, Response};

/// Handler for JOIN command.
///
/// `JOIN <chan>[,<chan>...]`; each new name creates a channel.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let list = require_arg(msg, 0)?;
        for name in targets(list) {
            if let Err(err) = session.join_channel(name) {
                report(session, err);
            }
        }
        Ok(())
    }
}

/// Handler for PART command.
///
/// Parting tears the channel down: every virtual user in it leaves first.
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let list = require_arg(msg, 0)?;
        for name in targets(list) {
            if let Err(err) = session.part_channel(name) {
                report(session, err);
            }
        }
        Ok(())
    }
}

/// Handler for MODE command.
///
/// Channels support no modes at all; the client's own nick reports a fixed
/// `+i`.
pub struct ModeHandler;

impl Handler for ModeHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let target = require_arg(msg, 0)?;
        let modes = msg.arg(1).filter(|m| !m.is_empty());

        if target.is_channel_name() {
            let channel = session
                .channels
                .get(target)
                .ok_or_else(|| HandlerError::NotOnChannel(target.to_string()))?;
            let replies = channel.mode_replies(session.host(), session.nick(), modes);
            session.extend(replies);
            return Ok(());
        }

        if !target.eq_ignore_ascii_case(session.nick()) {
            return Err(HandlerError::UsersDontMatch);
        }
        match modes {
            Some(modes) => {
                let replies = unknown_mode_replies(session.host(), session.nick(), modes);
                session.extend(replies);
            }
            None => session.reply(Response::RPL_UMODEIS, ["+i"]),
        }
        Ok(())
    }
}

/// Handler for TOPIC command.
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let name = require_arg(msg, 0)?;
        let host = session.host().to_string();
        let nick = session.nick().to_string();
        let channel = session
            .channels
            .get_mut(name)
            .ok_or_else(|| HandlerError::NotOnChannel(name.to_string()))?;

        if let Some(topic) = msg.arg(1) {
            channel.set_topic(topic);
        }
        let reply = channel.topic_reply(&host, &nick);
        session.push(reply);
        Ok(())
    }
}

/// Handler for NAMES command.
pub struct NamesHandler;

impl Handler for NamesHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let Some(list) = msg.arg(0).filter(|l| !l.is_empty()) else {
            session.reply(Response::RPL_ENDOFNAMES, ["*", "End of /NAMES list"]);
            return Ok(());
        };

        for name in targets(list) {
            let replies = session
                .channels
                .get(name)
                .map(|channel| channel.names_replies(session.host(), session.nick()));
            match replies {
                Some(replies) => session.extend(replies),
                None => report(session, HandlerError::NotOnChannel(name.to_string())),
            }
        }
        Ok(())
    }
}

/// Handler for INVITE command.
///
/// `INVITE <user> <chan>` creates the virtual user on first use.
pub struct InviteHandler;

impl Handler for InviteHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let ident = require_arg(msg, 0)?;
        let channel = require_arg(msg, 1)?;
        session.invite_user(ident, channel)
    }
}

/// Handler for KICK command.
///
/// `KICK <chan> <user> [:reason]` removes the user from that channel only.
pub struct KickHandler;

impl Handler for KickHandler {
    fn handle(&self, session: &mut Session, msg: &Message) -> HandlerResult {
        let channel = require_arg(msg, 0)?;
        let user = user_name(require_arg(msg, 1)?);
        let reason = msg
            .arg(2)
            .filter(|r| !r.is_empty())
            .unwrap_or(session.nick())
            .to_string();
        session.kick_user(channel, user, &reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{lines, registered};

    fn run(handler: &dyn Handler, session: &mut Session, params: &[&str]) -> HandlerResult {
        handler.handle(session, &Message::new("TEST", params.iter().copied()))
    }

    #[test]
    fn test_join_comma_list_reports_bad_names() {
        let (mut s, _rx) = registered();
        run(&JoinHandler, &mut s, &["&a,bogus,#b"]).unwrap();
        let out = lines(&mut s);
        assert!(out.contains(&":irclogd 403 alice bogus :No such channel".to_string()));
        assert_eq!(s.channels.len(), 2);
    }

    #[test]
    fn test_part_unknown() {
        let (mut s, _rx) = registered();
        run(&PartHandler, &mut s, &["&nope"]).unwrap();
        assert_eq!(lines(&mut s), vec![":irclogd 403 alice &nope :No such channel"]);
    }

    #[test]
    fn test_mode_targets() {
        let (mut s, _rx) = registered();
        s.join_channel("&log").unwrap();
        s.take_pending();

        run(&ModeHandler, &mut s, &["&log"]).unwrap();
        let out = lines(&mut s);
        assert_eq!(out.len(), 2);
        assert!(out[1].starts_with(":irclogd 329 alice &log :"));

        run(&ModeHandler, &mut s, &["alice"]).unwrap();
        assert_eq!(lines(&mut s), vec![":irclogd 221 alice :+i"]);

        run(&ModeHandler, &mut s, &["alice", "+w"]).unwrap();
        assert_eq!(
            lines(&mut s),
            vec![":irclogd 472 alice w :is unknown mode char to me"]
        );

        assert!(matches!(
            run(&ModeHandler, &mut s, &["&nope"]),
            Err(HandlerError::NotOnChannel(_))
        ));
        assert!(matches!(
            run(&ModeHandler, &mut s, &["bob"]),
            Err(HandlerError::UsersDontMatch)
        ));
    }

    #[test]
    fn test_topic() {
        let (mut s, _rx) = registered();
        s.join_channel("&log").unwrap();
        s.take_pending();

        run(&TopicHandler, &mut s, &["&log", "nightly builds"]).unwrap();
        assert_eq!(
            lines(&mut s),
            vec![":irclogd 332 alice &log :nightly builds"]
        );
        run(&TopicHandler, &mut s, &["&log"]).unwrap();
        assert_eq!(
            lines(&mut s),
            vec![":irclogd 332 alice &log :nightly builds"]
        );

        run(&TopicHandler, &mut s, &["&log", ""]).unwrap();
        assert_eq!(lines(&mut s), vec![":irclogd 331 alice &log :No topic is set"]);

        assert!(matches!(
            run(&TopicHandler, &mut s, &[]),
            Err(HandlerError::NeedMoreParams(_))
        ));
        assert!(matches!(
            run(&TopicHandler, &mut s, &["&nope"]),
            Err(HandlerError::NotOnChannel(_))
        ));
    }

    #[test]
    fn test_names() {
        let (mut s, _rx) = registered();
        run(&NamesHandler, &mut s, &[]).unwrap();
        assert_eq!(lines(&mut s), vec![":irclogd 366 alice * :End of /NAMES list"]);

        run(&NamesHandler, &mut s, &["&nope"]).unwrap();
        assert_eq!(
            lines(&mut s),
            vec![":irclogd 442 alice &nope :You're not on that channel"]
        );
    }

    #[test]
    fn test_invite_and_kick_params() {
        let (mut s, _rx) = registered();
        s.join_channel("&log").unwrap();
        s.take_pending();

        assert!(matches!(
            run(&InviteHandler, &mut s, &["feed1"]),
            Err(HandlerError::NeedMoreParams(_))
        ));
        assert!(matches!(
            run(&InviteHandler, &mut s, &["  ", "&log"]),
            Err(HandlerError::NeedMoreParams(_))
        ));
        assert!(s.users.is_empty());
        assert!(matches!(
            run(&InviteHandler, &mut s, &["feed1", "&nope"]),
            Err(HandlerError::NoSuchChannel(_))
        ));
        run(&InviteHandler, &mut s, &["feed1", "&log"]).unwrap();
        assert!(matches!(
            run(&InviteHandler, &mut s, &["feed1", "&log"]),
            Err(HandlerError::UserOnChannel { .. })
        ));
        s.take_pending();

        assert!(matches!(
            run(&KickHandler, &mut s, &["&log"]),
            Err(HandlerError::NeedMoreParams(_))
        ));
        assert!(matches!(
            run(&KickHandler, &mut s, &["&log", "ghost"]),
            Err(HandlerError::NotOnChannel(_))
        ));
        run(&KickHandler, &mut s, &["&log", "feed1"]).unwrap();
        assert_eq!(lines(&mut s), vec![":alice!al@irclogd KICK &log feed1 :alice"]);
        assert!(s.users.is_empty());
    }
}
