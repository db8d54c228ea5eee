//! Virtual users and the directives they understand.
//!
//! A virtual user is addressed either by a private message or by
//! `name: <directive>` typed into a channel. Directives are looked up in a
//! fixed table; anything else gets an `Unknown command` notice.

use super::Session;
use crate::error::UserError;
use crate::input::InputSource;
use irclogd_proto::{format_reply, Message, Response};
use std::collections::BTreeSet;

/// A channel participant that relays an external feed.
#[derive(Debug)]
pub struct VirtualUser {
    pub name: String,
    /// Names of the channels this user is in.
    pub channels: BTreeSet<String>,
    pub input: Option<InputSource>,
    /// Generation of the bound input; see [`crate::input::InputEvent`].
    pub generation: u64,
}

impl VirtualUser {
    /// Create a user from an identifier; only its first word is kept.
    pub fn new(ident: &str) -> Self {
        Self {
            name: user_name(ident).to_string(),
            channels: BTreeSet::new(),
            input: None,
            generation: 0,
        }
    }

    /// `input/none`, `input/udp` or `input/fifo`.
    pub fn role(&self) -> String {
        match &self.input {
            Some(input) => format!("input/{}", input.kind()),
            None => "input/none".to_string(),
        }
    }

    /// Fully qualified identity used as message prefix.
    pub fn identity(&self, host: &str) -> String {
        format!("{}!{}@{}", self.name, self.role(), host)
    }

    /// RPL_WHOREPLY for this user, listed under `channel` or its first channel.
    pub fn who_reply(&self, host: &str, nick: &str, channel: Option<&str>) -> Message {
        let channel = channel
            .or_else(|| self.channels.first().map(String::as_str))
            .unwrap_or("*");
        let role = self.role();
        format_reply(
            Response::RPL_WHOREPLY,
            host,
            nick,
            None,
            [
                channel,
                role.as_str(),
                host,
                host,
                self.name.as_str(),
                "H",
                "0 VirtualUser",
            ],
        )
    }

    /// Whether `generation` belongs to the currently bound input.
    pub fn owns_generation(&self, generation: u64) -> bool {
        self.input.is_some() && self.generation == generation
    }
}

/// First whitespace-delimited token of a user identifier.
pub fn user_name(ident: &str) -> &str {
    ident.split_whitespace().next().unwrap_or("")
}

/// A directive handler: `(session, user, args, origin channel)`.
type Directive = fn(&mut Session, &str, &str, Option<&str>);

const DIRECTIVES: &[(&str, Directive)] = &[
    ("input", directive_input),
    ("reset", directive_reset),
    ("die", directive_die),
    ("help", directive_help),
    ("status", directive_status),
];

impl Session {
    /// Run a directive line for `user`. Replies go to `origin` when given,
    /// otherwise to every channel the user is in.
    pub fn user_command(&mut self, user: &str, line: &str, origin: Option<&str>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let (command, args) = line
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim_start()))
            .unwrap_or((line, ""));

        match DIRECTIVES.iter().find(|(name, _)| *name == command) {
            Some((_, run)) => run(self, user, args, origin),
            None => self.user_reply(user, &format!("Unknown command: {command}"), origin),
        }
    }
}

fn directive_input(session: &mut Session, user: &str, args: &str, origin: Option<&str>) {
    let mut words = args.split_whitespace();
    let Some(kind) = words.next() else {
        session.user_reply(user, "Usage: input <udp|fifo> [args...]", origin);
        return;
    };
    let rest: Vec<&str> = words.collect();

    if session.has_input(user) {
        session.user_reply(user, &UserError::AlreadyBound.to_string(), origin);
        return;
    }
    if InputSource::constructor(kind).is_none() {
        let err = UserError::UnknownKind(kind.to_string());
        session.user_reply(user, &err.to_string(), origin);
        return;
    }

    session.user_reply(user, &format!("Switching user input to {kind}"), origin);
    if let Err(err) = session.bind_input(user, kind, &rest) {
        session.user_reply(user, "Failed switching input!", origin);
        session.user_reply(user, &format!("Error: {err}"), origin);
    }
}

fn directive_reset(session: &mut Session, user: &str, _args: &str, origin: Option<&str>) {
    if let Err(err) = session.reset_input(user) {
        session.user_reply(user, &err.to_string(), origin);
    }
}

fn directive_die(session: &mut Session, user: &str, _args: &str, _origin: Option<&str>) {
    session.user_die(user);
}

fn directive_help(session: &mut Session, user: &str, _args: &str, origin: Option<&str>) {
    const HELP: &[&str] = &[
        "Available commands:",
        "  input udp <port> [host...]   relay datagrams sent to <port>",
        "  input fifo <path>            relay lines written to a named pipe",
        "  reset                        stop and release the current input",
        "  status                       show the current input",
        "  die                          leave every channel",
        "  help                         show this text",
    ];
    for line in HELP {
        session.user_reply(user, line, origin);
    }
}

fn directive_status(session: &mut Session, user: &str, _args: &str, origin: Option<&str>) {
    let Some(vuser) = session.users.get(user) else {
        return;
    };
    let mut lines = vec![format!("Input: {}", vuser.role())];
    if let Some(input) = &vuser.input {
        lines.push(input.describe());
    }
    lines.push(format!(
        "Channels: {}",
        vuser.channels.iter().cloned().collect::<Vec<_>>().join(", ")
    ));
    for line in lines {
        session.user_reply(user, &line, origin);
    }
}
