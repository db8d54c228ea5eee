//! Channel state and the replies a channel formats about itself.

use irclogd_proto::{format_reply, Message, Response};
use std::collections::BTreeSet;

/// A channel owned by one session.
///
/// `members` holds virtual user names; the session keeps it in step with
/// each user's own channel set.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    /// Unix timestamp of creation, reported by RPL_CREATIONTIME.
    pub created: i64,
    pub topic: Option<String>,
    pub members: BTreeSet<String>,
}

/// A channel-local command: returns the lines to post as server notices.
type LocalCommand = fn(&Channel) -> Vec<String>;

const LOCAL_COMMANDS: &[(&str, LocalCommand)] = &[("!help", help)];

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created: chrono::Utc::now().timestamp(),
            topic: None,
            members: BTreeSet::new(),
        }
    }

    pub fn is_member(&self, user: &str) -> bool {
        self.members.contains(user)
    }

    /// Store a new topic; an empty string clears it.
    pub fn set_topic(&mut self, topic: &str) {
        self.topic = (!topic.is_empty()).then(|| topic.to_string());
    }

    /// RPL_TOPIC or RPL_NOTOPIC.
    pub fn topic_reply(&self, host: &str, nick: &str) -> Message {
        match &self.topic {
            Some(topic) => format_reply(
                Response::RPL_TOPIC,
                host,
                nick,
                None,
                [self.name.as_str(), topic.as_str()],
            ),
            None => format_reply(
                Response::RPL_NOTOPIC,
                host,
                nick,
                None,
                [self.name.as_str(), "No topic is set"],
            ),
        }
    }

    /// RPL_NAMREPLY listing the client and every member, then RPL_ENDOFNAMES.
    pub fn names_replies(&self, host: &str, nick: &str) -> Vec<Message> {
        let names = std::iter::once(nick)
            .chain(self.members.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        vec![
            format_reply(
                Response::RPL_NAMREPLY,
                host,
                nick,
                None,
                ["=", self.name.as_str(), names.as_str()],
            ),
            format_reply(
                Response::RPL_ENDOFNAMES,
                host,
                nick,
                None,
                [self.name.as_str(), "End of /NAMES list"],
            ),
        ]
    }

    /// Channel modes are not supported. Every query gets ERR_NOCHANMODES and
    /// the creation time; each requested mode letter gets ERR_UNKNOWNMODE.
    pub fn mode_replies(&self, host: &str, nick: &str, modes: Option<&str>) -> Vec<Message> {
        let created = self.created.to_string();
        let mut replies = vec![
            format_reply(
                Response::ERR_NOCHANMODES,
                host,
                nick,
                None,
                [self.name.as_str(), "Channel doesn't support modes"],
            ),
            format_reply(
                Response::RPL_CREATIONTIME,
                host,
                nick,
                None,
                [self.name.as_str(), created.as_str()],
            ),
        ];
        replies.extend(unknown_mode_replies(host, nick, modes.unwrap_or("")));
        replies
    }

    /// Run a `!command` typed into the channel.
    pub fn local_command(&self, command: &str) -> Option<Vec<String>> {
        LOCAL_COMMANDS
            .iter()
            .find(|(name, _)| *name == command)
            .map(|(_, run)| run(self))
    }
}

/// ERR_UNKNOWNMODE for each letter of a mode string, skipping `+`/`-`.
pub fn unknown_mode_replies(host: &str, nick: &str, modes: &str) -> Vec<Message> {
    modes
        .chars()
        .filter(|c| *c != '+' && *c != '-')
        .map(|c| {
            format_reply(
                Response::ERR_UNKNOWNMODE,
                host,
                nick,
                None,
                [c.to_string().as_str(), "is unknown mode char to me"],
            )
        })
        .collect()
}

/// Split `name: rest` into the addressed user and the remainder.
///
/// Returns `None` unless the first token ends with `:` and names someone.
pub fn addressed(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    let (first, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let name = first.strip_suffix(':')?;
    if name.is_empty() {
        return None;
    }
    Some((name, rest.trim_start()))
}

fn help(channel: &Channel) -> Vec<String> {
    let mut lines = vec![
        format!("{} help:", channel.name),
        "  /invite <user> <channel>   create a virtual user here".to_string(),
        "  <user>: help               list the directives a user understands".to_string(),
        "  <user>: input udp <port> [host...]".to_string(),
        "  <user>: input fifo <path>".to_string(),
    ];
    if !channel.members.is_empty() {
        let members: Vec<&str> = channel.members.iter().map(String::as_str).collect();
        lines.push(format!("Virtual users here: {}", members.join(", ")));
    }
    lines
}
