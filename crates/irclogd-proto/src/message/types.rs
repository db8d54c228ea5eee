/// An owned IRC message.
///
/// ```
/// use irclogd_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.prefix.as_deref(), Some("nick!user@host"));
/// assert_eq!(msg.arg(1), Some("Hello!"));
///
/// let msg = Message::new("JOIN", ["&log"]);
/// assert_eq!(msg.to_string(), "JOIN :&log");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Optional prefix (server name or `nick!user@host`).
    pub prefix: Option<String>,
    /// The command (e.g. `PRIVMSG`, `001`, `NICK`).
    pub command: String,
    /// Parameters; the last may have been a trailing parameter with spaces.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message without a prefix.
    pub fn new<C, I, S>(command: C, params: I) -> Self
    where
        C: ToString,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: None,
            command: command.to_string(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Set the prefix, consuming and returning the message.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Get the `n`th parameter.
    #[inline]
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.params.get(n).map(String::as_str)
    }

    /// The command name, upper-cased for table lookups.
    pub fn command_name(&self) -> String {
        self.command.to_ascii_uppercase()
    }
}

/// Assemble an outbound reply line.
///
/// `command` is followed by the recipient nick unless a `from` identity is
/// supplied, then by `params`. The prefix is `from` when given and `host`
/// otherwise. The final parameter is `:`-prefixed on the wire.
///
/// ```
/// use irclogd_proto::{format_reply, Response};
///
/// let reply = format_reply(Response::RPL_NOTOPIC, "irclogd", "alice", None, ["&log", "No topic is set"]);
/// assert_eq!(reply.to_string(), ":irclogd 331 alice &log :No topic is set");
///
/// let msg = format_reply("PRIVMSG", "irclogd", "alice", Some("feed1!input/udp@irclogd"), ["&log", "hello"]);
/// assert_eq!(msg.to_string(), ":feed1!input/udp@irclogd PRIVMSG &log :hello");
/// ```
pub fn format_reply<C, I, S>(
    command: C,
    host: &str,
    nick: &str,
    from: Option<&str>,
    params: I,
) -> Message
where
    C: ToString,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut all = Vec::new();
    if from.is_none() {
        all.push(nick.to_string());
    }
    all.extend(params.into_iter().map(Into::into));

    Message {
        prefix: Some(from.unwrap_or(host).to_string()),
        command: command.to_string(),
        params: all,
    }
}
