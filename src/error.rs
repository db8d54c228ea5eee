//! Unified error handling for irclogd.
//!
//! Client command failures map onto numeric replies; virtual user and input
//! failures are reported back into the channel as notices. None of them end
//! the session.

use irclogd_proto::{format_reply, Message, Response};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {0}")]
    NeedMoreParams(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("not on channel: {0}")]
    NotOnChannel(String),

    #[error("cannot send to channel: {0}")]
    CannotSendToChannel(String),

    #[error("no recipient given for {0}")]
    NoRecipient(String),

    #[error("{user} is already on {channel}")]
    UserOnChannel { user: String, channel: String },

    #[error("cannot change mode for other users")]
    UsersDontMatch,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NotOnChannel(_) => "not_on_channel",
            Self::CannotSendToChannel(_) => "cannot_send_to_channel",
            Self::NoRecipient(_) => "no_recipient",
            Self::UserOnChannel { .. } => "user_on_channel",
            Self::UsersDontMatch => "users_dont_match",
            Self::Quit(_) => "quit",
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for `Quit`, which closes the connection instead.
    pub fn to_irc_reply(&self, host: &str, nick: &str) -> Option<Message> {
        let reply = match self {
            Self::NeedMoreParams(cmd) => format_reply(
                Response::ERR_NEEDMOREPARAMS,
                host,
                nick,
                None,
                [cmd.as_str(), "Not enough parameters"],
            ),
            Self::NoSuchChannel(chan) => format_reply(
                Response::ERR_NOSUCHCHANNEL,
                host,
                nick,
                None,
                [chan.as_str(), "No such channel"],
            ),
            Self::NotOnChannel(chan) => format_reply(
                Response::ERR_NOTONCHANNEL,
                host,
                nick,
                None,
                [chan.as_str(), "You're not on that channel"],
            ),
            Self::CannotSendToChannel(chan) => format_reply(
                Response::ERR_CANNOTSENDTOCHAN,
                host,
                nick,
                None,
                [chan.as_str(), "Cannot send to channel"],
            ),
            Self::NoRecipient(cmd) => format_reply(
                Response::ERR_NORECIPIENT,
                host,
                nick,
                None,
                [format!("No recipient given ({cmd})")],
            ),
            Self::UserOnChannel { user, channel } => format_reply(
                Response::ERR_USERONCHANNEL,
                host,
                nick,
                None,
                [user.as_str(), channel.as_str(), "is already on channel"],
            ),
            Self::UsersDontMatch => format_reply(
                Response::ERR_USERSDONTMATCH,
                host,
                nick,
                None,
                ["Cant change mode for other users"],
            ),
            Self::Quit(_) => return None,
        };
        Some(reply)
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Input Errors (source construction)
// ============================================================================

/// Failures while constructing an input source.
///
/// The `Display` text is shown verbatim to the client after `Error: `.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Could not listen on UDP port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open fifo {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Virtual User Errors
// ============================================================================

/// Errors raised by virtual user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("This user already has an input! Use `reset' to reset it.")]
    AlreadyBound,

    #[error("Unknown or unsupported input: {0}")]
    UnknownKind(String),

    #[error("{0}")]
    InputConstructionFailed(String),

    #[error("This user has no input.")]
    NoInputBound,

    #[error("{user} is not on {channel}")]
    Consistency { user: String, channel: String },
}

impl From<InputError> for UserError {
    fn from(err: InputError) -> Self {
        Self::InputConstructionFailed(err.to_string())
    }
}

// ============================================================================
// Channel Errors
// ============================================================================

/// Errors raised while handling text typed into a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("No such user: {0}")]
    NoSuchUser(String),
}
