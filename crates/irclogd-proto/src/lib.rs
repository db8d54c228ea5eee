//! # irclogd-proto
//!
//! The IRC wire format as spoken by the irclogd gateway.
//!
//! ## Features
//!
//! - Line parsing and serialization (`[:prefix] COMMAND param* [:trailing]`)
//! - Low-level quoting so arbitrary text survives a single-line protocol
//! - The numeric replies the gateway emits
//! - Optional Tokio codecs for framed TCP streams
//!
//! ## Quick Start
//!
//! ```rust
//! use irclogd_proto::{format_reply, Message, Response};
//!
//! let welcome = format_reply(Response::RPL_WELCOME, "irclogd", "alice", None, ["Welcome"]);
//! assert_eq!(welcome.to_string(), ":irclogd 001 alice :Welcome");
//!
//! let msg: Message = "PRIVMSG &log :feed1: input udp 9999".parse().unwrap();
//! assert_eq!(msg.params, vec!["&log", "feed1: input udp 9999"]);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod error;
#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod quote;
pub mod response;

pub use self::chan::ChannelExt;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::{format_reply, Message};
pub use self::quote::{quote, unquote, M_QUOTE};
pub use self::response::Response;
