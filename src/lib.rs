//! irclogd - an IRC gateway for log feeds.
//!
//! A client connects as if to an ordinary IRC server, joins a channel and
//! invites *virtual users* into it. Each virtual user can be bound to an
//! input source (a UDP port or a named pipe); every line that arrives there
//! is posted into the user's channels.

pub mod config;
pub mod error;
pub mod handlers;
pub mod input;
pub mod network;
pub mod state;
