//! Per-connection state.
//!
//! A [`Session`] owns the [`Channel`]s and [`VirtualUser`]s its client
//! creates; nothing is shared between connections except [`ServerInfo`].

mod channel;
mod session;
mod user;

pub use channel::{Channel, unknown_mode_replies};
pub use session::{ServerInfo, Session, SessionState};
pub use user::{VirtualUser, user_name};
