//! IRC message types, parsing and serialization.

mod parse;
mod serialize;
mod types;

pub use self::types::{format_reply, Message};
