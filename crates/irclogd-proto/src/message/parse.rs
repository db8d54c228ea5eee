//! Message parsing implementation.

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};

use super::types::Message;

impl Message {
    /// Parse a single line (with or without its terminator).
    pub fn parse(input: &str) -> Result<Self, MessageParseError> {
        Self::parse_line(input.trim_end_matches(['\r', '\n']))
    }

    /// Parse a line that has already been stripped of its terminator.
    ///
    /// Unlike [`Message::parse`], trailing CR/LF characters are kept as part
    /// of the last parameter; they can only be there after unquoting.
    pub fn parse_line(input: &str) -> Result<Self, MessageParseError> {
        let input = input.trim_start_matches(' ');

        if input.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let (prefix, rest) = match input.strip_prefix(':') {
            Some(stripped) => match stripped.split_once(' ') {
                Some((prefix, rest)) => (Some(prefix.to_owned()), rest.trim_start_matches(' ')),
                None => return Err(MessageParseError::MissingCommand),
            },
            None => (None, input),
        };

        let (command, mut remaining) = match rest.split_once(' ') {
            Some((command, params)) => (command, params),
            None => (rest, ""),
        };

        if command.is_empty() {
            return Err(MessageParseError::MissingCommand);
        }

        let mut params = Vec::new();
        loop {
            remaining = remaining.trim_start_matches(' ');
            if remaining.is_empty() {
                break;
            }
            if let Some(trailing) = remaining.strip_prefix(':') {
                params.push(trailing.to_owned());
                break;
            }
            match remaining.split_once(' ') {
                Some((param, rest)) => {
                    params.push(param.to_owned());
                    remaining = rest;
                }
                None => {
                    params.push(remaining.to_owned());
                    break;
                }
            }
        }

        Ok(Message {
            prefix,
            command: command.to_owned(),
            params,
        })
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        Message::parse(s).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })
    }
}
