//! Code conversion, classification and Display/FromStr for [`Response`].

use super::Response;
use std::fmt;
use std::str::FromStr;

const ALL: &[Response] = &[
    Response::RPL_WELCOME,
    Response::RPL_YOURHOST,
    Response::RPL_CREATED,
    Response::RPL_MYINFO,
    Response::RPL_UMODEIS,
    Response::RPL_ENDOFWHO,
    Response::RPL_CREATIONTIME,
    Response::RPL_NOTOPIC,
    Response::RPL_TOPIC,
    Response::RPL_INVITING,
    Response::RPL_WHOREPLY,
    Response::RPL_NAMREPLY,
    Response::RPL_ENDOFNAMES,
    Response::RPL_MOTD,
    Response::RPL_MOTDSTART,
    Response::RPL_ENDOFMOTD,
    Response::ERR_NOSUCHCHANNEL,
    Response::ERR_CANNOTSENDTOCHAN,
    Response::ERR_NORECIPIENT,
    Response::ERR_NOTONCHANNEL,
    Response::ERR_USERONCHANNEL,
    Response::ERR_NEEDMOREPARAMS,
    Response::ERR_UNKNOWNMODE,
    Response::ERR_NOCHANMODES,
    Response::ERR_USERSDONTMATCH,
];

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        ALL.iter().copied().find(|r| r.code() == code)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error returned when a string is not a known numeric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response code: {0}")]
pub struct ParseResponseError(
    /// The rejected input.
    pub String,
);

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .ok_or_else(|| ParseResponseError(s.to_owned()))
    }
}
