//! Low-level quoting.
//!
//! IRC is line oriented, so a payload may not carry NUL, CR or LF. Low-level
//! quoting maps those characters (and the quote character itself) onto
//! two-character sequences introduced by [`M_QUOTE`] (`\x10`, DLE):
//!
//! | raw      | quoted        |
//! |----------|---------------|
//! | `\0`     | `\x10` `0`    |
//! | `\n`     | `\x10` `n`    |
//! | `\r`     | `\x10` `r`    |
//! | `\x10`   | `\x10` `\x10` |
//!
//! Every other character passes through unchanged, so [`unquote`] is the exact
//! inverse of [`quote`].

/// The low-level quote character (DLE).
pub const M_QUOTE: char = '\x10';

/// Escape NUL, LF, CR and [`M_QUOTE`] for the wire.
///
/// ```
/// use irclogd_proto::quote;
///
/// assert_eq!(quote("a\nb"), "a\x10nb");
/// assert_eq!(quote("plain"), "plain");
/// ```
pub fn quote(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\0' => {
                quoted.push(M_QUOTE);
                quoted.push('0');
            }
            '\n' => {
                quoted.push(M_QUOTE);
                quoted.push('n');
            }
            '\r' => {
                quoted.push(M_QUOTE);
                quoted.push('r');
            }
            M_QUOTE => {
                quoted.push(M_QUOTE);
                quoted.push(M_QUOTE);
            }
            other => quoted.push(other),
        }
    }
    quoted
}

/// Reverse [`quote`].
///
/// An escape followed by an unknown character yields that character; a
/// trailing lone escape is dropped.
pub fn unquote(wire: &str) -> String {
    let mut raw = String::with_capacity(wire.len());
    let mut chars = wire.chars();
    while let Some(c) = chars.next() {
        if c != M_QUOTE {
            raw.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => raw.push('\0'),
            Some('n') => raw.push('\n'),
            Some('r') => raw.push('\r'),
            Some(other) => raw.push(other),
            None => {}
        }
    }
    raw
}
