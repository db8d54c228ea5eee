//! Channel name utilities.
//!
//! Only the two classic prefixes are recognised: `#` (network-wide) and `&`
//! (server-local). The gateway is its own network, so the distinction is
//! cosmetic.

/// Extension trait for checking if a string is a valid channel name.
pub trait ChannelExt {
    /// Check if this string is a valid channel name.
    ///
    /// Valid channel names start with `#` or `&` and contain no space,
    /// comma, BEL, NUL or other control characters.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let mut chars = self.chars();

        match chars.next() {
            Some('#') | Some('&') => {}
            _ => return false,
        }

        chars.all(|c| c != ' ' && c != ',' && !c.is_control())
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}
