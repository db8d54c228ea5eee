use std::fmt::{self, Display, Formatter};

use super::types::Message;

impl Message {
    /// Serialize to the IRC wire format, without the line terminator.
    pub fn to_wire(&self) -> String {
        let mut out = String::new();

        if let Some(ref prefix) = self.prefix {
            out.push(':');
            out.push_str(prefix);
            out.push(' ');
        }

        out.push_str(&self.command);

        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                out.push(' ');
                out.push_str(param);
            }
            // The final parameter always goes out as a trailing parameter.
            out.push_str(" :");
            out.push_str(last);
        }

        out
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}
