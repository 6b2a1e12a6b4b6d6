//! The commands a read-only session sends, and their wire form.

mod tag;

use crate::types::{Mailbox, SequenceSet};

pub use tag::TagGenerator;

/// Message data a FETCH may ask for.
///
/// Neither attribute reads the body, so fetching never sets `\Seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAttribute {
    /// `ENVELOPE`
    Envelope,
    /// `INTERNALDATE`
    InternalDate,
}

impl FetchAttribute {
    /// Wire keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Envelope => "ENVELOPE",
            Self::InternalDate => "INTERNALDATE",
        }
    }
}

/// A client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `CAPABILITY`
    Capability,
    /// `LOGIN user password`
    Login {
        /// Account name.
        username: String,
        /// Plaintext password.
        password: String,
    },
    /// `EXAMINE mailbox`, the read-only form of `SELECT`.
    Examine {
        /// Mailbox to open.
        mailbox: Mailbox,
    },
    /// `FETCH sequence attributes`
    Fetch {
        /// Messages to fetch.
        sequence: SequenceSet,
        /// What to fetch for each.
        attributes: Vec<FetchAttribute>,
    },
    /// `LOGOUT`
    Logout,
}

impl Command {
    /// The full command line for `tag`, CRLF included.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut line = format!("{tag} ");
        self.render(&mut line, false);
        line.push_str("\r\n");
        line.into_bytes()
    }

    /// The command without tag or CRLF, with the password masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut text = String::new();
        self.render(&mut text, true);
        text
    }

    fn render(&self, out: &mut String, mask_password: bool) {
        match self {
            Self::Capability => out.push_str("CAPABILITY"),
            Self::Logout => out.push_str("LOGOUT"),
            Self::Login { username, password } => {
                out.push_str("LOGIN ");
                push_astring(out, username);
                out.push(' ');
                if mask_password {
                    out.push_str("****");
                } else {
                    push_astring(out, password);
                }
            }
            Self::Examine { mailbox } => {
                out.push_str("EXAMINE ");
                push_astring(out, mailbox.as_str());
            }
            Self::Fetch {
                sequence,
                attributes,
            } => {
                out.push_str("FETCH ");
                out.push_str(&sequence.to_string());
                out.push(' ');
                push_attributes(out, attributes);
            }
        }
    }
}

/// Writes `value` as an atom when it can be one, else as a quoted string.
fn push_astring(out: &mut String, value: &str) {
    let is_atom = !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_graphic() && !matches!(b, b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*' | b']')
        });
    if is_atom {
        out.push_str(value);
        return;
    }

    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// A lone attribute goes bare; several go in parentheses.
fn push_attributes(out: &mut String, attributes: &[FetchAttribute]) {
    if let [only] = attributes {
        out.push_str(only.as_str());
        return;
    }
    let names: Vec<&str> = attributes.iter().map(|a| a.as_str()).collect();
    out.push('(');
    out.push_str(&names.join(" "));
    out.push(')');
}
