//! What the server says it can do.

/// One entry of a `CAPABILITY` list. Names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1`
    Imap4Rev1,
    /// `LOGINDISABLED`: plaintext `LOGIN` is refused.
    LoginDisabled,
    /// `AUTH=<mechanism>`, mechanism upper-cased.
    Auth(String),
    /// Anything else, as sent.
    Unknown(String),
}

impl Capability {
    /// Classifies a capability name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("IMAP4rev1") {
            Self::Imap4Rev1
        } else if name.eq_ignore_ascii_case("LOGINDISABLED") {
            Self::LoginDisabled
        } else if name.len() > 5 && name[..5].eq_ignore_ascii_case("AUTH=") {
            Self::Auth(name[5..].to_ascii_uppercase())
        } else {
            Self::Unknown(name.to_string())
        }
    }
}
