//! Status keywords and the bracketed codes that may follow them.

use super::Capability;

/// Keyword of a status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `OK`
    Ok,
    /// `NO`: the command was understood but failed.
    No,
    /// `BAD`: the command was not understood.
    Bad,
    /// `PREAUTH`: greeting for an already authenticated session.
    PreAuth,
    /// `BYE`: the server is hanging up.
    Bye,
}

impl Status {
    /// Maps a status keyword, in any case, to its status.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [
            ("OK", Self::Ok),
            ("NO", Self::No),
            ("BAD", Self::Bad),
            ("PREAUTH", Self::PreAuth),
            ("BYE", Self::Bye),
        ]
        .into_iter()
        .find_map(|(name, status)| keyword.eq_ignore_ascii_case(name).then_some(status))
    }
}

/// A `[...]` code inside a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// `ALERT`
    Alert,
    /// `CAPABILITY ...`, typically in the greeting.
    Capability(Vec<Capability>),
    /// `READ-ONLY`
    ReadOnly,
    /// `READ-WRITE`
    ReadWrite,
    /// `TRYCREATE`
    TryCreate,
    /// `UIDNEXT n`
    UidNext(u32),
    /// `UIDVALIDITY n`
    UidValidity(u32),
    /// Any other code, by name. Its arguments are discarded.
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keywords() {
        assert_eq!(Status::from_keyword("ok"), Some(Status::Ok));
        assert_eq!(Status::from_keyword("PreAuth"), Some(Status::PreAuth));
        assert_eq!(Status::from_keyword("BYE"), Some(Status::Bye));
        assert_eq!(Status::from_keyword("EXISTS"), None);
    }
}
