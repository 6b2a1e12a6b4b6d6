//! Per-connection command tags.

/// Issues `A0000`, `A0001`, and so on.
///
/// Tags only need to be unique among the commands of one connection.
#[derive(Debug, Default)]
pub struct TagGenerator {
    issued: u32,
}

impl TagGenerator {
    /// Returns a fresh tag.
    pub fn issue(&mut self) -> String {
        let tag = format!("A{:04}", self.issued);
        self.issued = self.issued.wrapping_add(1);
        tag
    }

    /// Number of tags issued so far.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_count_up_from_zero() {
        let mut tags = TagGenerator::default();
        assert_eq!(tags.issue(), "A0000");
        assert_eq!(tags.issue(), "A0001");
        assert_eq!(tags.issued(), 2);
    }

    #[test]
    fn test_padding_grows_past_four_digits() {
        let mut tags = TagGenerator::default();
        for _ in 0..10_000 {
            tags.issue();
        }
        assert_eq!(tags.issue(), "A10000");
    }
}
