//! Message sequence numbers.

use std::fmt;
use std::num::NonZeroU32;

/// Position of a message in the open mailbox, starting at 1.
///
/// Only stable while the mailbox stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqNum(NonZeroU32);

impl SeqNum {
    /// Returns `None` for 0.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// The number itself.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A contiguous run of messages, written `first:last` or as a single
/// number when both ends meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSet {
    first: SeqNum,
    last: SeqNum,
}

impl SequenceSet {
    /// Messages `first` through `last`. Returns `None` if either is 0.
    #[must_use]
    pub fn range(first: u32, last: u32) -> Option<Self> {
        Some(Self {
            first: SeqNum::new(first)?,
            last: SeqNum::new(last)?,
        })
    }

    /// First message of the run.
    #[must_use]
    pub const fn first(&self) -> SeqNum {
        self.first
    }

    /// Last message of the run.
    #[must_use]
    pub const fn last(&self) -> SeqNum {
        self.last
    }
}

impl fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}
