//! Pairing mates by read name in a single forward pass.
//!
//! The input is not assumed to be sorted or mate-adjacent. The first record seen for each
//! read name is held in a pending map until its mate arrives, at which point both records
//! are moved out and returned as a [`MatePair`].
//!
//! # Memory
//!
//! Memory is bounded by the number of read names whose mate has not yet been seen, not
//! by the size of the input. Queryname-sorted or collated input keeps the pending map
//! tiny; coordinate-sorted input grows it in proportion to the distance between mates.

use ahash::AHashMap;
use bstr::BString;

use crate::errors::{Bam2FqError, Result};
use crate::record::AlignmentRecord;

/// Two mates ordered by their own first/second-of-pair flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatePair {
    /// The mate written as `/1`
    pub first: AlignmentRecord,
    /// The mate written as `/2`
    pub second: AlignmentRecord,
}

/// Matches mates across a stream of records.
#[derive(Debug, Default)]
pub struct MateMatcher {
    pending: AHashMap<BString, AlignmentRecord>,
}

impl MateMatcher {
    /// Creates an empty matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes one record.
    ///
    /// Returns `Ok(None)` if this is the first record seen for its read name, and the
    /// completed pair if the mate was already pending. In the pair, whichever record is
    /// flagged first-of-pair becomes [`MatePair::first`], regardless of arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`Bam2FqError::InvalidMateState`] if the two records sharing the name are not
    /// one first-of-pair and one second-of-pair. Neither record is returned in that case.
    pub fn observe(&mut self, record: AlignmentRecord) -> Result<Option<MatePair>> {
        let Some(earlier) = self.pending.remove(&record.name) else {
            self.pending.insert(record.name.clone(), record);
            return Ok(None);
        };

        assert_paired_mates(&earlier, &record)?;

        let pair = if record.is_first_of_pair() {
            MatePair { first: record, second: earlier }
        } else {
            MatePair { first: earlier, second: record }
        };
        Ok(Some(pair))
    }

    /// Number of read names still waiting for their mate.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Checks that every mate was matched once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Bam2FqError::UnpairedMates`] with the number of read names still pending.
    pub fn finish(self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(Bam2FqError::UnpairedMates { count: self.pending.len() })
        }
    }
}

/// Verifies that two records sharing a read name form a valid pair.
///
/// Exactly one of them must be first-of-pair with the other second-of-pair.
///
/// # Errors
///
/// Returns [`Bam2FqError::InvalidMateState`] otherwise, e.g. when both records are
/// flagged first-of-pair or neither carries a pair flag.
pub fn assert_paired_mates(a: &AlignmentRecord, b: &AlignmentRecord) -> Result<()> {
    let valid = (a.is_first_of_pair() && b.is_second_of_pair())
        || (b.is_first_of_pair() && a.is_second_of_pair());
    if valid {
        Ok(())
    } else {
        Err(Bam2FqError::invalid_mate_state(a.name.clone(), a.flags, b.flags))
    }
}
