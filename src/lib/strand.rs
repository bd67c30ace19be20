//! Restoring sequencer orientation for reads aligned to the negative strand.
//!
//! Aligners store reads that map to the reverse strand reverse-complemented, with their
//! qualities reversed. [`StrandNormalizer`] undoes that for mapped negative-strand reads
//! so that the emitted FASTQ matches what came off the sequencer.

use crate::dna::reverse_complement_in_place;
use crate::record::AlignmentRecord;

/// Decides, per record, whether bases and qualities must be re-reversed before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrandNormalizer {
    re_reverse: bool,
}

impl Default for StrandNormalizer {
    fn default() -> Self {
        Self { re_reverse: true }
    }
}

impl StrandNormalizer {
    /// Creates a normalizer; `re_reverse = false` passes every record through unchanged.
    #[must_use]
    pub const fn new(re_reverse: bool) -> Self {
        Self { re_reverse }
    }

    /// Whether re-reversal is enabled.
    #[must_use]
    pub const fn re_reverse(&self) -> bool {
        self.re_reverse
    }

    /// Returns `true` iff the record is mapped, re-reversal is enabled, and the record is
    /// aligned to the negative strand.
    #[inline]
    #[must_use]
    pub fn should_reverse(&self, record: &AlignmentRecord) -> bool {
        !record.is_unmapped() && self.re_reverse && record.is_negative_strand()
    }

    /// Puts the record's bases and qualities in sequencer orientation.
    ///
    /// When [`should_reverse`](Self::should_reverse) holds the bases are reverse-complemented
    /// and the qualities reversed position-for-position; otherwise both are left untouched.
    /// Returns whether the record was changed.
    pub fn normalize(&self, record: &mut AlignmentRecord) -> bool {
        let reverse = self.should_reverse(record);
        if reverse {
            reverse_complement_in_place(&mut record.sequence);
            record.qualities.reverse();
        }
        reverse
    }
}
