//! Alignment records as consumed by the FASTQ conversion.
//!
//! [`AlignmentRecord`] holds exactly the parts of a SAM/BAM record that survive into
//! FASTQ: the read name, the bases, the Phred+33 quality string and the SAM flags.
//! It owns its data so that the mate matcher can buffer a record until its mate arrives
//! without holding on to the decoder's buffers.

use bstr::{BStr, BString};
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::Flags;

use crate::errors::{Bam2FqError, Result};

/// Lookup table for Phred to Phred+33 ASCII conversion (clamped to 126)
static QUAL_TO_ASCII: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let val = (i as u8).saturating_add(33);
        table[i] = if val > 126 { 126 } else { val };
        i += 1;
    }
    table
};

/// A single alignment record reduced to what is written to FASTQ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// The read (query template) name
    pub name: BString,
    /// Bases as stored in the alignment file
    pub sequence: Vec<u8>,
    /// Phred+33 ASCII qualities, same length as `sequence`
    pub qualities: Vec<u8>,
    /// SAM flags
    pub flags: Flags,
}

impl AlignmentRecord {
    /// Creates a record, checking that sequence and qualities have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`Bam2FqError::InvalidRecord`] if the lengths differ.
    pub fn new(
        name: impl Into<BString>,
        sequence: impl Into<Vec<u8>>,
        qualities: impl Into<Vec<u8>>,
        flags: Flags,
    ) -> Result<Self> {
        let record =
            Self { name: name.into(), sequence: sequence.into(), qualities: qualities.into(), flags };

        if record.sequence.len() != record.qualities.len() {
            return Err(Bam2FqError::InvalidRecord {
                read_name: record.name,
                reason: format!(
                    "sequence length {} does not match quality length {}",
                    record.sequence.len(),
                    record.qualities.len()
                ),
            });
        }

        Ok(record)
    }

    /// Converts a decoded SAM/BAM record.
    ///
    /// Quality scores are converted from raw Phred values to Phred+33 ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`Bam2FqError::InvalidRecord`] if the record has no read name, or has bases
    /// but no quality scores (`*` in SAM).
    pub fn from_record_buf(record: &RecordBuf) -> Result<Self> {
        let name = record.name().ok_or_else(|| Bam2FqError::InvalidRecord {
            read_name: BString::from("*"),
            reason: "record has no read name".to_string(),
        })?;

        let sequence: &[u8] = record.sequence().as_ref();
        let scores: &[u8] = record.quality_scores().as_ref();

        if scores.is_empty() && !sequence.is_empty() {
            return Err(Bam2FqError::InvalidRecord {
                read_name: name.to_owned(),
                reason: "record has bases but no base qualities".to_string(),
            });
        }

        let qualities: Vec<u8> = scores.iter().map(|&q| QUAL_TO_ASCII[q as usize]).collect();
        Self::new(name.to_owned(), sequence.to_vec(), qualities, record.flags())
    }

    /// The read name.
    #[must_use]
    pub fn name(&self) -> &BStr {
        self.name.as_ref()
    }

    /// Whether the record is flagged unmapped.
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.flags.is_unmapped()
    }

    /// Whether the record is aligned to the negative strand.
    #[must_use]
    pub fn is_negative_strand(&self) -> bool {
        self.flags.is_reverse_complemented()
    }

    /// Whether the record is flagged first-of-pair.
    #[must_use]
    pub fn is_first_of_pair(&self) -> bool {
        self.flags.is_first_segment()
    }

    /// Whether the record is flagged second-of-pair.
    #[must_use]
    pub fn is_second_of_pair(&self) -> bool {
        self.flags.is_last_segment()
    }
}

/// Include/exclude filter on SAM flags, applied before pairing.
///
/// A record passes when it carries none of the `exclude` flags and all of the `require` flags.
/// The default filter passes every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagFilter {
    /// Drop records with any of these flags set
    pub exclude: u16,
    /// Keep only records with all of these flags set
    pub require: u16,
}

impl FlagFilter {
    /// Creates a filter from raw flag bits.
    #[must_use]
    pub const fn new(exclude: u16, require: u16) -> Self {
        Self { exclude, require }
    }

    /// Returns `true` if a record with these flags should be converted.
    #[inline]
    #[must_use]
    pub fn accepts(&self, flags: Flags) -> bool {
        let bits = flags.bits();
        (bits & self.exclude) == 0 && (bits & self.require) == self.require
    }
}

/// Parse flag values supporting both decimal and hex (0x) notation.
///
/// # Errors
///
/// Returns a message describing the parse failure; used as a clap value parser.
pub fn parse_flags(s: &str) -> std::result::Result<u16, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        s.parse().map_err(|e: std::num::ParseIntError| e.to_string())
    }
}
