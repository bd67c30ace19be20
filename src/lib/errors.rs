//! Custom error types for bam2fq operations.

use bstr::BString;
use noodles::sam::alignment::record::Flags;
use thiserror::Error;

/// Result type alias for bam2fq operations
pub type Result<T> = std::result::Result<T, Bam2FqError>;

/// Error type for bam2fq operations
#[derive(Error, Debug)]
pub enum Bam2FqError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// The input could not be opened or its header could not be read
    #[error("Input '{path}' is not readable: {reason}")]
    InputNotReadable {
        /// Path to the input
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// An output file could not be created
    #[error("Output '{path}' is not writable: {reason}")]
    OutputNotWritable {
        /// Path to the output
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Two records share a read name but are not a first/second-of-pair combination
    #[error(
        "Illegal mate state for read '{read_name}': flags {first_flags:#06x} and \
         {second_flags:#06x} are not one first-of-pair and one second-of-pair"
    )]
    InvalidMateState {
        /// The shared read name
        read_name: BString,
        /// Flags of the record seen first
        first_flags: u16,
        /// Flags of the record seen second
        second_flags: u16,
    },

    /// Records left without a mate once the input was exhausted
    #[error("Found {count} unpaired mates")]
    UnpairedMates {
        /// Number of read names still waiting for a mate
        count: usize,
    },

    /// A record cannot be represented as a FASTQ entry
    #[error("Invalid record '{read_name}': {reason}")]
    InvalidRecord {
        /// Read name, or `*` if the record has none
        read_name: BString,
        /// Explanation of the problem
        reason: String,
    },

    /// I/O failure while reading records or writing FASTQ
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Bam2FqError {
    /// Builds an [`Bam2FqError::InvalidMateState`] from the two conflicting records' flags.
    #[must_use]
    pub fn invalid_mate_state(read_name: BString, first: Flags, second: Flags) -> Self {
        Self::InvalidMateState {
            read_name,
            first_flags: first.bits(),
            second_flags: second.bits(),
        }
    }
}
