#![deny(unsafe_code)]
// Clippy lint configuration for CI
// - cast_*: quality lookup tables and rate formatting cast between numeric types
// - missing_panics_doc: panics are limited to test helpers
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc
)]

//! # bam2fq - SAM/BAM to FASTQ conversion
//!
//! This library converts aligned reads back to FASTQ, either as a single stream or as a
//! pair of mate streams, restoring the sequencer orientation of reads aligned to the
//! negative strand.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`mates`]** - Pairing mates by read name in a single pass
//! - **[`strand`]** - Re-reversing negative-strand reads
//! - **[`convert`]** - Driving records through filtering, pairing and normalization
//!
//! ### Input and Output
//!
//! - **[`bam_io`]** - Opening SAM/BAM input with format detection
//! - **[`record`]** - The alignment record consumed by the conversion, and flag filtering
//! - **[`fastq`]** - FASTQ records, the sink trait and the file writer
//!
//! ### Utilities
//!
//! - **[`dna`]** - Reverse complement
//! - **[`validation`]** - Pre-flight checks on paths and parameters
//! - **[`progress`]** - Progress tracking and logging
//! - **[`logging`]** - Formatting helpers, the conversion summary and operation timing
//! - **[`errors`]** - Error types
//!
//! ## Quick Start
//!
//! ```no_run
//! use bam2fq_lib::bam_io::create_alignment_reader;
//! use bam2fq_lib::convert::SamToFastq;
//! use bam2fq_lib::fastq::FastqWriter;
//!
//! # fn main() -> anyhow::Result<()> {
//! let (reader, header) = create_alignment_reader("input.bam", 1)?;
//! let mut r1 = FastqWriter::from_path("reads_1.fq.gz")?;
//! let mut r2 = FastqWriter::from_path("reads_2.fq.gz")?;
//!
//! let metrics = SamToFastq::new().convert_paired(reader.into_records(header), &mut r1, &mut r2)?;
//! r1.finish()?;
//! r2.finish()?;
//! println!("wrote {} pairs", metrics.pairs_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## See Also
//!
//! - [noodles](https://github.com/zaeleus/noodles) - Rust bioinformatics I/O

pub mod bam_io;
pub mod convert;
pub mod dna;
pub mod errors;
pub mod fastq;
pub mod logging;
pub mod mates;
pub mod progress;
pub mod record;
pub mod strand;
pub mod validation;

pub use convert::{ConversionMetrics, SamToFastq};
pub use errors::{Bam2FqError, Result};
