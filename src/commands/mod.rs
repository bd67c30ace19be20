//! CLI command implementations for bam2fq.
//!
//! # Commands
//!
//! - [`fastq`] - Convert SAM/BAM to single-end or paired FASTQ

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod fastq;
