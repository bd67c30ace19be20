//! Convert SAM/BAM to FASTQ format.
//!
//! Writes one FASTQ file for single-end data, or two mate-aligned FASTQ files when a second
//! output is given. Input may be in any order; mates are matched by read name.

use anyhow::{Context, Result};
use bam2fq_lib::bam_io::{create_alignment_reader, is_stdio_path};
use bam2fq_lib::convert::{ConversionMetrics, SamToFastq};
use bam2fq_lib::errors::Bam2FqError;
use bam2fq_lib::fastq::FastqWriter;
use bam2fq_lib::logging::{OperationTimer, log_conversion_summary};
use bam2fq_lib::record::{FlagFilter, parse_flags};
use bam2fq_lib::strand::StrandNormalizer;
use bam2fq_lib::validation::{
    validate_distinct_outputs, validate_input_readable, validate_output_is_not_input,
    validate_output_writable, validate_positive,
};
use clap::{ArgAction, Parser};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::commands::command::Command;

/// Convert SAM/BAM to FASTQ format.
#[derive(Debug, Parser)]
#[command(
    name = "fastq",
    about = "\x1b[38;5;72m[CONVERSION]\x1b[0m     \x1b[36mConvert SAM/BAM to single-end or paired FASTQ\x1b[0m",
    long_about = r#"
Extract read sequences and qualities from a SAM or BAM file and write them as FASTQ.

With only --output, every record is written to one FASTQ file with its read name
unchanged. With --second-output as well, records are paired by read name: the
first-of-pair mate is written to --output as NAME/1 and the second-of-pair mate
to --second-output as NAME/2, in the order pairs complete. Every read name must
occur exactly twice, once flagged first-of-pair and once second-of-pair.

By default, reads aligned to the negative strand are reverse-complemented (and
their qualities reversed) to restore the sequence as it came off the sequencer.

Outputs ending in .gz are gzip compressed; '-' writes to stdout.

EXAMPLES:

  # Single-end
  bam2fq fastq -i aligned.bam -o reads.fq.gz

  # Paired, dropping secondary and supplementary alignments
  bam2fq fastq -i aligned.bam -o reads_1.fq.gz -s reads_2.fq.gz -F 0x900
"#
)]
pub struct Fastq {
    /// Input SAM or BAM file ('-' for stdin).
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output FASTQ (single-end, or first of pair when --second-output is given).
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Output FASTQ for the second of pair. Enables paired mode.
    #[arg(short = 's', long = "second-output")]
    pub second_output: Option<PathBuf>,

    /// Re-reverse bases and qualities of mapped reads on the negative strand.
    #[arg(long = "re-reverse", default_value_t = true, action = ArgAction::Set)]
    pub re_reverse: bool,

    /// Exclude reads with any of these flags present.
    #[arg(short = 'F', long = "exclude-flags", default_value_t = 0, value_parser = parse_flags)]
    pub exclude_flags: u16,

    /// Only include reads with all of these flags present.
    #[arg(short = 'f', long = "require-flags", default_value_t = 0, value_parser = parse_flags)]
    pub require_flags: u16,

    /// Number of threads for BAM decompression.
    #[arg(short = '@', short_alias = 't', long = "threads", default_value = "1")]
    pub threads: usize,

    /// Keep partially written output files when the conversion fails.
    #[arg(long = "keep-partial-output", default_value = "false")]
    pub keep_partial_output: bool,
}

impl Command for Fastq {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.validate()?;

        let timer = OperationTimer::new("Converting SAM/BAM to FASTQ");

        info!("Input: {}", self.input.display());
        info!("Output: {}", self.output.display());
        if let Some(second) = &self.second_output {
            info!("Second-of-pair output: {}", second.display());
        }
        info!("Mode: {}", if self.second_output.is_some() { "paired" } else { "single-end" });
        let normalizer = StrandNormalizer::new(self.re_reverse);
        info!("Re-reverse negative strand reads: {}", normalizer.re_reverse());
        info!("Exclude flags: 0x{:X}", self.exclude_flags);
        info!("Require flags: 0x{:X}", self.require_flags);
        info!("Threads: {}", self.threads);

        let converter = SamToFastq::new()
            .with_normalizer(normalizer)
            .with_filter(FlagFilter::new(self.exclude_flags, self.require_flags));

        let mut created: Vec<PathBuf> = Vec::new();
        match self.run(&converter, &mut created) {
            Ok(metrics) => {
                log_conversion_summary(&metrics);
                timer.log_completion(metrics.records_read);
                Ok(())
            }
            Err(e) => {
                if self.keep_partial_output {
                    for path in &created {
                        warn!("Keeping incomplete output: {}", path.display());
                    }
                } else {
                    remove_partial_outputs(&created);
                }
                Err(e)
            }
        }
    }
}

impl Fastq {
    /// Checks paths and parameters before anything is opened.
    fn validate(&self) -> Result<()> {
        validate_positive(self.threads, "threads")?;
        validate_input_readable(&self.input, "Input SAM/BAM")?;
        validate_output_writable(&self.output, "Output FASTQ")?;
        validate_output_is_not_input(&self.input, &self.output, "output")?;
        if let Some(second) = &self.second_output {
            validate_output_writable(second, "Second-of-pair FASTQ")?;
            validate_output_is_not_input(&self.input, second, "second-output")?;
            validate_distinct_outputs(&self.output, second)?;
        }
        Ok(())
    }

    /// Opens input and outputs, then converts. Paths of created files are pushed to
    /// `created` as soon as they exist so the caller can clean up after a failure.
    fn run(&self, converter: &SamToFastq, created: &mut Vec<PathBuf>) -> Result<ConversionMetrics> {
        let (reader, header) = create_alignment_reader(&self.input, self.threads)?;
        info!("Detected input format: {:?}", reader.format());
        let records = reader.into_records(header);

        let mut writer1 = open_output(&self.output, created)?;

        let metrics = if let Some(second) = &self.second_output {
            let mut writer2 = open_output(second, created)?;
            let metrics = converter.convert_paired(records, &mut writer1, &mut writer2)?;
            writer2
                .finish()
                .with_context(|| format!("Failed to finish {}", second.display()))?;
            metrics
        } else {
            converter.convert_single_end(records, &mut writer1)?
        };

        writer1.finish().with_context(|| format!("Failed to finish {}", self.output.display()))?;
        Ok(metrics)
    }
}

/// Creates a FASTQ writer, recording the path if a file was created.
fn open_output(path: &Path, created: &mut Vec<PathBuf>) -> Result<FastqWriter> {
    let writer = FastqWriter::from_path(path).map_err(|e| Bam2FqError::OutputNotWritable {
        path: path.display().to_string(),
        reason: format!("{e:#}"),
    })?;
    if !is_stdio_path(path) {
        created.push(path.to_path_buf());
    }
    Ok(writer)
}

/// Deletes outputs left behind by a failed conversion.
fn remove_partial_outputs(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => warn!("Removed incomplete output: {}", path.display()),
            Err(e) => warn!("Could not remove incomplete output {}: {e}", path.display()),
        }
    }
}
