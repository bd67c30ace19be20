//! Driving a record stream into FASTQ sinks.
//!
//! [`SamToFastq`] ties the pieces together in a single forward pass:
//!
//! ```text
//! records -> FlagFilter -> MateMatcher (paired only) -> StrandNormalizer -> FastqSink(s)
//! ```
//!
//! In paired mode the two mates of a pair are written back to back, mate 1 to the first
//! sink and mate 2 to the second, so the two outputs stay aligned record for record.
//!
//! Errors are fatal: the first error from the input, a pairing violation, a sink failure,
//! or leftover unpaired mates stops the conversion and is returned. Records written before
//! the error stay in the sinks.

use log::debug;

use crate::errors::Result;
use crate::fastq::{FastqRecord, FastqSink, MateNumber};
use crate::mates::MateMatcher;
use crate::progress::ProgressTracker;
use crate::record::{AlignmentRecord, FlagFilter};
use crate::strand::StrandNormalizer;

/// Counts collected during a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionMetrics {
    /// Records pulled from the input
    pub records_read: u64,
    /// Records dropped by the flag filter
    pub records_filtered: u64,
    /// FASTQ entries written across all sinks
    pub records_written: u64,
    /// Pairs written (paired mode only)
    pub pairs_written: u64,
    /// Entries whose bases were reverse-complemented before writing
    pub reverse_complemented: u64,
}

/// SAM/BAM to FASTQ conversion settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamToFastq {
    normalizer: StrandNormalizer,
    filter: FlagFilter,
    progress_interval: Option<u64>,
}

impl SamToFastq {
    /// Creates a converter that re-reverses negative-strand reads and keeps every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strand normalizer.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: StrandNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Sets the flag filter applied before pairing.
    #[must_use]
    pub fn with_filter(mut self, filter: FlagFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Overrides how often progress is logged, in records read.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    fn progress(&self) -> ProgressTracker {
        let tracker = ProgressTracker::new("Read records");
        match self.progress_interval {
            Some(interval) => tracker.with_interval(interval),
            None => tracker,
        }
    }

    /// Writes every record to `sink` with its read name unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first input or write error.
    pub fn convert_single_end<I, S>(&self, records: I, sink: &mut S) -> Result<ConversionMetrics>
    where
        I: IntoIterator<Item = Result<AlignmentRecord>>,
        S: FastqSink + ?Sized,
    {
        let mut metrics = ConversionMetrics::default();
        let mut progress = self.progress();

        for result in records {
            let record = result?;
            metrics.records_read += 1;
            progress.record(1);

            if !self.filter.accepts(record.flags) {
                metrics.records_filtered += 1;
                continue;
            }

            self.emit(record, None, sink, &mut metrics)?;
        }

        progress.log_final();
        Ok(metrics)
    }

    /// Pairs records by read name and writes mate 1 to `sink1` and mate 2 to `sink2`.
    ///
    /// # Errors
    ///
    /// Returns the first input or write error, an
    /// [`InvalidMateState`](crate::errors::Bam2FqError::InvalidMateState) error for a bad
    /// pair, or [`UnpairedMates`](crate::errors::Bam2FqError::UnpairedMates) if any read
    /// name was seen only once.
    pub fn convert_paired<I, S1, S2>(
        &self,
        records: I,
        sink1: &mut S1,
        sink2: &mut S2,
    ) -> Result<ConversionMetrics>
    where
        I: IntoIterator<Item = Result<AlignmentRecord>>,
        S1: FastqSink + ?Sized,
        S2: FastqSink + ?Sized,
    {
        let mut metrics = ConversionMetrics::default();
        let mut progress = self.progress();
        let mut matcher = MateMatcher::new();

        for result in records {
            let record = result?;
            metrics.records_read += 1;
            progress.record(1);

            if !self.filter.accepts(record.flags) {
                metrics.records_filtered += 1;
                continue;
            }

            if let Some(pair) = matcher.observe(record)? {
                self.emit(pair.first, Some(MateNumber::First), sink1, &mut metrics)?;
                self.emit(pair.second, Some(MateNumber::Second), sink2, &mut metrics)?;
                metrics.pairs_written += 1;
            }
        }

        progress.log_final();
        debug!(
            "{} read names unpaired after {} records",
            matcher.pending_count(),
            progress.count()
        );
        matcher.finish()?;
        Ok(metrics)
    }

    /// Normalizes one record and hands it to the sink.
    fn emit<S: FastqSink + ?Sized>(
        &self,
        mut record: AlignmentRecord,
        mate: Option<MateNumber>,
        sink: &mut S,
        metrics: &mut ConversionMetrics,
    ) -> Result<()> {
        if self.normalizer.normalize(&mut record) {
            metrics.reverse_complemented += 1;
        }
        let AlignmentRecord { name, sequence, qualities, .. } = record;
        sink.write_record(FastqRecord::new(name, mate, sequence, qualities))?;
        metrics.records_written += 1;
        Ok(())
    }
}
