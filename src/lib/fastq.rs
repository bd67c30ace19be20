//! FASTQ records and writers.
//!
//! [`FastqRecord`] is the unit handed to a [`FastqSink`]. [`FastqWriter`] is the sink used
//! by the command line tool; it writes plain text, gzip-compressed text when the output path
//! ends in `.gz`, or standard output for `-`.

use anyhow::{Context, Result};
use bstr::{BString, ByteSlice};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::bam_io::is_stdio_path;

/// Buffer size for FASTQ output.
const OUTPUT_BUFFER_SIZE: usize = 1024 * 1024;

/// Which end of a read pair a FASTQ entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MateNumber {
    /// First of pair, suffixed `/1`
    First,
    /// Second of pair, suffixed `/2`
    Second,
}

impl fmt::Display for MateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MateNumber::First => write!(f, "1"),
            MateNumber::Second => write!(f, "2"),
        }
    }
}

/// A single FASTQ entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    /// Identifier written after `@`
    pub name: BString,
    /// Bases
    pub sequence: Vec<u8>,
    /// Text written after `+`
    pub comment: BString,
    /// Phred+33 qualities
    pub qualities: Vec<u8>,
}

impl FastqRecord {
    /// Builds an entry with an empty comment.
    ///
    /// The identifier is `read_name` followed by `/1` or `/2` when `mate` is given.
    #[must_use]
    pub fn new(
        read_name: impl Into<BString>,
        mate: Option<MateNumber>,
        sequence: Vec<u8>,
        qualities: Vec<u8>,
    ) -> Self {
        let mut name = read_name.into();
        if let Some(mate) = mate {
            name.push(b'/');
            name.extend_from_slice(mate.to_string().as_bytes());
        }
        Self { name, sequence, comment: BString::default(), qualities }
    }

    /// Writes the entry as four FASTQ lines.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"@")?;
        writer.write_all(self.name.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(&self.sequence)?;
        writer.write_all(b"\n+")?;
        writer.write_all(self.comment.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(&self.qualities)?;
        writer.write_all(b"\n")
    }
}

/// Destination for FASTQ entries, appended in call order.
pub trait FastqSink {
    /// Appends one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    fn write_record(&mut self, record: FastqRecord) -> io::Result<()>;
}

/// Collects entries in memory.
impl FastqSink for Vec<FastqRecord> {
    fn write_record(&mut self, record: FastqRecord) -> io::Result<()> {
        self.push(record);
        Ok(())
    }
}

/// A FASTQ file writer.
///
/// Call [`finish`](FastqWriter::finish) once all records are written; dropping the writer
/// closes the file but may lose buffered data or the gzip trailer without reporting errors.
///
/// # Examples
///
/// ```no_run
/// use bam2fq_lib::fastq::{FastqRecord, FastqSink, FastqWriter};
///
/// # fn main() -> anyhow::Result<()> {
/// let mut writer = FastqWriter::from_path("reads_1.fastq.gz")?;
/// writer.write_record(FastqRecord::new("read1", None, b"ACGT".to_vec(), b"IIII".to_vec()))?;
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct FastqWriter {
    inner: FastqWriterInner,
}

enum FastqWriterInner {
    Plain(BufWriter<Box<dyn Write + Send>>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl FastqWriter {
    /// Opens a writer for `path`.
    ///
    /// `-` and `/dev/stdout` write to standard output; paths ending in `.gz` are gzip
    /// compressed; anything else is written as plain text. Existing files are truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if is_stdio_path(path) {
            return Ok(Self::new(Box::new(io::stdout())));
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

        let inner = if path.extension().is_some_and(|ext| ext == "gz") {
            let buf = BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file);
            FastqWriterInner::Gzip(GzEncoder::new(buf, Compression::default()))
        } else {
            FastqWriterInner::Plain(BufWriter::with_capacity(
                OUTPUT_BUFFER_SIZE,
                Box::new(file) as Box<dyn Write + Send>,
            ))
        };

        Ok(Self { inner })
    }

    /// Wraps an arbitrary writer as an uncompressed FASTQ writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { inner: FastqWriterInner::Plain(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, writer)) }
    }

    /// Flushes buffered output and, for gzip output, writes the trailer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or finishing compression fails.
    pub fn finish(self) -> io::Result<()> {
        match self.inner {
            FastqWriterInner::Plain(mut w) => w.flush(),
            FastqWriterInner::Gzip(gz) => gz.finish()?.flush(),
        }
    }
}

impl FastqSink for FastqWriter {
    fn write_record(&mut self, record: FastqRecord) -> io::Result<()> {
        match &mut self.inner {
            FastqWriterInner::Plain(w) => record.write_to(w),
            FastqWriterInner::Gzip(w) => record.write_to(w),
        }
    }
}
