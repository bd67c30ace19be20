//! SAM/BAM input.
//!
//! This module opens an alignment file, detects whether it is BAM or SAM, reads the header
//! and exposes the records as a fallible iterator of [`AlignmentRecord`]s.
//!
//! # Threading Model
//!
//! BAM files use BGZF compression, which noodles can decompress on worker threads:
//!
//! - **Single-threaded**: Use `threads=1` (lower overhead, good for small files)
//! - **Multi-threaded**: Use `threads>1` (higher throughput for large files)
//!
//! Decompression threads are internal to the reader; records are still yielded one at a
//! time, in file order, on the calling thread.

use noodles::bgzf::io::{MultithreadedReader, Reader as BgzfReader};
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::num::NonZero;
use std::path::Path;

use crate::errors::{Bam2FqError, Result};
use crate::record::AlignmentRecord;

/// Buffered raw input: a file or standard input.
type InputStream = BufReader<Box<dyn Read + Send>>;

/// Gzip magic shared by every BGZF block.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Enum wrapping single-threaded and multi-threaded BGZF readers.
pub enum BgzfReaderEnum {
    /// Single-threaded BGZF reader (lower overhead for small files)
    SingleThreaded(BgzfReader<InputStream>),
    /// Multi-threaded BGZF reader (noodles built-in threading)
    MultiThreaded(MultithreadedReader<InputStream>),
}

impl Read for BgzfReaderEnum {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.read(buf),
            BgzfReaderEnum::MultiThreaded(r) => r.read(buf),
        }
    }
}

impl BufRead for BgzfReaderEnum {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.fill_buf(),
            BgzfReaderEnum::MultiThreaded(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.consume(amt),
            BgzfReaderEnum::MultiThreaded(r) => r.consume(amt),
        }
    }
}

/// Input container format, detected from the first bytes of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    /// BGZF-compressed BAM
    Bam,
    /// Uncompressed SAM text
    Sam,
}

/// A SAM or BAM reader positioned after the header.
pub enum AlignmentReader {
    /// BAM input
    Bam(noodles::bam::io::Reader<BgzfReaderEnum>),
    /// SAM input
    Sam(noodles::sam::io::Reader<InputStream>),
}

impl AlignmentReader {
    /// The detected input format.
    #[must_use]
    pub fn format(&self) -> AlignmentFormat {
        match self {
            AlignmentReader::Bam(_) => AlignmentFormat::Bam,
            AlignmentReader::Sam(_) => AlignmentFormat::Sam,
        }
    }

    /// Reads the next record into `record`, returning 0 at end of input.
    fn read_record_buf(&mut self, header: &Header, record: &mut RecordBuf) -> io::Result<usize> {
        match self {
            AlignmentReader::Bam(r) => r.read_record_buf(header, record),
            AlignmentReader::Sam(r) => r.read_record_buf(header, record),
        }
    }

    /// Consumes the reader, yielding records in file order.
    #[must_use]
    pub fn into_records(self, header: Header) -> AlignmentRecords {
        AlignmentRecords { reader: self, header, buf: RecordBuf::default(), done: false }
    }
}

/// Iterator over the records of an [`AlignmentReader`].
///
/// Stops after the first error.
pub struct AlignmentRecords {
    reader: AlignmentReader,
    header: Header,
    buf: RecordBuf,
    done: bool,
}

impl Iterator for AlignmentRecords {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record_buf(&self.header, &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                let result = AlignmentRecord::from_record_buf(&self.buf);
                self.done = result.is_err();
                Some(result)
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

/// Returns true if the path denotes standard input or output.
///
/// ```
/// use bam2fq_lib::bam_io::is_stdio_path;
/// use std::path::Path;
///
/// assert!(is_stdio_path(Path::new("-")));
/// assert!(is_stdio_path(Path::new("/dev/stdin")));
/// assert!(is_stdio_path(Path::new("/dev/stdout")));
/// assert!(!is_stdio_path(Path::new("input.bam")));
/// ```
pub fn is_stdio_path<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();
    path_str == "-" || path_str == "/dev/stdin" || path_str == "/dev/stdout"
}

/// Opens a SAM or BAM file (or standard input) and reads its header.
///
/// The format is detected from content: a gzip magic number means BAM, anything else
/// is parsed as SAM.
///
/// # Errors
///
/// Returns [`Bam2FqError::InputNotReadable`] if the input cannot be opened or its header
/// cannot be read.
///
/// # Example
/// ```no_run
/// use bam2fq_lib::bam_io::create_alignment_reader;
///
/// // Multi-threaded with 4 decompression threads
/// let (reader, header) = create_alignment_reader("input.bam", 4).unwrap();
/// for result in reader.into_records(header) {
///     let record = result.unwrap();
///     println!("{}", record.name());
/// }
/// ```
pub fn create_alignment_reader<P: AsRef<Path>>(
    path: P,
    threads: usize,
) -> Result<(AlignmentReader, Header)> {
    let path_ref = path.as_ref();
    let not_readable = |e: io::Error| Bam2FqError::InputNotReadable {
        path: path_ref.display().to_string(),
        reason: e.to_string(),
    };

    let inner: Box<dyn Read + Send> = if is_stdio_path(path_ref) {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(path_ref).map_err(not_readable)?)
    };

    alignment_reader_from(inner, threads).map_err(not_readable)
}

/// Builds an [`AlignmentReader`] over any byte stream and reads its header.
///
/// # Errors
///
/// Returns an error if the stream cannot be read or the header is malformed.
pub fn alignment_reader_from(
    inner: Box<dyn Read + Send>,
    threads: usize,
) -> io::Result<(AlignmentReader, Header)> {
    let mut stream = BufReader::new(inner);
    let is_bam = stream.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_bam {
        let bgzf_reader = match NonZero::new(threads) {
            Some(worker_count) if threads > 1 => BgzfReaderEnum::MultiThreaded(
                MultithreadedReader::with_worker_count(worker_count, stream),
            ),
            _ => BgzfReaderEnum::SingleThreaded(BgzfReader::new(stream)),
        };
        let mut reader = noodles::bam::io::Reader::from(bgzf_reader);
        let header = reader.read_header()?;
        Ok((AlignmentReader::Bam(reader), header))
    } else {
        let mut reader = noodles::sam::io::Reader::new(stream);
        let header = reader.read_header()?;
        Ok((AlignmentReader::Sam(reader), header))
    }
}
