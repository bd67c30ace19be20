//! Input validation utilities
//!
//! Checks run before any record is read, so that a missing input or an impossible output
//! location is reported without creating partial output.

use crate::bam_io::is_stdio_path;
use crate::errors::{Bam2FqError, Result};
use std::path::{Path, PathBuf};

/// Validate that an input file exists and is a regular file.
///
/// Standard input (`-`, `/dev/stdin`) always passes.
///
/// # Errors
/// Returns [`Bam2FqError::InputNotReadable`] if the file does not exist or is a directory.
///
/// # Example
/// ```
/// use bam2fq_lib::validation::validate_input_readable;
///
/// let result = validate_input_readable("/nonexistent/file.bam", "Input SAM/BAM");
/// assert!(result.is_err());
/// ```
pub fn validate_input_readable<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if is_stdio_path(path_ref) {
        return Ok(());
    }
    let reason = if !path_ref.exists() {
        "File does not exist"
    } else if path_ref.is_dir() {
        "Path is a directory"
    } else {
        return Ok(());
    };
    Err(Bam2FqError::InputNotReadable {
        path: path_ref.display().to_string(),
        reason: format!("{description}: {reason}"),
    })
}

/// Validate that an output file can be created at `path`.
///
/// The parent directory must exist and the path must not be a directory. Standard output
/// always passes. Nothing is created on disk.
///
/// # Errors
/// Returns [`Bam2FqError::OutputNotWritable`] describing the problem.
///
/// # Example
/// ```
/// use bam2fq_lib::validation::validate_output_writable;
///
/// assert!(validate_output_writable("-", "Output FASTQ").is_ok());
/// assert!(validate_output_writable("/nonexistent/dir/out.fq", "Output FASTQ").is_err());
/// ```
pub fn validate_output_writable<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if is_stdio_path(path_ref) {
        return Ok(());
    }

    let parent = match path_ref.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let reason = if path_ref.is_dir() {
        "Path is a directory"
    } else if !parent.is_dir() {
        "Parent directory does not exist"
    } else {
        return Ok(());
    };
    Err(Bam2FqError::OutputNotWritable {
        path: path_ref.display().to_string(),
        reason: format!("{description}: {reason}"),
    })
}

/// Resolve `path` to the file it names on disk.
///
/// Existing paths are canonicalized. For a file that does not exist yet, the parent
/// directory is canonicalized and the file name joined back on. Paths that cannot be
/// resolved are returned unchanged.
#[must_use]
pub fn resolve_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Validate that two outputs do not name the same destination.
///
/// Paths are compared after [`resolve_path`], so `r1.fq` and `./r1.fq` are the same file.
///
/// # Errors
/// Returns [`Bam2FqError::InvalidParameter`] if both paths resolve to the same file or both
/// are stdout.
///
/// # Example
/// ```
/// use bam2fq_lib::validation::validate_distinct_outputs;
///
/// assert!(validate_distinct_outputs("r1.fq", "r2.fq").is_ok());
/// assert!(validate_distinct_outputs("r1.fq", "./r1.fq").is_err());
/// assert!(validate_distinct_outputs("-", "/dev/stdout").is_err());
/// ```
pub fn validate_distinct_outputs<P: AsRef<Path>, Q: AsRef<Path>>(first: P, second: Q) -> Result<()> {
    let (first, second) = (first.as_ref(), second.as_ref());
    let same = if is_stdio_path(first) || is_stdio_path(second) {
        is_stdio_path(first) && is_stdio_path(second)
    } else {
        resolve_path(first) == resolve_path(second)
    };
    if same {
        return Err(Bam2FqError::InvalidParameter {
            parameter: "second-output".to_string(),
            reason: format!(
                "mate outputs must differ, got '{}' and '{}'",
                first.display(),
                second.display()
            ),
        });
    }
    Ok(())
}

/// Validate that an output does not overwrite the input.
///
/// # Errors
/// Returns [`Bam2FqError::InvalidParameter`] naming `parameter` if `output` resolves to the
/// same file as `input`. Standard input and output never clash.
///
/// # Example
/// ```
/// use bam2fq_lib::validation::validate_output_is_not_input;
///
/// assert!(validate_output_is_not_input("in.sam", "out.fq", "output").is_ok());
/// assert!(validate_output_is_not_input("in.sam", "./in.sam", "output").is_err());
/// ```
pub fn validate_output_is_not_input<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    parameter: &str,
) -> Result<()> {
    let (input, output) = (input.as_ref(), output.as_ref());
    if is_stdio_path(input) || is_stdio_path(output) {
        return Ok(());
    }
    if resolve_path(input) == resolve_path(output) {
        return Err(Bam2FqError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: format!("'{}' is the input file", output.display()),
        });
    }
    Ok(())
}

/// Validate that a value is positive (> 0)
///
/// # Errors
/// Returns [`Bam2FqError::InvalidParameter`] if the value is 0.
///
/// # Example
/// ```
/// use bam2fq_lib::validation::validate_positive;
///
/// validate_positive(4, "threads").unwrap();
/// assert!(validate_positive(0, "threads").is_err());
/// ```
pub fn validate_positive(value: usize, name: &str) -> Result<()> {
    if value == 0 {
        return Err(Bam2FqError::InvalidParameter {
            parameter: name.to_string(),
            reason: "must be > 0".to_string(),
        });
    }
    Ok(())
}
