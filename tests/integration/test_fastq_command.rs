//! Integration tests for the fastq command.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

use crate::helpers::assertions::{assert_names, read_fastq};
use crate::helpers::sam_files::{mapped_line, unmapped_line, write_bam, write_sam};

/// Runs `bam2fq fastq` with `args` and returns the process output.
fn run_fastq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bam2fq"))
        .arg("fastq")
        .args(args)
        .output()
        .expect("Failed to run bam2fq")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

/// Paths for input and both outputs inside `dir`.
fn paths(dir: &TempDir, input_name: &str) -> (PathBuf, PathBuf, PathBuf) {
    (dir.path().join(input_name), dir.path().join("r1.fq"), dir.path().join("r2.fq"))
}

fn run_paired(input: &Path, r1: &Path, r2: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["-i", path_str(input), "-o", path_str(r1), "-s", path_str(r2)];
    args.extend_from_slice(extra);
    run_fastq(&args)
}

#[test]
fn test_paired_emits_in_completion_order() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[
            unmapped_line("q1", 77, "AAAA", "IIII"),
            unmapped_line("q2", 77, "CCCC", "IIII"),
            unmapped_line("q2", 141, "GGGG", "IIII"),
            unmapped_line("q1", 141, "TTTT", "IIII"),
        ],
    );

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let first = read_fastq(&r1);
    let second = read_fastq(&r2);
    assert_names(&first, &["q2/1", "q1/1"]);
    assert_names(&second, &["q2/2", "q1/2"]);
    assert_eq!(first[0].sequence, "CCCC");
    assert_eq!(second[0].sequence, "GGGG");
    assert_eq!(first[1].sequence, "AAAA");
    assert_eq!(second[1].sequence, "TTTT");
    assert!(first.iter().chain(&second).all(|e| e.comment.is_empty()));
}

#[test]
fn test_second_of_pair_first_in_input() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[unmapped_line("q1", 141, "TTTT", "BBBB"), unmapped_line("q1", 77, "AAAA", "IIII")],
    );

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(output.status.success());

    let first = read_fastq(&r1);
    let second = read_fastq(&r2);
    assert_eq!((first[0].name.as_str(), first[0].sequence.as_str()), ("q1/1", "AAAA"));
    assert_eq!((second[0].name.as_str(), second[0].sequence.as_str()), ("q1/2", "TTTT"));
}

#[test]
fn test_negative_strand_mate_is_re_reversed() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[mapped_line("q1", 99, "ACGT", "IIII"), mapped_line("q1", 147, "TTTG", "ABCD")],
    );

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(output.status.success());

    let first = read_fastq(&r1);
    let second = read_fastq(&r2);
    assert_eq!((first[0].sequence.as_str(), first[0].qualities.as_str()), ("ACGT", "IIII"));
    assert_eq!((second[0].sequence.as_str(), second[0].qualities.as_str()), ("CAAA", "DCBA"));
}

#[test]
fn test_re_reverse_disabled() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[mapped_line("q1", 99, "ACGT", "IIII"), mapped_line("q1", 147, "TTTG", "ABCD")],
    );

    let output = run_paired(&input, &r1, &r2, &["--re-reverse", "false"]);
    assert!(output.status.success());

    let second = read_fastq(&r2);
    assert_eq!((second[0].sequence.as_str(), second[0].qualities.as_str()), ("TTTG", "ABCD"));
}

#[test]
fn test_unmapped_reverse_flag_is_ignored() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    // 93 = paired, unmapped, mate unmapped, reverse, first of pair
    write_sam(
        &input,
        &[unmapped_line("q1", 93, "AACG", "ABCD"), unmapped_line("q1", 141, "GGGG", "IIII")],
    );

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(output.status.success());

    let first = read_fastq(&r1);
    assert_eq!((first[0].sequence.as_str(), first[0].qualities.as_str()), ("AACG", "ABCD"));
}

#[test]
fn test_single_end_keeps_names_and_order() {
    let dir = TempDir::new().unwrap();
    let (input, out, _) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[
            unmapped_line("a", 4, "AAAA", "IIII"),
            mapped_line("b", 16, "AACG", "ABCD"),
            unmapped_line("c", 4, "CCCC", "IIII"),
        ],
    );

    let output = run_fastq(&["-i", path_str(&input), "-o", path_str(&out)]);
    assert!(output.status.success());

    let entries = read_fastq(&out);
    assert_names(&entries, &["a", "b", "c"]);
    assert_eq!((entries[1].sequence.as_str(), entries[1].qualities.as_str()), ("CGTT", "DCBA"));
}

#[test]
fn test_unpaired_mates_fail_and_remove_outputs() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[
            unmapped_line("q1", 77, "AAAA", "IIII"),
            unmapped_line("q2", 77, "CCCC", "IIII"),
            unmapped_line("q2", 141, "GGGG", "IIII"),
        ],
    );

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Found 1 unpaired mates"), "stderr: {stderr}");
    assert!(!r1.exists());
    assert!(!r2.exists());
}

#[test]
fn test_unpaired_mates_keep_partial_output() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[
            unmapped_line("q1", 77, "AAAA", "IIII"),
            unmapped_line("q2", 77, "CCCC", "IIII"),
            unmapped_line("q2", 141, "GGGG", "IIII"),
        ],
    );

    let output = run_paired(&input, &r1, &r2, &["--keep-partial-output"]);
    assert!(!output.status.success());
    assert!(r1.exists());
    assert!(r2.exists());
}

#[test]
fn test_two_first_of_pair_records_fail() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    write_sam(
        &input,
        &[unmapped_line("q1", 77, "AAAA", "IIII"), unmapped_line("q1", 77, "CCCC", "IIII")],
    );

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Illegal mate state for read 'q1'"), "stderr: {stderr}");
}

#[test]
fn test_bam_input_with_gzip_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.bam");
    let r1 = dir.path().join("r1.fq.gz");
    let r2 = dir.path().join("r2.fq.gz");
    write_bam(
        &input,
        &[
            mapped_line("q1", 99, "ACGT", "IIII"),
            mapped_line("q2", 83, "AACG", "ABCD"),
            mapped_line("q1", 147, "TTTG", "ABCD"),
            mapped_line("q2", 163, "GGGG", "IIII"),
        ],
    );

    let output = run_paired(&input, &r1, &r2, &["--threads", "2"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let first = read_fastq(&r1);
    let second = read_fastq(&r2);
    assert_names(&first, &["q1/1", "q2/1"]);
    assert_names(&second, &["q1/2", "q2/2"]);
    assert_eq!(second[0].sequence, "CAAA");
    assert_eq!((first[1].sequence.as_str(), first[1].qualities.as_str()), ("CGTT", "DCBA"));
}

#[test]
fn test_exclude_secondary_alignments() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "input.sam");
    // 355 = 99 | secondary
    write_sam(
        &input,
        &[
            mapped_line("q1", 99, "ACGT", "IIII"),
            mapped_line("q1", 355, "ACGT", "IIII"),
            mapped_line("q1", 147, "TTTG", "ABCD"),
        ],
    );

    let unfiltered = run_paired(&input, &r1, &r2, &[]);
    assert!(!unfiltered.status.success());

    let filtered = run_paired(&input, &r1, &r2, &["-F", "0x900"]);
    assert!(filtered.status.success(), "stderr: {}", String::from_utf8_lossy(&filtered.stderr));
    assert_eq!(read_fastq(&r1).len(), 1);
    assert_eq!(read_fastq(&r2).len(), 1);
}

#[test]
fn test_stdin_to_stdout() {
    let mut sam = String::from(crate::helpers::sam_files::HEADER);
    sam.push_str(&unmapped_line("a", 4, "ACGT", "IIII"));

    let mut child = Command::new(env!("CARGO_BIN_EXE_bam2fq"))
        .args(["fastq", "-i", "-", "-o", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn bam2fq");
    child.stdin.take().unwrap().write_all(sam.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "@a\nACGT\n+\nIIII\n");
}

#[test]
fn test_missing_input_fails_without_outputs() {
    let dir = TempDir::new().unwrap();
    let (input, r1, r2) = paths(&dir, "missing.bam");

    let output = run_paired(&input, &r1, &r2, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not readable"));
    assert!(!r1.exists());
}

#[test]
fn test_relative_path_spellings_of_one_file_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_sam(
        &dir.path().join("in.sam"),
        &[unmapped_line("q1", 77, "AAAA", "IIII"), unmapped_line("q1", 141, "TTTT", "IIII")],
    );

    let run_in_dir = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_bam2fq"))
            .current_dir(dir.path())
            .arg("fastq")
            .args(args)
            .output()
            .expect("Failed to run bam2fq")
    };

    let same_output = run_in_dir(&["-i", "in.sam", "-o", "r.fq", "-s", "./r.fq"]);
    assert!(!same_output.status.success());
    assert!(String::from_utf8_lossy(&same_output.stderr).contains("mate outputs must differ"));
    assert!(!dir.path().join("r.fq").exists());

    let output_is_input = run_in_dir(&["-i", "in.sam", "-o", "x.fq", "-s", "in.sam"]);
    assert!(!output_is_input.status.success());
    assert!(String::from_utf8_lossy(&output_is_input.stderr).contains("is the input file"));
    assert!(dir.path().join("in.sam").exists());
    assert!(!dir.path().join("x.fq").exists());
}
