//! End-to-end tests of the library API on files.

use bam2fq_lib::bam_io::{AlignmentFormat, create_alignment_reader};
use bam2fq_lib::convert::SamToFastq;
use bam2fq_lib::errors::Bam2FqError;
use bam2fq_lib::fastq::FastqRecord;
use bam2fq_lib::strand::StrandNormalizer;
use tempfile::TempDir;

use crate::helpers::sam_files::{mapped_line, unmapped_line, write_bam, write_sam};

fn lines() -> Vec<String> {
    vec![
        mapped_line("q1", 99, "ACGT", "IIII"),
        mapped_line("q2", 83, "AACG", "ABCD"),
        mapped_line("q2", 163, "GGGG", "IIII"),
        mapped_line("q1", 147, "TTTG", "ABCD"),
    ]
}

#[test]
fn test_sam_and_bam_inputs_agree() {
    let dir = TempDir::new().unwrap();
    let sam = dir.path().join("input.sam");
    let bam = dir.path().join("input.bam");
    write_sam(&sam, &lines());
    write_bam(&bam, &lines());

    let mut outputs = Vec::new();
    for (path, format) in [(&sam, AlignmentFormat::Sam), (&bam, AlignmentFormat::Bam)] {
        let (reader, header) = create_alignment_reader(path, 1).unwrap();
        assert_eq!(reader.format(), format);

        let mut r1: Vec<FastqRecord> = Vec::new();
        let mut r2: Vec<FastqRecord> = Vec::new();
        let metrics =
            SamToFastq::new().convert_paired(reader.into_records(header), &mut r1, &mut r2).unwrap();
        assert_eq!(metrics.pairs_written, 2);
        assert_eq!(metrics.reverse_complemented, 2);
        outputs.push((r1, r2));
    }

    assert_eq!(outputs[0], outputs[1]);
    let (r1, r2) = &outputs[0];
    assert_eq!(r1[0].name, "q2/1");
    assert_eq!(r1[0].sequence, b"CGTT");
    assert_eq!(r2[1].name, "q1/2");
    assert_eq!(r2[1].sequence, b"CAAA");
}

#[test]
fn test_unpaired_count_from_file() {
    let dir = TempDir::new().unwrap();
    let sam = dir.path().join("input.sam");
    write_sam(
        &sam,
        &[
            unmapped_line("a", 77, "AAAA", "IIII"),
            unmapped_line("b", 141, "CCCC", "IIII"),
            unmapped_line("c", 77, "GGGG", "IIII"),
        ],
    );

    let (reader, header) = create_alignment_reader(&sam, 1).unwrap();
    let mut r1: Vec<FastqRecord> = Vec::new();
    let mut r2: Vec<FastqRecord> = Vec::new();
    let err = SamToFastq::new()
        .with_normalizer(StrandNormalizer::new(false))
        .convert_paired(reader.into_records(header), &mut r1, &mut r2)
        .unwrap_err();

    assert!(matches!(err, Bam2FqError::UnpairedMates { count: 3 }));
    assert!(r1.is_empty());
    assert!(r2.is_empty());
}
