//! DNA sequence utilities.
//!
//! This module provides the reverse complement used to restore reads aligned to the
//! negative strand to the orientation in which they were sequenced.

/// Complements a single base, preserving case.
///
/// Returns the Watson-Crick complement: A<->T, C<->G.
///
/// # IUPAC ambiguity codes
///
/// Ambiguity codes complement to the code covering the complementary bases:
/// R<->Y, K<->M, B<->V, D<->H. S, W and N cover their own complement and are returned
/// unchanged. Any other byte (gaps, `*`, digits) passes through, so applying the
/// complement twice always yields the original base.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'r' => b'y',
        b'y' => b'r',
        b'k' => b'm',
        b'm' => b'k',
        b'b' => b'v',
        b'v' => b'b',
        b'd' => b'h',
        b'h' => b'd',
        _ => base,
    }
}

/// Lookup table form of [`complement_base`] for the hot path.
static COMPLEMENT: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = complement_base(i as u8);
        i += 1;
    }
    table
};

/// Reverse complements a DNA sequence.
///
/// # Examples
///
/// ```
/// use bam2fq_lib::dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"ACGT"), b"ACGT".to_vec());
/// assert_eq!(reverse_complement(b"AAAC"), b"GTTT".to_vec());
/// assert_eq!(reverse_complement(b"ACGTN"), b"NACGT".to_vec());
/// assert_eq!(reverse_complement(b"acgG"), b"Ccgt".to_vec());
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| COMPLEMENT[base as usize]).collect()
}

/// Reverse complements a sequence in place.
pub fn reverse_complement_in_place(seq: &mut [u8]) {
    seq.reverse();
    for base in seq.iter_mut() {
        *base = COMPLEMENT[*base as usize];
    }
}
