/*!
The IUPAC scoring table and the ambiguity-aware nucleotide scorer.
Every IUPAC symbol maps to a 4-bit set of concrete bases (A=1, C=2, G=4, T=8) and a specificity weight that drops as the symbol becomes less specific.

# Example usage
```rust
use primecon::iupac::score;

assert_eq!(score(b'A', b'A'), 1.0);
assert_eq!(score(b'A', b'R'), 0.8); // R = A or G
assert_eq!(score(b'R', b'A'), 0.8);
assert_eq!(score(b'A', b'C'), 0.0);
assert_eq!(score(b'-', b'N'), 0.0);
```
*/

/// The gap marker used in alignments and consensus sequences
pub const GAP: u8 = b'-';

/// The fully ambiguous symbol, also used when a base set has no code
pub const ANY_BASE: u8 = b'N';

/// The concrete bases in fixed enumeration order, this order is used for all tie-breaking
pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// All 15 symbols in the scoring table
pub const IUPAC_SYMBOLS: [u8; 15] = [
    b'A', b'C', b'G', b'T',
    b'R', b'Y', b'S', b'W', b'K', b'M',
    b'B', b'D', b'H', b'V',
    b'N'
];

/// Returns the set of concrete bases a symbol represents as a bit mask (A=1, C=2, G=4, T=8).
/// Returns None for anything outside the table, including the gap marker.
/// # Arguments
/// * `symbol` - the symbol to look up, case-insensitive
pub fn base_mask(symbol: u8) -> Option<u8> {
    let mask = match symbol.to_ascii_uppercase() {
        b'A' => 0b0001,
        b'C' => 0b0010,
        b'G' => 0b0100,
        b'T' => 0b1000,
        b'M' => 0b0011,
        b'R' => 0b0101,
        b'W' => 0b1001,
        b'S' => 0b0110,
        b'Y' => 0b1010,
        b'K' => 0b1100,
        b'V' => 0b0111,
        b'H' => 0b1011,
        b'D' => 0b1101,
        b'B' => 0b1110,
        b'N' => 0b1111,
        _ => return None
    };
    Some(mask)
}

/// Returns the specificity weight of a symbol: 1.0 for a concrete base, 0.8 for two-fold, 0.6 for three-fold, and 0.4 for N.
/// # Arguments
/// * `symbol` - the symbol to look up, case-insensitive
pub fn specificity(symbol: u8) -> Option<f64> {
    base_mask(symbol).map(mask_specificity)
}

fn mask_specificity(mask: u8) -> f64 {
    match mask.count_ones() {
        1 => 1.0,
        2 => 0.8,
        3 => 0.6,
        _ => 0.4
    }
}

/// Returns the IUPAC symbol for a base mask, falling back to N for an empty or out-of-range mask.
/// # Arguments
/// * `mask` - the base set, A=1, C=2, G=4, T=8
pub fn code_for_mask(mask: u8) -> u8 {
    match mask {
        0b0001 => b'A',
        0b0010 => b'C',
        0b0100 => b'G',
        0b1000 => b'T',
        0b0011 => b'M',
        0b0101 => b'R',
        0b1001 => b'W',
        0b0110 => b'S',
        0b1010 => b'Y',
        0b1100 => b'K',
        0b0111 => b'V',
        0b1011 => b'H',
        0b1101 => b'D',
        0b1110 => b'B',
        _ => ANY_BASE
    }
}

/// Scores the similarity of two nucleotide symbols in [0, 1].
/// Identical symbols score 1.0.
/// Two table symbols with overlapping base sets score the weight of the less specific one, so a concrete base against a code containing it gets that code's weight.
/// Anything else, including a gap against any other symbol, scores 0.0.
/// # Arguments
/// * `a` - the first symbol
/// * `b` - the second symbol
pub fn score(a: u8, b: u8) -> f64 {
    let a = a.to_ascii_uppercase();
    let b = b.to_ascii_uppercase();
    if a == b {
        return 1.0;
    }

    match (base_mask(a), base_mask(b)) {
        (Some(mask_a), Some(mask_b)) if mask_a & mask_b != 0 => {
            mask_specificity(mask_a).min(mask_specificity(mask_b))
        },
        _ => 0.0
    }
}

/// Returns a single character describing how well a primer base matches the consensus base.
/// `|` is an exact match, `:` a two-fold or better match, `.` a three-fold match, `~` an N match, and a space is no match.
/// # Arguments
/// * `consensus` - the consensus symbol
/// * `primer` - the primer symbol
pub fn comparison_symbol(consensus: u8, primer: u8) -> char {
    if consensus.eq_ignore_ascii_case(&primer) {
        return '|';
    }

    let s = score(consensus, primer);
    if s >= 0.8 {
        ':'
    } else if s >= 0.6 {
        '.'
    } else if s > 0.0 {
        '~'
    } else {
        ' '
    }
}

/// Builds the comparison line between a consensus segment and a primer, one character per aligned pair.
/// If the inputs differ in length, only the shared prefix is compared.
pub fn comparison_line(consensus_segment: &[u8], primer: &[u8]) -> String {
    consensus_segment.iter().zip(primer.iter())
        .map(|(&c, &p)| comparison_symbol(c, p))
        .collect()
}
