/*!
Trims an alignment to a shared coding region before consensus building.
Each row nominates a start (first start codon) and an end (last stop codon) that are not interrupted by gaps; the most common nomination across rows wins.
Fixed positions in the config override detection.

# Example usage
```rust
use primecon::alignment::Alignment;
use primecon::codon_trim::{trim_alignment, TrimConfig};

let alignment = Alignment::new(vec![
    ("a".to_string(), b"CCATGAAATTTTAGCC".to_vec()),
    ("b".to_string(), b"CCATGAAATTTTAGCC".to_vec())
]).unwrap();
let trimmed = trim_alignment(&alignment, &TrimConfig::default()).unwrap();
assert_eq!(trimmed.rows()[0], b"ATGAAATTTTAG".to_vec());
```
*/

use log::{debug, warn};
use rustc_hash::FxHashMap as HashMap;
use simple_error::bail;

use crate::alignment::Alignment;
use crate::iupac::GAP;

/// Contains the codons and optional fixed positions used for trimming.
#[derive(derive_builder::Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct TrimConfig {
    /// Codon marking the start of the region
    pub start_codon: Vec<u8>,
    /// Codons marking the end of the region
    pub stop_codons: Vec<Vec<u8>>,
    /// If set, skip start detection and cut from this 0-based column
    pub fixed_start: Option<usize>,
    /// If set, skip end detection; the region ends two columns before this value
    pub fixed_end: Option<usize>
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            // standard genetic code
            start_codon: b"ATG".to_vec(),
            stop_codons: vec![b"TAA".to_vec(), b"TAG".to_vec(), b"TGA".to_vec()],
            fixed_start: None,
            fixed_end: None
        }
    }
}

/// True if a full codon starts at `position` and none of its bases is a gap
fn is_valid_codon(sequence: &[u8], position: usize) -> bool {
    position + 2 < sequence.len() && sequence[position..position + 3].iter().all(|&b| b != GAP)
}

/// Finds the first ungapped occurrence of the start codon
fn find_start_codon(sequence: &[u8], start_codon: &[u8]) -> Option<usize> {
    (0..sequence.len().saturating_sub(2))
        .find(|&i| is_valid_codon(sequence, i) && sequence[i..i + 3].eq_ignore_ascii_case(start_codon))
}

/// Finds the last ungapped stop codon, never considering position 0
fn find_stop_codon(sequence: &[u8], stop_codons: &[Vec<u8>]) -> Option<usize> {
    (1..sequence.len().saturating_sub(2))
        .rev()
        .find(|&i| {
            is_valid_codon(sequence, i)
                && stop_codons.iter().any(|stop| sequence[i..i + 3].eq_ignore_ascii_case(stop))
        })
}

/// Returns the most common value, where ties go to the value seen first
fn first_mode(values: &[usize]) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::default();
    for &v in values.iter() {
        *counts.entry(v).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max()?;
    values.iter().copied().find(|v| counts[v] == max_count)
}

/// Cuts every row of the alignment to the shared coding region.
/// Rows shorter than a codon do not nominate positions but are still cut.
/// # Arguments
/// * `alignment` - the alignment to trim
/// * `config` - codons and optional fixed positions
/// # Errors
/// * if the fixed end is less than 2
/// * if the chosen start is not before the chosen end, or lies past the last column
pub fn trim_alignment(alignment: &Alignment, config: &TrimConfig) -> Result<Alignment, Box<dyn std::error::Error>> {
    let mut starts: Vec<usize> = vec![];
    let mut ends: Vec<usize> = vec![];

    for (id, row) in alignment.iter() {
        if row.len() < 3 {
            warn!("Sequence {id} is too short to contain a codon");
            continue;
        }

        if config.fixed_start.is_none() {
            starts.push(find_start_codon(row, &config.start_codon).unwrap_or(0));
        }
        if config.fixed_end.is_none() {
            ends.push(find_stop_codon(row, &config.stop_codons).map(|i| i + 2).unwrap_or(row.len() - 1));
        }
    }

    let last_column = alignment.width().saturating_sub(1);
    let start = match config.fixed_start {
        Some(s) => s,
        None => first_mode(&starts).unwrap_or(0)
    };
    let end = match config.fixed_end {
        Some(e) => match e.checked_sub(2) {
            Some(e) => e,
            None => bail!("Fixed end position must be at least 2, got {}", e)
        },
        None => first_mode(&ends).unwrap_or(last_column)
    };

    if start >= end {
        bail!("Invalid trim positions: start {} is not before end {}", start, end);
    }

    let end = end.min(last_column);
    if start > end {
        bail!("Trim start {} is past the last alignment column {}", start, last_column);
    }

    debug!("Trimming {} rows to columns {start}..={end}", alignment.len());
    let rows: Vec<(String, Vec<u8>)> = alignment.iter()
        .map(|(id, row)| (id.to_string(), row[start..=end].to_vec()))
        .collect();
    Ok(Alignment::new(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment(rows: &[&str]) -> Alignment {
        Alignment::new(
            rows.iter().enumerate()
                .map(|(i, r)| (format!("r{i}"), r.as_bytes().to_vec()))
                .collect()
        ).unwrap()
    }

    #[test]
    fn test_detected_region() {
        let trimmed = trim_alignment(&alignment(&["CCATGAAATTTTAGCC"; 3]), &TrimConfig::default()).unwrap();
        assert_eq!(trimmed.rows(), &vec![b"ATGAAATTTTAG".to_vec(); 3]);
        assert_eq!(trimmed.ids(), &["r0".to_string(), "r1".to_string(), "r2".to_string()]);
    }

    #[test]
    fn test_case_preserved() {
        let trimmed = trim_alignment(&alignment(&["ccatgaaataaggg"]), &TrimConfig::default()).unwrap();
        assert_eq!(trimmed.rows()[0], b"atgaaataa".to_vec());
    }

    #[test]
    fn test_gapped_codons_ignored() {
        // the first ATG is interrupted by a gap in the second row, so it nominates the later one
        let trimmed = trim_alignment(
            &alignment(&["ATGCCATGCCCTAA", "AT-CCATGCCCTAA", "ATGCCATGCCCTAA"]),
            &TrimConfig::default()
        ).unwrap();
        assert_eq!(trimmed.rows()[1], b"AT-CCATGCCCTAA".to_vec());

        assert!(!is_valid_codon(b"AT-", 0));
        assert!(!is_valid_codon(b"ATG", 1));
        assert_eq!(find_start_codon(b"AT-CCATGCC", b"ATG"), Some(5));
    }

    #[test]
    fn test_no_codons() {
        let trimmed = trim_alignment(&alignment(&["CCCCCC", "CCCCCC"]), &TrimConfig::default()).unwrap();
        assert_eq!(trimmed.rows()[0], b"CCCCCC".to_vec());
    }

    #[test]
    fn test_stop_never_at_zero() {
        assert_eq!(find_stop_codon(b"TAACCC", &TrimConfig::default().stop_codons), None);
        assert_eq!(find_stop_codon(b"CTAACC", &TrimConfig::default().stop_codons), Some(1));
    }

    #[test]
    fn test_fixed_positions() {
        let config = TrimConfigBuilder::default()
            .fixed_start(Some(1))
            .fixed_end(Some(6))
            .build().unwrap();
        let trimmed = trim_alignment(&alignment(&["ACGTACGT", "TTTTAAAA"]), &config).unwrap();
        assert_eq!(trimmed.rows(), &[b"CGTA".to_vec(), b"TTTA".to_vec()]);
    }

    #[test]
    fn test_invalid_positions() {
        let config = TrimConfigBuilder::default()
            .fixed_start(Some(5))
            .fixed_end(Some(6))
            .build().unwrap();
        let result = trim_alignment(&alignment(&["ACGTACGT"]), &config);
        assert_eq!(result.err().unwrap().to_string(), "Invalid trim positions: start 5 is not before end 4");

        let config = TrimConfigBuilder::default()
            .fixed_end(Some(1))
            .build().unwrap();
        assert!(trim_alignment(&alignment(&["ACGTACGT"]), &config).is_err());
    }

    #[test]
    fn test_first_mode() {
        assert_eq!(first_mode(&[3, 5, 5, 3]), Some(3));
        assert_eq!(first_mode(&[1, 2, 2]), Some(2));
        assert_eq!(first_mode(&[]), None);
    }
}
