/*!
This module provides access to the ConsensusBuilder, which collapses the columns of an alignment into a single IUPAC consensus sequence.

# Example usage
```rust
use primecon::consensus::ConsensusBuilder;

let sequences = [
    b"AC".to_vec(),
    b"GC".to_vec(),
    b"AC".to_vec(),
    b"GC".to_vec()
];

// add all the sequences
let mut builder: ConsensusBuilder = Default::default();
for s in sequences.iter() {
    builder.add_sequence(s);
}

// A and G are split evenly in the first column, so it becomes R
let consensus = builder.consensus().unwrap();
assert_eq!(consensus.sequence(), b"RC");
```
*/

use itertools::Itertools;
use log::{debug, trace};

use crate::consensus_config::ConsensusConfig;
use crate::errors::PrimerSiteError;
use crate::iupac::{code_for_mask, BASES, GAP};

/// Maximum number of bases folded into a symbol when no base reaches the threshold
const MAX_FALLBACK_BASES: usize = 3;

/// Contains a final consensus result
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Consensus {
    /// The generated consensus, one symbol per alignment column
    sequence: Vec<u8>,
    /// The threshold used to build it
    threshold: f64,
    /// Whether gaps were excluded from the column frequencies
    ignore_gaps: bool
}

impl Consensus {
    /// Constructor
    pub fn new(sequence: Vec<u8>, threshold: f64, ignore_gaps: bool) -> Consensus {
        Consensus {
            sequence,
            threshold,
            ignore_gaps
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    // Getters
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn ignore_gaps(&self) -> bool {
        self.ignore_gaps
    }
}

/// Per-column symbol counts
#[derive(Debug, Default)]
struct ColumnCounts {
    /// Counts for A, C, G, T in `BASES` order
    bases: [usize; 4],
    gaps: usize,
    unknown: usize
}

impl ColumnCounts {
    fn add(&mut self, symbol: u8) {
        match symbol.to_ascii_uppercase() {
            b'A' => self.bases[0] += 1,
            b'C' => self.bases[1] += 1,
            b'G' => self.bases[2] += 1,
            b'T' => self.bases[3] += 1,
            GAP => self.gaps += 1,
            _ => self.unknown += 1
        };
    }
}

/// Core utility that will generate a consensus sequence from aligned rows.
/// All rows must be the same length; this is checked when `consensus()` is called.
#[derive(Debug, Default)]
pub struct ConsensusBuilder<'a> {
    /// Contains all the sequences that have been added to this consensus so far.
    sequences: Vec<&'a [u8]>,
    /// The config for this consensus run
    config: ConsensusConfig
}

impl<'a> ConsensusBuilder<'a> {
    /// Creates a new instance of ConsensusBuilder and performs sanity checks.
    /// # Arguments
    /// * `config` - the threshold and gap handling to use
    /// # Errors
    /// * if the threshold is outside of [0, 1]
    pub fn with_config(config: ConsensusConfig) -> Result<ConsensusBuilder<'a>, PrimerSiteError> {
        if !(0.0..=1.0).contains(&config.threshold) {
            return Err(PrimerSiteError::InvalidConfiguration(format!(
                "consensus threshold must be in [0, 1], got {}", config.threshold
            )));
        }

        Ok(ConsensusBuilder {
            sequences: vec![],
            config
        })
    }

    /// Adds a new aligned row to the list
    /// # Arguments
    /// * `sequence` - the new row to add
    pub fn add_sequence(&mut self, sequence: &'a [u8]) {
        self.sequences.push(sequence);
    }

    /// The core function that gets called after adding all the rows we care about
    /// # Errors
    /// * if no rows were added
    /// * if the rows are not all the same length
    pub fn consensus(&self) -> Result<Consensus, PrimerSiteError> {
        if self.sequences.is_empty() {
            return Err(PrimerSiteError::InvalidAlignment("alignment has no rows".to_string()));
        }

        let width = self.sequences[0].len();
        if let Some((index, seq)) = self.sequences.iter().enumerate().find(|(_i, s)| s.len() != width) {
            return Err(PrimerSiteError::InvalidAlignment(format!(
                "row {index} has length {}, expected {width}", seq.len()
            )));
        }

        let mut ambiguous_columns: usize = 0;
        let sequence: Vec<u8> = (0..width)
            .map(|column| {
                let mut counts = ColumnCounts::default();
                for seq in self.sequences.iter() {
                    counts.add(seq[column]);
                }

                let symbol = self.column_symbol(&counts);
                trace!("column {column}: {counts:?} => {}", symbol as char);
                if !BASES.contains(&symbol) && symbol != GAP {
                    ambiguous_columns += 1;
                }
                symbol
            })
            .collect();

        debug!(
            "Built consensus over {} rows x {width} columns, {ambiguous_columns} ambiguous columns",
            self.sequences.len()
        );

        Ok(Consensus::new(sequence, self.config.threshold, self.config.ignore_gaps))
    }

    /// Picks the output symbol for one column of counts
    fn column_symbol(&self, counts: &ColumnCounts) -> u8 {
        let mut total_valid = self.sequences.len() - counts.unknown;
        if self.config.ignore_gaps {
            total_valid -= counts.gaps;
        }

        if total_valid == 0 {
            return GAP;
        }

        let frequencies: Vec<f64> = counts.bases.iter()
            .map(|&c| c as f64 / total_valid as f64)
            .collect();

        // bases at or above the threshold, already in alphabetical order
        let candidate_mask: u8 = frequencies.iter().enumerate()
            .filter(|(_i, f)| **f >= self.config.threshold)
            .fold(0, |acc, (i, _f)| acc | (1 << i));

        if candidate_mask != 0 {
            // a single base maps back to itself, several map to their IUPAC code
            return code_for_mask(candidate_mask);
        }

        // nothing passed, fold in the most frequent bases; the stable sort keeps A,C,G,T order on ties
        let fallback_mask: u8 = (0..BASES.len())
            .filter(|&i| frequencies[i] > 0.0)
            .sorted_by(|&i, &j| frequencies[j].total_cmp(&frequencies[i]))
            .take(MAX_FALLBACK_BASES)
            .fold(0, |acc, i| acc | (1 << i));

        code_for_mask(fallback_mask)
    }

    // getters
    pub fn sequences(&self) -> &[&'a [u8]] {
        &self.sequences
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }
}
