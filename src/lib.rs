/*!
# primecon
This library locates degenerate primer binding sites on the IUPAC consensus of a multiple sequence alignment.

Key benefits:
* Column-wise consensus with IUPAC ambiguity codes, controlled by a single frequency threshold
* Ambiguity-aware scoring: partial credit for a base that falls inside an ambiguity code, scaled by how specific that code is
* Forward/probe/reverse placement search with amplicon spacing constraints, evaluated across primer sets in parallel with deterministic ranking

Performance notes:
* Matching is O(L x spacing window) per primer set after a single scoring pass per primer
* Primer sets are independent, so larger panels scale with the rayon thread pool

# Example usage
```rust
use primecon::consensus::ConsensusBuilder;
use primecon::match_config::MatchConfigBuilder;
use primecon::primer_match::find_best;
use primecon::primer_set::PrimerSet;

let mut row = b"ACGTACGT".to_vec();
row.extend_from_slice(&[b'T'; 48]);
row.extend_from_slice(b"ACGTACGT");
let mut variant = row.clone();
variant[0] = b'G';

// build the consensus, column 0 is split between A and G
let mut builder: ConsensusBuilder = Default::default();
for s in [&row, &row, &variant, &variant] {
    builder.add_sequence(s);
}
let consensus = builder.consensus().unwrap();
assert_eq!(consensus.sequence()[0], b'R');

// now search for the primers
let sets = vec![PrimerSet::from_sequences("demo", vec![b"ACGT".to_vec(), b"ACGT".to_vec()]).unwrap()];
let config = MatchConfigBuilder::default()
    .max_spacing(60)
    .build()
    .unwrap();
let best = find_best(consensus.sequence(), &sets, &config).unwrap();
// the exact forward site at 4 outscores the ambiguous one at 0
assert_eq!(best.forward().unwrap().start(), 4);
assert_eq!(best.reverse().unwrap().start(), 60);
assert_eq!(best.spacing(), Some(52));
```
*/

/// In-memory sequence records and validated alignments
pub mod alignment;
/// Stage orchestration: trim, consensus, then matching
pub mod analysis;
/// Codon-anchored trimming of an alignment
pub mod codon_trim;
/// Main functionality for the consensus component
pub mod consensus;
/// Configuration for ConsensusBuilder
pub mod consensus_config;
/// Date-based selection of input records
pub mod date_filter;
/// Error kinds for the core components
pub mod errors;
/// Utility for generating examples
pub mod example_gen;
/// The IUPAC scoring table and nucleotide scorer
pub mod iupac;
/// Configuration for the primer matcher
pub mod match_config;
/// Main functionality for the primer matching component
pub mod primer_match;
/// Primer sets and their roles
pub mod primer_set;
