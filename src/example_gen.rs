
use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

use crate::iupac::{BASES, GAP};

/// Creates a synthetic alignment we can verify consensus building against.
/// Rows are copies of a random truth sequence with independent per-base substitutions and gaps, so every row has the same length.
/// The generator is seeded, so the output is identical across runs.
/// # Arguments
/// * `seq_len` - the number of alignment columns
/// * `num_rows` - the number of rows to generate from the truth
/// * `substitution_rate` - per-base probability of replacing the truth base with one of the other three
/// * `gap_rate` - per-base probability of replacing the truth base with a gap
pub fn generate_alignment(seq_len: usize, num_rows: usize, substitution_rate: f64, gap_rate: f64) -> (Vec<u8>, Vec<Vec<u8>>) {
    assert!((0.0..=1.0).contains(&substitution_rate));
    assert!((0.0..=1.0).contains(&gap_rate));
    assert!(substitution_rate + gap_rate <= 1.0);

    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let base_distribution = Uniform::new(0, BASES.len());
    let basem1_distribution = Uniform::new(1, BASES.len());
    let error_distribution = Uniform::new(0.0, 1.0);

    let truth: Vec<u8> = (0..seq_len)
        .map(|_i| BASES[rng.sample(base_distribution)])
        .collect();

    let rows: Vec<Vec<u8>> = (0..num_rows)
        .map(|_i| {
            truth.iter()
                .map(|&c| {
                    let roll = rng.sample(error_distribution);
                    if roll < substitution_rate {
                        // shift to one of the other three bases
                        let index = BASES.iter().position(|&b| b == c).unwrap_or(0);
                        let sub_offset = rng.sample(basem1_distribution);
                        BASES[(index + sub_offset) % BASES.len()]
                    } else if roll < substitution_rate + gap_rate {
                        GAP
                    } else {
                        c
                    }
                })
                .collect()
        })
        .collect();

    (truth, rows)
}

/// Builds a consensus-like test sequence with `forward` at `forward_start` and `reverse` at `reverse_start`, filling everything else with `filler`.
/// # Panics
/// * if the primers overlap or do not fit in `seq_len`
pub fn embed_primers(seq_len: usize, filler: u8, forward: &[u8], forward_start: usize, reverse: &[u8], reverse_start: usize) -> Vec<u8> {
    assert!(forward_start + forward.len() <= reverse_start);
    assert!(reverse_start + reverse.len() <= seq_len);

    let mut sequence = vec![filler; seq_len];
    sequence[forward_start..forward_start + forward.len()].copy_from_slice(forward);
    sequence[reverse_start..reverse_start + reverse.len()].copy_from_slice(reverse);
    sequence
}
