/*!
This module provides the primer matcher, which finds the best forward/probe/reverse placement of each primer set on a consensus sequence.

For a forward start `i` and reverse start `k`, the reverse primer must begin at least `min_spacing` and less than `max_spacing` bases after the forward primer ends.
The probe, if any, is placed at the midpoint between the two; when it does not fit before `k` it scores zero but still counts toward the average.
The aggregate score of a placement is the mean identity of the roles in the set, and only a strictly better placement replaces the current best.

# Example usage
```rust
use primecon::match_config::MatchConfigBuilder;
use primecon::primer_match::find_best;
use primecon::primer_set::PrimerSet;

let mut consensus = b"ACGTACGT".to_vec();
consensus.extend_from_slice(&[b'T'; 48]);
consensus.extend_from_slice(b"ACGTACGT");

let sets = vec![PrimerSet::from_sequences("demo", vec![b"ACGT".to_vec(), b"ACGT".to_vec()]).unwrap()];
let config = MatchConfigBuilder::default()
    .min_spacing(50)
    .max_spacing(60)
    .build()
    .unwrap();

let best = find_best(&consensus, &sets, &config).unwrap();
assert_eq!(best.set_name(), "demo");
assert_eq!(best.forward().unwrap().start(), 0);
assert_eq!(best.reverse().unwrap().start(), 56);
assert_eq!(best.spacing(), Some(52));
assert_eq!(best.aggregate_score(), 1.0);
```
*/

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::errors::PrimerSiteError;
use crate::iupac::{comparison_line, score};
use crate::match_config::MatchConfig;
use crate::primer_set::{PrimerRole, PrimerSet};

/// The placement of one primer of a set on the consensus
#[derive(Clone, Debug, PartialEq)]
pub struct PrimerHit {
    /// The role this primer plays in its set
    role: PrimerRole,
    /// The primer sequence
    sequence: Vec<u8>,
    /// 0-based start on the consensus
    start: usize,
    /// Mean per-base score over the primer length
    identity: f64,
    /// Summed per-base score over the primer length
    raw_score: f64
}

impl PrimerHit {
    /// Constructor
    pub fn new(role: PrimerRole, sequence: Vec<u8>, start: usize, identity: f64, raw_score: f64) -> PrimerHit {
        PrimerHit {
            role,
            sequence,
            start,
            identity,
            raw_score
        }
    }

    /// Exclusive 0-based end of the placement
    pub fn end(&self) -> usize {
        self.start + self.sequence.len()
    }

    /// 1-based start, as shown in reports
    pub fn display_start(&self) -> usize {
        self.start + 1
    }

    /// Builds the per-base comparison symbols of this primer against the consensus it was placed on.
    /// Positions past the end of the consensus are not compared.
    pub fn comparison_line(&self, consensus: &[u8]) -> String {
        let start = self.start.min(consensus.len());
        let end = self.end().min(consensus.len());
        comparison_line(&consensus[start..end], &self.sequence)
    }

    // Getters
    pub fn role(&self) -> PrimerRole {
        self.role
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn identity(&self) -> f64 {
        self.identity
    }

    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }
}

/// The best placement found for a primer set.
/// A result with an aggregate score of 0 and no hits is the "no match" sentinel.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Name of the primer set, empty when no set matched at all
    set_name: String,
    forward: Option<PrimerHit>,
    probe: Option<PrimerHit>,
    reverse: Option<PrimerHit>,
    /// Bases between the forward end and the reverse start
    spacing: Option<usize>,
    /// Mean identity across the present roles
    aggregate_score: f64,
    /// False if a deadline cut the scan short, in which case this is only the best seen so far
    complete: bool
}

impl MatchResult {
    /// Creates the "no match" sentinel for a set
    pub fn no_match(set_name: &str) -> MatchResult {
        MatchResult {
            set_name: set_name.to_string(),
            forward: None,
            probe: None,
            reverse: None,
            spacing: None,
            aggregate_score: 0.0,
            complete: true
        }
    }

    /// True if any placement scored above zero
    pub fn is_match(&self) -> bool {
        self.aggregate_score > 0.0
    }

    /// Returns the hit for a role, if present
    pub fn hit(&self, role: PrimerRole) -> Option<&PrimerHit> {
        match role {
            PrimerRole::Forward => self.forward.as_ref(),
            PrimerRole::Probe => self.probe.as_ref(),
            PrimerRole::Reverse => self.reverse.as_ref()
        }
    }

    /// Iterates over present hits in Forward, Probe, Reverse order
    pub fn hits(&self) -> impl Iterator<Item = &PrimerHit> {
        self.forward.iter()
            .chain(self.probe.iter())
            .chain(self.reverse.iter())
    }

    // Getters
    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn forward(&self) -> Option<&PrimerHit> {
        self.forward.as_ref()
    }

    pub fn probe(&self) -> Option<&PrimerHit> {
        self.probe.as_ref()
    }

    pub fn reverse(&self) -> Option<&PrimerHit> {
        self.reverse.as_ref()
    }

    pub fn spacing(&self) -> Option<usize> {
        self.spacing
    }

    pub fn aggregate_score(&self) -> f64 {
        self.aggregate_score
    }

    pub fn complete(&self) -> bool {
        self.complete
    }
}

/// Summed scores for one role at a single position
#[derive(Clone, Copy, Debug, Default)]
struct RoleScore {
    start: usize,
    raw: f64,
    identity: f64
}

/// The best (i, k) pair seen so far for one set
#[derive(Clone, Copy, Debug)]
struct Placement {
    forward: RoleScore,
    probe: RoleScore,
    reverse: RoleScore,
    aggregate: f64
}

/// Returns the summed score of `primer` at every start where it fits entirely on `consensus`.
/// Empty if the primer is empty or longer than the consensus.
fn score_profile(consensus: &[u8], primer: &[u8]) -> Vec<f64> {
    if primer.is_empty() || primer.len() > consensus.len() {
        return vec![];
    }

    consensus.windows(primer.len())
        .map(|window| {
            window.iter().zip(primer.iter())
                .map(|(&c, &p)| score(c, p))
                .sum::<f64>()
        })
        .collect()
}

/// Finds the best placement for a single primer set.
/// # Arguments
/// * `consensus` - the consensus sequence to search
/// * `primer_set` - the primer set to place
/// * `config` - the spacing window and deadline
/// # Errors
/// * if the consensus is empty
pub fn find_best_for_set(consensus: &[u8], primer_set: &PrimerSet, config: &MatchConfig) -> Result<MatchResult, PrimerSiteError> {
    if consensus.is_empty() {
        return Err(PrimerSiteError::EmptyConsensus);
    }

    if let Err(e) = primer_set.validate() {
        warn!("{e}");
        return Ok(MatchResult::no_match(primer_set.name()));
    }

    Ok(scan_set(consensus, primer_set, config))
}

/// Evaluates every well-formed primer set and returns one result per set in input order.
/// Malformed sets are logged and left out.
/// # Arguments
/// * `consensus` - the consensus sequence to search
/// * `primer_sets` - the sets to evaluate
/// * `config` - the spacing window, parallelism, and deadline
/// # Errors
/// * if the consensus is empty
pub fn find_all(consensus: &[u8], primer_sets: &[PrimerSet], config: &MatchConfig) -> Result<Vec<MatchResult>, PrimerSiteError> {
    if consensus.is_empty() {
        return Err(PrimerSiteError::EmptyConsensus);
    }

    let valid_sets: Vec<&PrimerSet> = primer_sets.iter()
        .filter(|s| match s.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping primer set: {e}");
                false
            }
        })
        .collect();

    debug!(
        "Matching {} primer sets ({} skipped) against a consensus of length {}",
        valid_sets.len(), primer_sets.len() - valid_sets.len(), consensus.len()
    );

    // collect keeps input order regardless of which worker finishes first
    let results: Vec<MatchResult> = if config.parallel {
        valid_sets.par_iter()
            .map(|s| scan_set(consensus, s, config))
            .collect()
    } else {
        valid_sets.iter()
            .map(|s| scan_set(consensus, s, config))
            .collect()
    };
    Ok(results)
}

/// Finds the best-scoring primer set.
/// Ties on the aggregate score go to the set that appears first in `primer_sets`.
/// If nothing matched, the "no match" sentinel with an empty set name is returned.
/// The result is marked incomplete if any set scan was cut short by the deadline.
/// # Arguments
/// * `consensus` - the consensus sequence to search
/// * `primer_sets` - the sets to evaluate
/// * `config` - the spacing window, parallelism, and deadline
/// # Errors
/// * if the consensus is empty
pub fn find_best(consensus: &[u8], primer_sets: &[PrimerSet], config: &MatchConfig) -> Result<MatchResult, PrimerSiteError> {
    let results = find_all(consensus, primer_sets, config)?;
    Ok(select_best(&results))
}

/// Reduces per-set results to the single best one.
/// Only a strictly greater aggregate score replaces the current best, so the first of several tied sets wins.
/// The returned result is incomplete if any of the inputs is.
pub fn select_best(results: &[MatchResult]) -> MatchResult {
    let mut best = MatchResult::no_match("");
    for result in results.iter() {
        if result.aggregate_score > best.aggregate_score {
            best = result.clone();
        }
    }
    best.complete = results.iter().all(|r| r.complete);

    debug!("Best primer set: \"{}\" with score {:.4}", best.set_name, best.aggregate_score);
    best
}

/// Sorts results by descending aggregate score, keeping input order on ties
pub fn rank(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    results.sort_by(|a, b| b.aggregate_score.total_cmp(&a.aggregate_score));
    results
}

/// The nested forward/reverse scan for one validated set, stopping early once the deadline passes
fn scan_set(consensus: &[u8], primer_set: &PrimerSet, config: &MatchConfig) -> MatchResult {
    scan_set_until(consensus, primer_set, config, |_i| config.deadline_passed())
}

/// The nested forward/reverse scan for one validated set.
/// `should_stop` is asked before each forward position; once it returns true the best placement so far is kept and the result is marked incomplete.
fn scan_set_until(consensus: &[u8], primer_set: &PrimerSet, config: &MatchConfig, mut should_stop: impl FnMut(usize) -> bool) -> MatchResult {
    let forward = primer_set.forward();
    let reverse = primer_set.reverse();
    let probe = primer_set.sequence(PrimerRole::Probe);

    let forward_len = forward.len();
    let reverse_len = reverse.len();
    let num_roles = if probe.is_some() { 3.0 } else { 2.0 };

    let forward_profile = score_profile(consensus, forward);
    let reverse_profile = score_profile(consensus, reverse);
    let probe_profile = probe.map(|p| score_profile(consensus, p)).unwrap_or_default();

    let mut best: Option<Placement> = None;
    let mut best_score = 0.0;
    let mut complete = true;

    for (i, &forward_raw) in forward_profile.iter().enumerate() {
        if should_stop(i) {
            warn!("Scan of \"{}\" stopped early at forward position {i}", primer_set.name());
            complete = false;
            break;
        }

        let forward_identity = forward_raw / forward_len as f64;
        let forward_end = i + forward_len;

        // the last reverse start is the last position where the reverse primer still fits
        let window_start = forward_end.saturating_add(config.min_spacing);
        let window_end = reverse_profile.len().min(forward_end.saturating_add(config.max_spacing));

        for k in window_start..window_end {
            let reverse_raw = reverse_profile[k];
            let reverse_identity = reverse_raw / reverse_len as f64;

            let probe_start = forward_end + (k - forward_end) / 2;
            let (probe_raw, probe_identity) = match probe {
                Some(p) if probe_start + p.len() <= k => {
                    let raw = probe_profile[probe_start];
                    (raw, raw / p.len() as f64)
                },
                _ => (0.0, 0.0)
            };

            let mut total = forward_identity + reverse_identity;
            if probe.is_some() {
                total += probe_identity;
            }
            let aggregate = total / num_roles;

            if aggregate > best_score {
                best_score = aggregate;
                best = Some(Placement {
                    forward: RoleScore { start: i, raw: forward_raw, identity: forward_identity },
                    probe: RoleScore { start: probe_start, raw: probe_raw, identity: probe_identity },
                    reverse: RoleScore { start: k, raw: reverse_raw, identity: reverse_identity },
                    aggregate
                });
            }
        }
    }

    let mut result = match best {
        Some(placement) => {
            let hit = |role: PrimerRole, sequence: &[u8], role_score: RoleScore| {
                PrimerHit::new(role, sequence.to_vec(), role_score.start, role_score.identity, role_score.raw)
            };
            MatchResult {
                set_name: primer_set.name().to_string(),
                forward: Some(hit(PrimerRole::Forward, forward, placement.forward)),
                probe: probe.map(|p| hit(PrimerRole::Probe, p, placement.probe)),
                reverse: Some(hit(PrimerRole::Reverse, reverse, placement.reverse)),
                spacing: Some(placement.reverse.start - placement.forward.start - forward_len),
                aggregate_score: placement.aggregate,
                complete: true
            }
        },
        None => MatchResult::no_match(primer_set.name())
    };
    result.complete = complete;

    trace!("Primer set \"{}\": score {:.4}, complete {complete}", primer_set.name(), result.aggregate_score);
    result
}
