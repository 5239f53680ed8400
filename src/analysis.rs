/*!
Runs the full core pass over one alignment: optional codon trimming, consensus building, then primer matching.
Any failure is tagged with the stage it came from so callers can report where the run stopped.

# Example usage
```rust
use primecon::alignment::Alignment;
use primecon::analysis::PrimerAnalysis;
use primecon::primer_set::PrimerSet;

let mut row = b"ACGTACGT".to_vec();
row.extend_from_slice(&[b'T'; 48]);
row.extend_from_slice(b"ACGTACGT");
let alignment = Alignment::new(vec![
    ("a".to_string(), row.clone()),
    ("b".to_string(), row)
]).unwrap();
let sets = vec![PrimerSet::from_sequences("demo", vec![b"ACGT".to_vec(), b"ACGT".to_vec()]).unwrap()];

let report = PrimerAnalysis::default().run(&alignment, &sets).unwrap();
assert_eq!(report.best().set_name(), "demo");
assert_eq!(report.best().aggregate_score(), 1.0);
```
*/

use std::fmt;

use log::{error, info};
use thiserror::Error;

use crate::alignment::Alignment;
use crate::codon_trim::{trim_alignment, TrimConfig};
use crate::consensus::Consensus;
use crate::consensus_config::ConsensusConfig;
use crate::match_config::MatchConfig;
use crate::primer_match::{find_all, rank, select_best, MatchResult};
use crate::primer_set::PrimerSet;

/// The stages of an analysis run, in execution order
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisStage {
    Trim,
    Consensus,
    Matching
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalysisStage::Trim => "trim",
            AnalysisStage::Consensus => "consensus",
            AnalysisStage::Matching => "matching"
        };
        write!(f, "{label}")
    }
}

/// A failure in one stage of the analysis
#[derive(Debug, Error, PartialEq)]
#[error("{stage} stage failed: {message}")]
pub struct AnalysisError {
    /// The stage that failed
    pub stage: AnalysisStage,
    /// The underlying error message
    pub message: String
}

impl AnalysisError {
    fn new(stage: AnalysisStage, cause: impl fmt::Display) -> AnalysisError {
        let err = AnalysisError {
            stage,
            message: cause.to_string()
        };
        error!("{err}");
        err
    }
}

/// Output of a full analysis run
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisReport {
    /// The consensus that primers were matched against
    consensus: Consensus,
    /// The best set, or the "no match" sentinel
    best: MatchResult,
    /// Every well-formed set, best first
    ranked: Vec<MatchResult>
}

impl AnalysisReport {
    // Getters
    pub fn consensus(&self) -> &Consensus {
        &self.consensus
    }

    pub fn best(&self) -> &MatchResult {
        &self.best
    }

    pub fn ranked(&self) -> &[MatchResult] {
        &self.ranked
    }
}

/**
The configuration for each stage of an analysis run.
```
use primecon::analysis::{PrimerAnalysis, PrimerAnalysisBuilder};
use primecon::codon_trim::TrimConfig;
let analysis: PrimerAnalysis = PrimerAnalysisBuilder::default()
    .trim(Some(TrimConfig::default()))
    .build()
    .unwrap();
```
*/
#[derive(derive_builder::Builder, Clone, Debug, Default, PartialEq)]
#[builder(default)]
pub struct PrimerAnalysis {
    /// If set, the alignment is trimmed to its coding region first
    pub trim: Option<TrimConfig>,
    /// Consensus building parameters
    pub consensus: ConsensusConfig,
    /// Primer matching parameters
    pub matching: MatchConfig
}

impl PrimerAnalysis {
    /// Runs every configured stage on the alignment.
    /// # Arguments
    /// * `alignment` - the aligned input sequences
    /// * `primer_sets` - the candidate primer sets
    /// # Errors
    /// * if any stage fails, tagged with that stage
    pub fn run(&self, alignment: &Alignment, primer_sets: &[PrimerSet]) -> Result<AnalysisReport, AnalysisError> {
        let trimmed;
        let alignment = match self.trim.as_ref() {
            Some(trim_config) => {
                trimmed = trim_alignment(alignment, trim_config)
                    .map_err(|e| AnalysisError::new(AnalysisStage::Trim, e))?;
                &trimmed
            },
            None => alignment
        };

        let consensus = alignment.consensus(self.consensus.clone())
            .map_err(|e| AnalysisError::new(AnalysisStage::Consensus, e))?;
        info!("Consensus built: {} columns from {} sequences", consensus.len(), alignment.len());

        let results = find_all(consensus.sequence(), primer_sets, &self.matching)
            .map_err(|e| AnalysisError::new(AnalysisStage::Matching, e))?;
        let best = select_best(&results);
        if best.is_match() {
            info!("Best primer set \"{}\" scored {:.4}", best.set_name(), best.aggregate_score());
        } else {
            info!("No primer set matched the consensus");
        }

        Ok(AnalysisReport {
            consensus,
            best,
            ranked: rank(results)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::codon_trim::TrimConfigBuilder;
    use crate::consensus_config::ConsensusConfigBuilder;
    use crate::example_gen::embed_primers;

    fn alignment(rows: &[Vec<u8>]) -> Alignment {
        Alignment::new(
            rows.iter().enumerate()
                .map(|(i, r)| (format!("r{i}"), r.clone()))
                .collect()
        ).unwrap()
    }

    fn pair(name: &str, forward: &[u8], reverse: &[u8]) -> PrimerSet {
        PrimerSet::from_sequences(name, vec![forward.to_vec(), reverse.to_vec()]).unwrap()
    }

    #[test_log::test]
    fn test_full_run() {
        let row = embed_primers(120, b'T', b"ACGTCA", 5, b"GGCCAG", 80);
        let mut variant = row.clone();
        // a split column in the forward site becomes an R in the consensus
        variant[5] = b'G';
        let rows = vec![row.clone(), variant.clone(), row, variant];

        let sets = vec![
            pair("off target", b"CCCCCC", b"GGGGGG"),
            pair("on target", b"ACGTCA", b"GGCCAG")
        ];
        let report = PrimerAnalysis::default().run(&alignment(&rows), &sets).unwrap();

        assert_eq!(report.consensus().sequence()[5], b'R');
        assert_eq!(report.best().set_name(), "on target");
        assert_eq!(report.best().forward().unwrap().start(), 5);
        assert_eq!(report.best().reverse().unwrap().start(), 80);
        assert_eq!(report.ranked().len(), 2);
        assert_eq!(report.ranked()[0].set_name(), "on target");
    }

    #[test]
    fn test_trim_stage() {
        let mut row = b"CCATG".to_vec();
        row.extend_from_slice(&embed_primers(70, b'T', b"ACGT", 0, b"GGCC", 60));
        row.extend_from_slice(b"TAACC");
        let analysis = PrimerAnalysisBuilder::default()
            .trim(Some(TrimConfig::default()))
            .build().unwrap();
        let report = analysis.run(&alignment(&[row.clone(), row]), &[pair("set", b"ACGT", b"GGCC")]).unwrap();

        // trimmed to ATG..TAA, so every position shifts by two
        assert_eq!(&report.consensus().sequence()[..3], b"ATG");
        assert_eq!(report.best().forward().unwrap().start(), 3);
    }

    #[test]
    fn test_stage_errors() {
        let rows = vec![b"ACGTACGT".to_vec()];

        let analysis = PrimerAnalysisBuilder::default()
            .trim(Some(TrimConfigBuilder::default().fixed_start(Some(6)).fixed_end(Some(4)).build().unwrap()))
            .build().unwrap();
        let err = analysis.run(&alignment(&rows), &[]).unwrap_err();
        assert_eq!(err.stage, AnalysisStage::Trim);

        let analysis = PrimerAnalysisBuilder::default()
            .consensus(ConsensusConfigBuilder::default().threshold(2.0).build().unwrap())
            .build().unwrap();
        let err = analysis.run(&alignment(&rows), &[]).unwrap_err();
        assert_eq!(err.stage, AnalysisStage::Consensus);

        let err = PrimerAnalysis::default().run(&alignment(&[vec![]]), &[]).unwrap_err();
        assert_eq!(err, AnalysisError {
            stage: AnalysisStage::Matching,
            message: "Consensus sequence is empty, nothing to match against".to_string()
        });
        assert_eq!(err.to_string(), "matching stage failed: Consensus sequence is empty, nothing to match against");
    }
}
