/*!
Contains configuration information for the consensus builder.
Typical usage is to the use the builder to construct the config, e.g.
```
use primecon::consensus_config::{ConsensusConfig, ConsensusConfigBuilder};
let config: ConsensusConfig = ConsensusConfigBuilder::default()
    .threshold(0.75)
    .ignore_gaps(false)
    .build()
    .unwrap();
```
*/

/**
Contains configuration information for the consensus builder.
Typical usage is to the use the builder to construct the config, e.g.
```
use primecon::consensus_config::{ConsensusConfig, ConsensusConfigBuilder};
let config: ConsensusConfig = ConsensusConfigBuilder::default()
    .threshold(0.75)
    .build()
    .unwrap();
assert!(config.ignore_gaps);
```
*/
#[derive(derive_builder::Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct ConsensusConfig {
    /// Minimum column frequency for a base to be included in the consensus symbol, must be in [0, 1]
    pub threshold: f64,
    /// If true, gaps are removed from the denominator when computing base frequencies
    pub ignore_gaps: bool
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            // 0.6 gives a concrete base whenever a clear majority exists
            threshold: 0.6,
            // most aligners pad ragged ends with gaps, which should not dilute the real bases
            ignore_gaps: true
        }
    }
}
