/*!
Contains configuration information for the primer matcher.
Typical usage is to the use the builder to construct the config, e.g.
```
use primecon::match_config::{MatchConfig, MatchConfigBuilder};
let config: MatchConfig = MatchConfigBuilder::default()
    .min_spacing(80)
    .max_spacing(200)
    .build()
    .unwrap();
```
*/

use std::time::Instant;

/// Contains the spacing bounds and execution options for a primer search.
#[derive(derive_builder::Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct MatchConfig {
    /// Minimum number of bases between the end of the forward primer and the start of the reverse primer
    pub min_spacing: usize,
    /// Exclusive upper bound on the bases between the end of the forward primer and the start of the reverse primer
    pub max_spacing: usize,
    /// If true, primer sets are evaluated on the rayon thread pool
    pub parallel: bool,
    /// Optional point in time after which scans stop early and report an incomplete result
    pub deadline: Option<Instant>
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            // typical qPCR amplicons land in this window
            min_spacing: 50,
            max_spacing: 300,
            parallel: true,
            deadline: None
        }
    }
}

impl MatchConfig {
    /// Returns true if a deadline is set and has passed
    pub fn deadline_passed(&self) -> bool {
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}
