/*!
Error kinds shared by the consensus and primer matching components.
Structural problems (alignment shape, empty inputs, bad configuration) are raised to the caller.
A malformed primer set is only ever reported for that set; scans over many sets skip it and continue.
*/

use thiserror::Error;

/// Errors raised by the core consensus and matching operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PrimerSiteError {
    /// The alignment has no rows or its rows are not all the same length
    #[error("Invalid alignment: {0}")]
    InvalidAlignment(String),
    /// Matching was requested against a zero-length consensus
    #[error("Consensus sequence is empty, nothing to match against")]
    EmptyConsensus,
    /// A primer set is missing its forward or reverse primer
    #[error("Malformed primer set \"{name}\": {reason}")]
    MalformedPrimerSet {
        name: String,
        reason: String
    },
    /// A configuration value is outside of its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String)
}
