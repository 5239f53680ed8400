/*!
Primer sets: a named forward primer, an optional probe, and a reverse primer.
The surrounding text format is parsed elsewhere; this module only assigns roles to the already-extracted sequences.

# Example usage
```rust
use primecon::primer_set::{PrimerRole, PrimerSet};

let set = PrimerSet::from_sequences("N1", vec![b"gaccccaaaatcagcgaaat".to_vec(), b"TCTGGTTACTGCCAGTTGAATCTG".to_vec()]).unwrap();
assert_eq!(set.forward(), b"GACCCCAAAATCAGCGAAAT");
assert!(set.probe().is_none());
assert_eq!(set.roles().collect::<Vec<_>>(), vec![PrimerRole::Forward, PrimerRole::Reverse]);
```
*/

use std::fmt;

use crate::errors::PrimerSiteError;

/// The position a sequence plays within a primer set
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimerRole {
    Forward,
    Probe,
    Reverse
}

impl PrimerRole {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PrimerRole::Forward => "forward",
            PrimerRole::Probe => "probe",
            PrimerRole::Reverse => "reverse"
        }
    }
}

impl fmt::Display for PrimerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A named primer set.
/// An absent probe never blocks scoring, it only drops the probe term from the aggregate.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimerSet {
    /// Display name of the set
    name: String,
    /// Forward primer, required
    forward: Vec<u8>,
    /// Optional internal probe
    probe: Option<Vec<u8>>,
    /// Reverse primer, required
    reverse: Vec<u8>
}

impl PrimerSet {
    /// Creates a primer set with explicit roles.
    /// No validation is done here; malformed sets are detected by `validate()` and skipped by the matcher.
    /// All sequences are upper-cased.
    pub fn new(name: &str, forward: Vec<u8>, probe: Option<Vec<u8>>, reverse: Vec<u8>) -> PrimerSet {
        PrimerSet {
            name: name.to_string(),
            forward: forward.to_ascii_uppercase(),
            probe: probe.map(|p| p.to_ascii_uppercase()),
            reverse: reverse.to_ascii_uppercase()
        }
    }

    /// Assigns roles by position: two sequences are forward and reverse, three are forward, probe, and reverse.
    /// # Arguments
    /// * `name` - display name of the set
    /// * `sequences` - the primer sequences in the order they were listed
    /// # Errors
    /// * if there are fewer than two or more than three sequences
    /// * if any of the sequences is empty
    pub fn from_sequences(name: &str, mut sequences: Vec<Vec<u8>>) -> Result<PrimerSet, PrimerSiteError> {
        let malformed = |reason: String| PrimerSiteError::MalformedPrimerSet {
            name: name.to_string(),
            reason
        };

        if sequences.iter().any(|s| s.is_empty()) {
            return Err(malformed("contains an empty sequence".to_string()));
        }

        match sequences.len() {
            2 => {
                let reverse = sequences.pop().unwrap_or_default();
                let forward = sequences.pop().unwrap_or_default();
                Ok(Self::new(name, forward, None, reverse))
            },
            3 => {
                let reverse = sequences.pop().unwrap_or_default();
                let probe = sequences.pop();
                let forward = sequences.pop().unwrap_or_default();
                Ok(Self::new(name, forward, probe, reverse))
            },
            n => Err(malformed(format!("expected 2 or 3 sequences, got {n}")))
        }
    }

    /// Checks that both the forward and reverse primers are present
    /// # Errors
    /// * if the forward or reverse primer is empty
    pub fn validate(&self) -> Result<(), PrimerSiteError> {
        let missing = if self.forward.is_empty() {
            Some(PrimerRole::Forward)
        } else if self.reverse.is_empty() {
            Some(PrimerRole::Reverse)
        } else {
            None
        };

        match missing {
            Some(role) => Err(PrimerSiteError::MalformedPrimerSet {
                name: self.name.clone(),
                reason: format!("missing {role} primer")
            }),
            None => Ok(())
        }
    }

    /// Iterates over the roles present in this set in Forward, Probe, Reverse order
    pub fn roles(&self) -> impl Iterator<Item = PrimerRole> + '_ {
        [PrimerRole::Forward, PrimerRole::Probe, PrimerRole::Reverse].into_iter()
            .filter(|&role| self.sequence(role).is_some())
    }

    /// Returns the sequence for a role, None if the role is absent or empty
    pub fn sequence(&self, role: PrimerRole) -> Option<&[u8]> {
        let seq = match role {
            PrimerRole::Forward => &self.forward,
            PrimerRole::Probe => self.probe.as_ref()?,
            PrimerRole::Reverse => &self.reverse
        };
        if seq.is_empty() {
            None
        } else {
            Some(seq.as_slice())
        }
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn forward(&self) -> &[u8] {
        &self.forward
    }

    pub fn probe(&self) -> Option<&[u8]> {
        self.sequence(PrimerRole::Probe)
    }

    pub fn reverse(&self) -> &[u8] {
        &self.reverse
    }
}
