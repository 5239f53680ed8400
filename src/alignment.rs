/*!
In-memory sequence records and the column-comparable alignment built from them.
Readers for the on-disk formats live outside this crate; they only need to hand over `SequenceRecord`s or `(id, sequence)` pairs.
*/

use crate::consensus::{Consensus, ConsensusBuilder};
use crate::consensus_config::ConsensusConfig;
use crate::errors::PrimerSiteError;

/// A single named sequence as produced by an external reader
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceRecord {
    /// The full header line, with or without the leading '>'
    header: String,
    /// The sequence bytes
    sequence: Vec<u8>
}

impl SequenceRecord {
    /// Constructor
    pub fn new(header: String, sequence: Vec<u8>) -> SequenceRecord {
        SequenceRecord {
            header,
            sequence
        }
    }

    /// The record identifier, which is the first whitespace-delimited token of the header without any leading '>'
    pub fn id(&self) -> &str {
        self.header.trim_start_matches('>')
            .split_whitespace()
            .next()
            .unwrap_or("")
    }

    // Getters
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }
}

/// An ordered set of aligned sequences, all rows are guaranteed to have the same length
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment {
    /// Row identifiers, parallel to `rows`
    ids: Vec<String>,
    /// The aligned rows
    rows: Vec<Vec<u8>>
}

impl Alignment {
    /// Creates an alignment from `(id, sequence)` pairs.
    /// # Arguments
    /// * `rows` - the aligned rows in input order
    /// # Errors
    /// * if there are no rows
    /// * if the rows are not all the same length
    pub fn new(rows: Vec<(String, Vec<u8>)>) -> Result<Alignment, PrimerSiteError> {
        if rows.is_empty() {
            return Err(PrimerSiteError::InvalidAlignment("alignment has no rows".to_string()));
        }

        let width = rows[0].1.len();
        if let Some((id, seq)) = rows.iter().find(|(_id, seq)| seq.len() != width) {
            return Err(PrimerSiteError::InvalidAlignment(format!(
                "row \"{id}\" has length {}, expected {width}", seq.len()
            )));
        }

        let (ids, rows) = rows.into_iter().unzip();
        Ok(Alignment {
            ids,
            rows
        })
    }

    /// Creates an alignment from records, using each record's id as the row identifier.
    /// # Errors
    /// * same as `Alignment::new`
    pub fn from_records(records: Vec<SequenceRecord>) -> Result<Alignment, PrimerSiteError> {
        Self::new(
            records.into_iter()
                .map(|r| (r.id().to_string(), r.sequence))
                .collect()
        )
    }

    /// Collapses this alignment into a single consensus sequence.
    /// # Arguments
    /// * `config` - the consensus threshold and gap handling
    /// # Errors
    /// * if the config is invalid
    pub fn consensus(&self, config: ConsensusConfig) -> Result<Consensus, PrimerSiteError> {
        let mut builder = ConsensusBuilder::with_config(config)?;
        for row in self.rows.iter() {
            builder.add_sequence(row);
        }
        builder.consensus()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a constructed alignment, provided for API completeness
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Iterates over `(id, row)` pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.ids.iter().map(|id| id.as_str()).zip(self.rows.iter().map(|r| r.as_slice()))
    }

    // Getters
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}
