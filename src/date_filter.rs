/*!
Selects input records by the collection date embedded in their headers, before alignment.
Dates are read from the first `|`-separated header field that looks like `YYYY`, `YYYY-MM`, or `YYYY-MM-DD` (`/` also accepted as a separator).
Accepted records are split by whether their sequence contains an `N`.
Records are not keyed by header, so several records sharing a label are all kept in input order.
*/

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::alignment::SequenceRecord;

/// A date parsed from a header; missing month or day components are 0
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderDate {
    pub year: i32,
    pub month: u32,
    pub day: u32
}

static DATE_FIELD: OnceLock<Option<Regex>> = OnceLock::new();

/// `YYYY`, optionally followed by up to two 1-2 digit components separated by `-` or `/`
fn date_pattern() -> Option<&'static Regex> {
    DATE_FIELD
        .get_or_init(|| Regex::new(r"^([0-9]{4})(?:[-/]([0-9]{1,2}))?(?:[-/]([0-9]{1,2}))?$").ok())
        .as_ref()
}

/// Parses a single header field into a date
fn parse_date_field(field: &str) -> Option<HeaderDate> {
    let captures = date_pattern()?.captures(field)?;
    let component = |index: usize| -> Option<u32> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0)
        }
    };

    Some(HeaderDate {
        year: captures.get(1)?.as_str().parse().ok()?,
        month: component(2)?,
        day: component(3)?
    })
}

/// Extracts the first date-like field from a `|`-delimited header
/// # Examples
/// ```rust
/// use primecon::date_filter::{extract_date, HeaderDate};
/// assert_eq!(extract_date(">hCoV-19/Ecuador/1|EPI_ISL_1|2021/4"), Some(HeaderDate { year: 2021, month: 4, day: 0 }));
/// assert_eq!(extract_date(">no date here"), None);
/// ```
pub fn extract_date(header: &str) -> Option<HeaderDate> {
    header.split('|')
        .map(|field| field.trim())
        .find_map(parse_date_field)
}

/// The collection period to keep
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DateFilter {
    /// Required year
    pub year: i32,
    /// Required month, or None for every month of the year
    pub month: Option<u32>
}

impl DateFilter {
    /// Constructor
    pub fn new(year: i32, month: Option<u32>) -> DateFilter {
        DateFilter {
            year,
            month
        }
    }

    /// True if the date falls in this period
    pub fn accepts(&self, date: &HeaderDate) -> bool {
        date.year == self.year && self.month.map_or(true, |m| date.month == m)
    }
}

/// Records that passed the date filter
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredRecords {
    /// Records without any N in the sequence
    pub clean: Vec<SequenceRecord>,
    /// Records with at least one N in the sequence
    pub with_n: Vec<SequenceRecord>
}

impl FilteredRecords {
    /// Total number of accepted records
    pub fn len(&self) -> usize {
        self.clean.len() + self.with_n.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps records dated within the filter period, separating those with ambiguous bases.
/// Records without a parseable date are dropped. Input order is preserved within each group.
/// # Arguments
/// * `records` - the input records
/// * `filter` - the period to keep
pub fn filter_records(records: Vec<SequenceRecord>, filter: &DateFilter) -> FilteredRecords {
    let total = records.len();
    let mut filtered = FilteredRecords::default();
    for record in records.into_iter() {
        let accepted = extract_date(record.header())
            .map_or(false, |date| filter.accepts(&date));
        if !accepted {
            continue;
        }

        if record.sequence().iter().any(|b| b.eq_ignore_ascii_case(&b'N')) {
            filtered.with_n.push(record);
        } else {
            filtered.clean.push(record);
        }
    }

    debug!(
        "Date filter {filter:?} kept {} of {total} records ({} clean, {} with N)",
        filtered.len(), filtered.clean.len(), filtered.with_n.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(header: &str, sequence: &str) -> SequenceRecord {
        SequenceRecord::new(header.to_string(), sequence.as_bytes().to_vec())
    }

    #[test]
    fn test_extract_formats() {
        assert_eq!(extract_date(">a|EPI_1|2021-04-05"), Some(HeaderDate { year: 2021, month: 4, day: 5 }));
        assert_eq!(extract_date(">a| 2021/4 |x"), Some(HeaderDate { year: 2021, month: 4, day: 0 }));
        assert_eq!(extract_date(">a|2020"), Some(HeaderDate { year: 2020, month: 0, day: 0 }));
        assert_eq!(extract_date(">a|2021-4/7"), Some(HeaderDate { year: 2021, month: 4, day: 7 }));
    }

    #[test]
    fn test_extract_rejects() {
        assert_eq!(extract_date(">a|20201"), None);
        assert_eq!(extract_date(">a|2021-"), None);
        assert_eq!(extract_date(">a|2021-001"), None);
        assert_eq!(extract_date(">a|2021-04-05-06"), None);
        assert_eq!(extract_date(">a|abcd-01"), None);
        assert_eq!(extract_date(">2021-04-05 no pipes"), None);
    }

    #[test]
    fn test_field_must_match_whole() {
        assert_eq!(extract_date(">a|2021-04-05x"), None);
        assert_eq!(extract_date(">a|x2021"), None);
        assert_eq!(extract_date(">a|2021--04"), None);
        // only ASCII digits count
        assert_eq!(extract_date(">a|\u{0662}\u{0660}\u{0662}\u{0661}"), None);
        assert_eq!(parse_date_field("1999/12/31"), Some(HeaderDate { year: 1999, month: 12, day: 31 }));
    }

    #[test]
    fn test_duplicate_labels_kept() {
        let records = vec![
            record(">a|2021-04-01", "ACGT"),
            record(">a|2021-04-01", "TTTT")
        ];
        let filtered = filter_records(records.clone(), &DateFilter::new(2021, Some(4)));
        assert_eq!(filtered.clean, records);
    }

    #[test]
    fn test_first_field_wins() {
        assert_eq!(extract_date(">a|2019|2020-01"), Some(HeaderDate { year: 2019, month: 0, day: 0 }));
    }

    #[test]
    fn test_filter_accepts() {
        let date = HeaderDate { year: 2021, month: 4, day: 0 };
        assert!(DateFilter::new(2021, None).accepts(&date));
        assert!(DateFilter::new(2021, Some(4)).accepts(&date));
        assert!(!DateFilter::new(2021, Some(5)).accepts(&date));
        assert!(!DateFilter::new(2020, None).accepts(&date));
        // a year-only date never matches a specific month
        assert!(!DateFilter::new(2020, Some(1)).accepts(&HeaderDate { year: 2020, month: 0, day: 0 }));
    }

    #[test]
    fn test_filter_records() {
        let records = vec![
            record(">a|2021-04-01", "ACGT"),
            record(">b|2021-05-02", "ACNT"),
            record(">c|2020-04-01", "ACGT"),
            record(">d|unknown", "ACGT"),
            record(">e|2021-04-20", "acgn")
        ];

        let filtered = filter_records(records.clone(), &DateFilter::new(2021, None));
        assert_eq!(filtered.clean, vec![records[0].clone()]);
        assert_eq!(filtered.with_n, vec![records[1].clone(), records[4].clone()]);
        assert_eq!(filtered.len(), 3);

        let filtered = filter_records(records.clone(), &DateFilter::new(2021, Some(4)));
        assert_eq!(filtered.clean, vec![records[0].clone()]);
        assert_eq!(filtered.with_n, vec![records[4].clone()]);

        let filtered = filter_records(records, &DateFilter::new(1999, None));
        assert!(filtered.is_empty());
    }
}
