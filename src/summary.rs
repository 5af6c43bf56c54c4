//! Category tally for threat reports.
//!
//! Counts threat-class labels across all scan results while keeping the
//! order in which each category was first seen, so report output stays
//! deterministic for a given input.

use crate::models::ScanResult;
use std::collections::HashMap;

/// Category counts in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CategoryTally {
    fn record(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    /// Categories with their counts, in the order they first appeared.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of (record, label) pairs tallied.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Scan every threat-class label of every record, top to bottom and left to
/// right within a record. Labels are not deduplicated per file; a file
/// carrying a category twice counts twice.
pub fn tally_categories(results: &[ScanResult]) -> CategoryTally {
    let mut tally = CategoryTally::default();
    for result in results {
        for label in &result.threat_class {
            tally.record(label);
        }
    }
    tally
}

/// Singular for exactly one, plural otherwise.
pub fn threat_noun(count: usize) -> &'static str {
    if count == 1 {
        "threat"
    } else {
        "threats"
    }
}

/// One summary row, identical in every output surface.
pub fn summary_line(category: &str, count: usize) -> String {
    format!("{}: {} {}", category, count, threat_noun(count))
}
