use std::cmp::Ordering;

use crate::directory::Directory;
use crate::domain::{FilterQuery, ItemRecord, SortOrder};

/// Pure projection from (directory, query) to the visible subset. Never
/// mutates the directory; every call returns a fresh sequence.
pub fn apply(directory: &Directory, query: &FilterQuery) -> Vec<ItemRecord> {
    match query {
        FilterQuery::None => directory.records().to_vec(),
        FilterQuery::ByType(category) => {
            // An empty category means "no constraint", matching the
            // original UI's "all types" option.
            if category.is_empty() {
                return directory.records().to_vec();
            }
            directory
                .records()
                .iter()
                .filter(|record| record.types.iter().any(|t| t == category))
                .cloned()
                .collect()
        }
        FilterQuery::ByNameSubstring(text) => {
            if text.is_empty() {
                return directory.records().to_vec();
            }
            let needle = text.to_lowercase();
            directory
                .records()
                .iter()
                .filter(|record| record.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        FilterQuery::SortedByName(order) => {
            let mut records = directory.records().to_vec();
            records.sort_by(|a, b| {
                let ordering = compare_names(&a.name, &b.name);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
            records
        }
    }
}

// Case-folded comparison with a raw tiebreak, standing in for the
// original's locale-aware localeCompare.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
