use std::collections::HashMap;
use std::thread;

use crate::domain::ItemRecord;
use crate::error::DexError;
use crate::gateway::CatalogClient;

/// Fully materialized, immutable set of records. The name index is derived
/// from the record sequence at construction and stays consistent with it.
#[derive(Debug, Clone)]
pub struct Directory {
    records: Vec<ItemRecord>,
    by_name: HashMap<String, usize>,
    built_at: String,
}

impl Directory {
    pub fn from_records(records: Vec<ItemRecord>) -> Result<Self, DexError> {
        let mut by_name = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_name.insert(record.name.clone(), index).is_some() {
                return Err(DexError::MalformedResponse(format!(
                    "duplicate record name in summary page: {}",
                    record.name
                )));
            }
        }
        Ok(Self {
            records,
            by_name,
            built_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&ItemRecord> {
        self.by_name.get(name).map(|&index| &self.records[index])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn built_at(&self) -> &str {
        &self.built_at
    }
}

/// Fetches the summary page, then every detail record concurrently, and
/// joins the results back in summary order. All-or-nothing: a single failed
/// detail fetch fails the whole build and no partial directory escapes.
pub fn build_directory<C: CatalogClient>(client: &C, limit: u32) -> Result<Directory, DexError> {
    let summaries = client.fetch_summary_page(limit)?;
    tracing::info!(count = summaries.len(), "building directory");

    let outcomes: Vec<Result<ItemRecord, DexError>> = thread::scope(|scope| {
        let handles: Vec<_> = summaries
            .iter()
            .map(|summary| scope.spawn(move || client.fetch_detail(&summary.detail_ref)))
            .collect();
        // Joining in spawn order keeps the result sequence aligned with the
        // summary page regardless of completion order.
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(DexError::Network("detail fetch panicked".to_string())))
            })
            .collect()
    });

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        records.push(outcome?);
    }

    let directory = Directory::from_records(records)?;
    tracing::info!(len = directory.len(), "directory built");
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::domain::ItemRecord;

    fn record(name: &str) -> ItemRecord {
        ItemRecord {
            name: name.to_string(),
            sprite_uri: String::new(),
            types: vec!["normal".to_string()],
            abilities: Vec::new(),
            stats: Vec::new(),
            species_ref: format!("https://api.example/species/{name}/"),
        }
    }

    #[test]
    fn index_matches_sequence() {
        let directory =
            Directory::from_records(vec![record("alpha"), record("beta")]).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get("beta").unwrap().name, "beta");
        assert!(directory.get("gamma").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Directory::from_records(vec![record("alpha"), record("alpha")]).unwrap_err();
        assert_matches!(err, DexError::MalformedResponse(_));
    }
}
