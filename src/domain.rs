use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub name: String,
    pub detail_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub base_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub sprite_uri: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatValue>,
    pub species_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[value(name = "asc")]
    Ascending,
    #[value(name = "desc")]
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "asc"),
            SortOrder::Descending => write!(f, "desc"),
        }
    }
}

/// Exactly one filter is active at a time; switching variants drops the
/// value that belonged to the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterQuery {
    #[default]
    None,
    ByType(String),
    ByNameSubstring(String),
    SortedByName(SortOrder),
}

/// Evolution chain tree as received from the catalog; the root has no
/// predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionChainNode {
    pub species_name: String,
    pub children: Vec<EvolutionChainNode>,
}

pub type EvolutionSequence = Vec<String>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionState {
    pub selected: Option<ItemRecord>,
    pub evolution: Option<EvolutionSequence>,
    pub is_resolving: bool,
}
