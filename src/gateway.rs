use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::domain::{CategoryDescriptor, EvolutionChainNode, ItemRecord, ItemSummary, StatValue};
use crate::error::DexError;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Depth bound shared by the chain parser and the evolution walk; a chain
/// nested deeper than this is treated as malformed rather than followed.
pub const MAX_CHAIN_DEPTH: usize = 16;

pub trait CatalogClient: Send + Sync {
    fn fetch_category_list(&self) -> Result<Vec<CategoryDescriptor>, DexError>;
    fn fetch_summary_page(&self, limit: u32) -> Result<Vec<ItemSummary>, DexError>;
    fn fetch_detail(&self, detail_ref: &str) -> Result<ItemRecord, DexError>;
    fn fetch_chain_root(&self, species_ref: &str) -> Result<EvolutionChainNode, DexError>;
}

#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    base_url: String,
}

impl CatalogHttpClient {
    pub fn new() -> Result<Self, DexError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, DexError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("pokedex-directory/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DexError::Network(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DexError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // No retries here: transient failures are reported to the caller, not
    // hidden behind a backoff loop.
    fn get_json(&self, url: &str) -> Result<Value, DexError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| DexError::Network(err.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DexError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "catalog request failed".to_string());
            return Err(DexError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .map_err(|err| DexError::MalformedResponse(err.to_string()))
    }

    fn category_list_url(&self) -> String {
        format!("{}/type", self.base_url)
    }

    fn summary_page_url(&self, limit: u32) -> String {
        format!("{}/pokemon?limit={limit}", self.base_url)
    }
}

impl CatalogClient for CatalogHttpClient {
    fn fetch_category_list(&self) -> Result<Vec<CategoryDescriptor>, DexError> {
        let raw = self.get_json(&self.category_list_url())?;
        parse_category_list(&raw)
    }

    fn fetch_summary_page(&self, limit: u32) -> Result<Vec<ItemSummary>, DexError> {
        let raw = self.get_json(&self.summary_page_url(limit))?;
        let summaries = parse_summary_page(&raw)?;
        tracing::debug!(count = summaries.len(), limit, "fetched summary page");
        Ok(summaries)
    }

    fn fetch_detail(&self, detail_ref: &str) -> Result<ItemRecord, DexError> {
        let raw = self.get_json(detail_ref)?;
        parse_detail(&raw)
    }

    fn fetch_chain_root(&self, species_ref: &str) -> Result<EvolutionChainNode, DexError> {
        // Two strictly sequential lookups; the chain URL only exists inside
        // the species body. Nothing is cached between them.
        let species = self.get_json(species_ref)?;
        let chain_ref = parse_species_chain_ref(&species)?;
        let raw = self.get_json(&chain_ref)?;
        parse_chain_root(&raw)
    }
}

fn results_array<'a>(raw: &'a Value, context: &str) -> Result<&'a Vec<Value>, DexError> {
    raw.get("results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DexError::MalformedResponse(format!("{context}: missing results array")))
}

pub fn parse_category_list(raw: &Value) -> Result<Vec<CategoryDescriptor>, DexError> {
    let mut categories = Vec::new();
    for entry in results_array(raw, "category list")? {
        let name = entry
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                DexError::MalformedResponse("category list: entry missing name".to_string())
            })?;
        categories.push(CategoryDescriptor {
            name: name.to_string(),
        });
    }
    Ok(categories)
}

pub fn parse_summary_page(raw: &Value) -> Result<Vec<ItemSummary>, DexError> {
    let mut summaries = Vec::new();
    for entry in results_array(raw, "summary page")? {
        let name = entry.get("name").and_then(|v| v.as_str()).ok_or_else(|| {
            DexError::MalformedResponse("summary page: entry missing name".to_string())
        })?;
        let url = entry.get("url").and_then(|v| v.as_str()).ok_or_else(|| {
            DexError::MalformedResponse(format!("summary page: entry {name} missing url"))
        })?;
        summaries.push(ItemSummary {
            name: name.to_string(),
            detail_ref: url.to_string(),
        });
    }
    Ok(summaries)
}

pub fn parse_detail(raw: &Value) -> Result<ItemRecord, DexError> {
    let name = raw
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DexError::MalformedResponse("detail: missing name".to_string()))?
        .to_string();

    let types = raw
        .get("types")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DexError::MalformedResponse(format!("detail {name}: missing types")))?
        .iter()
        .filter_map(|slot| slot.get("type").and_then(|t| t.get("name")).and_then(|n| n.as_str()))
        .map(|n| n.to_string())
        .collect::<Vec<_>>();

    let abilities = raw
        .get("abilities")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DexError::MalformedResponse(format!("detail {name}: missing abilities")))?
        .iter()
        .filter_map(|slot| {
            slot.get("ability")
                .and_then(|a| a.get("name"))
                .and_then(|n| n.as_str())
        })
        .map(|n| n.to_string())
        .collect::<Vec<_>>();

    let stats = raw
        .get("stats")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DexError::MalformedResponse(format!("detail {name}: missing stats")))?
        .iter()
        .filter_map(|entry| {
            let stat_name = entry
                .get("stat")
                .and_then(|s| s.get("name"))
                .and_then(|n| n.as_str())?;
            let base_value = entry.get("base_stat").and_then(|v| v.as_i64())?;
            Some(StatValue {
                name: stat_name.to_string(),
                base_value,
            })
        })
        .collect::<Vec<_>>();

    // front_default is nullable upstream; an absent sprite is an empty URI,
    // not a malformed record.
    let sprite_uri = raw
        .get("sprites")
        .and_then(|v| v.get("front_default"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let species_ref = raw
        .get("species")
        .and_then(|v| v.get("url"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| DexError::MalformedResponse(format!("detail {name}: missing species url")))?
        .to_string();

    Ok(ItemRecord {
        name,
        sprite_uri,
        types,
        abilities,
        stats,
        species_ref,
    })
}

pub fn parse_species_chain_ref(raw: &Value) -> Result<String, DexError> {
    raw.get("evolution_chain")
        .and_then(|v| v.get("url"))
        .and_then(|v| v.as_str())
        .map(|url| url.to_string())
        .ok_or_else(|| {
            DexError::MalformedResponse("species: missing evolution_chain url".to_string())
        })
}

pub fn parse_chain_root(raw: &Value) -> Result<EvolutionChainNode, DexError> {
    let chain = raw
        .get("chain")
        .ok_or_else(|| DexError::MalformedResponse("chain: missing chain root".to_string()))?;
    parse_chain_node(chain, 0)
}

fn parse_chain_node(raw: &Value, depth: usize) -> Result<EvolutionChainNode, DexError> {
    if depth >= MAX_CHAIN_DEPTH {
        return Err(DexError::MalformedResponse(format!(
            "chain: nested deeper than {MAX_CHAIN_DEPTH}"
        )));
    }
    let species_name = raw
        .get("species")
        .and_then(|v| v.get("name"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| DexError::MalformedResponse("chain: node missing species name".to_string()))?
        .to_string();
    let mut children = Vec::new();
    if let Some(next) = raw.get("evolves_to").and_then(|v| v.as_array()) {
        for child in next {
            children.push(parse_chain_node(child, depth + 1)?);
        }
    }
    Ok(EvolutionChainNode {
        species_name,
        children,
    })
}
