use std::collections::HashMap;

use assert_matches::assert_matches;

use pokedex_directory::directory::Directory;
use pokedex_directory::domain::{
    CategoryDescriptor, EvolutionChainNode, FilterQuery, ItemRecord, ItemSummary,
};
use pokedex_directory::error::DexError;
use pokedex_directory::evolution::resolve_evolution;
use pokedex_directory::gateway::CatalogClient;
use pokedex_directory::session::Session;

#[derive(Default)]
struct MockCatalog {
    chains: HashMap<String, EvolutionChainNode>,
}

impl MockCatalog {
    fn with_chain(species_ref: &str, names: &[&str]) -> Self {
        let mut node = EvolutionChainNode {
            species_name: names[names.len() - 1].to_string(),
            children: Vec::new(),
        };
        for name in names[..names.len() - 1].iter().rev() {
            node = EvolutionChainNode {
                species_name: name.to_string(),
                children: vec![node],
            };
        }
        let mut chains = HashMap::new();
        chains.insert(species_ref.to_string(), node);
        Self { chains }
    }
}

impl CatalogClient for MockCatalog {
    fn fetch_category_list(&self) -> Result<Vec<CategoryDescriptor>, DexError> {
        Ok(Vec::new())
    }

    fn fetch_summary_page(&self, _limit: u32) -> Result<Vec<ItemSummary>, DexError> {
        Ok(Vec::new())
    }

    fn fetch_detail(&self, detail_ref: &str) -> Result<ItemRecord, DexError> {
        Err(DexError::NotFound(detail_ref.to_string()))
    }

    fn fetch_chain_root(&self, species_ref: &str) -> Result<EvolutionChainNode, DexError> {
        self.chains
            .get(species_ref)
            .cloned()
            .ok_or_else(|| DexError::Network("chain service unreachable".to_string()))
    }
}

fn record(name: &str, types: &[&str]) -> ItemRecord {
    ItemRecord {
        name: name.to_string(),
        sprite_uri: String::new(),
        types: types.iter().map(|t| t.to_string()).collect(),
        abilities: Vec::new(),
        stats: Vec::new(),
        species_ref: format!("https://api.example/species/{name}/"),
    }
}

fn sample_session() -> Session {
    let directory = Directory::from_records(vec![
        record("alpha", &["fire"]),
        record("beta", &["water"]),
        record("gamma", &["fire"]),
    ])
    .unwrap();
    let categories = vec![
        CategoryDescriptor {
            name: "fire".to_string(),
        },
        CategoryDescriptor {
            name: "water".to_string(),
        },
    ];
    Session::new(directory, categories)
}

#[test]
fn query_drives_visible_items() {
    let mut session = sample_session();
    assert_eq!(session.visible_items().len(), 3);

    session.set_query(FilterQuery::ByType("water".to_string()));
    let visible = session.visible_items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "beta");

    // idempotent: re-setting the same query changes nothing
    session.set_query(FilterQuery::ByType("water".to_string()));
    assert_eq!(session.visible_items(), visible);
}

#[test]
fn select_unknown_name_is_not_found() {
    let mut session = sample_session();
    let err = session.select("missingno").unwrap_err();
    assert_matches!(err, DexError::NotFound(_));
    assert!(session.selection_state().selected.is_none());
}

#[test]
fn select_marks_resolving_until_finished() {
    let mut session = sample_session();
    let ticket = session.select("alpha").unwrap();
    {
        let state = session.selection_state();
        assert_eq!(state.selected.as_ref().unwrap().name, "alpha");
        assert!(state.evolution.is_none());
        assert!(state.is_resolving);
    }

    let applied = session.finish_resolution(ticket, Ok(vec!["alpha".to_string()]));
    assert!(applied);
    let state = session.selection_state();
    assert_eq!(state.evolution.as_deref(), Some(["alpha".to_string()].as_slice()));
    assert!(!state.is_resolving);
}

#[test]
fn later_selection_supersedes_earlier_resolution() {
    let mut session = sample_session();
    let ticket_a = session.select("alpha").unwrap();
    let ticket_b = session.select("beta").unwrap();

    // "alpha"'s resolution arrives after "beta" was selected: discarded
    let applied = session.finish_resolution(ticket_a, Ok(vec!["alpha-evo".to_string()]));
    assert!(!applied);
    let state = session.selection_state();
    assert_eq!(state.selected.as_ref().unwrap().name, "beta");
    assert!(state.evolution.is_none());
    assert!(state.is_resolving);

    let applied = session.finish_resolution(
        ticket_b,
        Ok(vec!["beta".to_string(), "betamax".to_string()]),
    );
    assert!(applied);
    let state = session.selection_state();
    assert_eq!(state.selected.as_ref().unwrap().name, "beta");
    assert_eq!(
        state.evolution.as_deref(),
        Some(["beta".to_string(), "betamax".to_string()].as_slice())
    );
    assert!(!state.is_resolving);
}

#[test]
fn failed_resolution_keeps_selection_without_lineage() {
    let mut session = sample_session();
    let ticket = session.select("gamma").unwrap();
    let applied = session.finish_resolution(
        ticket,
        Err(DexError::Network("chain service unreachable".to_string())),
    );
    assert!(applied);
    let state = session.selection_state();
    assert_eq!(state.selected.as_ref().unwrap().name, "gamma");
    assert!(state.evolution.is_none());
    assert!(!state.is_resolving);
}

#[test]
fn clear_selection_resets_state_and_discards_in_flight() {
    let mut session = sample_session();
    let ticket = session.select("alpha").unwrap();
    session.clear_selection();

    let state = session.selection_state();
    assert!(state.selected.is_none());
    assert!(state.evolution.is_none());
    assert!(!state.is_resolving);

    let applied = session.finish_resolution(ticket, Ok(vec!["alpha".to_string()]));
    assert!(!applied);
    assert!(session.selection_state().selected.is_none());
}

#[test]
fn select_and_resolve_walks_the_chain() {
    let mut session = sample_session();
    let catalog = MockCatalog::with_chain(
        "https://api.example/species/alpha/",
        &["alpha", "alpha-2", "alpha-3"],
    );

    session.select_and_resolve(&catalog, "alpha").unwrap();
    let state = session.selection_state();
    assert_eq!(
        state.evolution.as_deref(),
        Some(
            [
                "alpha".to_string(),
                "alpha-2".to_string(),
                "alpha-3".to_string()
            ]
            .as_slice()
        )
    );
    assert!(!state.is_resolving);
}

#[test]
fn select_and_resolve_absorbs_resolution_failure() {
    let mut session = sample_session();
    let catalog = MockCatalog::default();

    session.select_and_resolve(&catalog, "beta").unwrap();
    let state = session.selection_state();
    assert_eq!(state.selected.as_ref().unwrap().name, "beta");
    assert!(state.evolution.is_none());
    assert!(!state.is_resolving);
}

#[test]
fn resolver_returns_chain_in_root_to_tip_order() {
    let catalog = MockCatalog::with_chain(
        "https://api.example/species/alpha/",
        &["alpha", "alpha-2", "alpha-3"],
    );
    let sequence = resolve_evolution(&catalog, &record("alpha", &["fire"])).unwrap();
    assert_eq!(sequence, vec!["alpha", "alpha-2", "alpha-3"]);
}

#[test]
fn replace_directory_keeps_query_and_clears_selection() {
    let mut session = sample_session();
    session.set_query(FilterQuery::ByType("fire".to_string()));
    session.select("alpha").unwrap();

    let refreshed = Directory::from_records(vec![record("delta", &["fire"])]).unwrap();
    session.replace_directory(refreshed);

    assert_eq!(session.query(), &FilterQuery::ByType("fire".to_string()));
    assert!(session.selection_state().selected.is_none());
    let visible = session.visible_items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "delta");
}
