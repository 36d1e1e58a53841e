use crate::domain::{EvolutionChainNode, EvolutionSequence, ItemRecord};
use crate::error::DexError;
use crate::gateway::{CatalogClient, MAX_CHAIN_DEPTH};

/// Resolves a record's lineage into a flat root-to-tip sequence of species
/// names. At every branch only the first child is followed; alternate
/// branches are ignored, matching the upstream behavior this preserves.
pub fn resolve_evolution<C: CatalogClient>(
    client: &C,
    record: &ItemRecord,
) -> Result<EvolutionSequence, DexError> {
    let root = client.fetch_chain_root(&record.species_ref)?;
    walk_first_child(&root)
}

pub fn walk_first_child(root: &EvolutionChainNode) -> Result<EvolutionSequence, DexError> {
    let mut names = Vec::new();
    let mut node = root;
    loop {
        if names.len() >= MAX_CHAIN_DEPTH {
            return Err(DexError::MalformedResponse(format!(
                "evolution chain deeper than {MAX_CHAIN_DEPTH}"
            )));
        }
        names.push(node.species_name.clone());
        match node.children.first() {
            Some(next) => node = next,
            None => break,
        }
    }
    Ok(names)
}
