use crate::directory::Directory;
use crate::domain::{
    CategoryDescriptor, EvolutionSequence, FilterQuery, ItemRecord, SelectionState,
};
use crate::error::DexError;
use crate::evolution::resolve_evolution;
use crate::gateway::CatalogClient;
use crate::view;

/// Token tying a resolution outcome back to the selection that started it.
/// An outcome whose ticket is stale (superseded by a later selection or a
/// cleared one) is discarded: last selection wins.
#[derive(Debug)]
pub struct ResolveTicket {
    generation: u64,
    record: ItemRecord,
}

impl ResolveTicket {
    pub fn record(&self) -> &ItemRecord {
        &self.record
    }
}

pub struct Session {
    directory: Directory,
    categories: Vec<CategoryDescriptor>,
    query: FilterQuery,
    selection: SelectionState,
    generation: u64,
}

impl Session {
    pub fn new(directory: Directory, categories: Vec<CategoryDescriptor>) -> Self {
        Self {
            directory,
            categories,
            query: FilterQuery::None,
            selection: SelectionState::default(),
            generation: 0,
        }
    }

    pub fn set_query(&mut self, query: FilterQuery) {
        self.query = query;
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn visible_items(&self) -> Vec<ItemRecord> {
        view::apply(&self.directory, &self.query)
    }

    pub fn categories(&self) -> &[CategoryDescriptor] {
        &self.categories
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn selection_state(&self) -> &SelectionState {
        &self.selection
    }

    pub fn select(&mut self, name: &str) -> Result<ResolveTicket, DexError> {
        let record = self
            .directory
            .get(name)
            .cloned()
            .ok_or_else(|| DexError::NotFound(name.to_string()))?;
        self.generation += 1;
        self.selection = SelectionState {
            selected: Some(record.clone()),
            evolution: None,
            is_resolving: true,
        };
        Ok(ResolveTicket {
            generation: self.generation,
            record,
        })
    }

    /// Applies a resolution outcome if its ticket is still current; returns
    /// whether it was applied. A failed resolution leaves the selection in
    /// place with no lineage rather than aborting it.
    pub fn finish_resolution(
        &mut self,
        ticket: ResolveTicket,
        outcome: Result<EvolutionSequence, DexError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                name = %ticket.record.name,
                "discarding superseded resolution"
            );
            return false;
        }
        match outcome {
            Ok(sequence) => self.selection.evolution = Some(sequence),
            Err(err) => {
                tracing::warn!(name = %ticket.record.name, error = %err, "lineage lookup failed");
                self.selection.evolution = None;
            }
        }
        self.selection.is_resolving = false;
        true
    }

    /// Synchronous select-then-resolve for callers without their own
    /// scheduling. Only the lookup failure propagates; a resolution failure
    /// is absorbed into an absent lineage.
    pub fn select_and_resolve<C: CatalogClient>(
        &mut self,
        client: &C,
        name: &str,
    ) -> Result<(), DexError> {
        let ticket = self.select(name)?;
        let outcome = resolve_evolution(client, ticket.record());
        self.finish_resolution(ticket, outcome);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.generation += 1;
        self.selection = SelectionState::default();
    }

    /// Atomic swap on explicit refresh. The selection referenced the old
    /// directory and is reset; the active query survives.
    pub fn replace_directory(&mut self, directory: Directory) {
        self.directory = directory;
        self.clear_selection();
    }
}
