//! Data-aggregation and query engine for a browsable Pokédex directory:
//! concurrent bulk fetch-and-join against the remote catalog, pure
//! filter/sort views, and evolutionary-lineage resolution.

pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod evolution;
pub mod gateway;
pub mod session;
pub mod view;
