//! In-memory model of OSM map features (nodes, ways, relations) with a
//! derived father/child reference graph, named feature collections, and a
//! per-feature selection state machine. The raw maps plus the selection
//! state are the persisted slice; everything derived is rebuilt from it.

pub mod compute;
pub mod data;
pub mod errors;
pub mod etl;
pub mod persist;
pub mod store;
