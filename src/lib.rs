pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod sources;
pub mod state;
pub mod ui;

pub use catalog::{AdvancedQuery, AdvancedResults, Catalog};
pub use error::CatalogError;
pub use matcher::search;
pub use model::{Difficulty, FieldFilter, MatchType, Record, ScoredRecord, SearchResults};
