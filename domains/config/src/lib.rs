//! Configuration domain: mail settings, approved users and groups, teams, categories

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::validation::{normalize_name, validate_team_rename};

// Re-export store types
pub use repository::{
    CategoryStore, ConfigStore, MemoryConfigStore, PgConfigStore, StoreResult, TeamStore,
};

// Re-export API types
pub use api::routes;
pub use api::ConfigState;
