//! Timesheet records domain: per-user target hours, status flags and booked entries

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::entries::{EntryImport, EntryService};
pub use domain::service::TimesheetService;

// Re-export store types
pub use repository::{
    EntryStore, MemoryEntryStore, MemoryTimesheetStore, PgEntryStore, PgTimesheetStore,
    StoreResult, TimesheetStore,
};

// Re-export API types
pub use api::routes;
pub use api::RecordsState;
