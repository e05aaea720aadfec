//! API layer for timesheet records

pub mod handlers;
pub mod json;
pub mod middleware;
pub mod routes;

pub use middleware::RecordsState;
pub use routes::routes;
