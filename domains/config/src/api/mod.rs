//! API layer for the configuration domain
//!
//! Contains HTTP handlers, wire types, routes, and domain state definition.

pub mod handlers;
pub mod json;
pub mod middleware;
pub mod routes;

pub use middleware::ConfigState;
pub use routes::routes;
