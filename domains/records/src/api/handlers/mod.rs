//! HTTP handlers for timesheet records

pub mod entries;
pub mod timesheets;
