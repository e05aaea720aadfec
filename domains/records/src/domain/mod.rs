//! Timesheet domain layer: entities, the record service and the entry service

pub mod entries;
pub mod entities;
pub mod service;
