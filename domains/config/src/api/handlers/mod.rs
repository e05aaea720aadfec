//! HTTP handlers for the configuration domain

pub mod config;
pub mod directory;
