//! API endpoint integration tests
//!
//! Tests for the configuration, directory, timesheet and entry endpoints and
//! the permission gate in front of them.

#![allow(dead_code)]

mod common;
mod config;
mod directory;
mod entries;
mod permissions;
mod timesheets;
