//! Validation helpers for team and category names

use timesheet_common::{Error, Result};

/// Trim a team or category name; `None` when nothing is left
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Check a rename request before any store is touched
pub fn validate_team_rename(old_name: &str, new_name: &str) -> Result<()> {
    if new_name.trim().is_empty() {
        return Err(Error::failed_with("Team name must not be empty"));
    }

    if new_name == old_name {
        return Err(Error::failed_with("New Team name must be different"));
    }

    Ok(())
}
