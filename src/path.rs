// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for the well-known locations that
//! odospace inspects: the base folder holding project workspaces, and the
//! installation root holding versioned Odoo checkouts.

use std::path::PathBuf;

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine default absolute path to the projects base folder.
///
/// Project workspaces conventionally live under `$HOME/odoo_projects`. Does
/// not check if the path returned actually exists; discovery treats a missing
/// base folder as zero work.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_projects_dir() -> Result<PathBuf> {
    home_dir().map(|path| path.join("odoo_projects"))
}

/// Determine default installation root for versioned Odoo checkouts.
///
/// Each version gets its own subdirectory, e.g. `/opt/odoos/18.0` holding
/// `odoo`, `enterprise`, and `design-themes` checkouts side by side.
pub fn default_install_root() -> PathBuf {
    PathBuf::from("/opt/odoos")
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
