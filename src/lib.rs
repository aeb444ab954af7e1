// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Odospace updates existing Odoo project workspaces from templates.
//!
//! Given a base folder of project directories, odospace discovers each
//! workspace descriptor, infers the project's environment (virtual
//! environment, Odoo checkout, enterprise checkout, design-themes checkout,
//! custom addons, version label) through an ordered list of heuristics, and
//! rewrites the generated configuration files of each project from embedded
//! templates with placeholder substitution. Detection is validated before any
//! write, so a project either gets the full template set or stays untouched.

pub mod config;
pub mod path;
pub mod templates;
pub mod workspace;

pub use config::{ProjectProfile, TokenMap, TOKENS};
pub use path::{default_install_root, default_projects_dir, home_dir};
pub use workspace::{ProjectOutcome, Workspace};
