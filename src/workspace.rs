// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Workspace domain representation.
//!
//! A __workspace__ is a project directory identified by the editor's
//! multi-root project definition file, the __workspace descriptor__. Any
//! directory holding a `*.code-workspace` file under the base folder counts
//! as a workspace; the directory basename doubles as the display name.
//!
//! # Workspace Components
//!
//! A workspace mainly contains two basic things: a descriptor file, and a
//! conventional directory layout that the detection heuristics inspect. The
//! layout is never enforced, only probed: a virtual environment under `venv`
//! or `.venv`, project modules under `custom_addons` or `addons`, and
//! optionally an `odoo.conf` pointing at the installed Odoo checkouts.
//!
//! # Workspace Updates
//!
//! Updating a workspace means rendering the embedded templates against the
//! facts detected for that workspace, and writing the results over the
//! descriptor, the editor settings subfolder, and the helper scripts at the
//! project root. Detection and validation happen before any write, so a
//! workspace is either rewritten in full or left completely untouched. An
//! existing `odoo.conf` is never written by the updater; the generated
//! `update-config.sh` helper recreates it only when missing.
//!
//! # See Also
//!
//! 1. [`detect`] for the ordered resolution heuristics.
//! 2. [`render`] for the substitution engine and write plan.

pub mod detect;
pub mod render;

use crate::{
    config::ProjectProfile,
    workspace::{
        detect::{InstallResolver, RequiredPath},
        render::TemplatePlan,
    },
};

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// A project workspace discovered under the base folder.
///
/// Ties together the descriptor file that identified the project, the project
/// root directory that owns it, and the display name derived from the root's
/// basename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workspace {
    descriptor: PathBuf,
    root: PathBuf,
    name: String,
}

impl Workspace {
    /// Construct workspace from a discovered descriptor file.
    ///
    /// The project root is the descriptor's parent directory, and the display
    /// name is that directory's basename.
    ///
    /// # Errors
    ///
    /// - Return [`WorkspaceError::OrphanDescriptor`] if the descriptor has no
    ///   parent directory to act as the project root.
    pub fn from_descriptor(descriptor: impl Into<PathBuf>) -> Result<Self> {
        let descriptor = descriptor.into();
        let root = descriptor
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .ok_or_else(|| WorkspaceError::OrphanDescriptor {
                descriptor: descriptor.clone(),
            })?;
        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());

        Ok(Self {
            descriptor,
            root,
            name,
        })
    }

    /// Recursively enumerate workspaces under a base folder.
    ///
    /// One-shot scan for `*.code-workspace` files in deterministic path
    /// order. Hidden directories are skipped; every ignore-file source of
    /// the walker (`.ignore`, gitignore variants, parent directories) is
    /// disabled so results do not depend on stray ignore files. A missing
    /// base folder simply yields zero workspaces.
    #[instrument(level = "debug")]
    pub fn discover(base: impl AsRef<Path> + std::fmt::Debug) -> Vec<Self> {
        let base = base.as_ref();
        if !base.is_dir() {
            debug!("base folder does not exist: {}", base.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(base)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false)
            .build();

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!("discovery skipped unreadable entry: {error}");
                    continue;
                }
            };

            let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
            let is_descriptor = entry
                .path()
                .extension()
                .is_some_and(|extension| extension == "code-workspace");
            if !is_file || !is_descriptor {
                continue;
            }

            match Self::from_descriptor(entry.path()) {
                Ok(workspace) => found.push(workspace),
                Err(error) => debug!("discovery skipped descriptor: {error}"),
            }
        }

        found.sort_by(|a, b| a.descriptor.cmp(&b.descriptor));
        found
    }

    /// Rewrite every generated file of this workspace from templates.
    ///
    /// Renders the full template set against the given profile, writes the
    /// descriptor, the editor settings subfolder, and the helper scripts, and
    /// finally invokes the freshly written `update-config.sh` to regenerate
    /// the derived configuration artifact. The caller is expected to have
    /// validated the profile beforehand; rendering itself never consults the
    /// file system for path facts.
    ///
    /// # Errors
    ///
    /// - Return [`WorkspaceError::Render`] if rendering, writing, or the
    ///   helper script invocation fails.
    #[instrument(skip(self, profile), level = "debug")]
    pub fn update(&self, profile: &ProjectProfile) -> Result<()> {
        info!("updating workspace: {}", self.name);
        let plan = TemplatePlan::new(self, profile);
        plan.render_all()?;
        plan.refresh_config()?;

        Ok(())
    }

    /// Resolve this workspace and act on the outcome.
    ///
    /// Runs detection through the given resolver priority list, validates
    /// the result, and either skips (returning the missing categories),
    /// resolves without touching the file system (dry run), or performs the
    /// full update. Dry runs never write a file and never spawn a process;
    /// the resolved profile is handed back for the caller to report.
    ///
    /// # Errors
    ///
    /// - Return [`WorkspaceError::Render`] if the update itself fails.
    pub fn process(
        &self,
        resolvers: &[Box<dyn InstallResolver>],
        dry_run: bool,
    ) -> Result<ProjectOutcome> {
        let profile = detect::resolve_profile(self, resolvers);
        let missing = detect::missing_paths(&profile);
        if !missing.is_empty() {
            return Ok(ProjectOutcome::Skipped(missing));
        }

        if dry_run {
            return Ok(ProjectOutcome::DryRun(profile));
        }

        self.update(&profile)?;
        Ok(ProjectOutcome::Updated(profile))
    }

    /// Display name of the workspace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the workspace descriptor file.
    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }
}

/// Outcome of processing one workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectOutcome {
    /// Full template set was rendered and written.
    Updated(ProjectProfile),

    /// Detection resolved but nothing was written (dry run).
    DryRun(ProjectProfile),

    /// Required paths were unresolved; the project was left untouched.
    Skipped(Vec<RequiredPath>),
}

/// All possible error types for workspace manipulation.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// Descriptor file has no owning project directory.
    #[error("workspace descriptor {descriptor:?} has no parent directory")]
    OrphanDescriptor { descriptor: PathBuf },

    /// Rendering or writing the template set fails.
    #[error(transparent)]
    Render(#[from] crate::workspace::render::RenderError),
}

/// Friendly result alias :3
type Result<T, E = WorkspaceError> = std::result::Result<T, E>;
