// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Environment detection heuristics.
//!
//! Utilities to infer the per-project paths that template rendering needs.
//! Detection is best effort and read only: each heuristic inspects files that
//! already exist in the workspace, and an unresolved fact stays unresolved
//! rather than failing the run.
//!
//! # Resolution Order
//!
//! The virtual environment and custom addons directories are probed directly
//! against conventional subdirectory names, first match wins. The Odoo
//! installation facts (framework checkout, enterprise checkout, design-themes
//! checkout, version label) come from an explicit priority list of resolvers
//! behind the [`InstallResolver`] seam:
//!
//! 1. [`OdooConfResolver`] parses the `addons_path` setting of an existing
//!    `odoo.conf` and matches path suffixes against the conventional checkout
//!    layout.
//! 2. [`DescriptorScanResolver`] scans the existing workspace descriptor for
//!    an embedded installation-root path literal and extracts the version
//!    from it.
//! 3. [`DirNameGuessResolver`] guesses a version from digits in the project
//!    directory name and probes the installation root for a matching
//!    versioned subdirectory.
//!
//! The first resolver returning facts wins; later resolvers are never
//! consulted. Validation of the resolved profile is a separate step so that
//! a skip warning can name exactly the categories that are missing.

use crate::{config::ProjectProfile, workspace::Workspace};

use std::{
    env,
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Name of the framework configuration file probed inside a project.
pub const ODOO_CONF: &str = "odoo.conf";

/// Conventional virtual environment directory names, in probe order.
pub const VENV_DIRS: &[&str] = &["venv", ".venv"];

/// Conventional custom addons directory names, in probe order.
pub const CUSTOM_ADDON_DIRS: &[&str] = &["custom_addons", "addons"];

/// Layer of indirection for installation fact resolution.
pub trait InstallResolver {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Attempt to resolve installation facts for a workspace.
    ///
    /// Returns [`None`] when this heuristic does not apply, letting the next
    /// resolver in the priority list take over.
    fn resolve(&self, workspace: &Workspace) -> Option<InstallFacts>;
}

/// Installation facts produced by one resolver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallFacts {
    /// Odoo framework checkout.
    pub odoo_path: PathBuf,

    /// Enterprise extension checkout.
    pub enterprise_path: Option<PathBuf>,

    /// Design-themes checkout.
    pub themes_path: Option<PathBuf>,

    /// Version label, e.g. "18.0" or "master".
    pub odoo_version: Option<String>,
}

/// Standard resolver priority list against a given installation root.
pub fn default_resolvers(install_root: impl Into<PathBuf>) -> Vec<Box<dyn InstallResolver>> {
    let install_root = install_root.into();
    vec![
        Box::new(OdooConfResolver),
        Box::new(DescriptorScanResolver::new(install_root.clone())),
        Box::new(DirNameGuessResolver::new(install_root)),
    ]
}

/// Resolve the full profile of one workspace.
///
/// Probes the conventional subdirectories, then walks the resolver priority
/// list for installation facts. Always succeeds; unresolved facts stay
/// [`None`] and are caught by [`missing_paths`] afterwards.
pub fn resolve_profile(
    workspace: &Workspace,
    resolvers: &[Box<dyn InstallResolver>],
) -> ProjectProfile {
    let mut profile = ProjectProfile::new(workspace.name(), workspace.root(), os_user());
    profile.venv_path = existing_subdir(workspace.root(), VENV_DIRS);
    profile.custom_addons_path = existing_subdir(workspace.root(), CUSTOM_ADDON_DIRS);

    let facts = resolvers.iter().find_map(|resolver| {
        let facts = resolver.resolve(workspace);
        match &facts {
            Some(_) => debug!("{} resolved {}", resolver.name(), workspace.name()),
            None => debug!("{} found nothing for {}", resolver.name(), workspace.name()),
        }
        facts
    });

    if let Some(facts) = facts {
        profile.odoo_path = Some(facts.odoo_path);
        profile.enterprise_path = facts.enterprise_path;
        profile.themes_path = facts.themes_path;
        profile.odoo_version = facts.odoo_version;
    }

    profile
}

/// Resolve installation facts from an existing `odoo.conf`.
///
/// Splits the `addons_path` value on commas and matches each entry's suffix:
/// `odoo/addons` marks the framework addons directory (the framework checkout
/// is its parent), `enterprise` marks the extension checkout, `design-themes`
/// marks the theming checkout. Entries never have to exist on disk at this
/// stage. Commas inside quoted or escaped paths are not handled; such inputs
/// are undefined.
#[derive(Clone, Copy, Debug, Default)]
pub struct OdooConfResolver;

impl InstallResolver for OdooConfResolver {
    fn name(&self) -> &'static str {
        "odoo.conf parse"
    }

    fn resolve(&self, workspace: &Workspace) -> Option<InstallFacts> {
        let contents = fs::read_to_string(workspace.root().join(ODOO_CONF)).ok()?;
        facts_from_conf(&contents)
    }
}

/// Resolve installation facts from the existing workspace descriptor.
///
/// The descriptor is inspected as plain text, not parsed structurally. Any
/// embedded path literal of the form `<install-root>/<version>/odoo`, where
/// `<version>` is dotted numeric or the literal `master`, yields the
/// framework checkout; the enterprise and design-themes checkouts are derived
/// as its siblings.
#[derive(Clone, Debug)]
pub struct DescriptorScanResolver {
    install_root: PathBuf,
}

impl DescriptorScanResolver {
    /// Construct resolver scanning for paths under given installation root.
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }
}

impl InstallResolver for DescriptorScanResolver {
    fn name(&self) -> &'static str {
        "descriptor scan"
    }

    fn resolve(&self, workspace: &Workspace) -> Option<InstallFacts> {
        let contents = fs::read_to_string(workspace.descriptor()).ok()?;
        facts_from_descriptor(&contents, &self.install_root)
    }
}

/// Resolve installation facts by guessing a version from the project name.
///
/// Digits embedded in the project directory name become a version label
/// (`acme-18` guesses `18.0`), and the installation root is probed for a
/// matching versioned subdirectory. All four fields are populated only when
/// that probe finds an existing directory.
#[derive(Clone, Debug)]
pub struct DirNameGuessResolver {
    install_root: PathBuf,
}

impl DirNameGuessResolver {
    /// Construct resolver probing given installation root.
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }
}

impl InstallResolver for DirNameGuessResolver {
    fn name(&self) -> &'static str {
        "directory name guess"
    }

    fn resolve(&self, workspace: &Workspace) -> Option<InstallFacts> {
        let version = version_from_name(workspace.name())?;
        let base = self.install_root.join(&version);
        if !base.is_dir() {
            return None;
        }

        Some(InstallFacts {
            odoo_path: base.join("odoo"),
            enterprise_path: Some(base.join("enterprise")),
            themes_path: Some(base.join("design-themes")),
            odoo_version: Some(version),
        })
    }
}

/// Required path categories checked before rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredPath {
    VirtualEnv,
    Odoo,
    CustomAddons,
}

impl Display for RequiredPath {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::VirtualEnv => "virtual environment",
            Self::Odoo => "odoo",
            Self::CustomAddons => "custom addons",
        };
        fmt.write_str(label)
    }
}

/// Determine which required paths are unresolved or missing on disk.
///
/// A project is only rendered when this list is empty; otherwise the skip
/// warning names exactly these categories.
pub fn missing_paths(profile: &ProjectProfile) -> Vec<RequiredPath> {
    let mut missing = Vec::new();
    if !exists_dir(&profile.venv_path) {
        missing.push(RequiredPath::VirtualEnv);
    }
    if !exists_dir(&profile.odoo_path) {
        missing.push(RequiredPath::Odoo);
    }
    if !exists_dir(&profile.custom_addons_path) {
        missing.push(RequiredPath::CustomAddons);
    }

    missing
}

fn exists_dir(path: &Option<PathBuf>) -> bool {
    path.as_deref().is_some_and(Path::is_dir)
}

fn existing_subdir(root: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_dir())
}

fn os_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_default()
}

fn facts_from_conf(contents: &str) -> Option<InstallFacts> {
    let value = contents.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim() == "addons_path").then(|| value.trim())
    })?;

    let mut facts = InstallFacts::default();
    let mut found_odoo = false;
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let path = Path::new(entry);
        if path.ends_with("odoo/addons") {
            // Framework checkout is the parent of its addons directory.
            let odoo = path.parent().unwrap_or(path);
            facts.odoo_path = odoo.to_path_buf();
            found_odoo = true;
            if facts.odoo_version.is_none() {
                facts.odoo_version = odoo
                    .parent()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().into_owned())
                    .filter(|label| is_version_label(label));
            }
        } else if path.ends_with("enterprise") {
            facts.enterprise_path = Some(path.to_path_buf());
        } else if path.ends_with("design-themes") {
            facts.themes_path = Some(path.to_path_buf());
        }
    }

    found_odoo.then_some(facts)
}

fn facts_from_descriptor(contents: &str, install_root: &Path) -> Option<InstallFacts> {
    let needle = format!("{}/", install_root.to_string_lossy());
    let mut search = contents;
    while let Some(at) = search.find(needle.as_str()) {
        let rest = &search[at + needle.len()..];
        if let Some((version, tail)) = rest.split_once('/') {
            let end = tail
                .find(|c: char| c == '/' || c == '"' || c == '\'' || c == ',' || c.is_whitespace())
                .unwrap_or(tail.len());
            if is_version_label(version) && &tail[..end] == "odoo" {
                let base = install_root.join(version);
                return Some(InstallFacts {
                    odoo_path: base.join("odoo"),
                    enterprise_path: Some(base.join("enterprise")),
                    themes_path: Some(base.join("design-themes")),
                    odoo_version: Some(version.to_string()),
                });
            }
        }
        search = &search[at + needle.len()..];
    }

    None
}

fn is_version_label(label: &str) -> bool {
    label == "master"
        || (!label.is_empty()
            && label.chars().any(|c| c.is_ascii_digit())
            && label.chars().all(|c| c.is_ascii_digit() || c == '.'))
}

fn version_from_name(name: &str) -> Option<String> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let label: String = name[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let label = label.trim_end_matches('.');
    if label.is_empty() {
        return None;
    }

    Some(if label.contains('.') {
        label.to_string()
    } else {
        format!("{label}.0")
    })
}
