// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Per-project configuration model.
//!
//! Specify the layout of the facts odospace gathers about one project before
//! rendering its templates. A [`ProjectProfile`] is built fresh for each
//! project, used for one rendering pass, and discarded; no state survives
//! across projects or across runs except the files written to disk.
//!
//! # Profile Layout
//!
//! A profile is composed of two basic parts: fixed identifiers that always
//! resolve (project name, project path, operating-system user), and detected
//! paths that may stay unresolved (virtual environment, Odoo checkout,
//! enterprise checkout, design-themes checkout, custom addons, version
//! label). Unresolved fields render as empty strings; whether an unresolved
//! field aborts the project is decided by validation in
//! [`detect`](crate::workspace::detect), not here.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

/// Every placeholder token the substitution engine recognizes.
///
/// `DEFAULT_MODULE` and `DB_NAME` exist for template compatibility only and
/// always render as empty strings.
pub const TOKENS: &[&str] = &[
    "VENV_PATH",
    "PROJECT_PATH",
    "ODOO_PATH",
    "ENTERPRISE_PATH",
    "THEMES_PATH",
    "CUSTOM_ADDONS_PATH",
    "USER_NAME",
    "PROJECT_NAME",
    "ODOO_VERSION",
    "DEFAULT_MODULE",
    "DB_NAME",
];

/// Detected environment of one project.
///
/// Holds everything the rendering pass needs for one project: fixed
/// identifiers plus the paths resolved by the detection heuristics. The
/// `Display` implementation renders the profile as pretty TOML, which is what
/// dry runs print for operator inspection.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ProjectProfile {
    /// Display name derived from the project directory basename.
    pub project_name: String,

    /// Root directory of the project.
    pub project_path: PathBuf,

    /// Operating-system user running the update.
    pub user_name: String,

    /// Virtual environment directory inside the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venv_path: Option<PathBuf>,

    /// Odoo framework checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odoo_path: Option<PathBuf>,

    /// Enterprise extension checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_path: Option<PathBuf>,

    /// Design-themes checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes_path: Option<PathBuf>,

    /// Directory holding project-specific modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_addons_path: Option<PathBuf>,

    /// Version label of the Odoo checkout, e.g. "18.0" or "master".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odoo_version: Option<String>,
}

impl ProjectProfile {
    /// Construct profile carrying only the fixed identifiers.
    ///
    /// Detection fills in the optional fields afterwards.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        Self {
            project_name: name.into(),
            project_path: root.into(),
            user_name: user.into(),
            ..Self::default()
        }
    }
}

impl Display for ProjectProfile {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Placeholder substitution map for one project.
///
/// Maps the fixed token set to resolved string values. Every recognized token
/// is always present; unresolved optional values map to empty strings so that
/// a single rendering pass can substitute each placeholder exactly once.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct TokenMap(BTreeMap<&'static str, String>);

impl TokenMap {
    /// Build the full substitution map from a resolved profile.
    pub fn from_profile(profile: &ProjectProfile) -> Self {
        let mut map = BTreeMap::new();
        map.insert("VENV_PATH", path_or_empty(&profile.venv_path));
        map.insert("PROJECT_PATH", path_string(&profile.project_path));
        map.insert("ODOO_PATH", path_or_empty(&profile.odoo_path));
        map.insert("ENTERPRISE_PATH", path_or_empty(&profile.enterprise_path));
        map.insert("THEMES_PATH", path_or_empty(&profile.themes_path));
        map.insert(
            "CUSTOM_ADDONS_PATH",
            path_or_empty(&profile.custom_addons_path),
        );
        map.insert("USER_NAME", profile.user_name.clone());
        map.insert("PROJECT_NAME", profile.project_name.clone());
        map.insert(
            "ODOO_VERSION",
            profile.odoo_version.clone().unwrap_or_default(),
        );
        map.insert("DEFAULT_MODULE", String::new());
        map.insert("DB_NAME", String::new());

        Self(map)
    }

    /// Look up resolved value of a token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    /// Iterate over all tokens and their resolved values.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(token, value)| (*token, value.as_str()))
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn path_or_empty(path: &Option<PathBuf>) -> String {
    path.as_deref().map(path_string).unwrap_or_default()
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to serialize profile for display.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn full_profile() -> ProjectProfile {
        ProjectProfile {
            project_name: "acme-18".into(),
            project_path: "/home/blah/odoo_projects/acme-18".into(),
            user_name: "blah".into(),
            venv_path: Some("/home/blah/odoo_projects/acme-18/venv".into()),
            odoo_path: Some("/opt/odoos/18.0/odoo".into()),
            enterprise_path: Some("/opt/odoos/18.0/enterprise".into()),
            themes_path: Some("/opt/odoos/18.0/design-themes".into()),
            custom_addons_path: Some("/home/blah/odoo_projects/acme-18/custom_addons".into()),
            odoo_version: Some("18.0".into()),
        }
    }

    #[test]
    fn token_map_covers_every_recognized_token() {
        let tokens = TokenMap::from_profile(&full_profile());
        for token in TOKENS {
            assert!(tokens.get(token).is_some(), "missing token {token}");
        }
        assert_eq!(tokens.iter().count(), TOKENS.len());
    }

    #[test]
    fn unresolved_fields_substitute_to_empty() {
        let profile = ProjectProfile::new("bare", "/tmp/bare", "blah");
        let tokens = TokenMap::from_profile(&profile);

        assert_eq!(tokens.get("VENV_PATH"), Some(""));
        assert_eq!(tokens.get("ODOO_PATH"), Some(""));
        assert_eq!(tokens.get("ODOO_VERSION"), Some(""));
        assert_eq!(tokens.get("PROJECT_NAME"), Some("bare"));
        assert_eq!(tokens.get("PROJECT_PATH"), Some("/tmp/bare"));
    }

    #[test]
    fn compatibility_tokens_always_empty() {
        let tokens = TokenMap::from_profile(&full_profile());
        assert_eq!(tokens.get("DEFAULT_MODULE"), Some(""));
        assert_eq!(tokens.get("DB_NAME"), Some(""));
    }

    #[test]
    fn display_renders_pretty_toml() {
        let result = full_profile().to_string();

        let expect = indoc! {r#"
            project_name = "acme-18"
            project_path = "/home/blah/odoo_projects/acme-18"
            user_name = "blah"
            venv_path = "/home/blah/odoo_projects/acme-18/venv"
            odoo_path = "/opt/odoos/18.0/odoo"
            enterprise_path = "/opt/odoos/18.0/enterprise"
            themes_path = "/opt/odoos/18.0/design-themes"
            custom_addons_path = "/home/blah/odoo_projects/acme-18/custom_addons"
            odoo_version = "18.0"
        "#};

        assert_eq!(result, expect);
    }
}
