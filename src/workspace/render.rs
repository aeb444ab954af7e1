// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Template rendering and the per-project write plan.
//!
//! Utilities to substitute placeholder tokens into the embedded templates and
//! write the results into a workspace. Substitution is a single left-to-right
//! pass per template: every `{{TOKEN}}` marker is resolved exactly once
//! against the [`TokenMap`], and a marker naming an unrecognized token is a
//! hard error rather than something that leaks into output files. This keeps
//! missing-token detection trivial and guarantees no literal placeholder ever
//! survives in a written file.
//!
//! # Write Plan
//!
//! One [`TemplatePlan`] covers one workspace: the descriptor is rewritten in
//! place, the fixed-name outputs from the template manifest land relative to
//! the project root (the editor settings subfolder is created on demand), and
//! helper scripts receive the executable bit after being written. Rendering
//! happens before any write for a given file, so a substitution failure
//! leaves that file untouched.

use crate::{
    config::{ProjectProfile, TokenMap},
    templates,
    workspace::Workspace,
};

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use tracing::{debug, instrument, warn};

/// Substitute every placeholder token in a template.
///
/// Performs one pass over the template, replacing each `{{TOKEN}}` marker
/// with its resolved value from the token map. Unresolved optional tokens
/// are present in the map as empty strings, so rendering the same template
/// against the same map is deterministic down to the byte.
///
/// # Errors
///
/// - Return [`RenderError::UnknownToken`] if a marker names a token outside
///   the recognized set.
/// - Return [`RenderError::UnterminatedToken`] if an opening marker never
///   closes.
pub fn render(template: &str, tokens: &TokenMap) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or(RenderError::UnterminatedToken)?;
        let token = &after[..end];
        let value = tokens.get(token).ok_or_else(|| RenderError::UnknownToken {
            token: token.to_string(),
        })?;
        output.push_str(value);
        rest = &after[end + 2..];
    }
    output.push_str(rest);

    Ok(output)
}

/// Rendering plan for one workspace.
///
/// Owns the substitution map built from a resolved profile, and knows where
/// every rendered template lands inside the workspace.
#[derive(Debug)]
pub struct TemplatePlan<'a> {
    workspace: &'a Workspace,
    tokens: TokenMap,
}

impl<'a> TemplatePlan<'a> {
    /// Construct plan for given workspace and resolved profile.
    pub fn new(workspace: &'a Workspace, profile: &ProjectProfile) -> Self {
        Self {
            workspace,
            tokens: TokenMap::from_profile(profile),
        }
    }

    /// Render and write the full template set.
    ///
    /// Rewrites the workspace descriptor in place, then every fixed-name
    /// output from the manifest. Returns the paths written, in write order.
    ///
    /// # Errors
    ///
    /// - Return [`RenderError::UnknownToken`] or
    ///   [`RenderError::UnterminatedToken`] if substitution fails.
    /// - Return [`RenderError::CreateSettingsDir`] if the editor settings
    ///   subfolder cannot be created.
    /// - Return [`RenderError::WriteTemplate`] if a rendered file cannot be
    ///   written.
    /// - Return [`RenderError::SetExecutable`] if a helper script cannot be
    ///   granted the executable bit.
    #[instrument(skip(self), level = "debug")]
    pub fn render_all(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        let contents = render(templates::WORKSPACE, &self.tokens)?;
        write_file(self.workspace.descriptor(), &contents, false)?;
        written.push(self.workspace.descriptor().to_path_buf());

        for spec in templates::MANIFEST {
            let destination = self.workspace.root().join(spec.destination);
            if let Some(parent) = destination
                .parent()
                .filter(|parent| *parent != self.workspace.root())
            {
                mkdirp::mkdirp(parent).map_err(|err| RenderError::CreateSettingsDir {
                    source: err,
                    path: parent.to_path_buf(),
                })?;
            }

            let contents = render(spec.contents, &self.tokens)?;
            write_file(&destination, &contents, spec.executable)?;
            debug!("rendered {}", destination.display());
            written.push(destination);
        }

        Ok(written)
    }

    /// Invoke the freshly written `update-config.sh` helper.
    ///
    /// Regenerates the derived configuration artifact with stdout and stderr
    /// discarded. The helper itself refuses to touch an existing `odoo.conf`,
    /// so invoking it is always safe. A nonzero exit is reported as a warning
    /// rather than failing the run.
    ///
    /// # Errors
    ///
    /// - Return [`RenderError::RefreshConfig`] if the helper cannot be
    ///   spawned at all.
    #[instrument(skip(self), level = "debug")]
    pub fn refresh_config(&self) -> Result<()> {
        let script = self.workspace.root().join("update-config.sh");
        let script = fs::canonicalize(&script).map_err(|err| RenderError::RefreshConfig {
            source: err,
            path: script.clone(),
        })?;

        // Rendered paths may be relative to the invoking directory, so the
        // helper inherits the current working directory.
        let status = Command::new(&script)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| RenderError::RefreshConfig {
                source: err,
                path: script.clone(),
            })?;

        if !status.success() {
            warn!(
                "config refresh exited with {status} for {}",
                self.workspace.name()
            );
        }

        Ok(())
    }
}

fn write_file(path: &Path, contents: &str, executable: bool) -> Result<()> {
    fs::write(path, contents).map_err(|err| RenderError::WriteTemplate {
        source: err,
        path: path.to_path_buf(),
    })?;
    if executable {
        set_executable(path)?;
    }

    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|err| {
        RenderError::SetExecutable {
            source: err,
            path: path.to_path_buf(),
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// All possible error types for template rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template contains a marker naming an unrecognized token.
    #[error("template references unrecognized token {token:?}")]
    UnknownToken { token: String },

    /// Template contains an opening marker that never closes.
    #[error("template contains an unterminated placeholder marker")]
    UnterminatedToken,

    /// Editor settings subfolder cannot be created.
    #[error("cannot create settings directory {path:?}")]
    CreateSettingsDir { source: io::Error, path: PathBuf },

    /// Rendered template cannot be written.
    #[error("cannot write rendered template {path:?}")]
    WriteTemplate { source: io::Error, path: PathBuf },

    /// Helper script cannot be granted the executable bit.
    #[error("cannot mark {path:?} executable")]
    SetExecutable { source: io::Error, path: PathBuf },

    /// Configuration refresh helper cannot be spawned.
    #[error("cannot invoke config refresh helper {path:?}")]
    RefreshConfig { source: io::Error, path: PathBuf },
}

/// Friendly result alias :3
type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TOKENS;
    use pretty_assertions::assert_eq;

    fn full_profile() -> ProjectProfile {
        ProjectProfile {
            project_name: "acme-18".into(),
            project_path: "/srv/projects/acme-18".into(),
            user_name: "blah".into(),
            venv_path: Some("/srv/projects/acme-18/venv".into()),
            odoo_path: Some("/opt/odoos/18.0/odoo".into()),
            enterprise_path: Some("/opt/odoos/18.0/enterprise".into()),
            themes_path: Some("/opt/odoos/18.0/design-themes".into()),
            custom_addons_path: Some("/srv/projects/acme-18/custom_addons".into()),
            odoo_version: Some("18.0".into()),
        }
    }

    #[test]
    fn render_substitutes_tokens() -> anyhow::Result<()> {
        let tokens = TokenMap::from_profile(&full_profile());
        let result = render("run {{ODOO_PATH}}/odoo-bin as {{USER_NAME}}", &tokens)?;

        assert_eq!(result, "run /opt/odoos/18.0/odoo/odoo-bin as blah");
        Ok(())
    }

    #[test]
    fn render_rejects_unknown_token() {
        let tokens = TokenMap::from_profile(&full_profile());
        let result = render("{{NOT_A_TOKEN}}", &tokens);

        assert!(matches!(
            result,
            Err(RenderError::UnknownToken { token }) if token == "NOT_A_TOKEN"
        ));
    }

    #[test]
    fn render_rejects_unterminated_marker() {
        let tokens = TokenMap::from_profile(&full_profile());
        assert!(matches!(
            render("broken {{ODOO_PATH", &tokens),
            Err(RenderError::UnterminatedToken)
        ));
    }

    #[test]
    fn render_is_deterministic() -> anyhow::Result<()> {
        let tokens = TokenMap::from_profile(&full_profile());
        let first = render(templates::WORKSPACE, &tokens)?;
        let second = render(templates::WORKSPACE, &tokens)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn embedded_templates_render_without_leftover_markers() -> anyhow::Result<()> {
        let tokens = TokenMap::from_profile(&full_profile());

        let descriptor = render(templates::WORKSPACE, &tokens)?;
        assert!(!descriptor.contains("{{"));

        for spec in templates::MANIFEST {
            let rendered = render(spec.contents, &tokens)?;
            assert!(
                !rendered.contains("{{"),
                "{} leaves a literal placeholder",
                spec.destination
            );
        }
        Ok(())
    }

    #[test]
    fn embedded_templates_use_only_recognized_tokens() {
        let mut sources = vec![("descriptor", templates::WORKSPACE)];
        sources.extend(
            templates::MANIFEST
                .iter()
                .map(|spec| (spec.destination, spec.contents)),
        );

        for (name, template) in sources {
            let mut rest = template;
            while let Some(start) = rest.find("{{") {
                let after = &rest[start + 2..];
                let end = after.find("}}").expect("marker closes");
                let token = &after[..end];
                assert!(TOKENS.contains(&token), "{name} uses unknown token {token}");
                rest = &after[end + 2..];
            }
        }
    }
}
