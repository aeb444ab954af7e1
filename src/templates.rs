// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Embedded workspace templates.
//!
//! Every file odospace writes into a project comes from a template embedded
//! at compile time out of the top-level `templates/` directory. Templates are
//! plain text peppered with `{{TOKEN}}` placeholders that the rendering pass
//! in [`render`](crate::workspace::render) replaces with values resolved per
//! project. Templates are immutable and shared across all projects in a run.

/// Workspace descriptor template.
///
/// Rendered over the discovered `*.code-workspace` file itself, so the
/// destination name varies per project while every other template lands at a
/// fixed name. Kept out of [`MANIFEST`] for that reason.
pub const WORKSPACE: &str = include_str!("../templates/project.code-workspace");

/// Editor debug-launch configuration.
pub const LAUNCH: &str = include_str!("../templates/launch.json");

/// Editor task-runner configuration.
pub const TASKS: &str = include_str!("../templates/tasks.json");

/// Editor keybinding shortcuts for the generated tasks.
pub const KEYBINDINGS: &str = include_str!("../templates/keybindings.json");

/// Linter rule configuration for pylint-odoo.
pub const PYLINTRC: &str = include_str!("../templates/pylintrc");

/// Helper script refreshing PATH/PYTHONPATH hints.
pub const UPDATE_PATH: &str = include_str!("../templates/update-path.sh");

/// Helper script listing installable modules.
pub const LIST_MODULES: &str = include_str!("../templates/list-modules.sh");

/// Helper script regenerating odoo.conf when missing.
pub const UPDATE_CONFIG: &str = include_str!("../templates/update-config.sh");

/// One fixed-name output of the rendering pass.
#[derive(Clone, Copy, Debug)]
pub struct TemplateSpec {
    /// Destination path relative to the project root.
    pub destination: &'static str,

    /// Template text to render.
    pub contents: &'static str,

    /// Whether the written file receives the executable bit.
    pub executable: bool,
}

/// All fixed-name outputs, in write order.
pub const MANIFEST: &[TemplateSpec] = &[
    TemplateSpec {
        destination: ".vscode/launch.json",
        contents: LAUNCH,
        executable: false,
    },
    TemplateSpec {
        destination: ".vscode/tasks.json",
        contents: TASKS,
        executable: false,
    },
    TemplateSpec {
        destination: ".vscode/keybindings.json",
        contents: KEYBINDINGS,
        executable: false,
    },
    TemplateSpec {
        destination: ".vscode/.pylintrc",
        contents: PYLINTRC,
        executable: false,
    },
    TemplateSpec {
        destination: "update-path.sh",
        contents: UPDATE_PATH,
        executable: true,
    },
    TemplateSpec {
        destination: "list-modules.sh",
        contents: LIST_MODULES,
        executable: true,
    },
    TemplateSpec {
        destination: "update-config.sh",
        contents: UPDATE_CONFIG,
        executable: true,
    },
];
