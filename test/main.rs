// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use odospace::{
    workspace::{
        detect::{self, RequiredPath},
        render::TemplatePlan,
    },
    ProjectOutcome, Workspace,
};

use anyhow::Result;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use simple_txtar::Archive;
use std::{collections::BTreeMap, fs, path::Path};

/// Write a txtar fixture tree into the current (sealed) working directory.
fn materialize(fixture: &str) -> Result<()> {
    let archive = Archive::from(fixture);
    for file in archive.iter() {
        let path = Path::new(&file.name);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &file.content)?;
    }

    Ok(())
}

/// Fully resolvable project in the dir-name-guess scenario: no odoo.conf, a
/// throwaway descriptor, and a local installation root with a matching
/// versioned subdirectory.
const ACME_FIXTURE: &str = "\
-- base/acme-18/acme-18.code-workspace --
{}
-- base/acme-18/venv/.keep --
-- base/acme-18/custom_addons/.keep --
-- odoos/18.0/odoo/.keep --
-- odoos/18.0/enterprise/.keep --
";

fn update_acme() -> Result<Workspace> {
    let workspaces = Workspace::discover("base");
    assert_eq!(workspaces.len(), 1);
    let workspace = workspaces.into_iter().next().unwrap();

    let resolvers = detect::default_resolvers("odoos");
    let profile = detect::resolve_profile(&workspace, &resolvers);
    assert_eq!(detect::missing_paths(&profile), vec![]);
    assert_eq!(profile.odoo_version.as_deref(), Some("18.0"));

    workspace.update(&profile)?;
    Ok(workspace)
}

fn generated_files(workspace: &Workspace) -> Vec<std::path::PathBuf> {
    let root = workspace.root();
    vec![
        workspace.descriptor().to_path_buf(),
        root.join(".vscode/launch.json"),
        root.join(".vscode/tasks.json"),
        root.join(".vscode/keybindings.json"),
        root.join(".vscode/.pylintrc"),
        root.join("update-path.sh"),
        root.join("list-modules.sh"),
        root.join("update-config.sh"),
    ]
}

#[sealed_test]
fn empty_base_folder_performs_no_work() {
    assert!(Workspace::discover("missing-base").is_empty());
}

#[sealed_test(env = [("USER", "blah")])]
fn dir_name_guess_scenario_writes_full_template_set() -> Result<()> {
    materialize(ACME_FIXTURE)?;
    let workspace = update_acme()?;

    for path in generated_files(&workspace) {
        assert!(path.is_file(), "{} was not written", path.display());
        let contents = fs::read_to_string(&path)?;
        assert!(
            !contents.contains("{{"),
            "{} still carries a placeholder",
            path.display()
        );
    }

    // The config refresh helper generates odoo.conf when it is absent.
    let conf = fs::read_to_string(workspace.root().join("odoo.conf"))?;
    assert!(conf.contains("addons_path"));
    Ok(())
}

#[cfg(unix)]
#[sealed_test(env = [("USER", "blah")])]
fn helper_scripts_receive_executable_bit() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    materialize(ACME_FIXTURE)?;
    let workspace = update_acme()?;

    for script in ["update-path.sh", "list-modules.sh", "update-config.sh"] {
        let mode = fs::metadata(workspace.root().join(script))?.permissions().mode();
        assert_eq!(mode & 0o111, 0o111, "{script} is not executable");
    }
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn repeated_runs_are_byte_identical() -> Result<()> {
    materialize(ACME_FIXTURE)?;
    let workspace = update_acme()?;

    let snapshot: BTreeMap<_, _> = generated_files(&workspace)
        .into_iter()
        .map(|path| {
            let contents = fs::read(&path).expect("generated file readable");
            (path, contents)
        })
        .collect();

    let workspace = update_acme()?;
    for path in generated_files(&workspace) {
        assert_eq!(
            fs::read(&path)?,
            snapshot[&path],
            "{} changed between runs",
            path.display()
        );
    }
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn existing_framework_configuration_is_preserved() -> Result<()> {
    materialize(ACME_FIXTURE)?;
    let original = "[options]\naddons_path = /hand/crafted/by/operator\n";
    fs::write("base/acme-18/odoo.conf", original)?;

    let workspaces = Workspace::discover("base");
    let workspace = workspaces.into_iter().next().unwrap();

    // The hand-written conf lacks a framework addons entry, so resolution
    // falls through to the dir-name guess and the project still updates.
    let resolvers = detect::default_resolvers("odoos");
    let profile = detect::resolve_profile(&workspace, &resolvers);
    assert_eq!(detect::missing_paths(&profile), vec![]);
    workspace.update(&profile)?;

    assert_eq!(fs::read_to_string("base/acme-18/odoo.conf")?, original);
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn unresolved_project_is_skipped_without_writes() -> Result<()> {
    materialize(
        "\
-- base/mystery/mystery.code-workspace --
{}
-- base/mystery/venv/.keep --
",
    )?;

    let workspaces = Workspace::discover("base");
    let workspace = workspaces.into_iter().next().unwrap();

    let resolvers = detect::default_resolvers("odoos");
    let outcome = workspace.process(&resolvers, false)?;

    assert_eq!(
        outcome,
        ProjectOutcome::Skipped(vec![RequiredPath::Odoo, RequiredPath::CustomAddons])
    );
    assert!(!workspace.root().join(".vscode").exists());
    assert!(!workspace.root().join("update-config.sh").exists());
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn dry_run_resolves_without_writes_or_processes() -> Result<()> {
    materialize(ACME_FIXTURE)?;

    let workspaces = Workspace::discover("base");
    let workspace = workspaces.into_iter().next().unwrap();
    let before = fs::read(workspace.descriptor())?;

    let resolvers = detect::default_resolvers("odoos");
    let outcome = workspace.process(&resolvers, true)?;

    let ProjectOutcome::DryRun(profile) = outcome else {
        panic!("expected a dry-run outcome, got {outcome:?}");
    };
    assert_eq!(profile.odoo_version.as_deref(), Some("18.0"));

    // Nothing written, nothing spawned: the descriptor is untouched and the
    // config refresh helper never existed to produce an odoo.conf.
    assert_eq!(fs::read(workspace.descriptor())?, before);
    assert!(!workspace.root().join(".vscode").exists());
    assert!(!workspace.root().join("update-config.sh").exists());
    assert!(!workspace.root().join("odoo.conf").exists());
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn conf_heuristic_wins_without_fallthrough() -> Result<()> {
    materialize(
        "\
-- base/legacy-17/legacy-17.code-workspace --
{ \"folders\": [ { \"path\": \"/opt/odoos/99.0/odoo\" } ] }
-- base/legacy-17/odoo.conf --
addons_path = /opt/odoos/17.0/odoo/addons,/opt/odoos/17.0/enterprise
-- odoos/17.0/odoo/.keep --
",
    )?;

    let workspaces = Workspace::discover("base");
    let workspace = workspaces.into_iter().next().unwrap();

    let resolvers = detect::default_resolvers("odoos");
    let profile = detect::resolve_profile(&workspace, &resolvers);

    assert_eq!(
        profile.odoo_path.as_deref(),
        Some(Path::new("/opt/odoos/17.0/odoo"))
    );
    assert_eq!(
        profile.enterprise_path.as_deref(),
        Some(Path::new("/opt/odoos/17.0/enterprise"))
    );
    assert_eq!(profile.odoo_version.as_deref(), Some("17.0"));
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn descriptor_scan_beats_dir_name_guess() -> Result<()> {
    materialize(
        "\
-- base/acme-18/acme-18.code-workspace --
{ \"folders\": [ { \"path\": \"/opt/odoos/master/odoo\" } ] }
-- odoos/18.0/odoo/.keep --
",
    )?;

    let workspaces = Workspace::discover("base");
    let workspace = workspaces.into_iter().next().unwrap();

    let resolvers = detect::default_resolvers("/opt/odoos");
    let profile = detect::resolve_profile(&workspace, &resolvers);

    assert_eq!(
        profile.odoo_path.as_deref(),
        Some(Path::new("/opt/odoos/master/odoo"))
    );
    assert_eq!(profile.odoo_version.as_deref(), Some("master"));
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn rendered_descriptor_carries_resolved_paths() -> Result<()> {
    materialize(ACME_FIXTURE)?;
    let workspace = update_acme()?;

    let descriptor = fs::read_to_string(workspace.descriptor())?;
    assert!(descriptor.contains("odoos/18.0/odoo"));
    assert!(descriptor.contains("custom_addons"));
    assert!(descriptor.contains("\"acme-18\""));
    Ok(())
}

#[sealed_test(env = [("USER", "blah")])]
fn render_plan_reports_written_paths() -> Result<()> {
    materialize(ACME_FIXTURE)?;

    let workspaces = Workspace::discover("base");
    let workspace = workspaces.into_iter().next().unwrap();
    let resolvers = detect::default_resolvers("odoos");
    let profile = detect::resolve_profile(&workspace, &resolvers);

    let written = TemplatePlan::new(&workspace, &profile).render_all()?;
    assert_eq!(written, generated_files(&workspace));
    Ok(())
}
