// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use odospace::{
    default_install_root, default_projects_dir,
    workspace::detect::{self, InstallResolver},
    ProjectOutcome, Workspace,
};

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use std::{path::PathBuf, process::exit};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  odospace [options] [base_folder]",
    version
)]
struct Cli {
    /// Base folder to scan for workspace descriptors.
    #[arg(value_name = "base_folder")]
    pub base_folder: Option<String>,

    /// Skip the interactive confirmation prompt.
    #[arg(short = 'y', long)]
    pub assume_yes: bool,

    /// Print resolved profiles without writing anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Cli {
    fn run(self) -> Result<()> {
        let base = match &self.base_folder {
            Some(raw) => PathBuf::from(shellexpand::full(raw)?.into_owned()),
            None => default_projects_dir()?,
        };

        let workspaces = Workspace::discover(&base);
        if workspaces.is_empty() {
            info!(
                "no workspace descriptors found under {}, nothing to do",
                base.display()
            );
            return Ok(());
        }

        info!("discovered {} workspace(s):", workspaces.len());
        for workspace in &workspaces {
            info!("  {}", workspace.descriptor().display());
        }

        if !self.assume_yes && !self.dry_run {
            let confirmed = Confirm::new(&format!("update {} workspace(s)?", workspaces.len()))
                .with_default(false)
                .prompt()?;
            if !confirmed {
                info!("aborted, nothing touched");
                return Ok(());
            }
        }

        let resolvers: Vec<Box<dyn InstallResolver>> =
            detect::default_resolvers(default_install_root());

        let bar = ProgressBar::new(workspaces.len() as u64);
        let style = ProgressStyle::with_template(
            "{elapsed_precise:.green}  {msg:<30}  [{wide_bar:.yellow/blue}] {pos}/{len}",
        )?
        .progress_chars("-Cco.");
        bar.set_style(style);

        let mut updated = 0usize;
        let mut skipped = 0usize;
        for workspace in &workspaces {
            bar.set_message(workspace.name().to_string());
            match workspace.process(&resolvers, self.dry_run)? {
                ProjectOutcome::Skipped(missing) => {
                    let categories = missing
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    bar.suspend(|| {
                        warn!("skipping {}: missing {categories}", workspace.name());
                    });
                    skipped += 1;
                }
                ProjectOutcome::DryRun(profile) => {
                    bar.suspend(|| {
                        println!("# {}\n{profile}", workspace.name());
                    });
                    updated += 1;
                }
                ProjectOutcome::Updated(_) => updated += 1,
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        let verb = if self.dry_run { "resolved" } else { "updated" };
        info!("workspace update complete: {updated} {verb}, {skipped} skipped");

        Ok(())
    }
}

fn main() {
    let layer = fmt::layer().compact();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry().with(layer).with(filter).init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
