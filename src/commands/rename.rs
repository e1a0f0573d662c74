use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use ue_renamer::defaults;
use ue_renamer::generator::{EngineInstall, EngineVersion};
use ue_renamer::pipeline::RunStatus;
use ue_renamer::renamer::{self, RenameOptions, RunReport};
use ue_renamer::{Error, ProjectContext};

use crate::commands::CmdResult;
use crate::output::EXIT_RETRYABLE;
use crate::tty;

#[derive(Args)]
pub struct RenameArgs {
    /// Project root (the folder holding the .uproject file)
    pub root: PathBuf,
    /// New project name
    #[arg(long)]
    pub name: String,
    /// Folder under Source/ holding the primary C++ module (default: the
    /// module named in the .uproject file)
    #[arg(long)]
    pub module: Option<String>,
    /// Skip the timestamped backup copy of every edited file
    #[arg(long)]
    pub no_backup: bool,
    /// Delete Saved/, Intermediate/ and Binaries/ after renaming
    #[arg(long)]
    pub clean: bool,
    /// Delete stale .sln files after renaming
    #[arg(long)]
    pub delete_solution: bool,
    /// Engine install used to regenerate project files
    #[arg(long, requires = "engine_version")]
    pub engine_dir: Option<PathBuf>,
    /// Engine major version (4 or 5)
    #[arg(long, requires = "engine_dir")]
    pub engine_version: Option<u8>,
    /// Config file (default: <root>/ue-renamer.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Confirm that files may be rewritten in place
    #[arg(long)]
    pub yes: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutput {
    pub command: &'static str,
    pub attempts: usize,
    #[serde(flatten)]
    pub report: RunReport,
}

pub fn run(args: RenameArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenameOutput> {
    if !args.yes {
        return Err(Error::validation_missing_argument(vec!["--yes".to_string()])
            .with_hint("Renaming rewrites project files in place and cannot be undone automatically")
            .with_hint("Commit or copy the project first, then re-run with --yes"));
    }

    let config = defaults::load(args.config.as_deref(), &args.root)?;
    let engine = match (args.engine_dir, args.engine_version) {
        (Some(dir), Some(major)) => Some(EngineInstall::new(dir, EngineVersion::from_major(major)?)),
        _ => None,
    };
    let options = RenameOptions {
        backup: !args.no_backup,
        clean_cache: args.clean,
        delete_solution: args.delete_solution,
        engine,
    };

    let mut module = args.module;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let ctx = ProjectContext::discover(&args.root, &args.name, module.as_deref(), &config)?;
        let report = renamer::run(ctx, &options, &config);

        if report.retryable && tty::require_tty_for_interactive() {
            let answer = tty::prompt(
                "Enter the EXACT name of the folder containing the C++ source files (blank to stop): ",
            )?;
            if !answer.is_empty() {
                module = Some(answer);
                continue;
            }
        }

        let exit_code = exit_code_for(&report);
        return Ok((
            RenameOutput {
                command: "rename",
                attempts,
                report,
            },
            exit_code,
        ));
    }
}

fn exit_code_for(report: &RunReport) -> i32 {
    match report.status {
        RunStatus::Success | RunStatus::PartialSuccess => 0,
        RunStatus::Retryable => EXIT_RETRYABLE,
        RunStatus::Failed => {
            let generator_failed = report.stages.iter().any(|stage| {
                stage
                    .error_code
                    .as_deref()
                    .is_some_and(|code| code.starts_with("generator."))
            });
            if generator_failed {
                20
            } else {
                1
            }
        }
    }
}
