use clap::Args;
use std::path::PathBuf;

use ue_renamer::context::{self, ProjectInspection};
use ue_renamer::defaults;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct InspectArgs {
    /// Project root (the folder holding the .uproject file)
    pub root: PathBuf,
    /// Config file (default: <root>/ue-renamer.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: InspectArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ProjectInspection> {
    let config = defaults::load(args.config.as_deref(), &args.root)?;
    let inspection = context::inspect(&args.root, &config)?;
    Ok((inspection, 0))
}
