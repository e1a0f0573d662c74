use clap::Args;
use serde::Serialize;

use ue_renamer::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ValidateNameArgs {
    /// Candidate project name
    pub name: String,
}

#[derive(Serialize)]
pub struct ValidateNameOutput {
    pub name: String,
    pub valid: bool,
}

pub fn run(args: ValidateNameArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ValidateNameOutput> {
    validation::project_name(&args.name)?;
    Ok((
        ValidateNameOutput {
            name: args.name,
            valid: true,
        },
        0,
    ))
}
