pub type CmdResult<T> = ue_renamer::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod inspect;
pub mod rename;
pub mod validate_name;

macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (ue_renamer::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Inspect(args) => dispatch!(args, global, inspect),
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::ValidateName(args) => dispatch!(args, global, validate_name),
    }
}
