// Public modules
pub mod backup;
pub mod context;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod generator;
pub mod housekeeping;
pub mod ini;
pub mod patcher;
pub mod pipeline;
pub mod project_config;
pub mod renamer;
pub mod source_module;
pub mod targets;

// Re-export common types for convenience
pub use context::{ProjectContext, ProjectInspection};
pub use error::{Error, ErrorCode, Result};
pub use events::{EventLog, Outcome, StatusEvent};
pub use renamer::{RenameOptions, RunReport};
