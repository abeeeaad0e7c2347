pub mod loader;
pub mod runner;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError, ExtractPlan};
pub use runner::{run_plan, RunError, TargetResult};
pub use schema::{
    ExtractConfig, Metadata, TargetDefinition, ValidationError, ValidationIssue,
};
