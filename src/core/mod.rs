//! Engine core — rule database, variable expansion, build orchestration,
//! recipe execution.

pub mod builder;
pub mod error;
pub mod executor;
pub mod parser;
pub mod rules;
pub mod types;
pub mod vars;

pub use builder::Builder;
pub use error::MakeError;
pub use types::{Disposition, Rule};

use self::rules::RuleStore;
use self::vars::VarStore;
use serde::Serialize;

/// The build-engine context: every rule and variable binding parsed from one
/// makefile. Created at startup and dropped at process exit; the builder
/// borrows it read-only for the duration of a run.
#[derive(Debug, Default, Serialize)]
pub struct Makefile {
    pub vars: VarStore,
    pub rules: RuleStore,
}
