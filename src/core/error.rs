//! Error taxonomy for the build engine.
//!
//! Every kind maps to exit code 2 at the top level. The engine itself never
//! terminates the process: errors travel up the call chain as values and
//! `main` prints the single diagnostic line.

use thiserror::Error;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum MakeError {
    /// A `$(` or `${` reference with no closing delimiter.
    #[error("Unterminated variable reference in '{text}'")]
    UnterminatedReference { text: String },

    /// The requested makefile does not exist.
    #[error("{path}: No such file or directory")]
    MakefileNotFound { path: String },

    /// The makefile exists but could not be read.
    #[error("cannot read {path}: {source}")]
    MakefileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A requested target has neither a rule nor an existing file.
    #[error("No rule to make target '{target}'")]
    MissingRule { target: String },

    /// A dependency has neither a rule nor an existing file.
    #[error("No rule to make target '{target}', needed by '{required_by}'")]
    MissingDependency { target: String, required_by: String },

    /// A target was revisited while still resolving its own dependencies.
    #[error("Circular dependency detected for target '{target}'")]
    CircularDependency { target: String },

    /// A recipe line exited non-zero.
    #[error("recipe for target '{target}' failed: exit code {code}")]
    RecipeFailed { target: String, code: i32 },

    /// A recipe line was terminated by a signal.
    #[error("recipe for target '{target}' terminated by signal")]
    RecipeSignaled { target: String },

    /// The shell for a recipe line could not be spawned.
    #[error("failed to spawn shell for target '{target}': {source}")]
    SpawnFailed {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// No makefile was found and nothing was asked for.
    #[error("No targets specified and no makefile found")]
    NoMakefileFound,

    /// The makefile defines no buildable rule to use as a default.
    #[error("No targets")]
    NoTargets,

    /// Empty strings are not valid arguments.
    #[error("empty string invalid as argument")]
    EmptyArgument,

    /// Diagnostic output could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
