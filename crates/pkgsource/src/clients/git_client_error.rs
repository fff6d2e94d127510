use miette::Diagnostic;
use starbase_styles::{Style, Stylize};
use std::path::PathBuf;
use thiserror::Error;

/// Git command errors.
#[derive(Debug, Diagnostic, Error)]
pub enum GitClientError {
    #[diagnostic(
        code(source::git::spawn_failed),
        help = "Is git installed and available on PATH?"
    )]
    #[error("Failed to execute {}.", .command.style(Style::Shell))]
    Spawn {
        command: String,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(code(source::git::command_failed))]
    #[error(
        "Command {} failed in {}: {}",
        .command.style(Style::Shell),
        .dir.style(Style::Path),
        .stderr.style(Style::MutedLight),
    )]
    Failed {
        command: String,
        dir: PathBuf,
        stderr: String,
    },
}
