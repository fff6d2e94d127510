use super::GitClientError;
use async_trait::async_trait;
use pkgsource_api::CommitId;
use std::env;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{instrument, trace};

// Inherited overrides would point every command at the caller's repository.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

/// The subset of git the loaders depend on.
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Whether the directory is inside a git working copy.
    async fn is_repository(&self, dir: &Path) -> Result<bool, GitClientError>;

    /// The revision `HEAD` resolves to in a local working copy.
    async fn current_revision(&self, dir: &Path) -> Result<CommitId, GitClientError>;

    /// Raw `ls-remote` output for the `HEAD` reference of a remote,
    /// in the form `<hash>\tHEAD`.
    async fn list_remote_head(&self, url: &str) -> Result<String, GitClientError>;
}

struct GitOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// A [`GitClient`] that shells out to the git binary.
#[derive(Clone, Debug)]
pub struct GitCli {
    pub bin: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new<T: AsRef<str>>(bin: T) -> Self {
        Self {
            bin: bin.as_ref().to_owned(),
        }
    }

    fn format_command(&self, args: &[&str]) -> String {
        format!("{} {}", self.bin, args.join(" "))
    }

    async fn exec(&self, dir: Option<&Path>, args: &[&str]) -> Result<GitOutput, GitClientError> {
        let mut command = Command::new(&self.bin);
        command.args(args);

        for key in GIT_ENV_OVERRIDES {
            command.env_remove(key);
        }

        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        trace!(command = self.format_command(args), dir = ?dir, "Running git");

        let output = command
            .output()
            .await
            .map_err(|error| GitClientError::Spawn {
                command: self.format_command(args),
                error: Box::new(error),
            })?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }

    async fn exec_checked(
        &self,
        dir: Option<&Path>,
        args: &[&str],
    ) -> Result<String, GitClientError> {
        let output = self.exec(dir, args).await?;

        if !output.success {
            return Err(GitClientError::Failed {
                command: self.format_command(args),
                dir: match dir {
                    Some(dir) => dir.to_path_buf(),
                    None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
                },
                stderr: output.stderr,
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl GitClient for GitCli {
    #[instrument(skip(self))]
    async fn is_repository(&self, dir: &Path) -> Result<bool, GitClientError> {
        if !dir.is_dir() {
            return Ok(false);
        }

        let output = self
            .exec(Some(dir), &["rev-parse", "--is-inside-work-tree"])
            .await?;

        Ok(output.success && output.stdout.trim() == "true")
    }

    #[instrument(skip(self))]
    async fn current_revision(&self, dir: &Path) -> Result<CommitId, GitClientError> {
        let stdout = self.exec_checked(Some(dir), &["rev-parse", "HEAD"]).await?;

        Ok(CommitId::raw(stdout.trim()))
    }

    #[instrument(skip(self))]
    async fn list_remote_head(&self, url: &str) -> Result<String, GitClientError> {
        self.exec_checked(None, &["ls-remote", url, "HEAD"]).await
    }
}
