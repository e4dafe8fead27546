//! Ambient environment discovery
//!
//! The generator needs three facts from its surroundings: where the tool
//! itself is installed (base addon catalog), where the configuration tree
//! lives, and the version-control remote of that tree (last-resort
//! repository URL). All three are resolved once, up front; any failure is
//! fatal for the whole run.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("unable to determine install location: {0}")]
    InstallDir(#[source] io::Error),

    #[error("unable to determine working directory: {0}")]
    WorkingDir(#[source] io::Error),

    #[error("unable to run git: {0}")]
    Git(#[source] io::Error),

    #[error("unable to determine git remote url: {0}")]
    GitRemote(String),
}

/// Resolved ambient facts for one invocation.
#[derive(Debug, Clone)]
pub struct EnvContext {
    /// Install directory of the tool; holds the bundled addon catalog.
    pub base_path: PathBuf,
    /// Root of the configuration tree.
    pub repo_path: PathBuf,
    /// Remote URL of the configuration tree's repository.
    pub repo_url: String,
}

impl EnvContext {
    /// Discover the ambient context, rooting the tree at `root` when given
    /// and at the current working directory otherwise.
    pub fn discover(root: Option<&Path>) -> Result<Self, ContextError> {
        let base_path = std::env::current_exe()
            .map_err(ContextError::InstallDir)?
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                ContextError::InstallDir(io::Error::new(
                    io::ErrorKind::NotFound,
                    "executable has no parent directory",
                ))
            })?;

        let repo_path = match root {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().map_err(ContextError::WorkingDir)?,
        };

        let repo_url = git_remote_url(&repo_path)?;

        Ok(Self {
            base_path,
            repo_path,
            repo_url,
        })
    }
}

fn git_remote_url(repo_path: &Path) -> Result<String, ContextError> {
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .current_dir(repo_path)
        .output()
        .map_err(ContextError::Git)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ContextError::GitRemote(if stderr.is_empty() {
            format!("git exited with {}", output.status)
        } else {
            stderr
        }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
