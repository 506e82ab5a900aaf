use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shells out to `git` for operations that must honour the user's own git
/// setup (hooks, commit signing, identity).
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    /// Commit whatever is currently in the index.
    pub fn commit(&self, message: &str) -> Result<()> {
        let output = Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(&self.workdir)
            .output()
            .context("Failed to run git commit")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git commit failed: {}", stderr.trim());
        }
        Ok(())
    }
}
