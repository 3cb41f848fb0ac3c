//! Thin wrapper around spawning the `git` binary and capturing its output.
//! Everything here is argv construction and exit-status plumbing, not git
//! semantics.

use crate::error::ChildProcessError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Launches `git` with a given argv inside a working directory and
/// captures stdout/stderr.
pub struct ChildRunner {
    workdir: PathBuf,
}

impl ChildRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Runs `git <args>` and returns captured stdout as UTF-8 (lossily,
    /// since file paths are not guaranteed valid UTF-8 but porcelain output
    /// is trusted to be well-formed in the common case).
    pub fn run_capture(&self, args: &[&str]) -> Result<String, ChildProcessError> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs `git <args>`, inheriting stdin/stdout/stderr (used for
    /// `commit`, which hands the terminal to `$EDITOR`).
    pub fn run_inherited(&self, args: &[&str]) -> Result<(), ChildProcessError> {
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .status()
            .map_err(|e| ChildProcessError::Spawn(args.join(" "), e))?;

        if !status.success() {
            return Err(ChildProcessError::NonZeroExit {
                args: args.join(" "),
                status,
                stderr: String::new(),
            });
        }
        Ok(())
    }

    fn run_checked(&self, args: &[&str]) -> Result<std::process::Output, ChildProcessError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| ChildProcessError::Spawn(args.join(" "), e))?;

        if !output.status.success() {
            return Err(ChildProcessError::NonZeroExit {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output)
    }

    pub fn stage(&self, paths: &[PathBuf]) -> Result<(), ChildProcessError> {
        let mut args = vec!["add", "--"];
        let path_strs: Vec<String> = paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        args.extend(path_strs.iter().map(String::as_str));
        self.run_checked(&args).map(|_| ())
    }

    pub fn unstage(&self, paths: &[PathBuf]) -> Result<(), ChildProcessError> {
        let mut args = vec!["reset", "HEAD", "--"];
        let path_strs: Vec<String> = paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        args.extend(path_strs.iter().map(String::as_str));
        self.run_checked(&args).map(|_| ())
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<(), ChildProcessError> {
        self.run_checked(&["push", remote, branch]).map(|_| ())
    }

    pub fn commit(&self) -> Result<(), ChildProcessError> {
        self.run_inherited(&["commit"])
    }

    pub fn status_porcelain_v2(&self) -> Result<String, ChildProcessError> {
        self.run_capture(&["status", "--branch", "--porcelain=v2"])
    }

    pub fn branch_listing(&self) -> Result<String, ChildProcessError> {
        self.run_capture(&[
            "branch",
            "--format=%(if)%(HEAD)%(then)+%(else)-%(end)\t%(objectname)\t%(refname)\t%(contents:subject)\t%(upstream)",
        ])
    }

    pub fn head_summary_fallback(&self) -> Result<String, ChildProcessError> {
        self.run_capture(&["log", "-1", "--format=%h %s"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use tempfile::tempdir;

    fn init_repo() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let run = |args: &[&str]| {
            StdCommand::new("git")
                .args(args)
                .current_dir(dir.path())
                .output()
                .unwrap();
        };
        run(&["init", "-q"]);
        run(&["config", "user.email", "test@example.com"]);
        run(&["config", "user.name", "Test"]);
        dir
    }

    #[test]
    fn status_porcelain_v2_reports_untracked_file() {
        let dir = init_repo();
        std::fs::write(dir.path().join("new.txt"), "hi").unwrap();

        let runner = ChildRunner::new(dir.path());
        let out = runner.status_porcelain_v2().unwrap();
        assert!(out.contains("? new.txt"));
    }

    #[test]
    fn stage_then_status_shows_added() {
        let dir = init_repo();
        std::fs::write(dir.path().join("new.txt"), "hi").unwrap();
        let runner = ChildRunner::new(dir.path());
        runner.stage(&[PathBuf::from("new.txt")]).unwrap();

        let out = runner.status_porcelain_v2().unwrap();
        assert!(out.contains("1 A."));
    }
}
