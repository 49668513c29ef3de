//! Version control client for querying the local git repository.
//!
//! All repository state (tags, commit subjects, changelog diffs, tracked
//! files) is read through the narrow [`VersionControlClient`] trait so the
//! resolvers can be tested against a mock instead of a real repository. The
//! production implementation shells out to the `git` executable with
//! blocking subprocess calls.
use log::*;
use std::path::PathBuf;
use std::process::Command;

use crate::{error::HeraldError, result::Result};

/// Narrow interface over the version control queries the tool needs.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControlClient {
    /// List tags matching `pattern`, sorted by refname ascending.
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;

    /// Resolve a revision to its single commit hash.
    fn rev_list_single(&self, rev: &str) -> Result<String>;

    /// Commit subject lines at `rev`, skipping `skip` commits first.
    fn log_subject(&self, rev: &str, skip: u32) -> Result<Vec<String>>;

    /// Zero-context unified diff of `path` between `rev` and the working
    /// tree, as raw non-empty lines.
    fn diff_file(&self, rev: &str, path: &str) -> Result<Vec<String>>;

    /// Tracked files matching a glob `pattern`, relative to the repo root.
    fn list_files(&self, pattern: &str) -> Result<Vec<String>>;
}

/// [`VersionControlClient`] backed by the system `git` executable.
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    /// Create a client operating on the repository at `repo_path`.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        debug!("running: git {}", args.join(" "));

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .args(args)
            .output()
            .map_err(|err| {
                HeraldError::git_failed(args.join(" "), err.to_string())
            })?;

        if !output.status.success() {
            let stderr =
                String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(
                HeraldError::git_failed(args.join(" "), stderr).into()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_lines(&self, args: &[&str]) -> Result<Vec<String>> {
        Ok(non_empty_lines(&self.run(args)?))
    }
}

/// Split command output into lines, dropping empty ones.
fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

impl VersionControlClient for GitCli {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        self.run_lines(&["tag", "-l", "--sort=refname", pattern])
    }

    fn rev_list_single(&self, rev: &str) -> Result<String> {
        Ok(self.run(&["rev-list", "-n", "1", rev])?.trim().to_string())
    }

    fn log_subject(&self, rev: &str, skip: u32) -> Result<Vec<String>> {
        let skip = skip.to_string();
        self.run_lines(&[
            "log",
            rev,
            "--skip",
            &skip,
            "-n",
            "1",
            "--pretty=tformat:%s",
        ])
    }

    fn diff_file(&self, rev: &str, path: &str) -> Result<Vec<String>> {
        self.run_lines(&["diff", "-U0", rev, "--", path])
    }

    fn list_files(&self, pattern: &str) -> Result<Vec<String>> {
        self.run_lines(&["ls-files", pattern])
    }
}
