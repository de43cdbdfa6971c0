use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use crate::format::Format;
use crate::locate::{Locator, Resolved};
use crate::tasks::Job;

/// Configuration for a batch.
pub(crate) struct Config {
    pub(crate) dir: PathBuf,
    pub(crate) dry_run: bool,
    pub(crate) verbose: bool,
    pub(crate) yes: bool,
    pub(crate) locator: Locator,
    pub(crate) paper_size: String,
    pub(crate) output_profile: String,
}

impl Config {
    /// Find books in the configured directory.
    ///
    /// Only the directory itself is scanned, hidden files are ignored and the
    /// result is sorted by file name.
    pub(crate) fn discover(&self) -> Result<Vec<Job>> {
        let mut jobs = Vec::new();

        let walk = WalkBuilder::new(&self.dir)
            .standard_filters(false)
            .hidden(true)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walk {
            let entry = entry.with_context(|| format!("Scanning {}", self.dir.display()))?;

            let path = entry.path();

            // Follows symlinks, a dangling link is not a book.
            if !path.is_file() {
                continue;
            }

            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };

            if Format::from_ext(ext) != Some(Format::INPUT) {
                continue;
            }

            jobs.push(Job::new(path.to_path_buf()));
        }

        Ok(jobs)
    }

    /// Build the command converting a single book.
    pub(crate) fn command(&self, converter: &Resolved, job: &Job) -> Command {
        let mut cmd = converter.command();
        cmd.arg(&job.from_path);
        cmd.arg(&job.to_path);
        cmd.args(["--paper-size", self.paper_size.as_str()]);
        cmd.arg("--pdf-page-numbers");
        cmd.args(["--output-profile", self.output_profile.as_str()]);
        cmd.arg("--embed-all-fonts");
        cmd
    }
}
