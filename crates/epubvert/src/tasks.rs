use core::fmt;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::format::Format;

/// A book found while scanning, paired with the file it converts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Job {
    pub(crate) from_path: PathBuf,
    pub(crate) to_path: PathBuf,
}

impl Job {
    /// Pair a discovered book with its output, which lives next to it with the
    /// extension swapped.
    pub(crate) fn new(from_path: PathBuf) -> Self {
        let to_path = from_path.with_extension(Format::OUTPUT.ext());

        Self { from_path, to_path }
    }

    #[inline]
    pub(crate) fn from_name(&self) -> Name<'_> {
        Name(&self.from_path)
    }

    #[inline]
    pub(crate) fn to_name(&self) -> Name<'_> {
        Name(&self.to_path)
    }
}

/// Displays the file name of a path.
pub(crate) struct Name<'a>(&'a Path);

impl fmt::Display for Name<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0.file_name().unwrap_or(OsStr::new(""));
        write!(f, "{}", name.to_string_lossy())
    }
}

/// How processing a single book ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The user declined.
    Skipped,
    /// The converter could not be found or is broken.
    ToolUnavailable,
    /// The converter failed or could not be run.
    ConversionFailed,
    /// The converter reported success.
    Converted,
    /// The command was printed but not run.
    DryRun,
}

/// Tally of outcomes over a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) skipped: usize,
    pub(crate) unavailable: usize,
    pub(crate) failed: usize,
    pub(crate) converted: usize,
    pub(crate) dry_run: usize,
}

impl Summary {
    pub(crate) fn record(&mut self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Skipped => &mut self.skipped,
            Outcome::ToolUnavailable => &mut self.unavailable,
            Outcome::ConversionFailed => &mut self.failed,
            Outcome::Converted => &mut self.converted,
            Outcome::DryRun => &mut self.dry_run,
        };

        *counter += 1;
    }

    #[inline]
    pub(crate) fn total(&self) -> usize {
        self.skipped + self.unavailable + self.failed + self.converted + self.dry_run
    }

    #[inline]
    pub(crate) fn has_errors(&self) -> bool {
        self.unavailable > 0 || self.failed > 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped, {} failed",
            self.converted,
            self.skipped,
            self.failed + self.unavailable
        )?;

        if self.unavailable > 0 {
            write!(f, " ({} without a working converter)", self.unavailable)?;
        }

        if self.dry_run > 0 {
            write!(f, ", {} would be converted (dry run)", self.dry_run)?;
        }

        Ok(())
    }
}
