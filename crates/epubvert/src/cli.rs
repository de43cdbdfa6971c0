use core::cell::Cell;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::config::Config;
use crate::format::Format;
use crate::launch::{Launcher, System};
use crate::locate::{self, Locator};
use crate::out::{Colors, Out, blank, error, info, warn};
use crate::prompt::{self, Answer};
use crate::shell::{self, FormatCommand};
use crate::tasks::{Job, Outcome, Summary};

const RULE: &str = "------------------------------";

/// Interactively convert a directory of e-books to PDF.
#[derive(Parser)]
pub struct Epubvert {
    /// If set, every book is converted without asking.
    #[arg(short = 'y', long)]
    yes: bool,
    /// If set, prints the conversion commands without running them. The
    /// converter is still checked.
    #[arg(short = 'D', long)]
    dry_run: bool,
    /// If set, prints full paths in commands and the output of successful
    /// conversions.
    #[arg(short = 'v', long)]
    verbose: bool,
    /// Path to the `ebook-convert` binary to use.
    ///
    /// By default the calibre installation path on macOS is tried first,
    /// followed by `ebook-convert` in PATH.
    #[arg(long, value_name = "PATH")]
    converter: Option<PathBuf>,
    /// Paper size of the produced documents.
    #[arg(long, default_value = "a4")]
    paper_size: String,
    /// Output profile passed to the converter.
    #[arg(long, default_value = "tablet")]
    output_profile: String,
    /// Directory to scan for books [default: current directory].
    path: Option<PathBuf>,
}

/// Entry for `epubvert`.
///
/// See [`crate`] documentation.
pub fn entry(opts: &Epubvert) -> Result<()> {
    // Current indentation level for output.
    let indent = Cell::new(0);

    let locator = match &opts.converter {
        Some(path) => Locator::explicit(path.clone()),
        None => Locator::default(),
    };

    let config = Config {
        dir: opts.path.clone().unwrap_or_else(|| PathBuf::from(".")),
        dry_run: opts.dry_run,
        verbose: opts.verbose,
        yes: opts.yes,
        locator,
        paper_size: opts.paper_size.clone(),
        output_profile: opts.output_profile.clone(),
    };

    let cols = Colors::new();

    let o = StandardStream::stdout(ColorChoice::Auto);
    let mut o = o.lock();
    let mut o = Out::new(config.verbose, &indent, &cols, &mut o);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    run(&mut o, &config, &mut input, &mut System)?;
    Ok(())
}

/// Process every book in the configured directory.
fn run(
    o: &mut Out<'_>,
    config: &Config,
    input: &mut dyn BufRead,
    launcher: &mut dyn Launcher,
) -> Result<Summary> {
    let mut summary = Summary::default();

    info!(o, "Converting {} to {}", Format::INPUT.name(), Format::OUTPUT.name());

    {
        let mut o = o.indent(1);
        blank!(o, "Conversions are performed by calibre's {}.", locate::SEARCHED);
        blank!(o, "Download calibre from https://calibre-ebook.com/download");
    }

    blank!(o, "{}", RULE);

    let dir = config.dir.canonicalize().unwrap_or_else(|_| config.dir.clone());
    let jobs = config.discover()?;

    if jobs.is_empty() {
        warn!(
            o,
            "No .{} files found in {}",
            Format::INPUT.ext(),
            shell::escape(dir.as_os_str())
        );
        return Ok(summary);
    }

    info!(o, "Found {} book(s) in {}", jobs.len(), shell::escape(dir.as_os_str()));

    {
        let mut o = o.indent(1);

        for (n, job) in jobs.iter().enumerate() {
            blank!(o, "{}. {}", n + 1, job.from_name());
        }
    }

    blank!(o, "{}", RULE);

    for job in &jobs {
        let answer = if config.yes {
            Answer::Yes
        } else {
            let question = format!("Convert '{}' to {}?", job.from_name(), Format::OUTPUT.name());

            match prompt::ask(o, input, &question)? {
                Some(answer) => answer,
                None => {
                    warn!(o, "Input closed, not converting any more books");
                    break;
                }
            }
        };

        let outcome = match answer {
            Answer::Yes => convert(o, config, launcher, job)?,
            Answer::No => {
                blank!(o, "Skipping '{}'", job.from_name());
                Outcome::Skipped
            }
        };

        summary.record(outcome);
        blank!(o, "{}", RULE);
    }

    info!(o, "Finished processing all books");

    if summary.total() < jobs.len() {
        warn!(o, "{} book(s) were left unprocessed", jobs.len() - summary.total());
    }

    {
        let mut o = o.indent(1);

        if summary.has_errors() {
            error!(o, "{summary}");
        } else {
            blank!(o, "{summary}");
        }
    }

    Ok(summary)
}

/// Convert a single book the user agreed to.
fn convert(
    o: &mut Out<'_>,
    config: &Config,
    launcher: &mut dyn Launcher,
    job: &Job,
) -> Result<Outcome> {
    let converter = match config.locator.resolve(launcher) {
        Ok(converter) => converter,
        Err(e) => {
            error!(o, "Cannot convert '{}': {e}", job.from_name());
            let mut o = o.indent(1);

            if let Some(stderr) = e.stderr() {
                blank!(o, "stderr:");
                o.indent(1).lines(stderr)?;
            }

            if matches!(e, locate::LocateErr::NotFound { .. }) {
                blank!(o, "Make sure calibre is installed and ebook-convert is in PATH,");
                blank!(o, "or pass its location with --converter.");
            }

            return Ok(Outcome::ToolUnavailable);
        }
    };

    info!(o, "Converting '{}' to '{}'", job.from_name(), job.to_name());
    let mut o = o.indent(1);

    blank!(o => v, "converter : {}", converter.strategy);

    if let Some(version) = &converter.version {
        blank!(o => v, "version   : {version}");
    }

    let mut cmd = config.command(&converter, job);

    {
        let mut f = FormatCommand::new(&cmd);

        if !config.verbose {
            f.replace(converter.program(), "<converter>");
            f.replace(&job.from_path, "<from>");
            f.replace(&job.to_path, "<to>");
        }

        blank!(o, "{f}");
    }

    if config.dry_run {
        return Ok(Outcome::DryRun);
    }

    let finished = match launcher.output(&mut cmd) {
        Ok(finished) => finished,
        Err(e) => {
            error!(o, "Unexpected error converting '{}': {e}", job.from_name());
            return Ok(Outcome::ConversionFailed);
        }
    };

    if !finished.success() {
        error!(o, "Converting '{}' failed", job.from_name());
        let mut o = o.indent(1);
        blank!(o, "exit code: {}", finished.exit());
        blank!(o, "stdout:");
        o.indent(1).lines(&finished.stdout)?;
        blank!(o, "stderr:");
        o.indent(1).lines(&finished.stderr)?;
        return Ok(Outcome::ConversionFailed);
    }

    info!(o, "Converted '{}' to '{}'", job.from_name(), job.to_name());

    if o.is_verbose() {
        let mut o = o.indent(1);
        blank!(o, "stdout:");
        o.indent(1).lines(&finished.stdout)?;
        blank!(o, "stderr:");
        o.indent(1).lines(&finished.stderr)?;
    }

    Ok(Outcome::Converted)
}
