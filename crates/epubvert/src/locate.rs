use core::error::Error;
use core::fmt;

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::launch::Launcher;
use crate::shell;

/// Where calibre installs `ebook-convert` on macOS.
pub(crate) const INSTALLED: &str = "/Applications/calibre.app/Contents/MacOS/ebook-convert";

/// Name of the tool when looked up through `PATH`.
pub(crate) const SEARCHED: &str = "ebook-convert";

/// Argument used to check that the tool is present and healthy.
pub(crate) const VERSION_ARG: &str = "--version";

/// A way of finding the conversion tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// A well-known installation path.
    Installed(PathBuf),
    /// A bare command name resolved through `PATH`.
    Search(PathBuf),
    /// A path given explicitly on the command line.
    Explicit(PathBuf),
}

impl Strategy {
    #[inline]
    pub(crate) fn program(&self) -> &Path {
        match self {
            Strategy::Installed(path) => path,
            Strategy::Search(name) => name,
            Strategy::Explicit(path) => path,
        }
    }
}

impl fmt::Display for Strategy {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = shell::escape(self.program().as_os_str());

        match self {
            Strategy::Installed(..) => write!(f, "installation path {program}"),
            Strategy::Search(..) => write!(f, "{program} in PATH"),
            Strategy::Explicit(..) => write!(f, "converter {program}"),
        }
    }
}

/// A converter which answered the version probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) strategy: Strategy,
    /// First line of the version output, if any.
    pub(crate) version: Option<String>,
}

impl Resolved {
    /// Start building a command invoking the converter.
    pub(crate) fn command(&self) -> Command {
        Command::new(self.strategy.program())
    }

    #[inline]
    pub(crate) fn program(&self) -> &Path {
        self.strategy.program()
    }
}

#[derive(Debug)]
pub(crate) enum LocateErr {
    /// None of the strategies found an executable.
    NotFound { checked: Vec<Strategy> },
    /// The tool was found, but the probe exited unsuccessfully.
    Broken {
        strategy: Strategy,
        code: Option<i32>,
        stderr: String,
    },
    /// Running the probe failed for a reason other than the tool missing.
    Unexpected { strategy: Strategy, error: io::Error },
}

impl LocateErr {
    /// Captured error output of a broken tool.
    pub(crate) fn stderr(&self) -> Option<&str> {
        match self {
            LocateErr::Broken { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }
}

impl fmt::Display for LocateErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateErr::NotFound { checked } => {
                write!(f, "could not find {SEARCHED}, checked ")?;

                for (n, strategy) in checked.iter().enumerate() {
                    if n > 0 {
                        write!(f, " and ")?;
                    }

                    write!(f, "{strategy}")?;
                }

                Ok(())
            }
            LocateErr::Broken { strategy, code, .. } => match code {
                Some(code) => write!(f, "{strategy} failed with exit code {code}"),
                None => write!(f, "{strategy} was terminated by a signal"),
            },
            LocateErr::Unexpected { strategy, error } => {
                write!(f, "unexpected error checking {strategy}: {error}")
            }
        }
    }
}

impl Error for LocateErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LocateErr::Unexpected { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// An ordered collection of strategies for finding the converter.
pub(crate) struct Locator {
    strategies: Vec<Strategy>,
}

impl Locator {
    /// Use only the given converter.
    pub(crate) fn explicit(path: PathBuf) -> Self {
        Self {
            strategies: vec![Strategy::Explicit(path)],
        }
    }

    #[cfg(test)]
    pub(crate) fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Probe each strategy in order until one answers.
    ///
    /// A tool which is missing moves on to the next strategy. Anything else,
    /// including a tool which is present but fails its version probe, stops
    /// the search.
    pub(crate) fn resolve(&self, launcher: &mut dyn Launcher) -> Result<Resolved, LocateErr> {
        let mut checked = Vec::new();

        for strategy in &self.strategies {
            let mut cmd = Command::new(strategy.program());
            cmd.arg(VERSION_ARG);

            let finished = match launcher.output(&mut cmd) {
                Ok(finished) => finished,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    checked.push(strategy.clone());
                    continue;
                }
                Err(error) => {
                    return Err(LocateErr::Unexpected {
                        strategy: strategy.clone(),
                        error,
                    });
                }
            };

            if !finished.success() {
                return Err(LocateErr::Broken {
                    strategy: strategy.clone(),
                    code: finished.code,
                    stderr: finished.stderr,
                });
            }

            let version = finished
                .stdout
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_owned);

            return Ok(Resolved {
                strategy: strategy.clone(),
                version,
            });
        }

        Err(LocateErr::NotFound { checked })
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self {
            strategies: vec![
                Strategy::Installed(PathBuf::from(INSTALLED)),
                Strategy::Search(PathBuf::from(SEARCHED)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::launch::tests::{Reply, Scripted};

    use super::{INSTALLED, LocateErr, Locator, SEARCHED, Strategy};

    #[test]
    fn installed_path_wins() {
        let mut launcher = Scripted::new([Reply::Exit(0, "ebook-convert (calibre 7.2)\n", "")]);
        let resolved = Locator::default().resolve(&mut launcher).unwrap();

        assert_eq!(
            resolved.strategy,
            Strategy::Installed(PathBuf::from(INSTALLED))
        );
        assert_eq!(
            resolved.version.as_deref(),
            Some("ebook-convert (calibre 7.2)")
        );
        assert_eq!(launcher.calls, [[INSTALLED, "--version"]]);
    }

    #[test]
    fn falls_back_to_path() {
        let mut launcher = Scripted::new([Reply::Missing, Reply::Exit(0, "", "")]);
        let resolved = Locator::default().resolve(&mut launcher).unwrap();

        assert_eq!(resolved.strategy, Strategy::Search(PathBuf::from(SEARCHED)));
        assert_eq!(resolved.version, None);
        assert_eq!(
            launcher.calls,
            [[INSTALLED, "--version"], [SEARCHED, "--version"]]
        );
    }

    #[test]
    fn not_found_anywhere() {
        let mut launcher = Scripted::new([Reply::Missing, Reply::Missing]);
        let error = Locator::default().resolve(&mut launcher).unwrap_err();

        let LocateErr::NotFound { checked } = &error else {
            panic!("expected not found, got {error:?}");
        };

        assert_eq!(checked.len(), 2);
        assert_eq!(
            error.to_string(),
            format!(
                "could not find ebook-convert, checked installation path {} and ebook-convert in PATH",
                INSTALLED
            )
        );
    }

    #[test]
    fn broken_is_not_missing() {
        let mut launcher = Scripted::new([Reply::Exit(3, "", "missing library\n")]);
        let error = Locator::default().resolve(&mut launcher).unwrap_err();

        assert!(matches!(
            error,
            LocateErr::Broken {
                code: Some(3),
                ..
            }
        ));
        assert_eq!(error.stderr(), Some("missing library\n"));
        // A broken installation is reported rather than skipped over.
        assert_eq!(launcher.calls.len(), 1);
    }

    #[test]
    fn broken_in_path() {
        let mut launcher = Scripted::new([Reply::Missing, Reply::Exit(1, "", "")]);
        let error = Locator::default().resolve(&mut launcher).unwrap_err();

        let LocateErr::Broken { strategy, .. } = &error else {
            panic!("expected broken, got {error:?}");
        };

        assert_eq!(*strategy, Strategy::Search(PathBuf::from(SEARCHED)));
        assert_eq!(error.stderr(), None);
    }

    #[test]
    fn unexpected_error() {
        let mut launcher = Scripted::new([Reply::Denied]);
        let error = Locator::default().resolve(&mut launcher).unwrap_err();

        assert!(matches!(error, LocateErr::Unexpected { .. }));
        assert!(error.to_string().starts_with("unexpected error checking"));
    }

    #[test]
    fn explicit_converter_only() {
        let mut launcher = Scripted::new([Reply::Missing]);
        let locator = Locator::explicit(PathBuf::from("/opt/calibre/ebook-convert"));
        let error = locator.resolve(&mut launcher).unwrap_err();

        assert_eq!(
            error.to_string(),
            "could not find ebook-convert, checked converter /opt/calibre/ebook-convert"
        );
        assert_eq!(launcher.calls.len(), 1);
    }

    #[test]
    fn strategies_in_order() {
        let mut launcher = Scripted::new([Reply::Missing, Reply::Missing, Reply::Exit(0, "", "")]);

        let locator = Locator::new(vec![
            Strategy::Explicit(PathBuf::from("a")),
            Strategy::Installed(PathBuf::from("b")),
            Strategy::Search(PathBuf::from("c")),
        ]);

        let resolved = locator.resolve(&mut launcher).unwrap();
        assert_eq!(resolved.program(), Path::new("c"));
    }
}
