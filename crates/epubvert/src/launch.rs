use core::fmt;

use std::io;
use std::process::{Command, Stdio};

/// A process which has run to completion.
#[derive(Debug, Clone, Default)]
pub(crate) struct Finished {
    /// The exit code, or `None` if the process was terminated by a signal.
    pub(crate) code: Option<i32>,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl Finished {
    #[inline]
    pub(crate) fn success(&self) -> bool {
        self.code == Some(0)
    }

    #[inline]
    pub(crate) fn exit(&self) -> Exit {
        Exit(self.code)
    }
}

/// Display helper for an exit code.
pub(crate) struct Exit(Option<i32>);

impl fmt::Display for Exit {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs prepared commands to completion, capturing their output.
pub(crate) trait Launcher {
    fn output(&mut self, cmd: &mut Command) -> io::Result<Finished>;
}

/// Launches real processes.
pub(crate) struct System;

impl Launcher for System {
    fn output(&mut self, cmd: &mut Command) -> io::Result<Finished> {
        let output = cmd.stdin(Stdio::null()).output()?;

        Ok(Finished {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
