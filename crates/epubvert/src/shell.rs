use core::fmt;

use std::borrow::Cow;
use std::ffi::OsStr;
use std::process::Command;

/// Escape a path or argument so it can be pasted into bash.
pub(crate) fn escape(s: &OsStr) -> Cow<'_, str> {
    let Some(s) = s.to_str() else {
        return Cow::Borrowed("<non-utf8>");
    };

    if s.is_empty() {
        return Cow::Borrowed("''");
    }

    let Some(first) = s.find(|c| escape_in_bash(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut o = String::with_capacity(s.len() + 8);
    o.push_str(&s[..first]);

    for c in s[first..].chars() {
        match escape_in_bash(c) {
            Some(e) => o.push_str(e),
            None => o.push(c),
        }
    }

    Cow::Owned(o)
}

fn escape_in_bash(c: char) -> Option<&'static str> {
    match c {
        ' ' => Some("\\ "),
        '"' => Some("\\\""),
        '\'' => Some("\\'"),
        '\\' => Some("\\\\"),
        '$' => Some("\\$"),
        '`' => Some("\\`"),
        '&' => Some("\\&"),
        '|' => Some("\\|"),
        ';' => Some("\\;"),
        '<' => Some("\\<"),
        '>' => Some("\\>"),
        '!' => Some("\\!"),
        '(' => Some("\\("),
        ')' => Some("\\)"),
        '[' => Some("\\["),
        ']' => Some("\\]"),
        '*' => Some("\\*"),
        '?' => Some("\\?"),
        '#' => Some("\\#"),
        _ => None,
    }
}

/// Formats a command as a shell line, substituting placeholders for some of
/// its arguments.
pub(crate) struct FormatCommand<'a> {
    cmd: &'a Command,
    replacements: Vec<(&'a OsStr, Cow<'a, str>)>,
}

impl<'a> FormatCommand<'a> {
    pub(crate) fn new(cmd: &'a Command) -> Self {
        Self {
            cmd,
            replacements: Vec::new(),
        }
    }

    /// Print `value` in place of any argument equal to `key`.
    pub(crate) fn replace(
        &mut self,
        key: &'a (impl AsRef<OsStr> + ?Sized),
        value: impl Into<Cow<'a, str>>,
    ) {
        self.replacements.push((key.as_ref(), value.into()));
    }

    fn arg(&self, arg: &'a OsStr) -> Cow<'a, str> {
        for (key, value) in &self.replacements {
            if *key == arg {
                return value.clone();
            }
        }

        escape(arg)
    }
}

impl fmt::Display for FormatCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arg(self.cmd.get_program()))?;

        for arg in self.cmd.get_args() {
            write!(f, " {}", self.arg(arg))?;
        }

        Ok(())
    }
}
