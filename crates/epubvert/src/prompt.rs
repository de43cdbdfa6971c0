use std::io::{self, BufRead};

use crate::out::{Out, warn};

/// An accepted answer to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Parse a line of input, ignoring case and surrounding whitespace.
    pub(crate) fn parse(line: &str) -> Option<Answer> {
        match line.trim().to_ascii_uppercase().as_str() {
            "Y" => Some(Answer::Yes),
            "N" => Some(Answer::No),
            _ => None,
        }
    }
}

/// Ask `question` until a valid answer is given.
///
/// Returns `None` if input ends before that happens.
pub(crate) fn ask(
    o: &mut Out<'_>,
    input: &mut dyn BufRead,
    question: &str,
) -> io::Result<Option<Answer>> {
    let mut line = Vec::new();

    loop {
        o.prompt(format_args!("{question} (Y/N):"))?;

        line.clear();

        if input.read_until(b'\n', &mut line)? == 0 {
            // Keep the console tidy when stdin closes mid-prompt.
            o.blank("")?;
            return Ok(None);
        }

        // Undecodable input is just another invalid answer.
        match Answer::parse(&String::from_utf8_lossy(&line)) {
            Some(answer) => return Ok(Some(answer)),
            None => {
                warn!(o, "Invalid input, please enter 'Y' or 'N'.");
            }
        }
    }
}
