use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Format {
    Epub,
    Pdf,
}

impl Format {
    /// The format books are converted from.
    pub(crate) const INPUT: Format = Format::Epub;
    /// The format books are converted to.
    pub(crate) const OUTPUT: Format = Format::Pdf;

    pub(crate) fn ext(&self) -> &'static str {
        match self {
            Format::Epub => "epub",
            Format::Pdf => "pdf",
        }
    }

    /// Human readable name used in prompts.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Format::Epub => "EPUB",
            Format::Pdf => "PDF",
        }
    }

    pub(crate) fn from_ext(ext: &str) -> Option<Format> {
        if ext.eq_ignore_ascii_case("epub") {
            Some(Format::Epub)
        } else if ext.eq_ignore_ascii_case("pdf") {
            Some(Format::Pdf)
        } else {
            None
        }
    }
}

impl fmt::Display for Format {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}
