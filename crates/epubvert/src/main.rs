//! Interactively convert a directory of e-books to PDF.
//!
//! See [`epubvert`] documentation for more information.
//!
//! [`epubvert`]: https://crates.io/crates/epubvert

use anyhow::Result;
use clap::Parser;

/// Interactively convert a directory of e-books to PDF.
#[derive(Parser)]
#[command(author, version, about, max_term_width = 80)]
pub struct Opts {
    #[command(flatten)]
    inner: epubvert::cli::Epubvert,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    epubvert::cli::entry(&opts.inner)
}
