//! Interactively convert a directory of `.epub` books to `.pdf`.
//!
//! The heavy lifting is performed by calibre's `ebook-convert`, which needs to
//! be installed separately. It is looked up in the default calibre
//! installation path on macOS first, and then through `PATH`.
//!
//! Every `.epub` file in the scanned directory (the current directory unless
//! specified) is presented one by one, and converted to a `.pdf` with the same
//! name next to it if you answer `Y`.
//!
//! <br>
//!
//! ## Usage
//!
//! To see what would be done without converting anything, use `--dry-run` or
//! `-D`:
//!
//! ```sh
//! epubvert --dry-run books
//! ```
//!
//! If calibre is installed somewhere unusual, point to the tool directly:
//!
//! ```sh
//! epubvert --converter /opt/calibre/ebook-convert
//! ```

pub mod cli;
mod config;
mod format;
mod launch;
mod locate;
mod out;
mod prompt;
mod shell;
mod tasks;
