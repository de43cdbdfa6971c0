use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn epubvert() -> Command {
    let mut cmd = Command::cargo_bin("epubvert").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn no_books_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    epubvert()
        .current_dir(dir.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("No .epub files found"))
        .stdout(predicate::str::contains("(Y/N)").not());
}

#[test]
fn scanned_directory_argument() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.epub"), b"").unwrap();

    epubvert()
        .arg(dir.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. a.epub"))
        .stdout(predicate::str::contains("Skipping 'a.epub'"))
        .stdout(predicate::str::contains("0 converted, 1 skipped, 0 failed"));
}

#[test]
fn missing_converter() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.epub"), b"").unwrap();

    epubvert()
        .current_dir(dir.path())
        .arg("--converter")
        .arg(dir.path().join("does-not-exist"))
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("could not find ebook-convert"))
        .stdout(predicate::str::contains("Finished processing all books"));

    assert!(!dir.path().join("a.pdf").exists());
}

#[cfg(unix)]
#[test]
fn stub_converter() {
    use std::os::unix::fs::PermissionsExt;

    let tools = tempfile::tempdir().unwrap();

    let good = tools.path().join("good-convert");
    let bad = tools.path().join("bad-convert");
    let log = tools.path().join("calls.log");

    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then echo 'ebook-convert (calibre 7.0)'; exit 0; fi\n\
         echo \"$@\" >> '{}'\n\
         : > \"$2\"\n",
        log.display()
    );

    fs::write(&good, script).unwrap();

    fs::write(
        &bad,
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then exit 0; fi\n\
         echo 'reading book'\n\
         echo 'not a zip file' >&2\n\
         exit 3\n",
    )
    .unwrap();

    for path in [&good, &bad] {
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    let books = tempfile::tempdir().unwrap();
    fs::write(books.path().join("book1.epub"), b"").unwrap();
    fs::write(books.path().join("book2.epub"), b"").unwrap();

    epubvert()
        .current_dir(books.path())
        .arg("--converter")
        .arg(&good)
        .write_stdin("maybe\nY\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid input"))
        .stdout(predicate::str::contains("Converted 'book1.epub' to 'book1.pdf'"))
        .stdout(predicate::str::contains("Skipping 'book2.epub'"))
        .stdout(predicate::str::contains("Finished processing all books"));

    assert!(books.path().join("book1.pdf").exists());
    assert!(!books.path().join("book2.pdf").exists());

    let calls = fs::read_to_string(&log).unwrap();
    let calls = calls.lines().collect::<Vec<_>>();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("book1.epub"));
    assert!(calls[0].contains("--paper-size a4 --pdf-page-numbers --output-profile tablet --embed-all-fonts"));

    epubvert()
        .current_dir(books.path())
        .arg("--converter")
        .arg(&bad)
        .write_stdin("y\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converting 'book1.epub' failed"))
        .stdout(predicate::str::contains("exit code: 3"))
        .stdout(predicate::str::contains("not a zip file"))
        .stdout(predicate::str::contains("Converting 'book2.epub' failed"))
        .stdout(predicate::str::contains("0 converted, 0 skipped, 2 failed"));
}
