use anyhow::{anyhow, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Opens `path`, naming the kind of file in the error message.
pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Recursively copies the contents of `src` into `dst`, creating `dst` and any
/// intermediate directories. Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for result in WalkDir::new(src) {
        let entry = result?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            // every entry lives under `src`
            Err(_) => continue,
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Removes a file or directory tree, treating a missing path as success.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
