//! Atomic file output.
//!
//! Generated documents and reports are written to a hidden temporary file in
//! the target directory and then renamed over the target, so a failed run
//! never leaves a truncated document behind.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::cli::CliError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to `path` inside `dir` using a temp file and rename.
///
/// `path` must be a single file name relative to `dir`.
///
/// # Errors
///
/// Returns [`CliError::WriteError`] if the path is not a plain file name or
/// the file cannot be written.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &[u8]) -> Result<(), CliError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(CliError::WriteError {
            path: path.to_path_buf(),
            message: "output path must name a file".to_owned(),
        });
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    );

    write_to_temp_file(dir, &tmp_name, path, contents)?;
    rename_temp_to_target(dir, &tmp_name, file_name, path)?;
    sync_parent_directory(dir);

    Ok(())
}

fn write_to_temp_file(
    dir: &Dir,
    tmp_name: &str,
    target_path: &Utf8Path,
    contents: &[u8],
) -> Result<(), CliError> {
    let write_error = |err: io::Error| CliError::WriteError {
        path: target_path.with_file_name(tmp_name),
        message: err.to_string(),
    };
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options).map_err(write_error)?;

    if let Err(err) = file.write_all(contents).and_then(|()| file.sync_all()) {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(write_error(err));
    }

    Ok(())
}

fn rename_temp_to_target(
    dir: &Dir,
    tmp_name: &str,
    target_name: &str,
    target_path: &Utf8Path,
) -> Result<(), CliError> {
    if let Err(err) = rename_temp_to_target_impl(dir, tmp_name, target_name) {
        // Best-effort cleanup of temp file on rename failure.
        drop(dir.remove_file(tmp_name));
        return Err(CliError::WriteError {
            path: target_path.to_path_buf(),
            message: err.to_string(),
        });
    }
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target_impl(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target_impl(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_parent_directory(parent: &Dir) {
    // Directory sync is best-effort.
    drop(parent.open(".").and_then(|dir| dir.sync_all()));
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use cap_std::ambient_authority;

    use super::*;

    fn scratch_dir(name: &str) -> (Utf8PathBuf, Dir) {
        let path = Utf8PathBuf::from("target")
            .join("xsd-sample-tests")
            .join(format!("{name}-{}", std::process::id()));
        let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open working dir");
        root.create_dir_all(&path).expect("create scratch dir");
        let dir = Dir::open_ambient_dir(&path, ambient_authority()).expect("open scratch dir");
        (path, dir)
    }

    #[test]
    fn replaces_existing_file_contents() {
        let (_, dir) = scratch_dir("atomic-replace");
        let target = Utf8Path::new("output.xml");

        write_atomic(&dir, target, b"<old/>").expect("first write");
        write_atomic(&dir, target, b"<new/>").expect("second write");

        assert_eq!(dir.read_to_string(target).expect("read back"), "<new/>");
        dir.remove_file(target).expect("clean up");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let (_, dir) = scratch_dir("atomic-temp");
        let target = Utf8Path::new("report.json");

        write_atomic(&dir, target, b"{}").expect("write");

        let stray = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with('.'))
            .count();
        assert_eq!(stray, 0);
        dir.remove_file(target).expect("clean up");
    }

    #[test]
    fn rejects_nested_paths() {
        let (_, dir) = scratch_dir("atomic-nested");
        let result = write_atomic(&dir, Utf8Path::new("nested/output.xml"), b"<x/>");

        assert!(matches!(result, Err(CliError::WriteError { .. })));
    }
}
