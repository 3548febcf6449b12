use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::error::Error;

pub const FLAGGED_FOLDER: &str = "Flagged Files";
pub const SELECTED_FOLDER: &str = "Selected Files";

#[derive(Debug, Default)]
pub struct CopyReport {
    pub destination: PathBuf,
    pub copied: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// Copy `files` into `dest_parent/folder_name`, keeping their file names.
///
/// An existing destination folder is only reused when `overwrite` is set, and
/// is emptied first. Copies keep the source modification time. A file that
/// fails to copy is recorded in the report and the remaining files are still
/// copied.
pub fn deliver(
    files: &[PathBuf],
    dest_parent: &Path,
    folder_name: &str,
    overwrite: bool,
) -> Result<CopyReport, Error> {
    let destination = dest_parent.join(folder_name);

    if destination.exists() {
        if !overwrite {
            return Err(Error::Other(format!(
                "The folder '{}' already exists in '{}'",
                folder_name,
                dest_parent.display()
            )));
        }
        clear_directory(&destination)?;
    } else {
        fs::create_dir_all(&destination)?;
    }

    let mut report = CopyReport {
        destination: destination.clone(),
        ..Default::default()
    };

    for file in files {
        let Some(name) = file.file_name() else {
            report
                .failed
                .push((file.clone(), "path has no file name".to_string()));
            continue;
        };

        match copy_keeping_mtime(file, &destination.join(name)) {
            Ok(_) => {
                debug!("Copied {} to {}", file.display(), destination.display());
                report.copied += 1;
            }
            Err(e) => {
                error!("Error copying {}: {}", file.display(), e);
                report.failed.push((file.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Copied {} files to '{}', {} failed",
        report.copied,
        destination.display(),
        report.failed.len()
    );
    Ok(report)
}

fn copy_keeping_mtime(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest)?;
    let modified = fs::metadata(src)?.modified()?;
    File::options().write(true).open(dest)?.set_modified(modified)
}

fn clear_directory(dir: &Path) -> Result<(), Error> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
