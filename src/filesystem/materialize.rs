use std::io;
use std::path::{Path, PathBuf};

use compio::fs;
use derive_more::Display;
use tracing::{debug, info};

/// Why a path was left untouched
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SkipReason {
    #[display("Already exists")]
    AlreadyExists,
}

/// Why creating a path failed
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FailureReason {
    #[display("Permission denied")]
    PermissionDenied,
    #[display("{message}")]
    Os { code: i32, message: String },
    #[display("{_0}")]
    Other(String),
}

impl From<io::Error> for FailureReason {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            return FailureReason::PermissionDenied;
        }
        match error.raw_os_error() {
            Some(code) => FailureReason::Os {
                code,
                message: error.to_string(),
            },
            None => FailureReason::Other(error.to_string()),
        }
    }
}

/// Per-path outcome of a materialization batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub errors: Vec<(PathBuf, FailureReason)>,
}

impl MaterializationReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Creates every `(path, is_directory)` entry in the given order.
///
/// Existing paths are skipped. Files get their missing parent directories
/// created first and are left empty. A failing path is recorded and the batch
/// moves on. With `dry_run`, nothing is written and every missing path is
/// reported as created.
pub async fn create_file_structure(
    paths: &[(String, bool)],
    dry_run: bool,
) -> MaterializationReport {
    let mut report = MaterializationReport::default();

    for (raw_path, is_directory) in paths {
        let path = PathBuf::from(raw_path);

        match path.try_exists() {
            Ok(true) => {
                debug!("Skipping existing path {}", path.display());
                report.skipped.push((path, SkipReason::AlreadyExists));
                continue;
            }
            Ok(false) => {}
            Err(error) => {
                debug!("Cannot check {}: {}", path.display(), error);
                report.errors.push((path, error.into()));
                continue;
            }
        }

        if dry_run {
            report.created.push(path);
            continue;
        }

        let result = if *is_directory {
            fs::create_dir_all(&path).await
        } else {
            create_empty_file(&path).await
        };

        match result {
            Ok(()) => {
                debug!("Created {}", path.display());
                report.created.push(path);
            }
            Err(error) => {
                debug!("Failed to create {}: {}", path.display(), error);
                report.errors.push((path, error.into()));
            }
        }
    }

    info!(
        "Materialization finished: {} created, {} skipped, {} failed",
        report.created.len(),
        report.skipped.len(),
        report.errors.len()
    );
    report
}

async fn create_empty_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::File::create(path).await?;
    Ok(())
}
