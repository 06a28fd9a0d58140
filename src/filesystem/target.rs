use std::path::{Component, Path, PathBuf};
use std::{env, fs};

use snafu::Snafu;
use tracing::debug;

/// State of a target directory that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    Existing,
    WillBeCreated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTarget {
    pub path: PathBuf,
    pub status: TargetStatus,
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TargetError {
    #[snafu(display("Target path is empty"))]
    EmptyPath,
    #[snafu(display("Parent directory does not exist: {}", path.display()))]
    ParentMissing { path: PathBuf },
    #[snafu(display("No write permission for: {}", path.display()))]
    NotWritable { path: PathBuf },
    #[snafu(display("Path exists but is not a directory: {}", path.display()))]
    NotADirectory { path: PathBuf },
}

/// Expands a leading `~`, anchors relative paths at the current directory and
/// resolves `.` and `..`. Symlinks are resolved when the path exists.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match env::current_dir() {
            Ok(current_dir) => current_dir.join(expanded),
            Err(_) => expanded,
        }
    };

    match absolute.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) => normalize_path(&absolute),
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !components.is_empty()
                    && !matches!(components.last(), Some(Component::RootDir))
                {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Checks that `raw` names a directory entries can be created in, either one
/// that exists or one whose parent exists.
pub fn validate_target_directory(raw: &str) -> Result<ValidTarget, TargetError> {
    if raw.trim().is_empty() {
        return Err(TargetError::EmptyPath);
    }

    let path = expand_path(raw);
    debug!("Validating target directory {}", path.display());

    let Ok(metadata) = fs::metadata(&path) else {
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if !parent.is_dir() {
            return Err(TargetError::ParentMissing { path: parent });
        }
        if !is_writable(&parent) {
            return Err(TargetError::NotWritable { path: parent });
        }
        return Ok(ValidTarget {
            path,
            status: TargetStatus::WillBeCreated,
        });
    };

    if !metadata.is_dir() {
        return Err(TargetError::NotADirectory { path });
    }
    if !is_writable(&path) {
        return Err(TargetError::NotWritable { path });
    }

    Ok(ValidTarget {
        path,
        status: TargetStatus::Existing,
    })
}

/// The directory must carry write bits and accept a scratch file from the
/// current user. The scratch file is unlinked when dropped.
fn is_writable(directory: &Path) -> bool {
    let read_only = fs::metadata(directory)
        .map(|metadata| metadata.permissions().readonly())
        .unwrap_or(true);
    if read_only {
        return false;
    }

    match tempfile::tempfile_in(directory) {
        Ok(_) => true,
        Err(error) => {
            debug!("Cannot write to {}: {}", directory.display(), error);
            false
        }
    }
}
