use std::fs;
use std::path::{Path, PathBuf};

use snafu::Snafu;
use tracing::debug;
use walkdir::WalkDir;

use crate::tree::{TREE_BRANCH, TREE_LAST, TREE_SPACE, TREE_VERTICAL};

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum RenderError {
    #[snafu(display("Not a directory: {}", path.display()))]
    NotADirectory { path: PathBuf },
}

/// Renders a directory the way `tree` does, directories first, each level
/// sorted case-insensitively. Directory names carry a trailing `/` so the
/// output parses back into the same structure.
///
/// Two cases do not survive a parse back: the filesystem root has no name
/// of its own, so its heading is a bare `/`, and names with leading or
/// trailing whitespace come back trimmed.
pub fn render_directory_tree(path: &Path, max_depth: usize) -> Result<String, RenderError> {
    if !path.is_dir() {
        return Err(RenderError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let mut lines = vec![heading(&display_name(path))];
    render_level(path, "", &mut lines, max_depth, 0);
    Ok(lines.join("\n"))
}

/// `.` and `..` have no file name of their own
fn display_name(path: &Path) -> String {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| resolved.display().to_string())
}

fn heading(name: &str) -> String {
    if name.ends_with('/') {
        name.to_string()
    } else {
        format!("{name}/")
    }
}

fn render_level(
    directory: &Path,
    prefix: &str,
    lines: &mut Vec<String>,
    max_depth: usize,
    depth: usize,
) {
    if depth >= max_depth {
        return;
    }

    let mut entries = match fs::read_dir(directory) {
        Ok(read_dir) => read_dir
            .filter_map(Result::ok)
            .map(|entry| {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();
                (path.is_dir(), name, path)
            })
            .collect::<Vec<_>>(),
        Err(error) => {
            debug!("Cannot read {}: {}", directory.display(), error);
            lines.push(format!("{prefix}{TREE_LAST}[Permission Denied]"));
            return;
        }
    };
    entries.sort_by_key(|(is_dir, name, _)| (!*is_dir, name.to_lowercase()));

    let count = entries.len();
    for (index, (is_dir, name, path)) in entries.into_iter().enumerate() {
        let is_last = index + 1 == count;
        let connector = if is_last { TREE_LAST } else { TREE_BRANCH };

        if is_dir {
            lines.push(format!("{prefix}{connector}{name}/"));
            let extension = if is_last { TREE_SPACE } else { TREE_VERTICAL };
            render_level(
                &path,
                &format!("{prefix}{extension}"),
                lines,
                max_depth,
                depth + 1,
            );
        } else {
            lines.push(format!("{prefix}{connector}{name}"));
        }
    }
}

/// Recursively counts `(files, directories)` below `path`. Unreadable
/// directories are passed over and symlinks are not followed.
pub fn count_items_in_directory(path: &Path) -> (usize, usize) {
    WalkDir::new(path)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .fold((0, 0), |(files, directories), entry| {
            let file_type = entry.file_type();
            if file_type.is_dir() {
                (files, directories + 1)
            } else if file_type.is_file() {
                (files + 1, directories)
            } else {
                (files, directories)
            }
        })
}
