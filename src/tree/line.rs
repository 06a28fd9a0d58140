/// Connector for a sibling that is followed by more siblings
pub const TREE_BRANCH: &str = "├── ";
/// Connector for the last sibling in a group
pub const TREE_LAST: &str = "└── ";
/// Indentation below a parent that still has siblings coming
pub const TREE_VERTICAL: &str = "│   ";
/// Indentation below a parent that was the last of its group
pub const TREE_SPACE: &str = "    ";

/// Depth and name extracted from a single line of tree text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEntry<'a> {
    pub depth: usize,
    pub name: &'a str,
}

impl LineEntry<'_> {
    /// Lines that reduce to nothing (or to bare slashes) never become nodes.
    pub fn is_usable(&self) -> bool {
        !self.name.trim_end_matches('/').is_empty()
    }
}

/// Scans one line left to right, consuming indentation tokens until an item
/// marker or plain text is found.
///
/// Item markers are checked before continuation tokens at every position. A
/// marker contributes one level on top of the indentation consumed before it.
/// Plain text keeps the indentation counted so far, so `    config` and
/// `\tconfig` both sit at depth 1. An empty name means the line carries no
/// entry.
pub fn parse_line(line: &str) -> LineEntry<'_> {
    let mut depth = 0;
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(name) = rest
            .strip_prefix(TREE_BRANCH)
            .or_else(|| rest.strip_prefix(TREE_LAST))
        {
            return LineEntry {
                depth: depth + 1,
                name: name.trim(),
            };
        }

        if let Some(tail) = rest
            .strip_prefix(TREE_VERTICAL)
            .or_else(|| rest.strip_prefix(TREE_SPACE))
        {
            depth += 1;
            rest = tail;
            continue;
        }

        // Ragged alignment
        if let Some(tail) = rest.strip_prefix(' ') {
            rest = tail;
            continue;
        }

        if let Some(tail) = rest.strip_prefix('\t') {
            depth += 1;
            rest = tail;
            continue;
        }

        return LineEntry {
            depth,
            name: rest.trim(),
        };
    }

    LineEntry { depth, name: "" }
}

/// Depth of the next line that carries an entry, skipping blank and empty
/// lines. Does not touch any parser state.
pub fn next_entry_depth(remaining: &[&str]) -> Option<usize> {
    remaining
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line))
        .find(LineEntry::is_usable)
        .map(|entry| entry.depth)
}
