use std::path::PathBuf;

use crate::cli::Command;
use crate::config::Settings;

const STDIN_MARKER: &str = "-";
const DEFAULT_TARGET: &str = ".";

/// Where the tree text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl From<String> for InputSource {
    fn from(input: String) -> Self {
        if input == STDIN_MARKER {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(input))
        }
    }
}

/// A command with every option resolved against the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeConfig {
    Create {
        input: InputSource,
        target: String,
        dry_run: bool,
        preview_limit: usize,
    },
    Preview {
        input: InputSource,
        target: String,
    },
    Render {
        dir: PathBuf,
        max_depth: usize,
    },
}

impl RuntimeConfig {
    /// Command line values win over settings, settings win over built-in
    /// defaults.
    pub fn resolve(command: Command, settings: &Settings) -> Self {
        let default_target = || {
            settings
                .target
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET.to_string())
        };

        match command {
            Command::Create {
                input,
                target,
                dry_run,
            } => RuntimeConfig::Create {
                input: input.into(),
                target: target.unwrap_or_else(default_target),
                dry_run: dry_run || settings.dry_run,
                preview_limit: settings.preview_limit,
            },
            Command::Preview { input, target } => RuntimeConfig::Preview {
                input: input.into(),
                target: target.unwrap_or_else(default_target),
            },
            Command::Render { dir, max_depth } => RuntimeConfig::Render {
                dir,
                max_depth: max_depth.unwrap_or(settings.render_depth),
            },
        }
    }
}
