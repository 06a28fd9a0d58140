use std::path::Path;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::report;
use crate::application::{InputError, InputSource, RuntimeConfig};
use crate::cli::Cli;
use crate::config::{Settings, SettingsError};
use crate::filesystem::{
    RenderError, TargetError, TargetStatus, count_items_in_directory, create_file_structure,
    expand_path, render_directory_tree, validate_target_directory,
};
use crate::tree::{ParseError, TreeParser};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let settings = Settings::read(&cli.config).await.context(SettingsSnafu)?;
        let runtime_config = RuntimeConfig::resolve(cli.command, &settings);
        debug!("Resolved runtime config: {:?}", runtime_config);

        match runtime_config {
            RuntimeConfig::Create {
                input,
                target,
                dry_run,
                preview_limit,
            } => Self::create(&input, &target, dry_run, preview_limit).await,
            RuntimeConfig::Preview { input, target } => Self::preview(&input, &target).await,
            RuntimeConfig::Render { dir, max_depth } => Self::render(&dir, max_depth),
        }
    }

    async fn create(
        input: &InputSource,
        target: &str,
        dry_run: bool,
        preview_limit: usize,
    ) -> Result<(), ApplicationError> {
        let text = input.read_to_string().await.context(InputSnafu)?;
        println!("{}", report::success(format!("Read tree from: {input}")));

        let target = validate_target_directory(target).context(TargetSnafu)?;
        let contents = match target.status {
            TargetStatus::Existing => Some(count_items_in_directory(&target.path)),
            TargetStatus::WillBeCreated => None,
        };
        println!("{}", report::target(&target, contents));

        let (parser, paths) = Self::plan(&text, &target.path)?;
        info!("Parsed {}", parser.get_summary());
        println!(
            "{}",
            report::parsed(&parser.get_summary(), parser.warnings())
        );
        println!("\n{}\n", report::preview(&paths, preview_limit));

        if dry_run {
            info!("Dry run, nothing will be written");
        }
        let outcome = create_file_structure(&paths, dry_run).await;
        println!("{}", report::materialization(&outcome, dry_run));
        if !outcome.is_success() {
            warn!("{} paths could not be created", outcome.errors.len());
        }

        Ok(())
    }

    async fn preview(input: &InputSource, target: &str) -> Result<(), ApplicationError> {
        let text = input.read_to_string().await.context(InputSnafu)?;

        let (parser, paths) = Self::plan(&text, &expand_path(target))?;
        println!(
            "{}",
            report::parsed(&parser.get_summary(), parser.warnings())
        );
        println!("{}", report::preview(&paths, paths.len()));

        Ok(())
    }

    /// Parses `text` and places every entry under the already expanded `base`.
    fn plan(
        text: &str,
        base: &Path,
    ) -> Result<(TreeParser, Vec<(String, bool)>), ApplicationError> {
        let mut parser = TreeParser::new();
        parser.try_parse(text).context(ParseSnafu)?;
        let paths = parser.get_all_paths(&base.display().to_string());
        Ok((parser, paths))
    }

    fn render(dir: &Path, max_depth: usize) -> Result<(), ApplicationError> {
        let rendered = render_directory_tree(dir, max_depth).context(RenderSnafu)?;
        println!("{rendered}");
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Could not read the tree text"))]
    InputError { source: InputError },
    #[snafu(display("Invalid target directory"))]
    TargetError { source: TargetError },
    #[snafu(display("Failed to parse tree structure"))]
    ParseError { source: ParseError },
    #[snafu(display("Could not render the directory"))]
    RenderError { source: RenderError },
}
