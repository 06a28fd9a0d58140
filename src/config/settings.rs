use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{borrow::Cow, io, path::Path};
use tracing::{debug, info};

pub const SETTINGS_FILE_NAME: &str = "tree2fs.yaml";

const DEFAULT_PREVIEW_LIMIT: usize = 20;
const DEFAULT_RENDER_DEPTH: usize = 3;

/// Defaults applied when the command line leaves a value out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target: Option<String>,
    pub dry_run: bool,
    pub preview_limit: usize,
    pub render_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: None,
            dry_run: false,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            render_depth: DEFAULT_RENDER_DEPTH,
        }
    }
}

impl Settings {
    /// Reads the settings file, falling back to defaults when it does not exist.
    pub async fn read(path: &Path) -> Result<Self, SettingsError> {
        debug!("Reading settings file: {}", path.display());
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        let settings = contents.as_str().try_into()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn apply(&mut self, top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<(), SettingsError> {
        let lookup = |key: &'static str| {
            top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
        };

        if let Some(value) = lookup("target") {
            self.target = match value {
                Yaml::Value(Scalar::Null) => None,
                _ => Some(
                    value
                        .as_str()
                        .context(InvalidValueSnafu {
                            key: "target",
                            expected: "a string",
                        })?
                        .to_string(),
                ),
            };
        }

        if let Some(value) = lookup("dry_run") {
            self.dry_run = match value {
                Yaml::Value(Scalar::Boolean(flag)) => *flag,
                _ => {
                    return InvalidValueSnafu {
                        key: "dry_run",
                        expected: "a boolean",
                    }
                    .fail();
                }
            };
        }

        if let Some(value) = lookup("preview_limit") {
            self.preview_limit = positive_integer(value, "preview_limit")?;
        }

        if let Some(value) = lookup("render_depth") {
            self.render_depth = positive_integer(value, "render_depth")?;
        }

        Ok(())
    }
}

fn positive_integer(value: &Yaml, key: &'static str) -> Result<usize, SettingsError> {
    match value {
        Yaml::Value(Scalar::Integer(number)) if *number > 0 => usize::try_from(*number)
            .ok()
            .context(InvalidValueSnafu {
                key,
                expected: "a positive integer",
            }),
        _ => InvalidValueSnafu {
            key,
            expected: "a positive integer",
        }
        .fail(),
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let mut settings = Settings::default();

        let Some(document) = documents.first() else {
            return Ok(settings);
        };
        if let Yaml::Value(Scalar::Null) = document {
            return Ok(settings);
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        settings.apply(top_level)?;
        Ok(settings)
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Settings file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn missing_file_gives_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Settings::read(&temp_dir.path().join(SETTINGS_FILE_NAME)).await;

        assert_eq!(result.unwrap(), Settings::default());
    }

    #[compio::test]
    async fn reads_settings_from_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "target: /tmp/out\npreview_limit: 5\n").unwrap();

        let settings = Settings::read(&path).await.unwrap();

        assert_eq!(settings.target.as_deref(), Some("/tmp/out"));
        assert_eq!(settings.preview_limit, 5);
        assert_eq!(settings.render_depth, DEFAULT_RENDER_DEPTH);
    }

    #[compio::test]
    async fn directory_instead_of_file_is_a_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Settings::read(temp_dir.path()).await;

        assert!(matches!(result, Err(SettingsError::ReadError { .. })));
    }

    #[compio::test]
    async fn non_utf8_file_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let result = Settings::read(&path).await;

        assert!(matches!(result, Err(SettingsError::EncodingError { .. })));
    }

    #[test]
    fn empty_contents_give_defaults() {
        let result: Result<Settings, _> = "".try_into();
        assert_eq!(result.unwrap(), Settings::default());
    }

    #[test]
    fn parses_every_key() {
        let yaml = r#"
target: "~/projects"
dry_run: true
preview_limit: 50
render_depth: 7
"#;
        let settings: Settings = yaml.try_into().unwrap();

        assert_eq!(
            settings,
            Settings {
                target: Some("~/projects".to_string()),
                dry_run: true,
                preview_limit: 50,
                render_depth: 7,
            }
        );
    }

    #[test]
    fn null_target_is_unset() {
        let settings: Settings = "target: ~\n".try_into().unwrap();
        assert_eq!(settings.target, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings: Settings = "theme: dark\nrender_depth: 2\n".try_into().unwrap();
        assert_eq!(settings.render_depth, 2);
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result: Result<Settings, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[test]
    fn list_top_level_is_rejected() {
        let result: Result<Settings, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(SettingsError::TopLevelNotMap)));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let result: Result<Settings, _> = "dry_run: maybe".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue { key: "dry_run", .. })
        ));

        let result: Result<Settings, _> = "preview_limit: 0".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue {
                key: "preview_limit",
                ..
            })
        ));

        let result: Result<Settings, _> = "target: [a, b]".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue { key: "target", .. })
        ));
    }
}
