use std::io::{self, Read};
use std::path::PathBuf;

use compio::fs;
use snafu::prelude::*;
use tracing::debug;

use crate::application::runtime_config::InputSource;

impl InputSource {
    /// Loads the whole tree text.
    pub async fn read_to_string(&self) -> Result<String, InputError> {
        let bytes = match self {
            InputSource::File(path) => {
                debug!("Reading tree text from {}", path.display());
                fs::read(path).await.context(ReadFileSnafu { path: path.clone() })?
            }
            InputSource::Stdin => {
                debug!("Reading tree text from stdin");
                let mut bytes = Vec::new();
                io::stdin().read_to_end(&mut bytes).context(ReadStdinSnafu)?;
                bytes
            }
        };

        let text = String::from_utf8(bytes).context(EncodingSnafu {
            origin: self.to_string(),
        })?;
        debug!("Read {} bytes of tree text", text.len());
        Ok(text)
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "stdin"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum InputError {
    #[snafu(display("Failed to read tree file {}", path.display()))]
    ReadFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read tree text from stdin"))]
    ReadStdinError { source: std::io::Error },
    #[snafu(display("Tree text from {} is not valid UTF-8", origin))]
    EncodingError {
        origin: String,
        source: std::string::FromUtf8Error,
    },
}
