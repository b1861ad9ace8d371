use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::ResourceError;
use crate::ports::{PreambleFragment, PreambleSource};

pub const DEFAULT_PREAMBLE_DIR: &str = "postscriptbarcode";
const FRAGMENT_EXTENSION: &str = "ps";

/// Reads every `*.ps` file of a directory, e.g. a BWIPP resource checkout
#[derive(Debug, Clone)]
pub struct PreambleDir {
    path: PathBuf,
}

impl PreambleDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for PreambleDir {
    fn default() -> Self {
        Self::new(DEFAULT_PREAMBLE_DIR)
    }
}

impl PreambleSource for PreambleDir {
    fn fragments(&self) -> Result<Vec<PreambleFragment>, ResourceError> {
        let entries = std::fs::read_dir(&self.path).map_err(|source| ResourceError::ListDir {
            path: self.path.clone(),
            source,
        })?;

        let mut fragments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ResourceError::ListDir {
                path: self.path.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FRAGMENT_EXTENSION) {
                continue;
            }

            let bytes = std::fs::read(&path).map_err(|source| ResourceError::ReadFragment {
                path: path.clone(),
                source,
            })?;
            let text = String::from_utf8(bytes).map_err(|_| ResourceError::NotUtf8 {
                path: path.clone(),
            })?;
            fragments.push(PreambleFragment {
                name: entry.file_name().to_string_lossy().into_owned(),
                text,
            });
        }

        if fragments.is_empty() {
            warn!("No preamble fragments found in {:?}", self.path);
        } else {
            debug!("Loaded {} preamble fragments from {:?}", fragments.len(), self.path);
        }
        Ok(fragments)
    }
}
