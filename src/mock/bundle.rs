//! File-backed mock bundles.
//!
//! A mock file holds an optional bundle `name` and a list of `mocks`,
//! written as JSON or (with the `yaml` feature) YAML. [`FileBundle`]
//! reads one asynchronously via Tokio, validates it, and implements
//! [`Mocker`] so `ghost run --mocks <file>` seeds the registry through the
//! same path as any other bundle.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::model::Mock;
use super::validation::validate;
use super::Mocker;
use crate::error::GhostError;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MockFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub mocks: Vec<Mock>,
}

/// Parse a mock file string based on file extension.
pub fn parse_mock_file_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<MockFile, GhostError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| GhostError::MockFileParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        "json" => serde_json::from_str(content).map_err(|e| GhostError::MockFileParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(GhostError::UnsupportedFormat(other.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct FileBundle {
    name: String,
    path: PathBuf,
    mocks: Vec<Mock>,
}

impl FileBundle {
    /// Read, parse and validate the mock file at `path`.
    pub async fn load(path: &Path) -> Result<Self, GhostError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GhostError::MockFileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GhostError::Io(e)
            }
        })?;

        let path_display = path.display().to_string();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file = parse_mock_file_str(ext, &content, &path_display)?;

        if let Err(errors) = validate(&file.mocks) {
            return Err(GhostError::MockValidation {
                path: path_display,
                errors,
            });
        }

        let name = file.name.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("mocks")
                .to_string()
        });

        Ok(Self {
            name,
            path: path.to_path_buf(),
            mocks: file.mocks,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Mocker for FileBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn mocks(&self) -> Vec<Mock> {
        self.mocks.clone()
    }
}
