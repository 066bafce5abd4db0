//! Language tag written after a successful deployment.
use std::path::{Path, PathBuf};

use super::ResourceChange;
use crate::error::DeployError;
use crate::operations::FileSystemOps;

/// Name of the zero-byte marker that selects the Chinese interface.
pub const CHINESE_MARKER: &str = ".cn";

/// Interface language chosen after deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Default; no marker is written.
    English,
    /// Signalled by [`CHINESE_MARKER`] in the destination root.
    Chinese,
}

impl Language {
    /// Interpret an operator answer. A blank answer means English.
    #[must_use]
    pub fn parse(answer: &str) -> Option<Self> {
        let answer = answer.trim();
        match answer.to_ascii_lowercase().as_str() {
            "" | "1" | "en" | "english" => Some(Self::English),
            "2" | "cn" | "zh" | "chinese" | "中文" | "汉语" => Some(Self::Chinese),
            _ => None,
        }
    }

    /// Short code used in messages.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Chinese => "cn",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown language '{s}' (expected en or cn)"))
    }
}

/// Path of the marker inside `root`.
#[must_use]
pub fn marker_path(root: &Path) -> PathBuf {
    root.join(CHINESE_MARKER)
}

/// Write the marker for `language` into `root`.
///
/// English writes nothing and leaves an existing marker in place. An
/// existing marker is not rewritten.
///
/// # Errors
///
/// Returns [`DeployError::MarkerFailed`] if the marker cannot be created.
pub fn apply_language(
    fs: &dyn FileSystemOps,
    root: &Path,
    language: Language,
) -> Result<ResourceChange, DeployError> {
    if language == Language::English {
        return Ok(ResourceChange::Skipped {
            reason: "English needs no marker".to_string(),
        });
    }

    let path = marker_path(root);
    if fs.exists(&path) {
        return Ok(ResourceChange::AlreadyCorrect);
    }
    fs.create_marker(&path)
        .map_err(|source| DeployError::MarkerFailed { path, source })?;
    Ok(ResourceChange::Applied)
}
