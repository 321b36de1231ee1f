//! Document metadata from the top-level `config` key.
//!
//! Covers format versioning, multi-file imports and validation strictness.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ConfigMeta {
    /// Format version of the document.
    #[validate(length(min = 1))]
    #[serde(default = "default_version")]
    pub version: String,

    /// Document author, informational only.
    #[serde(default)]
    pub author: Option<String>,

    /// Additional files merged before this one, relative to this file.
    #[serde(default)]
    pub imports: Vec<PathBuf>,

    /// Treat duplicate names, dangling references and missing required
    /// environment variables as errors instead of warnings.
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Run the cross-reference pass after merging.
    #[serde(default = "default_true")]
    pub validate_references: bool,
}

fn default_version() -> String {
    "1".into()
}

fn default_true() -> bool {
    true
}

impl Default for ConfigMeta {
    fn default() -> Self {
        Self {
            version: default_version(),
            author: None,
            imports: Vec::new(),
            strict: true,
            validate_references: true,
        }
    }
}
