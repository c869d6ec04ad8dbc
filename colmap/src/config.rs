use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for [`crate::resolve::Resolver`].
///
/// Loadable from TOML; every key is optional:
///
/// ```toml
/// tag_key = "db"
/// legacy_tags = true
/// max_depth = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Tag key holding the primary annotation.
    #[serde(default = "default_tag_key")]
    pub tag_key: String,
    /// Honor the deprecated `field` and `inline` tags.
    #[serde(default = "default_legacy_tags")]
    pub legacy_tags: bool,
    /// Deepest inline nesting the resolver descends into.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tag_key: default_tag_key(),
            legacy_tags: default_legacy_tags(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_tag_key() -> String {
    "db".to_string()
}

fn default_legacy_tags() -> bool {
    true
}

fn default_max_depth() -> usize {
    32
}

impl ResolverConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse resolver config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }
}
