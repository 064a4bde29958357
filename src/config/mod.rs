//! Configuration for validation runs.
//!
//! Configuration lives in Markdown files with YAML frontmatter. Layers are
//! merged key by key, later layers winning:
//! 1. Global config (`$HOME/.config/meter-validate/config.md`)
//! 2. Project config (`.meter-validate/config.md`)
//! 3. An explicit `--config` file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;
pub mod validation;

pub use defaults::*;

/// Project config location, relative to the working directory.
pub const PROJECT_CONFIG: &str = ".meter-validate/config.md";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub sources: SourcePolicy,
    #[serde(default)]
    pub pipeline: PipelinePolicy,
}

impl Config {
    /// Load configuration with full merge semantics.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_merged_from(
            global_config_path().as_deref(),
            Path::new(PROJECT_CONFIG),
            explicit,
        )
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let value = parse_layer(content)?;
        Self::from_value(value)
    }

    /// Merge global, project and explicit configs. Global and project files
    /// are optional; an explicit path must exist.
    pub fn load_merged_from(
        global_path: Option<&Path>,
        project_path: &Path,
        explicit_path: Option<&Path>,
    ) -> Result<Self> {
        let mut merged = Value::Mapping(Mapping::new());

        for path in global_path
            .into_iter()
            .chain(std::iter::once(project_path))
            .filter(|p| p.exists())
        {
            merge_values(&mut merged, read_layer(path)?);
        }

        if let Some(path) = explicit_path {
            merge_values(&mut merged, read_layer(path)?);
        }

        Self::from_value(merged)
    }

    fn from_value(value: Value) -> Result<Self> {
        let config: Config =
            serde_yaml::from_value(value).context("Failed to parse config frontmatter")?;
        config.validate()?;
        Ok(config)
    }
}

/// Returns the path to the global config file at ~/.config/meter-validate/config.md
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/meter-validate/config.md"))
}

/// Split YAML frontmatter from the Markdown body.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    if !content.starts_with("---") {
        return (None, content);
    }

    let rest = &content[3..];
    if let Some(end) = rest.find("\n---") {
        let frontmatter = rest[..end].to_string();
        let body = rest[end + 4..].trim_start();
        (Some(frontmatter), body)
    } else {
        (None, content)
    }
}

fn read_layer(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_layer(&content).with_context(|| format!("Invalid config at {}", path.display()))
}

fn parse_layer(content: &str) -> Result<Value> {
    let (frontmatter, _body) = split_frontmatter(content);
    let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

    let value: Value =
        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")?;
    // An empty frontmatter block parses as null.
    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

/// Recursively merge `overlay` into `base`. Mappings merge key by key;
/// anything else in `overlay` replaces what is in `base`.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
