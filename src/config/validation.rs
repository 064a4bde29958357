//! Validation logic for loaded configuration.

use anyhow::Result;

use super::defaults::RuleConfig;
use super::Config;

impl Config {
    /// Validate settings that the loader depends on.
    ///
    /// Per-rule expectations are checked by the rule that uses them, so a
    /// bad value there fails only that rule's stage.
    pub fn validate(&self) -> Result<()> {
        self.rules.validate()
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.footer_marker.is_empty() {
            anyhow::bail!("rules.footer_marker must not be empty");
        }
        if self.register_prefixes.is_empty() {
            anyhow::bail!("rules.register_prefixes must list at least one prefix");
        }
        if let Some(pos) = self.register_prefixes.iter().position(|p| p.is_empty()) {
            anyhow::bail!("rules.register_prefixes[{}] must not be empty", pos);
        }
        Ok(())
    }
}
