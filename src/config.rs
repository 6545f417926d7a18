//! Configuration loaded from `toolcraft.toml`.
//!
//! Missing fields fall back to sensible defaults; the `ANTHROPIC_API_KEY`
//! environment variable takes precedence over the file for the API key.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `toolcraft.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolcraftConfig {
    /// Anthropic API key.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier for all workflow calls.
    #[serde(default = "default_model")]
    pub model: String,

    /// Token cap per model reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Budget for the design/evaluate/refine loop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Cap on internal state-machine steps within one turn.
    #[serde(default = "default_max_internal_steps")]
    pub max_internal_steps: u32,

    /// Shell used to execute generated scripts.
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_iterations() -> u32 {
    5
}

fn default_max_internal_steps() -> u32 {
    12
}

fn default_shell() -> String {
    "bash".to_string()
}

impl Default for ToolcraftConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_iterations: default_max_iterations(),
            max_internal_steps: default_max_internal_steps(),
            shell: default_shell(),
        }
    }
}

impl ToolcraftConfig {
    /// Load configuration from `toolcraft.toml` in the current directory,
    /// falling back to defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new("toolcraft.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ToolcraftConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment takes precedence over the file for the API key.
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ToolcraftConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "claude-sonnet-4-5-20250929");
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.max_internal_steps, 12);
        assert_eq!(config.shell, "bash");
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "sk-test-123"
            max_iterations = 3
        "#;
        let config: ToolcraftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "sk-test-123");
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.shell, "bash");
    }

    #[test]
    fn deserialize_full_toml() {
        let toml_str = r#"
            api_key = "sk-full"
            model = "claude-haiku-4-5-20251001"
            max_tokens = 1024
            max_iterations = 2
            max_internal_steps = 6
            shell = "sh"
        "#;
        let config: ToolcraftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "claude-haiku-4-5-20251001");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.max_internal_steps, 6);
        assert_eq!(config.shell, "sh");
    }
}
