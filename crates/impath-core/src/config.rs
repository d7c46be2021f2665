//! Configuration for loading and rendering.
//!
//! Load order: `.impath.toml` → environment variables → defaults.
//! Command-line flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CONFIG_FILE: &str = ".impath.toml";

/// Top-level impath configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpathConfig {
    pub load: LoadConfig,
    pub render: RenderConfig,
}

/// How the import graph is obtained from the Go toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Go binary to invoke.
    pub go: String,
    /// Include test packages and test variants.
    pub tests: bool,
    /// Build tags passed as `-tags`.
    pub tags: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub color: ColorChoice,
}

/// When to highlight matched packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => anyhow::bail!("unknown color choice: {} (use auto, always or never)", other),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            go: "go".to_string(),
            tests: true,
            tags: Vec::new(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl ImpathConfig {
    /// Load config from `.impath.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override("IMPATH_GO", &mut config.load.go);
        env_override("IMPATH_TESTS", &mut config.load.tests);
        env_override("IMPATH_COLOR", &mut config.render.color);

        config.load.tags.retain(|t| !t.trim().is_empty());

        if config.load.go.trim().is_empty() {
            anyhow::bail!("load.go must name a go binary");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImpathConfig::default();
        assert_eq!(config.load.go, "go");
        assert!(config.load.tests);
        assert!(config.load.tags.is_empty());
        assert_eq!(config.render.color, ColorChoice::Auto);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[load]
tests = false
tags = ["integration", "linux"]

[render]
color = "never"
"#;
        let config: ImpathConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.load.tests);
        assert_eq!(config.load.tags, vec!["integration", "linux"]);
        assert_eq!(config.render.color, ColorChoice::Never);
        // Defaults for unspecified fields
        assert_eq!(config.load.go, "go");
    }

    #[test]
    fn test_config_rejects_unknown_color() {
        let result: Result<ImpathConfig, _> = toml::from_str("[render]\ncolor = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_color_choice_from_str() {
        assert_eq!("ALWAYS".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert!("rainbow".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let config = ImpathConfig::load(Path::new("/nonexistent/path")).unwrap();
        assert_eq!(config.load.go, "go");
    }

    #[test]
    fn test_load_drops_blank_tags() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".impath.toml"),
            "[load]\ntags = [\"netgo\", \"  \"]\n",
        )
        .unwrap();

        let config = ImpathConfig::load(tmp.path()).unwrap();
        assert_eq!(config.load.tags, vec!["netgo"]);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".impath.toml"), "[load\n").unwrap();
        assert!(ImpathConfig::load(tmp.path()).is_err());
    }
}
