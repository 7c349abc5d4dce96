mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./m2tsforge.toml",
        "~/.config/m2tsforge/config.toml",
        "/etc/m2tsforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.convert.extensions.is_empty() {
        anyhow::bail!("convert.extensions must list at least one extension");
    }

    for ext in &config.convert.extensions {
        if ext.trim_start_matches('.').is_empty() {
            anyhow::bail!("convert.extensions contains an empty extension");
        }
    }

    // Missing tools fall back to PATH lookup, so only warn
    for (key, path) in config.tools.configured() {
        if !path.exists() {
            tracing::warn!("tools.{} does not exist: {:?}", key, path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2tsforge_av::OutputFormat;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [tools]
            tsmuxer_path = "/opt/tsmuxer/tsMuxeR"

            [convert]
            format = "blu-ray"
            split = true
            extensions = ["mkv", "mka"]
            "#,
        )
        .unwrap();

        assert_eq!(config.convert.format, OutputFormat::BluRay);
        assert!(config.convert.split);
        assert!(!config.convert.delete_source);
        assert_eq!(config.convert.extensions, ["mkv", "mka"]);
        assert_eq!(
            config.tools.tool_paths().tsmuxer.as_deref(),
            Some(Path::new("/opt/tsmuxer/tsMuxeR"))
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.convert.format, OutputFormat::M2ts);
        assert_eq!(config.convert.extensions, ["mkv"]);
        assert!(config.tools.configured().is_empty());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let config: Config = toml::from_str("[convert]\nextensions = []\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(toml::from_str::<Config>("[convert]\nformat = \"mkv\"\n").is_err());
    }
}
