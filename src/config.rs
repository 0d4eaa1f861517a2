//! Generator configuration file.
//!
//! `hanamigen.toml` may sit next to the OpenAPI document (picked up
//! automatically) or be passed with `--config`. Values given on the command
//! line win over the file, and the file wins over built-in defaults.
//!
//! ```toml
//! app_name = "Bookshelf"
//! output_dir = "app"
//! templates_dir = "templates/hanami"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::generator::{GenerateOptions, DEFAULT_APP_NAME, DEFAULT_OUTPUT_DIR};

/// File name looked up next to the OpenAPI document.
pub const CONFIG_FILE_NAME: &str = "hanamigen.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Ruby application module, e.g. `Bookshelf`
    #[serde(default)]
    pub app_name: Option<String>,
    /// Root directory for generated files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Directory with template overrides
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

/// Load a config file.
///
/// Returns `Ok(None)` if the file does not exist and an error if it exists
/// but cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    // Relative template paths are relative to the config file.
    if let (Some(dir), Some(base)) = (config.templates_dir.as_mut(), config_path.parent()) {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }

    info!(config = %config_path.display(), "Loaded generator config");
    Ok(Some(config))
}

/// `hanamigen.toml` alongside the spec, if present.
pub fn auto_detect_config_path(spec_path: &Path) -> Option<PathBuf> {
    let spec_dir = spec_path.parent()?;
    let config_path = spec_dir.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Load the explicitly given config (which must exist) or the auto-detected
/// one (which may not).
pub fn resolve_config(
    explicit_path: Option<&Path>,
    spec_path: &Path,
) -> anyhow::Result<Option<GeneratorConfig>> {
    match explicit_path {
        Some(path) => {
            anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
            load_config(path)
        }
        None => match auto_detect_config_path(spec_path) {
            Some(path) => load_config(&path),
            None => Ok(None),
        },
    }
}

/// Values taken from the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub app_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub templates_dir: Option<PathBuf>,
    pub dry_run: bool,
}

/// Merge CLI values, config file values and defaults.
pub fn merge_options(
    input_file: &Path,
    cli: CliOverrides,
    config: Option<GeneratorConfig>,
) -> GenerateOptions {
    let config = config.unwrap_or_default();
    GenerateOptions {
        input_file: input_file.to_path_buf(),
        app_name: cli
            .app_name
            .or(config.app_name)
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        output_dir: cli
            .output_dir
            .or(config.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        templates_dir: cli.templates_dir.or(config.templates_dir),
        dry_run: cli.dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_config_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap().is_none());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "app_name = [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_auto_detect_next_to_spec() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("openapi.yaml");
        assert!(auto_detect_config_path(&spec).is_none());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "app_name = \"Bookshelf\"\ntemplates_dir = \"tpl\"\n",
        )
        .unwrap();
        let config = resolve_config(None, &spec).unwrap().unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Bookshelf"));
        assert_eq!(config.templates_dir, Some(dir.path().join("tpl")));
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("openapi.yaml");
        assert!(resolve_config(Some(&dir.path().join("nope.toml")), &spec).is_err());
    }

    #[test]
    fn test_precedence_cli_then_file_then_default() {
        let config = GeneratorConfig {
            app_name: Some("FromFile".to_string()),
            output_dir: Some(PathBuf::from("file_out")),
            templates_dir: None,
        };
        let cli = CliOverrides {
            app_name: Some("FromCli".to_string()),
            ..CliOverrides::default()
        };
        let options = merge_options(Path::new("openapi.yaml"), cli, Some(config));
        assert_eq!(options.app_name, "FromCli");
        assert_eq!(options.output_dir, PathBuf::from("file_out"));
        assert_eq!(options.templates_dir, None);

        let options = merge_options(Path::new("openapi.yaml"), CliOverrides::default(), None);
        assert_eq!(options.app_name, DEFAULT_APP_NAME);
        assert_eq!(options.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }
}
