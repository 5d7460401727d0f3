//! Config command implementation.
//!
//! Manages the CLI configuration file.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/scaffold/config.toml`
//! - macOS: `~/Library/Application Support/scaffold/config.toml`
//! - Windows: `%APPDATA%\scaffold\config.toml`

use crate::actions::ConfigAction;
use anyhow::{Context, Result};
use scaffold_core::cli::{ExitCode, OutputFormat};
use scaffold_core::{Error, FeatureName};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Build tools a project may be generated for.
const BUILD_TOOLS: [&str; 2] = ["maven", "gradle"];

/// Keys accepted by `config get` and `config set`.
const KEYS: [&str; 5] = [
    "general.default_format",
    "general.log_level",
    "project.default_features",
    "project.build_tools",
    "project.output_dir",
];

/// CLI configuration.
///
/// Every section is optional; missing values fall back to defaults and
/// command-line flags override whatever the file says.
///
/// # Examples
///
/// ```toml
/// [general]
/// default_format = "pretty"
/// log_level = "info"
///
/// [project]
/// default_features = ["feature1"]
/// build_tools = ["maven"]
/// output_dir = "~/projects"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Defaults for `scaffold create`
    #[serde(default)]
    pub project: ProjectConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format (json, text, pretty)
    pub default_format: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Project generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Features used when `--features` is not given
    pub default_features: Vec<String>,

    /// Build tools used when neither `--maven` nor `--gradle` is given
    pub build_tools: Vec<String>,

    /// Directory projects are created in when `--output` is not given
    pub output_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_format: "pretty".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_features: vec!["feature1".to_string()],
            build_tools: vec!["maven".to_string()],
            output_dir: ".".to_string(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first invalid value.
    pub fn validate(&self) -> scaffold_core::Result<()> {
        let invalid = |message: String| Err(Error::ConfigError { message });

        if self.general.default_format.parse::<OutputFormat>().is_err() {
            return invalid(format!(
                "invalid general.default_format '{}', must be one of: json, text, pretty",
                self.general.default_format
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return invalid(format!(
                "invalid general.log_level '{}', must be one of: {}",
                self.general.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.project.default_features.is_empty() {
            return invalid("project.default_features must name at least one feature".to_string());
        }
        for feature in &self.project.default_features {
            if let Err(e) = FeatureName::new(feature.as_str()) {
                return invalid(format!("invalid project.default_features entry: {e}"));
            }
        }

        if self.project.build_tools.is_empty() {
            return invalid("project.build_tools must name at least one build tool".to_string());
        }
        for tool in &self.project.build_tools {
            if !BUILD_TOOLS.contains(&tool.as_str()) {
                return invalid(format!(
                    "invalid project.build_tools entry '{tool}', must be one of: {}",
                    BUILD_TOOLS.join(", ")
                ));
            }
        }

        if self.project.output_dir.trim().is_empty() {
            return invalid("project.output_dir must not be empty".to_string());
        }

        Ok(())
    }

    /// Default output format.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.general.default_format.parse().unwrap_or_default()
    }

    /// Returns `true` if `tool` is one of the default build tools.
    #[must_use]
    pub fn uses_build_tool(&self, tool: &str) -> bool {
        self.project.build_tools.iter().any(|t| t == tool)
    }

    /// Default output directory with a leading `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the home directory is unknown.
    pub fn output_dir(&self) -> scaffold_core::Result<PathBuf> {
        expand_tilde(&self.project.output_dir)
    }
}

fn expand_tilde(path: &str) -> scaffold_core::Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir().ok_or_else(|| Error::ConfigError {
            message: format!("cannot expand '{path}': home directory is unknown"),
        })?;
        Ok(if path == "~" { home } else { home.join(&path[2..]) })
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Gets the default configuration file path.
///
/// # Errors
///
/// Returns an error if the platform has no configuration directory.
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("failed to determine config directory")?;

    Ok(config_dir.join("scaffold").join("config.toml"))
}

/// Loads configuration from the default path, or defaults if there is none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or
/// validated.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Loads configuration from `path`, or defaults if the file is missing.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or
/// validated.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigError {
        message: format!("failed to parse {}: {e}", path.display()),
    })?;

    config.validate()?;

    Ok(config)
}

fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    config.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    let toml_str = toml::to_string_pretty(config).context("failed to serialize config")?;

    fs::write(path, toml_str).context("failed to write config file")?;

    debug!("Saved config to {}", path.display());

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Gets a configuration value by key path (e.g., "project.build_tools").
fn get_config_value_by_key(config: &Config, key: &str) -> Option<String> {
    match key {
        "general.default_format" => Some(config.general.default_format.clone()),
        "general.log_level" => Some(config.general.log_level.clone()),
        "project.default_features" => Some(config.project.default_features.join(",")),
        "project.build_tools" => Some(config.project.build_tools.join(",")),
        "project.output_dir" => Some(config.project.output_dir.clone()),
        _ => None,
    }
}

/// Sets a configuration value by key path. The result is not validated.
fn set_config_value_by_key(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "general.default_format" => config.general.default_format = value.to_string(),
        "general.log_level" => config.general.log_level = value.to_string(),
        "project.default_features" => config.project.default_features = split_list(value),
        "project.build_tools" => config.project.build_tools = split_list(value),
        "project.output_dir" => config.project.output_dir = value.to_string(),
        _ => {
            return Err(Error::ConfigError {
                message: format!("unknown configuration key: {key}"),
            }
            .into());
        }
    }

    Ok(())
}

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub success: bool,
    /// Status message
    pub message: String,
    /// Configuration file path
    pub path: String,
}

/// Configuration value result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigValue {
    /// Configuration key
    pub key: String,
    /// Configuration value
    pub value: String,
}

/// Set configuration result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SetResult {
    /// The key that was set
    pub key: String,
    /// The new value
    pub value: String,
    /// Status message
    pub message: String,
}

/// Runs the config command against the default configuration file.
///
/// # Examples
///
/// ```no_run
/// use scaffold_cli::ConfigAction;
/// use scaffold_cli::commands::config;
/// use scaffold_core::cli::OutputFormat;
///
/// # #[tokio::main]
/// # async fn main() {
/// let result = config::run(ConfigAction::Show, OutputFormat::Json).await;
/// assert!(result.is_ok());
/// # }
/// ```
pub async fn run(action: ConfigAction, output_format: OutputFormat) -> Result<ExitCode> {
    run_at(action, &config_path()?, output_format).await
}

/// Runs the config command against the file at `path`.
pub async fn run_at(
    action: ConfigAction,
    path: &Path,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!(?action, path = %path.display(), "Config command");

    let output = match action {
        ConfigAction::Init => {
            crate::formatters::format_output(&init_config(path)?, output_format)
        }
        ConfigAction::Show => {
            crate::formatters::format_output(&load_config_from(path)?, output_format)
        }
        ConfigAction::Get { key } => {
            crate::formatters::format_output(&get_config(path, key)?, output_format)
        }
        ConfigAction::Set { key, value } => {
            crate::formatters::format_output(&set_config(path, key, value)?, output_format)
        }
    }
    .context("failed to format config output")?;
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}

/// Creates a default configuration file unless one exists.
fn init_config(path: &Path) -> Result<InitResult> {
    if path.exists() {
        return Ok(InitResult {
            success: false,
            message: "configuration file already exists".to_string(),
            path: path.display().to_string(),
        });
    }

    save_config_to(&Config::default(), path)?;

    Ok(InitResult {
        success: true,
        message: "configuration file created with default values".to_string(),
        path: path.display().to_string(),
    })
}

fn get_config(path: &Path, key: String) -> Result<ConfigValue> {
    let config = load_config_from(path)?;

    match get_config_value_by_key(&config, &key) {
        Some(value) => Ok(ConfigValue { key, value }),
        None => Err(Error::ConfigError {
            message: format!(
                "configuration key '{key}' not found, available keys: {}",
                KEYS.join(", ")
            ),
        }
        .into()),
    }
}

/// Updates one value and saves the file; an invalid result is not saved.
fn set_config(path: &Path, key: String, value: String) -> Result<SetResult> {
    let mut config = load_config_from(path)?;
    set_config_value_by_key(&mut config, &key, &value)?;
    save_config_to(&config, path)?;

    Ok(SetResult {
        message: format!("set '{key}' to '{value}'"),
        key,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.default_format, "pretty");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.project.default_features, vec!["feature1"]);
        assert_eq!(config.project.build_tools, vec!["maven"]);
        assert_eq!(config.project.output_dir, ".");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_format() {
        let mut config = Config::default();
        config.general.default_format = "yaml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = Config::default();
        config.general.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_feature() {
        let mut config = Config::default();
        config.project.default_features = vec!["Bad-Feature".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_features"));
    }

    #[test]
    fn test_config_validation_empty_lists() {
        let mut config = Config::default();
        config.project.default_features.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.project.build_tools.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_unknown_build_tool() {
        let mut config = Config::default();
        config.project.build_tools = vec!["ant".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_output_dir() {
        let mut config = Config::default();
        config.project.output_dir = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_format_from_config() {
        let mut config = Config::default();
        assert_eq!(config.output_format(), OutputFormat::Pretty);
        config.general.default_format = "json".to_string();
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_uses_build_tool() {
        let mut config = Config::default();
        assert!(config.uses_build_tool("maven"));
        assert!(!config.uses_build_tool("gradle"));
        config.project.build_tools = vec!["gradle".to_string()];
        assert!(config.uses_build_tool("gradle"));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("out").unwrap(), PathBuf::from("out"));
        assert_eq!(expand_tilde("/tmp/out").unwrap(), PathBuf::from("/tmp/out"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~").unwrap(), home);
            assert_eq!(expand_tilde("~/projects").unwrap(), home.join("projects"));
        }
    }

    #[test]
    fn test_config_deserialization_partial() {
        let toml_str = r#"
            [project]
            build_tools = ["maven", "gradle"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general, GeneralConfig::default());
        assert_eq!(config.project.build_tools, vec!["maven", "gradle"]);
        assert_eq!(config.project.default_features, vec!["feature1"]);
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string(&Config::default()).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[project]"));
        assert!(toml_str.contains("default_features"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[general]\ndefault_format = \"xml\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        let core = err.downcast_ref::<Error>().unwrap();
        assert!(core.is_config_error());
    }

    #[test]
    fn test_load_malformed_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[general\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.downcast_ref::<Error>().unwrap().is_config_error());
    }

    #[test]
    fn test_get_config_value_by_key() {
        let config = Config::default();

        assert_eq!(
            get_config_value_by_key(&config, "general.default_format"),
            Some("pretty".to_string())
        );
        assert_eq!(
            get_config_value_by_key(&config, "project.build_tools"),
            Some("maven".to_string())
        );
        assert_eq!(get_config_value_by_key(&config, "invalid.key"), None);
    }

    #[test]
    fn test_set_config_value_by_key() {
        let mut config = Config::default();

        assert!(set_config_value_by_key(&mut config, "general.default_format", "json").is_ok());
        assert_eq!(config.general.default_format, "json");

        assert!(
            set_config_value_by_key(&mut config, "project.default_features", "payee, account")
                .is_ok()
        );
        assert_eq!(config.project.default_features, vec!["payee", "account"]);

        assert!(set_config_value_by_key(&mut config, "project.build_tools", "gradle").is_ok());
        assert_eq!(config.project.build_tools, vec!["gradle"]);

        assert!(set_config_value_by_key(&mut config, "invalid.key", "value").is_err());
    }

    #[tokio::test]
    async fn test_init_then_set_then_get() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scaffold").join("config.toml");

        let code = run_at(ConfigAction::Init, &path, OutputFormat::Json).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(path.exists());

        let set = ConfigAction::Set {
            key: "project.output_dir".to_string(),
            value: "~/projects".to_string(),
        };
        run_at(set, &path, OutputFormat::Json).await.unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.project.output_dir, "~/projects");

        let value = get_config(&path, "project.output_dir".to_string()).unwrap();
        assert_eq!(value.value, "~/projects");
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[general]\nlog_level = \"warn\"\n").unwrap();

        let result = init_config(&path).unwrap();
        assert!(!result.success);
        assert_eq!(load_config_from(&path).unwrap().general.log_level, "warn");
    }

    #[test]
    fn test_set_invalid_value_is_not_saved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let err = set_config(&path, "project.build_tools".to_string(), "ant".to_string());
        assert!(err.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_config_show_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let result = run_at(ConfigAction::Show, &path, OutputFormat::Json).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_config_get_invalid_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let result = run_at(
            ConfigAction::Get {
                key: "nonexistent.key".to_string(),
            },
            &path,
            OutputFormat::Json,
        )
        .await;
        assert!(result.is_err());
    }
}
