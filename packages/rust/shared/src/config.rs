//! Application configuration for PageBuilder.
//!
//! User config lives at `~/.pagebuilder/pagebuilder.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PageBuilderError, Result};
use crate::types::Preferences;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagebuilder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagebuilder";

// ---------------------------------------------------------------------------
// Config structs (matching pagebuilder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Local navigation auto-discovery.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Layout and preference defaults.
    #[serde(default)]
    pub template: TemplateConfig,

    /// Page property handling.
    #[serde(default)]
    pub properties: PropertiesConfig,

    /// Side-channel output handling.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[navigation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// File searched for upward from the requested script's directory.
    #[serde(default = "default_nav_file_name")]
    pub file_name: String,

    /// Site-wide navigation used when the search finds nothing.
    #[serde(default = "default_nav_fallback")]
    pub fallback_path: String,

    /// Number of parent directories searched above the start directory.
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            file_name: default_nav_file_name(),
            fallback_path: default_nav_fallback(),
            max_levels: default_max_levels(),
        }
    }
}

fn default_nav_file_name() -> String {
    "site_nav.html".into()
}
fn default_nav_fallback() -> String {
    "/var/www/site_nav.html".into()
}
fn default_max_levels() -> usize {
    5
}

/// `[template]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Custom layout file. The built-in layout is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_path: Option<String>,

    /// Preferences merged over the built-in defaults for every page.
    #[serde(default)]
    pub preferences: Preferences,
}

/// How page property keys with no matching field are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Log and skip.
    #[default]
    Ignore,
    /// Fail with a validation error.
    Reject,
}

/// `[properties]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertiesConfig {
    #[serde(default)]
    pub unknown_keys: UnknownKeyPolicy,
}

/// Whether buffered side-channel output is drained when read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferMode {
    /// Long-lived server: drain the buffer and re-arm it.
    #[default]
    Server,
    /// One-shot script: leave the buffer intact.
    Script,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub buffer_mode: BufferMode,
}

// ---------------------------------------------------------------------------
// Render settings (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime render configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Navigation file name searched for.
    pub nav_file_name: String,
    /// Site-wide navigation fallback.
    pub nav_fallback: PathBuf,
    /// Parent directories searched above the start directory.
    pub nav_max_levels: usize,
    /// Custom layout file, if any.
    pub layout_path: Option<PathBuf>,
    /// Site-level preference overrides.
    pub preferences: Preferences,
    /// Unknown property key handling.
    pub unknown_keys: UnknownKeyPolicy,
    /// Side-channel buffer handling.
    pub buffer_mode: BufferMode,
}

impl From<&AppConfig> for RenderSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            nav_file_name: config.navigation.file_name.clone(),
            nav_fallback: PathBuf::from(&config.navigation.fallback_path),
            nav_max_levels: config.navigation.max_levels,
            layout_path: config.template.layout_path.as_ref().map(PathBuf::from),
            preferences: config.template.preferences.clone(),
            unknown_keys: config.properties.unknown_keys,
            buffer_mode: config.output.buffer_mode,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagebuilder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PageBuilderError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagebuilder/pagebuilder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PageBuilderError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PageBuilderError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PageBuilderError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PageBuilderError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PageBuilderError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("site_nav.html"));
        assert!(toml_str.contains("buffer_mode"));
    }

    #[test]
    fn config_with_overrides() {
        let toml_str = r#"
[navigation]
file_name = "nav.html"
max_levels = 2

[template]
layout_path = "/srv/layout.html"

[template.preferences]
auxBox = true

[properties]
unknown_keys = "reject"

[output]
buffer_mode = "script"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.navigation.file_name, "nav.html");
        assert_eq!(config.navigation.max_levels, 2);
        assert_eq!(config.navigation.fallback_path, "/var/www/site_nav.html");
        assert_eq!(config.template.preferences["auxBox"], serde_json::Value::Bool(true));
        assert_eq!(config.properties.unknown_keys, UnknownKeyPolicy::Reject);
        assert_eq!(config.output.buffer_mode, BufferMode::Script);
    }

    #[test]
    fn render_settings_from_app_config() {
        let settings = RenderSettings::from(&AppConfig::default());
        assert_eq!(settings.nav_max_levels, 5);
        assert_eq!(settings.nav_file_name, "site_nav.html");
        assert!(settings.layout_path.is_none());
        assert_eq!(settings.unknown_keys, UnknownKeyPolicy::Ignore);
        assert_eq!(settings.buffer_mode, BufferMode::Server);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/pagebuilder.toml")).unwrap_err();
        assert!(matches!(err, PageBuilderError::Io { .. }));
    }
}
