//! Configuration file loading with precedence handling.

use super::columns::{ColumnCount, ColumnSpec};
use super::easing::Easing;
use super::options::MasonryOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or invalid values.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// Partial set of options.
///
/// Every field is optional; `None` keeps the current value. Used both as the
/// `[masonry]` table of the config file and as the argument of
/// `Masonry::set_options`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OptionsPatch {
    /// Gap between items (px).
    #[serde(default)]
    pub gap: Option<f64>,

    /// Horizontal container padding (px).
    #[serde(default)]
    pub padding: Option<f64>,

    /// Fixed column count or list of `{ min_width, columns }` breakpoints.
    #[serde(default)]
    pub columns: Option<ColumnSpec>,

    /// Height assumed for unmeasured items (px).
    #[serde(default)]
    pub estimated_item_height: Option<f64>,

    /// Animate position updates of materialized items.
    #[serde(default)]
    pub animate: Option<bool>,

    /// Transition duration in milliseconds.
    #[serde(default)]
    pub animation_duration_ms: Option<u64>,

    /// Transition timing function.
    #[serde(default)]
    pub easing: Option<Easing>,

    /// Enable scroll virtualization.
    #[serde(default)]
    pub virtualize: Option<bool>,

    /// Overscan in estimated item heights.
    #[serde(default)]
    pub overscan: Option<f64>,

    /// Load-more distance from the bottom (px).
    #[serde(default)]
    pub load_more_threshold: Option<f64>,

    /// Show the loading indicator while loading more.
    #[serde(default)]
    pub show_loading: Option<bool>,

    /// Empty-state message.
    #[serde(default)]
    pub empty_message: Option<String>,

    /// Resize debounce window in milliseconds.
    #[serde(default)]
    pub resize_debounce_ms: Option<u64>,

    /// Scroll throttle interval in milliseconds.
    #[serde(default)]
    pub scroll_throttle_ms: Option<u64>,

    /// Scroll quiet interval in milliseconds.
    #[serde(default)]
    pub scroll_quiet_ms: Option<u64>,
}

impl OptionsPatch {
    /// True when the patch changes anything that affects packing.
    pub fn touches_layout(&self) -> bool {
        self.gap.is_some()
            || self.padding.is_some()
            || self.columns.is_some()
            || self.estimated_item_height.is_some()
    }
}

impl MasonryOptions {
    /// Overwrite every field the patch sets.
    pub fn apply_patch(&mut self, patch: &OptionsPatch) {
        if let Some(gap) = patch.gap {
            self.layout.gap = gap;
        }
        if let Some(padding) = patch.padding {
            self.layout.padding = padding;
        }
        if let Some(columns) = &patch.columns {
            self.layout.columns = columns.clone();
        }
        if let Some(estimate) = patch.estimated_item_height {
            self.layout.estimated_item_height = estimate;
        }
        if let Some(animate) = patch.animate {
            self.animation.animate = animate;
        }
        if let Some(ms) = patch.animation_duration_ms {
            self.animation.duration = Duration::from_millis(ms);
        }
        if let Some(easing) = patch.easing {
            self.animation.easing = easing;
        }
        if let Some(enabled) = patch.virtualize {
            self.virtualization.enabled = enabled;
        }
        if let Some(overscan) = patch.overscan {
            self.virtualization.overscan = overscan;
        }
        if let Some(threshold) = patch.load_more_threshold {
            self.load_more_threshold = threshold;
        }
        if let Some(show) = patch.show_loading {
            self.show_loading = show;
        }
        if let Some(message) = &patch.empty_message {
            self.empty_message = message.clone();
        }
        if let Some(ms) = patch.resize_debounce_ms {
            self.scheduling.resize_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = patch.scroll_throttle_ms {
            self.scheduling.scroll_throttle = Duration::from_millis(ms);
        }
        if let Some(ms) = patch.scroll_quiet_ms {
            self.scheduling.scroll_quiet = Duration::from_millis(ms);
        }
    }
}

/// TOML configuration file structure.
///
/// Corresponds to `~/.config/masonry-virt/config.toml`:
/// ```toml
/// log_file_path = "/tmp/masonry.log"
///
/// [masonry]
/// gap = 12
/// columns = [{ min_width = 900, columns = 3 }, { min_width = 0, columns = 1 }]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Masonry option overrides.
    #[serde(default)]
    pub masonry: Option<OptionsPatch>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Masonry options.
    pub options: MasonryOptions,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            options: MasonryOptions::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/masonry-virt/masonry-virt.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("masonry-virt").join("masonry-virt.log")
    } else {
        PathBuf::from("masonry-virt.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/masonry-virt/config.toml` on Unix, the platform equivalent
/// elsewhere, or `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("masonry-virt").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `MASONRY_CONFIG` environment variable
/// 3. Default path `~/.config/masonry-virt/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("MASONRY_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(env_path));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    let Some(config) = config_file else {
        return resolved;
    };

    if let Some(patch) = &config.masonry {
        resolved.options.apply_patch(patch);
    }
    if let Some(path) = config.log_file_path {
        resolved.log_file_path = path;
    }

    resolved
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `MASONRY_GAP`: gap in px
/// - `MASONRY_COLUMNS`: fixed column count
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var("MASONRY_GAP") {
        match raw.parse::<f64>() {
            Ok(gap) if gap.is_finite() && gap >= 0.0 => config.options.layout.gap = gap,
            _ => warn!(value = %raw, "Ignoring invalid MASONRY_GAP"),
        }
    }

    if let Ok(raw) = std::env::var("MASONRY_COLUMNS") {
        match raw.parse::<u32>().ok().and_then(|n| ColumnCount::new(n).ok()) {
            Some(count) => config.options.layout.columns = ColumnSpec::Fixed(count),
            None => warn!(value = %raw, "Ignoring invalid MASONRY_COLUMNS"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence. Only flags the user actually set
/// are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    columns_override: Option<ColumnCount>,
    gap_override: Option<f64>,
    virtualize_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(columns) = columns_override {
        config.options.layout.columns = ColumnSpec::Fixed(columns);
    }

    if let Some(gap) = gap_override {
        config.options.layout.gap = gap;
    }

    if let Some(enabled) = virtualize_override {
        config.options.virtualization.enabled = enabled;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_log_file_name() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("masonry-virt.log"),
            "Default log path should end with 'masonry-virt.log', got: {:?}",
            path
        );
    }

    #[test]
    fn resolved_config_default_includes_log_path() {
        let config = ResolvedConfig::default();
        assert!(
            !config.log_file_path.as_os_str().is_empty(),
            "Default config should have non-empty log_file_path"
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            masonry: None,
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(resolved.log_file_path, custom_path);
    }

    #[test]
    fn missing_config_file_log_path_uses_default() {
        let resolved = merge_config(Some(ConfigFile::default()));
        assert_eq!(resolved.log_file_path, default_log_path());
    }
}
