//! Wizard configuration
//!
//! Routes, recovery slide positions, tracking names and message keys used by
//! the wizard controller. Loaded from YAML or TOML, defaults otherwise.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::sequencer::Sequencer;
use crate::core::types::WizardMode;

/// Main configuration structure for the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WizardConfig {
    /// Navigation routes
    pub routes: RoutesConfig,

    /// Slide positions used when resuming after a forced restart
    pub recovery: RecoveryConfig,

    /// Tracking names
    pub analytics: AnalyticsConfig,

    /// User-facing message keys
    pub messages: MessagesConfig,

    /// Logging configuration
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Route of the wizard itself
    pub wizard: String,

    /// New navigation root when leaving a first-choice session
    pub fallback: String,

    /// Detail page of the published item
    pub item_detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Photo slide index for new-item sessions
    pub new_item_index: usize,

    /// Photo slide index for edit sessions, which have one fewer leading slide
    pub edit_item_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub new_item_view: String,
    pub edit_item_view: String,
    pub category: String,
    pub publish_called: String,
    pub update_called: String,
    pub publish_done: String,
    pub update_done: String,
    pub publish_error: String,
    pub update_error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Shown for every publish failure, whichever phase failed
    pub publish_failed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Include the event target in log lines
    pub with_target: bool,

    /// Include thread ids in log lines
    pub with_thread_ids: bool,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            wizard: "/new-ad".to_string(),
            fallback: "/ads-next-appointments".to_string(),
            item_detail: "/ads-details".to_string(),
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            new_item_index: 2,
            edit_item_index: 1,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            new_item_view: "new_ad".to_string(),
            edit_item_view: "edit_ad".to_string(),
            category: "ads_wizard".to_string(),
            publish_called: "publish_called".to_string(),
            update_called: "update_called".to_string(),
            publish_done: "publish_done".to_string(),
            update_done: "update_done".to_string(),
            publish_error: "publish_error".to_string(),
            update_error: "update_error".to_string(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            publish_failed: "ERRORS.WIZARD.NOT_ADDED".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
            with_thread_ids: false,
        }
    }
}

impl AnalyticsConfig {
    pub fn entry_view(&self, mode: WizardMode) -> &str {
        match mode {
            WizardMode::Edit => &self.edit_item_view,
            WizardMode::Create => &self.new_item_view,
        }
    }

    pub fn called_action(&self, mode: WizardMode) -> &str {
        match mode {
            WizardMode::Edit => &self.update_called,
            WizardMode::Create => &self.publish_called,
        }
    }

    pub fn done_action(&self, mode: WizardMode) -> &str {
        match mode {
            WizardMode::Edit => &self.update_done,
            WizardMode::Create => &self.publish_done,
        }
    }

    pub fn error_action(&self, mode: WizardMode) -> &str {
        match mode {
            WizardMode::Edit => &self.update_error,
            WizardMode::Create => &self.publish_error,
        }
    }
}

impl RecoveryConfig {
    pub fn index_for(&self, mode: WizardMode) -> usize {
        Sequencer::recovery_index(mode, self.new_item_index, self.edit_item_index)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

impl WizardConfig {
    /// Load configuration from a YAML or TOML file, chosen by extension
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {:?}", path);

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: WizardConfig = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        info!("Configuration loaded successfully from: {:?}", path);
        Ok(config)
    }

    /// Save configuration as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;

        info!("Configuration saved to: {:?}", path);
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let routes = [
            ("routes.wizard", &self.routes.wizard),
            ("routes.fallback", &self.routes.fallback),
            ("routes.item_detail", &self.routes.item_detail),
        ];
        for (field, route) in routes {
            if !route.starts_with('/') || route.len() < 2 {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    reason: "must be a non-empty path starting with '/'".to_string(),
                });
            }
        }

        if self.recovery.edit_item_index > self.recovery.new_item_index {
            return Err(ConfigError::Invalid {
                field: "recovery.edit_item_index".to_string(),
                reason: "must not exceed recovery.new_item_index".to_string(),
            });
        }

        if self.messages.publish_failed.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "messages.publish_failed".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logging.level".to_string(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("listing-wizard")
        .join("wizard.yml")
}
