use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// User-editable settings, persisted as YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub engine: EngineConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the conversion engine executable.
    pub executable: Utf8PathBuf,
    /// Maximum wall-clock time for one job, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial log panel threshold: "INFO", "WARNING" or "ERROR".
    pub log_filter: String,
    /// Mirror log panel output to stdout.
    pub echo_console: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: Utf8PathBuf::from("taskdeck-engine"),
            timeout_secs: 600,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            log_filter: "INFO".to_string(),
            echo_console: true,
        }
    }
}

/// Configuration manager for loading and saving the YAML settings file.
///
/// Settings live in a single file (`TaskDeck Config.yaml`) inside the data
/// directory. A missing file is not an error; defaults apply.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files (e.g., "TaskDeck Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            user_config_path: config_dir.join("TaskDeck Config.yaml"),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load the user configuration file, or defaults if it doesn't exist.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        if !self.user_config_path.exists() {
            tracing::warn!(
                "User config file not found at {}, using defaults",
                self.user_config_path
            );
            return Ok(UserConfig::default());
        }

        let file_contents = fs::read_to_string(&self.user_config_path)
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        tracing::info!("Loaded user config from {}", self.user_config_path);
        Ok(config)
    }

    /// Save the user configuration file.
    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (TempDir, ConfigManager) {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(dir.join("TaskDeck Data")).unwrap();
        (temp, manager)
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let (_temp, manager) = manager();
        let config = manager.load_user_config().unwrap();
        assert_eq!(config, UserConfig::default());
        assert_eq!(config.engine.timeout_secs, 600);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let (_temp, manager) = manager();

        let mut config = UserConfig::default();
        config.engine.executable = Utf8PathBuf::from("/opt/engine/bin/convert");
        config.engine.timeout_secs = 120;
        config.ui.log_filter = "WARNING".to_string();
        config.ui.echo_console = false;

        manager.save_user_config(&config).unwrap();
        let loaded = manager.load_user_config().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_field_defaults() {
        let (_temp, manager) = manager();
        fs::write(
            manager.config_dir().join("TaskDeck Config.yaml"),
            "engine:\n  timeout_secs: 42\n",
        )
        .unwrap();

        let config = manager.load_user_config().unwrap();
        assert_eq!(config.engine.timeout_secs, 42);
        assert_eq!(config.engine.executable, Utf8PathBuf::from("taskdeck-engine"));
        assert_eq!(config.ui, UiConfig::default());
    }
}
