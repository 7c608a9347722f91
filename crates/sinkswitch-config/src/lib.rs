use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

/// String-keyed settings owned by a single action instance
pub type Settings = HashMap<String, String>;

/// Error types for settings operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid settings format: {reason}")]
    InvalidFormat { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings storage scoped to one action instance.
///
/// `get` always hands back a snapshot; callers modify it and pass the whole
/// map back through `set`.
pub trait SettingsStore {
    fn get(&self) -> Settings;

    fn set(&mut self, settings: Settings) -> Result<(), ConfigError>;
}

/// One action instance's table in the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionChannel {
    pub properties: Settings,
}

/// Settings file holding one table per action instance.
///
/// The file is the source of truth: reads reload it and writes merge into
/// its current contents, so several processes can share one file.
pub struct ActionConfig {
    channels: RwLock<HashMap<String, ActionChannel>>,
    config_path: PathBuf,
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("config_path", &self.config_path)
            .field("channels", &"RwLock<HashMap<...>>")
            .finish()
    }
}

impl ActionConfig {
    pub fn new(config_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = config_path.into();
        let channels = Self::load_from_file(&config_path)?;
        debug!("Loaded {} action instances from {:?}", channels.len(), config_path);

        Ok(Self {
            channels: RwLock::new(channels),
            config_path,
        })
    }

    /// Default location: `$XDG_CONFIG_HOME/sinkswitch/actions.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sinkswitch")
            .join("actions.toml")
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn load_from_file(path: &Path) -> Result<HashMap<String, ActionChannel>, ConfigError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(path)?;
        let channels: HashMap<String, ActionChannel> = toml::from_str(&content)?;
        Ok(channels)
    }

    fn write_to_file(&self, channels: &HashMap<String, ActionChannel>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(channels)
            .map_err(|e| ConfigError::InvalidFormat { reason: e.to_string() })?;

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Replace the cached instances with what is on disk now
    pub fn reload(&self) -> Result<(), ConfigError> {
        let fresh = Self::load_from_file(&self.config_path)?;
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        *channels = fresh;
        Ok(())
    }

    /// Write every cached instance back to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let channels = self.channels.read().unwrap_or_else(|e| e.into_inner());
        self.write_to_file(&channels)
    }

    /// Current settings of one instance, empty if it was never written.
    /// An unreadable file serves the last good copy.
    pub fn instance_settings(&self, instance: &str) -> Settings {
        if let Err(e) = self.reload() {
            warn!("Failed to reload {:?}, using cached settings: {}", self.config_path, e);
        }

        let channels = self.channels.read().unwrap_or_else(|e| e.into_inner());
        channels
            .get(instance)
            .map(|channel| channel.properties.clone())
            .unwrap_or_default()
    }

    /// Replace one instance's settings, keeping whatever other writers stored
    pub fn set_instance_settings(&self, instance: &str, settings: Settings) -> Result<(), ConfigError> {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        *channels = Self::load_from_file(&self.config_path)?;
        channels.insert(instance.to_string(), ActionChannel { properties: settings });
        self.write_to_file(&channels)?;

        info!("Saved settings for action instance {}", instance);
        Ok(())
    }

    pub fn list_instances(&self) -> Result<Vec<String>, ConfigError> {
        self.reload()?;

        let channels = self.channels.read().unwrap_or_else(|e| e.into_inner());
        let mut instances: Vec<String> = channels.keys().cloned().collect();
        instances.sort();
        Ok(instances)
    }
}

/// `SettingsStore` view of one instance inside a shared `ActionConfig`
#[derive(Debug, Clone)]
pub struct InstanceSettings {
    config: Arc<ActionConfig>,
    instance: String,
}

impl InstanceSettings {
    pub fn new(config: Arc<ActionConfig>, instance: impl Into<String>) -> Self {
        Self {
            config,
            instance: instance.into(),
        }
    }
}

impl SettingsStore for InstanceSettings {
    fn get(&self) -> Settings {
        self.config.instance_settings(&self.instance)
    }

    fn set(&mut self, settings: Settings) -> Result<(), ConfigError> {
        self.config.set_instance_settings(&self.instance, settings)
    }
}

/// Volatile store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    settings: Settings,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self) -> Settings {
        self.settings.clone()
    }

    fn set(&mut self, settings: Settings) -> Result<(), ConfigError> {
        self.settings = settings;
        Ok(())
    }
}
