//! Configuration system
//!
//! Registry policy and preset files are plain serde structs. Anything that
//! implements [`Config`] can be read from or written to `.toml` and `.ron`
//! files, picked by file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load configuration from file, falling back to defaults when the file is absent
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Registry Configuration
///
/// Policy switches for the lenient paths of [`crate::PoolRegistry::release`].
/// Defaults reproduce the permissive behaviour callers rely on: returning a
/// resource to an unknown pool creates that pool, and returning a resource the
/// pool never handed out adopts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Create a pool when a resource is released to a name nobody declared
    pub auto_create_on_release: bool,
    /// Move resources released to a pool that does not own them into that pool
    pub adopt_unrecognized: bool,
}

impl RegistryConfig {
    /// Strict policy: unknown pools and foreign resources are reported as errors
    pub fn strict() -> Self {
        Self {
            auto_create_on_release: false,
            adopt_unrecognized: false,
        }
    }

    /// Enable or disable pool auto-creation on release
    pub fn with_auto_create_on_release(mut self, enabled: bool) -> Self {
        self.auto_create_on_release = enabled;
        self
    }

    /// Enable or disable adoption of unrecognized resources
    pub fn with_adopt_unrecognized(mut self, enabled: bool) -> Self {
        self.adopt_unrecognized = enabled;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            auto_create_on_release: true,
            adopt_unrecognized: true,
        }
    }
}

impl Config for RegistryConfig {}
