//! Pool presets
//!
//! Declarative bootstrap for a registry: a list of `(name, template, size)`
//! entries, usually read from a TOML or RON file at startup. Template ids are
//! resolved through a [`TemplateCatalog`] supplied by the host, since
//! templates are code and cannot live in a config file.
//!
//! ```toml
//! only_at_start = true
//!
//! [[presets]]
//! name = "bullets"
//! template = "bullet"
//! size = 32
//! ```

use crate::config::{Config, ConfigError, Deserialize, Serialize};
use crate::pool::{PoolError, PoolRegistry, Poolable, ResourceTemplate, SharedTemplate};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One pool to create at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPreset {
    /// Name of the pool
    pub name: String,
    /// Catalog id of the template the pool is built from
    pub template: String,
    /// Number of resources to pre-warm
    #[serde(default)]
    pub size: usize,
}

impl PoolPreset {
    /// Create a preset entry
    pub fn new(name: impl Into<String>, template: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            size,
        }
    }
}

/// Preset file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// Skip the whole preset list if the registry already has a pool
    pub only_at_start: bool,
    /// Pools to create, in order
    pub presets: Vec<PoolPreset>,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            only_at_start: true,
            presets: Vec::new(),
        }
    }
}

impl Config for PresetConfig {}

/// Preset errors
#[derive(Debug, Error)]
pub enum PresetError {
    /// The preset file could not be read
    #[error("Preset configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A preset names a template the catalog does not know
    #[error("Pool {pool} uses unknown template: {template}")]
    UnknownTemplate {
        /// Pool the preset would have created
        pool: String,
        /// Missing template id
        template: String,
    },

    /// The registry refused to create the pool
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Templates addressable by id from preset files
pub struct TemplateCatalog<T> {
    templates: HashMap<String, SharedTemplate<T>>,
}

impl<T> TemplateCatalog<T> {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Register a template under `id`, replacing any previous one
    pub fn register(&mut self, id: impl Into<String>, template: impl ResourceTemplate<T> + 'static) {
        let id = id.into();
        if self.templates.insert(id.clone(), SharedTemplate::new(template)).is_some() {
            log::warn!("Template {} registered twice, keeping the latest", id);
        }
    }

    /// Builder form of [`TemplateCatalog::register`]
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, template: impl ResourceTemplate<T> + 'static) -> Self {
        self.register(id, template);
        self
    }

    /// Look up a template by id
    pub fn get(&self, id: &str) -> Option<SharedTemplate<T>> {
        self.templates.get(id).cloned()
    }

    /// Whether a template is registered under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<T> Default for TemplateCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TemplateCatalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.templates.keys().collect();
        ids.sort_unstable();
        f.debug_struct("TemplateCatalog").field("templates", &ids).finish()
    }
}

/// What a preset run did
#[derive(Debug, Default)]
pub struct PresetReport {
    /// The run was skipped because the registry already had pools
    pub skipped: bool,
    /// Pools created, in preset order
    pub created: Vec<String>,
    /// Presets that could not be applied, with the reason
    pub failures: Vec<(String, PresetError)>,
}

impl PresetReport {
    /// Whether every preset was applied
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One-shot loader that creates the pools listed in a [`PresetConfig`]
///
/// The loader is consumed by [`PresetLoader::apply`]; it has no use after the
/// pools exist.
#[derive(Debug, Clone)]
pub struct PresetLoader {
    config: PresetConfig,
}

impl PresetLoader {
    /// Create a loader from an in-memory preset list
    pub fn new(config: PresetConfig) -> Self {
        Self { config }
    }

    /// Read presets from a `.toml` or `.ron` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let config = PresetConfig::load_from_file(path)?;
        log::info!("Loaded {} pool presets from {}", config.presets.len(), path.display());
        Ok(Self::new(config))
    }

    /// Presets this loader will apply
    pub fn presets(&self) -> &[PoolPreset] {
        &self.config.presets
    }

    /// Create every preset pool in `registry`
    ///
    /// Failures are collected per preset and never stop the remaining
    /// presets. With `only_at_start` set, a registry that already has a pool
    /// is left alone.
    pub fn apply<T: Poolable + 'static>(
        self,
        registry: &mut PoolRegistry<T>,
        catalog: &TemplateCatalog<T>,
    ) -> PresetReport {
        let mut report = PresetReport::default();

        if self.config.only_at_start && registry.pool_count() != 0 {
            log::info!(
                "Registry already has {} pools, skipping {} presets",
                registry.pool_count(),
                self.config.presets.len()
            );
            report.skipped = true;
            return report;
        }

        for preset in self.config.presets {
            let Some(template) = catalog.get(&preset.template) else {
                let error = PresetError::UnknownTemplate {
                    pool: preset.name.clone(),
                    template: preset.template,
                };
                log::error!("{}", error);
                report.failures.push((preset.name, error));
                continue;
            };

            match registry.create_pool(&preset.name, template, preset.size) {
                Ok(()) => report.created.push(preset.name),
                Err(error) => report.failures.push((preset.name, error.into())),
            }
        }

        log::info!(
            "Applied pool presets: {} created, {} failed",
            report.created.len(),
            report.failures.len()
        );
        report
    }
}
