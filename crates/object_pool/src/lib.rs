//! # Object Pool
//!
//! Named object pools that recycle expensive resources instead of rebuilding
//! them every time a game object spawns or despawns.
//!
//! ## Features
//!
//! - **Named Pools**: Every pool is keyed by a name and bound to a template
//! - **Soft Capacity**: Pools pre-warm a batch of resources and grow by one on demand
//! - **Quarantine**: Resources still checked out when their pool is deleted are parked
//!   until they come back, then destroyed
//! - **Presets**: Pools can be bootstrapped from a TOML or RON preset file
//!
//! ## Quick Start
//!
//! ```rust
//! use object_pool::prelude::*;
//!
//! #[derive(Default)]
//! struct Enemy {
//!     active: bool,
//! }
//!
//! impl Poolable for Enemy {
//!     fn activate(&mut self) {
//!         self.active = true;
//!     }
//!
//!     fn deactivate(&mut self) {
//!         self.active = false;
//!     }
//! }
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut registry = PoolRegistry::new(RegistryConfig::default());
//!     registry.create_pool("enemies", Enemy::default, 3)?;
//!
//!     let enemy = registry.acquire("enemies")?;
//!     assert!(registry.get(enemy).map_or(false, |e| e.active));
//!
//!     registry.release("enemies", enemy)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
pub mod foundation;
pub mod pool;
pub mod presets;

pub use config::{Config, ConfigError, RegistryConfig};
pub use pool::{
    CloneTemplate, DeleteSummary, Pool, PoolError, PoolRegistry, PoolResult, Poolable,
    RegistryStats, ReleaseOutcome, ResourceHandle, ResourceTemplate, SharedRegistry,
    SharedTemplate, QUARANTINE_POOL_NAME,
};
pub use presets::{PoolPreset, PresetConfig, PresetError, PresetLoader, PresetReport, TemplateCatalog};

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{Config, RegistryConfig},
        pool::{
            PoolError, PoolRegistry, Poolable, ReleaseOutcome, ResourceHandle, ResourceTemplate,
            SharedRegistry, QUARANTINE_POOL_NAME,
        },
        presets::{PresetConfig, PresetLoader, TemplateCatalog},
    };
}
