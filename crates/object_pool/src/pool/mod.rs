//! Named resource pools
//!
//! ```text
//! PoolRegistry
//!     ├── Pool "enemies"  ── [Slot, Slot, Slot, ...]
//!     ├── Pool "bullets"  ── [Slot, Slot, ...]
//!     └── quarantine      ── in-use leftovers of deleted pools
//!                 ↓
//!        ResourceArena (owns every resource)
//! ```

pub mod error;
pub mod registry;
pub mod resource;
pub mod slot;
pub mod stats;
pub mod storage;

pub use error::{PoolError, PoolResult};
pub use registry::{DeleteSummary, PoolRegistry, ReleaseOutcome, SharedRegistry, QUARANTINE_POOL_NAME};
pub use resource::{CloneTemplate, Poolable, ResourceTemplate, SharedTemplate};
pub use slot::{ResourceHandle, Slot};
pub use stats::RegistryStats;
pub use storage::Pool;
