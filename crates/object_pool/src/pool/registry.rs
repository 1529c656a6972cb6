//! Pool Registry
//!
//! Owns every named pool and every pooled resource, and decides what happens
//! to a resource on acquire, release and pool deletion.
//!
//! # Lifecycle
//!
//! ```text
//!  create_pool ──► [free, inactive] ──acquire──► [in use, active]
//!                        ▲                              │
//!                        └────────────release───────────┘
//!
//!  delete_pool(keep_in_use = true)
//!      free slots ─────────────► destroyed
//!      in-use slots ───────────► quarantine ──release──► destroyed
//! ```
//!
//! # Ownership
//!
//! The registry owns all resources in a single arena. Pools only keep slot
//! bookkeeping, so moving a resource into quarantine or into another pool
//! never moves the resource itself. Callers hold [`ResourceHandle`]s and
//! borrow resources through [`PoolRegistry::get`] and
//! [`PoolRegistry::get_mut`]; a handle must not be used after it has been
//! released.

use super::error::{PoolError, PoolResult};
use super::resource::{Poolable, ResourceTemplate};
use super::slot::{ResourceHandle, Slot};
use super::stats::RegistryStats;
use super::storage::Pool;
use crate::config::RegistryConfig;
use crate::foundation::collections::ResourceArena;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Reserved name of the pool that parks in-use resources of deleted pools
pub const QUARANTINE_POOL_NAME: &str = "__deleted__";

/// Registry shared between threads behind a single lock
pub type SharedRegistry<T> = Arc<Mutex<PoolRegistry<T>>>;

/// What [`PoolRegistry::release`] did with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The resource went back to its own pool
    Recycled,
    /// The resource came from elsewhere and now belongs to the target pool
    Adopted,
    /// The target pool did not exist and was created around the resource
    AutoCreated,
    /// The resource was in quarantine and has been destroyed
    Destroyed,
}

/// Result of [`PoolRegistry::delete_pool`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    /// Resources destroyed immediately
    pub destroyed: usize,
    /// In-use resources moved to quarantine
    pub quarantined: usize,
}

/// Manager for named pools of recyclable resources
///
/// One registry is meant to be created by the host's composition root and
/// passed to whoever needs pooled resources. Every operation is synchronous
/// and bounded by the slot count of the pool involved.
///
/// # Usage
///
/// ```rust
/// use object_pool::{PoolRegistry, Poolable, RegistryConfig, ReleaseOutcome};
///
/// struct Bullet;
/// impl Poolable for Bullet {}
///
/// let mut registry = PoolRegistry::new(RegistryConfig::default());
/// registry.create_pool("bullets", || Bullet, 2).unwrap();
///
/// let shots = registry.acquire_many("bullets", 3).unwrap();
/// assert_eq!(registry.pool("bullets").unwrap().len(), 3);
///
/// for shot in shots {
///     assert_eq!(registry.release("bullets", shot), Ok(ReleaseOutcome::Recycled));
/// }
/// ```
pub struct PoolRegistry<T: Poolable> {
    /// Registered pools by name
    pools: HashMap<String, Pool<T>>,
    /// Created the first time a deleted pool leaves in-use resources behind
    quarantine: Option<Pool<T>>,
    /// Every resource owned by the registry
    resources: ResourceArena<T>,
    /// Release policy
    config: RegistryConfig,
    /// Running counters
    stats: RegistryStats,
}

impl<T: Poolable> PoolRegistry<T> {
    /// Create an empty registry
    pub fn new(config: RegistryConfig) -> Self {
        log::debug!("Creating PoolRegistry with config: {:?}", config);
        Self {
            pools: HashMap::new(),
            quarantine: None,
            resources: ResourceArena::with_key(),
            config,
            stats: RegistryStats::default(),
        }
    }

    /// Wrap the registry for use from several threads
    pub fn into_shared(self) -> SharedRegistry<T> {
        Arc::new(Mutex::new(self))
    }

    /// Get the release policy
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create a new pool pre-warmed with `count` inactive resources
    ///
    /// # Arguments
    ///
    /// * `name` - Unique, non-empty pool name
    /// * `template` - Prototype used now and whenever the pool grows
    /// * `count` - Number of resources to manufacture up front
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Pool registered
    /// * `Err(PoolError)` - Name empty, reserved or taken; an existing pool is left untouched
    pub fn create_pool(
        &mut self,
        name: &str,
        template: impl ResourceTemplate<T> + 'static,
        count: usize,
    ) -> PoolResult<()> {
        self.check_new_name(name)?;

        let mut pool = Pool::new(name, Some(Box::new(template)));
        for _ in 0..count {
            if let Some(handle) = Self::manufacture(&mut self.resources, &mut self.stats, &pool) {
                pool.push(Slot::free(handle));
            }
        }

        log::info!("Created pool {} with {} resources", name, pool.len());
        self.pools.insert(name.to_string(), pool);
        Ok(())
    }

    /// Attach or replace the template a pool grows from
    pub fn set_template(
        &mut self,
        name: &str,
        template: impl ResourceTemplate<T> + 'static,
    ) -> PoolResult<()> {
        if name == QUARANTINE_POOL_NAME {
            return Err(report(PoolError::ReservedPoolName { name: name.to_string() }));
        }
        let pool = self
            .pools
            .get_mut(name)
            .ok_or_else(|| report(PoolError::not_found(name)))?;
        pool.set_template(Box::new(template));
        log::debug!("Pool {} template replaced", name);
        Ok(())
    }

    /// Check out one resource from a pool
    ///
    /// The earliest free slot in insertion order wins. When every slot is in
    /// use the pool grows by exactly one resource manufactured from its
    /// template.
    pub fn acquire(&mut self, name: &str) -> PoolResult<ResourceHandle> {
        if name == QUARANTINE_POOL_NAME {
            return Err(report(PoolError::ReservedPoolName { name: name.to_string() }));
        }
        let pool = self
            .pools
            .get_mut(name)
            .ok_or_else(|| report(PoolError::not_found(name)))?;

        let handle = if let Some(handle) = pool.claim_first_free() {
            handle
        } else {
            let handle = Self::manufacture(&mut self.resources, &mut self.stats, pool)
                .ok_or_else(|| report(PoolError::TemplateMissing { name: name.to_string() }))?;
            pool.push(Slot::taken(handle));
            self.stats.growth_events += 1;
            log::debug!("Pool {} grew to {} resources", name, pool.len());
            handle
        };

        if let Some(resource) = self.resources.get_mut(handle.key()) {
            resource.activate();
        }
        self.stats.total_acquired += 1;
        Ok(handle)
    }

    /// Check out `count` resources from a pool
    ///
    /// Fails before handing anything out if the pool does not exist. If the
    /// pool cannot grow part way through, the resources already checked out
    /// by this call are released again.
    pub fn acquire_many(&mut self, name: &str, count: usize) -> PoolResult<Vec<ResourceHandle>> {
        if !self.pools.contains_key(name) {
            // Route through acquire so reserved names get their own error
            return self.acquire(name).map(|_| Vec::new());
        }

        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            match self.acquire(name) {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    for handle in handles {
                        if let Err(rollback) = self.release(name, handle) {
                            log::error!("Rollback of pool {} failed: {}", name, rollback);
                        }
                    }
                    return Err(error);
                }
            }
        }
        Ok(handles)
    }

    /// Return a resource to a pool
    ///
    /// # Returns
    ///
    /// * `Ok(ReleaseOutcome::Recycled)` - Slot marked free in its own pool
    /// * `Ok(ReleaseOutcome::Adopted)` - Resource moved over from another pool
    /// * `Ok(ReleaseOutcome::AutoCreated)` - Pool `name` was created for the resource
    /// * `Ok(ReleaseOutcome::Destroyed)` - Resource was quarantined and is gone now
    /// * `Err(PoolError)` - Stale handle, double release, or a lenient path disabled by config
    pub fn release(&mut self, name: &str, handle: ResourceHandle) -> PoolResult<ReleaseOutcome> {
        if !self.resources.contains_key(handle.key()) {
            return Err(report(PoolError::StaleHandle));
        }

        if name == QUARANTINE_POOL_NAME {
            return if self.destroy_quarantined(handle) {
                Ok(ReleaseOutcome::Destroyed)
            } else {
                Err(report(PoolError::ResourceUnrecognized { name: name.to_string() }))
            };
        }

        if self.pools.contains_key(name) {
            return self.release_to_known(name, handle);
        }

        // Pool is gone: the resource is either an orphan in quarantine or starts a new pool
        if self.destroy_quarantined(handle) {
            return Ok(ReleaseOutcome::Destroyed);
        }
        if !self.config.auto_create_on_release {
            return Err(report(PoolError::not_found(name)));
        }
        if name.is_empty() {
            return Err(report(PoolError::InvalidPoolName));
        }

        self.detach(handle);
        let mut pool = Pool::new(name, None);
        pool.push(Slot::free(handle));
        self.pools.insert(name.to_string(), pool);
        self.park(handle);
        self.stats.total_released += 1;

        log::info!("Auto-created pool {} on release", name);
        Ok(ReleaseOutcome::AutoCreated)
    }

    /// Return several resources to one pool, stopping at the first error
    pub fn release_many(
        &mut self,
        name: &str,
        handles: impl IntoIterator<Item = ResourceHandle>,
    ) -> PoolResult<()> {
        for handle in handles {
            self.release(name, handle)?;
        }
        Ok(())
    }

    /// Release every in-use resource of a pool
    ///
    /// Returns how many resources were released; unknown pools are a no-op.
    /// Releasing everything in the quarantine destroys its content.
    pub fn release_all(&mut self, name: &str) -> usize {
        if name == QUARANTINE_POOL_NAME {
            return self.purge_quarantine();
        }
        let Some(pool) = self.pools.get(name) else {
            return 0;
        };

        let handles = pool.in_use_handles();
        handles
            .into_iter()
            .filter(|&handle| self.release_to_known(name, handle).is_ok())
            .count()
    }

    /// Remove a pool from the registry
    ///
    /// In-use resources move to the quarantine when `keep_in_use_resources`
    /// is set; everything else is destroyed right away. The name can be
    /// reused afterwards. Unknown names are a no-op.
    pub fn delete_pool(&mut self, name: &str, keep_in_use_resources: bool) -> DeleteSummary {
        if name == QUARANTINE_POOL_NAME {
            return DeleteSummary {
                destroyed: self.purge_quarantine(),
                quarantined: 0,
            };
        }
        let Some(mut pool) = self.pools.remove(name) else {
            log::debug!("Delete of unknown pool {} ignored", name);
            return DeleteSummary::default();
        };

        let mut summary = DeleteSummary::default();
        for slot in pool.take_slots() {
            if slot.in_use && keep_in_use_resources {
                self.quarantine_mut().push(Slot::taken(slot.handle));
                summary.quarantined += 1;
            } else {
                self.destroy(slot.handle);
                summary.destroyed += 1;
            }
        }

        log::info!(
            "Deleted pool {}: {} destroyed, {} quarantined",
            name,
            summary.destroyed,
            summary.quarantined
        );
        summary
    }

    /// Hand an externally built resource to a pool as a free slot
    ///
    /// A missing pool is created under the same policy as
    /// [`PoolRegistry::release`].
    pub fn adopt(&mut self, name: &str, mut resource: T) -> PoolResult<ResourceHandle> {
        if name.is_empty() {
            return Err(report(PoolError::InvalidPoolName));
        }
        if name == QUARANTINE_POOL_NAME {
            return Err(report(PoolError::ReservedPoolName { name: name.to_string() }));
        }
        if !self.pools.contains_key(name) {
            if !self.config.auto_create_on_release {
                return Err(report(PoolError::not_found(name)));
            }
            log::info!("Auto-created pool {} on adopt", name);
            self.pools.insert(name.to_string(), Pool::new(name, None));
        }

        resource.deactivate();
        let handle = ResourceHandle::new(self.resources.insert(resource));
        if let Some(pool) = self.pools.get_mut(name) {
            pool.push(Slot::free(handle));
        }
        self.stats.adoptions += 1;
        Ok(handle)
    }

    /// Destroy free resources beyond the first `keep_free` of a pool
    ///
    /// Returns the number of destroyed resources; unknown pools are a no-op.
    pub fn trim(&mut self, name: &str, keep_free: usize) -> usize {
        let Some(pool) = self.pools.get_mut(name) else {
            return 0;
        };
        let removed = pool.split_off_free(keep_free);
        let count = removed.len();
        for handle in removed {
            self.destroy(handle);
        }
        if count > 0 {
            log::debug!("Trimmed {} free resources from pool {}", count, name);
        }
        count
    }

    /// Destroy every quarantined resource, returning how many there were
    pub fn purge_quarantine(&mut self) -> usize {
        let Some(quarantine) = self.quarantine.as_mut() else {
            return 0;
        };
        let slots = quarantine.take_slots();
        let count = slots.len();
        for slot in slots {
            self.destroy(slot.handle);
        }
        if count > 0 {
            log::info!("Purged {} quarantined resources", count);
        }
        count
    }

    /// Whether a pool is registered under `name`
    pub fn contains_pool(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    /// Names of all registered pools, sorted, quarantine excluded
    pub fn pool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered pools, quarantine excluded
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Read-only view of a pool; the reserved name yields the quarantine
    pub fn pool(&self, name: &str) -> Option<&Pool<T>> {
        if name == QUARANTINE_POOL_NAME {
            self.quarantine.as_ref()
        } else {
            self.pools.get(name)
        }
    }

    /// Read-only view of the quarantine, if it was ever needed
    pub fn quarantine(&self) -> Option<&Pool<T>> {
        self.quarantine.as_ref()
    }

    /// Borrow the resource behind a handle
    pub fn get(&self, handle: ResourceHandle) -> Option<&T> {
        self.resources.get(handle.key())
    }

    /// Mutably borrow the resource behind a handle
    pub fn get_mut(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        self.resources.get_mut(handle.key())
    }

    /// Whether the resource is checked out, `None` for stale handles
    pub fn is_in_use(&self, handle: ResourceHandle) -> Option<bool> {
        self.owning_pool(handle)
            .and_then(|pool| pool.slots().iter().find(|slot| slot.handle == handle))
            .map(Slot::is_in_use)
    }

    /// Name of the pool currently owning the resource
    pub fn owner_of(&self, handle: ResourceHandle) -> Option<&str> {
        self.owning_pool(handle).map(Pool::name)
    }

    /// Number of live resources across all pools and the quarantine
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Snapshot of the usage counters
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            active_pools: self.pools.len(),
            in_use: self.pools.values().map(Pool::in_use_count).sum(),
            quarantined: self.quarantine.as_ref().map_or(0, Pool::len),
            ..self.stats.clone()
        }
    }

    fn check_new_name(&self, name: &str) -> PoolResult<()> {
        if name.is_empty() {
            return Err(report(PoolError::InvalidPoolName));
        }
        if name == QUARANTINE_POOL_NAME {
            return Err(report(PoolError::ReservedPoolName { name: name.to_string() }));
        }
        if self.pools.contains_key(name) {
            let error = PoolError::DuplicatePoolName { name: name.to_string() };
            log::error!("{}", error);
            return Err(error);
        }
        Ok(())
    }

    fn release_to_known(&mut self, name: &str, handle: ResourceHandle) -> PoolResult<ReleaseOutcome> {
        let pool = self
            .pools
            .get_mut(name)
            .ok_or_else(|| report(PoolError::not_found(name)))?;

        if let Some(slot) = pool.slot_of_mut(handle) {
            if !slot.in_use {
                return Err(report(PoolError::DoubleRelease { name: name.to_string() }));
            }
            slot.in_use = false;
            self.park(handle);
            self.stats.total_released += 1;
            return Ok(ReleaseOutcome::Recycled);
        }

        if !self.config.adopt_unrecognized {
            return Err(report(PoolError::ResourceUnrecognized { name: name.to_string() }));
        }

        let previous = self.detach(handle);
        if let Some(pool) = self.pools.get_mut(name) {
            pool.push(Slot::free(handle));
        }
        self.park(handle);
        self.stats.total_released += 1;
        self.stats.adoptions += 1;

        log::warn!(
            "Pool {} adopted a resource it did not hand out (previous owner: {})",
            name,
            previous.as_deref().unwrap_or("none")
        );
        Ok(ReleaseOutcome::Adopted)
    }

    fn manufacture(
        resources: &mut ResourceArena<T>,
        stats: &mut RegistryStats,
        pool: &Pool<T>,
    ) -> Option<ResourceHandle> {
        let mut resource = pool.manufacture()?;
        resource.deactivate();
        stats.total_manufactured += 1;
        Some(ResourceHandle::new(resources.insert(resource)))
    }

    fn quarantine_mut(&mut self) -> &mut Pool<T> {
        self.quarantine.get_or_insert_with(|| {
            log::info!("Creating quarantine pool {}", QUARANTINE_POOL_NAME);
            Pool::new(QUARANTINE_POOL_NAME, None)
        })
    }

    fn owning_pool(&self, handle: ResourceHandle) -> Option<&Pool<T>> {
        self.pools
            .values()
            .chain(self.quarantine.iter())
            .find(|pool| pool.contains(handle))
    }

    /// Remove the resource's slot from whichever pool holds it
    fn detach(&mut self, handle: ResourceHandle) -> Option<String> {
        self.pools
            .values_mut()
            .chain(self.quarantine.iter_mut())
            .find_map(|pool| pool.remove(handle).map(|_| pool.name().to_string()))
    }

    fn destroy_quarantined(&mut self, handle: ResourceHandle) -> bool {
        let removed = self
            .quarantine
            .as_mut()
            .and_then(|quarantine| quarantine.remove(handle))
            .is_some();
        if removed {
            self.destroy(handle);
            log::debug!("Destroyed quarantined resource");
        }
        removed
    }

    fn park(&mut self, handle: ResourceHandle) {
        if let Some(resource) = self.resources.get_mut(handle.key()) {
            resource.deactivate();
        }
    }

    fn destroy(&mut self, handle: ResourceHandle) {
        if let Some(mut resource) = self.resources.remove(handle.key()) {
            resource.destroy();
            self.stats.total_destroyed += 1;
        }
    }
}

impl<T: Poolable> Default for PoolRegistry<T> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<T: Poolable> std::fmt::Debug for PoolRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.pool_names())
            .field("quarantine", &self.quarantine)
            .field("resources", &self.resources.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Poolable> Drop for PoolRegistry<T> {
    fn drop(&mut self) {
        log::debug!("Destroying {} pooled resources", self.resources.len());
        for (_, resource) in &mut self.resources {
            resource.destroy();
        }
    }
}

fn report(error: PoolError) -> PoolError {
    log::warn!("{}", error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Probe {
        id: u32,
        kind: &'static str,
        active: bool,
        destroyed: Arc<AtomicUsize>,
    }

    impl Poolable for Probe {
        fn activate(&mut self) {
            self.active = true;
        }

        fn deactivate(&mut self) {
            self.active = false;
        }

        fn destroy(&mut self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ProbeTemplate {
        kind: &'static str,
        next_id: AtomicU32,
        destroyed: Arc<AtomicUsize>,
    }

    impl ProbeTemplate {
        fn new(kind: &'static str, destroyed: &Arc<AtomicUsize>) -> Self {
            Self {
                kind,
                next_id: AtomicU32::new(0),
                destroyed: Arc::clone(destroyed),
            }
        }
    }

    impl ResourceTemplate<Probe> for ProbeTemplate {
        fn manufacture(&self) -> Probe {
            Probe {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                kind: self.kind,
                // Starts active so the registry's deactivate on creation is observable
                active: true,
                destroyed: Arc::clone(&self.destroyed),
            }
        }
    }

    fn registry_with(name: &'static str, count: usize) -> (PoolRegistry<Probe>, Arc<AtomicUsize>) {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut registry = PoolRegistry::default();
        registry
            .create_pool(name, ProbeTemplate::new(name, &destroyed), count)
            .expect("create pool");
        (registry, destroyed)
    }

    fn loose_probe(destroyed: &Arc<AtomicUsize>) -> Probe {
        Probe {
            id: 99,
            kind: "loose",
            active: true,
            destroyed: Arc::clone(destroyed),
        }
    }

    #[test]
    fn test_create_pool_prewarms_inactive_resources() {
        let (registry, _) = registry_with("enemies", 3);
        let pool = registry.pool("enemies").expect("pool exists");

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.free_count(), 3);
        assert_eq!(pool.in_use_count(), 0);
        for slot in pool.slots() {
            assert!(!registry.get(slot.handle()).expect("live").active);
        }
    }

    #[test]
    fn test_create_empty_pool() {
        let (registry, _) = registry_with("empty", 0);
        assert!(registry.pool("empty").expect("pool exists").is_empty());
        assert_eq!(registry.resource_count(), 0);
    }

    #[test]
    fn test_duplicate_pool_leaves_existing_untouched() {
        let (mut registry, destroyed) = registry_with("enemies", 2);

        let result = registry.create_pool("enemies", ProbeTemplate::new("impostor", &destroyed), 5);
        assert_eq!(result, Err(PoolError::DuplicatePoolName { name: "enemies".into() }));

        let pool = registry.pool("enemies").expect("pool exists");
        assert_eq!(pool.len(), 2);
        assert_eq!(registry.resource_count(), 2);

        let handles = registry.acquire_many("enemies", 3).expect("acquire");
        for handle in handles {
            assert_eq!(registry.get(handle).expect("live").kind, "enemies");
        }
    }

    #[test]
    fn test_invalid_and_reserved_names() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut registry: PoolRegistry<Probe> = PoolRegistry::default();

        assert_eq!(
            registry.create_pool("", ProbeTemplate::new("x", &destroyed), 1),
            Err(PoolError::InvalidPoolName)
        );
        assert_eq!(
            registry.create_pool(QUARANTINE_POOL_NAME, ProbeTemplate::new("x", &destroyed), 1),
            Err(PoolError::ReservedPoolName { name: QUARANTINE_POOL_NAME.into() })
        );
        assert!(matches!(
            registry.acquire(QUARANTINE_POOL_NAME),
            Err(PoolError::ReservedPoolName { .. })
        ));
        assert_eq!(registry.pool_count(), 0);
    }

    #[test]
    fn test_enemies_scenario_grows_by_one() {
        let (mut registry, _) = registry_with("enemies", 3);

        let first = registry.acquire_many("enemies", 3).expect("acquire three");
        let pool = registry.pool("enemies").expect("pool exists");
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.free_count(), 0);
        assert_eq!(registry.stats().growth_events, 0);

        let fourth = registry.acquire("enemies").expect("acquire fourth");
        let pool = registry.pool("enemies").expect("pool exists");
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.in_use_count(), 4);
        assert!(!first.contains(&fourth));

        let resource = registry.get(fourth).expect("live");
        assert!(resource.active);
        assert_eq!(resource.id, 3);
        assert_eq!(registry.stats().growth_events, 1);
    }

    #[test]
    fn test_acquire_unknown_pool() {
        let mut registry: PoolRegistry<Probe> = PoolRegistry::default();
        assert_eq!(
            registry.acquire("nowhere"),
            Err(PoolError::PoolNotFound { name: "nowhere".into() })
        );
        assert_eq!(
            registry.acquire_many("nowhere", 4),
            Err(PoolError::PoolNotFound { name: "nowhere".into() })
        );
        assert_eq!(registry.stats().total_acquired, 0);
    }

    #[test]
    fn test_first_fit_prefers_earliest_slot() {
        let (mut registry, _) = registry_with("enemies", 3);
        let handles = registry.acquire_many("enemies", 3).expect("acquire");

        registry.release("enemies", handles[2]).expect("release third");
        registry.release("enemies", handles[0]).expect("release first");

        assert_eq!(registry.acquire("enemies"), Ok(handles[0]));
        assert_eq!(registry.acquire("enemies"), Ok(handles[2]));
    }

    #[test]
    fn test_acquire_release_acquire_recycles() {
        let (mut registry, destroyed) = registry_with("bullets", 1);

        let handle = registry.acquire("bullets").expect("acquire");
        assert_eq!(registry.release("bullets", handle), Ok(ReleaseOutcome::Recycled));
        assert!(!registry.get(handle).expect("live").active);

        assert_eq!(registry.acquire("bullets"), Ok(handle));
        assert_eq!(registry.pool("bullets").expect("pool").len(), 1);
        assert_eq!(registry.stats().total_manufactured, 1);
        assert_eq!(destroyed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_acquire_many_rolls_back_when_pool_cannot_grow() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut registry = PoolRegistry::default();
        let handle = registry.adopt("scraps", loose_probe(&destroyed)).expect("adopt");

        assert_eq!(
            registry.acquire_many("scraps", 2),
            Err(PoolError::TemplateMissing { name: "scraps".into() })
        );
        assert_eq!(registry.is_in_use(handle), Some(false));
        assert_eq!(registry.pool("scraps").expect("pool").len(), 1);
    }

    #[test]
    fn test_set_template_lets_pool_grow() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut registry = PoolRegistry::default();
        registry.adopt("scraps", loose_probe(&destroyed)).expect("adopt");
        registry
            .set_template("scraps", ProbeTemplate::new("scrap", &destroyed))
            .expect("set template");

        let handles = registry.acquire_many("scraps", 2).expect("acquire");
        assert_eq!(registry.get(handles[0]).expect("live").kind, "loose");
        assert_eq!(registry.get(handles[1]).expect("live").kind, "scrap");

        assert_eq!(
            registry.set_template("missing", ProbeTemplate::new("x", &destroyed)),
            Err(PoolError::PoolNotFound { name: "missing".into() })
        );
    }

    #[test]
    fn test_release_to_unknown_pool_auto_creates() {
        let (mut registry, _) = registry_with("enemies", 2);
        let handle = registry.acquire("enemies").expect("acquire");

        assert_eq!(registry.release("ghost", handle), Ok(ReleaseOutcome::AutoCreated));

        let ghost = registry.pool("ghost").expect("ghost pool");
        assert_eq!(ghost.len(), 1);
        assert_eq!(ghost.free_count(), 1);
        assert!(!ghost.has_template());
        assert_eq!(registry.owner_of(handle), Some("ghost"));
        assert!(!registry.get(handle).expect("live").active);
        assert_eq!(registry.pool("enemies").expect("enemies").len(), 1);
    }

    #[test]
    fn test_release_many_auto_creates_once() {
        let (mut registry, _) = registry_with("enemies", 3);
        let handles = registry.acquire_many("enemies", 3).expect("acquire");

        registry.release_many("ghost", handles.clone()).expect("release many");

        let ghost = registry.pool("ghost").expect("ghost pool");
        assert_eq!(ghost.len(), 3);
        assert_eq!(ghost.free_count(), 3);
        assert_eq!(registry.stats().adoptions, 2);
        assert!(registry.pool("enemies").expect("enemies").is_empty());
    }

    #[test]
    fn test_strict_policy_reports_instead_of_adopting() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut registry = PoolRegistry::new(RegistryConfig::strict());
        registry
            .create_pool("enemies", ProbeTemplate::new("enemies", &destroyed), 1)
            .expect("create enemies");
        registry
            .create_pool("bullets", ProbeTemplate::new("bullets", &destroyed), 1)
            .expect("create bullets");
        let enemy = registry.acquire("enemies").expect("acquire");

        assert_eq!(
            registry.release("ghost", enemy),
            Err(PoolError::PoolNotFound { name: "ghost".into() })
        );
        assert_eq!(
            registry.release("bullets", enemy),
            Err(PoolError::ResourceUnrecognized { name: "bullets".into() })
        );
        assert_eq!(
            registry.adopt("ghost", loose_probe(&destroyed)),
            Err(PoolError::PoolNotFound { name: "ghost".into() })
        );
        assert_eq!(registry.owner_of(enemy), Some("enemies"));
        assert_eq!(registry.is_in_use(enemy), Some(true));
    }

    #[test]
    fn test_release_to_other_pool_transfers_ownership() {
        let (mut registry, destroyed) = registry_with("enemies", 1);
        registry
            .create_pool("bosses", ProbeTemplate::new("bosses", &destroyed), 0)
            .expect("create bosses");
        let enemy = registry.acquire("enemies").expect("acquire");

        assert_eq!(registry.release("bosses", enemy), Ok(ReleaseOutcome::Adopted));

        assert!(registry.pool("enemies").expect("enemies").is_empty());
        assert_eq!(registry.owner_of(enemy), Some("bosses"));
        assert_eq!(registry.acquire("bosses"), Ok(enemy));
    }

    #[test]
    fn test_double_release_is_reported() {
        let (mut registry, _) = registry_with("bullets", 2);
        let handle = registry.acquire("bullets").expect("acquire");

        registry.release("bullets", handle).expect("first release");
        assert_eq!(
            registry.release("bullets", handle),
            Err(PoolError::DoubleRelease { name: "bullets".into() })
        );
        assert_eq!(registry.pool("bullets").expect("pool").free_count(), 2);
        assert_eq!(registry.stats().total_released, 1);
    }

    #[test]
    fn test_bullets_scenario_quarantines_in_use() {
        let (mut registry, destroyed) = registry_with("bullets", 3);
        let in_flight = registry.acquire_many("bullets", 2).expect("acquire");

        let summary = registry.delete_pool("bullets", true);
        assert_eq!(summary, DeleteSummary { destroyed: 1, quarantined: 2 });
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(!registry.contains_pool("bullets"));

        let quarantine = registry.quarantine().expect("quarantine created");
        assert_eq!(quarantine.name(), QUARANTINE_POOL_NAME);
        assert_eq!(quarantine.len(), 2);
        assert_eq!(quarantine.in_use_count(), 2);
        for handle in &in_flight {
            assert_eq!(registry.owner_of(*handle), Some(QUARANTINE_POOL_NAME));
            assert!(registry.get(*handle).expect("still alive").active);
        }
        assert_eq!(registry.stats().quarantined, 2);
    }

    #[test]
    fn test_release_from_quarantine_destroys() {
        let (mut registry, destroyed) = registry_with("bullets", 2);
        let handles = registry.acquire_many("bullets", 2).expect("acquire");
        registry.delete_pool("bullets", true);

        assert_eq!(
            registry.release(QUARANTINE_POOL_NAME, handles[0]),
            Ok(ReleaseOutcome::Destroyed)
        );
        assert!(registry.get(handles[0]).is_none());

        // Releasing under the old, now unknown, name also finds it in quarantine
        assert_eq!(registry.release("bullets", handles[1]), Ok(ReleaseOutcome::Destroyed));
        assert!(!registry.contains_pool("bullets"));

        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
        assert!(registry.quarantine().expect("quarantine").is_empty());
        assert_eq!(registry.release(QUARANTINE_POOL_NAME, handles[0]), Err(PoolError::StaleHandle));
    }

    #[test]
    fn test_delete_without_keep_destroys_in_use() {
        let (mut registry, destroyed) = registry_with("bullets", 2);
        let handle = registry.acquire("bullets").expect("acquire");

        let summary = registry.delete_pool("bullets", false);
        assert_eq!(summary, DeleteSummary { destroyed: 2, quarantined: 0 });
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
        assert!(registry.quarantine().is_none());
        assert!(registry.get(handle).is_none());
        assert_eq!(registry.release("bullets", handle), Err(PoolError::StaleHandle));
    }

    #[test]
    fn test_deleted_name_can_be_reused() {
        let (mut registry, destroyed) = registry_with("enemies", 1);
        assert_eq!(registry.delete_pool("missing", true), DeleteSummary::default());

        registry.delete_pool("enemies", true);
        registry
            .create_pool("enemies", ProbeTemplate::new("reborn", &destroyed), 2)
            .expect("recreate");

        let handle = registry.acquire("enemies").expect("acquire");
        assert_eq!(registry.get(handle).expect("live").kind, "reborn");
    }

    #[test]
    fn test_release_all() {
        let (mut registry, _) = registry_with("enemies", 4);
        registry.acquire_many("enemies", 3).expect("acquire");

        assert_eq!(registry.release_all("enemies"), 3);
        assert_eq!(registry.pool("enemies").expect("pool").free_count(), 4);
        assert_eq!(registry.release_all("enemies"), 0);
        assert_eq!(registry.release_all("unknown"), 0);
    }

    #[test]
    fn test_purge_quarantine_via_release_all() {
        let (mut registry, destroyed) = registry_with("bullets", 3);
        registry.acquire_many("bullets", 3).expect("acquire");
        registry.delete_pool("bullets", true);

        assert_eq!(registry.release_all(QUARANTINE_POOL_NAME), 3);
        assert_eq!(destroyed.load(Ordering::SeqCst), 3);
        assert_eq!(registry.resource_count(), 0);
    }

    #[test]
    fn test_trim_destroys_excess_free_resources() {
        let (mut registry, destroyed) = registry_with("enemies", 5);
        let held = registry.acquire("enemies").expect("acquire");

        assert_eq!(registry.trim("enemies", 1), 3);
        let pool = registry.pool("enemies").expect("pool");
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.free_count(), 1);
        assert_eq!(registry.is_in_use(held), Some(true));
        assert_eq!(destroyed.load(Ordering::SeqCst), 3);
        assert_eq!(registry.trim("unknown", 0), 0);
    }

    #[test]
    fn test_adopt_external_resource() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut registry = PoolRegistry::default();
        let handle = registry.adopt("pickups", loose_probe(&destroyed)).expect("adopt");

        assert!(!registry.get(handle).expect("live").active);
        assert_eq!(registry.acquire("pickups"), Ok(handle));
        assert!(registry.get(handle).expect("live").active);
        assert_eq!(registry.adopt("", loose_probe(&destroyed)), Err(PoolError::InvalidPoolName));
    }

    #[test]
    fn test_get_mut_changes_pooled_resource() {
        let (mut registry, _) = registry_with("enemies", 1);
        let handle = registry.acquire("enemies").expect("acquire");
        registry.get_mut(handle).expect("live").id = 42;
        registry.release("enemies", handle).expect("release");

        let again = registry.acquire("enemies").expect("acquire");
        assert_eq!(registry.get(again).expect("live").id, 42);
    }

    #[test]
    fn test_null_handle_is_stale() {
        let (mut registry, _) = registry_with("enemies", 1);
        assert_eq!(
            registry.release("enemies", ResourceHandle::null()),
            Err(PoolError::StaleHandle)
        );
        assert_eq!(registry.is_in_use(ResourceHandle::null()), None);
    }

    #[test]
    fn test_pool_names_sorted() {
        let (mut registry, destroyed) = registry_with("zombies", 0);
        registry
            .create_pool("asteroids", ProbeTemplate::new("asteroids", &destroyed), 0)
            .expect("create");
        assert_eq!(registry.pool_names(), vec!["asteroids", "zombies"]);
        assert_eq!(registry.pool_count(), 2);
    }

    #[test]
    fn test_stats_track_churn() {
        let (mut registry, _) = registry_with("enemies", 2);
        let handles = registry.acquire_many("enemies", 3).expect("acquire");
        registry.release("enemies", handles[0]).expect("release");

        let stats = registry.stats();
        assert_eq!(stats.active_pools, 1);
        assert_eq!(stats.in_use, 2);
        assert_eq!(stats.total_acquired, 3);
        assert_eq!(stats.total_released, 1);
        assert_eq!(stats.total_manufactured, 3);
        assert_eq!(stats.growth_events, 1);
    }

    #[test]
    fn test_drop_destroys_everything() {
        let (mut registry, destroyed) = registry_with("enemies", 3);
        registry.acquire("enemies").expect("acquire");
        drop(registry);
        assert_eq!(destroyed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_shared_registry_across_threads() {
        let (registry, _) = registry_with("enemies", 0);
        let shared = registry.into_shared();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let mut registry = shared.lock().expect("lock");
                        let handle = registry.acquire("enemies").expect("acquire");
                        registry.release("enemies", handle).expect("release");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker");
        }

        let registry = shared.lock().expect("lock");
        assert_eq!(registry.stats().total_acquired, 40);
        assert_eq!(registry.pool("enemies").expect("pool").len(), 1);
    }
}
