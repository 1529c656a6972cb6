//! Headless asteroids-style loop that churns pooled game objects
//!
//! Bullets, asteroids and explosions are acquired from named pools, live for
//! a few ticks and go back to their pool. Every level change unloads the
//! asteroid pool while asteroids are still flying, so their resources pass
//! through the quarantine before being destroyed.
//!
//! Usage: `pool_demo [presets.toml|presets.ron]`

use object_pool::foundation::logging;
use object_pool::prelude::*;
use object_pool::{PoolError, PoolPreset, PresetError};
use rand::prelude::*;

const TICKS: u32 = 600;
const LEVEL_LENGTH: u32 = 200;
const BULLET_FIRE_CHANCE: f64 = 0.6;
const ASTEROID_SPAWN_CHANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Asteroid,
    Bullet,
    Explosion,
}

impl Kind {
    fn pool_name(self) -> &'static str {
        match self {
            Self::Asteroid => "asteroids",
            Self::Bullet => "bullets",
            Self::Explosion => "explosions",
        }
    }
}

#[derive(Debug, Clone)]
struct GameObject {
    kind: Kind,
    position: [f32; 2],
    velocity: [f32; 2],
    ttl: u32,
    visible: bool,
}

impl GameObject {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
            ttl: 0,
            visible: false,
        }
    }

    /// Advance one tick, returning whether the object is still alive
    fn step(&mut self) -> bool {
        self.position[0] += self.velocity[0];
        self.position[1] += self.velocity[1];
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl > 0
    }
}

impl Poolable for GameObject {
    fn activate(&mut self) {
        self.visible = true;
    }

    fn deactivate(&mut self) {
        self.visible = false;
        self.ttl = 0;
        self.position = [0.0, 0.0];
        self.velocity = [0.0, 0.0];
    }

    fn destroy(&mut self) {
        log::trace!("Destroyed {:?}", self.kind);
    }
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// An object currently in the world
struct Live {
    pool: &'static str,
    handle: ResourceHandle,
}

fn main() {
    logging::init_with_level("info");

    if let Err(error) = run() {
        log::error!("Demo failed: {}", error);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let loader = match std::env::args().nth(1) {
        Some(path) => PresetLoader::from_file(path)?,
        None => PresetLoader::new(default_presets()),
    };

    let catalog = catalog();
    let mut registry = PoolRegistry::new(RegistryConfig::default());
    let report = loader.apply(&mut registry, &catalog);
    for (name, error) in &report.failures {
        log::warn!("Preset {} not applied: {}", name, error);
    }

    let mut rng = StdRng::seed_from_u64(7);
    let mut live = Vec::new();

    for tick in 0..TICKS {
        if tick > 0 && tick % LEVEL_LENGTH == 0 {
            next_level(&mut registry, &catalog, tick / LEVEL_LENGTH)?;
        }
        spawn(&mut registry, &mut rng, &mut live)?;
        expire(&mut registry, &mut live)?;
    }

    let stats = registry.stats();
    log::info!(
        "Finished {} ticks: {} acquired, {} manufactured, {} destroyed, reuse {:.1}%",
        TICKS,
        stats.total_acquired,
        stats.total_manufactured,
        stats.total_destroyed,
        stats.reuse_ratio() * 100.0
    );
    for name in registry.pool_names() {
        if let Some(pool) = registry.pool(name) {
            log::info!("  {:<12} {:>3} slots, {:>3} in use", name, pool.len(), pool.in_use_count());
        }
    }
    Ok(())
}

fn default_presets() -> PresetConfig {
    PresetConfig {
        only_at_start: true,
        presets: vec![
            PoolPreset::new(Kind::Asteroid.pool_name(), "asteroid", 8),
            PoolPreset::new(Kind::Bullet.pool_name(), "bullet", 16),
            PoolPreset::new(Kind::Explosion.pool_name(), "explosion", 4),
        ],
    }
}

fn catalog() -> TemplateCatalog<GameObject> {
    TemplateCatalog::new()
        .with("asteroid", || GameObject::new(Kind::Asteroid))
        .with("bullet", || GameObject::new(Kind::Bullet))
        .with("explosion", || GameObject::new(Kind::Explosion))
}

fn launch(
    registry: &mut PoolRegistry<GameObject>,
    live: &mut Vec<Live>,
    kind: Kind,
    ttl: u32,
    position: [f32; 2],
    velocity: [f32; 2],
) -> Result<(), DemoError> {
    let pool = kind.pool_name();
    let handle = registry.acquire(pool)?;
    if let Some(object) = registry.get_mut(handle) {
        object.ttl = ttl;
        object.position = position;
        object.velocity = velocity;
    }
    live.push(Live { pool, handle });
    Ok(())
}

fn spawn(
    registry: &mut PoolRegistry<GameObject>,
    rng: &mut StdRng,
    live: &mut Vec<Live>,
) -> Result<(), DemoError> {
    if rng.gen_bool(BULLET_FIRE_CHANCE) {
        let velocity = [rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0)];
        launch(registry, live, Kind::Bullet, rng.gen_range(20..40), [0.0, 0.0], velocity)?;
    }
    if rng.gen_bool(ASTEROID_SPAWN_CHANCE) {
        let position = [rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)];
        let velocity = [rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)];
        launch(registry, live, Kind::Asteroid, rng.gen_range(150..350), position, velocity)?;
    }
    Ok(())
}

fn expire(registry: &mut PoolRegistry<GameObject>, live: &mut Vec<Live>) -> Result<(), DemoError> {
    let mut still_live = Vec::with_capacity(live.len());

    for entry in live.drain(..) {
        if registry.get_mut(entry.handle).map_or(false, GameObject::step) {
            still_live.push(entry);
            continue;
        }

        let (kind, position) = match registry.get(entry.handle) {
            Some(object) => (object.kind, object.position),
            None => continue,
        };

        // Leftovers of an unloaded level go back to the quarantine, not to the new pool
        let pool = if registry.owner_of(entry.handle) == Some(QUARANTINE_POOL_NAME) {
            QUARANTINE_POOL_NAME
        } else {
            entry.pool
        };
        if registry.release(pool, entry.handle)? == ReleaseOutcome::Destroyed {
            log::debug!("{:?} from an unloaded level destroyed", kind);
            continue;
        }

        if kind == Kind::Asteroid {
            launch(registry, &mut still_live, Kind::Explosion, 10, position, [0.0, 0.0])?;
        }
    }

    *live = still_live;
    Ok(())
}

fn next_level(
    registry: &mut PoolRegistry<GameObject>,
    catalog: &TemplateCatalog<GameObject>,
    level: u32,
) -> Result<(), DemoError> {
    let name = Kind::Asteroid.pool_name();
    let summary = registry.delete_pool(name, true);
    log::info!(
        "Level {}: unloaded {} ({} destroyed, {} still flying)",
        level,
        name,
        summary.destroyed,
        summary.quarantined
    );

    if let Some(template) = catalog.get("asteroid") {
        registry.create_pool(name, template, 8)?;
    }

    let trimmed = registry.trim(Kind::Bullet.pool_name(), 16);
    if trimmed > 0 {
        log::info!("Level {}: trimmed {} idle bullets", level, trimmed);
    }
    Ok(())
}
