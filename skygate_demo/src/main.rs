//! Gate sweep demo
//!
//! Indexes a cube, attaches box colliders to a ship and a gate, then slides the
//! gate along X and reports what the collision sweep sees at each stop.
//!
//! Usage: `gate_sweep_demo [engine.toml | engine.ron]`

use std::path::PathBuf;

use skygate_engine::assets::{primitives, MeshError, MeshIndexer};
use skygate_engine::config::{Config, ConfigError, EngineConfig};
use skygate_engine::foundation::logging;
use skygate_engine::foundation::math::Vec3;
use skygate_engine::physics::{BoxCollider, CollisionError, CollisionSystem};
use skygate_engine::scene::{Transform, TransformTable};
use thiserror::Error;

#[derive(Error, Debug)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("collision: {0}")]
    Collision(#[from] CollisionError),
}

fn load_config() -> Result<EngineConfig, DemoError> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Ok(EngineConfig::load_from_file(&path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    log::info!("Indexing strategy: {:?}", config.indexer.strategy);

    let mesh = MeshIndexer::new(&config.indexer).index(&primitives::cube("cube", 1.0))?;
    log::info!(
        "Cube indexed: {} vertices, {} elements",
        mesh.vertex_count(),
        mesh.element_count()
    );

    let mut transforms = TransformTable::new();
    let ship = transforms.insert(Transform::new());
    let gate = transforms.insert(Transform::new());

    let mut collisions = CollisionSystem::new(config.collision);
    for (id, handle) in [("ship", ship), ("gate", gate)] {
        let mut collider = BoxCollider::new(id, handle).with_callback(move |other, _| {
            log::info!("'{id}' hit '{other}'");
        });
        collider.recalculate_from_mesh(&mesh);
        collisions.register(collider)?;
    }

    for x in [1.0, 2.0, 3.0] {
        if let Some(transform) = transforms.get_mut(gate) {
            transform.location = Vec3::new(x, 0.0, 0.0);
        }
        transforms.rebuild_all();
        collisions.validate(&transforms)?;

        let pairs = collisions.check_all(&mut transforms);
        log::info!("Gate at x = {x}: {} overlapping pair(s)", pairs.len());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting gate sweep demo");

    run()?;

    log::info!("Done");
    Ok(())
}
