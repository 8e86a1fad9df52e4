//! Pairwise collision sweep
//!
//! The system owns every active [`BoxCollider`] and tests each unordered pair
//! once per call to [`CollisionSystem::check_all`]. Callbacks run inline as
//! overlaps are found and get mutable access to the transform table, so a
//! callback that moves an object changes what later pairs in the same sweep
//! see. Nothing is remembered between sweeps: a pair that stays overlapped is
//! reported again every tick.

use crate::config::CollisionConfig;
use crate::physics::collision::BoxCollider;
use crate::physics::errors::CollisionError;
use crate::scene::{TransformTable, WorldMatrixSource};

/// Two colliders found overlapping during a sweep
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Lexicographically smaller id
    pub a: String,
    /// Lexicographically larger id
    pub b: String,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller id first)
    pub fn new(a: &str, b: &str) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    /// Whether `id` is one side of this pair
    pub fn involves(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }
}

/// Registry of active colliders
#[derive(Debug, Default)]
pub struct CollisionSystem {
    colliders: Vec<BoxCollider>,
    config: CollisionConfig,
}

impl CollisionSystem {
    /// Create an empty system
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            colliders: Vec::new(),
            config,
        }
    }

    /// Sweep settings
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Add a collider. Ids must be unique among active colliders.
    pub fn register(&mut self, collider: BoxCollider) -> Result<(), CollisionError> {
        if self.contains(collider.id()) {
            return Err(CollisionError::DuplicateId(collider.id().to_string()));
        }
        log::debug!("Registered collider '{}'", collider.id());
        self.colliders.push(collider);
        Ok(())
    }

    /// Remove a collider by id and hand it back
    pub fn unregister(&mut self, id: &str) -> Option<BoxCollider> {
        let index = self.colliders.iter().position(|c| c.id() == id)?;
        log::debug!("Unregistered collider '{}'", id);
        Some(self.colliders.swap_remove(index))
    }

    /// Borrow a collider by id
    pub fn get(&self, id: &str) -> Option<&BoxCollider> {
        self.colliders.iter().find(|c| c.id() == id)
    }

    /// Mutably borrow a collider by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut BoxCollider> {
        self.colliders.iter_mut().find(|c| c.id() == id)
    }

    /// Whether a collider with `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of active colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no colliders are registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Ids of every active collider, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.colliders.iter().map(BoxCollider::id)
    }

    /// Drop every collider
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    /// Check that every collider's transform handle still resolves
    pub fn validate(&self, source: &impl WorldMatrixSource) -> Result<(), CollisionError> {
        for collider in &self.colliders {
            if source.world_matrix(collider.transform()).is_none() {
                return Err(CollisionError::MissingTransform {
                    collider: collider.id().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Test every unordered pair once and fire both callbacks on each overlap.
    ///
    /// Returns the overlapping pairs in the order they were found. A pair
    /// whose transform lookup fails is skipped with a warning.
    pub fn check_all(&mut self, transforms: &mut TransformTable) -> Vec<CollisionPair> {
        let config = self.config;
        let mut pairs = Vec::new();

        for j in 1..self.colliders.len() {
            let (head, tail) = self.colliders.split_at_mut(j);
            let b = &mut tail[0];

            for a in head.iter_mut() {
                let hit = match a.intersects(b, &*transforms, &config) {
                    Ok(hit) => hit.is_some(),
                    Err(e) => {
                        log::warn!("Skipping pair '{}' / '{}': {}", a.id(), b.id(), e);
                        continue;
                    }
                };
                log::trace!("Pair '{}' / '{}': {}", a.id(), b.id(), if hit { "overlap" } else { "clear" });
                if !hit {
                    continue;
                }

                pairs.push(CollisionPair::new(a.id(), b.id()));
                a.notify(b.id(), transforms);
                b.notify(a.id(), transforms);
            }
        }

        pairs
    }
}
