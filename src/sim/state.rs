//! Simulation state and body lifecycle
//!
//! Everything the renderer reads per frame lives here: the container
//! bounds, the active body set in insertion order, and the tunables. The
//! `World` also owns the seeded RNG so spawning stays deterministic.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetSource, LoadStatus};
use crate::config::SimConfig;

/// Stable body identity; cross-references (drag target, despawn timers)
/// use this, never indices into the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Fruit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Strawberry,
    Apple,
}

impl Species {
    /// Asset key handed to the model loader
    pub fn asset_key(self) -> &'static str {
        match self {
            Species::Strawberry => "berry/scene.gltf",
            Species::Apple => "apple/scene.gltf",
        }
    }

    /// Tint for the fallback shape when the model fails to load
    pub fn fallback_color(self) -> u32 {
        match self {
            Species::Strawberry => 0xff4444,
            Species::Apple => 0x44ff44,
        }
    }

    /// Score delta when tapped during the minigame
    pub fn tap_points(self) -> i32 {
        match self {
            Species::Strawberry => 1,
            Species::Apple => -1,
        }
    }

    /// Whether minigame spawns of this kind vanish on their own
    pub fn is_transient(self) -> bool {
        matches!(self, Species::Strawberry)
    }
}

/// Model readiness for one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelState {
    /// Load request in flight
    Loading,
    /// Model arrived; `scale` normalizes its natural radius to the body radius
    Ready { scale: f32 },
    /// Load failed; the renderer substitutes a default sphere at the body radius
    Fallback,
}

/// One simulated fruit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub species: Species,
    /// Container-local position, origin at the container center
    pub pos: Vec2,
    /// Velocity in container units per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Accumulated rotation suggestion for the renderer; physics never reads it
    pub spin: f32,
    pub alive: bool,
    pub model: ModelState,
}

/// Container extents, origin at the center
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// The whole simulation: bounds, tunables, and the active body set
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    bounds: Bounds,
    bodies: Vec<Body>,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self::with_config(width, height, seed, SimConfig::default())
    }

    pub fn with_config(width: f32, height: f32, seed: u64, config: SimConfig) -> Self {
        Self {
            config,
            bounds: Bounds::new(width, height),
            bodies: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Active bodies in insertion order (oldest first)
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Weighted coin flip on the world's own RNG
    pub fn roll(&mut self, probability: f32) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0) as f64)
    }

    /// Spawn a batch of one species, radius fixed for the batch, each body
    /// with an independent random position and launch velocity. A model
    /// load is requested per body. Returns the new ids.
    pub fn spawn(
        &mut self,
        assets: &mut dyn AssetSource,
        species: Species,
        count: usize,
        radius: f32,
    ) -> Vec<BodyId> {
        let hw = self.bounds.half_width();
        let hh = self.bounds.half_height();
        let x_max = (hw - radius).max(0.0);
        let y_max = (hh - radius).max(0.0);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_body_id();
            // fresh fruit drops in from the upper half so it doesn't
            // materialize inside the settled pile
            let pos = Vec2::new(
                self.rng.random_range(-x_max..=x_max),
                self.rng.random_range(0.0..=y_max),
            );
            let vel = Vec2::new(self.rng.random_range(-3.0..=3.0), 0.0);
            assets.request(id, species);
            self.bodies.push(Body {
                id,
                species,
                pos,
                vel,
                radius,
                spin: 0.0,
                alive: true,
                model: ModelState::Loading,
            });
            ids.push(id);
        }
        log::debug!("spawned {count} {species:?} (radius {radius})");
        ids
    }

    /// Detach a body from the active set. Idempotent.
    pub fn remove(&mut self, id: BodyId) -> bool {
        let Some(index) = self.bodies.iter().position(|b| b.id == id) else {
            return false;
        };
        self.bodies[index].alive = false;
        self.bodies.remove(index);
        log::debug!("removed body {}", id.0);
        true
    }

    /// Remove every body unconditionally
    pub fn clear(&mut self) {
        for body in &mut self.bodies {
            body.alive = false;
        }
        self.bodies.clear();
    }

    /// Drop the oldest bodies until the population fits the cap.
    /// Returns the removed ids so callers can cancel timers keyed on them.
    pub fn cull(&mut self, max: usize) -> Vec<BodyId> {
        if self.bodies.len() <= max {
            return Vec::new();
        }
        let surplus = self.bodies.len() - max;
        let removed: Vec<BodyId> = self
            .bodies
            .drain(..surplus)
            .map(|mut body| {
                body.alive = false;
                body.id
            })
            .collect();
        log::debug!("culled {} oldest bodies", removed.len());
        removed
    }

    /// Apply a container resize, re-clamping every body (held ones included)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        let hw = self.bounds.half_width();
        let hh = self.bounds.half_height();
        for body in &mut self.bodies {
            if hw >= body.radius {
                body.pos.x = body.pos.x.clamp(-hw + body.radius, hw - body.radius);
            }
            if hh >= body.radius {
                body.pos.y = body.pos.y.clamp(-hh + body.radius, hh - body.radius);
            }
        }
    }

    /// Poll the loader for every body still waiting on a model
    pub fn resolve_models(&mut self, assets: &mut dyn AssetSource) {
        for body in &mut self.bodies {
            if body.model != ModelState::Loading {
                continue;
            }
            match assets.poll(body.id) {
                LoadStatus::Pending => {}
                LoadStatus::Ready { natural_radius } => {
                    let scale = if natural_radius > 0.0 {
                        body.radius / natural_radius
                    } else {
                        1.0
                    };
                    body.model = ModelState::Ready { scale };
                }
                LoadStatus::Failed => {
                    log::debug!("model load failed for body {}, using fallback", body.id.0);
                    body.model = ModelState::Fallback;
                }
            }
        }
    }

    /// True once no body is still waiting on its model
    pub fn models_settled(&self) -> bool {
        self.bodies.iter().all(|b| b.model != ModelState::Loading)
    }
}
