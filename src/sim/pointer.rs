//! Pointer interaction
//!
//! Press/move/release arrive pre-translated into container-local
//! coordinates. One body at a time can be held; while held it tracks the
//! pointer directly (no physics) and the integrator leaves it alone.
//! Release converts the drag's net displacement into a capped fling
//! velocity, unless the pointer was parked before letting go.

use glam::Vec2;

use super::state::{BodyId, World};

/// One pointer event in container-local coordinates.
///
/// `pos` is `None` when the device delivered no resolvable coordinates
/// (some touch-cancel paths do this); `time` is seconds from any
/// monotonic origin.
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    pub pos: Option<Vec2>,
    pub time: f64,
}

impl PointerSample {
    pub fn at(pos: Vec2, time: f64) -> Self {
        Self {
            pos: Some(pos),
            time,
        }
    }
}

/// First body under the point, in active-set order
pub fn body_at(world: &World, point: Vec2) -> Option<BodyId> {
    world
        .bodies()
        .iter()
        .find(|b| b.alive && point.distance(b.pos) <= b.radius)
        .map(|b| b.id)
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    target: BodyId,
    start_pos: Vec2,
    last_pos: Vec2,
    start_time: f64,
    last_move_time: f64,
}

/// Drag state machine: Idle -> Dragging -> Idle
#[derive(Debug, Default)]
pub struct DragSession {
    hold: Option<Hold>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body currently held, if any
    pub fn held(&self) -> Option<BodyId> {
        self.hold.map(|h| h.target)
    }

    pub fn is_active(&self) -> bool {
        self.hold.is_some()
    }

    /// Pointer went down. Grabs the first body under the pointer and stops
    /// its motion. Returns the grabbed body, if any.
    pub fn press(&mut self, world: &mut World, sample: PointerSample) -> Option<BodyId> {
        if self.hold.is_some() {
            // one concurrent drag system-wide
            return None;
        }
        let pos = sample.pos?;
        let target = body_at(world, pos)?;
        if let Some(body) = world.body_mut(target) {
            body.vel = Vec2::ZERO;
        }
        self.hold = Some(Hold {
            target,
            start_pos: pos,
            last_pos: pos,
            start_time: sample.time,
            last_move_time: sample.time,
        });
        Some(target)
    }

    /// Pointer moved. The held body goes exactly where the pointer is;
    /// bounds are not enforced until release or resize.
    pub fn motion(&mut self, world: &mut World, sample: PointerSample) {
        let Some(hold) = self.hold.as_mut() else {
            return;
        };
        let Some(pos) = sample.pos else {
            return;
        };
        match world.body_mut(hold.target) {
            Some(body) => {
                body.pos = pos;
                hold.last_pos = pos;
                hold.last_move_time = sample.time;
            }
            // target vanished mid-drag (scene cleared under the pointer)
            None => self.hold = None,
        }
    }

    /// Pointer went up: convert the drag into a fling.
    ///
    /// A release without coordinates falls back to the last known pointer
    /// position. A pointer parked longer than the stationary threshold
    /// releases dead: the displacement accumulated before the stop must
    /// not fling.
    pub fn release(&mut self, world: &mut World, sample: PointerSample) {
        let Some(hold) = self.hold.take() else {
            return;
        };
        let cfg = world.config.interaction;
        let Some(body) = world.body_mut(hold.target) else {
            return;
        };

        let end_pos = sample.pos.unwrap_or(hold.last_pos);
        let duration = (sample.time - hold.start_time) as f32;
        let idle_for = (sample.time - hold.last_move_time) as f32;

        body.vel = if idle_for > cfg.stationary_hold {
            Vec2::ZERO
        } else if duration > cfg.min_fling_duration {
            let delta = end_pos - hold.start_pos;
            (delta / duration * cfg.force_factor)
                .clamp(Vec2::splat(-cfg.max_fling), Vec2::splat(cfg.max_fling))
        } else {
            Vec2::ZERO
        };
    }

    /// Drop the hold without imparting any velocity
    pub fn abort(&mut self) {
        self.hold = None;
    }
}
