//! Per-frame simulation step
//!
//! Advances every body one logical tick: integration for bodies not being
//! held, then pair collisions, then wall resolution. Velocities are in
//! container units per tick, so integration needs no dt.

use super::collision::resolve_pairs;
use super::pointer::DragSession;
use super::state::World;

/// Advance the world one tick
pub fn step(world: &mut World, drag: &DragSession) {
    integrate(world, drag);
    resolve_pairs(world);
    resolve_walls(world, drag);
}

/// Gravity, air damping, translation, and the rolling spin hint.
/// A held body is under direct pointer control and is skipped entirely.
pub fn integrate(world: &mut World, drag: &DragSession) {
    let held = drag.held();
    let phys = world.config.physics;
    for body in world.bodies_mut() {
        if Some(body.id) == held {
            continue;
        }
        body.vel.y += phys.gravity;
        body.vel *= phys.air_damping;
        body.pos += body.vel;
        // rolling suggestion for the renderer
        if body.vel.x.abs() > 0.1 {
            body.spin -= body.vel.x * 0.01;
        }
    }
}

/// Clamp bodies back inside the container, bouncing off each face.
///
/// Faces resolve in floor, ceiling, side order; a body straddling two
/// faces resolves each independently. Only the floor applies friction,
/// so fruit settles on the ground instead of sliding forever.
pub fn resolve_walls(world: &mut World, drag: &DragSession) {
    let held = drag.held();
    let phys = world.config.physics;
    let hw = world.bounds().half_width();
    let hh = world.bounds().half_height();
    for body in world.bodies_mut() {
        if Some(body.id) == held {
            continue;
        }
        let floor = -hh + body.radius;
        let ceiling = hh - body.radius;
        let left = -hw + body.radius;
        let right = hw - body.radius;

        if body.pos.y < floor {
            body.pos.y = floor;
            body.vel.y *= -phys.bounce;
            body.vel.x *= phys.floor_friction;
            // rest snap: kill the residual micro-bounce once the body sits
            // on the floor with next to no vertical speed
            if body.vel.y.abs() < phys.rest_threshold && body.pos.y <= floor + 0.1 {
                body.vel.y = 0.0;
                body.vel.x *= 0.9;
                if body.vel.x.abs() < 0.1 {
                    body.vel.x = 0.0;
                }
            }
        }
        if body.pos.y > ceiling {
            body.pos.y = ceiling;
            body.vel.y *= -phys.bounce;
        }
        if body.pos.x < left {
            body.pos.x = left;
            body.vel.x *= -phys.bounce;
        } else if body.pos.x > right {
            body.pos.x = right;
            body.vel.x *= -phys.bounce;
        }
    }
}
