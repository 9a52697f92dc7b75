//! Body-body collision detection and response
//!
//! Every unordered pair is resolved once per tick, sequentially and
//! independently; there is no relaxation pass across overlapping groups.
//! Bodies are equal-mass circles, so both the positional correction and
//! the impulse split evenly.

use super::state::{Body, World};

/// Resolve every overlapping pair in the active set, in insertion order
pub fn resolve_pairs(world: &mut World) {
    let restitution = world.config.physics.restitution;
    let bodies = world.bodies_mut();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            resolve_pair(&mut head[i], &mut tail[0], restitution);
        }
    }
}

/// Separate one overlapping pair and exchange impulse along the contact
/// normal. Coincident centers have no usable normal and are skipped.
pub fn resolve_pair(a: &mut Body, b: &mut Body, restitution: f32) {
    let delta = a.pos - b.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance <= 0.0 || distance >= min_distance {
        return;
    }
    let normal = delta / distance;

    // push each body half the overlap apart
    let overlap = min_distance - distance;
    let separation = normal * (overlap * 0.5);
    a.pos += separation;
    b.pos -= separation;

    // relative velocity along the normal; positive means already separating,
    // in which case the overlap correction above is all that's needed
    let speed = (a.vel - b.vel).dot(normal);
    if speed > 0.0 {
        return;
    }

    let impulse = speed * restitution;
    a.vel -= normal * impulse;
    b.vel += normal * impulse;

    // cosmetic spin feedback for the renderer
    a.spin += (b.vel.x - a.vel.x) * 0.005;
    b.spin += (a.vel.x - b.vel.x) * 0.005;
}
