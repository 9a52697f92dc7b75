//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod minigame;
pub mod pointer;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{resolve_pair, resolve_pairs};
pub use minigame::{Minigame, Phase};
pub use pointer::{DragSession, PointerSample, body_at};
pub use state::{Body, BodyId, Bounds, ModelState, Species, World};
pub use tick::{integrate, resolve_walls, step};
pub use timer::{Scheduler, TimerEvent, TimerHandle};
