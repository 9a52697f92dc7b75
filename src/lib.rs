//! Fruitbox - draggable bouncing fruit in a box, with a timed tap minigame
//!
//! Core modules:
//! - `sim`: deterministic simulation (physics, collisions, interaction, minigame)
//! - `config`: data-driven tunables
//! - `highscores`: persisted best score
//! - `assets`: model loader seam
//! - `ui`: overlay seam
//!
//! Rendering, asset fetching, and DOM overlays live in the host; the crate
//! exposes body state per frame and receives pointer samples and resize
//! events in container-local coordinates.

pub mod assets;
pub mod config;
pub mod highscores;
pub mod sim;
pub mod ui;

pub use assets::{AssetSource, FailingAssets, InstantAssets, LoadStatus};
pub use config::SimConfig;
pub use highscores::{LocalScore, MemoryScore, ScoreStore};
pub use ui::{NullOverlay, Overlay};

/// Frame and sizing constants
pub mod consts {
    /// Logical tick length in seconds (60 Hz; velocities are per-tick)
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Default fruit radius for sandbox spawns
    pub const DEFAULT_RADIUS: f32 = 50.0;
}
