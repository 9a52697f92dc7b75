//! Simulation tunables
//!
//! Every constant the physics, interaction, and minigame layers read lives
//! here, so hosts can retune without recompiling. Values are fixed for the
//! lifetime of a session once the `World` is built.

use serde::{Deserialize, Serialize};

/// Physics constants applied each tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Per-tick vertical acceleration (negative = down)
    pub gravity: f32,
    /// Velocity fraction kept when bouncing off a wall
    pub bounce: f32,
    /// Horizontal damping applied on floor contact
    pub floor_friction: f32,
    /// Vertical speed below which a floor contact counts as rest
    pub rest_threshold: f32,
    /// Uniform per-tick velocity decay, both axes
    pub air_damping: f32,
    /// Restitution for body-body impacts
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -0.5,
            bounce: 0.7,
            floor_friction: 0.98,
            rest_threshold: 0.5,
            air_damping: 0.995,
            restitution: 0.8,
        }
    }
}

/// Drag/fling interaction constants
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Seconds the pointer may rest before a release counts as stationary
    pub stationary_hold: f32,
    /// Minimum drag duration that can produce a fling
    pub min_fling_duration: f32,
    /// Displacement-over-time to velocity conversion factor
    pub force_factor: f32,
    /// Per-axis fling velocity cap
    pub max_fling: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            stationary_hold: 0.1,
            min_fling_duration: 0.01,
            force_factor: 0.03,
            max_fling: 10.0,
        }
    }
}

/// Minigame pacing and balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MinigameConfig {
    /// Countdown start value (3-2-1)
    pub countdown_from: u8,
    /// Round length in seconds
    pub game_duration: u32,
    /// Seconds between spawner fires
    pub spawn_interval: f32,
    /// Seconds between game clock decrements
    pub clock_interval: f32,
    /// Lifetime of a transient fruit spawned during play
    pub despawn_delay: f32,
    /// Population cap enforced after each spawn
    pub population_cap: usize,
    /// Probability that the spawner picks a strawberry
    pub strawberry_weight: f32,
    /// Initial population, per species
    pub initial_strawberries: usize,
    pub initial_apples: usize,
    /// Radius for the initial population batch
    pub initial_radius: f32,
    /// Radius for fruit spawned during play
    pub spawn_radius: f32,
    /// Seconds the terminal screen stays up before returning to sandbox
    pub end_grace: f32,
    /// Miss-penalty shove: impulse at the tap point and its reach
    pub shove_strength: f32,
    pub shove_range: f32,
}

impl Default for MinigameConfig {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            game_duration: 30,
            spawn_interval: 0.6,
            clock_interval: 1.0,
            despawn_delay: 1.7,
            population_cap: 25,
            strawberry_weight: 0.7,
            initial_strawberries: 4,
            initial_apples: 2,
            initial_radius: 40.0,
            spawn_radius: 28.0,
            end_grace: 3.0,
            shove_strength: 6.0,
            shove_range: 240.0,
        }
    }
}

/// Complete tunable set owned by the `World`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub interaction: InteractionConfig,
    pub minigame: MinigameConfig,
}

impl SimConfig {
    /// Parse a config from JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("config parse failed ({err}), using defaults");
                Self::default()
            }
        }
    }
}
