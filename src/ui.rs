//! Score/timer overlay seam
//!
//! The host renders badges, countdown screens, and the game-over card; the
//! core pushes text updates and lifecycle calls through this trait and
//! never reads anything back. All methods default to no-ops so overlays
//! implement only what they surface.

pub trait Overlay {
    fn score(&mut self, _score: i32) {}
    fn time_remaining(&mut self, _seconds: u32) {}
    fn high_score(&mut self, _score: u32) {}
    /// Countdown tick before play begins (3, 2, 1)
    fn countdown(&mut self, _value: u8) {}
    fn game_over(&mut self, _final_score: i32, _new_best: bool) {}
    fn show(&mut self) {}
    fn hide(&mut self) {}
}

/// Overlay that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOverlay;

impl Overlay for NullOverlay {}
