//! Model loader seam
//!
//! Fruit models load asynchronously in the host (GLTF over the network in
//! the reference frontend). The simulation only needs to know, per body,
//! whether the model arrived, what its natural size is, or whether to fall
//! back to a plain sphere. Load failure is expected and recoverable.

use crate::sim::state::{BodyId, Species};

/// Outcome of polling one body's model load
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadStatus {
    Pending,
    /// Bounding radius of the loaded model before normalization
    Ready { natural_radius: f32 },
    Failed,
}

/// Host-provided model loader
pub trait AssetSource {
    /// Begin loading the model for a newly spawned body
    fn request(&mut self, body: BodyId, species: Species);
    /// Non-blocking readiness check for a previously requested body
    fn poll(&mut self, body: BodyId) -> LoadStatus;
}

/// Loader double that resolves every request immediately
#[derive(Debug, Clone, Copy)]
pub struct InstantAssets {
    pub natural_radius: f32,
}

impl Default for InstantAssets {
    fn default() -> Self {
        Self {
            natural_radius: 1.0,
        }
    }
}

impl AssetSource for InstantAssets {
    fn request(&mut self, _body: BodyId, _species: Species) {}

    fn poll(&mut self, _body: BodyId) -> LoadStatus {
        LoadStatus::Ready {
            natural_radius: self.natural_radius,
        }
    }
}

/// Loader double where every load fails; bodies keep the fallback shape
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAssets;

impl AssetSource for FailingAssets {
    fn request(&mut self, _body: BodyId, _species: Species) {}

    fn poll(&mut self, _body: BodyId) -> LoadStatus {
        LoadStatus::Failed
    }
}
