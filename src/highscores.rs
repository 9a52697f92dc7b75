//! High score persistence
//!
//! A single scalar survives reloads. The backing store may be missing or
//! broken (sandboxed iframe, quota exhausted); reads degrade to "no best
//! yet" and writes are fire-and-forget.

/// Persistent best-score store
pub trait ScoreStore {
    /// Read the persisted best; `None` when nothing readable is stored
    fn load(&mut self) -> Option<u32>;
    /// Persist a new best. Failures are swallowed.
    fn save(&mut self, score: u32);
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct MemoryScore {
    pub best: Option<u32>,
}

impl ScoreStore for MemoryScore {
    fn load(&mut self) -> Option<u32> {
        self.best
    }

    fn save(&mut self, score: u32) {
        self.best = Some(score);
    }
}

/// LocalStorage-backed store; native builds keep nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalScore;

impl LocalScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruitbox_highscore";
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalScore {
    fn load(&mut self) -> Option<u32> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        let raw = storage.get_item(Self::STORAGE_KEY).ok().flatten()?;
        match raw.parse() {
            Ok(best) => {
                log::info!("loaded high score {best}");
                Some(best)
            }
            Err(_) => {
                log::warn!("stored high score unreadable, starting fresh");
                None
            }
        }
    }

    fn save(&mut self, score: u32) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, &score.to_string()).is_ok() {
                log::info!("high score saved ({score})");
            } else {
                log::warn!("high score write failed, ignoring");
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for LocalScore {
    fn load(&mut self) -> Option<u32> {
        None
    }

    fn save(&mut self, _score: u32) {
        // No-op for native
    }
}
