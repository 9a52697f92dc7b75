//! Cancellable timer scheduling
//!
//! The countdown, the spawn cadence, the game clock, and per-body despawn
//! delays all run as entries in one queue that the frame loop advances.
//! Entries fire on the caller's thread between ticks, so a firing entry
//! always observes a consistent body set. Cancellation is synchronous:
//! once `cancel` returns, the entry can never fire.

use std::cmp::Ordering;

use super::state::BodyId;

/// Opaque handle for cancelling a scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// What a fired timer means to the minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// 1 s cadence before play begins
    CountdownTick,
    /// Spawn one minigame fruit
    SpawnTick,
    /// Decrement the game clock
    ClockTick,
    /// A transient fruit timed out
    Despawn(BodyId),
    /// Post-game grace period elapsed
    GraceOver,
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    due: f64,
    period: Option<f32>,
    event: TimerEvent,
}

/// Single-threaded timer queue, advanced by the frame loop
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_handle: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue clock in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Pending entry count
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedule a one-shot entry
    pub fn once(&mut self, delay: f32, event: TimerEvent) -> TimerHandle {
        self.push(delay, None, event)
    }

    /// Schedule a repeating entry; the first fire comes after one period
    pub fn every(&mut self, period: f32, event: TimerEvent) -> TimerHandle {
        let period = period.max(1e-3);
        self.push(period, Some(period), event)
    }

    fn push(&mut self, delay: f32, period: Option<f32>, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay.max(0.0) as f64,
            period,
            event,
        });
        handle
    }

    /// Cancel a pending entry. Idempotent; unknown handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Drop every pending entry
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Advance the clock and return everything that came due, in firing
    /// order (due time, then scheduling order for ties). Repeating entries
    /// re-arm by their period.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerEvent> {
        self.now += dt.max(0.0) as f64;
        let mut fired = Vec::new();
        loop {
            let next = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due <= self.now)
                .min_by(|(_, a), (_, b)| {
                    a.due
                        .partial_cmp(&b.due)
                        .unwrap_or(Ordering::Equal)
                        .then(a.handle.0.cmp(&b.handle.0))
                })
                .map(|(index, _)| index);
            let Some(index) = next else {
                break;
            };
            fired.push(self.entries[index].event);
            match self.entries[index].period {
                Some(period) => self.entries[index].due += period as f64,
                None => {
                    self.entries.remove(index);
                }
            }
        }
        fired
    }
}
