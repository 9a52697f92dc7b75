//! Timed tap minigame
//!
//! Layered on the sandbox: a countdown, a spawn cadence that keeps the box
//! full of short-lived strawberries and longer-lived apples, tap scoring,
//! and a persisted best. While a round is underway the pointer stops
//! dragging fruit and starts tapping it.
//!
//! All cadenced work (countdown, spawner, game clock, per-fruit despawns,
//! the post-game grace period) runs through the `Scheduler`; every handle
//! is cancelled synchronously on phase exit so a stale tick can never
//! touch a torn-down round.

use std::collections::HashMap;

use glam::Vec2;

use crate::assets::AssetSource;
use crate::config::MinigameConfig;
use crate::highscores::ScoreStore;
use crate::ui::Overlay;

use super::pointer::{DragSession, PointerSample, body_at};
use super::state::{BodyId, Species, World};
use super::timer::{Scheduler, TimerEvent, TimerHandle};

/// Minigame phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round underway; fruit is draggable sandbox fruit
    Idle,
    /// Scene spawned, waiting for model loads to settle
    Starting,
    /// 3-2-1 on screen
    Countdown,
    /// Clock running, taps score
    Active,
    /// Terminal screen up for the grace period
    Ended,
}

/// Minigame controller
#[derive(Debug)]
pub struct Minigame {
    phase: Phase,
    score: i32,
    time_remaining: u32,
    high_score: u32,
    countdown_left: u8,
    /// Tunables snapshotted from the world at round start
    cfg: MinigameConfig,
    countdown_timer: Option<TimerHandle>,
    spawn_timer: Option<TimerHandle>,
    clock_timer: Option<TimerHandle>,
    grace_timer: Option<TimerHandle>,
    /// Pending auto-despawns, keyed by body identity
    despawn_timers: HashMap<BodyId, TimerHandle>,
}

impl Minigame {
    /// Build a controller, reading the persisted best (a broken store
    /// reads as "no best yet")
    pub fn new(store: &mut dyn ScoreStore) -> Self {
        Self {
            phase: Phase::Idle,
            score: 0,
            time_remaining: 0,
            high_score: store.load().unwrap_or(0),
            countdown_left: 0,
            cfg: MinigameConfig::default(),
            countdown_timer: None,
            spawn_timer: None,
            clock_timer: None,
            grace_timer: None,
            despawn_timers: HashMap::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Begin (or restart) a round.
    ///
    /// Restarting mid-round runs the full end-of-round teardown first, so
    /// the old round's timers can never overlap the new set.
    pub fn start(
        &mut self,
        world: &mut World,
        sched: &mut Scheduler,
        drag: &mut DragSession,
        assets: &mut dyn AssetSource,
        store: &mut dyn ScoreStore,
        ui: &mut dyn Overlay,
    ) {
        match self.phase {
            Phase::Idle => {}
            Phase::Ended => self.clear_grace(sched),
            _ => {
                self.finish(sched, store, ui);
                self.clear_grace(sched);
            }
        }
        self.cfg = world.config.minigame;
        drag.abort();
        world.clear();
        self.despawn_timers.clear();
        self.score = 0;
        self.time_remaining = self.cfg.game_duration;
        self.countdown_left = self.cfg.countdown_from;
        world.spawn(
            assets,
            Species::Strawberry,
            self.cfg.initial_strawberries,
            self.cfg.initial_radius,
        );
        world.spawn(
            assets,
            Species::Apple,
            self.cfg.initial_apples,
            self.cfg.initial_radius,
        );
        self.phase = Phase::Starting;
        ui.show();
        ui.score(self.score);
        ui.time_remaining(self.time_remaining);
        ui.high_score(self.high_score);
        log::info!("round starting: waiting on {} models", world.len());
    }

    /// Per-frame update: resolve model loads, gate the countdown on them,
    /// and drive every due timer.
    pub fn update(
        &mut self,
        world: &mut World,
        sched: &mut Scheduler,
        assets: &mut dyn AssetSource,
        store: &mut dyn ScoreStore,
        ui: &mut dyn Overlay,
        dt: f32,
    ) {
        world.resolve_models(assets);

        if self.phase == Phase::Starting && world.models_settled() {
            if self.countdown_left == 0 {
                self.begin_active(sched, ui);
            } else {
                self.phase = Phase::Countdown;
                ui.countdown(self.countdown_left);
                self.countdown_timer = Some(sched.every(1.0, TimerEvent::CountdownTick));
                log::info!("models ready, countdown from {}", self.countdown_left);
            }
        }

        for event in sched.advance(dt) {
            self.handle_event(event, world, sched, assets, store, ui);
        }
    }

    /// Route a press by phase: sandbox drag, or minigame tap
    pub fn press(
        &mut self,
        world: &mut World,
        sched: &mut Scheduler,
        drag: &mut DragSession,
        ui: &mut dyn Overlay,
        sample: PointerSample,
    ) {
        if !self.tap_mode() {
            drag.press(world, sample);
            return;
        }
        if self.phase != Phase::Active {
            // countdown still running; the tap is swallowed either way
            return;
        }
        let Some(pos) = sample.pos else {
            return;
        };
        let Some(id) = body_at(world, pos) else {
            // empty space: no scoring effect
            return;
        };
        let Some(species) = world.body(id).map(|b| b.species) else {
            return;
        };
        if species.is_transient() {
            self.score += species.tap_points();
            self.clear_despawn(sched, id);
            world.remove(id);
        } else {
            self.score = (self.score + species.tap_points()).max(0);
            shove_from(world, id, pos, &self.cfg);
        }
        ui.score(self.score);
        log::debug!("tap on {species:?}: score {}", self.score);
    }

    pub fn motion(&self, world: &mut World, drag: &mut DragSession, sample: PointerSample) {
        if !self.tap_mode() {
            drag.motion(world, sample);
        }
    }

    pub fn release(&self, world: &mut World, drag: &mut DragSession, sample: PointerSample) {
        if !self.tap_mode() {
            drag.release(world, sample);
        }
    }

    /// True while presses tap instead of drag
    fn tap_mode(&self) -> bool {
        matches!(self.phase, Phase::Starting | Phase::Countdown | Phase::Active)
    }

    fn handle_event(
        &mut self,
        event: TimerEvent,
        world: &mut World,
        sched: &mut Scheduler,
        assets: &mut dyn AssetSource,
        store: &mut dyn ScoreStore,
        ui: &mut dyn Overlay,
    ) {
        match event {
            TimerEvent::CountdownTick => {
                if self.phase != Phase::Countdown {
                    return;
                }
                self.countdown_left = self.countdown_left.saturating_sub(1);
                if self.countdown_left == 0 {
                    if let Some(handle) = self.countdown_timer.take() {
                        sched.cancel(handle);
                    }
                    self.begin_active(sched, ui);
                } else {
                    ui.countdown(self.countdown_left);
                }
            }
            TimerEvent::SpawnTick => {
                if self.phase != Phase::Active {
                    return;
                }
                self.spawn_one(world, sched, assets);
            }
            TimerEvent::ClockTick => {
                if self.phase != Phase::Active {
                    return;
                }
                self.time_remaining = self.time_remaining.saturating_sub(1);
                ui.time_remaining(self.time_remaining);
                if self.time_remaining == 0 {
                    self.finish(sched, store, ui);
                }
            }
            TimerEvent::Despawn(id) => {
                self.despawn_timers.remove(&id);
                world.remove(id);
            }
            TimerEvent::GraceOver => {
                self.grace_timer = None;
                self.phase = Phase::Idle;
                ui.hide();
                log::info!("returning to sandbox");
            }
        }
    }

    fn begin_active(&mut self, sched: &mut Scheduler, ui: &mut dyn Overlay) {
        self.phase = Phase::Active;
        self.spawn_timer = Some(sched.every(self.cfg.spawn_interval, TimerEvent::SpawnTick));
        self.clock_timer = Some(sched.every(self.cfg.clock_interval, TimerEvent::ClockTick));
        ui.time_remaining(self.time_remaining);
        log::info!("round active: {} s on the clock", self.time_remaining);
    }

    /// One spawner fire: weighted species pick, then cap enforcement.
    /// Transient fruit gets its despawn scheduled here and nowhere else.
    fn spawn_one(&mut self, world: &mut World, sched: &mut Scheduler, assets: &mut dyn AssetSource) {
        let species = if world.roll(self.cfg.strawberry_weight) {
            Species::Strawberry
        } else {
            Species::Apple
        };
        let ids = world.spawn(assets, species, 1, self.cfg.spawn_radius);
        if species.is_transient() {
            for id in ids {
                let handle = sched.once(self.cfg.despawn_delay, TimerEvent::Despawn(id));
                self.despawn_timers.insert(id, handle);
            }
        }
        for id in world.cull(self.cfg.population_cap) {
            self.clear_despawn(sched, id);
        }
    }

    /// End the round: cancel every timer before touching any state, commit
    /// the best if beaten, and leave the terminal screen up for the grace
    /// period. Leftover fruit keeps simulating as sandbox fruit.
    fn finish(&mut self, sched: &mut Scheduler, store: &mut dyn ScoreStore, ui: &mut dyn Overlay) {
        if let Some(handle) = self.countdown_timer.take() {
            sched.cancel(handle);
        }
        if let Some(handle) = self.spawn_timer.take() {
            sched.cancel(handle);
        }
        if let Some(handle) = self.clock_timer.take() {
            sched.cancel(handle);
        }
        for (_, handle) in self.despawn_timers.drain() {
            sched.cancel(handle);
        }

        let final_score = self.score.max(0) as u32;
        let new_best = final_score > self.high_score;
        if new_best {
            self.high_score = final_score;
            store.save(final_score);
            ui.high_score(final_score);
        }
        self.phase = Phase::Ended;
        ui.game_over(self.score, new_best);
        self.grace_timer = Some(sched.once(self.cfg.end_grace, TimerEvent::GraceOver));
        log::info!("round over: score {} (best {})", self.score, self.high_score);
    }

    fn clear_grace(&mut self, sched: &mut Scheduler) {
        if let Some(handle) = self.grace_timer.take() {
            sched.cancel(handle);
        }
    }

    fn clear_despawn(&mut self, sched: &mut Scheduler, id: BodyId) {
        if let Some(handle) = self.despawn_timers.remove(&id) {
            sched.cancel(handle);
        }
    }
}

/// Miss penalty: every body except the tapped one gets a radial outward
/// kick from the tap point, attenuated linearly to zero at the edge of the
/// shove range.
fn shove_from(world: &mut World, tapped: BodyId, center: Vec2, cfg: &MinigameConfig) {
    for body in world.bodies_mut() {
        if body.id == tapped {
            continue;
        }
        let delta = body.pos - center;
        let distance = delta.length();
        if distance <= 0.0 || distance >= cfg.shove_range {
            continue;
        }
        let falloff = 1.0 - distance / cfg.shove_range;
        body.vel += delta / distance * (cfg.shove_strength * falloff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{InstantAssets, LoadStatus};
    use crate::config::SimConfig;
    use crate::highscores::MemoryScore;
    use crate::ui::NullOverlay;

    struct Rig {
        world: World,
        sched: Scheduler,
        drag: DragSession,
        assets: InstantAssets,
        store: MemoryScore,
        ui: NullOverlay,
        game: Minigame,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_config(SimConfig::default())
        }

        fn with_config(config: SimConfig) -> Self {
            let mut store = MemoryScore::default();
            let game = Minigame::new(&mut store);
            Self {
                world: World::with_config(800.0, 600.0, 42, config),
                sched: Scheduler::new(),
                drag: DragSession::new(),
                assets: InstantAssets::default(),
                store,
                ui: NullOverlay,
                game,
            }
        }

        fn start(&mut self) {
            self.game.start(
                &mut self.world,
                &mut self.sched,
                &mut self.drag,
                &mut self.assets,
                &mut self.store,
                &mut self.ui,
            );
        }

        fn update(&mut self, dt: f32) {
            self.game.update(
                &mut self.world,
                &mut self.sched,
                &mut self.assets,
                &mut self.store,
                &mut self.ui,
                dt,
            );
        }

        fn run_to_active(&mut self) {
            self.start();
            self.update(0.0); // models resolve instantly -> countdown scheduled
            assert_eq!(self.game.phase(), Phase::Countdown);
            for _ in 0..3 {
                self.update(1.0);
            }
            assert_eq!(self.game.phase(), Phase::Active);
        }

        fn press_at(&mut self, pos: Vec2, time: f64) {
            self.game.press(
                &mut self.world,
                &mut self.sched,
                &mut self.drag,
                &mut self.ui,
                PointerSample::at(pos, time),
            );
        }

        /// Park the newest body at a clear spot and tap it
        fn tap_latest(&mut self, time: f64) {
            let id = self.world.bodies().last().map(|b| b.id).unwrap();
            let spot = Vec2::new(0.0, -250.0);
            self.world.body_mut(id).unwrap().pos = spot;
            self.press_at(spot, time);
        }
    }

    fn strawberries_only() -> SimConfig {
        let mut config = SimConfig::default();
        config.minigame.strawberry_weight = 1.0;
        config
    }

    #[test]
    fn test_start_spawns_biased_initial_population() {
        let mut rig = Rig::new();
        rig.start();
        assert_eq!(rig.game.phase(), Phase::Starting);
        assert_eq!(rig.world.len(), 6);
        let strawberries = rig
            .world
            .bodies()
            .iter()
            .filter(|b| b.species == Species::Strawberry)
            .count();
        assert_eq!(strawberries, 4);
    }

    #[test]
    fn test_countdown_waits_for_models() {
        struct ManualAssets {
            ready: bool,
        }
        impl AssetSource for ManualAssets {
            fn request(&mut self, _body: BodyId, _species: Species) {}
            fn poll(&mut self, _body: BodyId) -> LoadStatus {
                if self.ready {
                    LoadStatus::Ready {
                        natural_radius: 1.0,
                    }
                } else {
                    LoadStatus::Pending
                }
            }
        }

        let mut world = World::new(800.0, 600.0, 42);
        let mut sched = Scheduler::new();
        let mut drag = DragSession::new();
        let mut assets = ManualAssets { ready: false };
        let mut store = MemoryScore::default();
        let mut ui = NullOverlay;
        let mut game = Minigame::new(&mut store);

        game.start(
            &mut world, &mut sched, &mut drag, &mut assets, &mut store, &mut ui,
        );
        for _ in 0..10 {
            game.update(
                &mut world, &mut sched, &mut assets, &mut store, &mut ui, 1.0,
            );
        }
        // models never settled, so no countdown and no timers
        assert_eq!(game.phase(), Phase::Starting);
        assert_eq!(sched.pending(), 0);

        assets.ready = true;
        game.update(
            &mut world, &mut sched, &mut assets, &mut store, &mut ui, 0.0,
        );
        assert_eq!(game.phase(), Phase::Countdown);
    }

    #[test]
    fn test_countdown_reaches_active_after_three_seconds() {
        let mut rig = Rig::new();
        rig.start();
        rig.update(0.0);
        rig.update(1.0);
        rig.update(1.0);
        assert_eq!(rig.game.phase(), Phase::Countdown);
        rig.update(1.0);
        assert_eq!(rig.game.phase(), Phase::Active);
        assert_eq!(rig.game.time_remaining(), 30);
    }

    #[test]
    fn test_spawner_adds_fruit_and_culls_oldest() {
        let mut config = strawberries_only();
        config.minigame.population_cap = 6;
        let mut rig = Rig::with_config(config);
        rig.run_to_active();
        let oldest = rig.world.bodies()[0].id;
        assert_eq!(rig.world.len(), 6);
        rig.update(0.7); // one spawner fire
        assert_eq!(rig.world.len(), 6); // cap enforced
        assert!(rig.world.body(oldest).is_none()); // FIFO cull
    }

    #[test]
    fn test_transient_fruit_despawns_after_delay() {
        let mut rig = Rig::with_config(strawberries_only());
        rig.run_to_active();
        rig.update(0.7);
        let spawned = rig.world.bodies().last().map(|b| b.id).unwrap();
        assert!(rig.world.body(spawned).is_some());
        // despawn due 1.7 s after the spawn
        rig.update(1.8);
        assert!(rig.world.body(spawned).is_none());
    }

    #[test]
    fn test_tap_strawberry_scores_and_removes() {
        let mut rig = Rig::with_config(strawberries_only());
        rig.run_to_active();
        rig.update(0.7);
        let spawned = rig.world.bodies().last().map(|b| b.id).unwrap();
        rig.tap_latest(4.0);
        assert_eq!(rig.game.score(), 1);
        assert!(rig.world.body(spawned).is_none());
        // its despawn timer went with it; only spawner + clock remain
        assert_eq!(rig.sched.pending(), 2);
    }

    #[test]
    fn test_tap_apple_floors_score_and_shoves_neighbors() {
        let mut rig = Rig::new();
        rig.run_to_active();
        let bodies: Vec<BodyId> = rig.world.bodies().iter().map(|b| b.id).collect();
        let apple = *bodies.last().unwrap();
        let neighbor = bodies[0];
        rig.world.body_mut(apple).unwrap().pos = Vec2::new(0.0, -250.0);
        rig.world.body_mut(neighbor).unwrap().pos = Vec2::new(0.0, -200.0);
        let apple_vel = rig.world.body(apple).unwrap().vel;

        rig.press_at(Vec2::new(0.0, -250.0), 4.0);

        // decrement floored at zero, apple not removed
        assert_eq!(rig.game.score(), 0);
        assert!(rig.world.body(apple).is_some());
        // neighbor 50 units above the tap gets pushed further up
        assert!(rig.world.body(neighbor).unwrap().vel.y > 0.0);
        // the tapped body itself is not shoved
        assert_eq!(rig.world.body(apple).unwrap().vel, apple_vel);
    }

    #[test]
    fn test_score_sequence_with_both_species() {
        let mut rig = Rig::with_config(strawberries_only());
        rig.run_to_active();
        rig.update(0.7);
        rig.tap_latest(4.0); // strawberry: 1
        assert_eq!(rig.game.score(), 1);

        // park an apple from the initial population and tap it twice
        let apple = rig
            .world
            .bodies()
            .iter()
            .find(|b| b.species == Species::Apple)
            .map(|b| b.id)
            .unwrap();
        rig.world.body_mut(apple).unwrap().pos = Vec2::new(300.0, -250.0);
        rig.press_at(Vec2::new(300.0, -250.0), 4.1);
        assert_eq!(rig.game.score(), 0);
        rig.press_at(Vec2::new(300.0, -250.0), 4.2);
        assert_eq!(rig.game.score(), 0);
    }

    #[test]
    fn test_tap_on_empty_space_does_nothing() {
        let mut rig = Rig::new();
        rig.run_to_active();
        let before = rig.world.len();
        rig.press_at(Vec2::new(0.0, -290.0), 4.0);
        assert_eq!(rig.game.score(), 0);
        assert_eq!(rig.world.len(), before);
    }

    #[test]
    fn test_clock_runs_out_and_cancels_everything() {
        let mut rig = Rig::new();
        rig.run_to_active();
        for _ in 0..30 {
            rig.update(1.0);
        }
        assert_eq!(rig.game.phase(), Phase::Ended);
        assert_eq!(rig.game.time_remaining(), 0);
        // only the grace one-shot survives the teardown
        assert_eq!(rig.sched.pending(), 1);
        // score 0 never beats the (empty) store
        assert_eq!(rig.store.best, None);
        // leftover fruit lingers through the grace period
        assert!(!rig.world.is_empty());

        rig.update(3.0);
        assert_eq!(rig.game.phase(), Phase::Idle);
        assert_eq!(rig.sched.pending(), 0);
    }

    #[test]
    fn test_high_score_commits_only_when_beaten() {
        let mut rig = Rig::with_config(strawberries_only());
        rig.store.best = Some(5);
        rig.game = Minigame::new(&mut rig.store);
        assert_eq!(rig.game.high_score(), 5);

        // score 3, then run the clock out: 3 doesn't beat 5
        rig.run_to_active();
        for i in 0..3 {
            rig.update(0.7);
            rig.tap_latest(4.0 + i as f64);
        }
        let mut guard = 0;
        while rig.game.phase() != Phase::Ended && guard < 100 {
            rig.update(1.0);
            guard += 1;
        }
        assert_eq!(rig.store.best, Some(5));
        assert_eq!(rig.game.high_score(), 5);

        // second round scores 6 and takes the record
        rig.update(3.0); // grace -> Idle
        rig.run_to_active();
        for i in 0..6 {
            rig.update(0.7);
            rig.tap_latest(50.0 + i as f64);
        }
        assert_eq!(rig.game.score(), 6);
        let mut guard = 0;
        while rig.game.phase() != Phase::Ended && guard < 100 {
            rig.update(1.0);
            guard += 1;
        }
        assert_eq!(rig.store.best, Some(6));
        assert_eq!(rig.game.high_score(), 6);
    }

    #[test]
    fn test_restart_mid_round_tears_down_cleanly() {
        let mut rig = Rig::with_config(strawberries_only());
        rig.run_to_active();
        rig.update(0.7);
        rig.tap_latest(4.0);
        assert_eq!(rig.game.score(), 1);

        rig.start();
        // old round committed its score as the best, new round is fresh
        assert_eq!(rig.store.best, Some(1));
        assert_eq!(rig.game.phase(), Phase::Starting);
        assert_eq!(rig.game.score(), 0);
        assert_eq!(rig.world.len(), 6);
        // no timer from the old round survives
        assert_eq!(rig.sched.pending(), 0);
    }

    #[test]
    fn test_drag_disabled_during_round() {
        let mut rig = Rig::new();
        // sandbox: dragging works
        let id = rig
            .world
            .spawn(&mut InstantAssets::default(), Species::Apple, 1, 40.0)[0];
        rig.world.body_mut(id).unwrap().pos = Vec2::ZERO;
        rig.press_at(Vec2::ZERO, 0.0);
        assert!(rig.drag.is_active());

        // starting a round aborts the hold and disables dragging
        rig.start();
        assert!(!rig.drag.is_active());
        rig.run_to_active();
        let target = rig.world.bodies()[0].id;
        let pos = rig.world.body(target).unwrap().pos;
        rig.press_at(pos, 4.0);
        assert!(!rig.drag.is_active());
    }

    #[test]
    fn test_taps_swallowed_before_active() {
        let mut rig = Rig::new();
        rig.start();
        rig.update(0.0); // countdown running
        let target = rig.world.bodies()[0].id;
        let pos = rig.world.body(target).unwrap().pos;
        rig.press_at(pos, 1.0);
        assert_eq!(rig.game.score(), 0);
        assert!(rig.world.body(target).is_some());
        assert!(!rig.drag.is_active());
    }

    #[test]
    fn test_overlay_receives_countdown_and_game_over() {
        #[derive(Default)]
        struct Recording {
            countdowns: Vec<u8>,
            over: Option<(i32, bool)>,
            hidden: bool,
        }
        impl Overlay for Recording {
            fn countdown(&mut self, value: u8) {
                self.countdowns.push(value);
            }
            fn game_over(&mut self, final_score: i32, new_best: bool) {
                self.over = Some((final_score, new_best));
            }
            fn hide(&mut self) {
                self.hidden = true;
            }
        }

        let mut world = World::new(800.0, 600.0, 42);
        let mut sched = Scheduler::new();
        let mut drag = DragSession::new();
        let mut assets = InstantAssets::default();
        let mut store = MemoryScore::default();
        let mut ui = Recording::default();
        let mut game = Minigame::new(&mut store);

        game.start(
            &mut world, &mut sched, &mut drag, &mut assets, &mut store, &mut ui,
        );
        for _ in 0..40 {
            game.update(
                &mut world, &mut sched, &mut assets, &mut store, &mut ui, 1.0,
            );
        }
        assert_eq!(ui.countdowns, vec![3, 2, 1]);
        assert_eq!(ui.over, Some((0, false)));
        assert!(ui.hidden);
    }
}
