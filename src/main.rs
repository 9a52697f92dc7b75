//! Fruitbox entry point
//!
//! Headless demo loop: drops a couple of fruit, flings one across the box,
//! then plays a full minigame round with instantly-resolving assets. Real
//! frontends drive the same API from a render loop and swap in their own
//! loader, overlay, and score store.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use fruitbox::consts::*;
    use fruitbox::sim::{
        DragSession, Minigame, Phase, PointerSample, Scheduler, Species, World, step,
    };
    use fruitbox::{InstantAssets, MemoryScore, Overlay};

    /// Overlay that narrates to the log
    struct LogOverlay;

    impl Overlay for LogOverlay {
        fn score(&mut self, score: i32) {
            log::info!("score: {score}");
        }
        fn time_remaining(&mut self, seconds: u32) {
            log::debug!("time left: {seconds}s");
        }
        fn countdown(&mut self, value: u8) {
            log::info!("countdown: {value}");
        }
        fn game_over(&mut self, final_score: i32, new_best: bool) {
            let suffix = if new_best { " - new best!" } else { "" };
            log::info!("game over: {final_score}{suffix}");
        }
    }

    /// Demo instance holding all state
    struct Demo {
        world: World,
        sched: Scheduler,
        drag: DragSession,
        assets: InstantAssets,
        store: MemoryScore,
        ui: LogOverlay,
        game: Minigame,
        accumulator: f32,
    }

    impl Demo {
        fn new(seed: u64) -> Self {
            let mut store = MemoryScore::default();
            let game = Minigame::new(&mut store);
            Self {
                world: World::new(800.0, 600.0, seed),
                sched: Scheduler::new(),
                drag: DragSession::new(),
                assets: InstantAssets::default(),
                store,
                ui: LogOverlay,
                game,
                accumulator: 0.0,
            }
        }

        /// Advance one host frame through the fixed-step accumulator
        fn frame(&mut self, frame_dt: f32) {
            self.accumulator += frame_dt.min(0.1);
            let mut substeps = 0;
            while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
                step(&mut self.world, &self.drag);
                self.game.update(
                    &mut self.world,
                    &mut self.sched,
                    &mut self.assets,
                    &mut self.store,
                    &mut self.ui,
                    TICK_DT,
                );
                self.accumulator -= TICK_DT;
                substeps += 1;
            }
        }

        fn frames(&mut self, count: u32, frame_dt: f32) {
            for _ in 0..count {
                self.frame(frame_dt);
            }
        }
    }

    pub fn run() {
        log::info!("fruitbox (headless) starting");

        // pretend the host vsyncs at 50 Hz
        let frame_dt = 1.0 / 50.0;
        let mut demo = Demo::new(42);

        // sandbox warm-up: two fruit, let them settle, then fling one
        let ids = demo
            .world
            .spawn(&mut demo.assets, Species::Strawberry, 1, DEFAULT_RADIUS);
        demo.world
            .spawn(&mut demo.assets, Species::Apple, 1, DEFAULT_RADIUS);
        demo.frames(120, frame_dt);

        if let Some(&id) = ids.first() {
            let start = demo.world.body(id).map(|b| b.pos).unwrap_or_default();
            demo.game.press(
                &mut demo.world,
                &mut demo.sched,
                &mut demo.drag,
                &mut demo.ui,
                PointerSample::at(start, 0.0),
            );
            let end = start + Vec2::new(150.0, 120.0);
            demo.game
                .motion(&mut demo.world, &mut demo.drag, PointerSample::at(end, 0.25));
            demo.game
                .release(&mut demo.world, &mut demo.drag, PointerSample::at(end, 0.25));
            log::info!("flung fruit {} from {start} to {end}", id.0);
        }
        demo.frames(180, frame_dt);

        // one full round, then back to sandbox
        demo.game.start(
            &mut demo.world,
            &mut demo.sched,
            &mut demo.drag,
            &mut demo.assets,
            &mut demo.store,
            &mut demo.ui,
        );
        let mut frames = 0;
        while demo.game.phase() != Phase::Idle && frames < 50 * 60 {
            demo.frame(frame_dt);
            frames += 1;
        }
        log::info!(
            "round finished after {frames} frames, {} fruit left, best {}",
            demo.world.len(),
            demo.game.high_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // the library is driven by the host's render loop on wasm
}
