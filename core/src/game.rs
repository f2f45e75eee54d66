use rand::rngs::SmallRng;

use crate::*;

/// A game session bound to a viewport, a random source, and the auto-play driver.
///
/// This is the surface the presentation layer talks to. Every method is synchronous, so reveals from the player and
/// from auto-play are naturally serialized.
#[derive(Clone, Debug)]
pub struct Game<R = SmallRng> {
    engine: PlayEngine,
    viewport: Viewport,
    autoplay: AutoPlayer,
    rng: R,
}

impl Game<SmallRng> {
    pub fn with_seed(config: GameConfig, size: ViewportSize, seed: u64) -> Result<Self> {
        Self::new(config, size, seeded_rng(seed))
    }
}

impl<R: RandomSource> Game<R> {
    pub fn new(config: GameConfig, size: ViewportSize, rng: R) -> Result<Self> {
        Ok(Self {
            engine: PlayEngine::new(config)?,
            viewport: Viewport::new(size),
            autoplay: Default::default(),
            rng,
        })
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn current_score(&self) -> Score {
        self.engine.score()
    }

    pub fn lifecycle_state(&self) -> GameState {
        self.engine.state()
    }

    pub fn is_revealed(&self, coords: Coords) -> bool {
        self.engine.is_revealed(coords)
    }

    pub fn value_at(&self, coords: Coords) -> Option<CellValue> {
        self.engine.value_at(coords)
    }

    pub fn is_auto_playing(&self) -> bool {
        self.autoplay.is_enabled()
    }

    pub fn reveal(&mut self, coords: Coords) -> Result<RevealReport> {
        let report = self.engine.reveal(coords, &mut self.rng)?;
        self.after_reveal(&report);
        Ok(report)
    }

    pub fn pan(&mut self, delta: (Coord, Coord)) -> PanOutcome {
        self.viewport.pan(delta)
    }

    pub fn drag(&mut self, gesture: &DragGesture, pointer: (f64, f64)) -> PanOutcome {
        gesture.update(&mut self.viewport, pointer)
    }

    pub fn jump_to(&mut self, coords: Coords) -> Result<PanOutcome> {
        self.viewport.jump_to(coords)
    }

    pub fn resize(&mut self, size: ViewportSize) {
        self.viewport.resize(size)
    }

    pub fn visible_coordinates(&self) -> VisibleIter {
        self.viewport.visible_coordinates()
    }

    /// Visible cells that can still be revealed, in row-major order.
    pub fn candidates(&self) -> Vec<Coords> {
        self.visible_coordinates()
            .filter(|&coords| self.engine.can_reveal_at(coords))
            .collect()
    }

    /// Fresh session, any auto-play tick issued before is dead.
    pub fn restart(&mut self) {
        if self.autoplay.stop() {
            log::debug!("auto-play stopped by restart");
        }
        self.engine.restart();
    }

    /// Returns the first tick to schedule when auto-play actually starts.
    pub fn set_auto_play(&mut self, enabled: bool) -> Option<ScheduledTick> {
        if !enabled {
            if self.autoplay.stop() {
                log::debug!("auto-play stopped");
            }
            return None;
        }

        if self.engine.is_finished() {
            log::debug!("auto-play refused, game already ended");
            return None;
        }

        if self.autoplay.start() {
            log::debug!("auto-play started");
            Some(self.schedule())
        } else {
            None
        }
    }

    /// Runs one auto-play step for a tick issued by [`Game::set_auto_play`] or a previous step.
    pub fn auto_play_tick(&mut self, token: TickToken) -> TickOutcome {
        if !self.autoplay.accept(token) {
            log::trace!("stale auto-play tick: {:?}", token);
            return TickOutcome::Ignored;
        }

        if self.engine.is_finished() {
            self.autoplay.stop();
            return TickOutcome::Ignored;
        }

        let candidates = self.candidates();
        let Some(coords) = pick_candidate(&candidates, &mut self.rng) else {
            log::debug!("auto-play exhausted the visible cells");
            self.autoplay.stop();
            return TickOutcome::Exhausted;
        };

        let report = match self.reveal(coords) {
            Ok(report) => report,
            Err(err) => {
                // candidates are pre-filtered, this should not happen
                log::warn!("auto-play reveal at {} failed: {}", coords, err);
                self.autoplay.stop();
                return TickOutcome::Ignored;
            }
        };

        let next = self.autoplay.is_enabled().then(|| self.schedule());
        TickOutcome::Revealed {
            coords,
            report,
            next,
        }
    }

    fn schedule(&mut self) -> ScheduledTick {
        let delay = draw_delay(self.engine.config().autoplay_delay_ms, &mut self.rng);
        ScheduledTick {
            token: self.autoplay.arm(),
            delay,
        }
    }

    fn after_reveal(&mut self, report: &RevealReport) {
        if report.state.is_finished() && self.autoplay.stop() {
            log::debug!("auto-play stopped, game ended");
        }
    }
}
