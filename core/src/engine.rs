use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    GameOver,
    FinishGame,
}

impl EndReason {
    /// Message key for the presentation layer.
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::GameOver => "game_over",
            Self::FinishGame => "game_finished",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Active,
    Ended { final_score: Score, reason: EndReason },
}

impl GameState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended { .. })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Active
    }
}

/// What a reveal did beyond storing its value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealEffect {
    Decorative,
    Scored(ScoreBreakdown),
    Special(SpecialCell),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealReport {
    pub coords: Coords,
    pub value: CellValue,
    /// Actual change of the score, `new - old`.
    pub score_delta: Score,
    pub score: Score,
    pub effect: RevealEffect,
    pub state: GameState,
}

impl RevealReport {
    pub fn breakdown(&self) -> Option<&ScoreBreakdown> {
        match &self.effect {
            RevealEffect::Scored(breakdown) => Some(breakdown),
            _ => None,
        }
    }
}

/// Store, score, and lifecycle of one game. Single writer, every mutation is all-or-nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEngine {
    config: GameConfig,
    generator: WeightedCellGenerator,
    store: CellStore,
    score: Score,
    state: GameState,
    last_report: Option<RevealReport>,
}

impl PlayEngine {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let generator = WeightedCellGenerator::new(&config);
        Ok(Self {
            config,
            generator,
            store: Default::default(),
            score: 0,
            state: Default::default(),
            last_report: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn revealed_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_revealed(&self, coords: Coords) -> bool {
        self.store.contains(coords)
    }

    pub fn value_at(&self, coords: Coords) -> Option<CellValue> {
        self.store.get(coords)
    }

    pub fn last_report(&self) -> Option<&RevealReport> {
        self.last_report.as_ref()
    }

    pub fn can_reveal_at(&self, coords: Coords) -> bool {
        self.check_revealable(coords).is_ok()
    }

    /// Draws an outcome for `coords` and applies it.
    pub fn reveal<R: RandomSource + ?Sized>(
        &mut self,
        coords: Coords,
        rng: &mut R,
    ) -> Result<RevealReport> {
        let coords = self.check_revealable(coords)?;
        let value = self.generator.generate(rng);
        Ok(self.apply(coords, value))
    }

    /// Applies a known outcome, used for replays and tests.
    pub fn reveal_value(&mut self, coords: Coords, value: CellValue) -> Result<RevealReport> {
        let coords = self.check_revealable(coords)?;
        Ok(self.apply(coords, value))
    }

    /// Starts over with a fresh store.
    pub fn restart(&mut self) {
        log::info!("restart, previous score: {}, revealed: {}", self.score, self.store.len());
        self.store = CellStore::default();
        self.score = 0;
        self.state = GameState::Active;
        self.last_report = None;
    }

    fn check_revealable(&self, coords: Coords) -> Result<Coords> {
        if self.state.is_finished() {
            return Err(GameError::GameEnded);
        }
        let coords = coords.validate()?;
        if self.store.contains(coords) {
            return Err(GameError::AlreadyRevealed);
        }
        Ok(coords)
    }

    fn apply(&mut self, coords: Coords, value: CellValue) -> RevealReport {
        let previous_score = self.score;

        // the neighbourhood is read before the new cell lands in the store
        let effect = match value {
            CellValue::Numeric(number) => {
                let breakdown =
                    self.store
                        .breakdown(coords, number, self.config.highlight_radius);
                self.score = self.score.saturating_add(breakdown.total);
                RevealEffect::Scored(breakdown)
            }
            CellValue::Special(kind) => {
                self.apply_special(kind);
                RevealEffect::Special(kind)
            }
            CellValue::Decorative(_) => RevealEffect::Decorative,
        };

        if self.store.insert(coords, value).is_err() {
            // checked by check_revealable
            log::warn!("{} was revealed twice", coords);
        }

        let report = RevealReport {
            coords,
            value,
            score_delta: self.score.saturating_sub(previous_score),
            score: self.score,
            effect,
            state: self.state,
        };
        log::trace!("reveal {}: {:?}", coords, report);
        self.last_report = Some(report.clone());
        report
    }

    fn apply_special(&mut self, kind: SpecialCell) {
        use SpecialCell::*;

        log::debug!("special cell: {:?}, score before: {}", kind, self.score);
        match kind {
            GameOver => {
                self.score = 0;
                self.end_game(EndReason::GameOver);
            }
            FinishGame => self.end_game(EndReason::FinishGame),
            InvertScore => self.score = self.score.saturating_neg(),
            ZeroScore => self.score = 0,
        }
    }

    fn end_game(&mut self, reason: EndReason) {
        if self.state.is_finished() {
            return;
        }

        log::info!("game ended: {:?}, final score: {}", reason, self.score);
        self.state = GameState::Ended {
            final_score: self.score,
            reason,
        };
    }
}
