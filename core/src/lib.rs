use serde::{Deserialize, Serialize};

pub use autoplay::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use highlight::*;
pub use store::*;
pub use types::*;
pub use viewport::*;

mod autoplay;
mod cell;
mod engine;
mod error;
mod game;
mod generator;
mod highlight;
mod store;
mod types;
mod viewport;

/// Chance weight of one special outcome in the cumulative draw.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialWeight {
    pub kind: SpecialCell,
    pub weight: f64,
}

impl SpecialWeight {
    pub const fn new(kind: SpecialCell, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// Balance parameters of a game. The defaults are the canonical rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Probability of the decorative gate that precedes every other draw.
    pub decorative_chance: f64,
    /// Special outcomes in dispatch order, tested against a running cumulative sum.
    pub special_weights: Vec<SpecialWeight>,
    pub min_value: CellNumber,
    pub max_value: CellNumber,
    /// Euclidean radius (inclusive) of the scoring neighbourhood.
    pub highlight_radius: f64,
    /// Auto-play delay range in milliseconds, upper bound exclusive.
    pub autoplay_delay_ms: (u32, u32),
}

impl GameConfig {
    pub const DEFAULT_DECORATIVE_CHANCE: f64 = 1. / 15.;
    pub const DEFAULT_SPECIAL_WEIGHTS: [SpecialWeight; 4] = [
        SpecialWeight::new(SpecialCell::GameOver, 1. / 50.),
        SpecialWeight::new(SpecialCell::FinishGame, 1. / 40.),
        SpecialWeight::new(SpecialCell::InvertScore, 1. / 20.),
        SpecialWeight::new(SpecialCell::ZeroScore, 1. / 30.),
    ];
    pub const MIN_CELL_VALUE: CellNumber = -23;
    pub const MAX_CELL_VALUE: CellNumber = 20;
    pub const HIGHLIGHT_RADIUS: f64 = 15.;
    pub const AUTOPLAY_DELAY_MS: (u32, u32) = (200, 700);

    pub fn validate(&self) -> Result<()> {
        if !(0. ..=1.).contains(&self.decorative_chance) {
            return Err(GameError::InvalidConfig("decorative chance must be within 0..=1"));
        }
        if self
            .special_weights
            .iter()
            .any(|entry| entry.weight.is_nan() || entry.weight < 0.)
        {
            return Err(GameError::InvalidConfig("special weights must be non-negative"));
        }
        if self.total_special_weight() > 1. {
            return Err(GameError::InvalidConfig("special weights must sum to at most 1"));
        }
        if self.min_value > self.max_value {
            return Err(GameError::InvalidConfig("value range is inverted"));
        }
        if self.highlight_radius.is_nan() || self.highlight_radius < 0. {
            return Err(GameError::InvalidConfig("highlight radius must be non-negative"));
        }
        let (delay_min, delay_max) = self.autoplay_delay_ms;
        if delay_min == 0 || delay_min >= delay_max {
            return Err(GameError::InvalidConfig("auto-play delay must be a positive, non-empty range"));
        }
        Ok(())
    }

    pub fn total_special_weight(&self) -> f64 {
        self.special_weights.iter().map(|entry| entry.weight).sum()
    }

    /// Number of distinct numeric values. Wider than `CellNumber` so the full range fits.
    pub const fn value_span(&self) -> i64 {
        self.max_value as i64 - self.min_value as i64 + 1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            decorative_chance: Self::DEFAULT_DECORATIVE_CHANCE,
            special_weights: Self::DEFAULT_SPECIAL_WEIGHTS.to_vec(),
            min_value: Self::MIN_CELL_VALUE,
            max_value: Self::MAX_CELL_VALUE,
            highlight_radius: Self::HIGHLIGHT_RADIUS,
            autoplay_delay_ms: Self::AUTOPLAY_DELAY_MS,
        }
    }
}
