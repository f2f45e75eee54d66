use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GameError, Result};

/// Single coordinate axis of the world grid.
pub type Coord = i32;

/// Signed score accumulator, wide enough for `radius_sum * |value|` products.
pub type Score = i64;

/// Numeric payload of a revealed cell.
pub type CellNumber = i32;

pub const MIN_COORD: Coord = -10_000;
pub const MAX_COORD: Coord = 10_000;

/// Number of cells along one axis of the domain.
pub const DOMAIN_WIDTH: Coord = MAX_COORD - MIN_COORD + 1;

/// Absolute world coordinates `(x, y)`, the key for all per-cell state.
///
/// The text form is `x:y`. World `y` grows downwards, matching screen rows; the navigator shows `y` growing upwards,
/// see [`Coords::from_display`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coords {
    pub x: Coord,
    pub y: Coord,
}

impl Coords {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn in_domain(self) -> bool {
        MIN_COORD <= self.x && self.x <= MAX_COORD && MIN_COORD <= self.y && self.y <= MAX_COORD
    }

    pub fn validate(self) -> Result<Self> {
        if self.in_domain() {
            Ok(self)
        } else {
            Err(GameError::OutOfDomain)
        }
    }

    /// Converts navigator coordinates (y up) to world coordinates (y down).
    pub const fn from_display(display: Self) -> Self {
        Self::new(display.x, display.y.saturating_neg())
    }

    /// Converts world coordinates to the navigator convention.
    pub const fn to_display(self) -> Self {
        Self::new(self.x, self.y.saturating_neg())
    }

    pub const fn squared_distance(self, other: Self) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.squared_distance(other) as f64).sqrt()
    }
}

impl From<(Coord, Coord)> for Coords {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCoordsError {
    #[error("Expected a single ':' between x and y")]
    MissingSeparator,
    #[error("Invalid x coordinate: {0:?}")]
    InvalidX(String),
    #[error("Invalid y coordinate: {0:?}")]
    InvalidY(String),
}

fn parse_axis(part: &str) -> Option<Coord> {
    let digits = part.strip_prefix('-').unwrap_or(part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for Coords {
    type Err = ParseCoordsError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (x, y) = s
            .split_once(':')
            .filter(|(_, y)| !y.contains(':'))
            .ok_or(ParseCoordsError::MissingSeparator)?;
        let x = parse_axis(x).ok_or_else(|| ParseCoordsError::InvalidX(x.to_owned()))?;
        let y = parse_axis(y).ok_or_else(|| ParseCoordsError::InvalidY(y.to_owned()))?;
        Ok(Self::new(x, y))
    }
}
