use serde::{Deserialize, Serialize};

use crate::CellNumber;

/// Reveal outcomes that act on score or lifecycle instead of adding a number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCell {
    GameOver,
    FinishGame,
    InvertScore,
    ZeroScore,
}

impl SpecialCell {
    /// Glyph drawn on the revealed cell.
    pub const fn symbol(self) -> char {
        use SpecialCell::*;
        match self {
            GameOver => 'X',
            FinishGame => 'F',
            InvertScore => 'I',
            ZeroScore => 'Z',
        }
    }

    /// Message key for the presentation layer.
    pub const fn effect_key(self) -> &'static str {
        use SpecialCell::*;
        match self {
            GameOver => "game_over",
            FinishGame => "game_finished",
            InvertScore => "score_inverted",
            ZeroScore => "score_zeroed",
        }
    }
}

/// Cosmetic marker, one per palette entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorativeToken {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Cyan,
    Orange,
    Teal,
    Lime,
    Fuchsia,
}

impl DecorativeToken {
    pub const PALETTE: [Self; 12] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Pink,
        Self::Indigo,
        Self::Cyan,
        Self::Orange,
        Self::Teal,
        Self::Lime,
        Self::Fuchsia,
    ];

    pub const fn name(self) -> &'static str {
        use DecorativeToken::*;
        match self {
            Red => "red",
            Blue => "blue",
            Green => "green",
            Yellow => "yellow",
            Purple => "purple",
            Pink => "pink",
            Indigo => "indigo",
            Cyan => "cyan",
            Orange => "orange",
            Teal => "teal",
            Lime => "lime",
            Fuchsia => "fuchsia",
        }
    }
}

/// Value stored for a revealed coordinate. Unrevealed coordinates have no value at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellValue {
    Numeric(CellNumber),
    Special(SpecialCell),
    Decorative(DecorativeToken),
}

impl CellValue {
    /// Contribution to a radius sum, only numeric cells have one.
    pub const fn numeric(self) -> Option<CellNumber> {
        match self {
            Self::Numeric(value) => Some(value),
            _ => None,
        }
    }
}

impl From<SpecialCell> for CellValue {
    fn from(kind: SpecialCell) -> Self {
        Self::Special(kind)
    }
}
