use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of summing the numeric neighbourhood of a newly revealed value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub value: CellNumber,
    pub radius_sum: Score,
    pub multiplier: Score,
    pub total: Score,
    /// Revealed numeric cells that contributed to `radius_sum`.
    pub participants: Vec<Coords>,
}

impl ScoreBreakdown {
    /// `value + radius_sum * |value|`.
    pub fn new(value: CellNumber, radius_sum: Score, participants: Vec<Coords>) -> Self {
        let multiplier = Score::from(value).abs();
        let total = Score::from(value).saturating_add(radius_sum.saturating_mul(multiplier));
        Self {
            value,
            radius_sum,
            multiplier,
            total,
            participants,
        }
    }
}

/// Sparse map from revealed coordinates to their values. Keys are written once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellStore {
    cells: HashMap<Coords, CellValue>,
}

impl CellStore {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coords) -> bool {
        self.cells.contains_key(&coords)
    }

    pub fn get(&self, coords: Coords) -> Option<CellValue> {
        self.cells.get(&coords).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coords, CellValue)> + '_ {
        self.cells.iter().map(|(&coords, &value)| (coords, value))
    }

    /// Records a reveal, refusing to overwrite an existing one.
    pub fn insert(&mut self, coords: Coords, value: CellValue) -> Result<()> {
        use hashbrown::hash_map::Entry;
        match self.cells.entry(coords) {
            Entry::Occupied(_) => Err(GameError::AlreadyRevealed),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Numeric cells within `radius` (inclusive) of `center`, excluding `center` itself.
    pub fn numeric_within(
        &self,
        center: Coords,
        radius: f64,
    ) -> impl Iterator<Item = (Coords, CellNumber)> + '_ {
        self.iter()
            .filter(move |&(coords, _)| coords != center && coords.distance(center) <= radius)
            .filter_map(|(coords, value)| value.numeric().map(|number| (coords, number)))
    }

    pub fn radius_sum(&self, center: Coords, radius: f64) -> Score {
        self.numeric_within(center, radius)
            .map(|(_, number)| Score::from(number))
            .fold(0, Score::saturating_add)
    }

    pub fn breakdown(&self, center: Coords, value: CellNumber, radius: f64) -> ScoreBreakdown {
        let mut radius_sum: Score = 0;
        let mut participants = Vec::new();
        for (coords, number) in self.numeric_within(center, radius) {
            radius_sum = radius_sum.saturating_add(Score::from(number));
            participants.push(coords);
        }
        participants.sort_unstable();
        ScoreBreakdown::new(value, radius_sum, participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(cells: &[((Coord, Coord), CellValue)]) -> CellStore {
        let mut store = CellStore::default();
        for &(coords, value) in cells {
            store.insert(coords.into(), value).unwrap();
        }
        store
    }

    #[test]
    fn insert_refuses_second_write() {
        let mut store = store(&[((0, 0), CellValue::Numeric(4))]);
        assert_eq!(
            store.insert(Coords::ORIGIN, CellValue::Numeric(-1)),
            Err(GameError::AlreadyRevealed)
        );
        assert_eq!(store.get(Coords::ORIGIN), Some(CellValue::Numeric(4)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let store = store(&[
            ((9, 12), CellValue::Numeric(3)),
            ((0, 15), CellValue::Numeric(5)),
            ((11, 11), CellValue::Numeric(100)),
            ((0, 16), CellValue::Numeric(1000)),
        ]);
        // (11, 11) is at sqrt(242) > 15
        assert_eq!(store.radius_sum(Coords::ORIGIN, 15.), 8);
    }

    #[test]
    fn sum_skips_center_and_non_numeric_cells() {
        let store = store(&[
            ((0, 0), CellValue::Numeric(50)),
            ((1, 0), CellValue::Decorative(DecorativeToken::Teal)),
            ((0, 1), CellValue::Special(SpecialCell::InvertScore)),
            ((2, 2), CellValue::Numeric(-7)),
        ]);
        let breakdown = store.breakdown(Coords::ORIGIN, 3, 15.);
        assert_eq!(breakdown.radius_sum, -7);
        assert_eq!(breakdown.participants, vec![Coords::new(2, 2)]);
        assert_eq!(breakdown.multiplier, 3);
        assert_eq!(breakdown.total, 3 - 21);
    }

    #[test]
    fn breakdown_uses_absolute_multiplier() {
        let breakdown = ScoreBreakdown::new(-5, 10, vec![]);
        assert_eq!(breakdown.multiplier, 5);
        assert_eq!(breakdown.total, 45);

        let breakdown = ScoreBreakdown::new(-5, -10, vec![]);
        assert_eq!(breakdown.total, -55);
    }
}
