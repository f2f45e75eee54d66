use super::*;

/// Returns the first special outcome whose cumulative weight exceeds `draw`.
///
/// The table order is the dispatch order, so an earlier entry shadows the start of the unit interval.
pub fn pick_special(draw: f64, table: &[SpecialWeight]) -> Option<SpecialCell> {
    table
        .iter()
        .scan(0., |cumulative, entry| {
            *cumulative += entry.weight;
            Some((*cumulative, entry.kind))
        })
        .find(|&(cumulative, _)| draw < cumulative)
        .map(|(_, kind)| kind)
}

/// Draws reveal outcomes in three stages: a decorative gate, a cumulative special table, and a uniform numeric value.
///
/// The decorative gate uses its own draw so its chance does not shift the relative weights of the later stages. The
/// decorative token is derived from that same draw, rescaled onto the palette.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedCellGenerator {
    decorative_chance: f64,
    special_weights: Vec<SpecialWeight>,
    min_value: CellNumber,
    max_value: CellNumber,
}

impl WeightedCellGenerator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            decorative_chance: config.decorative_chance,
            special_weights: config.special_weights.clone(),
            min_value: config.min_value,
            max_value: config.max_value,
        }
    }

    fn decorative_token(&self, gate_draw: f64) -> DecorativeToken {
        let palette = &DecorativeToken::PALETTE;
        let scaled = if self.decorative_chance > 0. {
            gate_draw / self.decorative_chance
        } else {
            0.
        };
        palette[unit_to_index(scaled, palette.len())]
    }

    fn numeric_value(&self, draw: f64) -> CellNumber {
        let min = i64::from(self.min_value);
        let span = (i64::from(self.max_value) - min + 1).max(1);
        let index = ((draw * span as f64) as i64).clamp(0, span - 1);
        (min + index) as CellNumber
    }
}

impl CellGenerator for WeightedCellGenerator {
    fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CellValue {
        let gate_draw = rng.next_unit();
        if gate_draw < self.decorative_chance {
            return CellValue::Decorative(self.decorative_token(gate_draw));
        }

        let special_draw = rng.next_unit();
        if let Some(kind) = pick_special(special_draw, &self.special_weights) {
            return CellValue::Special(kind);
        }

        CellValue::Numeric(self.numeric_value(rng.next_unit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> WeightedCellGenerator {
        WeightedCellGenerator::new(&GameConfig::default())
    }

    fn draw(draws: &[f64]) -> (CellValue, usize) {
        let mut rng = ScriptedSource::new(draws.iter().copied());
        let value = generator().generate(&mut rng);
        (value, rng.consumed())
    }

    #[test]
    fn decorative_gate_stops_after_one_draw() {
        let (value, consumed) = draw(&[0.0, 0.0, 0.0]);
        assert_eq!(value, CellValue::Decorative(DecorativeToken::Red));
        assert_eq!(consumed, 1);

        // just under the gate lands on the last palette entry
        let (value, _) = draw(&[1. / 15. - 1e-9]);
        assert_eq!(value, CellValue::Decorative(DecorativeToken::Fuchsia));
    }

    #[test]
    fn special_table_is_cumulative_in_order() {
        use SpecialCell::*;
        let cases = [
            (0.0, GameOver),
            (0.019, GameOver),
            (0.021, FinishGame),
            (0.044, FinishGame),
            (0.046, InvertScore),
            (0.094, InvertScore),
            (0.096, ZeroScore),
            (0.128, ZeroScore),
        ];
        for (special_draw, expected) in cases {
            let (value, consumed) = draw(&[0.5, special_draw]);
            assert_eq!(value, CellValue::Special(expected), "draw {special_draw}");
            assert_eq!(consumed, 2);
        }
    }

    #[test]
    fn numeric_range_covers_both_ends() {
        let (value, consumed) = draw(&[0.5, 0.5, 0.0]);
        assert_eq!(value, CellValue::Numeric(-23));
        assert_eq!(consumed, 3);

        let (value, _) = draw(&[0.5, 0.5, 0.999_999]);
        assert_eq!(value, CellValue::Numeric(20));

        let (value, _) = draw(&[0.5, 0.13, 33.5 / 44.]);
        assert_eq!(value, CellValue::Numeric(10));
    }

    #[test]
    fn full_value_range_does_not_overflow() {
        let config = GameConfig {
            decorative_chance: 0.,
            special_weights: Vec::new(),
            min_value: CellNumber::MIN,
            max_value: CellNumber::MAX,
            ..Default::default()
        };
        let generator = WeightedCellGenerator::new(&config);
        let generate = |draw: f64| {
            let mut rng = ScriptedSource::new([0.5, 0.5, draw]);
            generator.generate(&mut rng)
        };

        assert_eq!(generate(0.), CellValue::Numeric(CellNumber::MIN));
        assert_eq!(generate(0.5), CellValue::Numeric(0));
        assert_eq!(generate(0.999_999_999_9), CellValue::Numeric(CellNumber::MAX));
    }

    #[test]
    fn pick_special_falls_through_past_table() {
        let table = GameConfig::DEFAULT_SPECIAL_WEIGHTS;
        assert_eq!(pick_special(0.2, &table), None);
        assert_eq!(pick_special(0.5, &[]), None);
    }

    #[test]
    fn seeded_rng_stays_in_unit_interval() {
        let mut rng = seeded_rng(7);
        for _ in 0..1000 {
            let draw = rng.next_unit();
            assert!((0. ..1.).contains(&draw));
        }
    }

    #[test]
    fn outcome_frequencies_follow_weights() {
        let mut rng = seeded_rng(42);
        let generator = generator();
        let samples = 60_000;
        let mut decorative = 0;
        let mut game_over = 0;
        for _ in 0..samples {
            match generator.generate(&mut rng) {
                CellValue::Decorative(_) => decorative += 1,
                CellValue::Special(SpecialCell::GameOver) => game_over += 1,
                CellValue::Numeric(value) => assert!((-23..=20).contains(&value)),
                CellValue::Special(_) => {}
            }
        }
        let decorative_rate = decorative as f64 / samples as f64;
        let game_over_rate = game_over as f64 / samples as f64;
        assert!((decorative_rate - 1. / 15.).abs() < 0.01, "{decorative_rate}");
        // game over is conditional on passing the decorative gate
        let expected = (14. / 15.) / 50.;
        assert!((game_over_rate - expected).abs() < 0.005, "{game_over_rate}");
    }
}
