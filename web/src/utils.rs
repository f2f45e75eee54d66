use radius_core::{CellValue, EndReason, RevealEffect, RevealReport, SpecialCell};

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Text drawn inside a revealed cell, decorative cells have none.
pub(crate) fn cell_text(value: CellValue) -> Option<String> {
    match value {
        CellValue::Numeric(number) => Some(number.to_string()),
        CellValue::Special(kind) => Some(kind.symbol().to_string()),
        CellValue::Decorative(_) => None,
    }
}

/// Smaller font for longer numbers.
pub(crate) fn value_size_class(value: CellValue) -> &'static str {
    match value {
        CellValue::Numeric(number) => {
            let digits = number.unsigned_abs().to_string().len() + usize::from(number < 0);
            match digits {
                0 | 1 => "text-xl",
                2 => "text-lg",
                _ => "text-base",
            }
        }
        CellValue::Special(_) => "text-xl special",
        CellValue::Decorative(_) => "",
    }
}

/// English text for a message key emitted by the engine.
fn message_text(key: &str) -> &'static str {
    match key {
        "game_over" => "Game Over!",
        "game_finished" => "Game Finished!",
        "score_inverted" => "Score Inverted!",
        "score_zeroed" => "Score Zeroed!",
        _ => {
            log::warn!("no text for message key {:?}", key);
            ""
        }
    }
}

pub(crate) fn special_label(kind: SpecialCell) -> &'static str {
    message_text(kind.effect_key())
}

pub(crate) fn end_label(reason: EndReason) -> &'static str {
    message_text(reason.message_key())
}

/// Lines of the score panel for the last reveal.
pub(crate) fn report_lines(report: &RevealReport) -> Vec<String> {
    let new_value = match report.value {
        CellValue::Numeric(number) => number.to_string(),
        CellValue::Special(kind) => kind.symbol().to_string(),
        CellValue::Decorative(token) => token.name().to_string(),
    };
    let mut lines = vec![format!("New Value: {}", new_value)];
    match &report.effect {
        RevealEffect::Scored(breakdown) => {
            lines.push(format!("Radius Sum: {}", breakdown.radius_sum));
            lines.push(format!("Multiplier: {}", breakdown.multiplier));
            lines.push(format!("Total Added: {}", breakdown.total));
        }
        RevealEffect::Special(kind) => lines.push(special_label(*kind).to_string()),
        RevealEffect::Decorative => {}
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use radius_core::*;

    #[test]
    fn value_text_and_size() {
        assert_eq!(cell_text(CellValue::Numeric(-23)).as_deref(), Some("-23"));
        assert_eq!(
            cell_text(CellValue::Special(SpecialCell::InvertScore)).as_deref(),
            Some("I")
        );
        assert_eq!(cell_text(CellValue::Decorative(DecorativeToken::Teal)), None);

        assert_eq!(value_size_class(CellValue::Numeric(7)), "text-xl");
        assert_eq!(value_size_class(CellValue::Numeric(-7)), "text-lg");
        assert_eq!(value_size_class(CellValue::Numeric(-23)), "text-base");
    }

    #[test]
    fn report_lines_show_breakdown() {
        let mut engine = PlayEngine::new(GameConfig::default()).unwrap();
        engine
            .reveal_value(Coords::ORIGIN, CellValue::Numeric(10))
            .unwrap();
        let report = engine
            .reveal_value(Coords::new(3, 4), CellValue::Numeric(-5))
            .unwrap();

        assert_eq!(
            report_lines(&report),
            vec![
                "New Value: -5",
                "Radius Sum: 10",
                "Multiplier: 5",
                "Total Added: 45",
            ]
        );

        let report = engine
            .reveal_value(Coords::new(0, 1), SpecialCell::ZeroScore.into())
            .unwrap();
        assert_eq!(report_lines(&report), vec!["New Value: Z", "Score Zeroed!"]);
    }

    #[test]
    fn labels_follow_engine_message_keys() {
        assert_eq!(special_label(SpecialCell::GameOver), "Game Over!");
        assert_eq!(special_label(SpecialCell::FinishGame), "Game Finished!");
        assert_eq!(special_label(SpecialCell::InvertScore), "Score Inverted!");
        assert_eq!(end_label(EndReason::GameOver), special_label(SpecialCell::GameOver));
        assert_eq!(end_label(EndReason::FinishGame), special_label(SpecialCell::FinishGame));
        assert_eq!(message_text("unknown"), "");
    }
}
