use hashbrown::HashSet;
use web_time::{Duration, Instant};

use crate::*;

/// Marks the cells that fed the last radius sum for a short while.
#[derive(Clone, Debug)]
pub struct Pulse {
    cells: HashSet<Coords>,
    started_at: Instant,
}

impl Pulse {
    pub const DURATION: Duration = Duration::from_secs(1);

    pub fn new(cells: impl IntoIterator<Item = Coords>, now: Instant) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            started_at: now,
        }
    }

    pub fn from_report(report: &RevealReport, now: Instant) -> Option<Self> {
        report
            .breakdown()
            .filter(|breakdown| !breakdown.participants.is_empty())
            .map(|breakdown| Self::new(breakdown.participants.iter().copied(), now))
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) < Self::DURATION
    }

    pub fn contains(&self, coords: Coords, now: Instant) -> bool {
        self.is_active(now) && self.cells.contains(&coords)
    }
}

/// Fading ring around the navigator target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TargetMarker {
    pub coords: Coords,
    placed_at: Instant,
}

impl TargetMarker {
    pub const DURATION: Duration = Duration::from_secs(5);
    const PEAK_OPACITY: f64 = 0.8;
    const DECAY_PER_SEC: f64 = 0.6;

    pub fn new(coords: Coords, now: Instant) -> Self {
        Self {
            coords,
            placed_at: now,
        }
    }

    /// `None` once the marker has expired.
    pub fn opacity(&self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.placed_at);
        if elapsed > Self::DURATION {
            return None;
        }
        Some(Self::PEAK_OPACITY * (-elapsed.as_secs_f64() * Self::DECAY_PER_SEC).exp())
    }
}

/// Shading of a cell at `distance` from the hovered one, `None` outside the scoring radius.
pub fn highlight_intensity(distance: f64, radius: f64) -> Option<f64> {
    if radius <= 0. || distance > radius {
        return None;
    }
    Some((1. - distance / radius).max(0.1) * 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_expires_after_a_second() {
        let now = Instant::now();
        let pulse = Pulse::new([Coords::ORIGIN], now);

        assert!(pulse.contains(Coords::ORIGIN, now + Duration::from_millis(999)));
        assert!(!pulse.contains(Coords::new(1, 0), now));
        assert!(!pulse.is_active(now + Duration::from_secs(1)));
    }

    #[test]
    fn pulse_needs_participants() {
        let mut engine = PlayEngine::new(GameConfig::default()).unwrap();
        let now = Instant::now();

        let first = engine
            .reveal_value(Coords::ORIGIN, CellValue::Numeric(3))
            .unwrap();
        assert!(Pulse::from_report(&first, now).is_none());

        let second = engine
            .reveal_value(Coords::new(1, 1), CellValue::Numeric(3))
            .unwrap();
        let pulse = Pulse::from_report(&second, now).unwrap();
        assert!(pulse.contains(Coords::ORIGIN, now));
    }

    #[test]
    fn marker_fades_then_expires() {
        let now = Instant::now();
        let marker = TargetMarker::new(Coords::ORIGIN, now);

        assert_eq!(marker.opacity(now), Some(0.8));
        let later = marker.opacity(now + Duration::from_secs(1)).unwrap();
        assert!((later - 0.8 * (-0.6f64).exp()).abs() < 1e-9);
        assert_eq!(marker.opacity(now + Duration::from_millis(5001)), None);
    }

    #[test]
    fn intensity_has_floor_inside_radius() {
        assert_eq!(highlight_intensity(0., 15.), Some(0.3));
        assert!((highlight_intensity(15., 15.).unwrap() - 0.03).abs() < 1e-12);
        assert_eq!(highlight_intensity(15.01, 15.), None);
    }
}
