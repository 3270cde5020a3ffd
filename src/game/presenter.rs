//! Score presentation.

use serde::Serialize;

/// Coarse closeness band for a score.
///
/// Variants are ordered from farthest to exact, so comparing bands compares
/// closeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Far,
    Warm,
    VeryClose,
    Exact,
}

impl ScoreBand {
    /// Band for a raw score.
    pub fn for_score(score: f64) -> Self {
        if score >= 1.0 {
            Self::Exact
        } else if score > 0.5 {
            Self::VeryClose
        } else if score > 0.25 {
            Self::Warm
        } else {
            Self::Far
        }
    }

    /// Phrase describing `guess` in this band.
    pub fn message(self, guess: &str) -> String {
        match self {
            Self::Exact => format!("Well played! The word was {guess}."),
            Self::VeryClose => format!("{guess} is very close to the word"),
            Self::Warm => format!("{guess} is getting warmer"),
            Self::Far => format!("{guess} is quite far from the word"),
        }
    }

    /// CSS modifier used by the page template.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::VeryClose => "very-close",
            Self::Warm => "warm",
            Self::Far => "far",
        }
    }
}

/// Display form of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreDisplay {
    /// Bar width in percent, `0..=100`.
    pub width_percent: f64,
    pub band: ScoreBand,
}

/// Map a score in `[-1, 1]` onto a bar width and a band.
pub fn present(score: f64) -> ScoreDisplay {
    let normalized = f64::midpoint(score, 1.0);
    ScoreDisplay {
        width_percent: (normalized * 100.0).clamp(0.0, 100.0),
        band: ScoreBand::for_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_phrase() {
        let display = present(1.0);
        assert_eq!(display.band, ScoreBand::Exact);
        assert!((display.width_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(
            display.band.message("chien"),
            "Well played! The word was chien."
        );
    }

    #[test]
    fn test_bounds() {
        assert!(present(-1.0).width_percent.abs() < f64::EPSILON);
        assert!((present(0.0).width_percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(present(-1.0).band, ScoreBand::Far);
    }

    #[test]
    fn test_monotonic() {
        let scores: Vec<f64> = (-100..=100).map(|i| f64::from(i) / 100.0).collect();
        for pair in scores.windows(2) {
            let (lo, hi) = (present(pair[0]), present(pair[1]));
            assert!(hi.width_percent >= lo.width_percent, "{pair:?}");
            assert!(hi.band >= lo.band, "{pair:?}");
        }
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(ScoreBand::for_score(0.5), ScoreBand::Warm);
        assert_eq!(ScoreBand::for_score(0.51), ScoreBand::VeryClose);
        assert_eq!(ScoreBand::for_score(0.25), ScoreBand::Far);
        assert_eq!(ScoreBand::for_score(0.999), ScoreBand::VeryClose);
    }
}
