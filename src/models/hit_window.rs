//! Definitions and constructors for hit window timing thresholds.
//!
//! Windows are symmetric half-widths around each note's target time,
//! nested best to worst. The outermost band (`bad_ms`) doubles as the miss
//! boundary: past `expected + bad_ms` an unjudged note expires as a miss,
//! and an input further away than `bad_ms` matches nothing at all.

use super::judgement::Judgement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub marv_ms: f64,
    pub perfect_ms: f64,
    pub great_ms: f64,
    pub good_ms: f64,
    pub bad_ms: f64,
}

impl HitWindow {
    /// Creates a window based on osu! Overall Difficulty.
    pub fn from_osu_od(od: f64) -> Self {
        Self {
            marv_ms: 16.0,                 // Fixed (legacy behavior)
            perfect_ms: 64.0 - (3.0 * od), // 300 window
            great_ms: 97.0 - (3.0 * od),   // 200 window
            good_ms: 127.0 - (3.0 * od),   // 100 window
            bad_ms: 151.0 - (3.0 * od),    // 50 window, also the miss boundary
        }
    }

    /// Utility constructor for fully custom values.
    pub fn from_custom(marv: f64, perf: f64, great: f64, good: f64, bad: f64) -> Self {
        Self {
            marv_ms: marv,
            perfect_ms: perf,
            great_ms: great,
            good_ms: good,
            bad_ms: bad,
        }
    }

    /// Returns true if the bands are strictly nested best to worst.
    ///
    /// Custom windows from settings must pass this before use; the OD
    /// constructor satisfies it for the whole 0-10 range.
    pub fn is_nested(&self) -> bool {
        self.marv_ms > 0.0
            && self.marv_ms < self.perfect_ms
            && self.perfect_ms < self.great_ms
            && self.great_ms < self.good_ms
            && self.good_ms < self.bad_ms
    }

    /// Returns true if an offset lies within the outermost band.
    pub fn contains(&self, offset_ms: f64) -> bool {
        offset_ms.abs() <= self.bad_ms
    }

    /// Classifies a timing offset (actual - expected, in ms) into a tier.
    pub fn classify(&self, offset_ms: f64) -> Judgement {
        let abs_diff = offset_ms.abs();

        if abs_diff <= self.marv_ms {
            Judgement::Marv
        } else if abs_diff <= self.perfect_ms {
            Judgement::Perfect
        } else if abs_diff <= self.great_ms {
            Judgement::Great
        } else if abs_diff <= self.good_ms {
            Judgement::Good
        } else if abs_diff <= self.bad_ms {
            Judgement::Bad
        } else {
            Judgement::Miss
        }
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::from_osu_od(5.0)
    }
}
