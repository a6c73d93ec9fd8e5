//! Score accumulator in the osu!mania ScoreV1 shape.
//!
//! Every judged event adds a base term weighted by its tier and a bonus
//! term driven by a rolling 0..=100 bonus value, so score is a pure
//! accumulation and never recomputed from scratch. Both terms are
//! non-negative, which keeps score monotonic and bounded by `MAX_SCORE`
//! across any judgement sequence.

use crate::models::judgement::Judgement;
use crate::models::judgement::JudgementCounts;

pub const MAX_SCORE: f64 = 1_000_000.0;

/// Mutable score state for one play session.
#[derive(Debug, Clone)]
pub struct ScoreState {
    /// Judged events the chart contains in total, holds counting twice.
    total_hit_objects: u32,
    score: f64,
    combo: u32,
    max_combo: u32,
    /// Rolling bonus value, rewarded by accurate hits and drained by poor ones.
    bonus: f64,
    accuracy: f64,
    counts: JudgementCounts,
}

impl ScoreState {
    pub fn new(total_hit_objects: u32) -> Self {
        assert!(total_hit_objects > 0, "score state over an empty chart");
        Self {
            total_hit_objects,
            score: 0.0,
            combo: 0,
            max_combo: 0,
            bonus: 100.0,
            accuracy: 1.0,
            counts: JudgementCounts::new(),
        }
    }

    /// Applies one judgement event.
    pub fn hit(&mut self, judgement: Judgement) {
        let unit = MAX_SCORE / 2.0 / self.total_hit_objects as f64;
        let base = unit * judgement.weight() as f64 / 320.0;

        // The bonus moves before the bonus term is computed.
        self.bonus = (self.bonus + judgement.bonus_delta()).clamp(0.0, 100.0);
        let bonus_score = unit * judgement.bonus_weight() * self.bonus.sqrt() / 320.0;

        self.score += base + bonus_score;
        self.counts.record(judgement);

        if judgement.is_miss() {
            self.combo = 0;
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        }

        self.accuracy = self.weighted_hits() / (300.0 * self.total_hit_objects as f64);
    }

    /// Accuracy numerator: the MAX tier counts the same as a 300.
    fn weighted_hits(&self) -> f64 {
        let c = &self.counts;
        (300 * (c.marv + c.perfect) + 200 * c.great + 100 * c.good + 50 * c.bad) as f64
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Score rounded for display and result output.
    pub fn rounded_score(&self) -> u32 {
        self.score.round() as u32
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn bonus(&self) -> f64 {
        self.bonus
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn counts(&self) -> &JudgementCounts {
        &self.counts
    }

    pub fn total_hit_objects(&self) -> u32 {
        self.total_hit_objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const TIERS: [Judgement; 6] = [
        Judgement::Marv,
        Judgement::Perfect,
        Judgement::Great,
        Judgement::Good,
        Judgement::Bad,
        Judgement::Miss,
    ];

    #[test]
    fn perfect_play_lands_on_the_score_cap() {
        let total = 100;
        let mut state = ScoreState::new(total);

        let mut previous = 0.0;
        for _ in 0..total {
            state.hit(Judgement::Marv);
            assert!(state.score() > previous);
            previous = state.score();
        }

        // Bonus starts saturated and MAX hits keep it there, so every
        // event is worth exactly two units and the cap is reached.
        assert_eq!(state.rounded_score(), 1_000_000);
        assert_eq!(state.bonus(), 100.0);
        assert_eq!(state.max_combo(), total);
        assert!((state.accuracy() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn score_is_monotonic_and_bounded_over_random_sequences() {
        let mut rng = rand::rng();

        for _ in 0..50 {
            let total = rng.random_range(1..200);
            let mut state = ScoreState::new(total);
            let mut previous = 0.0;

            for _ in 0..total {
                state.hit(TIERS[rng.random_range(0..TIERS.len())]);
                assert!(state.score() >= previous);
                previous = state.score();
            }

            assert!(state.score() <= MAX_SCORE + 1e-6);
            assert!((0.0..=100.0).contains(&state.bonus()));
            assert!((0.0..=1.0 + 1e-9).contains(&state.accuracy()));
            assert!(state.max_combo() >= state.combo());
            assert_eq!(state.counts().total(), total);
        }
    }

    #[test]
    fn miss_resets_combo_to_zero() {
        let mut state = ScoreState::new(10);

        state.hit(Judgement::Marv);
        state.hit(Judgement::Perfect);
        state.hit(Judgement::Great);
        assert_eq!(state.combo(), 3);

        state.hit(Judgement::Miss);
        assert_eq!(state.combo(), 0);
        assert_eq!(state.max_combo(), 3);

        state.hit(Judgement::Good);
        assert_eq!(state.combo(), 1);
        assert_eq!(state.max_combo(), 3);
    }

    #[test]
    fn accuracy_matches_the_closed_form_over_the_counts() {
        let mut state = ScoreState::new(8);
        let sequence = [
            Judgement::Marv,
            Judgement::Perfect,
            Judgement::Great,
            Judgement::Good,
            Judgement::Bad,
            Judgement::Miss,
            Judgement::Marv,
            Judgement::Perfect,
        ];

        for judgement in sequence {
            state.hit(judgement);
        }

        let c = state.counts();
        let expected = (300 * (c.marv + c.perfect) + 200 * c.great + 100 * c.good + 50 * c.bad)
            as f64
            / (300.0 * 8.0);
        assert_eq!(state.accuracy(), expected);

        // 2 MAX + 2x300 count as 300 each: (4*300 + 200 + 100 + 50) / 2400.
        assert!((state.accuracy() - 1550.0 / 2400.0).abs() < 1e-12);
    }

    #[test]
    fn bonus_drains_on_poor_hits_and_recovers_slowly() {
        let mut state = ScoreState::new(100);

        state.hit(Judgement::Miss);
        assert_eq!(state.bonus(), 0.0);

        // Recovery at +1 per 300.
        for _ in 0..40 {
            state.hit(Judgement::Perfect);
        }
        assert_eq!(state.bonus(), 40.0);

        state.hit(Judgement::Bad);
        assert_eq!(state.bonus(), 0.0);
    }
}
