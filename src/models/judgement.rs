//! Hit judgement tiers and per-session judgement counts.
//!
//! osu!mania judgement values double as score weights and as keys into the
//! bonus tables. The enum is the only key used anywhere; the raw numbers
//! are reachable through the accessors below so both uses stay in sync.

/// Hit judgement tiers from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Judgement {
    /// Perfect timing (the 320 "MAX" tier).
    Marv,
    /// Excellent timing (300).
    Perfect,
    /// Good timing (200).
    Great,
    /// Acceptable timing (100).
    Good,
    /// Poor timing (50).
    Bad,
    /// Missed note.
    Miss,
}

impl Judgement {
    /// Score weight of the tier (the raw osu!mania judgement value).
    pub fn weight(self) -> u32 {
        match self {
            Judgement::Marv => 320,
            Judgement::Perfect => 300,
            Judgement::Great => 200,
            Judgement::Good => 100,
            Judgement::Bad => 50,
            Judgement::Miss => 0,
        }
    }

    /// Change applied to the rolling bonus value by this tier.
    pub fn bonus_delta(self) -> f64 {
        match self {
            Judgement::Marv => 2.0,
            Judgement::Perfect => 1.0,
            Judgement::Great => -8.0,
            Judgement::Good => -24.0,
            Judgement::Bad => -44.0,
            Judgement::Miss => -100.0,
        }
    }

    /// Weight of the bonus term in the score formula.
    pub fn bonus_weight(self) -> f64 {
        match self {
            Judgement::Marv | Judgement::Perfect => 32.0,
            Judgement::Great => 16.0,
            Judgement::Good => 8.0,
            Judgement::Bad => 4.0,
            Judgement::Miss => 0.0,
        }
    }

    /// Returns true if this tier breaks combo.
    pub fn is_miss(self) -> bool {
        self == Judgement::Miss
    }

    /// Display name used in logs and result output.
    pub fn as_str(self) -> &'static str {
        match self {
            Judgement::Marv => "MAX",
            Judgement::Perfect => "300",
            Judgement::Great => "200",
            Judgement::Good => "100",
            Judgement::Bad => "50",
            Judgement::Miss => "miss",
        }
    }
}

/// Accumulated judgement counts for a play session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JudgementCounts {
    pub marv: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl JudgementCounts {
    /// Creates empty counts.
    pub fn new() -> Self {
        Self {
            marv: 0,
            perfect: 0,
            great: 0,
            good: 0,
            bad: 0,
            miss: 0,
        }
    }

    /// Increments the count for the given tier.
    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Marv => self.marv += 1,
            Judgement::Perfect => self.perfect += 1,
            Judgement::Great => self.great += 1,
            Judgement::Good => self.good += 1,
            Judgement::Bad => self.bad += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    /// Returns the count for the given tier.
    pub fn get(&self, judgement: Judgement) -> u32 {
        match judgement {
            Judgement::Marv => self.marv,
            Judgement::Perfect => self.perfect,
            Judgement::Great => self.great,
            Judgement::Good => self.good,
            Judgement::Bad => self.bad,
            Judgement::Miss => self.miss,
        }
    }

    /// Total number of judged events so far.
    pub fn total(&self) -> u32 {
        self.marv + self.perfect + self.great + self.good + self.bad + self.miss
    }
}

impl Default for JudgementCounts {
    fn default() -> Self {
        Self::new()
    }
}
