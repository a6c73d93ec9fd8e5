//! Core gameplay session for rhythm game mechanics.
//!
//! The `GameSession` coordinates all real-time gameplay logic:
//! - Expiring overdue notes as misses
//! - Routing timestamped key events to the hit timeline
//! - Hold-note head/tail state
//! - Score, combo, and accuracy tracking
//!
//! The session owns the hit timeline and score state exclusively. They are
//! mutated synchronously once per tick, never from another thread;
//! presentation layers only read through the accessors.

mod hold;
mod input;
mod score;
mod timeline;

pub use score::ScoreState;
pub use timeline::HitTimeline;

use crate::core::input::{InputHandle, InputKind, InputQueue};
use crate::models::chart::Chart;
use crate::models::hit_window::HitWindow;
use crate::models::judgement::Judgement;
use crate::models::result::SessionResults;

/// Lifecycle phase of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, clock not running yet.
    Waiting,
    Playing,
    Paused,
    /// Every object resolved; results are available.
    Finished,
    /// Quit mid-play; no results.
    Aborted,
}

/// One play-through of a chart.
pub struct GameSession {
    /// Chart objects partitioned by column with resolution state.
    pub(crate) timeline: HitTimeline,
    /// Score, combo, bonus and accuracy accumulator.
    score: ScoreState,
    /// Timing windows for this session.
    pub(crate) window: HitWindow,
    /// Buffered key events, drained each tick.
    input: InputQueue,

    /// Currently held keys per column.
    pub(crate) keys_held: Vec<bool>,
    /// Judgement of the most recent event, for display.
    pub(crate) last_judgement: Option<Judgement>,
    /// Timing offset of the last input-judged event (for hit error display).
    pub(crate) last_offset_ms: Option<f64>,
    /// Whether the MAX tier is surfaced or folded into 300 for display.
    show_max_judgement: bool,

    phase: SessionPhase,
    /// Identity of the chart being played, carried into the results.
    chart_hash: String,
}

impl GameSession {
    /// Creates a session over a validated chart.
    ///
    /// The window must come from a validated settings source; the chart
    /// guarantees a non-zero object count.
    pub fn new(chart: &Chart, window: HitWindow, show_max_judgement: bool) -> Self {
        Self {
            timeline: HitTimeline::new(chart),
            score: ScoreState::new(chart.total_hit_objects),
            window,
            input: InputQueue::new(),
            keys_held: vec![false; chart.key_count],
            last_judgement: None,
            last_offset_ms: None,
            show_max_judgement,
            phase: SessionPhase::Waiting,
            chart_hash: chart.hash.clone(),
        }
    }

    /// Handle for submitting key events from the host side.
    pub fn input_handle(&self) -> InputHandle {
        self.input.handle()
    }

    /// Starts play. Input buffered before the start is stale and dropped.
    pub fn start(&mut self) {
        if self.phase != SessionPhase::Waiting {
            return;
        }
        self.input.discard();
        self.phase = SessionPhase::Playing;
        log::info!(
            "SESSION: Play started ({}K, {} objects)",
            self.timeline.column_count(),
            self.timeline.remaining()
        );
    }

    /// Pauses play, discarding any partially-buffered input.
    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.input.discard();
        self.phase = SessionPhase::Paused;
        log::info!("SESSION: Paused");
    }

    /// Resumes play. Events buffered while paused are stale and dropped.
    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        self.input.discard();
        self.phase = SessionPhase::Playing;
        log::info!("SESSION: Resumed");
    }

    /// Abandons the session. No results are produced.
    pub fn abort(&mut self) {
        if matches!(self.phase, SessionPhase::Finished | SessionPhase::Aborted) {
            return;
        }
        self.input.discard();
        self.phase = SessionPhase::Aborted;
        log::info!(
            "SESSION: Aborted with {} objects unresolved",
            self.timeline.remaining()
        );
    }

    /// Advances the session by one tick of the playback clock.
    ///
    /// `now_ms` is sampled once per frame and is the only clock value used
    /// for this tick. Judgement offsets still come from each input event's
    /// own timestamp.
    pub fn tick(&mut self, now_ms: f64) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        // 1. Expire overdue objects in every lane, then apply the misses
        //    in expected-time order so cross-lane bonus decay is
        //    deterministic.
        let mut misses: Vec<(i32, Judgement)> = Vec::new();
        for column in 0..self.timeline.column_count() {
            misses.extend(self.timeline.expire_up_to(column, now_ms, &self.window));
        }
        misses.sort_by_key(|&(due_ms, _)| due_ms);
        for (_, judgement) in misses {
            self.apply_judgement(judgement);
        }

        // 2. Replay buffered input in hardware-timestamp order.
        for event in self.input.drain_ordered() {
            match event.kind {
                InputKind::Press => self.process_press(event.column, event.at_ms),
                InputKind::Release => self.process_release(event.column, event.at_ms),
            }
        }

        // 3. The session completes once every object is resolved.
        if self.timeline.all_resolved() {
            self.phase = SessionPhase::Finished;
            log::info!(
                "SESSION: Finished score {} acc {:.2}% combo x{}",
                self.score.rounded_score(),
                self.score.accuracy() * 100.0,
                self.score.max_combo()
            );
        }
    }

    /// Applies one judgement event to the score state.
    pub(crate) fn apply_judgement(&mut self, judgement: Judgement) {
        self.score.hit(judgement);
        self.last_judgement = Some(judgement);
        log::debug!(
            "SESSION: {} combo x{}",
            judgement.as_str(),
            self.score.combo()
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Read-only score state for presentation layers.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn window(&self) -> &HitWindow {
        &self.window
    }

    pub fn keys_held(&self) -> &[bool] {
        &self.keys_held
    }

    /// Objects not yet fully judged.
    pub fn remaining(&self) -> usize {
        self.timeline.remaining()
    }

    /// Last judgement for display, with the MAX tier folded into 300 when
    /// the surface-top-tier toggle is off.
    pub fn visible_judgement(&self) -> Option<Judgement> {
        let judgement = self.last_judgement?;
        if judgement == Judgement::Marv && !self.show_max_judgement {
            return Some(Judgement::Perfect);
        }
        Some(judgement)
    }

    /// Timing offset of the last input-judged event.
    pub fn last_offset_ms(&self) -> Option<f64> {
        self.last_offset_ms
    }

    /// Final results, available only once the session finished normally.
    pub fn results(&self) -> Option<SessionResults> {
        if self.phase != SessionPhase::Finished {
            return None;
        }
        Some(SessionResults {
            score: self.score.rounded_score(),
            accuracy: self.score.accuracy(),
            max_combo: self.score.max_combo(),
            counts: self.score.counts().clone(),
            chart_hash: self.chart_hash.clone(),
        })
    }
}
