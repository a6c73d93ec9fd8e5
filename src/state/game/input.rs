//! Input routing for GameSession - process_press, process_release.
//!
//! All times are in milliseconds (f64) on the playback clock. Offsets are
//! computed against the event's own hardware timestamp so that judgement
//! does not depend on frame timing.

use super::GameSession;
use super::hold::release_outcome;

impl GameSession {
    /// Routes a key press to the earliest unresolved object in the column.
    ///
    /// A press matches only that object (no skipping ahead to a later
    /// note). If the offset falls outside the outermost window, or the
    /// lane is blocked by an already-active hold, the press is discarded
    /// without judgement.
    pub(crate) fn process_press(&mut self, column: usize, at_ms: f64) {
        if column >= self.timeline.column_count() {
            return;
        }
        self.keys_held[column] = true;

        let Some((index, slot)) = self.timeline.next_unresolved(column) else {
            return;
        };
        if !slot.head_pending() {
            return;
        }

        let offset_ms = at_ms - slot.object.time_ms as f64;
        if !self.window.contains(offset_ms) {
            return;
        }

        let judgement = self.window.classify(offset_ms);
        if slot.object.is_hold() {
            // Head judgement now, tail judgement on release or expiry.
            self.timeline.begin_hold(column, index);
        } else {
            self.timeline.resolve_tap(column, index);
        }
        self.last_offset_ms = Some(offset_ms);
        self.apply_judgement(judgement);
    }

    /// Routes a key release to the active hold in the column, if any.
    ///
    /// A release inside the tail window scores the tail by its offset; an
    /// early release outside the window forfeits the tail as a miss. A
    /// release with no live hold is a no-op, not an input error.
    pub(crate) fn process_release(&mut self, column: usize, at_ms: f64) {
        if column >= self.timeline.column_count() {
            return;
        }
        self.keys_held[column] = false;

        let Some((index, slot)) = self.timeline.next_unresolved(column) else {
            return;
        };
        if !slot.is_active_hold() {
            return;
        }

        let offset_ms = at_ms - slot.object.end_ms() as f64;
        let (state, judgement) = release_outcome(offset_ms, &self.window);
        self.timeline.finish_hold(column, index, state);
        self.last_offset_ms = Some(offset_ms);
        self.apply_judgement(judgement);
    }
}
