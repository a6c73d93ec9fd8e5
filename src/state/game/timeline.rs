//! Hit timeline: chart objects partitioned by column with resolution state.
//!
//! Each lane is a time-sorted queue with a cursor at the earliest object
//! that still has judgement events outstanding. Resolution is strictly
//! in-order within a lane: an input can only ever match the object at the
//! cursor, which is the osu!mania no-skipping rule. Resolving any slot a
//! second time is a programming error and panics.

use super::hold::HoldState;
use crate::models::chart::{Chart, HitObject};
use crate::models::hit_window::HitWindow;
use crate::models::judgement::Judgement;

/// A hit object plus its resolution state.
#[derive(Debug, Clone)]
pub struct Slot {
    pub object: HitObject,
    /// State machine for holds, `None` for taps.
    hold: Option<HoldState>,
    /// True once every judgement event for this object has been emitted.
    resolved: bool,
}

impl Slot {
    fn new(object: HitObject) -> Self {
        let hold = object.is_hold().then_some(HoldState::Idle);
        Self {
            object,
            hold,
            resolved: false,
        }
    }

    /// True while the head judgement (tap hit, hold key-down) is outstanding.
    pub fn head_pending(&self) -> bool {
        match self.hold {
            None => !self.resolved,
            Some(state) => state == HoldState::Idle,
        }
    }

    /// True for a hold whose head was hit and whose tail is outstanding.
    pub fn is_active_hold(&self) -> bool {
        self.hold == Some(HoldState::Active)
    }
}

struct Lane {
    slots: Vec<Slot>,
    /// Index of the earliest slot with outstanding judgement events.
    cursor: usize,
}

impl Lane {
    fn skip_resolved(&mut self) {
        while self
            .slots
            .get(self.cursor)
            .is_some_and(|slot| slot.resolved)
        {
            self.cursor += 1;
        }
    }
}

/// The chart's hit objects indexed by column, tracking resolution.
pub struct HitTimeline {
    lanes: Vec<Lane>,
    /// Objects not yet fully resolved.
    remaining: usize,
}

impl HitTimeline {
    /// Builds the timeline from a validated chart.
    pub fn new(chart: &Chart) -> Self {
        let mut lanes: Vec<Lane> = (0..chart.key_count)
            .map(|_| Lane {
                slots: Vec::new(),
                cursor: 0,
            })
            .collect();

        // Chart objects are globally time-sorted, so each lane is too.
        for &object in &chart.objects {
            lanes[object.column].slots.push(Slot::new(object));
        }

        let remaining = chart.objects.len();
        Self { lanes, remaining }
    }

    pub fn column_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of objects with outstanding judgement events.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// True once every object has been fully resolved.
    pub fn all_resolved(&self) -> bool {
        self.remaining == 0
    }

    /// Returns the earliest unresolved slot in the column, with its index.
    pub fn next_unresolved(&self, column: usize) -> Option<(usize, &Slot)> {
        let lane = &self.lanes[column];
        lane.slots.get(lane.cursor).map(|slot| (lane.cursor, slot))
    }

    /// Marks the tap at `index` as judged.
    ///
    /// The index must be the lane cursor: resolution is in-order only. A
    /// resolved slot is never at the cursor, so resolving twice is fatal.
    pub fn resolve_tap(&mut self, column: usize, index: usize) {
        let lane = &mut self.lanes[column];
        assert_eq!(
            index, lane.cursor,
            "tap resolution must target the earliest unresolved object"
        );
        let slot = &mut lane.slots[index];
        assert!(slot.hold.is_none(), "tap resolution applied to a hold");

        slot.resolved = true;
        self.remaining -= 1;
        lane.skip_resolved();
    }

    /// Moves the hold at `index` from `Idle` to `Active` (head judged).
    ///
    /// The lane stays blocked on the hold until its tail resolves.
    pub fn begin_hold(&mut self, column: usize, index: usize) {
        let lane = &mut self.lanes[column];
        assert_eq!(
            index, lane.cursor,
            "hold activation must target the earliest unresolved object"
        );
        let slot = &mut lane.slots[index];
        assert_eq!(slot.hold, Some(HoldState::Idle), "hold head judged twice");

        slot.hold = Some(HoldState::Active);
    }

    /// Moves the active hold at `index` into a terminal state (tail judged).
    pub fn finish_hold(&mut self, column: usize, index: usize, state: HoldState) {
        assert!(state.is_terminal(), "hold finished with a pending state");
        let lane = &mut self.lanes[column];
        assert_eq!(
            index, lane.cursor,
            "hold completion must target the earliest unresolved object"
        );
        let slot = &mut lane.slots[index];
        assert_eq!(
            slot.hold,
            Some(HoldState::Active),
            "hold finished before its head was judged"
        );

        slot.hold = Some(state);
        slot.resolved = true;
        self.remaining -= 1;
        lane.skip_resolved();
    }

    /// Resolves as misses every object in the column whose window has fully
    /// elapsed before `now_ms`.
    ///
    /// Covers three cases: a pending tap past its miss boundary, a pending
    /// hold head past its boundary (which forfeits the tail, two misses),
    /// and an active hold held past its tail boundary. Returns the emitted
    /// judgements with the expected time they were due at.
    pub fn expire_up_to(
        &mut self,
        column: usize,
        now_ms: f64,
        window: &HitWindow,
    ) -> Vec<(i32, Judgement)> {
        let lane = &mut self.lanes[column];
        let mut events = Vec::new();

        while let Some(slot) = lane.slots.get_mut(lane.cursor) {
            match slot.hold {
                None => {
                    if now_ms > slot.object.time_ms as f64 + window.bad_ms {
                        slot.resolved = true;
                        self.remaining -= 1;
                        lane.cursor += 1;
                        events.push((slot.object.time_ms, Judgement::Miss));
                    } else {
                        break;
                    }
                }
                Some(HoldState::Idle) => {
                    if now_ms > slot.object.time_ms as f64 + window.bad_ms {
                        slot.hold = Some(HoldState::MissedHold);
                        slot.resolved = true;
                        self.remaining -= 1;
                        lane.cursor += 1;
                        // A missed head forfeits the tail: two miss events.
                        events.push((slot.object.time_ms, Judgement::Miss));
                        events.push((slot.object.time_ms, Judgement::Miss));
                    } else {
                        break;
                    }
                }
                Some(HoldState::Active) => {
                    if now_ms > slot.object.end_ms() as f64 + window.bad_ms {
                        slot.hold = Some(HoldState::MissedHold);
                        slot.resolved = true;
                        self.remaining -= 1;
                        lane.cursor += 1;
                        events.push((slot.object.end_ms(), Judgement::Miss));
                    } else {
                        // The lane stays blocked on the live hold.
                        break;
                    }
                }
                Some(HoldState::Released) | Some(HoldState::MissedHold) => {
                    lane.cursor += 1;
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::NoteKind;

    fn tap(time_ms: i32, column: usize) -> HitObject {
        HitObject {
            time_ms,
            column,
            kind: NoteKind::Tap,
        }
    }

    fn hold(time_ms: i32, end_ms: i32, column: usize) -> HitObject {
        HitObject {
            time_ms,
            column,
            kind: NoteKind::Hold { end_ms },
        }
    }

    fn chart(key_count: usize, objects: Vec<HitObject>) -> Chart {
        let total_hit_objects = objects.iter().map(|o| o.judged_events()).sum();
        Chart {
            objects,
            key_count,
            total_hit_objects,
            hash: String::new(),
            title: String::new(),
            artist: String::new(),
            version: String::new(),
            audio_file: String::new(),
        }
    }

    fn window() -> HitWindow {
        HitWindow::from_osu_od(5.0) // bad band 136ms
    }

    #[test]
    fn next_unresolved_is_the_earliest_in_the_lane() {
        let chart = chart(2, vec![tap(1000, 0), tap(1200, 1), tap(2000, 0)]);
        let timeline = HitTimeline::new(&chart);

        let (index, slot) = timeline.next_unresolved(0).unwrap();
        assert_eq!(index, 0);
        assert_eq!(slot.object.time_ms, 1000);

        let (_, slot) = timeline.next_unresolved(1).unwrap();
        assert_eq!(slot.object.time_ms, 1200);
    }

    #[test]
    fn resolving_a_tap_advances_the_cursor() {
        let chart = chart(1, vec![tap(1000, 0), tap(2000, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        timeline.resolve_tap(0, 0);
        assert_eq!(timeline.remaining(), 1);

        let (index, slot) = timeline.next_unresolved(0).unwrap();
        assert_eq!(index, 1);
        assert_eq!(slot.object.time_ms, 2000);
    }

    #[test]
    #[should_panic(expected = "earliest unresolved")]
    fn double_resolution_is_fatal() {
        let chart = chart(1, vec![tap(1000, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        timeline.resolve_tap(0, 0);
        // The cursor has moved past the slot, so the stale index is rejected.
        timeline.resolve_tap(0, 0);
    }

    #[test]
    fn tap_past_its_miss_boundary_expires() {
        let chart = chart(1, vec![tap(1000, 0), tap(5000, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        // 1000 + 136 = 1136; not yet elapsed at 1136.0 exactly.
        assert!(timeline.expire_up_to(0, 1136.0, &window()).is_empty());

        let events = timeline.expire_up_to(0, 1137.0, &window());
        assert_eq!(events, vec![(1000, Judgement::Miss)]);
        assert_eq!(timeline.remaining(), 1);

        let (_, slot) = timeline.next_unresolved(0).unwrap();
        assert_eq!(slot.object.time_ms, 5000);
    }

    #[test]
    fn missed_hold_head_forfeits_the_tail() {
        let chart = chart(1, vec![hold(1000, 2000, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        let events = timeline.expire_up_to(0, 1200.0, &window());
        assert_eq!(
            events,
            vec![(1000, Judgement::Miss), (1000, Judgement::Miss)]
        );
        assert!(timeline.all_resolved());
    }

    #[test]
    fn active_hold_blocks_the_lane_until_its_tail_boundary() {
        let chart = chart(1, vec![hold(1000, 2000, 0), tap(2500, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        timeline.begin_hold(0, 0);

        // Mid-hold: nothing expires, the hold still owns the lane.
        assert!(timeline.expire_up_to(0, 1800.0, &window()).is_empty());
        let (index, slot) = timeline.next_unresolved(0).unwrap();
        assert_eq!(index, 0);
        assert!(slot.is_active_hold());

        // Held past 2000 + 136: the tail is forced to a miss.
        let events = timeline.expire_up_to(0, 2137.0, &window());
        assert_eq!(events, vec![(2000, Judgement::Miss)]);

        let (_, slot) = timeline.next_unresolved(0).unwrap();
        assert_eq!(slot.object.time_ms, 2500);
        assert_eq!(timeline.remaining(), 1);
    }

    #[test]
    fn finished_hold_records_its_terminal_state() {
        let chart = chart(1, vec![hold(1000, 2000, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        timeline.begin_hold(0, 0);
        timeline.finish_hold(0, 0, HoldState::Released);

        assert!(timeline.all_resolved());
        assert!(timeline.next_unresolved(0).is_none());
    }

    #[test]
    #[should_panic(expected = "head judged twice")]
    fn reactivating_a_hold_is_fatal() {
        let chart = chart(1, vec![hold(1000, 2000, 0)]);
        let mut timeline = HitTimeline::new(&chart);

        timeline.begin_hold(0, 0);
        timeline.begin_hold(0, 0);
    }
}
