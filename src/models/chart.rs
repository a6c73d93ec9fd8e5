//! Chart data structures and `.osu` loading.
//!
//! Decoding of the raw `.osu` text is delegated to `rosu-map`, which
//! tolerates unknown sections and fields. The validation pass here turns
//! the decoded beatmap into an immutable [`Chart`] or rejects it; a chart
//! that parses is safe to play without further checks.

use rosu_map::section::general::GameMode;
use rosu_map::section::hit_objects::HitObjectKind;
use std::fmt;
use std::fs;
use std::path::Path;

/// Kind of a hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// Simple tap note - press within the window.
    Tap,
    /// Hold/long note - press at the head, release near `end_ms`.
    Hold {
        /// When the hold ends (in ms). Always after the start time.
        end_ms: i32,
    },
}

/// A single immutable hit object in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitObject {
    /// When the object should be hit (chart-relative ms).
    pub time_ms: i32,
    /// Which column/lane (0-indexed, < key count).
    pub column: usize,
    /// Tap or hold.
    pub kind: NoteKind,
}

impl HitObject {
    /// Returns true if this is a hold note.
    pub fn is_hold(&self) -> bool {
        matches!(self.kind, NoteKind::Hold { .. })
    }

    /// Returns the end time: the tail for holds, the hit time for taps.
    pub fn end_ms(&self) -> i32 {
        match self.kind {
            NoteKind::Tap => self.time_ms,
            NoteKind::Hold { end_ms } => end_ms,
        }
    }

    /// Number of judgement events this object produces (2 for holds).
    pub fn judged_events(&self) -> u32 {
        if self.is_hold() { 2 } else { 1 }
    }
}

/// A parsed, validated chart. Read-only for the rest of a play session.
#[derive(Debug, Clone)]
pub struct Chart {
    /// All hit objects, sorted by time (ties keep file order).
    pub objects: Vec<HitObject>,
    /// Number of columns (1-10).
    pub key_count: usize,
    /// Scoring denominator: taps count once, holds count head and tail.
    pub total_hit_objects: u32,
    /// md5 of the raw document, used as chart identity.
    pub hash: String,
    pub title: String,
    pub artist: String,
    /// Difficulty name.
    pub version: String,
    /// Audio file referenced by the chart, relative to its folder.
    pub audio_file: String,
}

impl Chart {
    /// Time of the last judgement event in the chart (tail-aware).
    pub fn last_event_ms(&self) -> i32 {
        self.objects.iter().map(|o| o.end_ms()).max().unwrap_or(0)
    }
}

/// Error type for chart parsing failures.
#[derive(Debug)]
pub enum ChartError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The document could not be decoded as a beatmap.
    Decode(String),
    /// The chart is not an osu!mania map.
    UnsupportedMode(String),
    /// The key count is outside the playable 1-10 range.
    InvalidKeyCount(usize),
    /// A hit object maps outside the chart's columns.
    InvalidColumn { time_ms: i32, x: f32 },
    /// Hit objects out of chronological order.
    UnorderedObjects { time_ms: i32 },
    /// A hold whose end does not come after its start.
    DegenerateHold { time_ms: i32 },
    /// Two tap objects sharing the same time and column.
    DuplicateObject { time_ms: i32, column: usize },
    /// The chart has no playable objects.
    EmptyChart,
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Io(e) => write!(f, "Failed to read chart: {}", e),
            ChartError::Decode(msg) => write!(f, "Failed to decode chart: {}", msg),
            ChartError::UnsupportedMode(mode) => {
                write!(f, "Not an osu!mania chart (mode {})", mode)
            }
            ChartError::InvalidKeyCount(kc) => write!(f, "Unplayable key count: {}", kc),
            ChartError::InvalidColumn { time_ms, x } => {
                write!(f, "Object at {}ms maps outside the columns (x={})", time_ms, x)
            }
            ChartError::UnorderedObjects { time_ms } => {
                write!(f, "Object at {}ms is earlier than its predecessor", time_ms)
            }
            ChartError::DegenerateHold { time_ms } => {
                write!(f, "Hold at {}ms ends at or before its start", time_ms)
            }
            ChartError::DuplicateObject { time_ms, column } => {
                write!(f, "Two taps at {}ms in column {}", time_ms, column)
            }
            ChartError::EmptyChart => write!(f, "Chart has no hit objects"),
        }
    }
}

impl std::error::Error for ChartError {}

/// Loads and validates a chart from a `.osu` file.
pub fn load_chart(path: &Path) -> Result<Chart, ChartError> {
    let data = fs::read(path).map_err(ChartError::Io)?;
    parse_chart(&data)
}

/// Parses and validates a chart from a raw `.osu` document.
///
/// Pure: the same document always yields an identical chart, including its
/// hash. No partial chart is ever returned.
pub fn parse_chart(doc: &[u8]) -> Result<Chart, ChartError> {
    let map = rosu_map::Beatmap::from_bytes(doc)
        .map_err(|e| ChartError::Decode(e.to_string()))?;

    if map.mode != GameMode::Mania {
        return Err(ChartError::UnsupportedMode(format!("{:?}", map.mode)));
    }

    let key_count = map.circle_size as usize;
    if !(1..=10).contains(&key_count) {
        return Err(ChartError::InvalidKeyCount(key_count));
    }

    check_time_order(doc)?;

    let mut objects: Vec<HitObject> = Vec::with_capacity(map.hit_objects.len());
    let mut total_hit_objects: u32 = 0;
    let mut last_tap_in_column = vec![i32::MIN; key_count];

    for hit_object in &map.hit_objects {
        let (x, duration) = match &hit_object.kind {
            HitObjectKind::Circle(circle) => (circle.pos.x, None),
            HitObjectKind::Hold(hold) => (hold.pos_x, Some(hold.duration)),
            // Sliders/spinners from converted maps carry no mania timing.
            _ => continue,
        };

        let time_ms = hit_object.start_time.round() as i32;

        let column = x_to_column(x, key_count)
            .ok_or(ChartError::InvalidColumn { time_ms, x })?;

        let kind = match duration {
            Some(duration_ms) => {
                let end_ms = time_ms + duration_ms.round() as i32;
                if end_ms <= time_ms {
                    return Err(ChartError::DegenerateHold { time_ms });
                }
                NoteKind::Hold { end_ms }
            }
            None => {
                if last_tap_in_column[column] == time_ms {
                    return Err(ChartError::DuplicateObject { time_ms, column });
                }
                last_tap_in_column[column] = time_ms;
                NoteKind::Tap
            }
        };

        let object = HitObject {
            time_ms,
            column,
            kind,
        };
        total_hit_objects += object.judged_events();
        objects.push(object);
    }

    // Also guards the scoring denominator against division by zero.
    if objects.is_empty() {
        return Err(ChartError::EmptyChart);
    }

    Ok(Chart {
        objects,
        key_count,
        total_hit_objects,
        hash: format!("{:x}", md5::compute(doc)),
        title: map.title,
        artist: map.artist,
        version: map.version,
        audio_file: map.audio_file,
    })
}

/// Verifies the raw `[HitObjects]` listing is nondecreasing in time.
///
/// The decoder sorts hit objects while reading, so an out-of-order
/// document would come back normalized instead of rejected here.
fn check_time_order(doc: &[u8]) -> Result<(), ChartError> {
    let text = String::from_utf8_lossy(doc);
    let mut in_section = false;
    let mut last_time = f64::NEG_INFINITY;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_section = line == "[HitObjects]";
            continue;
        }
        if !in_section || line.is_empty() {
            continue;
        }
        // x,y,time,type,... - the third field is the start time.
        let Some(time) = line
            .split(',')
            .nth(2)
            .and_then(|field| field.trim().parse::<f64>().ok())
        else {
            continue;
        };
        if time < last_time {
            return Err(ChartError::UnorderedObjects {
                time_ms: time.round() as i32,
            });
        }
        last_time = time;
    }

    Ok(())
}

/// Converts an osu!mania x position into a column index over the 512-wide
/// playfield grid. Returns `None` when the position lies outside the grid.
fn x_to_column(x: f32, key_count: usize) -> Option<usize> {
    let column_width = 512.0 / key_count as f32;
    let col = (x / column_width).floor();
    if col < 0.0 || col >= key_count as f32 {
        None
    } else {
        Some(col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mania_doc(hit_objects: &str) -> Vec<u8> {
        format!(
            "osu file format v14\n\n\
             [General]\nAudioFilename: audio.mp3\nMode: 3\n\n\
             [Metadata]\nTitle:Test Song\nArtist:Test Artist\nVersion:4K Normal\n\n\
             [Difficulty]\nCircleSize:4\nOverallDifficulty:8\n\n\
             [HitObjects]\n{}",
            hit_objects
        )
        .into_bytes()
    }

    #[test]
    fn parses_well_formed_4k_chart() {
        let doc = mania_doc(
            "64,192,1000,1,0,0:0:0:0:\n\
             192,192,1500,1,0,0:0:0:0:\n\
             320,192,2000,128,0,2500:0:0:0:0:\n\
             448,192,2000,1,0,0:0:0:0:\n",
        );
        let chart = parse_chart(&doc).unwrap();

        assert_eq!(chart.key_count, 4);
        assert_eq!(chart.objects.len(), 4);
        // Holds count head and tail in the scoring denominator.
        assert_eq!(chart.total_hit_objects, 5);
        assert_eq!(chart.title, "Test Song");
        assert_eq!(chart.version, "4K Normal");
        assert_eq!(chart.audio_file, "audio.mp3");

        assert_eq!(chart.objects[0].column, 0);
        assert_eq!(chart.objects[1].column, 1);
        assert_eq!(chart.objects[2].kind, NoteKind::Hold { end_ms: 2500 });
        assert_eq!(chart.objects[2].end_ms(), 2500);
        assert_eq!(chart.objects[3].column, 3);
        assert_eq!(chart.last_event_ms(), 2500);
    }

    #[test]
    fn parsing_is_deterministic() {
        let doc = mania_doc("64,192,1000,1,0,0:0:0:0:\n");
        let a = parse_chart(&doc).unwrap();
        let b = parse_chart(&doc).unwrap();
        assert_eq!(a.objects, b.objects);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn duplicate_tap_is_rejected() {
        let doc = mania_doc(
            "64,192,1000,1,0,0:0:0:0:\n\
             64,192,1000,1,0,0:0:0:0:\n",
        );
        let err = parse_chart(&doc).unwrap_err();
        assert!(matches!(
            err,
            ChartError::DuplicateObject {
                time_ms: 1000,
                column: 0
            }
        ));
    }

    #[test]
    fn chord_at_same_time_is_allowed() {
        let doc = mania_doc(
            "64,192,1000,1,0,0:0:0:0:\n\
             192,192,1000,1,0,0:0:0:0:\n\
             320,192,1000,1,0,0:0:0:0:\n",
        );
        let chart = parse_chart(&doc).unwrap();
        assert_eq!(chart.objects.len(), 3);
    }

    #[test]
    fn unordered_objects_are_rejected() {
        let doc = mania_doc(
            "64,192,2000,1,0,0:0:0:0:\n\
             192,192,1000,1,0,0:0:0:0:\n",
        );
        let err = parse_chart(&doc).unwrap_err();
        assert!(matches!(err, ChartError::UnorderedObjects { time_ms: 1000 }));
    }

    #[test]
    fn unordered_hold_is_rejected() {
        // The decoder would hand these back time-sorted; the raw listing
        // is what has to be in order.
        let doc = mania_doc(
            "64,192,3000,1,0,0:0:0:0:\n\
             320,192,1500,128,0,2500:0:0:0:0:\n",
        );
        let err = parse_chart(&doc).unwrap_err();
        assert!(matches!(err, ChartError::UnorderedObjects { time_ms: 1500 }));
    }

    #[test]
    fn degenerate_hold_is_rejected() {
        let doc = mania_doc("64,192,2000,128,0,2000:0:0:0:0:\n");
        let err = parse_chart(&doc).unwrap_err();
        assert!(matches!(err, ChartError::DegenerateHold { time_ms: 2000 }));
    }

    #[test]
    fn empty_chart_is_rejected() {
        let doc = mania_doc("");
        let err = parse_chart(&doc).unwrap_err();
        assert!(matches!(err, ChartError::EmptyChart));
    }

    #[test]
    fn non_mania_mode_is_rejected() {
        let doc = "osu file format v14\n\n\
             [General]\nAudioFilename: audio.mp3\nMode: 0\n\n\
             [Difficulty]\nCircleSize:4\n\n\
             [HitObjects]\n64,192,1000,1,0,0:0:0:0:\n"
            .as_bytes();
        let err = parse_chart(doc).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedMode(_)));
    }

    #[test]
    fn out_of_grid_column_is_rejected() {
        // x = 600 lies right of the 512-wide playfield.
        let doc = mania_doc("600,192,1000,1,0,0:0:0:0:\n");
        let err = parse_chart(&doc).unwrap_err();
        assert!(matches!(err, ChartError::InvalidColumn { time_ms: 1000, .. }));
    }

    #[test]
    fn column_mapping_covers_the_grid() {
        assert_eq!(x_to_column(64.0, 4), Some(0));
        assert_eq!(x_to_column(192.0, 4), Some(1));
        assert_eq!(x_to_column(320.0, 4), Some(2));
        assert_eq!(x_to_column(448.0, 4), Some(3));
        assert_eq!(x_to_column(36.0, 7), Some(0));
        assert_eq!(x_to_column(256.0, 7), Some(3));
        assert_eq!(x_to_column(475.0, 7), Some(6));
        assert_eq!(x_to_column(512.0, 4), None);
        assert_eq!(x_to_column(-1.0, 4), None);
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let doc = "osu file format v14\n\n\
             [General]\nAudioFilename: audio.mp3\nMode: 3\n\n\
             [Difficulty]\nCircleSize:4\n\n\
             [Colours]\nCombo1 : 255,0,0\n\n\
             [HitObjects]\n64,192,1000,1,0,0:0:0:0:\n"
            .as_bytes();
        let chart = parse_chart(doc).unwrap();
        assert_eq!(chart.objects.len(), 1);
    }
}
