//! Catalog search request and response models.
//!
//! Mirrors the osu! v2 beatmapset search surface: most filters collapse
//! into the free-text `q` parameter, the rest travel as short query keys.

use serde::{Deserialize, Serialize};

/// Ranked-status shelf to search in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// Every shelf, including graveyarded sets.
    Any,
    /// Sets with a leaderboard. The server default, omitted on the wire.
    #[default]
    HasLeaderboard,
    Ranked,
    Qualified,
    Loved,
    Favourites,
    Pending,
    Wip,
    Graveyard,
    Mine,
}

impl Category {
    /// Wire value for the `s` parameter, `None` for the server default.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Category::HasLeaderboard => None,
            Category::Any => Some("any"),
            Category::Ranked => Some("ranked"),
            Category::Qualified => Some("qualified"),
            Category::Loved => Some("loved"),
            Category::Favourites => Some("favourites"),
            Category::Pending => Some("pending"),
            Category::Wip => Some("wip"),
            Category::Graveyard => Some("graveyard"),
            Category::Mine => Some("mine"),
        }
    }
}

/// Result ordering criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriteria {
    Title,
    Artist,
    Difficulty,
    #[default]
    Ranked,
    Rating,
    Plays,
    Favourites,
}

impl SortCriteria {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriteria::Title => "title",
            SortCriteria::Artist => "artist",
            SortCriteria::Difficulty => "difficulty",
            SortCriteria::Ranked => "ranked",
            SortCriteria::Rating => "rating",
            SortCriteria::Plays => "plays",
            SortCriteria::Favourites => "favourites",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Star-rating range filter, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRange {
    pub min: f64,
    pub max: f64,
}

/// All the knobs of one catalog search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub category: Category,
    pub sort_criteria: SortCriteria,
    pub sort_direction: SortDirection,
    /// Key counts to include, each adding a `key=N` term to `q`.
    pub keys: Vec<u8>,
    pub stars: Option<StarRange>,
    pub nsfw: bool,
    /// Raw osu! genre id for the `g` parameter; 0 means unfiltered.
    pub genre: Option<u8>,
    /// Raw osu! language id for the `l` parameter.
    pub language: Option<u8>,
    /// Opaque cursor returned with the previous page.
    pub cursor: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: Category::default(),
            sort_criteria: SortCriteria::default(),
            sort_direction: SortDirection::default(),
            keys: Vec::new(),
            stars: None,
            // The upstream default shows everything.
            nsfw: true,
            genre: None,
            language: None,
            cursor: None,
        }
    }
}

impl SearchRequest {
    /// The free-text `q` parameter: query text plus key and star terms.
    pub fn q(&self) -> String {
        let mut terms: Vec<String> = Vec::new();
        if !self.query.trim().is_empty() {
            terms.push(self.query.trim().to_string());
        }
        for key in &self.keys {
            terms.push(format!("key={}", key));
        }
        if let Some(range) = self.stars {
            terms.push(format!("stars>={} stars<={}", range.min, range.max));
        }
        terms.join(" ")
    }

    /// The `sort` parameter, criteria and direction joined.
    pub fn sort_param(&self) -> String {
        format!(
            "{}_{}",
            self.sort_criteria.as_str(),
            self.sort_direction.as_str()
        )
    }

    /// Genre filter for the wire; 0 and `None` both mean unfiltered.
    pub fn genre_param(&self) -> Option<u8> {
        self.genre.filter(|&g| g != 0)
    }
}

/// Cover art URLs for a chart set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Covers {
    pub cover: String,
    #[serde(rename = "cover@2x")]
    pub cover_2x: String,
    pub card: String,
    #[serde(rename = "card@2x")]
    pub card_2x: String,
    pub list: String,
    #[serde(rename = "list@2x")]
    pub list_2x: String,
    pub slimcover: String,
    #[serde(rename = "slimcover@2x")]
    pub slimcover_2x: String,
}

/// Ruleset a difficulty belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    Fruits,
    Mania,
    Osu,
    Taiko,
}

/// One difficulty inside a chart set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapSummary {
    pub id: u64,
    pub beatmapset_id: u64,
    pub difficulty_rating: f64,
    pub mode: Ruleset,
    pub status: String,
    /// Length in seconds.
    pub total_length: u32,
    pub user_id: u64,
    /// Difficulty name.
    pub version: String,
    /// Circle size, which is the key count for mania difficulties.
    pub cs: f32,
}

impl BeatmapSummary {
    pub fn key_count(&self) -> usize {
        self.cs.round() as usize
    }
}

/// A chart set as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapSet {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub creator: String,
    pub status: String,
    pub nsfw: bool,
    pub favourite_count: u64,
    pub play_count: u64,
    pub preview_url: String,
    pub source: String,
    pub covers: Covers,
    /// Difficulties, present when the search asked for them.
    #[serde(default)]
    pub beatmaps: Vec<BeatmapSummary>,
}

impl BeatmapSet {
    /// The set's mania difficulties, in listing order.
    pub fn mania_difficulties(&self) -> impl Iterator<Item = &BeatmapSummary> {
        self.beatmaps.iter().filter(|b| b.mode == Ruleset::Mania)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    pub beatmapsets: Vec<BeatmapSet>,
    /// Total matches server-side, across all pages.
    pub total: u64,
    /// Cursor for the next page; `None` on the last page.
    pub cursor_string: Option<String>,
}
