use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A competition the collector can be pointed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub name: String,
    pub api_path: String, // e.g. "basketball/mens-college-basketball"
}

impl Competition {
    pub fn new(name: impl Into<String>, api_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_path: api_path.into(),
        }
    }

    /// Sport slug used by the schedule pages, e.g. "mens-college-basketball"
    pub fn slug(&self) -> &str {
        self.api_path
            .rsplit_once('/')
            .map(|(_, slug)| slug)
            .unwrap_or(&self.api_path)
    }

    pub fn mens_basketball() -> Self {
        Self::new("Men's NCAA Basketball", "basketball/mens-college-basketball")
    }

    pub fn womens_basketball() -> Self {
        Self::new(
            "Women's NCAA Basketball",
            "basketball/womens-college-basketball",
        )
    }
}

/// A logical group within a competition (conference, division, or a sport slug
/// for sources that list a whole day at once)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub id: String,
}

impl Group {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

/// Conference label and ESPN group id, in display order.
/// Big East and Atlantic 10 share id 3 upstream; games in that group come back
/// twice and get flagged by the deduplicator.
pub const CONFERENCES: &[(&str, u32)] = &[
    ("ACC", 2),
    ("Big Ten", 7),
    ("SEC", 8),
    ("Big 12", 4),
    ("Pac-12", 21),
    ("Big East", 3),
    ("AAC", 62),
    ("Mountain West", 46),
    ("Atlantic 10", 3),
    ("WCC", 26),
    ("Sun Belt", 27),
    ("MAAC", 5),
    ("Horizon", 24),
    ("Ivy League", 12),
    ("Patriot League", 31),
    ("America East", 1),
    ("MEAC", 16),
    ("SWAC", 23),
    ("ASUN", 55),
    ("Missouri Valley", 9),
    ("CAA", 10),
    ("Ohio Valley", 14),
    ("Summit League", 44),
];

pub fn conference_groups() -> Vec<Group> {
    CONFERENCES
        .iter()
        .map(|(label, id)| Group::new(*label, id.to_string()))
        .collect()
}

pub fn find_conference(label: &str) -> Option<Group> {
    let wanted = label.trim();
    CONFERENCES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(name, id)| Group::new(*name, id.to_string()))
}

/// One (day, group) step of a collection plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub day: NaiveDate,
    pub group: Group,
}

impl Unit {
    /// Stable string form, used as the checkpoint key
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.day.format("%Y%m%d"), self.group.label, self.group.id)
    }
}

/// A fixture as one upstream source reported it. Fields may be partially populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFixture {
    pub home_team: String,
    pub away_team: String,
    pub time_text: String, // clock time in the source zone, or a status marker
    pub status: String,
    pub home_score: Option<String>,
    pub away_score: Option<String>,
    pub detail_ref: Option<String>, // link to the game page, if any
    pub venue: Option<String>,
}

/// Request context a raw fixture is normalized against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureContext {
    pub day: NaiveDate,
    pub competition: String,
    pub group: String,
}

/// Normalized, display-ready fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFixture {
    pub date: String,
    pub ko_time_local: Option<String>,
    pub ko_time_display: String,
    pub competition: String,
    pub group: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: String,
    pub venue: Option<String>,
    pub natural_key: String,
    pub is_duplicate: bool,
}

/// Deduplication key. Kickoff time is not part of it, so a doubleheader between
/// the same two teams on one day is flagged as a duplicate.
pub fn natural_key(date: &str, home_team: &str, away_team: &str) -> String {
    format!("{}_{}_{}", date, home_team, away_team)
}
