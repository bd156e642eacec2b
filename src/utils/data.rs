use crate::collector::Checkpoint;
use crate::models::CanonicalFixture;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// One CSV row per fixture, with spreadsheet-style headers
#[derive(Debug, Serialize)]
struct FixtureRow<'a> {
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "KO Time (Local)")]
    ko_time_local: &'a str,
    #[serde(rename = "KO Time (Display)")]
    ko_time_display: &'a str,
    #[serde(rename = "Competition")]
    competition: &'a str,
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Home Team")]
    home_team: &'a str,
    #[serde(rename = "Away Team")]
    away_team: &'a str,
    #[serde(rename = "Home Score")]
    home_score: Option<u32>,
    #[serde(rename = "Away Score")]
    away_score: Option<u32>,
    #[serde(rename = "Status")]
    status: &'a str,
    #[serde(rename = "Venue")]
    venue: &'a str,
    #[serde(rename = "Game Key")]
    game_key: &'a str,
    #[serde(rename = "Is Duplicate")]
    is_duplicate: bool,
}

impl<'a> From<&'a CanonicalFixture> for FixtureRow<'a> {
    fn from(f: &'a CanonicalFixture) -> Self {
        Self {
            date: &f.date,
            ko_time_local: f.ko_time_local.as_deref().unwrap_or(""),
            ko_time_display: &f.ko_time_display,
            competition: &f.competition,
            group: &f.group,
            home_team: &f.home_team,
            away_team: &f.away_team,
            home_score: f.home_score,
            away_score: f.away_score,
            status: &f.status,
            venue: f.venue.as_deref().unwrap_or(""),
            game_key: &f.natural_key,
            is_duplicate: f.is_duplicate,
        }
    }
}

/// Write fixtures to CSV with a header row
pub fn save_fixtures_to_csv<'a>(
    fixtures: impl IntoIterator<Item = &'a CanonicalFixture>,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    let mut rows = 0;
    for fixture in fixtures {
        writer
            .serialize(FixtureRow::from(fixture))
            .context("Failed to write fixture row")?;
        rows += 1;
    }
    writer.flush().context("Failed to flush CSV file")?;

    Ok(rows)
}

/// Save a resume checkpoint as JSON
pub fn save_checkpoint(checkpoint: &Checkpoint, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(checkpoint).context("Failed to serialize checkpoint")?;
    std::fs::write(path.as_ref(), json).context("Failed to write checkpoint file")?;
    Ok(())
}

/// Load a checkpoint; a missing file is `None`
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<Option<Checkpoint>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).context("Failed to read checkpoint file")?;
    let checkpoint: Checkpoint =
        serde_json::from_str(&json).context("Failed to deserialize checkpoint")?;
    Ok(Some(checkpoint))
}
