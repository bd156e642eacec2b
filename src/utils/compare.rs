use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Team A / Team B cells of one spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPair {
    pub team_a: String,
    pub team_b: String,
}

impl TeamPair {
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
        }
    }
}

/// Old and new values side by side, with per-column difference flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDiff {
    #[serde(rename = "TEAM A_OLD")]
    pub team_a_old: String,
    #[serde(rename = "TEAM B_OLD")]
    pub team_b_old: String,
    #[serde(rename = "TEAM A_NEW")]
    pub team_a_new: String,
    #[serde(rename = "TEAM B_NEW")]
    pub team_b_new: String,
    #[serde(rename = "TEAM A_DIFF")]
    pub team_a_differs: bool,
    #[serde(rename = "TEAM B_DIFF")]
    pub team_b_differs: bool,
}

impl RowDiff {
    pub fn differs(&self) -> bool {
        self.team_a_differs || self.team_b_differs
    }
}

/// Row-by-row comparison. The shorter list is padded with empty cells and
/// values are compared after trimming.
pub fn compare_team_lists(old: &[TeamPair], new: &[TeamPair]) -> Vec<RowDiff> {
    let empty = TeamPair::default();
    let rows = old.len().max(new.len());

    (0..rows)
        .map(|i| {
            let o = old.get(i).unwrap_or(&empty);
            let n = new.get(i).unwrap_or(&empty);
            RowDiff {
                team_a_differs: o.team_a.trim() != n.team_a.trim(),
                team_b_differs: o.team_b.trim() != n.team_b.trim(),
                team_a_old: o.team_a.clone(),
                team_b_old: o.team_b.clone(),
                team_a_new: n.team_a.clone(),
                team_b_new: n.team_b.clone(),
            }
        })
        .collect()
}

/// First two columns of a header-less CSV file
pub fn read_team_pairs(path: impl AsRef<Path>) -> Result<Vec<TeamPair>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read row in {}", path.display()))?;
        pairs.push(TeamPair::new(
            record.get(0).unwrap_or_default(),
            record.get(1).unwrap_or_default(),
        ));
    }
    Ok(pairs)
}

pub fn save_diff_to_csv(diff: &[RowDiff], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    for row in diff {
        writer.serialize(row).context("Failed to write diff row")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_after_trim() {
        let old = vec![TeamPair::new("DUKE ", "UNC")];
        let new = vec![TeamPair::new("DUKE", " UNC")];
        let diff = compare_team_lists(&old, &new);
        assert_eq!(diff.len(), 1);
        assert!(!diff[0].differs());
    }

    #[test]
    fn test_changed_column_is_flagged_alone() {
        let old = vec![TeamPair::new("DUKE", "UNC"), TeamPair::new("KANSAS", "KENTUCKY")];
        let new = vec![TeamPair::new("DUKE", "UNC"), TeamPair::new("KANSAS", "BAYLOR")];
        let diff = compare_team_lists(&old, &new);
        assert!(!diff[0].differs());
        assert!(!diff[1].team_a_differs);
        assert!(diff[1].team_b_differs);
    }

    #[test]
    fn test_shorter_side_is_padded() {
        let old = vec![TeamPair::new("A", "B")];
        let new = vec![TeamPair::new("A", "B"), TeamPair::new("C", "D")];
        let diff = compare_team_lists(&old, &new);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[1].team_a_old, "");
        assert!(diff[1].team_a_differs && diff[1].team_b_differs);
    }

    #[test]
    fn test_read_and_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let old_path = dir.path().join("old.csv");
        let new_path = dir.path().join("new.csv");
        let out_path = dir.path().join("diff.csv");
        std::fs::write(&old_path, "DUKE,UNC,extra\nKANSAS\n").unwrap();
        std::fs::write(&new_path, "DUKE,UNC\nKANSAS,BAYLOR\n").unwrap();

        let old = read_team_pairs(&old_path).unwrap();
        let new = read_team_pairs(&new_path).unwrap();
        assert_eq!(old[1], TeamPair::new("KANSAS", ""));

        let diff = compare_team_lists(&old, &new);
        save_diff_to_csv(&diff, &out_path).unwrap();

        let text = std::fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "TEAM A_OLD,TEAM B_OLD,TEAM A_NEW,TEAM B_NEW,TEAM A_DIFF,TEAM B_DIFF"
        );
        assert_eq!(lines[2], "KANSAS,,KANSAS,BAYLOR,false,true");
    }
}
