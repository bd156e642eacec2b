use crate::config::CollectorConfig;
use crate::models::{natural_key, CanonicalFixture, FixtureContext, RawFixture};
use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Status words that never parse as a kickoff time
const NON_TIME_MARKERS: &[&str] = &["final", "tbd", "tba", "post", "ppd", "canc", "susp", "live"];

/// Statuses of a game that has no kickoff to show, whatever the time text says
const UNSCHEDULED_MARKERS: &[&str] = &["postpone", "ppd", "canc", "susp", "tbd", "tba"];

const DATE_FORMAT: &str = "%d-%m-%Y";
const CLOCK_FORMAT: &str = "%I:%M %p";
const SOURCE_PATTERN: &str = "%Y%m%d %I:%M %p";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Turns raw source rows into canonical fixtures. Holds the zone pair
/// explicitly so conversion is a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    source_tz: Tz,
    display_tz: Tz,
}

impl Normalizer {
    pub fn new(source_tz: Tz, display_tz: Tz) -> Self {
        Self {
            source_tz,
            display_tz,
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(config.source_tz, config.display_tz)
    }

    pub fn normalize(&self, raw: &RawFixture, ctx: &FixtureContext) -> CanonicalFixture {
        let date = ctx.day.format(DATE_FORMAT).to_string();
        let home_team = canonical_team(&raw.home_team);
        let away_team = canonical_team(&raw.away_team);
        let natural_key = natural_key(&date, &home_team, &away_team);

        let status = raw.status.trim().to_string();
        let unscheduled = is_unscheduled(&status);

        let local = if unscheduled {
            None
        } else {
            self.parse_local(ctx.day, &raw.time_text)
        };
        let ko_time_local = local.map(|dt| dt.format(CLOCK_FORMAT).to_string());
        let ko_time_display = match local {
            Some(dt) => self
                .to_display(dt)
                .unwrap_or_else(|| raw.time_text.clone()),
            None if unscheduled => status.clone(),
            None => raw.time_text.clone(),
        };

        CanonicalFixture {
            date,
            ko_time_local,
            ko_time_display,
            competition: ctx.competition.clone(),
            group: ctx.group.clone(),
            home_team,
            away_team,
            home_score: raw.home_score.as_deref().and_then(parse_score),
            away_score: raw.away_score.as_deref().and_then(parse_score),
            status,
            venue: raw
                .venue
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            natural_key,
            is_duplicate: false,
        }
    }

    /// Converts `day` + `time_text` from the source zone to the display zone.
    /// Anything that is not a clock time comes back unchanged.
    pub fn convert_time(&self, day: NaiveDate, time_text: &str) -> String {
        self.parse_local(day, time_text)
            .and_then(|dt| self.to_display(dt))
            .unwrap_or_else(|| time_text.to_string())
    }

    fn parse_local(&self, day: NaiveDate, time_text: &str) -> Option<NaiveDateTime> {
        let text = time_text.trim();
        if text.is_empty() || is_status_marker(text) {
            return None;
        }

        let stamp = format!("{} {}", day.format("%Y%m%d"), text);
        NaiveDateTime::parse_from_str(&stamp, SOURCE_PATTERN).ok()
    }

    fn to_display(&self, local: NaiveDateTime) -> Option<String> {
        // Falls in a DST gap when None; ambiguous times take the earlier offset.
        let source = self.source_tz.from_local_datetime(&local).earliest()?;
        Some(
            source
                .with_timezone(&self.display_tz)
                .format(DISPLAY_FORMAT)
                .to_string(),
        )
    }
}

fn is_status_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    NON_TIME_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn is_unscheduled(status: &str) -> bool {
    let lower = status.to_lowercase();
    UNSCHEDULED_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Trim, collapse inner whitespace, uppercase
pub fn canonical_team(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn parse_score(score: &str) -> Option<u32> {
    score.trim().parse().ok()
}

/// Renders a UTC ISO kickoff (as the scoreboard API reports it) as a clock
/// time in `tz`. Accepts both `2024-11-16T00:00Z` and full RFC 3339.
pub fn utc_kickoff_to_clock(iso: &str, tz: Tz) -> Option<String> {
    let iso = iso.trim();
    let utc = chrono::DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%MZ"))
        .ok()?;

    Some(
        chrono::Utc
            .from_utc_datetime(&utc)
            .with_timezone(&tz)
            .format(CLOCK_FORMAT)
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America, Europe};

    fn normalizer() -> Normalizer {
        Normalizer::new(America::New_York, Europe::Berlin)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> FixtureContext {
        FixtureContext {
            day: day(2024, 11, 15),
            competition: "mens-college-basketball".to_string(),
            group: "ACC".to_string(),
        }
    }

    #[test]
    fn test_convert_time_in_november() {
        // EST (UTC-5) to CET (UTC+1)
        assert_eq!(
            normalizer().convert_time(day(2024, 11, 15), "07:00 PM"),
            "2024-11-16 01:00"
        );
        assert_eq!(
            normalizer().convert_time(day(2024, 11, 15), "12:30 PM"),
            "2024-11-15 18:30"
        );
    }

    #[test]
    fn test_convert_time_when_only_us_is_on_dst() {
        // EDT (UTC-4) to CET (UTC+1): five hours instead of six
        assert_eq!(
            normalizer().convert_time(day(2024, 3, 15), "7:00 PM"),
            "2024-03-16 00:00"
        );
    }

    #[test]
    fn test_status_markers_pass_through() {
        let n = normalizer();
        for status in ["FINAL", "Final", "final/OT", "TBD", "tbd", "PPD", "Postponed"] {
            assert_eq!(n.convert_time(day(2024, 11, 15), status), status);
        }
    }

    #[test]
    fn test_unparseable_text_passes_through() {
        assert_eq!(
            normalizer().convert_time(day(2024, 11, 15), "Halftime"),
            "Halftime"
        );
        assert_eq!(normalizer().convert_time(day(2024, 11, 15), ""), "");
    }

    #[test]
    fn test_time_in_dst_gap_passes_through() {
        assert_eq!(
            normalizer().convert_time(day(2024, 3, 10), "2:30 AM"),
            "2:30 AM"
        );
    }

    #[test]
    fn test_normalize_scheduled_fixture() {
        let raw = RawFixture {
            home_team: "  Duke ".to_string(),
            away_team: "north   carolina".to_string(),
            time_text: "7:00 PM".to_string(),
            status: "7:00 PM".to_string(),
            venue: Some(" Cameron Indoor Stadium, Durham, NC ".to_string()),
            ..Default::default()
        };
        let fixture = normalizer().normalize(&raw, &ctx());

        assert_eq!(fixture.date, "15-11-2024");
        assert_eq!(fixture.home_team, "DUKE");
        assert_eq!(fixture.away_team, "NORTH CAROLINA");
        assert_eq!(fixture.ko_time_local.as_deref(), Some("07:00 PM"));
        assert_eq!(fixture.ko_time_display, "2024-11-16 01:00");
        assert_eq!(fixture.natural_key, "15-11-2024_DUKE_NORTH CAROLINA");
        assert_eq!(
            fixture.venue.as_deref(),
            Some("Cameron Indoor Stadium, Durham, NC")
        );
        assert_eq!(fixture.group, "ACC");
        assert!(!fixture.is_duplicate);
    }

    #[test]
    fn test_normalize_final_with_scores() {
        let raw = RawFixture {
            home_team: "Duke".to_string(),
            away_team: "UNC".to_string(),
            time_text: "FINAL".to_string(),
            status: "Final".to_string(),
            home_score: Some("78".to_string()),
            away_score: Some(" 71 ".to_string()),
            venue: Some("   ".to_string()),
            ..Default::default()
        };
        let fixture = normalizer().normalize(&raw, &ctx());

        assert_eq!(fixture.ko_time_local, None);
        assert_eq!(fixture.ko_time_display, "FINAL");
        assert_eq!(fixture.home_score, Some(78));
        assert_eq!(fixture.away_score, Some(71));
        assert_eq!(fixture.venue, None);
    }

    #[test]
    fn test_postponed_status_drops_clock_time() {
        let raw = RawFixture {
            home_team: "Kansas".to_string(),
            away_team: "Kentucky".to_string(),
            time_text: "07:00 PM".to_string(),
            status: "Postponed".to_string(),
            ..Default::default()
        };
        let fixture = normalizer().normalize(&raw, &ctx());

        assert_eq!(fixture.ko_time_local, None);
        assert_eq!(fixture.ko_time_display, "Postponed");
        assert_eq!(fixture.status, "Postponed");
    }

    #[test]
    fn test_final_status_keeps_clock_time() {
        let raw = RawFixture {
            home_team: "Duke".to_string(),
            away_team: "UNC".to_string(),
            time_text: "07:00 PM".to_string(),
            status: "Final".to_string(),
            ..Default::default()
        };
        let fixture = normalizer().normalize(&raw, &ctx());
        assert_eq!(fixture.ko_time_local.as_deref(), Some("07:00 PM"));
        assert_eq!(fixture.ko_time_display, "2024-11-16 01:00");
    }

    #[test]
    fn test_non_numeric_scores_are_absent() {
        let raw = RawFixture {
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_score: Some("".to_string()),
            away_score: Some("-".to_string()),
            ..Default::default()
        };
        let fixture = normalizer().normalize(&raw, &ctx());
        assert_eq!(fixture.home_score, None);
        assert_eq!(fixture.away_score, None);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = RawFixture {
            home_team: "Kansas".to_string(),
            away_team: "Kentucky".to_string(),
            time_text: "9:30 PM".to_string(),
            status: "Scheduled".to_string(),
            ..Default::default()
        };
        let n = normalizer();
        assert_eq!(n.normalize(&raw, &ctx()), n.normalize(&raw, &ctx()));
    }

    #[test]
    fn test_utc_kickoff_to_clock() {
        assert_eq!(
            utc_kickoff_to_clock("2024-11-16T00:00Z", America::New_York).as_deref(),
            Some("07:00 PM")
        );
        assert_eq!(
            utc_kickoff_to_clock("2024-11-15T17:30:00Z", America::New_York).as_deref(),
            Some("12:30 PM")
        );
        assert_eq!(utc_kickoff_to_clock("not a date", America::New_York), None);
    }
}
