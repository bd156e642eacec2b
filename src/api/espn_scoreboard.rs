use crate::adapter::SourceAdapter;
use crate::api::espn_summary::EspnVenue;
use crate::api::transport::Transport;
use crate::error::{FetchError, ParseError};
use crate::models::{Competition, Group, RawFixture};
use crate::utils::normalizer::utc_kickoff_to_clock;
use crate::utils::rate_limiter::RateLimiter;
use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Response from the ESPN scoreboard endpoint. Events stay untyped until
/// each one is decoded on its own.
#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct EspnEvent {
    id: Option<String>,
    date: Option<String>, // UTC, e.g. "2024-11-16T00:00Z"
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetition {
    #[serde(default)]
    competitors: Vec<EspnCompetitor>,
    status: Option<EspnStatus>,
    venue: Option<EspnVenue>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetitor {
    team: Option<EspnTeam>,
    score: Option<Value>, // usually a string, occasionally a number
}

#[derive(Debug, Deserialize)]
struct EspnTeam {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EspnStatus {
    #[serde(rename = "type")]
    status_type: Option<EspnStatusType>,
}

#[derive(Debug, Deserialize)]
struct EspnStatusType {
    description: Option<String>,
}

/// Structured-API variant: one scoreboard request per (day, conference)
pub struct EspnScoreboardAdapter {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    api_base: String,
    site_base: String,
    competition: Competition,
    source_tz: Tz,
}

impl EspnScoreboardAdapter {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        api_base: impl Into<String>,
        site_base: impl Into<String>,
        competition: Competition,
        source_tz: Tz,
    ) -> Self {
        Self {
            transport,
            limiter,
            api_base: api_base.into(),
            site_base: site_base.into(),
            competition,
            source_tz,
        }
    }

    fn scoreboard_url(&self, day: NaiveDate, group: &Group) -> String {
        format!(
            "{}/{}/scoreboard?dates={}&groups={}",
            self.api_base.trim_end_matches('/'),
            self.competition.api_path,
            day.format("%Y%m%d"),
            group.id
        )
    }

    fn game_link(&self, event_id: &str) -> String {
        format!(
            "{}/{}/game/_/gameId/{}",
            self.site_base.trim_end_matches('/'),
            self.competition.slug(),
            event_id
        )
    }

    fn parse_scoreboard(&self, body: &str) -> Result<Vec<RawFixture>, ParseError> {
        let response: ScoreboardResponse = serde_json::from_str(body)?;
        let mut fixtures = Vec::new();

        for value in response.events.unwrap_or_default() {
            let parsed = serde_json::from_value::<EspnEvent>(value)
                .map_err(ParseError::from)
                .and_then(|event| self.parse_event(&event));
            match parsed {
                Ok(fixture) => fixtures.push(fixture),
                Err(e) => tracing::debug!(error = %e, "skipping scoreboard event"),
            }
        }

        Ok(fixtures)
    }

    fn parse_event(&self, event: &EspnEvent) -> Result<RawFixture, ParseError> {
        let game = event
            .competitions
            .first()
            .ok_or(ParseError::MissingField("competitions"))?;
        if game.competitors.len() < 2 {
            return Err(ParseError::MissingField("competitors"));
        }

        // Source ordering: competitor 0 is home, competitor 1 is away
        let home = &game.competitors[0];
        let away = &game.competitors[1];

        let status = game
            .status
            .as_ref()
            .and_then(|s| s.status_type.as_ref())
            .and_then(|t| t.description.clone())
            .unwrap_or_default();

        let time_text = event
            .date
            .as_deref()
            .and_then(|date| utc_kickoff_to_clock(date, self.source_tz))
            .unwrap_or_else(|| status.clone());

        let venue = game
            .venue
            .as_ref()
            .map(EspnVenue::compose)
            .filter(|v| !v.is_empty());

        Ok(RawFixture {
            home_team: team_name(home)?,
            away_team: team_name(away)?,
            time_text,
            status,
            home_score: score_text(home),
            away_score: score_text(away),
            detail_ref: event.id.as_deref().map(|id| self.game_link(id)),
            venue,
        })
    }
}

fn team_name(competitor: &EspnCompetitor) -> Result<String, ParseError> {
    competitor
        .team
        .as_ref()
        .and_then(|t| t.display_name.clone())
        .filter(|name| !name.trim().is_empty())
        .ok_or(ParseError::MissingField("team.displayName"))
}

fn score_text(competitor: &EspnCompetitor) -> Option<String> {
    match competitor.score.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl SourceAdapter for EspnScoreboardAdapter {
    fn name(&self) -> &'static str {
        "espn-scoreboard"
    }

    async fn fetch(&self, day: NaiveDate, group: &Group) -> Result<Vec<RawFixture>, FetchError> {
        let url = self.scoreboard_url(day, group);

        self.limiter.wait().await;
        tracing::debug!(%url, group = %group.label, "fetching scoreboard");
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            tracing::debug!(%url, status = response.status, "no scoreboard for unit");
            return Ok(Vec::new());
        }

        Ok(self.parse_scoreboard(&response.body)?)
    }
}
