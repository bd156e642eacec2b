use crate::api::transport::Transport;
use crate::error::{ParseError, TransportError, VenueLookupError};
use crate::models::Competition;
use crate::utils::rate_limiter::RateLimiter;
use crate::venue::VenueStrategy;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

/// Venue block shared by the scoreboard and summary payloads
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnVenue {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub address: Option<EspnAddress>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnAddress {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl EspnVenue {
    /// "Name, City, State, Country" with missing parts left out
    pub fn compose(&self) -> String {
        let address = self.address.clone().unwrap_or_default();
        [
            self.full_name.as_deref(),
            address.city.as_deref(),
            address.state.as_deref(),
            address.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "gameInfo")]
    game_info: Option<GameInfo>,
}

#[derive(Debug, Deserialize)]
struct GameInfo {
    venue: Option<EspnVenue>,
}

/// Pulls the numeric event id out of a game link such as
/// `/mens-college-basketball/game/_/gameId/401705123/duke-unc`.
pub fn event_id(detail_ref: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"gameId[/=](\d+)").expect("event id pattern is valid"));
    pattern
        .captures(detail_ref)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Venue lookup through the game summary JSON endpoint
pub struct SummaryApiVenue {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    api_base: String,
    competition: Competition,
}

impl SummaryApiVenue {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        api_base: impl Into<String>,
        competition: Competition,
    ) -> Self {
        Self {
            transport,
            limiter,
            api_base: api_base.into(),
            competition,
        }
    }

    fn summary_url(&self, event_id: &str) -> String {
        format!(
            "{}/{}/summary?event={}",
            self.api_base.trim_end_matches('/'),
            self.competition.api_path,
            event_id
        )
    }
}

pub fn parse_summary_venue(body: &str) -> Result<String, VenueLookupError> {
    let summary: SummaryResponse = serde_json::from_str(body).map_err(ParseError::from)?;
    let venue = summary
        .game_info
        .and_then(|info| info.venue)
        .ok_or(VenueLookupError::NotFound)?
        .compose();

    if venue.is_empty() {
        Err(VenueLookupError::NotFound)
    } else {
        Ok(venue)
    }
}

#[async_trait]
impl VenueStrategy for SummaryApiVenue {
    fn name(&self) -> &'static str {
        "summary-api"
    }

    async fn lookup(&self, detail_ref: &str) -> Result<String, VenueLookupError> {
        let id = event_id(detail_ref)
            .ok_or_else(|| VenueLookupError::NoEventId(detail_ref.to_string()))?;
        let url = self.summary_url(&id);

        self.limiter.wait().await;
        tracing::debug!(%url, "fetching game summary");
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                url,
            }
            .into());
        }

        parse_summary_venue(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::fake::{FakeTransport, TimedTransport};
    use std::time::Duration;

    const SUMMARY: &str = r#"{
        "gameInfo": {
            "venue": {
                "fullName": "Cameron Indoor Stadium",
                "address": { "city": "Durham", "state": "NC", "country": "USA" }
            }
        }
    }"#;

    fn strategy(fake: Arc<FakeTransport>) -> SummaryApiVenue {
        SummaryApiVenue::new(
            fake,
            Arc::new(RateLimiter::new("venue", Duration::ZERO)),
            "https://api.test/sports",
            Competition::mens_basketball(),
        )
    }

    #[test]
    fn test_event_id() {
        assert_eq!(
            event_id("/mens-college-basketball/game/_/gameId/401705123/duke-unc").as_deref(),
            Some("401705123")
        );
        assert_eq!(
            event_id("https://www.espn.com/game?gameId=42").as_deref(),
            Some("42")
        );
        assert_eq!(event_id("/team/_/id/150"), None);
        assert_eq!(event_id(""), None);
    }

    #[test]
    fn test_compose_skips_missing_parts() {
        let venue = EspnVenue {
            full_name: Some("Allen Fieldhouse".to_string()),
            address: Some(EspnAddress {
                city: Some("Lawrence".to_string()),
                state: None,
                country: Some(" ".to_string()),
            }),
        };
        assert_eq!(venue.compose(), "Allen Fieldhouse, Lawrence");
        assert_eq!(EspnVenue::default().compose(), "");
    }

    #[test]
    fn test_parse_summary_venue() {
        assert_eq!(
            parse_summary_venue(SUMMARY).unwrap(),
            "Cameron Indoor Stadium, Durham, NC, USA"
        );
        assert!(matches!(
            parse_summary_venue(r#"{"gameInfo": {}}"#),
            Err(VenueLookupError::NotFound)
        ));
        assert!(matches!(
            parse_summary_venue("<html>"),
            Err(VenueLookupError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_hits_summary_endpoint() {
        let fake = Arc::new(FakeTransport::new().ok(
            "https://api.test/sports/basketball/mens-college-basketball/summary?event=401705123",
            SUMMARY,
        ));
        let venue = strategy(fake.clone())
            .lookup("/mens-college-basketball/game/_/gameId/401705123")
            .await
            .unwrap();
        assert_eq!(venue, "Cameron Indoor Stadium, Durham, NC, USA");
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_without_event_id_makes_no_request() {
        let fake = Arc::new(FakeTransport::new());
        let err = strategy(fake.clone()).lookup("/no/id/here").await.unwrap_err();
        assert!(matches!(err, VenueLookupError::NoEventId(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_non_success_status() {
        let fake = Arc::new(FakeTransport::new());
        let err = strategy(fake).lookup("gameId/7").await.unwrap_err();
        assert!(matches!(
            err,
            VenueLookupError::Transport(TransportError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_lookups_wait_for_the_limiter() {
        let interval = Duration::from_millis(60);
        let fake = Arc::new(TimedTransport::default());
        let strategy = SummaryApiVenue::new(
            fake.clone(),
            Arc::new(RateLimiter::new("venue", interval)),
            "https://api.test/sports",
            Competition::mens_basketball(),
        );

        // "{}" carries no venue, only the request timing matters here
        let _ = strategy.lookup("gameId/1").await;
        let _ = strategy.lookup("gameId/2").await;

        let stamps = fake.stamps();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[1] - stamps[0] >= interval);
    }
}
