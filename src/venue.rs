use crate::api::espn_summary::SummaryApiVenue;
use crate::api::transport::Transport;
use crate::config::CollectorConfig;
use crate::error::VenueLookupError;
use crate::models::Competition;
use crate::scrapers::espn_game_page::DetailPageVenue;
use crate::utils::rate_limiter::RateLimiter;
use async_trait::async_trait;
use std::sync::Arc;

/// One way of turning a detail-page reference into a location string
#[async_trait]
pub trait VenueStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup(&self, detail_ref: &str) -> Result<String, VenueLookupError>;
}

/// Tries each strategy in order; the first non-empty venue wins
pub struct VenueResolver {
    strategies: Vec<Box<dyn VenueStrategy>>,
}

impl VenueResolver {
    pub fn new(strategies: Vec<Box<dyn VenueStrategy>>) -> Self {
        Self { strategies }
    }

    /// Summary API first, then the game page. Both share one venue channel.
    pub fn espn(
        transport: Arc<dyn Transport>,
        config: &CollectorConfig,
        competition: Competition,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::new("venue", config.venue_interval));
        Self::new(vec![
            Box::new(SummaryApiVenue::new(
                transport.clone(),
                limiter.clone(),
                config.api_base.clone(),
                competition,
            )),
            Box::new(DetailPageVenue::new(
                transport,
                limiter,
                config.site_base.clone(),
            )),
        ])
    }

    pub async fn lookup(&self, detail_ref: Option<&str>) -> Result<String, VenueLookupError> {
        let detail_ref = detail_ref
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(VenueLookupError::MissingReference)?;

        let mut last_error = VenueLookupError::NotFound;
        for strategy in &self.strategies {
            match strategy.lookup(detail_ref).await {
                Ok(venue) if !venue.trim().is_empty() => return Ok(venue.trim().to_string()),
                Ok(_) => last_error = VenueLookupError::NotFound,
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "venue lookup failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Like `lookup`, but every failure becomes an empty string
    pub async fn resolve(&self, detail_ref: Option<&str>) -> String {
        match self.lookup(detail_ref).await {
            Ok(venue) => venue,
            Err(VenueLookupError::MissingReference) => String::new(),
            Err(e) => {
                tracing::warn!(detail_ref = ?detail_ref, error = %e, "no venue found");
                String::new()
            }
        }
    }
}
