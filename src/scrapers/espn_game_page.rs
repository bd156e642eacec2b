use crate::api::transport::Transport;
use crate::error::{TransportError, VenueLookupError};
use crate::scrapers::{absolute_url, cell_text, selector};
use crate::utils::rate_limiter::RateLimiter;
use crate::venue::VenueStrategy;
use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;

/// Location element on a game page, most specific first
const LOCATION_SELECTORS: &[&str] = &[".GameInfo__Location__Name", ".GameInfo__Location"];

/// Venue lookup by scraping the game detail page
pub struct DetailPageVenue {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    site_base: String,
}

impl DetailPageVenue {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        site_base: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            limiter,
            site_base: site_base.into(),
        }
    }
}

pub fn parse_location(html: &str) -> Result<String, VenueLookupError> {
    let document = Html::parse_document(html);

    for css in LOCATION_SELECTORS {
        let location_selector = selector(css)?;
        if let Some(location) = document
            .select(&location_selector)
            .map(|el| cell_text(&el))
            .find(|text| !text.is_empty())
        {
            return Ok(location);
        }
    }

    Err(VenueLookupError::NotFound)
}

#[async_trait]
impl VenueStrategy for DetailPageVenue {
    fn name(&self) -> &'static str {
        "detail-page"
    }

    async fn lookup(&self, detail_ref: &str) -> Result<String, VenueLookupError> {
        let url = absolute_url(&self.site_base, detail_ref).ok_or(VenueLookupError::MissingReference)?;

        self.limiter.wait().await;
        tracing::debug!(%url, "fetching game page");
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                url,
            }
            .into());
        }

        parse_location(&response.body)
    }
}
