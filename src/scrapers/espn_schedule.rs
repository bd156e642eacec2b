use crate::adapter::SourceAdapter;
use crate::api::transport::Transport;
use crate::error::{FetchError, ParseError};
use crate::models::{Group, RawFixture};
use crate::scrapers::{absolute_url, cell_text, selector};
use crate::utils::rate_limiter::RateLimiter;
use async_trait::async_trait;
use chrono::NaiveDate;
use scraper::Html;
use std::sync::Arc;

/// Page-scrape variant: one schedule page per day. The group id is the sport
/// slug, e.g. "mens-college-basketball".
pub struct EspnScheduleAdapter {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    site_base: String,
}

impl EspnScheduleAdapter {
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

    fn schedule_url(&self, day: NaiveDate, slug: &str) -> String {
        format!(
            "{}/{}/schedule/_/date/{}",
            self.site_base.trim_end_matches('/'),
            slug,
            day.format("%Y%m%d")
        )
    }
}

/// Rows of every schedule table. Columns: away, home, time/status, optional
/// location. Rows with fewer than three cells or a blank team are skipped.
pub fn parse_schedule_html(html: &str, site_base: &str) -> Result<Vec<RawFixture>, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tbody tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a[href]")?;

    let mut fixtures = Vec::new();

    for table in document.select(&table_selector) {
        for row in table.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 3 {
                continue;
            }

            let away = cell_text(&cells[0]);
            let home = cell_text(&cells[1]);
            if away.is_empty() || home.is_empty() {
                continue;
            }

            let time_status = cell_text(&cells[2]);
            let location = cells.get(3).map(cell_text).filter(|l| !l.is_empty());

            let detail_ref = row
                .select(&link_selector)
                .filter_map(|a| a.value().attr("href"))
                .find(|href| href.contains("gameId"))
                .and_then(|href| absolute_url(site_base, href));

            fixtures.push(RawFixture {
                home_team: home,
                away_team: away,
                time_text: time_status.clone(),
                status: time_status,
                home_score: None,
                away_score: None,
                detail_ref,
                venue: location,
            });
        }
    }

    Ok(fixtures)
}

#[async_trait]
impl SourceAdapter for EspnScheduleAdapter {
    fn name(&self) -> &'static str {
        "espn-schedule"
    }

    async fn fetch(&self, day: NaiveDate, group: &Group) -> Result<Vec<RawFixture>, FetchError> {
        let url = self.schedule_url(day, &group.id);

        self.limiter.wait().await;
        tracing::debug!(%url, "fetching schedule page");
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            tracing::debug!(%url, status = response.status, "no schedule page for day");
            return Ok(Vec::new());
        }

        Ok(parse_schedule_html(&response.body, &self.site_base)?)
    }
}
