use crate::error::FetchError;
use crate::models::{Group, RawFixture};
use async_trait::async_trait;
use chrono::NaiveDate;

/// A source of raw fixtures for one (day, group) unit.
///
/// Implementations apply their own rate limiter before every request. A
/// missing day or group upstream is `Ok(vec![])`, not an error.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, day: NaiveDate, group: &Group) -> Result<Vec<RawFixture>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Api,
    Page,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Api => "api",
            SourceKind::Page => "page",
        }
    }
}
