pub mod adapter;
pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod utils;
pub mod venue;

pub use adapter::{SourceAdapter, SourceKind};
pub use collector::{CancelFlag, Checkpoint, CollectRequest, Collection, Collector, Progress};
pub use config::CollectorConfig;
pub use error::{CollectError, FetchError, ParseError, TransportError, VenueLookupError};
pub use models::*;
pub use venue::{VenueResolver, VenueStrategy};

use api::espn_scoreboard::EspnScoreboardAdapter;
use api::transport::Transport;
use scrapers::espn_schedule::EspnScheduleAdapter;
use std::sync::Arc;
use utils::normalizer::Normalizer;
use utils::rate_limiter::RateLimiter;

/// Everything needed to run one collection
pub struct CollectorSetup {
    pub source: SourceKind,
    pub competition: Competition,
    pub resolve_venues: bool,
}

/// Wire up the adapter, rate limiters and optional venue resolver for a source.
/// Returns the collector and the groups its units should iterate.
pub fn build_collector(
    setup: &CollectorSetup,
    config: &CollectorConfig,
    transport: Arc<dyn Transport>,
    conferences: Vec<Group>,
) -> (Collector, Vec<Group>) {
    let (adapter, groups): (Box<dyn SourceAdapter>, Vec<Group>) = match setup.source {
        SourceKind::Api => {
            let limiter = Arc::new(RateLimiter::new("scoreboard", config.api_interval));
            let adapter = EspnScoreboardAdapter::new(
                transport.clone(),
                limiter,
                config.api_base.clone(),
                config.site_base.clone(),
                setup.competition.clone(),
                config.source_tz,
            );
            (Box::new(adapter) as Box<dyn SourceAdapter>, conferences)
        }
        SourceKind::Page => {
            let limiter = Arc::new(RateLimiter::new("schedule", config.schedule_interval));
            let adapter =
                EspnScheduleAdapter::new(transport.clone(), limiter, config.site_base.clone());
            let slug = setup.competition.slug().to_string();
            (
                Box::new(adapter) as Box<dyn SourceAdapter>,
                vec![Group::new(setup.competition.name.clone(), slug)],
            )
        }
    };

    let mut collector = Collector::new(
        adapter,
        Normalizer::from_config(config),
        setup.competition.slug(),
    );
    if setup.resolve_venues {
        collector = collector.with_venues(VenueResolver::espn(
            transport,
            config,
            setup.competition.clone(),
        ));
    }

    (collector, groups)
}
