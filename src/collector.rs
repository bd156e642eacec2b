use crate::adapter::{SourceAdapter, SourceKind};
use crate::config::CollectorConfig;
use crate::error::CollectError;
use crate::models::{CanonicalFixture, Competition, FixtureContext, Group, Unit};
use crate::utils::date_range::DateRange;
use crate::utils::dedup::{duplicates, flag_duplicates};
use crate::utils::normalizer::Normalizer;
use crate::venue::VenueResolver;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub groups: Vec<Group>,
}

/// Emitted after each unit finishes, fetched or replayed from a checkpoint
#[derive(Debug)]
pub struct Progress<'a> {
    pub completed: usize,
    pub total: usize,
    pub unit: &'a Unit,
    pub fixtures: &'a [CanonicalFixture],
    pub resumed: bool,
}

impl Progress<'_> {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Cooperative stop signal, checked before each unit starts
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fixtures of already-completed units, keyed by `Unit::key`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    pub run: String,
    pub units: HashMap<String, Vec<CanonicalFixture>>,
}

impl Checkpoint {
    pub fn new(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            units: HashMap::new(),
        }
    }

    /// Identifies the runs whose stored fixtures can be replayed: same
    /// competition, source and zone pair.
    pub fn run_label(competition: &Competition, source: SourceKind, config: &CollectorConfig) -> String {
        format!(
            "{}-{}-{}-{}",
            competition.slug(),
            source.label(),
            config.source_tz.name(),
            config.display_tz.name()
        )
    }

    pub fn record(&mut self, unit: &Unit, fixtures: &[CanonicalFixture]) {
        self.units.insert(unit.key(), fixtures.to_vec());
    }

    pub fn get(&self, unit: &Unit) -> Option<&[CanonicalFixture]> {
        self.units.get(&unit.key()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Result of one collection run
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub fixtures: Vec<CanonicalFixture>,
    pub units_total: usize,
    pub units_completed: usize,
    pub units_failed: usize,
    pub units_resumed: usize,
    pub cancelled: bool,
}

impl Collection {
    pub fn duplicates(&self) -> Vec<&CanonicalFixture> {
        duplicates(&self.fixtures)
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

/// Drives the adapter over every (day, group) unit of a date range, strictly
/// one request at a time.
pub struct Collector {
    adapter: Box<dyn SourceAdapter>,
    normalizer: Normalizer,
    competition: String,
    venues: Option<VenueResolver>,
    cancel: CancelFlag,
}

impl Collector {
    pub fn new(
        adapter: Box<dyn SourceAdapter>,
        normalizer: Normalizer,
        competition: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            normalizer,
            competition: competition.into(),
            venues: None,
            cancel: CancelFlag::new(),
        }
    }

    /// Look up venues for fixtures the schedule source left without one
    pub fn with_venues(mut self, resolver: VenueResolver) -> Self {
        self.venues = Some(resolver);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Collect, normalize and deduplicate every unit of `request`.
    ///
    /// Only an invalid range is an error, and it is reported before any
    /// request goes out. Units already in `checkpoint` are replayed instead
    /// of fetched.
    pub async fn collect<F>(
        &self,
        request: &CollectRequest,
        checkpoint: Option<&Checkpoint>,
        mut on_progress: F,
    ) -> Result<Collection, CollectError>
    where
        F: FnMut(&Progress<'_>),
    {
        let range = DateRange::new(request.start, request.end)?;
        let plan = range.plan(&request.groups);

        let mut collection = Collection {
            units_total: plan.len(),
            ..Collection::default()
        };

        tracing::info!(
            source = self.adapter.name(),
            start = %range.start(),
            end = %range.end(),
            days = range.days_in_range(),
            units = plan.len(),
            "starting collection"
        );

        for unit in &plan {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    completed = collection.units_completed,
                    total = collection.units_total,
                    "collection cancelled"
                );
                collection.cancelled = true;
                break;
            }

            let (fixtures, resumed) = match checkpoint.and_then(|c| c.get(unit)) {
                Some(stored) => (stored.to_vec(), true),
                None => (self.collect_unit(unit, &mut collection).await, false),
            };
            if resumed {
                collection.units_resumed += 1;
            }

            collection.units_completed += 1;
            on_progress(&Progress {
                completed: collection.units_completed,
                total: collection.units_total,
                unit,
                fixtures: &fixtures,
                resumed,
            });
            collection.fixtures.extend(fixtures);
        }

        let flagged = flag_duplicates(&mut collection.fixtures);
        tracing::info!(
            fixtures = collection.fixtures.len(),
            duplicates = flagged,
            failed_units = collection.units_failed,
            "collection finished"
        );

        Ok(collection)
    }

    async fn collect_unit(&self, unit: &Unit, collection: &mut Collection) -> Vec<CanonicalFixture> {
        let raws = match self.adapter.fetch(unit.day, &unit.group).await {
            Ok(raws) => raws,
            Err(e) => {
                tracing::warn!(
                    day = %unit.day,
                    group = %unit.group.label,
                    error = %e,
                    "unit failed, continuing with no fixtures"
                );
                collection.units_failed += 1;
                return Vec::new();
            }
        };

        let ctx = FixtureContext {
            day: unit.day,
            competition: self.competition.clone(),
            group: unit.group.label.clone(),
        };

        let mut fixtures = Vec::with_capacity(raws.len());
        for mut raw in raws {
            let has_venue = raw.venue.as_deref().is_some_and(|v| !v.trim().is_empty());
            if !has_venue {
                if let Some(resolver) = &self.venues {
                    raw.venue = Some(resolver.resolve(raw.detail_ref.as_deref()).await);
                }
            }
            fixtures.push(self.normalizer.normalize(&raw, &ctx));
        }

        tracing::info!(
            day = %unit.day,
            group = %unit.group.label,
            fixtures = fixtures.len(),
            "unit collected"
        );
        fixtures
    }
}
