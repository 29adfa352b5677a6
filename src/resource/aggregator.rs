//! Multi-region aggregation
//!
//! Spawns one collection task per region and merges their outcomes. Each
//! task sends its result over a channel; the aggregator is the only owner of
//! the merged resource and error lists.

use super::collector::{RegionCollector, Throttle, DEFAULT_PAGE_SIZE};
use super::model::Resource;
use crate::aws::{CollectError, CollectionError, RegionConnector};
use crate::progress::ProgressObserver;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Heartbeat period for the progress observer
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

type RegionOutcome = (String, Result<Vec<Resource>, CollectError>);

/// Merged result of a collection run
#[derive(Debug)]
pub struct Inventory {
    /// No order across regions; page order within a region
    pub resources: Vec<Resource>,
    pub errors: Vec<CollectionError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Inventory {
    /// True when every region was collected
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs a [`RegionCollector`] per region concurrently
pub struct Aggregator {
    connector: Arc<dyn RegionConnector>,
    page_size: i32,
    throttle: Throttle,
    tick: Duration,
}

impl Aggregator {
    pub fn new(connector: Arc<dyn RegionConnector>) -> Self {
        Self {
            connector,
            page_size: DEFAULT_PAGE_SIZE,
            throttle: Throttle::default(),
            tick: DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Collect every region to completion.
    ///
    /// A failing region is recorded in [`Inventory::errors`] and never stops
    /// its siblings. `observer.on_done` is called exactly once, after every
    /// task has been joined.
    pub async fn run(&self, regions: &[String], observer: &dyn ProgressObserver) -> Inventory {
        let started_at = Utc::now();
        let regions = dedup_regions(regions);
        info!("Collecting tagged resources from {} regions", regions.len());

        let (tx, mut rx) = mpsc::unbounded_channel::<RegionOutcome>();
        let mut spawned = Vec::with_capacity(regions.len());

        for region in regions {
            let tx = tx.clone();
            let connector = Arc::clone(&self.connector);
            let collector = RegionCollector::new(region.clone())
                .with_page_size(self.page_size)
                .with_throttle(self.throttle);

            let handle = tokio::spawn(async move {
                let outcome = match connector.connect(collector.region()).await {
                    Ok(api) => collector.collect(api.as_ref()).await,
                    Err(err) => Err(err),
                };
                // The receiver only goes away if the aggregator itself was dropped
                let _ = tx.send((collector.region().to_string(), outcome));
            });
            spawned.push((region, handle));
        }
        drop(tx);

        let mut ticker = interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut resources = Vec::new();
        let mut errors = Vec::new();
        let mut reported = HashSet::new();

        loop {
            tokio::select! {
                received = rx.recv() => {
                    let Some((region, outcome)) = received else {
                        break;
                    };
                    match outcome {
                        Ok(found) => {
                            observer.on_region_done(&region, Ok(found.len()));
                            resources.extend(found);
                        }
                        Err(cause) => {
                            warn!("Region {} failed: {}", region, cause);
                            observer.on_region_done(&region, Err(&cause));
                            errors.push(CollectionError {
                                region: region.clone(),
                                cause,
                            });
                        }
                    }
                    reported.insert(region);
                }
                _ = ticker.tick() => observer.on_tick(),
            }
        }

        let (names, handles): (Vec<String>, Vec<_>) = spawned.into_iter().unzip();
        for (region, joined) in names.into_iter().zip(join_all(handles).await) {
            if let Err(err) = joined {
                if !reported.contains(&region) {
                    let cause = CollectError::Aborted(err.to_string());
                    observer.on_region_done(&region, Err(&cause));
                    errors.push(CollectionError { region, cause });
                }
            }
        }

        observer.on_done(resources.len());

        let inventory = Inventory {
            resources,
            errors,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "Collected {} resources, {} failed regions in {}ms",
            inventory.resources.len(),
            inventory.errors.len(),
            inventory.elapsed().num_milliseconds()
        );

        inventory
    }
}

/// Drop repeated region names, keeping first-seen order
fn dedup_regions(regions: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    regions
        .iter()
        .filter(|region| seen.insert(*region))
        .cloned()
        .collect()
}
