use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::Result,
    listing::{IdentityKey, Listing},
    notify::{build_channel, NotificationChannel},
    pipeline::{dispatch::Dispatcher, eligibility::EligibilityFilter},
    sources::{Fetcher, HttpFetcher, Source},
    storage::IdentityStore,
    utils::format_timestamp,
};

/// Upper bound on result pages fetched from one source
const MAX_PAGES: u32 = 50;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip registering identities after dispatch
    pub dry_run: bool,
    /// Pause between notifications
    pub notify_delay: Duration,
}

/// Everything one run needs. Built at run start and dropped at run end;
/// nothing is shared across runs except the identity store file.
pub struct RunContext {
    pub sources: Vec<Source>,
    pub fetcher: Box<dyn Fetcher>,
    pub channel: Box<dyn NotificationChannel>,
    pub store: IdentityStore,
    pub filter: EligibilityFilter,
    pub options: RunOptions,
}

impl RunContext {
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        Ok(Self {
            sources: config.sources.iter().map(Source::from_config).collect(),
            fetcher: Box::new(HttpFetcher::new(&config.http)?),
            channel: build_channel(config, dry_run)?,
            store: IdentityStore::new(&config.store.path),
            filter: EligibilityFilter::new(&config.adoption, &config.jobs),
            options: RunOptions {
                dry_run,
                notify_delay: Duration::from_millis(config.notify.delay_ms),
            },
        })
    }
}

/// Listings gathered from all sources in one run
#[derive(Debug, Default)]
pub struct Harvest {
    pub listings: Vec<Listing>,
    pub failed_sources: Vec<String>,
}

pub struct Pipeline {
    ctx: RunContext,
}

impl Pipeline {
    pub fn new(ctx: RunContext) -> Self {
        Self { ctx }
    }

    /// One end-to-end cycle: fetch, extract, filter, dedup, notify, persist.
    ///
    /// Source and notification failures are logged and skipped. Only a
    /// failure to persist the identity store is returned as an error.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let notified = self.ctx.store.load();
        info!("{} listings already notified", notified.len());

        let harvest = self.harvest().await;
        let eligible = self.ctx.filter.apply(&harvest.listings);
        let fresh = new_listings(&eligible, &notified);

        info!(
            "Seen: {}, eligible: {}, new: {}",
            harvest.listings.len(),
            eligible.len(),
            fresh.len()
        );

        let dispatch = Dispatcher::new(self.ctx.channel.as_ref(), self.ctx.options.notify_delay)
            .dispatch_all(&fresh)
            .await;

        // Failed sends are registered too: a channel that keeps failing must
        // not turn into a notification storm on every run.
        let registered = if self.ctx.options.dry_run {
            info!("Dry run: identity store left untouched");
            0
        } else if fresh.is_empty() {
            0
        } else {
            self.ctx
                .store
                .register(fresh.iter().map(Listing::identity))?
        };

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            sources: self.ctx.sources.len(),
            failed_sources: harvest.failed_sources,
            seen: harvest.listings.len(),
            eligible: eligible.len(),
            new: fresh.len(),
            delivered: dispatch.delivered,
            failed: dispatch.failed(),
            registered,
            dry_run: self.ctx.options.dry_run,
        })
    }

    /// Fetch and extract every source in order, skipping the ones that fail
    pub async fn harvest(&self) -> Harvest {
        let mut harvest = Harvest::default();

        for source in &self.ctx.sources {
            info!("Scraping {}...", source.name);

            match self.harvest_source(source).await {
                Ok(listings) => {
                    info!("{} listings: {}", source.name, listings.len());
                    harvest.listings.extend(listings);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", source.name, e);
                    harvest.failed_sources.push(source.name.clone());
                }
            }
        }

        harvest
    }

    /// Every result page of one source. A failed page fails the whole source.
    async fn harvest_source(&self, source: &Source) -> Result<Vec<Listing>> {
        let mut listings = Vec::new();
        let mut page = 1;

        while let Some(locator) = source.page_locator(page) {
            let raw = self.ctx.fetcher.fetch(&locator).await?;
            let extracted = source.extract_page(&raw)?;
            listings.extend(extracted.listings);

            if extracted.last {
                break;
            }
            if page >= MAX_PAGES {
                warn!("{}: stopping after {} pages", source.name, MAX_PAGES);
                break;
            }

            debug!("{}: page {} done, fetching next", source.name, page);
            page += 1;
        }

        Ok(listings)
    }
}

/// Eligible listings whose identity has not been notified before.
///
/// Keeps input order; a listing seen twice in one run is kept once.
pub fn new_listings(eligible: &[Listing], notified: &BTreeSet<IdentityKey>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    eligible
        .iter()
        .filter(|listing| {
            let identity = listing.identity();
            !notified.contains(&identity) && seen.insert(identity)
        })
        .cloned()
        .collect()
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: usize,
    pub failed_sources: Vec<String>,
    pub seen: usize,
    pub eligible: usize,
    pub new: usize,
    pub delivered: usize,
    pub failed: usize,
    pub registered: usize,
    pub dry_run: bool,
}

impl RunReport {
    pub fn print_summary(&self) {
        println!("\n{}", "=== Run Summary ===".cyan().bold());
        println!("Started:         {}", format_timestamp(&self.started_at));
        println!(
            "Sources:         {} ({} failed)",
            self.sources,
            self.failed_sources.len()
        );
        for name in &self.failed_sources {
            println!("  {} {}", "✗".red(), name);
        }
        println!("Listings seen:   {}", self.seen);
        println!("Eligible:        {}", self.eligible);
        println!("New:             {}", self.new.to_string().green());
        println!("Notified:        {} ✓", self.delivered);
        println!("Notify failed:   {} ✗", self.failed);
        if self.dry_run {
            println!("{}", "DRY RUN: identity store not updated".yellow());
        } else {
            println!("Registered:      {}", self.registered);
        }
        println!(
            "Duration:        {} ms",
            (self.finished_at - self.started_at).num_milliseconds()
        );
        println!("{}", "===================".cyan());
    }
}
