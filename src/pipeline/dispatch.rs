use std::time::Duration;

use tracing::{info, warn};

use crate::{
    listing::{IdentityKey, Listing},
    notify::NotificationChannel,
};

/// Sends listings one at a time, pausing between messages
pub struct Dispatcher<'a> {
    channel: &'a dyn NotificationChannel,
    delay: Duration,
}

impl<'a> Dispatcher<'a> {
    pub fn new(channel: &'a dyn NotificationChannel, delay: Duration) -> Self {
        Self { channel, delay }
    }

    /// Notify every listing in order. A failed send is logged and counted;
    /// it never stops the remaining sends.
    pub async fn dispatch_all(&self, listings: &[Listing]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        if listings.is_empty() {
            return summary;
        }

        info!(
            "Sending {} notifications via {}",
            listings.len(),
            self.channel.name()
        );

        for (i, listing) in listings.iter().enumerate() {
            match self.channel.notify(listing).await {
                Ok(()) => summary.delivered += 1,
                Err(e) => {
                    warn!("Failed to notify {} ({}): {}", listing.title(), listing.origin(), e);
                    summary.failures.push((listing.identity(), e.to_string()));
                }
            }

            // No pause after the last message
            if i + 1 < listings.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        summary
    }
}

#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub failures: Vec<(IdentityKey, String)>,
}

impl DispatchSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
