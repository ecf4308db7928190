use async_trait::async_trait;
use colored::Colorize;

use super::{formatters::message_body, NotificationChannel};
use crate::{error::Result, listing::Listing};

/// Prints notifications to stdout; used for dry runs and local testing
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    async fn notify(&self, listing: &Listing) -> Result<()> {
        println!("{}", "--- notification ---".cyan());
        println!("{}", message_body(listing));
        if let Some(image) = listing.image() {
            println!("Image: {}", image);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
