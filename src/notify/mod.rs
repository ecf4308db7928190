pub mod console;
pub mod formatters;
pub mod telegram;
pub mod twilio;

pub use console::ConsoleChannel;
pub use telegram::TelegramChannel;
pub use twilio::TwilioChannel;

use async_trait::async_trait;

use crate::{
    config::{ChannelKind, Config},
    error::{HarvestError, Result},
    listing::Listing,
};

#[cfg(test)]
use mockall::automock;

/// Delivers one listing to the user. Failures are reported, never retried here.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn notify(&self, listing: &Listing) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// Build the channel selected in `[notify]`; a dry run always prints instead.
pub fn build_channel(config: &Config, dry_run: bool) -> Result<Box<dyn NotificationChannel>> {
    if dry_run {
        return Ok(Box::new(ConsoleChannel::new()));
    }

    match config.notify.channel {
        ChannelKind::Console => Ok(Box::new(ConsoleChannel::new())),
        ChannelKind::Twilio => {
            let twilio = config.twilio.clone().ok_or_else(|| {
                HarvestError::Config("missing [twilio] section".to_string())
            })?;
            Ok(Box::new(TwilioChannel::new(twilio, config.http.timeout_secs)?))
        }
        ChannelKind::Telegram => {
            let telegram = config.telegram.clone().ok_or_else(|| {
                HarvestError::Config("missing [telegram] section".to_string())
            })?;
            Ok(Box::new(TelegramChannel::new(telegram)))
        }
    }
}
