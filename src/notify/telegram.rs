use async_trait::async_trait;
use teloxide::requests::Requester;
use teloxide::types::ChatId;
use teloxide::Bot;
use tracing::{error, info};

use super::{formatters::message_body, NotificationChannel};
use crate::{
    config::TelegramConfig,
    error::{HarvestError, Result},
    listing::Listing,
};

/// Sends each notification to every configured Telegram chat
pub struct TelegramChannel {
    bot: Bot,
    chat_ids: Vec<i64>,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        info!("Telegram channel initialized for {} chats", config.chat_ids.len());
        Self {
            bot: Bot::new(config.bot_token),
            chat_ids: config.chat_ids,
        }
    }
}

fn telegram_text(listing: &Listing) -> String {
    let mut text = message_body(listing);
    if let Some(image) = listing.image() {
        text.push_str(&format!("\nPhoto: {}", image));
    }
    text
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    /// Succeeds if at least one chat received the message
    async fn notify(&self, listing: &Listing) -> Result<()> {
        let text = telegram_text(listing);
        let mut delivered = 0;

        for chat_id in &self.chat_ids {
            match self.bot.send_message(ChatId(*chat_id), text.clone()).await {
                Ok(_) => {
                    delivered += 1;
                    info!("Notification sent to chat {}", chat_id);
                }
                Err(e) => error!("Failed to send notification to chat {}: {}", chat_id, e),
            }
        }

        if delivered == 0 {
            return Err(HarvestError::Notify(format!(
                "no Telegram chat accepted {}",
                listing.title()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::AdoptionListing;

    #[test]
    fn test_photo_link_appended() {
        let listing = Listing::Adoption(AdoptionListing {
            source: "Shelter".to_string(),
            name: "Rosie".to_string(),
            breed: "Poodle".to_string(),
            sex: "female".to_string(),
            age: "2 years".to_string(),
            weight: "30".to_string(),
            image: Some("https://cdn.example.com/rosie.jpg".to_string()),
            url: "https://shelter.example.com".to_string(),
        });

        let text = telegram_text(&listing);
        assert!(text.starts_with("New dog match at Shelter!"));
        assert!(text.ends_with("\nPhoto: https://cdn.example.com/rosie.jpg"));
    }
}
