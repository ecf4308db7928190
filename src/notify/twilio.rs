use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use super::{formatters::message_body, NotificationChannel};
use crate::{
    config::TwilioConfig,
    error::{HarvestError, Result},
    listing::Listing,
};

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

/// SMS, or MMS when the listing carries an image, through the Twilio
/// Messages API
pub struct TwilioChannel {
    client: reqwest::Client,
    options: TwilioConfig,
}

impl TwilioChannel {
    pub fn new(options: TwilioConfig, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, options })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API, self.options.account_sid
        )
    }

    fn form(&self, listing: &Listing) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("To", self.options.to.clone()),
            ("From", self.options.from.clone()),
            ("Body", message_body(listing)),
        ];
        if let Some(image) = listing.image() {
            form.push(("MediaUrl", image.to_string()));
        }
        form
    }
}

#[async_trait]
impl NotificationChannel for TwilioChannel {
    async fn notify(&self, listing: &Listing) -> Result<()> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&self.form(listing))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Twilio error ({}): {}", status, body);
            return Err(HarvestError::Notify(format!("Twilio returned {}", status)));
        }

        info!("SMS sent for {}", listing.title());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::AdoptionListing;

    fn channel() -> TwilioChannel {
        TwilioChannel::new(
            TwilioConfig {
                account_sid: "AC0001".to_string(),
                auth_token: "token".to_string(),
                from: "+15550000000".to_string(),
                to: "+15551111111".to_string(),
            },
            15,
        )
        .unwrap()
    }

    fn dog(image: Option<&str>) -> Listing {
        Listing::Adoption(AdoptionListing {
            source: "Shelter".to_string(),
            name: "Rosie".to_string(),
            breed: "Poodle".to_string(),
            sex: "female".to_string(),
            age: "2 years".to_string(),
            weight: "30".to_string(),
            image: image.map(str::to_string),
            url: "https://shelter.example.com".to_string(),
        })
    }

    #[test]
    fn test_messages_url_uses_account_sid() {
        assert_eq!(
            channel().messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC0001/Messages.json"
        );
    }

    #[test]
    fn test_media_url_only_with_image() {
        let channel = channel();

        let sms = channel.form(&dog(None));
        assert!(sms.iter().all(|(key, _)| *key != "MediaUrl"));

        let mms = channel.form(&dog(Some("https://cdn.example.com/rosie.jpg")));
        assert!(mms
            .iter()
            .any(|(key, value)| *key == "MediaUrl" && value == "https://cdn.example.com/rosie.jpg"));
        assert_eq!(mms[0], ("To", "+15551111111".to_string()));
    }
}
