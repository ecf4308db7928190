use serde::Deserialize;

use crate::error::{HarvestError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub adoption: AdoptionCriteria,
    #[serde(default)]
    pub jobs: JobCriteria,
    #[serde(default)]
    pub notify: NotifyConfig,
    pub twilio: Option<TwilioConfig>,
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data/notified.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (compatible; ListingWatch/0.1)".to_string(),
        }
    }
}

/// Rules an adoption listing must satisfy to be surfaced
#[derive(Debug, Deserialize, Clone)]
pub struct AdoptionCriteria {
    pub sex: String,
    pub max_weight: f64,
    pub max_age: f64,
    pub allowed_breeds: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JobCriteria {
    #[serde(default)]
    pub blocklist: Vec<String>,
    /// Reject postings asking for 4-10+ years of experience. Off unless set.
    #[serde(default)]
    pub reject_excessive_experience: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Console,
    Twilio,
    Telegram,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    pub channel: ChannelKind,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channel: ChannelKind::Console,
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    HelenWoodward,
    RanchoCoastal,
    Viasat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub name: String,
    pub url: String,
    /// Only used by job boards: keep postings at this location
    #[serde(default)]
    pub location: Option<String>,
    /// Only used by job boards: keep postings whose title contains one of these
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Config {
    /// Load `path` (without extension, as the `config` crate expects) layered
    /// under `LISTING_WATCH_*` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("LISTING_WATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(HarvestError::Config("no sources configured".to_string()));
        }

        if self.adoption.max_weight <= 0.0 || self.adoption.max_age <= 0.0 {
            return Err(HarvestError::Config(
                "adoption.max_weight and adoption.max_age must be positive".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(HarvestError::Config("http.timeout_secs must be non-zero".to_string()));
        }

        match self.notify.channel {
            ChannelKind::Twilio if self.twilio.is_none() => Err(HarvestError::Config(
                "notify.channel = twilio requires a [twilio] section".to_string(),
            )),
            ChannelKind::Telegram if self.telegram.is_none() => Err(HarvestError::Config(
                "notify.channel = telegram requires a [telegram] section".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            store: StoreConfig::default(),
            http: HttpConfig::default(),
            adoption: AdoptionCriteria {
                sex: "female".to_string(),
                max_weight: 40.0,
                max_age: 3.0,
                allowed_breeds: vec!["poodle".to_string()],
            },
            jobs: JobCriteria::default(),
            notify: NotifyConfig::default(),
            twilio: None,
            telegram: None,
            sources: vec![SourceConfig {
                kind: SourceKind::HelenWoodward,
                name: "Helen Woodward Animal Center".to_string(),
                url: "https://animalcenter.org/pet-adoption/adoptable-dogs/".to_string(),
                location: None,
                keywords: vec![],
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_sources() {
        let mut config = base();
        config.sources.clear();
        assert!(matches!(config.validate(), Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_rejects_channel_without_credentials() {
        let mut config = base();
        config.notify.channel = ChannelKind::Twilio;
        assert!(config.validate().is_err());

        config.twilio = Some(TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from: "+15550000000".to_string(),
            to: "+15551111111".to_string(),
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.toml");
        std::fs::write(
            &path,
            r#"
[store]
path = "state/notified.json"

[adoption]
sex = "female"
max_weight = 40.0
max_age = 3.0
allowed_breeds = ["poodle", "doodle"]

[jobs]
blocklist = ["senior", "manager"]

[notify]
channel = "console"

[[sources]]
kind = "viasat"
name = "Viasat"
url = "https://careers.viasat.com/api/jobs"
location = "Carlsbad"
keywords = ["software", "devops"]
"#,
        )
        .unwrap();

        let stem = dir.path().join("watch");
        let config = Config::load(stem.to_str().unwrap()).unwrap();

        assert_eq!(config.store.path, "state/notified.json");
        assert_eq!(config.adoption.allowed_breeds.len(), 2);
        assert_eq!(config.jobs.blocklist, vec!["senior", "manager"]);
        assert!(!config.jobs.reject_excessive_experience);
        assert_eq!(config.notify.delay_ms, 1000);
        assert_eq!(config.sources[0].kind, SourceKind::Viasat);
        assert_eq!(config.sources[0].location.as_deref(), Some("Carlsbad"));
    }
}
