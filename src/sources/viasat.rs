use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use scraper::Html;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Extractor, Page};
use crate::{
    error::{HarvestError, Result},
    listing::{JobListing, Listing},
};

/// Postings requested per result page
const PAGE_SIZE: u32 = 100;

lazy_static! {
    static ref NEEDS_SECTION: Regex =
        Regex::new(r"(?is)what you(?:['’]| wi)ll need\s*(.*)").unwrap();
    static ref NEXT_HEADING: Regex = Regex::new(r"\n\s*[A-Z][A-Za-z ]{3,}\n").unwrap();
}

#[derive(Debug, Deserialize)]
struct JobsPage {
    #[serde(default)]
    jobs: Vec<JobEnvelope>,
}

#[derive(Debug, Deserialize)]
struct JobEnvelope {
    #[serde(default)]
    data: JobData,
}

#[derive(Debug, Deserialize, Default)]
struct JobData {
    title: Option<String>,
    req_id: Option<String>,
    location_name: Option<String>,
    description: Option<String>,
    description_html: Option<String>,
    #[serde(default)]
    meta_data: MetaData,
}

#[derive(Debug, Deserialize, Default)]
struct MetaData {
    canonical_url: Option<String>,
}

/// Viasat careers JSON API (`/api/jobs`), paged with `?page=N&limit=100`
/// until a page comes back without jobs.
///
/// Only postings at `location` whose title mentions one of `keywords` are
/// kept; an unset location or empty keyword list disables that check.
pub struct Viasat {
    employer: String,
    location: Option<String>,
    keywords: Vec<String>,
}

impl Viasat {
    pub fn new(employer: impl Into<String>, location: Option<String>, keywords: Vec<String>) -> Self {
        Self {
            employer: employer.into(),
            location,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn wanted(&self, data: &JobData) -> bool {
        if let Some(location) = &self.location {
            if data.location_name.as_deref() != Some(location.as_str()) {
                return false;
            }
        }

        if self.keywords.is_empty() {
            return true;
        }

        let title = data.title.as_deref().unwrap_or_default().to_lowercase();
        self.keywords.iter().any(|keyword| title.contains(keyword))
    }
}

impl Extractor for Viasat {
    fn extract(&self, raw: &str) -> Result<Vec<Listing>> {
        Ok(self.extract_page(raw)?.listings)
    }

    /// `base` with its `page`/`limit` parameters replaced; other query
    /// parameters are kept.
    fn page_locator(&self, base: &str, page: u32) -> Option<String> {
        let mut url = match Url::parse(base) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot paginate {}: {}", base, e);
                return None;
            }
        };

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "page" && key != "limit")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.set_query(None);
        url.query_pairs_mut()
            .extend_pairs(kept)
            .append_pair("page", &page.to_string())
            .append_pair("limit", &PAGE_SIZE.to_string());

        Some(url.to_string())
    }

    /// An empty `jobs` array marks the end of the results
    fn extract_page(&self, raw: &str) -> Result<Page> {
        let page: JobsPage = serde_json::from_str(raw).map_err(|e| HarvestError::Extract {
            source_name: self.employer.clone(),
            reason: e.to_string(),
        })?;

        let last = page.jobs.is_empty();
        let mut jobs = Vec::new();
        for JobEnvelope { data } in page.jobs {
            if !self.wanted(&data) {
                continue;
            }

            let Some(req_id) = data.req_id.clone().filter(|id| !id.is_empty()) else {
                debug!("Skipping posting without req_id: {:?}", data.title);
                continue;
            };

            let description = data
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(data.description_html.as_deref())
                .unwrap_or_default();

            jobs.push(Listing::Job(JobListing {
                employer: self.employer.clone(),
                title: data.title.clone().unwrap_or_default(),
                req_id,
                url: data.meta_data.canonical_url.clone().unwrap_or_default(),
                qualifications: extract_qualifications(description),
            }));
        }

        Ok(Page {
            listings: jobs,
            last,
        })
    }
}

/// Bullet lines of the "What you'll need" section of a job description
pub fn extract_qualifications(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }

    let text = if description.contains('<') {
        Html::parse_fragment(description)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        description.to_string()
    };
    let text = text.replace('\r', "");

    let Some(section) = NEEDS_SECTION.captures(&text).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    let section = NEXT_HEADING
        .split(section.as_str())
        .next()
        .unwrap_or_default();

    section
        .lines()
        .map(|line| line.trim_matches(|c| matches!(c, '•' | '-' | ' ' | '\t')))
        .filter(|line| line.chars().count() > 3)
        .map(str::to_string)
        .collect()
}
