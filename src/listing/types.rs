use serde::{Deserialize, Serialize};

use super::quantity::parse_weight;

/// An adoptable animal as published by a shelter.
///
/// `age` and `weight` hold the text exactly as the shelter wrote it. Numeric
/// values are derived on demand by [`crate::listing::quantity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionListing {
    pub source: String,
    pub name: String,
    pub breed: String,
    pub sex: String,
    pub age: String,
    pub weight: String,
    pub image: Option<String>,
    pub url: String,
}

/// A job posting from an employer careers site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub employer: String,
    pub title: String,
    pub req_id: String,
    pub url: String,
    pub qualifications: Vec<String>,
}

/// Closed set of listing variants the pipeline handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing {
    Adoption(AdoptionListing),
    Job(JobListing),
}

impl AdoptionListing {
    /// One-line summary used in logs and dry-run output
    pub fn description(&self) -> String {
        format!(
            "{}, {}, {}, {}, {} pounds.",
            self.name,
            self.sex,
            self.age,
            self.breed,
            parse_weight(&self.weight)
        )
    }
}

impl JobListing {
    pub fn description(&self) -> String {
        let mut text = format!(
            "{}: {}\n Req ID: {}\n URL: {}",
            self.employer, self.title, self.req_id, self.url
        );

        if !self.qualifications.is_empty() {
            text.push_str("\n Qualifications:");
            for qualification in &self.qualifications {
                text.push_str(&format!("\n  - {}", qualification));
            }
        }

        text
    }
}

impl Listing {
    /// Name of the shelter or employer the listing came from
    pub fn origin(&self) -> &str {
        match self {
            Listing::Adoption(listing) => &listing.source,
            Listing::Job(listing) => &listing.employer,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Listing::Adoption(listing) => &listing.name,
            Listing::Job(listing) => &listing.title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Listing::Adoption(listing) => &listing.url,
            Listing::Job(listing) => &listing.url,
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            Listing::Adoption(listing) => listing.image.as_deref(),
            Listing::Job(_) => None,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Listing::Adoption(listing) => listing.description(),
            Listing::Job(listing) => listing.description(),
        }
    }
}

impl From<AdoptionListing> for Listing {
    fn from(value: AdoptionListing) -> Self {
        Listing::Adoption(value)
    }
}

impl From<JobListing> for Listing {
    fn from(value: JobListing) -> Self {
        Listing::Job(value)
    }
}
