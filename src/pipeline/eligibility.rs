use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    config::{AdoptionCriteria, JobCriteria},
    listing::{age_years, weight_pounds, AdoptionListing, JobListing, Listing},
};

lazy_static! {
    static ref EXCESSIVE_EXPERIENCE: Regex = Regex::new(r"\b([4-9]|10)\+?\s*(years|yrs)\b").unwrap();
}

/// Why a listing was not surfaced
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    WrongSex(String),
    WeightUnparseable(String),
    TooHeavy(f64),
    AgeUnparseable(String),
    TooOld(f64),
    BreedNotAllowed(String),
    BlockedKeyword(String),
    ExcessiveExperience,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::WrongSex(sex) => write!(f, "sex {:?} does not match", sex),
            Rejection::WeightUnparseable(text) => write!(f, "weight {:?} is not a number", text),
            Rejection::TooHeavy(lbs) => write!(f, "weighs {} lbs", lbs),
            Rejection::AgeUnparseable(text) => write!(f, "age {:?} is not a number", text),
            Rejection::TooOld(years) => write!(f, "{:.2} years old", years),
            Rejection::BreedNotAllowed(breed) => write!(f, "breed {:?} not allowed", breed),
            Rejection::BlockedKeyword(keyword) => write!(f, "title contains {:?}", keyword),
            Rejection::ExcessiveExperience => write!(f, "asks for 4+ years of experience"),
        }
    }
}

/// Decides whether a listing is worth telling the user about.
///
/// Pure: the same listing and criteria always give the same answer.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    sex: String,
    max_weight: f64,
    max_age: f64,
    allowed_breeds: Vec<String>,
    blocklist: Vec<String>,
    reject_excessive_experience: bool,
}

impl EligibilityFilter {
    pub fn new(adoption: &AdoptionCriteria, jobs: &JobCriteria) -> Self {
        Self {
            sex: adoption.sex.trim().to_lowercase(),
            max_weight: adoption.max_weight,
            max_age: adoption.max_age,
            allowed_breeds: lowercase_all(&adoption.allowed_breeds),
            blocklist: lowercase_all(&jobs.blocklist),
            reject_excessive_experience: jobs.reject_excessive_experience,
        }
    }

    pub fn is_eligible(&self, listing: &Listing) -> bool {
        match self.rejection(listing) {
            Some(reason) => {
                debug!("Rejected {} ({}): {}", listing.title(), listing.origin(), reason);
                false
            }
            None => true,
        }
    }

    /// Eligible listings, in their original order
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        listings
            .iter()
            .filter(|listing| self.is_eligible(listing))
            .cloned()
            .collect()
    }

    pub fn rejection(&self, listing: &Listing) -> Option<Rejection> {
        match listing {
            Listing::Adoption(dog) => self.adoption_rejection(dog),
            Listing::Job(job) => self.job_rejection(job),
        }
    }

    fn adoption_rejection(&self, dog: &AdoptionListing) -> Option<Rejection> {
        if dog.sex.trim().to_lowercase() != self.sex {
            return Some(Rejection::WrongSex(dog.sex.clone()));
        }

        // Unparseable quantities fail closed
        match weight_pounds(&dog.weight) {
            None => return Some(Rejection::WeightUnparseable(dog.weight.clone())),
            Some(lbs) if lbs > self.max_weight => return Some(Rejection::TooHeavy(lbs)),
            Some(_) => {}
        }

        match age_years(&dog.age) {
            None => return Some(Rejection::AgeUnparseable(dog.age.clone())),
            Some(years) if years > self.max_age => return Some(Rejection::TooOld(years)),
            Some(_) => {}
        }

        let breed = dog.breed.to_lowercase();
        if !self.allowed_breeds.iter().any(|allowed| breed.contains(allowed)) {
            return Some(Rejection::BreedNotAllowed(dog.breed.clone()));
        }

        None
    }

    fn job_rejection(&self, job: &JobListing) -> Option<Rejection> {
        let title = job.title.to_lowercase();
        if let Some(keyword) = self.blocklist.iter().find(|keyword| title.contains(keyword.as_str())) {
            return Some(Rejection::BlockedKeyword(keyword.clone()));
        }

        if self.reject_excessive_experience && requires_excessive_experience(&job.qualifications) {
            return Some(Rejection::ExcessiveExperience);
        }

        None
    }
}

/// True when the qualifications ask for 4 to 10 (or "N+") years of experience
pub fn requires_excessive_experience(qualifications: &[String]) -> bool {
    if qualifications.is_empty() {
        return false;
    }
    let text = qualifications.join(" ").to_lowercase();
    EXCESSIVE_EXPERIENCE.is_match(&text)
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}
