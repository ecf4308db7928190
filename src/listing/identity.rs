use serde::{Deserialize, Serialize};

use super::types::{AdoptionListing, JobListing, Listing};

/// Fields that make two adoption listings the same animal.
///
/// The image URL is left out: shelters serve it through CDNs that rewrite it
/// between fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdoptionIdentity {
    pub source: String,
    pub name: String,
    pub breed: String,
    pub sex: String,
    pub age: String,
    pub weight: String,
    pub url: String,
}

/// Employers may retitle a posting or move its URL without it becoming a new job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobIdentity {
    pub employer: String,
    pub req_id: String,
}

/// Durable identity of a listing; this is what the identity store persists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityKey {
    Adoption(AdoptionIdentity),
    Job(JobIdentity),
}

impl AdoptionListing {
    pub fn identity(&self) -> AdoptionIdentity {
        AdoptionIdentity {
            source: self.source.clone(),
            name: self.name.clone(),
            breed: self.breed.clone(),
            sex: self.sex.clone(),
            age: self.age.clone(),
            weight: self.weight.clone(),
            url: self.url.clone(),
        }
    }
}

impl JobListing {
    pub fn identity(&self) -> JobIdentity {
        JobIdentity {
            employer: self.employer.clone(),
            req_id: self.req_id.clone(),
        }
    }
}

impl Listing {
    pub fn identity(&self) -> IdentityKey {
        match self {
            Listing::Adoption(listing) => IdentityKey::Adoption(listing.identity()),
            Listing::Job(listing) => IdentityKey::Job(listing.identity()),
        }
    }

    /// Identity equality, which is weaker than `==` for every variant
    pub fn same_as(&self, other: &Listing) -> bool {
        self.identity() == other.identity()
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityKey::Adoption(id) => write!(f, "{} @ {} ({})", id.name, id.source, id.breed),
            IdentityKey::Job(id) => write!(f, "{} #{}", id.employer, id.req_id),
        }
    }
}
