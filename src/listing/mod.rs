pub mod types;
pub mod identity;
pub mod quantity;

pub use types::{AdoptionListing, JobListing, Listing};
pub use identity::{AdoptionIdentity, IdentityKey, JobIdentity};
pub use quantity::{age_years, parse_age, parse_weight, weight_pounds};
