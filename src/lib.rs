pub mod config;
pub mod error;
pub mod listing;
pub mod notify;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{HarvestError, Result};
pub use listing::{IdentityKey, Listing};
pub use pipeline::{Pipeline, RunContext, RunReport};
