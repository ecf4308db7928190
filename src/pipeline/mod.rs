pub mod eligibility;
pub mod dispatch;
pub mod engine;

pub use eligibility::{requires_excessive_experience, EligibilityFilter, Rejection};
pub use dispatch::{DispatchSummary, Dispatcher};
pub use engine::{new_listings, Harvest, Pipeline, RunContext, RunOptions, RunReport};
