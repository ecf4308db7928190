pub mod store;

pub use store::{IdentityStore, StoreStats};
