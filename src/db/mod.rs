//! Database layer (hosted data API).

pub mod store;

pub use store::{MockRows, RestStore};

/// Table names as constants.
pub mod tables {
    pub const USER_PROFILES: &str = "user_profiles";
    pub const DEALS: &str = "deals";
    pub const DEAL_TAGS: &str = "deal_tags";
}
