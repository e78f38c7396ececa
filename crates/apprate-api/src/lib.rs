//! Shared types for apprate
//!
//! This crate defines the vocabulary exchanged between the engine and the
//! presentation layer that embeds it:
//! - Persisted user decisions
//! - The half-star rating scale
//! - Response events (presentation layer -> engine)
//! - Next actions and prompt decisions (engine -> presentation layer)

mod events;
mod types;

pub use events::*;
pub use types::*;

/// Base URL of a store listing; the package identifier is appended.
pub const STORE_LISTING_BASE_URL: &str = "https://play.google.com/store/apps/details?id=";

/// Build the store listing URL for a package identifier.
pub fn store_listing_url(package_id: &str) -> String {
    format!("{}{}", STORE_LISTING_BASE_URL, package_id)
}
