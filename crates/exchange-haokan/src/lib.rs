//! Haokan creator listing integration for the play-count monitor.
//!
//! This crate provides:
//! - REST client with rate limiting for the author listing and author info endpoints
//! - Cursor pagination over an author's full listing
//! - The [`VideoSource`] seam ingestion is written against
//!
//! # Example
//!
//! ```ignore
//! use playwatch_haokan::{HaokanClient, HaokanClientConfig, ListingPages};
//!
//! #[tokio::main]
//! async fn main() -> playwatch_haokan::Result<()> {
//!     let client = HaokanClient::new(HaokanClientConfig::default())?;
//!     let videos = ListingPages::new(&client, "1844117067895852", 20)
//!         .collect_entries()
//!         .await?;
//!     println!("{} videos", videos.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::{HaokanClient, HaokanClientConfig, HAOKAN_AUTHOR_INFO_URL, HAOKAN_LISTING_URL};
pub use error::{HaokanError, Result};
pub use source::{ListingPages, VideoSource};
pub use types::{AuthorInfo, ListingPage, VideoEntry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_exports() {
        let _ = HaokanClientConfig::default();
        let _ = ListingPage::default();
        let _ = AuthorInfo::default();
    }

    #[test]
    fn test_constants_accessible() {
        assert!(HAOKAN_LISTING_URL.starts_with("https://"));
        assert!(HAOKAN_AUTHOR_INFO_URL.starts_with("https://"));
    }
}
