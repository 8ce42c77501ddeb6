//! Directory bootstrap: resolve placeholder account names from the platform.
//!
//! An account's display name is not returned by the listing endpoint, so one
//! video is listed and its author profile looked up.

use playwatch_data::{Account, AccountDirectory, DirectoryError};
use playwatch_haokan::VideoSource;
use std::time::Duration;
use tracing::{info, warn};

/// Resolves display names for accounts still carrying a placeholder.
///
/// Accounts that already have a real name are kept as-is. Resolution is best
/// effort: any failure leaves the placeholder in place.
pub async fn resolve_account_names<S: VideoSource + ?Sized>(
    source: &S,
    accounts: &[Account],
    delay: Duration,
) -> Vec<Account> {
    let mut resolved = Vec::with_capacity(accounts.len());
    let mut looked_up = 0usize;

    for account in accounts {
        if !account.has_placeholder_name() {
            resolved.push(account.clone());
            continue;
        }

        if looked_up > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        looked_up += 1;

        let name = match lookup_name(source, &account.id).await {
            Some(name) => {
                info!(account_id = %account.id, name = %name, "Resolved account name");
                name
            }
            None => {
                warn!(account_id = %account.id, "Could not resolve account name, keeping placeholder");
                Account::default_name(&account.id)
            }
        };
        resolved.push(Account::new(account.id.clone(), name));
    }

    resolved
}

async fn lookup_name<S: VideoSource + ?Sized>(source: &S, account_id: &str) -> Option<String> {
    let page = match source.fetch_listing_page(account_id, None, 1).await {
        Ok(page) => page,
        Err(e) => {
            warn!(account_id, error = %e, "Listing lookup failed");
            return None;
        }
    };
    let sample = page.entries.first()?;
    source.fetch_author_display_name(&sample.video_id).await
}

/// Loads the directory, resolves placeholder names and writes it back.
///
/// # Errors
/// Returns an error if the directory is missing, malformed or cannot be
/// rewritten.
pub async fn bootstrap_directory<S: VideoSource + ?Sized>(
    source: &S,
    directory: &AccountDirectory,
    delay: Duration,
) -> Result<Vec<Account>, DirectoryError> {
    let accounts = directory.load()?;
    let resolved = resolve_account_names(source, &accounts, delay).await;
    directory.replace(&resolved)?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use playwatch_haokan::{AuthorInfo, HaokanError, ListingPage, VideoEntry};
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Maps account -> sample video and video -> author name.
    #[derive(Default)]
    struct ProfileSource {
        samples: HashMap<String, String>,
        authors: HashMap<String, String>,
    }

    #[async_trait]
    impl VideoSource for ProfileSource {
        async fn fetch_listing_page(
            &self,
            account_id: &str,
            _cursor: Option<&str>,
            page_size: u32,
        ) -> playwatch_haokan::Result<ListingPage> {
            assert_eq!(page_size, 1);
            let entries = self
                .samples
                .get(account_id)
                .map(|vid| {
                    vec![VideoEntry {
                        video_id: vid.clone(),
                        title: String::new(),
                        publish_time: String::new(),
                        play_count: String::new(),
                        play_count_text: String::new(),
                        duration: String::new(),
                        cover_url: String::new(),
                    }]
                })
                .unwrap_or_default();
            Ok(ListingPage {
                entries,
                ..ListingPage::default()
            })
        }

        async fn fetch_author_info(
            &self,
            sample_video_id: &str,
        ) -> playwatch_haokan::Result<Option<AuthorInfo>> {
            match self.authors.get(sample_video_id) {
                Some(name) => Ok(Some(AuthorInfo {
                    name: name.clone(),
                    ..AuthorInfo::default()
                })),
                None => Err(HaokanError::platform(1, "no author")),
            }
        }
    }

    fn source() -> ProfileSource {
        let mut source = ProfileSource::default();
        source.samples.insert("1".to_string(), "v1".to_string());
        source.authors.insert("v1".to_string(), "Creator One".to_string());
        source.samples.insert("2".to_string(), "v2".to_string());
        source
    }

    #[tokio::test]
    async fn test_resolves_only_placeholders() {
        let accounts = vec![
            Account::unnamed("1"),
            Account::new("3", "Already Named"),
            Account::unnamed("2"),
            Account::new("4", ""),
            Account::new("1", "用户_1"),
        ];

        let resolved = resolve_account_names(&source(), &accounts, Duration::ZERO).await;
        assert_eq!(
            resolved,
            vec![
                Account::new("1", "Creator One"),
                Account::new("3", "Already Named"),
                Account::unnamed("2"),
                Account::unnamed("4"),
                Account::new("1", "Creator One"),
            ]
        );
    }

    #[tokio::test]
    async fn test_bootstrap_rewrites_legacy_id_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.json");
        std::fs::write(&path, r#"["1", 2]"#).unwrap();
        let directory = AccountDirectory::new(&path);

        let resolved = bootstrap_directory(&source(), &directory, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(resolved[0].display_name, "Creator One");
        assert_eq!(directory.load().unwrap(), resolved);
    }

    #[tokio::test]
    async fn test_bootstrap_requires_directory() {
        let dir = TempDir::new().unwrap();
        let directory = AccountDirectory::new(dir.path().join("missing.json"));
        assert!(matches!(
            bootstrap_directory(&source(), &directory, Duration::ZERO).await,
            Err(DirectoryError::NotFound(_))
        ));
    }
}
