//! Video source abstraction and listing pagination.
//!
//! Ingestion only depends on [`VideoSource`], so tests can swap the HTTP
//! client for an in-memory source.

use crate::error::Result;
use crate::types::{AuthorInfo, ListingPage, VideoEntry};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can list an author's videos page by page.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetches one listing page. `cursor` is `None` for the first page.
    async fn fetch_listing_page(
        &self,
        account_id: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListingPage>;

    /// Fetches author profile information via one of the author's videos.
    async fn fetch_author_info(&self, sample_video_id: &str) -> Result<Option<AuthorInfo>>;

    /// Best-effort display name lookup; failures are logged and yield `None`.
    async fn fetch_author_display_name(&self, sample_video_id: &str) -> Option<String> {
        match self.fetch_author_info(sample_video_id).await {
            Ok(Some(info)) if !info.name.is_empty() => Some(info.name),
            Ok(_) => None,
            Err(e) => {
                warn!(video_id = sample_video_id, error = %e, "Author info lookup failed");
                None
            }
        }
    }
}

/// Lazy, restartable walk over an author's listing pages.
///
/// Stops when the source reports no more pages, returns a page without
/// videos, omits the next cursor, or the page cap is reached.
pub struct ListingPages<'a, S: VideoSource + ?Sized> {
    source: &'a S,
    account_id: String,
    page_size: u32,
    page_delay: Duration,
    max_pages: u32,
    cursor: Option<String>,
    pages_fetched: u32,
    finished: bool,
}

impl<'a, S: VideoSource + ?Sized> ListingPages<'a, S> {
    /// Creates a pager positioned before the first page.
    pub fn new(source: &'a S, account_id: impl Into<String>, page_size: u32) -> Self {
        Self {
            source,
            account_id: account_id.into(),
            page_size,
            page_delay: Duration::ZERO,
            max_pages: u32::MAX,
            cursor: None,
            pages_fetched: 0,
            finished: false,
        }
    }

    /// Sets the pause inserted before every page after the first.
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Sets the maximum number of pages fetched before giving up.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Number of pages fetched since the last (re)start.
    #[must_use]
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Rewinds to the first page.
    pub fn restart(&mut self) {
        self.cursor = None;
        self.pages_fetched = 0;
        self.finished = false;
    }

    /// Fetches the next page, or `Ok(None)` once the listing is exhausted.
    ///
    /// # Errors
    /// Returns the source error; the pager stays positioned on the failed page.
    pub async fn next_page(&mut self) -> Result<Option<ListingPage>> {
        if self.finished {
            return Ok(None);
        }
        if self.pages_fetched >= self.max_pages {
            warn!(
                account_id = %self.account_id,
                max_pages = self.max_pages,
                "Page cap reached, truncating listing"
            );
            self.finished = true;
            return Ok(None);
        }

        if self.pages_fetched > 0 && !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }

        let page = self
            .source
            .fetch_listing_page(&self.account_id, self.cursor.as_deref(), self.page_size)
            .await?;
        self.pages_fetched += 1;

        if page.is_last() {
            self.finished = true;
        } else if let Some(next) = &page.next_cursor {
            self.cursor = Some(next.clone());
        } else {
            warn!(account_id = %self.account_id, "More pages reported without a cursor");
            self.finished = true;
        }

        debug!(
            account_id = %self.account_id,
            page = self.pages_fetched,
            videos = page.entries.len(),
            has_more = page.has_more,
            "Fetched listing page"
        );
        Ok(Some(page))
    }

    /// Drains the remaining pages into one list.
    ///
    /// # Errors
    /// Returns the first source error encountered.
    pub async fn collect_entries(mut self) -> Result<Vec<VideoEntry>> {
        let mut entries = Vec::new();
        while let Some(page) = self.next_page().await? {
            entries.extend(page.entries);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HaokanError;
    use std::sync::Mutex;

    fn entry(id: &str) -> VideoEntry {
        VideoEntry {
            video_id: id.to_string(),
            title: format!("title {id}"),
            publish_time: String::new(),
            play_count: "1".to_string(),
            play_count_text: String::new(),
            duration: String::new(),
            cover_url: String::new(),
        }
    }

    /// Serves pre-baked pages keyed by cursor and records requested cursors.
    struct PagedSource {
        pages: Vec<ListingPage>,
        fail_on_cursor: Option<String>,
        seen: Mutex<Vec<Option<String>>>,
    }

    impl PagedSource {
        fn new(pages: Vec<ListingPage>) -> Self {
            Self {
                pages,
                fail_on_cursor: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VideoSource for PagedSource {
        async fn fetch_listing_page(
            &self,
            _account_id: &str,
            cursor: Option<&str>,
            _page_size: u32,
        ) -> Result<ListingPage> {
            self.seen.lock().unwrap().push(cursor.map(str::to_string));
            if cursor.is_some() && cursor == self.fail_on_cursor.as_deref() {
                return Err(HaokanError::Network("reset".to_string()));
            }
            let index = cursor.map_or(0, |c| c.parse::<usize>().unwrap());
            Ok(self.pages[index].clone())
        }

        async fn fetch_author_info(&self, _sample_video_id: &str) -> Result<Option<AuthorInfo>> {
            Ok(None)
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> ListingPage {
        ListingPage {
            entries: ids.iter().map(|id| entry(id)).collect(),
            has_more: next.is_some(),
            next_cursor: next.map(str::to_string),
            response_count: ids.len() as i64,
        }
    }

    #[tokio::test]
    async fn test_walks_until_has_more_clears() {
        let source = PagedSource::new(vec![
            page(&["a", "b"], Some("1")),
            page(&["c"], Some("2")),
            page(&["d"], None),
        ]);

        let entries = ListingPages::new(&source, "acc", 20)
            .collect_entries()
            .await
            .unwrap();

        let ids: Vec<_> = entries.iter().map(|e| e.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(
            *source.seen.lock().unwrap(),
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_page_terminates() {
        let mut empty = page(&[], Some("2"));
        empty.has_more = true;
        let source = PagedSource::new(vec![page(&["a"], Some("1")), empty, page(&["z"], None)]);

        let entries = ListingPages::new(&source, "acc", 20)
            .collect_entries()
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(source.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_page_cap() {
        let source = PagedSource::new(vec![page(&["a"], Some("1")), page(&["b"], Some("0"))]);

        let mut pages = ListingPages::new(&source, "acc", 20).with_max_pages(3);
        let mut count = 0;
        while pages.next_page().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(pages.pages_fetched(), 3);
    }

    #[tokio::test]
    async fn test_restart_after_failure() {
        let mut source = PagedSource::new(vec![page(&["a"], Some("1")), page(&["b"], None)]);
        source.fail_on_cursor = Some("1".to_string());

        let mut pages = ListingPages::new(&source, "acc", 20);
        assert!(pages.next_page().await.unwrap().is_some());
        assert!(pages.next_page().await.is_err());

        pages.restart();
        assert_eq!(pages.pages_fetched(), 0);
        let first = pages.next_page().await.unwrap().unwrap();
        assert_eq!(first.entries[0].video_id, "a");
    }

    #[tokio::test]
    async fn test_display_name_default_method() {
        let source = PagedSource::new(vec![]);
        assert_eq!(source.fetch_author_display_name("v").await, None);
    }
}
