//! Pagination over the account's media listing.

use crate::api::GraphApi;
use crate::config::validate_page_size;
use crate::error::Result;
use crate::media::Page;

/// Why a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// Empty page or no next cursor.
    Exhausted,
    /// `max_pages` reached.
    PageCap,
    /// The stop marker was listed; it and everything older were left alone.
    ReachedMarker,
    /// A listing request failed.
    Failed,
}

/// Walk options.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub page_size: u32,
    pub max_pages: Option<u32>,
    /// Stop before the item with this id (newest-first listing).
    pub stop_at: Option<String>,
}

/// Cursor-driven walk over `/{account}/media`, one page at a time.
pub struct MediaWalker<'a> {
    api: &'a GraphApi,
    account_id: String,
    options: WalkOptions,
    cursor: Option<String>,
    pages_fetched: u32,
    end: Option<WalkEnd>,
}

impl<'a> MediaWalker<'a> {
    /// Create a walker. The page size is checked here, before any request.
    pub fn new(api: &'a GraphApi, account_id: &str, options: WalkOptions) -> Result<Self> {
        validate_page_size(options.page_size)?;

        Ok(Self {
            api,
            account_id: account_id.to_string(),
            options,
            cursor: None,
            pages_fetched: 0,
            end: None,
        })
    }

    /// Non-empty pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Why the walk ended, once it has.
    pub fn end(&self) -> Option<WalkEnd> {
        self.end
    }

    /// Fetch the next page, or `None` once the walk is over.
    ///
    /// When the stop marker shows up the returned page is cut just before
    /// it and the walk ends, so the caller never sees the marker.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.end.is_some() {
            return Ok(None);
        }

        if let Some(max) = self.options.max_pages {
            if self.pages_fetched >= max {
                tracing::info!("Reached max page limit ({}).", max);
                self.end = Some(WalkEnd::PageCap);
                return Ok(None);
            }
        }

        let page = match self
            .api
            .list_media(
                &self.account_id,
                self.options.page_size,
                self.cursor.as_deref(),
            )
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.end = Some(WalkEnd::Failed);
                return Err(e);
            }
        };

        // A page of only unreadable entries still has a cursor to follow.
        if page.items.is_empty() && page.unreadable == 0 {
            tracing::info!("No more media returned by API.");
            self.end = Some(WalkEnd::Exhausted);
            return Ok(None);
        }

        self.pages_fetched += 1;
        let mut items = page.items;

        if let Some(marker) = self.options.stop_at.as_deref() {
            if let Some(pos) = items.iter().position(|item| item.id == marker) {
                tracing::info!("Reached previously archived media id {}; stopping.", marker);
                items.truncate(pos);
                self.end = Some(WalkEnd::ReachedMarker);
            }
        }

        if self.end.is_none() {
            match page.next_cursor {
                Some(cursor) => self.cursor = Some(cursor),
                None => self.end = Some(WalkEnd::Exhausted),
            }
        }

        let next_cursor = if self.end.is_none() {
            self.cursor.clone()
        } else {
            None
        };

        Ok(Some(Page {
            items,
            next_cursor,
            unreadable: page.unreadable,
        }))
    }
}
