//! Per-list browsing on top of the archive parsers.
//!
//! Holds the current page of every opened list and serializes navigation
//! per list: while one navigation on a list is in flight, another on the same
//! list fails fast with [`BrowseError::Busy`]. Held state is swapped only
//! after the fetch and parse of the new page succeed.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::archive::{
    ArchiveContext, MailingList, MessagePage, Navigation, merge_page, parse_mailing_lists,
    parse_message_page, urls,
};
use crate::fetcher::{FetchError, PageSource};

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("a navigation is already in progress for '{0}'")]
    Busy(String),

    #[error("no {direction:?} page known for '{list}'")]
    NoCursor {
        list: String,
        direction: Navigation,
    },

    #[error("cannot resolve cursor '{0}'")]
    BadCursor(String),
}

/// What is currently held for one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListState {
    pub page: MessagePage,
    pub end_reached: bool,
    /// URL the held page was fetched from.
    pub url: Option<String>,
}

pub struct ArchiveBrowser<S> {
    source: S,
    base_url: String,
    lists: DashMap<String, Arc<Mutex<ListState>>>,
}

impl<S: PageSource> ArchiveBrowser<S> {
    pub fn new(source: S, base_url: &str) -> Self {
        Self {
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
            lists: DashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists on the archive's root index, sorted by name.
    #[instrument(skip(self))]
    pub async fn mailing_lists(&self) -> Result<Vec<MailingList>, BrowseError> {
        let html = self.source.fetch_html(&format!("{}/", self.base_url)).await?;
        let lists = parse_mailing_lists(&html);
        info!(count = lists.len(), "loaded mailing lists");
        Ok(lists)
    }

    /// Load the first page of `list`, discarding anything held for it.
    pub async fn open(&self, list: &str) -> Result<ListState, BrowseError> {
        let url = urls::list_url(&self.base_url, list);
        self.navigate(list, Navigation::Latest, Some(url)).await
    }

    /// Jump to the newest page, via the held "latest" cursor when there is one.
    pub async fn latest(&self, list: &str) -> Result<ListState, BrowseError> {
        self.navigate(list, Navigation::Latest, None).await
    }

    pub async fn older(&self, list: &str) -> Result<ListState, BrowseError> {
        self.navigate(list, Navigation::Older, None).await
    }

    pub async fn newer(&self, list: &str) -> Result<ListState, BrowseError> {
        self.navigate(list, Navigation::Newer, None).await
    }

    /// Copy of the state held for `list`, if a page of it was ever loaded.
    pub async fn snapshot(&self, list: &str) -> Option<ListState> {
        let slot = self.lists.get(list).map(|entry| entry.value().clone())?;
        let state = slot.lock().await;
        Some(state.clone())
    }

    /// Fetch the `/all/` thread view of a message.
    #[instrument(skip(self))]
    pub async fn thread(&self, message_id: &str) -> Result<MessagePage, BrowseError> {
        let url = urls::thread_url(&self.base_url, message_id);
        let html = self.source.fetch_html(&url).await?;
        Ok(parse_message_page(&html, &ArchiveContext::all(&self.base_url)))
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Result<MessagePage, BrowseError> {
        let url = urls::search_url(&self.base_url, query, page);
        let html = self.source.fetch_html(&url).await?;
        Ok(parse_message_page(&html, &ArchiveContext::all(&self.base_url)))
    }

    fn slot(&self, list: &str) -> Arc<Mutex<ListState>> {
        self.lists.entry(list.to_string()).or_default().clone()
    }

    #[instrument(skip(self, url))]
    async fn navigate(
        &self,
        list: &str,
        navigation: Navigation,
        url: Option<String>,
    ) -> Result<ListState, BrowseError> {
        let slot = self.slot(list);
        let mut state = slot
            .try_lock()
            .map_err(|_| BrowseError::Busy(list.to_string()))?;

        let result = self.load(list, navigation, url, &mut state).await;
        let never_loaded = state.url.is_none();
        drop(state);

        if result.is_err() && never_loaded {
            self.forget_unloaded(list);
        }
        result
    }

    async fn load(
        &self,
        list: &str,
        navigation: Navigation,
        url: Option<String>,
        state: &mut ListState,
    ) -> Result<ListState, BrowseError> {
        let ctx = ArchiveContext::new(&self.base_url, list);
        let url = match url {
            Some(url) => url,
            None => self.target_url(&ctx, state, navigation)?,
        };

        let html = self.source.fetch_html(&url).await?;
        let outcome = merge_page(
            &state.page.messages,
            parse_message_page(&html, &ctx),
            navigation,
        );

        *state = ListState {
            page: outcome.page,
            end_reached: outcome.end_reached,
            url: Some(url),
        };
        info!(
            messages = state.page.len(),
            end_reached = state.end_reached,
            "navigated"
        );
        Ok(state.clone())
    }

    /// Drop the slot of a list that never loaded, unless another navigation
    /// has picked it up meanwhile.
    fn forget_unloaded(&self, list: &str) {
        let removed = self.lists.remove_if(list, |_, slot| {
            slot.try_lock().is_ok_and(|state| state.url.is_none())
        });
        if removed.is_some() {
            debug!(list, "forgot list that never loaded");
        }
    }

    fn target_url(
        &self,
        ctx: &ArchiveContext,
        state: &ListState,
        navigation: Navigation,
    ) -> Result<String, BrowseError> {
        let cursors = &state.page.cursors;
        let cursor = match navigation {
            Navigation::Older => cursors.next_url.as_deref(),
            Navigation::Newer => cursors.prev_url.as_deref(),
            Navigation::Latest => match cursors.latest_url.as_deref() {
                Some(latest) => Some(latest),
                None => return Ok(ctx.list_url()),
            },
        };
        let cursor = cursor.ok_or_else(|| BrowseError::NoCursor {
            list: ctx.list().to_string(),
            direction: navigation,
        })?;
        ctx.resolve_cursor(cursor)
            .ok_or_else(|| BrowseError::BadCursor(cursor.to_string()))
    }
}
