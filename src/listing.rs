//! Accumulated post listing for one view.
//!
//! A [`Listing`] starts from the first page produced at generation time and
//! grows as "load more" follows the API's `next_page` cursor. Pages are
//! appended in cursor order and never de-duplicated.
//!
//! Each listing carries a cancellation token scoped to its view. Tearing the
//! view down cancels it, and a fetch that resolves afterwards is dropped
//! instead of being merged into a list nobody is looking at.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::content::{ContentApi, ContentError, PostPage, PostSummary};

/// Outcome of a successful [`Listing::load_more`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// The next page arrived and this many posts were appended.
    Appended(usize),
    /// There is no cursor left; nothing was fetched.
    Exhausted,
    /// The view was closed before the fetch resolved; the result was dropped.
    Discarded,
}

#[derive(Debug, Error)]
pub enum ListingError {
    /// The next page could not be loaded. The accumulated posts and the
    /// cursor are unchanged, so the same call can be retried.
    #[error("failed to load more posts: {0}")]
    Fetch(#[source] ContentError),
}

impl ListingError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_retryable(),
        }
    }
}

#[derive(Debug)]
pub struct Listing {
    posts: Vec<PostSummary>,
    next_page: Option<String>,
    /// Number of posts that came from the initial page.
    initial_len: usize,
    pages_loaded: usize,
    scope: CancellationToken,
}

impl Listing {
    #[must_use]
    pub fn new(initial: PostPage) -> Self {
        Self::with_scope(initial, CancellationToken::new())
    }

    /// Create a listing whose lifetime is bound to `scope`, e.g. a child of a
    /// server-wide shutdown token.
    #[must_use]
    pub fn with_scope(initial: PostPage, scope: CancellationToken) -> Self {
        let initial_len = initial.results.len();
        Self {
            posts: initial.results,
            next_page: initial.next_page,
            initial_len,
            pages_loaded: 1,
            scope,
        }
    }

    #[must_use]
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    /// The cursor the next [`Listing::load_more`] will follow.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref().filter(|c| !c.is_empty())
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page().is_some()
    }

    #[must_use]
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// A handle that closes this view when cancelled.
    #[must_use]
    pub fn scope(&self) -> CancellationToken {
        self.scope.clone()
    }

    pub fn close(&self) {
        self.scope.cancel();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Fetch the page behind the current cursor and append it.
    ///
    /// Without a cursor this is a no-op. The posts and the cursor are updated
    /// together once the fetch resolves, so a failure leaves both untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Fetch`] if the page cannot be fetched or does
    /// not parse as a page of posts.
    pub async fn load_more(&mut self, api: &dyn ContentApi) -> Result<LoadMore, ListingError> {
        let Some(cursor) = self.next_page().map(str::to_owned) else {
            return Ok(LoadMore::Exhausted);
        };
        if self.is_closed() {
            return Ok(LoadMore::Discarded);
        }

        debug!(cursor = %cursor, loaded = self.posts.len(), "Loading more posts");

        let fetched = tokio::select! {
            biased;
            () = self.scope.cancelled() => {
                debug!("View closed while loading more posts");
                return Ok(LoadMore::Discarded);
            }
            result = api.fetch_page(&cursor) => result,
        };

        let page = fetched.and_then(PostPage::from_api).map_err(|e| {
            warn!(cursor = %cursor, "Failed to load more posts: {e}");
            ListingError::Fetch(e)
        })?;

        let appended = page.results.len();
        self.posts.extend(page.results);
        self.next_page = page.next_page;
        self.pages_loaded += 1;

        debug!(appended, total = self.posts.len(), "Loaded more posts");
        Ok(LoadMore::Appended(appended))
    }

    /// Keep loading until `pages` pages are present or the cursor runs out.
    ///
    /// # Errors
    ///
    /// Stops at the first failed page; pages loaded before it are kept.
    pub async fn load_pages(
        &mut self,
        api: &dyn ContentApi,
        pages: usize,
    ) -> Result<usize, ListingError> {
        while self.pages_loaded < pages {
            match self.load_more(api).await? {
                LoadMore::Appended(_) => {}
                LoadMore::Exhausted | LoadMore::Discarded => break,
            }
        }
        Ok(self.pages_loaded)
    }

    /// Apply a regenerated first page.
    ///
    /// Before the view has paged forward this simply replaces the listing.
    /// After, only the first-page segment is swapped; appended pages and the
    /// latest cursor are kept so the reader does not lose their place.
    pub fn refresh(&mut self, page: PostPage) {
        if self.pages_loaded <= 1 {
            self.initial_len = page.results.len();
            self.posts = page.results;
            self.next_page = page.next_page;
            return;
        }

        let appended = self.posts.split_off(self.initial_len);
        let mut posts = page.results;
        self.initial_len = posts.len();
        posts.extend(appended);
        self.posts = posts;
    }
}
