//! "Load more" control for the post listing.
//!
//! The link works without scripts: it points at a listing with one more page
//! of accumulated posts, either `/?pages=N` on the server or the pre-rendered
//! `/page/N.html` of a static build. The current cursor is exposed as
//! `data-api` for clients that would rather fetch `/api/posts` themselves.

use maud::{html, Markup, Render};
use urlencoding::encode;

pub const LOAD_MORE_LABEL: &str = "Carregar mais posts";

/// Where the accumulated listings live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// Rendered on request: `/?pages=N`.
    #[default]
    Query,
    /// Written by a static build: `/page/N.html`.
    StaticFile,
}

#[derive(Debug, Clone)]
pub struct LoadMoreLink<'a> {
    /// Pages currently shown
    pub pages_loaded: usize,
    /// Cursor for the next page; `None` hides the control
    pub cursor: Option<&'a str>,
    pub style: LinkStyle,
}

impl<'a> LoadMoreLink<'a> {
    #[must_use]
    pub const fn new(pages_loaded: usize, cursor: Option<&'a str>) -> Self {
        Self {
            pages_loaded,
            cursor,
            style: LinkStyle::Query,
        }
    }

    #[must_use]
    pub const fn with_style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    /// URL that renders one more page than is currently shown.
    #[must_use]
    pub fn next_url(&self) -> String {
        listing_url(self.style, self.pages_loaded + 1)
    }

    /// JSON endpoint URL for the current cursor.
    #[must_use]
    pub fn api_url(&self) -> Option<String> {
        self.cursor
            .map(|cursor| format!("/api/posts?cursor={}", encode(cursor)))
    }

    #[must_use]
    pub const fn should_display(&self) -> bool {
        self.cursor.is_some()
    }
}

/// URL of the listing that shows `pages` accumulated pages.
fn listing_url(style: LinkStyle, pages: usize) -> String {
    match style {
        LinkStyle::Query => format!("/?pages={pages}"),
        LinkStyle::StaticFile => format!("/page/{pages}.html"),
    }
}

impl Render for LoadMoreLink<'_> {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        html! {
            a class="load-more" href=(self.next_url()) data-api=[self.api_url()] {
                (LOAD_MORE_LABEL)
            }
        }
    }
}
