//! Home page: the accumulated post listing.

use maud::{html, Markup};

use crate::components::{Alert, BaseLayout, LinkStyle, LoadMoreLink, OpenGraphMetadata, PostInfo};
use crate::content::PostSummary;
use crate::listing::Listing;

/// Parameters for the home page.
#[derive(Debug, Clone)]
pub struct HomePageParams<'a> {
    pub posts: &'a [PostSummary],
    pub pages_loaded: usize,
    pub cursor: Option<&'a str>,
    /// Set when loading a further page failed; the posts above are still shown.
    pub load_error: Option<&'a str>,
    pub link_style: LinkStyle,
}

impl<'a> HomePageParams<'a> {
    #[must_use]
    pub fn from_listing(listing: &'a Listing, load_error: Option<&'a str>) -> Self {
        Self {
            posts: listing.posts(),
            pages_loaded: listing.pages_loaded(),
            cursor: listing.next_page(),
            load_error,
            link_style: LinkStyle::Query,
        }
    }

    /// Point "load more" at pre-rendered listing files.
    #[must_use]
    pub const fn for_static_build(mut self) -> Self {
        self.link_style = LinkStyle::StaticFile;
        self
    }
}

fn render_post_card(post: &PostSummary) -> Markup {
    html! {
        article {
            a href=(format!("/post/{}", post.uid)) {
                h2 { (post.title) }
                @if !post.subtitle.is_empty() {
                    p { (post.subtitle) }
                }
                (PostInfo::new(post.first_publication_date.as_ref(), &post.author))
            }
        }
    }
}

/// Render the home page.
#[must_use]
pub fn render_home_page(params: &HomePageParams<'_>) -> Markup {
    let load_more =
        LoadMoreLink::new(params.pages_loaded, params.cursor).with_style(params.link_style);
    let retry_url = load_more.next_url();

    let content = html! {
        section class="post-list" {
            @for post in params.posts {
                (render_post_card(post))
            }
        }

        @if let Some(message) = params.load_error {
            (Alert::error(message).with_action("Tentar novamente", &retry_url))
        } @else {
            (load_more)
        }
    };

    let og = OpenGraphMetadata::default();
    BaseLayout::new("Home | spacetraveling")
        .with_og_metadata(og)
        .render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn summary(uid: &str) -> PostSummary {
        PostSummary {
            uid: uid.to_string(),
            first_publication_date: Some(
                DateTime::parse_from_rfc3339("2021-03-15T19:25:28+00:00").unwrap(),
            ),
            title: format!("Title {uid}"),
            subtitle: format!("Subtitle {uid}"),
            author: "Joseph Oliveira".to_string(),
        }
    }

    #[test]
    fn test_home_lists_posts_in_order() {
        let posts = vec![summary("first"), summary("second")];
        let html = render_home_page(&HomePageParams {
            posts: &posts,
            pages_loaded: 1,
            cursor: None,
            load_error: None,
            link_style: LinkStyle::Query,
        })
        .into_string();

        assert!(html.contains("<title>Home | spacetraveling</title>"));
        assert!(html.contains(r#"<a href="/post/first">"#));
        let first = html.find("Title first").unwrap();
        let second = html.find("Title second").unwrap();
        assert!(first < second);
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("Subtitle first"));
    }

    #[test]
    fn test_load_more_only_with_cursor() {
        let posts = vec![summary("a")];
        let without = render_home_page(&HomePageParams {
            posts: &posts,
            pages_loaded: 1,
            cursor: None,
            load_error: None,
            link_style: LinkStyle::Query,
        })
        .into_string();
        assert!(!without.contains("Carregar mais posts"));

        let with = render_home_page(&HomePageParams {
            posts: &posts,
            pages_loaded: 2,
            cursor: Some("https://cms.example.com/next"),
            load_error: None,
            link_style: LinkStyle::Query,
        })
        .into_string();
        assert!(with.contains("Carregar mais posts"));
        assert!(with.contains(r#"href="/?pages=3""#));
    }

    #[test]
    fn test_load_error_keeps_posts_and_offers_retry() {
        let posts = vec![summary("a")];
        let html = render_home_page(&HomePageParams {
            posts: &posts,
            pages_loaded: 1,
            cursor: Some("https://cms.example.com/next"),
            load_error: Some("Não foi possível carregar mais posts."),
            link_style: LinkStyle::Query,
        })
        .into_string();
        assert!(html.contains("Title a"));
        assert!(html.contains("Não foi possível carregar mais posts."));
        assert!(html.contains(r#"<a href="/?pages=2">Tentar novamente</a>"#));
        assert!(!html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_empty_listing() {
        let html = render_home_page(&HomePageParams {
            posts: &[],
            pages_loaded: 1,
            cursor: None,
            load_error: None,
            link_style: LinkStyle::Query,
        })
        .into_string();
        assert!(html.contains(r#"<section class="post-list"></section>"#));
    }
}
