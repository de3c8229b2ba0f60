//! Base layout components for the blog.
//!
//! This module provides the page skeleton: head, logo header and the main
//! content container.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::metadata::OpenGraphMetadata;
use crate::constants::SITE_NAME;

/// Inline critical styles so pre-rendered pages work without an asset server.
const CRITICAL_STYLE: &str = r"
:root { --bg: #1a1d23; --surface: #282a36; --text: #d7d7d7; --heading: #f8f8f8; --muted: #bbbbbb; --accent: #ff57b2; }
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: Inter, system-ui, sans-serif; }
.container { max-width: 720px; margin: 0 auto; padding: 0 1rem; }
.site-header { padding: 4rem 0 3rem; }
.site-logo { color: var(--heading); font-size: 1.75rem; font-weight: 800; text-decoration: none; }
.site-logo span { color: var(--accent); }
.post-list a { color: inherit; text-decoration: none; }
.post-list article { margin-bottom: 3rem; }
.post-list h2 { color: var(--heading); font-size: 1.75rem; }
.post-list p { margin: 0.5rem 0 1.5rem; font-size: 1.125rem; }
.post-info { display: flex; gap: 1.5rem; color: var(--muted); font-size: 0.875rem; }
.load-more { color: var(--accent); font-weight: 600; text-decoration: none; }
.banner { width: 100%; max-height: 400px; object-fit: cover; }
.post h1 { color: var(--heading); font-size: 3rem; margin: 5rem 0 1.5rem; }
.post section { margin-top: 4rem; }
.post h2 { color: var(--heading); margin-bottom: 2rem; }
.post .body p { line-height: 2rem; margin-bottom: 1rem; }
.error { border-left: 4px solid var(--accent); padding: 1rem; margin: 2rem 0; }
";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("Home | spacetraveling").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    og_metadata: Option<OpenGraphMetadata>,
    wide_banner: Option<&'a str>,
}

impl<'a> BaseLayout<'a> {
    /// Create a layout with the given document title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            og_metadata: None,
            wide_banner: None,
        }
    }

    /// Set the Open Graph metadata for social media previews.
    #[must_use]
    pub fn with_og_metadata(mut self, metadata: OpenGraphMetadata) -> Self {
        self.og_metadata = Some(metadata);
        self
    }

    /// Show a full-width banner image between the header and the content.
    #[must_use]
    pub fn with_banner(mut self, url: Option<&'a str>) -> Self {
        self.wide_banner = url;
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content is placed inside `<main class="container">`.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="pt-BR" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) }

                    @if let Some(ref og) = self.og_metadata {
                        (og.render())
                    }

                    style { (PreEscaped(CRITICAL_STYLE)) }
                }
                body {
                    (Self::render_header())
                    @if let Some(url) = self.wide_banner {
                        img class="banner" src=(url) alt="banner";
                    }
                    main class="container" {
                        (content)
                    }
                }
            }
        }
    }

    fn render_header() -> Markup {
        html! {
            header class="container site-header" {
                a class="site-logo" href="/" aria-label="logo" {
                    (SITE_NAME) span { "." }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Home | spacetraveling")
            .render(content)
            .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="pt-BR">"#));
        assert!(html.contains("<title>Home | spacetraveling</title>"));
        assert!(html.contains(r#"<main class="container"><h1>Test Content</h1></main>"#));
        assert!(html.contains(r#"<a class="site-logo" href="/" aria-label="logo">"#));
    }

    #[test]
    fn test_base_layout_escapes_title() {
        let html = BaseLayout::new("Post | <Hooks & Co>")
            .render(html! {})
            .into_string();
        assert!(html.contains("<title>Post | &lt;Hooks &amp; Co&gt;</title>"));
    }

    #[test]
    fn test_base_layout_banner() {
        let html = BaseLayout::new("Post")
            .with_banner(Some("https://images.example.com/banner.png"))
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"<img class="banner" src="https://images.example.com/banner.png""#));

        let html = BaseLayout::new("Post").render(html! {}).into_string();
        assert!(!html.contains("class=\"banner\""));
    }

    #[test]
    fn test_base_layout_og_metadata() {
        let og = OpenGraphMetadata::article("Como utilizar Hooks", "Pensando em sincronização", "/post/hooks");
        let html = BaseLayout::new("Post")
            .with_og_metadata(og)
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"<meta property="og:title" content="Como utilizar Hooks">"#));
    }
}
