//! Open Graph and Twitter Card metadata components.

use maud::{html, Markup};

use crate::constants::SITE_NAME;

/// Open Graph metadata for social media previews.
#[derive(Debug, Clone)]
pub struct OpenGraphMetadata {
    pub title: String,
    pub description: String,
    pub url: String,
    /// `website` or `article`
    pub og_type: String,
    pub image: Option<String>,
}

impl Default for OpenGraphMetadata {
    fn default() -> Self {
        Self {
            title: SITE_NAME.to_string(),
            description: String::new(),
            url: "/".to_string(),
            og_type: "website".to_string(),
            image: None,
        }
    }
}

impl OpenGraphMetadata {
    /// Metadata for a single post.
    #[must_use]
    pub fn article(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: truncate_text(&description.into(), 200),
            url: url.into(),
            og_type: "article".to_string(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Render the Open Graph and Twitter Card meta tags.
    #[must_use]
    pub fn render(&self) -> Markup {
        let card = if self.image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        };

        html! {
            meta property="og:title" content=(self.title);
            @if !self.description.is_empty() {
                meta property="og:description" content=(self.description);
                meta name="description" content=(self.description);
            }
            meta property="og:url" content=(self.url);
            meta property="og:type" content=(self.og_type);
            meta property="og:site_name" content=(SITE_NAME);
            @if let Some(ref image) = self.image {
                meta property="og:image" content=(image);
                meta name="twitter:image" content=(image);
            }
            meta name="twitter:card" content=(card);
            meta name="twitter:title" content=(self.title);
        }
    }
}

/// Truncate to at most `max_chars` characters, ending with `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_text("this is a long sentence", 10), "this is...");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        assert_eq!(truncate_text("sincronização", 8), "sincr...");
    }

    #[test]
    fn test_render_without_image() {
        let html = OpenGraphMetadata::article("Title", "", "/post/a")
            .render()
            .into_string();
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary">"#));
        assert!(!html.contains("og:description"));
        assert!(!html.contains("og:image"));
    }

    #[test]
    fn test_render_with_image() {
        let html = OpenGraphMetadata::article("Title", "Sub", "/post/a")
            .with_image(Some("https://img.example.com/a.png".to_string()))
            .render()
            .into_string();
        assert!(html.contains(r#"<meta property="og:image" content="https://img.example.com/a.png">"#));
        assert!(html.contains("summary_large_image"));
        assert!(html.contains(r#"<meta property="og:description" content="Sub">"#));
    }
}
