//! Publication date, author and reading time line shown under post titles.

use chrono::{DateTime, FixedOffset, Locale};
use maud::{html, Markup, Render};

/// Format a publication date as `dd mmm yyyy` in Brazilian Portuguese,
/// e.g. `15 mar 2021`, in the offset the date was published with.
#[must_use]
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format_localized("%d %b %Y", Locale::pt_BR).to_string()
}

#[derive(Debug, Clone)]
pub struct PostInfo<'a> {
    pub published: Option<&'a DateTime<FixedOffset>>,
    pub author: &'a str,
    pub reading_minutes: Option<usize>,
}

impl<'a> PostInfo<'a> {
    #[must_use]
    pub const fn new(published: Option<&'a DateTime<FixedOffset>>, author: &'a str) -> Self {
        Self {
            published,
            author,
            reading_minutes: None,
        }
    }

    #[must_use]
    pub const fn with_reading_time(mut self, minutes: Option<usize>) -> Self {
        self.reading_minutes = minutes;
        self
    }
}

impl Render for PostInfo<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="post-info" {
                @if let Some(date) = self.published {
                    time datetime=(date.to_rfc3339()) { (format_date(date)) }
                }
                @if !self.author.is_empty() {
                    span class="author" { (self.author) }
                }
                @if let Some(minutes) = self.reading_minutes {
                    span class="reading-time" { (minutes) " min" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_format_date_pt_br() {
        assert_eq!(format_date(&date("2021-03-15T19:25:28+00:00")), "15 mar 2021");
        assert_eq!(format_date(&date("2021-12-01T08:00:00+00:00")), "01 dez 2021");
    }

    #[test]
    fn test_format_date_keeps_offset() {
        assert_eq!(format_date(&date("2021-03-15T23:30:00-03:00")), "15 mar 2021");
    }

    #[test]
    fn test_render_full() {
        let published = date("2021-03-15T19:25:28+00:00");
        let html = PostInfo::new(Some(&published), "Joseph Oliveira")
            .with_reading_time(Some(4))
            .render()
            .into_string();
        assert!(html.contains(">15 mar 2021</time>"));
        assert!(html.contains(r#"<span class="author">Joseph Oliveira</span>"#));
        assert!(html.contains(r#"<span class="reading-time">4 min</span>"#));
    }

    #[test]
    fn test_render_without_date_or_estimate() {
        let html = PostInfo::new(None, "Ana").render().into_string();
        assert!(!html.contains("<time"));
        assert!(!html.contains("reading-time"));
    }
}
