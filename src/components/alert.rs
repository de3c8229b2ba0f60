//! Alert component for inline notices.

use maud::{html, Markup, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Error,
}

impl AlertVariant {
    #[must_use]
    pub const fn article_class(&self) -> &'static str {
        match self {
            Self::Error => "error",
        }
    }
}

/// An alert message, optionally followed by an action link.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub message: &'a str,
    pub action: Option<(&'a str, &'a str)>,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self {
            variant: AlertVariant::Error,
            message,
            action: None,
        }
    }

    /// Append a link with the given label and href.
    #[must_use]
    pub const fn with_action(mut self, label: &'a str, href: &'a str) -> Self {
        self.action = Some((label, href));
        self
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            article class=(self.variant.article_class()) role="alert" {
                (self.message)
                @if let Some((label, href)) = self.action {
                    " "
                    a href=(href) { (label) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_alert() {
        let html = Alert::error("Falhou").render().into_string();
        assert_eq!(html, r#"<article class="error" role="alert">Falhou</article>"#);
    }

    #[test]
    fn test_alert_with_action() {
        let html = Alert::error("Tente de novo.")
            .with_action("Recarregar", "/?pages=2")
            .render()
            .into_string();
        assert!(html.starts_with(r#"<article class="error" role="alert">"#));
        assert!(html.contains(r#"<a href="/?pages=2">Recarregar</a>"#));
    }
}
