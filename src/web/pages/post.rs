//! Post detail page and its loading fallback.

use maud::{html, Markup};

use crate::components::{BaseLayout, OpenGraphMetadata, PostInfo};
use crate::content::PostDetail;
use crate::reading_time::estimate_minutes;

pub const LOADING_LABEL: &str = "Carregando...";

/// Seconds before the loading page asks the browser to try again.
const LOADING_REFRESH_SECS: u32 = 1;

/// Render a post with its reading-time estimate.
#[must_use]
pub fn render_post_page(post: &PostDetail) -> Markup {
    let title = format!("Post | {}", post.title);
    let reading_minutes = estimate_minutes(Some(post));

    let content = html! {
        article class="post" {
            h1 { (post.title) }
            (PostInfo::new(post.first_publication_date.as_ref(), &post.author)
                .with_reading_time(reading_minutes))

            @for section in &post.content {
                section {
                    h2 { (section.heading) }
                    div class="body" {
                        @for block in &section.body {
                            p { (block.text) }
                        }
                    }
                }
            }
        }
    };

    let og = OpenGraphMetadata::article(
        post.title.as_str(),
        post.content
            .first()
            .map(|s| s.body_text())
            .unwrap_or_default(),
        format!("/post/{}", post.uid),
    )
    .with_image(post.banner_url.clone());

    BaseLayout::new(&title)
        .with_og_metadata(og)
        .with_banner(post.banner_url.as_deref())
        .render(content)
}

/// Placeholder shown while a post that was not generated ahead of time is
/// still being fetched. The page reloads itself until the post is ready.
#[must_use]
pub fn render_loading_page() -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content=(LOADING_REFRESH_SECS);
                title { "spacetraveling" }
            }
            body {
                div { (LOADING_LABEL) }
            }
        }
    }
}
