//! Static generation: the data each page needs, and writing the whole site
//! to disk.
//!
//! The server reuses the same data steps for on-demand generation, so a page
//! built ahead of time and one generated on request see identical inputs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::MAX_LISTING_PAGES;
use crate::content::{
    ContentApi, ContentError, ErrorKind, PostDetail, PostPage, Predicate, QueryOptions,
};
use crate::listing::{Listing, LoadMore};
use crate::web::pages::{render_home_page, render_not_found_page, render_post_page, HomePageParams};

/// What the detail view shows for a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Found(Box<PostDetail>),
    NotFound { slug: String },
}

fn listing_predicates(config: &Config) -> Vec<Predicate> {
    vec![Predicate::document_type(&config.document_type)]
}

fn listing_options(config: &Config) -> QueryOptions {
    let doc_type = &config.document_type;
    QueryOptions::new()
        .fetch([
            format!("{doc_type}.title"),
            format!("{doc_type}.subtitle"),
            format!("{doc_type}.author"),
        ])
        .page_size(config.page_size)
}

/// First page of the post listing, projected to summaries.
///
/// # Errors
///
/// Returns the content API error, or [`ContentError::Malformed`] if any post
/// cannot be projected.
pub async fn listing_props(api: &dyn ContentApi, config: &Config) -> Result<PostPage, ContentError> {
    let page = api
        .query(&listing_predicates(config), &listing_options(config))
        .await?;
    let page = PostPage::from_api(page)?;
    debug!(
        posts = page.results.len(),
        has_more = page.cursor().is_some(),
        "Fetched listing"
    );
    Ok(page)
}

/// Every known post UID, following the cursor chain to the end.
///
/// # Errors
///
/// Returns the first content API error encountered.
pub async fn static_paths(api: &dyn ContentApi, config: &Config) -> Result<Vec<String>, ContentError> {
    let mut page = api
        .query(&listing_predicates(config), &listing_options(config))
        .await?;
    let mut uids = Vec::new();
    let mut seen_cursors = HashSet::new();

    loop {
        for doc in &page.results {
            match doc.uid.as_deref() {
                Some(uid) if !uid.is_empty() => uids.push(uid.to_string()),
                _ => warn!(id = %doc.id, "Skipping document without uid"),
            }
        }

        let Some(cursor) = page.next_page.take().filter(|c| !c.is_empty()) else {
            break;
        };
        if !seen_cursors.insert(cursor.clone()) {
            warn!(cursor = %cursor, "Cursor repeated, stopping path enumeration");
            break;
        }
        page = api.fetch_page(&cursor).await?;
    }

    info!(paths = uids.len(), "Enumerated post paths");
    Ok(uids)
}

/// Data for one post's detail page. An unknown slug is a page state, not an
/// error.
///
/// # Errors
///
/// Returns network and malformed-response errors.
pub async fn post_props(
    api: &dyn ContentApi,
    config: &Config,
    slug: &str,
) -> Result<DetailState, ContentError> {
    match api
        .get_by_uid(&config.document_type, slug, &QueryOptions::new())
        .await
    {
        Ok(doc) => Ok(DetailState::Found(Box::new(PostDetail::from_document(&doc)?))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(slug, "Post not found");
            Ok(DetailState::NotFound {
                slug: slug.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Whether a UID can be used as a file name and URL segment as-is.
#[must_use]
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Files written by [`build_site`].
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

async fn write_page(path: &Path, html: String, report: &mut BuildReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("Failed to write page: {}", path.display()))?;
    debug!(path = %path.display(), "Wrote page");
    report.pages.push(path.to_path_buf());
    Ok(())
}

/// Render the accumulated listing for a static build. The page at the cap
/// gets no "load more" link, since nothing is written past it.
fn static_listing_html(listing: &Listing) -> String {
    let mut params = HomePageParams::from_listing(listing, None).for_static_build();
    if listing.pages_loaded() >= MAX_LISTING_PAGES {
        params.cursor = None;
    }
    render_home_page(&params).into_string()
}

/// Pre-render the listing, every known post and the not-found page into
/// `config.output_dir`.
///
/// The listing is written once per accumulated page: `index.html` holds the
/// first page and `page/N.html` the first N, which is where each "load more"
/// link points.
///
/// # Errors
///
/// Returns an error if the content API fails or a file cannot be written.
pub async fn build_site(config: &Config, api: &dyn ContentApi) -> Result<BuildReport> {
    let out = &config.output_dir;
    let mut report = BuildReport::default();

    info!(output_dir = %out.display(), "Building site");

    let mut listing = Listing::new(
        listing_props(api, config)
            .await
            .context("Failed to fetch post listing")?,
    );
    write_page(&out.join("index.html"), static_listing_html(&listing), &mut report).await?;

    while listing.has_more() && listing.pages_loaded() < MAX_LISTING_PAGES {
        match listing
            .load_more(api)
            .await
            .context("Failed to fetch post listing")?
        {
            LoadMore::Appended(_) => {}
            LoadMore::Exhausted | LoadMore::Discarded => break,
        }
        let path = out
            .join("page")
            .join(format!("{}.html", listing.pages_loaded()));
        write_page(&path, static_listing_html(&listing), &mut report).await?;
    }

    let paths = static_paths(api, config)
        .await
        .context("Failed to enumerate post paths")?;

    for slug in paths {
        if !is_safe_slug(&slug) {
            warn!(slug = %slug, "Skipping post with unsafe uid");
            report.skipped.push(slug);
            continue;
        }

        match post_props(api, config, &slug)
            .await
            .with_context(|| format!("Failed to fetch post '{slug}'"))?
        {
            DetailState::Found(post) => {
                let html = render_post_page(&post);
                let path = out.join("post").join(format!("{slug}.html"));
                write_page(&path, html.into_string(), &mut report).await?;
            }
            DetailState::NotFound { slug } => {
                // Listed a moment ago but gone now; leave it to on-demand generation.
                warn!(slug = %slug, "Post disappeared during build");
                report.skipped.push(slug);
            }
        }
    }

    write_page(
        &out.join("404.html"),
        render_not_found_page().into_string(),
        &mut report,
    )
    .await?;

    info!(
        pages = report.pages.len(),
        skipped = report.skipped.len(),
        "Site build complete"
    );
    Ok(report)
}
