//! In-memory [`ContentApi`] for tests and offline previews.
//!
//! Documents are paged in insertion order. Cursors look like
//! `memory://search/{query}/{page}` and stay valid for the lifetime of the
//! store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::models::{ApiPage, Document};
use super::predicate::{Predicate, QueryOptions};
use super::{ContentApi, ContentError};

const CURSOR_PREFIX: &str = "memory://search/";
const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Default)]
pub struct MemoryContentApi {
    documents: Vec<Document>,
    queries: Mutex<Vec<(Vec<Predicate>, usize)>>,
    unavailable: AtomicBool,
}

impl MemoryContentApi {
    #[must_use]
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    /// Make every following request fail as if the network were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, url: &str) -> Result<(), ContentError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ContentError::Network {
                url: url.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "content store unavailable",
                )
                .into(),
            });
        }
        Ok(())
    }

    fn field(doc: &Document, path: &str) -> Option<String> {
        match path {
            "document.type" => Some(doc.doc_type.clone()),
            "document.id" => Some(doc.id.clone()),
            _ => {
                let rest = path.strip_prefix("my.")?;
                let (doc_type, field) = rest.split_once('.')?;
                if doc_type != doc.doc_type {
                    return None;
                }
                if field == "uid" {
                    return doc.uid.clone();
                }
                doc.data.get(field)?.as_str().map(String::from)
            }
        }
    }

    fn matches(doc: &Document, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::At { path, value } => Self::field(doc, path).as_deref() == Some(value.as_str()),
            Predicate::Not { path, value } => Self::field(doc, path).as_deref() != Some(value.as_str()),
            Predicate::Any { path, values } => {
                Self::field(doc, path).is_some_and(|v| values.contains(&v))
            }
            Predicate::Fulltext { text, .. } => doc.data.to_string().contains(text.as_str()),
        }
    }

    fn page(&self, query: usize, page: usize) -> Result<ApiPage<Document>, ContentError> {
        let (predicates, page_size) = self
            .queries
            .lock()
            .map_err(|_| ContentError::Malformed("query registry poisoned".to_string()))?
            .get(query)
            .cloned()
            .ok_or_else(|| ContentError::InvalidCursor(format!("{CURSOR_PREFIX}{query}/{page}")))?;

        let matching: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| predicates.iter().all(|p| Self::matches(doc, p)))
            .collect();
        let total = matching.len();
        let total_pages = total.div_ceil(page_size).max(1);
        let results = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        let cursor = |p: usize| format!("{CURSOR_PREFIX}{query}/{p}");
        Ok(ApiPage {
            page: page as u32,
            results_per_page: page_size as u32,
            total_results_size: total as u64,
            total_pages: total_pages as u32,
            next_page: (page < total_pages).then(|| cursor(page + 1)),
            prev_page: (page > 1).then(|| cursor(page - 1)),
            results,
        })
    }
}

#[async_trait]
impl ContentApi for MemoryContentApi {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<ApiPage<Document>, ContentError> {
        self.check_available("memory://search")?;
        let page_size = options
            .page_size
            .map_or(DEFAULT_PAGE_SIZE, |size| size.max(1) as usize);
        let query = {
            let mut queries = self
                .queries
                .lock()
                .map_err(|_| ContentError::Malformed("query registry poisoned".to_string()))?;
            queries.push((predicates.to_vec(), page_size));
            queries.len() - 1
        };
        self.page(query, options.page.map_or(1, |p| p.max(1) as usize))
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        _options: &QueryOptions,
    ) -> Result<Document, ContentError> {
        self.check_available("memory://search")?;
        self.documents
            .iter()
            .find(|doc| doc.doc_type == doc_type && doc.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiPage<Document>, ContentError> {
        self.check_available(cursor)?;
        let invalid = || ContentError::InvalidCursor(cursor.to_string());
        let (query, page) = cursor
            .strip_prefix(CURSOR_PREFIX)
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(invalid)?;
        let query: usize = query.parse().map_err(|_| invalid())?;
        let page: usize = page.parse().map_err(|_| invalid())?;
        if page == 0 {
            return Err(invalid());
        }
        self.page(query, page)
    }
}
