//! Headless content API access.
//!
//! The [`ContentApi`] trait is the seam between the blog and the content
//! platform: predicate searches, UID lookups and raw cursor fetches. The
//! production implementation is [`PrismicClient`].

mod client;
pub mod memory;
pub mod models;
pub mod predicate;

use async_trait::async_trait;
use thiserror::Error;

pub use client::PrismicClient;
pub use memory::MemoryContentApi;
pub use models::{ApiPage, ContentSection, Document, PostDetail, PostPage, PostSummary, TextBlock};
pub use predicate::{Predicate, QueryOptions};

/// Failure talking to the content API.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The request could not complete (connection, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// No document of the given type has the requested UID. Only an empty
    /// lookup result produces this; an HTTP 404 is a [`Self::Status`].
    #[error("no {doc_type} document with uid '{uid}'")]
    NotFound { doc_type: String, uid: String },
    /// The response body does not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The API answered with a non-success status code.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    /// A pagination cursor that is not a usable URL.
    #[error("invalid cursor '{0}'")]
    InvalidCursor(String),
}

/// Coarse classification of a [`ContentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Malformed,
}

impl ContentError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Status { .. } => ErrorKind::Network,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Malformed(_) | Self::InvalidCursor(_) => ErrorKind::Malformed,
        }
    }

    /// Whether repeating the same request might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Operations the blog needs from the content platform.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Predicate-filtered search. Result ordering is decided upstream and is
    /// stable within one cursor chain.
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<ApiPage<Document>, ContentError>;

    /// Single document lookup by type and UID.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] when no such document exists.
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        options: &QueryOptions,
    ) -> Result<Document, ContentError>;

    /// Plain GET of an opaque `next_page` cursor.
    async fn fetch_page(&self, cursor: &str) -> Result<ApiPage<Document>, ContentError>;
}
