use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{ApiPage, Document};
use super::predicate::{render_query, Predicate, QueryOptions};
use super::{ContentApi, ContentError};
use crate::config::Config;
use crate::constants::USER_AGENT;

/// API root response; only the refs matter here.
#[derive(Debug, Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

#[derive(Debug)]
struct CachedRef {
    reference: String,
    resolved_at: Instant,
}

/// [`ContentApi`] over the Prismic REST API (v2).
///
/// Every search must name a content release ref. The master ref moves each
/// time content is published, so it is read from the API root and reused for
/// at most `master_ref_ttl`. A search rejected with 404 or 410 resolves the
/// ref again and retries once. Cursor URLs already carry the ref they were
/// issued for.
#[derive(Debug)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    master_ref: RwLock<Option<CachedRef>>,
    master_ref_ttl: Duration,
}

impl PrismicClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a base URL or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.api_endpoint)
            .with_context(|| format!("Invalid content API endpoint: {}", config.api_endpoint))?;
        if endpoint.cannot_be_a_base() {
            anyhow::bail!("Content API endpoint is not a base URL: {endpoint}");
        }

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        info!(endpoint = %endpoint, "Content API client ready");

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone(),
            master_ref: RwLock::new(None),
            master_ref_ttl: config.master_ref_ttl,
        })
    }

    /// Current master ref. `rejected` names a ref the API just refused; it
    /// is never handed out again.
    async fn master_ref(&self, rejected: Option<&str>) -> Result<String, ContentError> {
        let usable = |cached: &CachedRef| {
            cached.resolved_at.elapsed() < self.master_ref_ttl
                && rejected != Some(cached.reference.as_str())
        };

        if let Some(cached) = self.master_ref.read().await.as_ref().filter(|c| usable(*c)) {
            return Ok(cached.reference.clone());
        }

        let mut guard = self.master_ref.write().await;
        // Another request may have resolved it while this one waited.
        if let Some(cached) = guard.as_ref().filter(|c| usable(*c)) {
            return Ok(cached.reference.clone());
        }

        let reference = self.fetch_master_ref().await?;
        *guard = Some(CachedRef {
            reference: reference.clone(),
            resolved_at: Instant::now(),
        });
        Ok(reference)
    }

    async fn fetch_master_ref(&self) -> Result<String, ContentError> {
        let mut url = self.endpoint.clone();
        if let Some(ref token) = self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        let root: ApiRoot = self.get_json(url).await?;
        let master = root
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| ContentError::Malformed("API root lists no master ref".to_string()))?;
        debug!(master_ref = %master, "Resolved master ref");
        Ok(master)
    }

    fn search_url(&self, reference: &str, predicates: &[Predicate], options: &QueryOptions) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["documents", "search"]);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", reference);
            if !predicates.is_empty() {
                query.append_pair("q", &render_query(predicates));
            }
            for (key, value) in options.to_query_pairs() {
                query.append_pair(key, &value);
            }
            if let Some(ref token) = self.access_token {
                query.append_pair("access_token", token);
            }
        }
        url
    }

    /// Parse a cursor and attach the access token unless it already carries
    /// one. Cursors must point at the configured API's origin.
    fn cursor_url(&self, cursor: &str) -> Result<Url, ContentError> {
        let invalid = || ContentError::InvalidCursor(cursor.to_string());
        let mut url = Url::parse(cursor).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.origin() != self.endpoint.origin() {
            return Err(invalid());
        }

        if let Some(ref token) = self.access_token {
            if !url.query_pairs().any(|(k, _)| k == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ContentError> {
        // The query string may hold the access token; keep it out of logs.
        let display_url = format!("{}{}", url.origin().ascii_serialization(), url.path());
        debug!(url = %display_url, "GET content API");

        let network = |e: reqwest::Error| ContentError::Network {
            url: display_url.clone(),
            source: Box::new(e),
        };

        let response = self.http.get(url.clone()).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %display_url, status = status.as_u16(), "Content API returned error status");
            return Err(ContentError::Status {
                url: display_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        serde_json::from_slice(&body).map_err(|e| ContentError::Malformed(format!("{display_url}: {e}")))
    }
}

#[async_trait]
impl ContentApi for PrismicClient {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<ApiPage<Document>, ContentError> {
        let reference = self.master_ref(None).await?;
        let url = self.search_url(&reference, predicates, options);
        match self.get_json(url).await {
            Err(ContentError::Status {
                status: 404 | 410, ..
            }) => {
                info!(master_ref = %reference, "Master ref rejected, resolving again");
                let fresh = self.master_ref(Some(&reference)).await?;
                self.get_json(self.search_url(&fresh, predicates, options))
                    .await
            }
            other => other,
        }
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        options: &QueryOptions,
    ) -> Result<Document, ContentError> {
        let predicates = [Predicate::at(&format!("my.{doc_type}.uid"), uid)];
        let options = options.clone().page_size(1).page(1);
        let page = self.query(&predicates, &options).await?;

        page.results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiPage<Document>, ContentError> {
        let url = self.cursor_url(cursor)?;
        self.get_json(url).await
    }
}
