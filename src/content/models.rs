//! Content API documents and the blog's projections of them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use super::ContentError;

/// Publication timestamps come as `2021-03-15T19:25:28+0000`, which is not
/// RFC 3339. Accept both forms.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{s}'"))),
    }
}

/// Empty Key Text fields come back as `null`.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// A raw document as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_publication_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One page of search results plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    pub results: Vec<T>,
}

/// Listing entry for a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Deserialize)]
struct SummaryFields {
    title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    subtitle: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    author: String,
}

impl PostSummary {
    /// Project the listing fields out of a post document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Malformed`] when the document has no UID or its
    /// data lacks a title.
    pub fn from_document(doc: &Document) -> Result<Self, ContentError> {
        let uid = doc
            .uid
            .clone()
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| ContentError::Malformed(format!("document {} has no uid", doc.id)))?;
        let fields: SummaryFields = serde_json::from_value(doc.data.clone())
            .map_err(|e| ContentError::Malformed(format!("post {uid}: {e}")))?;

        Ok(Self {
            uid,
            first_publication_date: doc.first_publication_date,
            title: fields.title,
            subtitle: fields.subtitle,
            author: fields.author,
        })
    }
}

/// A page of post summaries and the cursor to continue from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    pub results: Vec<PostSummary>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl PostPage {
    /// Project a raw search page. Either every document projects or the whole
    /// page is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Malformed`] if any document fails to project.
    pub fn from_api(page: ApiPage<Document>) -> Result<Self, ContentError> {
        let results = page
            .results
            .iter()
            .map(PostSummary::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            results,
            next_page: page.next_page,
        })
    }

    /// The cursor for the next page, if one exists. An empty string counts as
    /// no cursor.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.next_page.as_deref().filter(|c| !c.is_empty())
    }
}

/// A plain-text fragment of a section body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,
}

/// A headed section of a post's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<TextBlock>,
}

impl ContentSection {
    /// The body as plain text, fragments joined by a single space.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Snapshot of one post for its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub content: Vec<ContentSection>,
}

#[derive(Deserialize)]
struct Banner {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct DetailFields {
    title: String,
    #[serde(default)]
    banner: Option<Banner>,
    #[serde(default, deserialize_with = "deserialize_text")]
    author: String,
    #[serde(default)]
    content: Vec<ContentSection>,
}

impl PostDetail {
    /// Convert a full post document into a detail snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Malformed`] if the data does not have the post
    /// shape.
    pub fn from_document(doc: &Document) -> Result<Self, ContentError> {
        let uid = doc.uid.clone().unwrap_or_default();
        let fields: DetailFields = serde_json::from_value(doc.data.clone())
            .map_err(|e| ContentError::Malformed(format!("post {uid}: {e}")))?;

        Ok(Self {
            uid,
            first_publication_date: doc.first_publication_date,
            title: fields.title,
            banner_url: fields.banner.and_then(|b| b.url),
            author: fields.author,
            content: fields.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn post_document() -> Document {
        serde_json::from_value(json!({
            "id": "YEUxKhAAACIAm4ci",
            "uid": "como-utilizar-hooks",
            "type": "post",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "last_publication_date": "2021-03-25T19:27:35+0000",
            "data": {
                "title": "Como utilizar Hooks",
                "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                "author": "Joseph Oliveira",
                "banner": { "url": "https://images.prismic.io/banner.png" },
                "content": [
                    {
                        "heading": "Proin et varius",
                        "body": [
                            { "type": "paragraph", "text": "Lorem ipsum", "spans": [] },
                            { "type": "paragraph", "text": "dolor sit amet", "spans": [] }
                        ]
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_document_parses_offset_without_colon() {
        let doc = post_document();
        let date = doc.first_publication_date.unwrap();
        assert_eq!(date.year(), 2021);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 15);
        assert_eq!(date.hour(), 19);
    }

    #[test]
    fn test_null_publication_date() {
        let doc: Document = serde_json::from_value(json!({
            "uid": "draft",
            "first_publication_date": null,
            "data": { "title": "Draft" }
        }))
        .unwrap();
        assert!(doc.first_publication_date.is_none());
    }

    #[test]
    fn test_summary_projection() {
        let summary = PostSummary::from_document(&post_document()).unwrap();
        assert_eq!(summary.uid, "como-utilizar-hooks");
        assert_eq!(summary.title, "Como utilizar Hooks");
        assert_eq!(summary.author, "Joseph Oliveira");
        assert!(summary.first_publication_date.is_some());
    }

    #[test]
    fn test_summary_requires_uid() {
        let mut doc = post_document();
        doc.uid = None;
        let err = PostSummary::from_document(&doc).unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }

    #[test]
    fn test_summary_requires_title() {
        let mut doc = post_document();
        doc.data = json!({ "subtitle": "no title here" });
        assert!(matches!(
            PostSummary::from_document(&doc),
            Err(ContentError::Malformed(_))
        ));
    }

    #[test]
    fn test_null_key_text_fields_are_empty() {
        let mut doc = post_document();
        doc.data["subtitle"] = serde_json::Value::Null;
        doc.data["author"] = serde_json::Value::Null;
        doc.data["content"][0]["heading"] = serde_json::Value::Null;

        let summary = PostSummary::from_document(&doc).unwrap();
        assert_eq!(summary.subtitle, "");
        assert_eq!(summary.author, "");

        let detail = PostDetail::from_document(&doc).unwrap();
        assert_eq!(detail.author, "");
        assert_eq!(detail.content[0].heading, "");

        let page = ApiPage {
            page: 1,
            results_per_page: 2,
            total_results_size: 2,
            total_pages: 1,
            next_page: None,
            prev_page: None,
            results: vec![post_document(), doc],
        };
        assert_eq!(PostPage::from_api(page).unwrap().results.len(), 2);
    }

    #[test]
    fn test_page_projection_is_all_or_nothing() {
        let mut broken = post_document();
        broken.uid = None;
        let page = ApiPage {
            page: 1,
            results_per_page: 2,
            total_results_size: 2,
            total_pages: 1,
            next_page: None,
            prev_page: None,
            results: vec![post_document(), broken],
        };
        assert!(PostPage::from_api(page).is_err());
    }

    #[test]
    fn test_empty_cursor_is_no_cursor() {
        let page = PostPage {
            results: vec![],
            next_page: Some(String::new()),
        };
        assert_eq!(page.cursor(), None);

        let page = PostPage {
            results: vec![],
            next_page: Some("https://example.com/next".to_string()),
        };
        assert_eq!(page.cursor(), Some("https://example.com/next"));
    }

    #[test]
    fn test_detail_projection() {
        let detail = PostDetail::from_document(&post_document()).unwrap();
        assert_eq!(detail.title, "Como utilizar Hooks");
        assert_eq!(
            detail.banner_url.as_deref(),
            Some("https://images.prismic.io/banner.png")
        );
        assert_eq!(detail.content.len(), 1);
        assert_eq!(detail.content[0].body_text(), "Lorem ipsum dolor sit amet");
    }

    #[test]
    fn test_post_page_json_shape() {
        let page: PostPage = serde_json::from_value(json!({
            "results": [{
                "uid": "a",
                "first_publication_date": "2021-03-15T19:25:28+00:00",
                "title": "A",
                "subtitle": "sub",
                "author": "me"
            }],
            "next_page": null
        }))
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.cursor(), None);
    }
}
