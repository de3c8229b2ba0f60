//! Query predicates and search options in the content API's query syntax.

use std::fmt;

/// A structured filter sent to the content API.
///
/// Rendered as `[at(document.type, "post")]`; a whole query wraps its
/// predicates in one more pair of brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    At { path: String, value: String },
    Not { path: String, value: String },
    Any { path: String, values: Vec<String> },
    Fulltext { path: String, text: String },
}

impl Predicate {
    #[must_use]
    pub fn at(path: &str, value: &str) -> Self {
        Self::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn not(path: &str, value: &str) -> Self {
        Self::Not {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn any<I, S>(path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any {
            path: path.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn fulltext(path: &str, text: &str) -> Self {
        Self::Fulltext {
            path: path.to_string(),
            text: text.to_string(),
        }
    }

    /// Predicate selecting every document of one custom type.
    #[must_use]
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { path, value } => write!(f, "[at({path}, {})]", quote(value)),
            Self::Not { path, value } => write!(f, "[not({path}, {})]", quote(value)),
            Self::Any { path, values } => {
                let list = values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(", ");
                write!(f, "[any({path}, [{list}])]")
            }
            Self::Fulltext { path, text } => write!(f, "[fulltext({path}, {})]", quote(text)),
        }
    }
}

/// Render a full `q` parameter from a predicate list.
#[must_use]
pub fn render_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(ToString::to_string).collect();
    format!("[{inner}]")
}

/// Field selection and paging options for a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Fields to return, as `type.field`. Empty means all fields.
    pub fetch: Vec<String>,
    pub page_size: Option<u32>,
    /// 1-indexed page number.
    pub page: Option<u32>,
    /// Raw orderings expression, e.g. `[document.first_publication_date desc]`.
    pub orderings: Option<String>,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn orderings(mut self, orderings: &str) -> Self {
        self.orderings = Some(orderings.to_string());
        self
    }

    /// Query-string pairs for these options, in a stable order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.fetch.is_empty() {
            pairs.push(("fetch", self.fetch.join(",")));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize", size.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(ref orderings) = self.orderings {
            pairs.push(("orderings", orderings.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_predicate() {
        assert_eq!(
            Predicate::document_type("post").to_string(),
            r#"[at(document.type, "post")]"#
        );
    }

    #[test]
    fn test_any_predicate() {
        let p = Predicate::any("document.tags", ["rust", "space"]);
        assert_eq!(p.to_string(), r#"[any(document.tags, ["rust", "space"])]"#);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let p = Predicate::fulltext("document", r#"say "hi""#);
        assert_eq!(p.to_string(), r#"[fulltext(document, "say \"hi\"")]"#);
    }

    #[test]
    fn test_render_query_wraps_all_predicates() {
        let q = render_query(&[
            Predicate::document_type("post"),
            Predicate::not("my.post.uid", "draft"),
        ]);
        assert_eq!(
            q,
            r#"[[at(document.type, "post")][not(my.post.uid, "draft")]]"#
        );
    }

    #[test]
    fn test_query_pairs() {
        let options = QueryOptions::new()
            .fetch(["post.title", "post.subtitle", "post.author"])
            .page_size(2)
            .page(3);
        assert_eq!(
            options.to_query_pairs(),
            vec![
                ("fetch", "post.title,post.subtitle,post.author".to_string()),
                ("pageSize", "2".to_string()),
                ("page", "3".to_string()),
            ]
        );
        assert!(QueryOptions::new().to_query_pairs().is_empty());
    }
}
