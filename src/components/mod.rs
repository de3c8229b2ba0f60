//! Maud HTML template components for the blog.
//!
//! - `layout`: Base page layout and header
//! - `alert`: Inline notices
//! - `metadata`: Open Graph tags
//! - `pagination`: The "load more" control
//! - `post_info`: Date, author and reading time line

pub mod alert;
pub mod layout;
pub mod metadata;
pub mod pagination;
pub mod post_info;

pub use alert::{Alert, AlertVariant};
pub use layout::BaseLayout;
pub use metadata::{truncate_text, OpenGraphMetadata};
pub use pagination::{LinkStyle, LoadMoreLink, LOAD_MORE_LABEL};
pub use post_info::{format_date, PostInfo};
