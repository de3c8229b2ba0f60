//! Maud-based page templates.
//!
//! Each page module exports a render function that produces the complete
//! HTML. The same functions back both the server and the static build.

pub mod home;
pub mod not_found;
pub mod post;

pub use home::{render_home_page, HomePageParams};
pub use not_found::{render_error_page, render_not_found_page};
pub use post::{render_loading_page, render_post_page, LOADING_LABEL};
