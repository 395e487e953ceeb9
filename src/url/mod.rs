//! URL handling module for Docket
//!
//! Resolves hrefs found on listing pages into absolute links, and normalizes
//! document links into the stable form used as the store's natural key.

mod domain;
mod normalize;
mod resolve;

pub use domain::{extract_domain, host_tag};
pub use normalize::normalize_url;
pub use resolve::resolve_link;
