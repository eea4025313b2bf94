//! Page metadata for quire documentation sites.
//!
//! This crate turns a markdown document into the [`PageData`] record the
//! generation pass serializes per page: frontmatter, title, description,
//! section headers, and any fields attached later by build-time transforms.

pub mod frontmatter;
pub mod page;
pub mod parser;

pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
pub use page::{Header, PageData, RAW_SOURCE_FIELD};
pub use parser::{parse_page, slugify, ParseError};
