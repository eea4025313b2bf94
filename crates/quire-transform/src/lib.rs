//! Build-time page data transforms.
//!
//! The generation pass hands every page's metadata to a [`TransformPipeline`],
//! which runs each registered [`PageTransform`] against it in place. The
//! [`SourceAttacher`] transform attaches a base64 copy of the page's source.

pub mod attach;
pub mod fs;
pub mod pipeline;
pub mod traits;

pub use attach::{decode_raw_source, AttachError, AttachOutcome, SourceAttacher};
pub use fs::{LocalFs, SourceFs};
pub use pipeline::TransformPipeline;
pub use traits::{PageTransform, TransformContext};
