//! Trait definitions for page transforms.

use quire_page::PageData;

/// Per-page context handed to a transform.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Logical path of the page relative to the content root
    pub relative_path: &'a str,
}

impl<'a> TransformContext<'a> {
    /// Context for the page at `relative_path`.
    pub fn new(relative_path: &'a str) -> Self {
        Self { relative_path }
    }
}

/// A hook the generation pass invokes once per page.
///
/// Transforms mutate the page's metadata in place and return nothing. A
/// transform that hits a problem with one page handles it locally; it must
/// not affect any other page in the pass.
pub trait PageTransform: Send + Sync {
    /// Transform identifier, used in logs
    fn name(&self) -> &'static str;

    /// Augment `page` in place.
    fn transform(&self, page: &mut PageData, ctx: &TransformContext<'_>);
}
