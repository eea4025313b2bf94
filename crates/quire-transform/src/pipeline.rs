//! Ordered transform pipeline run over every page of a generation pass.

use quire_page::PageData;
use rayon::prelude::*;

use crate::traits::{PageTransform, TransformContext};

/// An ordered set of page transforms.
#[derive(Default)]
pub struct TransformPipeline {
    transforms: Vec<Box<dyn PageTransform>>,
}

impl TransformPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform; transforms run in registration order.
    pub fn with(mut self, transform: impl PageTransform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Names of the registered transforms, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether no transforms are registered.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run every transform against a single page.
    pub fn apply(&self, page: &mut PageData) {
        // Transforms may not rewrite the identity they are keyed by
        let relative_path = page.relative_path.clone();
        let ctx = TransformContext::new(&relative_path);

        for transform in &self.transforms {
            transform.transform(page, &ctx);
        }
    }

    /// Run the pipeline over all pages in parallel.
    ///
    /// Each page is owned by exactly one worker; no state is shared across pages.
    pub fn apply_all(&self, pages: &mut [PageData]) {
        pages.par_iter_mut().for_each(|page| self.apply(page));
    }
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("transforms", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attach::{decode_raw_source, SourceAttacher};
    use crate::fs::{LocalFs, SourceFs};
    use std::io;
    use std::path::Path;
    use tempfile::tempdir;

    /// Local filesystem that refuses to read one specific file.
    struct DenyOne {
        denied: &'static str,
    }

    impl SourceFs for DenyOne {
        fn exists(&self, path: &Path) -> bool {
            LocalFs.exists(path)
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            if path.ends_with(self.denied) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            LocalFs.read(path)
        }
    }

    struct Retitle;

    impl PageTransform for Retitle {
        fn name(&self) -> &'static str {
            "retitle"
        }

        fn transform(&self, page: &mut PageData, ctx: &TransformContext<'_>) {
            page.title = format!("{} ({})", page.title, ctx.relative_path);
        }
    }

    #[test]
    fn read_failure_is_isolated_to_its_page() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("locked.md"), "# Locked").unwrap();
        std::fs::write(temp.path().join("open.md"), "# Open").unwrap();

        let pipeline = TransformPipeline::new().with(SourceAttacher::with_fs(
            temp.path(),
            DenyOne { denied: "locked.md" },
        ));

        let mut pages = vec![
            PageData::virtual_page("locked.md"),
            PageData::virtual_page("open.md"),
            PageData::virtual_page("virtual.md"),
        ];
        pipeline.apply_all(&mut pages);

        assert!(pages[0].raw_source_base64.is_none());
        assert_eq!(decode_raw_source(&pages[1]).unwrap().unwrap(), b"# Open");
        assert!(pages[2].raw_source_base64.is_none());
    }

    #[test]
    fn runs_transforms_in_order() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("index.md"), "hi").unwrap();

        let pipeline = TransformPipeline::new()
            .with(SourceAttacher::new(temp.path()))
            .with(Retitle);

        assert_eq!(pipeline.names(), vec!["source-attacher", "retitle"]);
        assert_eq!(pipeline.len(), 2);

        let mut page = PageData::virtual_page("index.md");
        pipeline.apply(&mut page);

        assert_eq!(page.title, "index (index.md)");
        assert_eq!(page.raw_source_base64.as_deref(), Some("aGk="));
    }

    #[test]
    fn empty_pipeline_leaves_pages_untouched() {
        let pipeline = TransformPipeline::new();
        let mut pages = vec![PageData::virtual_page("a.md")];
        let before = pages.clone();

        pipeline.apply_all(&mut pages);

        assert!(pipeline.is_empty());
        assert_eq!(pages, before);
    }
}
