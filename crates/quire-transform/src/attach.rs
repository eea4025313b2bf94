//! Attach a verbatim copy of each page's source to its metadata.
//!
//! Downstream consumers (site widgets, tools fetching a page's raw markdown)
//! read the copy from page data instead of fetching the repository again.

use std::io;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use quire_page::PageData;

use crate::fs::{LocalFs, SourceFs};
use crate::traits::{PageTransform, TransformContext};

/// What happened when attaching a page's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The source was read and attached
    Attached { bytes: usize },

    /// No source file exists for the page; the field stays unset
    MissingSource,
}

/// Errors that can occur while attaching a page's source.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("Failed to read page source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Transform that attaches the base64-encoded source of each page.
#[derive(Debug, Clone)]
pub struct SourceAttacher<F = LocalFs> {
    content_root: PathBuf,
    fs: F,
}

impl SourceAttacher<LocalFs> {
    /// Create an attacher reading from the local filesystem under `content_root`.
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self::with_fs(content_root, LocalFs)
    }
}

impl<F: SourceFs> SourceAttacher<F> {
    /// Create an attacher reading through a custom filesystem.
    pub fn with_fs(content_root: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            content_root: content_root.into(),
            fs,
        }
    }

    /// Map a logical page path to its source file location.
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.content_root.join(relative_path.trim_start_matches('/'))
    }

    /// Attach the page's source, reporting what happened.
    ///
    /// `page` is only modified on [`AttachOutcome::Attached`].
    pub fn try_attach(
        &self,
        page: &mut PageData,
        relative_path: &str,
    ) -> Result<AttachOutcome, AttachError> {
        let path = self.resolve(relative_path);

        if !self.fs.exists(&path) {
            return Ok(AttachOutcome::MissingSource);
        }

        // The file can disappear between the check and the read
        let bytes = self
            .fs
            .read(&path)
            .map_err(|source| AttachError::Read { path, source })?;

        page.raw_source_base64 = Some(STANDARD.encode(&bytes));

        Ok(AttachOutcome::Attached { bytes: bytes.len() })
    }

    /// Attach the page's source, absorbing every failure.
    ///
    /// A missing source is expected for virtual pages. A read failure is
    /// logged and leaves the page without the field.
    pub fn attach(&self, page: &mut PageData, relative_path: &str) {
        match self.try_attach(page, relative_path) {
            Ok(AttachOutcome::Attached { bytes }) => {
                tracing::debug!("Attached {} bytes of source to {}", bytes, relative_path);
            }
            Ok(AttachOutcome::MissingSource) => {
                tracing::debug!("No source file for {}, skipping", relative_path);
            }
            Err(e) => {
                tracing::warn!("{}", e);
            }
        }
    }
}

impl<F: SourceFs> PageTransform for SourceAttacher<F> {
    fn name(&self) -> &'static str {
        "source-attacher"
    }

    fn transform(&self, page: &mut PageData, ctx: &TransformContext<'_>) {
        self.attach(page, ctx.relative_path);
    }
}

/// Decode a page's attached source back to its original bytes.
///
/// Returns `None` when no source is attached.
pub fn decode_raw_source(page: &PageData) -> Option<Result<Vec<u8>, base64::DecodeError>> {
    page.raw_source_base64
        .as_deref()
        .map(|encoded| STANDARD.decode(encoded))
}
