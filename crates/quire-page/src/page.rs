//! The per-page metadata record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;

/// JSON key of [`PageData::raw_source_base64`].
pub const RAW_SOURCE_FIELD: &str = "rawSourceBase64";

/// A section header within a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Heading text
    pub title: String,
    /// Anchor slug
    pub slug: String,
    /// Heading level (2-6)
    pub level: u8,
}

/// Metadata the generation pass produces for one page.
///
/// Created once per pass, augmented in place by build-time transforms, then
/// serialized. Nothing mutates it after serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Logical path relative to the content root, e.g. `guide/quick-start.md`
    pub relative_path: String,

    /// Resolved page title
    pub title: String,

    /// Page description (empty when not set)
    #[serde(default)]
    pub description: String,

    /// Parsed frontmatter
    #[serde(default)]
    pub frontmatter: Frontmatter,

    /// Section headers in document order
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Base64 copy of the page's source bytes, present only when the source
    /// file was found and read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_source_base64: Option<String>,
}

impl PageData {
    /// Metadata for a page that has no source document behind it.
    pub fn virtual_page(relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let title = title_from_path(&relative_path);

        Self {
            relative_path,
            title,
            description: String::new(),
            frontmatter: Frontmatter::default(),
            headers: Vec::new(),
            raw_source_base64: None,
        }
    }

    /// Whether a raw source copy is attached.
    pub fn has_raw_source(&self) -> bool {
        self.raw_source_base64.is_some()
    }
}

/// Derive a title from the file stem of a logical path.
pub(crate) fn title_from_path(relative_path: &str) -> String {
    Path::new(relative_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_absent_raw_source() {
        let page = PageData::virtual_page("guide/generated.md");

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["relativePath"], "guide/generated.md");
        assert_eq!(json["title"], "generated");
        assert!(json.get(RAW_SOURCE_FIELD).is_none());
    }

    #[test]
    fn serializes_raw_source_in_camel_case() {
        let mut page = PageData::virtual_page("index.md");
        page.raw_source_base64 = Some("IyBIaQ==".to_string());

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json[RAW_SOURCE_FIELD], "IyBIaQ==");
        assert!(page.has_raw_source());
    }

    #[test]
    fn reads_back_serialized_record() {
        let mut page = PageData::virtual_page("api/config.md");
        page.headers.push(Header {
            title: "Options".to_string(),
            slug: "options".to_string(),
            level: 2,
        });

        let json = serde_json::to_string(&page).unwrap();
        let back: PageData = serde_json::from_str(&json).unwrap();

        assert_eq!(back, page);
    }
}
