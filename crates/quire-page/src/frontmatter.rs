//! Frontmatter extraction and parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed frontmatter from a markdown page.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Frontmatter {
    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page description for SEO
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Order in navigation (lower = first)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,

    /// Whether to show in navigation
    #[serde(default = "default_true")]
    pub nav: bool,

    /// Custom slug override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Any other keys, carried through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            order: None,
            nav: true,
            slug: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Extract frontmatter from page content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty block deserializes as YAML null, not as an empty mapping
    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Quick Start
description: Get going in five minutes
order: 1
---

# Quick Start
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Quick Start"));
        assert_eq!(fm.description.as_deref(), Some("Get going in five minutes"));
        assert_eq!(fm.order, Some(1));
        assert!(fm.nav);
        assert!(content.starts_with("# Quick Start"));
    }

    #[test]
    fn keeps_unknown_keys() {
        let source = "---\ntitle: Home\nlayout: home\nhero:\n  name: quire\n---\nbody";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(
            fm.extra.get("layout"),
            Some(&serde_yaml::Value::String("home".to_string()))
        );
        assert!(fm.extra.contains_key("hero"));
        assert!(!fm.extra.contains_key("title"));
    }

    #[test]
    fn empty_block_is_default() {
        let (fm, content) = extract_frontmatter("---\n---\n# Title").unwrap();

        assert_eq!(fm, Some(Frontmatter::default()));
        assert_eq!(content, "# Title");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
