//! Markdown page parser.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, FrontmatterError};
use crate::page::{title_from_path, Header, PageData};

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a markdown page into its metadata record.
///
/// The title comes from the frontmatter, then the first level-1 heading, then
/// the file stem. Only metadata is extracted; the body is not rendered.
pub fn parse_page(relative_path: &str, source: &str) -> Result<PageData, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;
    let frontmatter = frontmatter.unwrap_or_default();

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut headers = Vec::new();
    let mut first_h1: Option<String> = None;
    let mut current_heading: Option<(u8, String)> = None;

    for event in Parser::new_ext(content, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((heading_level(level), String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let title = title.trim().to_string();
                    if level == 1 {
                        first_h1.get_or_insert(title);
                    } else {
                        let slug = slugify(&title);
                        headers.push(Header { title, slug, level });
                    }
                }
            }

            _ => {}
        }
    }

    let title = frontmatter
        .title
        .clone()
        .or(first_h1)
        .unwrap_or_else(|| title_from_path(relative_path));

    let description = frontmatter.description.clone().unwrap_or_default();

    Ok(PageData {
        relative_path: relative_path.to_string(),
        title,
        description,
        frontmatter,
        headers,
        raw_source_base64: None,
    })
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: Quick Start
description: Set up a worktree
---

# Getting going

Some intro.

## Install

```bash
cargo install quire
```

### From `source`

## Configure
"#;

        let page = parse_page("guide/quick-start.md", source).unwrap();

        assert_eq!(page.relative_path, "guide/quick-start.md");
        assert_eq!(page.title, "Quick Start");
        assert_eq!(page.description, "Set up a worktree");
        assert_eq!(
            page.headers,
            vec![
                Header {
                    title: "Install".to_string(),
                    slug: "install".to_string(),
                    level: 2,
                },
                Header {
                    title: "From source".to_string(),
                    slug: "from-source".to_string(),
                    level: 3,
                },
                Header {
                    title: "Configure".to_string(),
                    slug: "configure".to_string(),
                    level: 2,
                },
            ]
        );
        assert!(page.raw_source_base64.is_none());
    }

    #[test]
    fn title_falls_back_to_first_heading() {
        let page = parse_page("intro.md", "# Welcome\n\n# Second").unwrap();

        assert_eq!(page.title, "Welcome");
        assert!(page.headers.is_empty());
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let page = parse_page("reference/commands.md", "Plain text only.").unwrap();

        assert_eq!(page.title, "commands");
        assert_eq!(page.description, "");
    }

    #[test]
    fn propagates_frontmatter_errors() {
        let result = parse_page("broken.md", "---\ntitle: x\n");

        assert!(matches!(
            result,
            Err(ParseError::Frontmatter(FrontmatterError::Unclosed))
        ));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
