//! Print a page's recorded raw source.

use std::io::Write;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use quire_static::{load_page_data, page_data_path};
use quire_transform::decode_raw_source;

/// Raw source bytes recorded for `relative_path` in a build output.
///
/// `Ok(None)` when the page is unknown or was built without its source.
/// Paths that step out of the page data directory are unknown pages.
pub fn read_raw(output_dir: &Path, relative_path: &str) -> Result<Option<Vec<u8>>> {
    if Path::new(relative_path)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Ok(None);
    }

    if !page_data_path(output_dir, relative_path).is_file() {
        return Ok(None);
    }

    let page = load_page_data(output_dir, relative_path)?;

    decode_raw_source(&page)
        .transpose()
        .with_context(|| format!("Corrupt raw source recorded for {}", relative_path))
}

/// Run the raw command.
pub fn run(output_dir: &Path, relative_path: &str) -> Result<()> {
    let Some(bytes) = read_raw(output_dir, relative_path)? else {
        anyhow::bail!(
            "No raw source recorded for {} in {}. Run 'quire build' first.",
            relative_path,
            output_dir.display()
        );
    };

    std::io::stdout()
        .write_all(&bytes)
        .context("Failed to write to stdout")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_page(output_dir: &Path, relative_path: &str, raw: Option<&str>) {
        let path = page_data_path(output_dir, relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        let mut page = serde_json::json!({
            "relativePath": relative_path,
            "title": "Page",
        });
        if let Some(raw) = raw {
            page["rawSourceBase64"] = raw.into();
        }
        fs::write(path, page.to_string()).unwrap();
    }

    #[test]
    fn decodes_recorded_source() {
        let temp = tempdir().unwrap();
        write_page(temp.path(), "guide/quick-start.md", Some("IyBIb21l"));

        let bytes = read_raw(temp.path(), "guide/quick-start.md").unwrap();

        assert_eq!(bytes.as_deref(), Some(&b"# Home"[..]));
    }

    #[test]
    fn unknown_page_or_missing_source_is_none() {
        let temp = tempdir().unwrap();
        write_page(temp.path(), "virtual.md", None);

        assert!(read_raw(temp.path(), "virtual.md").unwrap().is_none());
        assert!(read_raw(temp.path(), "nope.md").unwrap().is_none());
    }

    #[test]
    fn parent_segments_do_not_escape_page_data() {
        let temp = tempdir().unwrap();
        let output_dir = temp.path().join("dist");
        // Lands at <temp>/secret.md.json, outside dist/pagedata
        write_page(&output_dir, "../../secret.md", Some("IyBIb21l"));

        assert!(read_raw(&output_dir, "../../secret.md").unwrap().is_none());
        assert!(read_raw(&output_dir, "guide/../../../secret.md")
            .unwrap()
            .is_none());
    }

    #[test]
    fn corrupt_source_is_an_error() {
        let temp = tempdir().unwrap();
        write_page(temp.path(), "bad.md", Some("not base64!"));

        assert!(read_raw(temp.path(), "bad.md").is_err());
        assert!(run(temp.path(), "nope.md").is_err());
    }
}
