//! The generation pass.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use quire_hydrate::{FixedStars, HydrationTargets, StarSource};
use quire_page::{parse_page, PageData};
use quire_transform::{SourceAttacher, TransformPipeline};

use crate::assets::AssetPipeline;
use crate::templates::RuntimeContext;

/// Directory under the output root holding per-page metadata.
const PAGE_DATA_DIR: &str = "pagedata";

/// Configuration for a generation pass.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Content root holding the markdown sources
    pub docs_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify emitted CSS
    pub minify: bool,

    /// Class and attribute names the hydration runtime targets
    pub targets: HydrationTargets,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            targets: HydrationTargets::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages emitted
    pub pages: usize,

    /// Pages carrying an attached raw source
    pub with_source: usize,

    /// Pages skipped because they could not be read or parsed
    pub skipped: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that abort a whole build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Failed to serialize page data: {0}")]
    SerializeError(String),
}

/// One row of `pagedata/index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub relative_path: String,
    pub title: String,
    pub has_raw_source: bool,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    pipeline: TransformPipeline,
    stars: Arc<dyn StarSource>,
    assets: AssetPipeline,
}

impl StaticBuilder {
    /// Create a builder that attaches raw sources and knows no star count.
    pub fn new(config: BuildConfig) -> Self {
        let pipeline = TransformPipeline::new().with(SourceAttacher::new(&config.docs_dir));
        let assets = AssetPipeline::new(config.minify);

        Self {
            config,
            pipeline,
            stars: Arc::new(FixedStars(None)),
            assets,
        }
    }

    /// Replace the transform pipeline.
    pub fn with_pipeline(mut self, pipeline: TransformPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Use `stars` as the star count provider.
    pub fn with_stars(mut self, stars: Arc<dyn StarSource>) -> Self {
        self.stars = stars;
        self
    }

    /// Run the generation pass.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let (mut pages, skipped) = self.discover_pages()?;

        tracing::debug!(
            "Running {:?} over {} pages",
            self.pipeline.names(),
            pages.len()
        );
        self.pipeline.apply_all(&mut pages);

        let results: Vec<Result<(), BuildError>> = pages
            .par_iter()
            .map(|page| self.write_page_data(page))
            .collect();

        for result in results {
            result?;
        }

        self.write_index(&pages)?;
        self.generate_assets()?;

        let with_source = pages.iter().filter(|p| p.has_raw_source()).count();
        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            with_source,
            skipped,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover and parse all markdown pages, sorted by logical path.
    ///
    /// Pages that cannot be read or parsed are skipped and counted.
    fn discover_pages(&self) -> Result<(Vec<PageData>, usize), BuildError> {
        if !self.config.docs_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                self.config.docs_dir.display()
            )));
        }

        let mut pages = Vec::new();
        let mut skipped = 0;

        for entry in WalkDir::new(&self.config.docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" && ext != "mdx" {
                continue;
            }

            let relative_path = logical_path(&self.config.docs_dir, path);

            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", relative_path, e);
                    skipped += 1;
                    continue;
                }
            };

            let source = String::from_utf8_lossy(&bytes);
            match parse_page(&relative_path, &source) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", relative_path, e);
                    skipped += 1;
                }
            }
        }

        pages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok((pages, skipped))
    }

    /// Write one page's metadata record.
    fn write_page_data(&self, page: &PageData) -> Result<(), BuildError> {
        let path = page_data_path(&self.config.output_dir, &page.relative_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        let json = serde_json::to_string(page)
            .map_err(|e| BuildError::SerializeError(e.to_string()))?;

        fs::write(&path, json).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Write the page index.
    fn write_index(&self, pages: &[PageData]) -> Result<(), BuildError> {
        let index: Vec<IndexEntry> = pages
            .iter()
            .map(|page| IndexEntry {
                relative_path: page.relative_path.clone(),
                title: page.title.clone(),
                has_raw_source: page.has_raw_source(),
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::SerializeError(e.to_string()))?;

        let dir = self.config.output_dir.join(PAGE_DATA_DIR);
        fs::create_dir_all(&dir).map_err(|e| BuildError::WriteError(e.to_string()))?;
        fs::write(dir.join("index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate the hydration runtime.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let ctx = RuntimeContext::new(self.stars.stars(), self.config.targets.clone());
        match ctx.stars {
            Some(stars) => tracing::info!("Star badge will show {} stars", stars),
            None => tracing::info!("Star count unknown, badge disabled"),
        }

        let assets = self
            .assets
            .render(&ctx)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        fs::write(assets_dir.join("hydrate.js"), assets.script)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        fs::write(assets_dir.join("hydrate.css"), assets.styles)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Logical path of `path` under `root`, with `/` separators.
fn logical_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Location of a page's metadata record in a build output.
pub fn page_data_path(output_dir: &Path, relative_path: &str) -> PathBuf {
    output_dir
        .join(PAGE_DATA_DIR)
        .join(format!("{}.json", relative_path.trim_start_matches('/')))
}

/// Read a page's metadata record back from a build output.
pub fn load_page_data(output_dir: &Path, relative_path: &str) -> Result<PageData, BuildError> {
    let path = page_data_path(output_dir, relative_path);

    let content = fs::read_to_string(&path)
        .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))
}
