//! Asset pipeline for the hydration runtime.

use crate::templates::{RuntimeContext, TemplateEngine};

/// Rendered runtime assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeAssets {
    /// Contents of `assets/hydrate.js`
    pub script: String,
    /// Contents of `assets/hydrate.css`
    pub styles: String,
}

/// Asset pipeline utilities.
pub struct AssetPipeline {
    templates: TemplateEngine,
    minify: bool,
}

impl AssetPipeline {
    /// Create a pipeline; `minify` applies to the stylesheet.
    pub fn new(minify: bool) -> Self {
        Self {
            templates: TemplateEngine::new(),
            minify,
        }
    }

    /// Render the runtime script and stylesheet for a build.
    pub fn render(&self, ctx: &RuntimeContext) -> Result<RuntimeAssets, minijinja::Error> {
        let script = self.templates.render_script(ctx)?;
        let styles = self.templates.render_styles(ctx)?;

        let styles = if self.minify {
            match Self::minify_css(&styles) {
                Ok(minified) => minified,
                Err(e) => {
                    tracing::warn!("Shipping unminified stylesheet: {}", e);
                    styles
                }
            }
        } else {
            styles
        };

        Ok(RuntimeAssets { script, styles })
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

impl Default for AssetPipeline {
    fn default() -> Self {
        Self::new(true)
    }
}
