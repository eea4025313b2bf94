//! Site build command.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quire_hydrate::{CachedStars, FixedStars, HydrationTargets, StarSource, StarsFile};
use quire_static::{BuildConfig, StaticBuilder};
use serde::Deserialize;

/// Configuration file structure (docs.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    docs: DocsConfig,
    #[serde(default)]
    build: BuildSettings,
    #[serde(default)]
    stars: StarsConfig,
    #[serde(default)]
    hydrate: HydrationTargets,
}

#[derive(Debug, Deserialize)]
struct DocsConfig {
    #[serde(default = "default_docs_dir")]
    dir: String,
    #[serde(default = "default_output")]
    output: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_minify")]
    minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

/// Where the star count comes from. `file` wins over `count`.
#[derive(Debug, Deserialize)]
struct StarsConfig {
    count: Option<u64>,
    file: Option<String>,
    #[serde(default = "default_max_age")]
    max_age_secs: u64,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            count: None,
            file: None,
            max_age_secs: default_max_age(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_max_age() -> u64 {
    3600
}

impl StarsConfig {
    fn source(&self) -> Arc<dyn StarSource> {
        match &self.file {
            Some(file) => Arc::new(CachedStars::new(
                StarsFile::new(file),
                Duration::from_secs(self.max_age_secs),
            )),
            None => Arc::new(FixedStars(self.count)),
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(config_path: &Path) -> Result<ConfigFile> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::info!("Loaded config from {}", config_path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building site...");

    let file_config = load_config(config_path)?;

    let config = BuildConfig {
        docs_dir: PathBuf::from(&file_config.docs.dir),
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file_config.docs.output)),
        minify: minify.unwrap_or(file_config.build.minify),
        targets: file_config.hydrate,
    };

    let result = StaticBuilder::new(config)
        .with_stars(file_config.stars.source())
        .build()
        .await?;

    tracing::info!(
        "Built {} pages ({} with raw source, {} skipped) in {}ms",
        result.pages,
        result.with_source,
        result.skipped,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("docs.toml")).unwrap();

        assert_eq!(config.docs.dir, "docs");
        assert_eq!(config.docs.output, "dist");
        assert!(config.build.minify);
        assert_eq!(config.stars.max_age_secs, 3600);
        assert_eq!(config.hydrate, HydrationTargets::default());
        assert_eq!(config.stars.source().stars(), None);
    }

    #[test]
    fn parses_full_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(
            &path,
            r#"
[docs]
dir = "site"

[build]
minify = false

[stars]
count = 4200

[hydrate]
nav_link = "repo-link"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.docs.dir, "site");
        assert_eq!(config.docs.output, "dist");
        assert!(!config.build.minify);
        assert_eq!(config.hydrate.nav_link, "repo-link");
        assert_eq!(config.hydrate.badge, "star-badge");
        assert_eq!(config.stars.source().stars(), Some(4200));
    }

    #[test]
    fn star_file_takes_precedence() {
        let temp = tempdir().unwrap();
        let stars = temp.path().join("stars.json");
        fs::write(&stars, r#"{"stars": 77}"#).unwrap();

        let config = StarsConfig {
            count: Some(1),
            file: Some(stars.display().to_string()),
            max_age_secs: 60,
        };

        assert_eq!(config.source().stars(), Some(77));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[docs\ndir = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[tokio::test]
    async fn builds_from_config() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("index.md"), "# Home").unwrap();

        let config_path = temp.path().join("docs.toml");
        fs::write(
            &config_path,
            format!(
                "[docs]\ndir = {:?}\noutput = {:?}\n",
                docs.display().to_string(),
                temp.path().join("out").display().to_string()
            ),
        )
        .unwrap();

        run(&config_path, None, None).await.unwrap();

        assert!(temp.path().join("out/pagedata/index.md.json").exists());
        assert!(temp.path().join("out/assets/hydrate.js").exists());
    }
}
