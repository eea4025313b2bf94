//! Generation pass for quire documentation sites.
//!
//! Discovers markdown pages, builds their metadata, runs build-time
//! transforms over it, and emits page data alongside the hydration runtime.

pub mod assets;
pub mod builder;
pub mod templates;

pub use assets::{AssetPipeline, RuntimeAssets};
pub use builder::{
    load_page_data, page_data_path, BuildConfig, BuildError, BuildResult, IndexEntry,
    StaticBuilder,
};
pub use templates::{RuntimeContext, TemplateEngine};
