//! folio: a portfolio blog renderer
//!
//! Posts come from a single JSON document. The crate turns them into a
//! listing with category filtering and search, and into detail pages whose
//! bodies are written in a small markdown-like grammar, either as a static
//! site or from a development server.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod page;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use content::{DataSource, PostRepository};

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Where the posts document is read from
    pub data_source: DataSource,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets copied verbatim into the public directory
    pub static_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: std::path::PathBuf, config: config::SiteConfig) -> Self {
        let data_source = DataSource::resolve(&base_dir, &config.data_source);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            data_source,
            public_dir,
            static_dir,
        }
    }

    /// Load the post collection once
    pub async fn load_posts(&self) -> Result<PostRepository, error::LoadError> {
        PostRepository::load(&self.data_source).await
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
