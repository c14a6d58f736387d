//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::helpers::{is_valid_date_format, DEFAULT_DATE_FORMAT};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    pub listing_page: String,
    pub detail_page: String,

    // Data
    /// Path relative to the site directory, or an absolute http(s) URL
    pub data_source: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Rendering
    pub related_posts: usize,
    pub conclusion_title: String,
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            listing_page: "blog.html".to_string(),
            detail_page: "blog-detail.html".to_string(),

            data_source: "data/blog-posts.json".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            related_posts: 2,
            conclusion_title: "✨ Conclusion".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, at render time
    pub fn validate(&self) -> Result<()> {
        if !is_valid_date_format(&self.date_format) {
            anyhow::bail!("Invalid date_format in config: {:?}", self.date_format);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.listing_page, "blog.html");
        assert_eq!(config.detail_page, "blog-detail.html");
        assert_eq!(config.related_posts, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Quy's Blog
author: Huynh Xuan Quy
data_source: https://example.com/data/blog-posts.json
related_posts: 3
github_username: quy
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Quy's Blog");
        assert_eq!(config.author, "Huynh Xuan Quy");
        assert_eq!(config.related_posts, 3);
        assert_eq!(config.data_source, "https://example.com/data/blog-posts.json");
        assert_eq!(config.public_dir, "public");
        assert!(config.extra.contains_key("github_username"));
    }

    #[test]
    fn test_load_rejects_invalid_date_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "date_format: '%Q'\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("date_format"));

        fs::write(&path, "date_format: '%Y/%m/%d'\n").unwrap();
        assert_eq!(SiteConfig::load(&path).unwrap().date_format, "%Y/%m/%d");
    }
}
