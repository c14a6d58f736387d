//! Post repository - loads the post collection from the data document

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::Post;
use crate::error::{LoadError, PostNotFound};

/// Where the data document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Remote(String),
}

impl DataSource {
    /// Resolve a configured location against the site directory
    pub fn resolve(base_dir: &Path, location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Remote(location.to_string())
        } else {
            let path = Path::new(location);
            if path.is_absolute() {
                DataSource::File(path.to_path_buf())
            } else {
                DataSource::File(base_dir.join(path))
            }
        }
    }

    /// Human readable location, used in errors and logs
    pub fn location(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Remote(url) => url.clone(),
        }
    }
}

#[derive(Deserialize)]
struct PostsDocument {
    #[serde(default)]
    posts: Vec<Post>,
}

/// Number of posts in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// The loaded post sequence, immutable for the lifetime of one page view
#[derive(Debug, Clone, Default)]
pub struct PostRepository {
    posts: Vec<Post>,
}

impl PostRepository {
    /// Retrieve the full collection once. No retry.
    pub async fn load(source: &DataSource) -> Result<Self, LoadError> {
        match source {
            DataSource::File(path) => Self::load_file(path),
            DataSource::Remote(url) => Self::load_remote(url).await,
        }
    }

    /// Load from a local JSON document
    pub fn load_file(path: &Path) -> Result<Self, LoadError> {
        let location = path.display().to_string();
        let json = fs::read_to_string(path).map_err(|e| LoadError::Unreachable {
            location: location.clone(),
            reason: e.to_string(),
        })?;
        let repository = Self::from_json(&location, &json)?;
        tracing::debug!("Loaded {} posts from {}", repository.len(), location);
        Ok(repository)
    }

    async fn load_remote(url: &str) -> Result<Self, LoadError> {
        let unreachable = |e: reqwest::Error| LoadError::Unreachable {
            location: url.to_string(),
            reason: e.to_string(),
        };

        let response = reqwest::get(url).await.map_err(unreachable)?;
        if !response.status().is_success() {
            return Err(LoadError::Status {
                location: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let json = response.text().await.map_err(unreachable)?;
        let repository = Self::from_json(url, &json)?;
        tracing::debug!("Fetched {} posts from {}", repository.len(), url);
        Ok(repository)
    }

    /// Parse a `{ "posts": [...] }` document
    pub fn from_json(location: &str, json: &str) -> Result<Self, LoadError> {
        let document: PostsDocument =
            serde_json::from_str(json).map_err(|e| LoadError::Malformed {
                location: location.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_posts(document.posts)
    }

    /// Build a repository, checking that ids and slugs are unique
    pub fn from_posts(posts: Vec<Post>) -> Result<Self, LoadError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();

        for post in &posts {
            if !ids.insert(post.id) {
                return Err(LoadError::DuplicateId(post.id));
            }
            if !slugs.insert(post.slug.as_str()) {
                return Err(LoadError::DuplicateSlug(post.slug.clone()));
            }
        }

        Ok(Self { posts })
    }

    /// All posts in document order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Exact, case-sensitive slug lookup
    pub fn find_by_slug(&self, slug: &str) -> Result<&Post, PostNotFound> {
        self.posts
            .iter()
            .find(|post| post.slug == slug)
            .ok_or_else(|| PostNotFound {
                slug: slug.to_string(),
            })
    }

    /// Categories in first-seen order, grouped case-insensitively
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut categories: IndexMap<String, CategoryCount> = IndexMap::new();
        for post in &self.posts {
            if post.category.is_empty() {
                continue;
            }
            categories
                .entry(post.category.to_lowercase())
                .or_insert_with(|| CategoryCount {
                    name: post.category.clone(),
                    count: 0,
                })
                .count += 1;
        }
        categories.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"{
        "posts": [
            {"id": 1, "slug": "flutter-supabase", "title": "Flutter", "category": "Project"},
            {"id": 2, "slug": "invalid-constant", "title": "Constants", "category": "Mobile"},
            {"id": 3, "slug": "intern-interview", "title": "Interview", "category": "project"}
        ]
    }"#;

    #[test]
    fn test_find_by_slug() {
        let repo = PostRepository::from_json("test", DOCUMENT).unwrap();
        assert_eq!(repo.find_by_slug("invalid-constant").unwrap().id, 2);
        assert_eq!(
            repo.find_by_slug("Invalid-Constant"),
            Err(PostNotFound {
                slug: "Invalid-Constant".to_string()
            })
        );
    }

    #[test]
    fn test_missing_posts_key_is_empty() {
        let repo = PostRepository::from_json("test", "{}").unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let err = PostRepository::from_json("test", "{\"posts\": [").unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let posts = vec![Post::new(1, "same", "A"), Post::new(2, "same", "B")];
        let err = PostRepository::from_posts(posts).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateSlug(slug) if slug == "same"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let posts = vec![Post::new(7, "a", "A"), Post::new(7, "b", "B")];
        let err = PostRepository::from_posts(posts).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId(7)));
    }

    #[test]
    fn test_categories_grouped_in_order() {
        let repo = PostRepository::from_json("test", DOCUMENT).unwrap();
        let categories = repo.categories();
        assert_eq!(
            categories,
            vec![
                CategoryCount {
                    name: "Project".to_string(),
                    count: 2
                },
                CategoryCount {
                    name: "Mobile".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_resolve_source() {
        let base = Path::new("/site");
        assert_eq!(
            DataSource::resolve(base, "data/blog-posts.json"),
            DataSource::File(PathBuf::from("/site/data/blog-posts.json"))
        );
        assert_eq!(
            DataSource::resolve(base, "https://example.com/posts.json"),
            DataSource::Remote("https://example.com/posts.json".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blog-posts.json");
        fs::write(&path, DOCUMENT).unwrap();

        let repo = PostRepository::load(&DataSource::File(path)).await.unwrap();
        assert_eq!(repo.len(), 3);
        assert_eq!(repo.posts()[0].slug, "flutter-supabase");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let source = DataSource::File(dir.path().join("missing.json"));
        let err = PostRepository::load(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Unreachable { .. }));
    }
}
