//! Error types for loading and looking up posts

use thiserror::Error;

/// Failure to retrieve the post collection
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data source {location} is unreachable: {reason}")]
    Unreachable { location: String, reason: String },

    #[error("data source {location} answered with status {status}")]
    Status { location: String, status: u16 },

    #[error("data source {location} is malformed: {reason}")]
    Malformed { location: String, reason: String },

    #[error("duplicate slug in data source: {0}")]
    DuplicateSlug(String),

    #[error("duplicate post id in data source: {0}")]
    DuplicateId(u64),
}

/// No post matches the requested slug
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no post with slug `{slug}`")]
pub struct PostNotFound {
    pub slug: String,
}

/// Terminal failure of a rendered view
#[derive(Error, Debug)]
pub enum PageError {
    #[error("No blog post specified")]
    MissingSlug,

    #[error("Blog post not found")]
    NotFound(#[from] PostNotFound),

    #[error("Failed to load blog posts")]
    Load(#[from] LoadError),
}

impl PageError {
    /// HTTP status for the view replacing the main content
    pub fn status(&self) -> u16 {
        match self {
            PageError::MissingSlug => 400,
            PageError::NotFound(_) => 404,
            PageError::Load(_) => 503,
        }
    }

    /// Explanation shown under the headline
    pub fn detail(&self) -> &'static str {
        match self {
            PageError::MissingSlug | PageError::NotFound(_) => {
                "The blog post you're looking for doesn't exist or has been removed."
            }
            PageError::Load(_) => "The blog data could not be loaded. Please try again later.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_status() {
        assert_eq!(PageError::MissingSlug.status(), 400);
        let not_found: PageError = PostNotFound {
            slug: "nope".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), 404);
        assert_eq!(not_found.to_string(), "Blog post not found");
        let load: PageError = LoadError::DuplicateId(3).into();
        assert_eq!(load.status(), 503);
    }
}
