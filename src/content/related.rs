//! Related posts shown under a detail view

use super::Post;

/// Up to `limit` other posts from the same category, in sequence order.
///
/// Never pads with posts from other categories.
pub fn related_posts<'a>(current: &Post, posts: &'a [Post], limit: usize) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| post.id != current.id && post.category == current.category)
        .take(limit)
        .collect()
}
