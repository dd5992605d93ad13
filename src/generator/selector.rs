//! Choosing which post pages a single-post rebuild must rewrite

use super::navigation::neighbours;
use crate::content::ExistingPost;

/// Indices of the target post and its two neighbours
///
/// The first post with a matching id wins. Indices are deduplicated, so small
/// collections yield fewer than three. An unknown id yields nothing.
pub fn rebuild_indices(post_id: &str, posts: &[ExistingPost]) -> Vec<usize> {
    let Some(found) = posts.iter().position(|p| p.post_id() == post_id) else {
        return Vec::new();
    };

    let (previous, next) = neighbours(found, posts.len());
    let mut indices = vec![found];
    for index in [previous, next] {
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    indices
}

/// The target post and its two neighbours
pub fn select_for_rebuild<'a>(post_id: &str, posts: &'a [ExistingPost]) -> Vec<&'a ExistingPost> {
    rebuild_indices(post_id, posts)
        .into_iter()
        .map(|index| &posts[index])
        .collect()
}
