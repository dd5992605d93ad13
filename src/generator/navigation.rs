//! Circular previous/next links between posts

use crate::content::ExistingPost;

/// Indices of the posts before and after `index`, wrapping around at both ends
pub fn neighbours(index: usize, len: usize) -> (usize, usize) {
    debug_assert!(index < len, "index {} out of bounds for {} posts", index, len);
    ((index + len - 1) % len, (index + 1) % len)
}

/// Point every post at its chronological neighbours
///
/// The first post's previous is the last post and the last post's next is
/// the first, so the links form one cycle. A lone post links to itself.
pub fn link_navigation(posts: &mut [ExistingPost]) {
    let len = posts.len();
    let urls: Vec<String> = posts.iter().map(|p| p.post_url.clone()).collect();

    for (index, post) in posts.iter_mut().enumerate() {
        let (previous, next) = neighbours(index, len);
        post.record.previous = Some(urls[previous].clone());
        post.record.next = Some(urls[next].clone());
    }
}
