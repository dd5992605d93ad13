//! Index thumbnails
//!
//! Each post with an index image gets `thumb_<image>` next to the image. A
//! thumbnail that already exists is never regenerated.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;

use crate::content::ExistingPost;
use crate::error::JournalError;
use crate::helpers::join_url;

/// Prefix of generated thumbnail files
pub const THUMBNAIL_PREFIX: &str = "thumb_";

/// Set `thumbnail_url` on every post with an index image, generating
/// missing thumbnail files
///
/// Returns how many thumbnails were generated.
pub fn build_thumbnails(posts: &mut [ExistingPost], max_size: u32) -> Result<usize> {
    let mut count = 0;

    for post in posts.iter_mut() {
        let Some(index_image) = post.index_image.as_deref() else {
            continue;
        };
        let thumbnail_name = format!("{}{}", THUMBNAIL_PREFIX, index_image);
        let parent_url =
            post.thumbnail_parent_url
                .as_deref()
                .ok_or_else(|| JournalError::MissingThumbnailParent {
                    post_id: post.record.post_id.clone(),
                })?;

        let media_dir = post.record.media_dir();
        let thumbnail_path = media_dir.join(&thumbnail_name);
        let thumbnail_url = join_url(parent_url, &thumbnail_name);

        if !thumbnail_path.exists() {
            make_thumbnail(&media_dir.join(index_image), &thumbnail_path, max_size)?;
            count += 1;
        }
        post.thumbnail_url = Some(thumbnail_url);
    }

    tracing::debug!("Built {} thumbnails", count);
    Ok(count)
}

/// Write an upright copy of `source` that fits in a `max_size` square
///
/// Images already small enough keep their size.
pub fn make_thumbnail(source: &Path, dest: &Path, max_size: u32) -> Result<()> {
    let mut decoder = ImageReader::open(source)
        .with_context(|| format!("Failed to open {:?}", source))?
        .with_guessed_format()?
        .into_decoder()
        .with_context(|| format!("Failed to decode {:?}", source))?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)
        .with_context(|| format!("Failed to decode {:?}", source))?;
    image.apply_orientation(orientation);

    if image.width() > max_size || image.height() > max_size {
        image = image.resize(max_size, max_size, FilterType::Lanczos3);
    }

    // JPEG has no alpha channel
    if ImageFormat::from_path(dest).ok() == Some(ImageFormat::Jpeg) {
        image = DynamicImage::ImageRgb8(image.to_rgb8());
    }

    image
        .save(dest)
        .with_context(|| format!("Failed to write {:?}", dest))?;
    tracing::debug!("Wrote thumbnail {:?}", dest);
    Ok(())
}
