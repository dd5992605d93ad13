//! Media attachments of new posts
//!
//! Uploads are saved into the post's `media/` folder. Phone "motion photos"
//! (a JPEG with an MP4 appended) are split into a still and a video, and the
//! video is transcoded to H.264 so browsers can play it.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use super::post::NewPost;
use crate::config::JournalConfig;

/// Box type marking the MP4 appended to a motion photo
const MOTION_PHOTO_MARKER: &[u8] = b"ftypisom";

/// Bytes read when sniffing a file's type
const SNIFF_LEN: u64 = 512;

const OCTET_STREAM: &str = "application/octet-stream";

/// An uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name as sent by the client
    pub file_name: String,
    pub data: Vec<u8>,
}

/// How uploads are post-processed
#[derive(Debug, Clone)]
pub struct MediaOptions {
    pub transcode_video: bool,
    pub ffmpeg: String,
}

impl From<&JournalConfig> for MediaOptions {
    fn from(config: &JournalConfig) -> Self {
        Self {
            transcode_video: config.transcode_video,
            ffmpeg: config.ffmpeg.clone(),
        }
    }
}

/// Save uploads into the post's media folder and record their names
pub fn store_uploads(post: &mut NewPost, uploads: &[Upload], options: &MediaOptions) -> Result<()> {
    let media_dir = post.record.media_dir();
    fs::create_dir_all(&media_dir)
        .with_context(|| format!("Failed to create {:?}", media_dir))?;

    for upload in uploads {
        let Some(name) = sanitize_file_name(&upload.file_name) else {
            tracing::debug!("Skipping upload without a usable name");
            continue;
        };
        if upload.data.is_empty() {
            tracing::debug!("Skipping empty upload {}", name);
            continue;
        }

        let path = media_dir.join(&name);
        fs::write(&path, &upload.data).with_context(|| format!("Failed to write {:?}", path))?;

        let mime = sniff_bytes(&upload.data);
        tracing::debug!("Saved {:?} ({})", path, mime);

        if !mime.starts_with("image/") {
            post.media_file_names.push(name);
            continue;
        }

        match split_motion_photo(&upload.data) {
            Some((still, video)) => {
                let names = store_motion_photo(&media_dir, &name, still, video, options)?;
                post.media_file_names.extend(names);
            }
            None => post.media_file_names.push(name),
        }
    }

    Ok(())
}

/// Reduce a client supplied name to a bare file name with spaces replaced
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.replace(' ', "_"))
}

/// Split a motion photo into its still image and its video
///
/// Returns `None` for ordinary images.
pub fn split_motion_photo(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let place = data
        .windows(MOTION_PHOTO_MARKER.len())
        .position(|window| window == MOTION_PHOTO_MARKER)?;

    // The box starts with a 4 byte size ahead of the marker
    if place < 4 || place + MOTION_PHOTO_MARKER.len() == data.len() {
        return None;
    }
    let offset = place - 4;
    Some((&data[..offset], &data[offset..]))
}

/// Write both halves of a motion photo; returns the names to record
fn store_motion_photo(
    media_dir: &Path,
    name: &str,
    still: &[u8],
    video: &[u8],
    options: &MediaOptions,
) -> Result<Vec<String>> {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());

    let still_name = format!("ex_{}.jpg", stem);
    let still_path = media_dir.join(&still_name);
    fs::write(&still_path, still).with_context(|| format!("Failed to write {:?}", still_path))?;

    let video_name = format!("ex_orig_{}.mp4", stem);
    let video_path = media_dir.join(&video_name);
    fs::write(&video_path, video).with_context(|| format!("Failed to write {:?}", video_path))?;

    tracing::info!("Split motion photo {} into {} and {}", name, still_name, video_name);

    let h264_name = format!("ex_h264_{}.mp4", stem);
    let playable = if options.transcode_video
        && transcode_h264(&options.ffmpeg, &video_path, &media_dir.join(&h264_name))
    {
        h264_name
    } else {
        video_name
    };

    Ok(vec![still_name, playable])
}

/// Run ffmpeg; failures are logged and reported as `false`
fn transcode_h264(ffmpeg: &str, input: &Path, output: &Path) -> bool {
    let result = Command::new(ffmpeg)
        .arg("-i")
        .arg(input)
        .args(["-map", "0:0", "-c:v", "libx264", "-crf", "18", "-c:a", "copy"])
        .arg(output)
        .stdin(Stdio::null())
        .output();

    match result {
        Ok(out) if out.status.success() => {
            tracing::debug!("Transcoded {:?} to {:?}", input, output);
            true
        }
        Ok(out) => {
            tracing::warn!(
                "{} exited with {} for {:?}: {}",
                ffmpeg,
                out.status,
                input,
                String::from_utf8_lossy(&out.stderr).trim()
            );
            false
        }
        Err(e) => {
            tracing::warn!("Failed to run {}: {}", ffmpeg, e);
            false
        }
    }
}

/// MIME type of a file, judged from its leading bytes
pub fn sniff_file(path: &Path) -> Result<String> {
    let mut head = Vec::new();
    File::open(path)
        .with_context(|| format!("Failed to open {:?}", path))?
        .take(SNIFF_LEN)
        .read_to_end(&mut head)?;
    Ok(sniff_bytes(&head).to_string())
}

/// MIME type of a byte buffer
pub fn sniff_bytes(data: &[u8]) -> &'static str {
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return match &data[8..12] {
            b"heic" | b"heix" | b"mif1" | b"msf1" => "image/heic",
            b"avif" => "image/avif",
            b"qt  " => "video/quicktime",
            _ => "video/mp4",
        };
    }
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return "video/webm";
    }
    match image::guess_format(data) {
        Ok(format) => format.to_mime_type(),
        Err(_) => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostRecord;
    use crate::helpers::parse_date;
    use std::io::Cursor;

    fn jpeg_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    fn mp4_bytes() -> Vec<u8> {
        let mut data = vec![0, 0, 0, 0x18];
        data.extend_from_slice(b"ftypisom");
        data.extend_from_slice(&[0; 12]);
        data
    }

    fn new_post(dir: &Path) -> NewPost {
        NewPost::new(PostRecord::new(
            parse_date("2024-01-01T00:00:00+00:00").unwrap(),
            dir.join("post-id"),
            "post-id".to_string(),
            "T".to_string(),
            "Ann",
            vec!["random".to_string()],
        ))
    }

    fn no_transcode() -> MediaOptions {
        MediaOptions {
            transcode_video: false,
            ffmpeg: "ffmpeg".to_string(),
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my photo.jpg").as_deref(), Some("my_photo.jpg"));
        assert_eq!(sanitize_file_name("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_file_name("C:\\pics\\a b.png").as_deref(), Some("a_b.png"));
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("dir/"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(sniff_bytes(&jpeg_bytes()), "image/jpeg");
        assert_eq!(sniff_bytes(&mp4_bytes()), "video/mp4");
        assert_eq!(sniff_bytes(b"hello world, plain text"), "application/octet-stream");
    }

    #[test]
    fn test_split_motion_photo() {
        let still = jpeg_bytes();
        let mut data = still.clone();
        data.extend_from_slice(&mp4_bytes());

        let (s, v) = split_motion_photo(&data).unwrap();
        assert_eq!(s, &still[..]);
        assert_eq!(v, &mp4_bytes()[..]);
        assert!(split_motion_photo(&still).is_none());
    }

    #[test]
    fn test_store_plain_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let mut post = new_post(dir.path());
        let uploads = vec![
            Upload {
                file_name: "sunny day.jpg".to_string(),
                data: jpeg_bytes(),
            },
            Upload {
                file_name: String::new(),
                data: vec![1, 2, 3],
            },
            Upload {
                file_name: "clip.mp4".to_string(),
                data: mp4_bytes(),
            },
        ];

        store_uploads(&mut post, &uploads, &no_transcode()).unwrap();

        assert_eq!(post.media_file_names, vec!["sunny_day.jpg", "clip.mp4"]);
        assert!(post.record.media_dir().join("sunny_day.jpg").exists());
        assert!(post.record.media_dir().join("clip.mp4").exists());
    }

    #[test]
    fn test_store_motion_photo_without_transcode() {
        let dir = tempfile::tempdir().unwrap();
        let mut post = new_post(dir.path());
        let mut data = jpeg_bytes();
        data.extend_from_slice(&mp4_bytes());

        store_uploads(
            &mut post,
            &[Upload {
                file_name: "PXL_1.jpg".to_string(),
                data,
            }],
            &no_transcode(),
        )
        .unwrap();

        assert_eq!(post.media_file_names, vec!["ex_PXL_1.jpg", "ex_orig_PXL_1.mp4"]);
        let media = post.record.media_dir();
        assert_eq!(fs::read(media.join("ex_PXL_1.jpg")).unwrap(), jpeg_bytes());
        assert_eq!(fs::read(media.join("ex_orig_PXL_1.mp4")).unwrap(), mp4_bytes());
    }

    #[test]
    fn test_failed_transcode_keeps_original_video() {
        let dir = tempfile::tempdir().unwrap();
        let mut post = new_post(dir.path());
        let mut data = jpeg_bytes();
        data.extend_from_slice(&mp4_bytes());
        let options = MediaOptions {
            transcode_video: true,
            ffmpeg: "/nonexistent/ffmpeg-for-tests".to_string(),
        };

        store_uploads(
            &mut post,
            &[Upload {
                file_name: "m.jpg".to_string(),
                data,
            }],
            &options,
        )
        .unwrap();

        assert_eq!(post.media_file_names, vec!["ex_m.jpg", "ex_orig_m.mp4"]);
    }

    #[test]
    fn test_sniff_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.bin");
        fs::write(&path, jpeg_bytes()).unwrap();
        assert_eq!(sniff_file(&path).unwrap(), "image/jpeg");
    }
}
