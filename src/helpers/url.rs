//! Site-relative URL helpers

use anyhow::{anyhow, Result};
use std::path::{Component, Path};

/// Convert a path inside the site directory into a root-relative URL
///
/// # Examples
/// ```ignore
/// site_url("/srv/site", "/srv/site/posts/2024/01/x/index.html") // -> "/posts/2024/01/x/index.html"
/// ```
pub fn site_url(site_dir: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(site_dir)
        .map_err(|_| anyhow!("{:?} is not inside the site directory {:?}", path, site_dir))?;

    let mut url = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            url.push('/');
            url.push_str(&part.to_string_lossy());
        }
    }

    if url.is_empty() {
        url.push('/');
    }
    Ok(url)
}

/// Join a file name onto a root-relative directory URL
pub fn join_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_url() {
        let site = Path::new("/srv/site");
        let page = site.join("posts/2024/01/id/index.html");
        assert_eq!(
            site_url(site, &page).unwrap(),
            "/posts/2024/01/id/index.html"
        );
        assert_eq!(site_url(site, site).unwrap(), "/");
    }

    #[test]
    fn test_site_url_outside_site() {
        assert!(site_url(Path::new("/srv/site"), Path::new("/tmp/x")).is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/posts/a/media", "thumb_x.jpg"), "/posts/a/media/thumb_x.jpg");
        assert_eq!(join_url("/posts/a/media/", "/x.jpg"), "/posts/a/media/x.jpg");
    }
}
