//! Image URI resolution.

use std::path::{Path, PathBuf};

use serde::Serialize;
use url::Url;

/// Where the host should load an image from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Fetched over HTTP(S).
    Network,
    /// Read from the local filesystem.
    File,
    /// Bundled with the application (`resource:` scheme).
    Asset,
    /// Inline `data:` URI.
    Data,
}

/// An image URI after resolution against the view's base locations.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub source: ImageSource,
    pub uri: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Resolves an `img` source.
///
/// A trailing `#WIDTHxHEIGHT` fragment is stripped and reported as the
/// intended size. Scheme-relative and bare paths are resolved against
/// `base_url` first, then `image_directory`.
pub fn resolve_image(src: &str, base_url: Option<&Url>, image_directory: Option<&Path>) -> ResolvedImage {
    let (src, width, height) = split_size(src.trim());

    let resolved = |source, uri: String| ResolvedImage {
        source,
        uri,
        width,
        height,
    };

    if let Some(asset) = src.strip_prefix("resource:") {
        return resolved(ImageSource::Asset, asset.to_string());
    }
    if src.starts_with("data:") {
        return resolved(ImageSource::Data, src.to_string());
    }

    if src.starts_with("//") {
        let uri = match base_url.and_then(|base| base.join(src).ok()) {
            Some(url) => url.to_string(),
            None => format!("https:{src}"),
        };
        return resolved(ImageSource::Network, uri);
    }

    if let Ok(url) = Url::parse(src) {
        match url.scheme() {
            "http" | "https" => return resolved(ImageSource::Network, url.to_string()),
            "file" => {
                let path = url
                    .to_file_path()
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_else(|()| url.path().to_string());
                return resolved(ImageSource::File, path);
            }
            // A Windows drive letter parses as a one-letter scheme.
            scheme if scheme.len() > 1 => {
                tracing::debug!(scheme, src, "unrecognized image scheme, treating as network");
                return resolved(ImageSource::Network, url.to_string());
            }
            _ => {}
        }
    }

    if let Some(base) = base_url {
        if let Ok(url) = base.join(src) {
            let source = if url.scheme() == "file" {
                ImageSource::File
            } else {
                ImageSource::Network
            };
            return resolved(source, url.to_string());
        }
    }

    let path = match image_directory {
        Some(dir) if Path::new(src).is_relative() => dir.join(src),
        _ => PathBuf::from(src),
    };
    resolved(ImageSource::File, path.to_string_lossy().into_owned())
}

/// Splits a `#WxH` size hint off the end of `src`.
fn split_size(src: &str) -> (&str, Option<f32>, Option<f32>) {
    let Some((rest, fragment)) = src.rsplit_once('#') else {
        return (src, None, None);
    };
    let Some((width, height)) = fragment.split_once('x') else {
        return (src, None, None);
    };
    match (width.parse::<f32>(), height.parse::<f32>()) {
        (Ok(width), Ok(height)) if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 => {
            (rest, Some(width), Some(height))
        }
        _ => (src, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn base() -> Url {
        Url::parse("https://cdn.example.test/docs/").unwrap()
    }

    #[rstest]
    #[case::absolute("https://a.test/x.png", ImageSource::Network, "https://a.test/x.png")]
    #[case::relative("img/x.png", ImageSource::Network, "https://cdn.example.test/docs/img/x.png")]
    #[case::rooted("/x.png", ImageSource::Network, "https://cdn.example.test/x.png")]
    #[case::scheme_relative("//other.test/x.png", ImageSource::Network, "https://other.test/x.png")]
    #[case::asset("resource:icons/logo.png", ImageSource::Asset, "icons/logo.png")]
    #[case::data("data:image/png;base64,AAAA", ImageSource::Data, "data:image/png;base64,AAAA")]
    fn test_resolve_with_base_url(#[case] src: &str, #[case] source: ImageSource, #[case] uri: &str) {
        let image = resolve_image(src, Some(&base()), None);
        assert_eq!(image.source, source);
        assert_eq!(image.uri, uri);
    }

    #[test]
    fn test_scheme_relative_without_base_defaults_to_https() {
        let image = resolve_image("//other.test/x.png", None, None);
        assert_eq!(image.uri, "https://other.test/x.png");
    }

    #[test]
    fn test_relative_path_uses_image_directory() {
        let image = resolve_image("x.png", None, Some(Path::new("/srv/docs")));
        assert_eq!(image.source, ImageSource::File);
        assert_eq!(PathBuf::from(&image.uri), Path::new("/srv/docs").join("x.png"));
    }

    #[test]
    fn test_relative_path_without_base() {
        let image = resolve_image("x.png", None, None);
        assert_eq!(image.source, ImageSource::File);
        assert_eq!(image.uri, "x.png");
    }

    #[test]
    fn test_size_fragment() {
        let image = resolve_image("https://a.test/x.png#120x80", None, None);
        assert_eq!(image.uri, "https://a.test/x.png");
        assert_eq!(image.width, Some(120.0));
        assert_eq!(image.height, Some(80.0));
    }

    #[test]
    fn test_non_size_fragment_is_kept() {
        let image = resolve_image("https://a.test/x.svg#icon", None, None);
        assert_eq!(image.uri, "https://a.test/x.svg#icon");
        assert_eq!(image.width, None);
    }
}
