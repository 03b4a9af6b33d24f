//! Supported raster formats and their MIME / extension mapping.

use crate::error::{Error, Result};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mime {
    #[serde(rename = "image/gif")]
    Gif,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl Mime {
    pub const ALL: [Mime; 3] = [Mime::Gif, Mime::Png, Mime::Jpeg];

    pub fn as_str(self) -> &'static str {
        match self {
            Mime::Gif => "image/gif",
            Mime::Png => "image/png",
            Mime::Jpeg => "image/jpeg",
        }
    }

    /// Parse a MIME type string. `None` for anything unsupported.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/gif" => Some(Mime::Gif),
            "image/png" => Some(Mime::Png),
            "image/jpeg" | "image/jpg" => Some(Mime::Jpeg),
            _ => None,
        }
    }

    /// Resolve the output format from a filename's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Mime::Jpeg),
            "png" => Ok(Mime::Png),
            "gif" => Ok(Mime::Gif),
            _ => Err(Error::InvalidExtension(ext)),
        }
    }

    /// Detect the format from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes)
            .ok()
            .and_then(Self::from_image_format)
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Gif => Some(Mime::Gif),
            ImageFormat::Png => Some(Mime::Png),
            ImageFormat::Jpeg => Some(Mime::Jpeg),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Mime::Gif => ImageFormat::Gif,
            Mime::Png => ImageFormat::Png,
            Mime::Jpeg => ImageFormat::Jpeg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Mime::Gif => "gif",
            Mime::Png => "png",
            Mime::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for Mime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_strings() {
        assert_eq!(Mime::from_mime("image/jpg"), Some(Mime::Jpeg));
        assert_eq!(Mime::from_mime("IMAGE/PNG"), Some(Mime::Png));
        assert_eq!(Mime::from_mime("image/webp"), None);
        assert_eq!(Mime::Gif.to_string(), "image/gif");
    }

    #[test]
    fn extensions() {
        assert_eq!(Mime::from_path(Path::new("a/b.JPEG")).unwrap(), Mime::Jpeg);
        assert_eq!(Mime::from_path(Path::new("x.png")).unwrap(), Mime::Png);
        assert!(matches!(
            Mime::from_path(Path::new("x.bmp")),
            Err(Error::InvalidExtension(e)) if e == "bmp"
        ));
        assert!(matches!(
            Mime::from_path(Path::new("noext")),
            Err(Error::InvalidExtension(_))
        ));
    }

    #[test]
    fn sniff_png_signature() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(Mime::sniff(&png), Some(Mime::Png));
        assert_eq!(Mime::sniff(b"plain text"), None);
    }

    #[test]
    fn serializes_as_mime_string() {
        assert_eq!(serde_json::to_string(&Mime::Jpeg).unwrap(), "\"image/jpeg\"");
    }
}
