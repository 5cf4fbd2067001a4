use std::fmt::{Display, Formatter, Result as FmtResult};

/// Image media types accepted for upload.
///
/// The allow-list is fixed at compile time. Anything that does not map to one
/// of these variants is rejected as an unsupported media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Jpeg,
    Png,
    Webp,
    Gif,
    Avif,
}

impl MediaKind {
    pub const ALL: [MediaKind; 5] = [
        MediaKind::Jpeg,
        MediaKind::Png,
        MediaKind::Webp,
        MediaKind::Gif,
        MediaKind::Avif,
    ];

    /// Canonical MIME string.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Png => "image/png",
            MediaKind::Webp => "image/webp",
            MediaKind::Gif => "image/gif",
            MediaKind::Avif => "image/avif",
        }
    }

    /// File extension used for stored names (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Jpeg => "jpg",
            MediaKind::Png => "png",
            MediaKind::Webp => "webp",
            MediaKind::Gif => "gif",
            MediaKind::Avif => "avif",
        }
    }

    /// Resolve a MIME string, ignoring case and parameters (`image/png; q=1`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(MediaKind::Jpeg),
            "image/png" => Some(MediaKind::Png),
            "image/webp" => Some(MediaKind::Webp),
            "image/gif" => Some(MediaKind::Gif),
            "image/avif" => Some(MediaKind::Avif),
            _ => None,
        }
    }

    /// Resolve a stored file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaKind::Jpeg),
            "png" => Some(MediaKind::Png),
            "webp" => Some(MediaKind::Webp),
            "gif" => Some(MediaKind::Gif),
            "avif" => Some(MediaKind::Avif),
            _ => None,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.mime())
    }
}
