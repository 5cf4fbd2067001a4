//! Asset naming convention.
//!
//! Every stored original is named `{timestamp_ms}-{random}.{ext}` and its
//! thumbnail is the same name with [`THUMBNAIL_MARKER`] inserted right before
//! the final extension. Upload, list and delete all go through this module so
//! the pairing rule lives in exactly one place.

use chrono::Utc;

use crate::models::MediaKind;

/// Marker inserted before the extension of an original to name its thumbnail.
pub const THUMBNAIL_MARKER: &str = "_thumb";

/// Generate a fresh, collision-resistant file name for an accepted upload.
///
/// The millisecond timestamp keeps names roughly time-ordered; the 64 random
/// bits make two uploads in the same millisecond practically never collide.
pub fn generate_file_name(kind: MediaKind) -> String {
    let millis = Utc::now().timestamp_millis();
    let random: u64 = rand::random();
    format!("{}-{:016x}.{}", millis, random, kind.extension())
}

/// Split `name` into `(stem, extension)` at the last dot.
///
/// A leading dot does not start an extension (`.hidden` has none).
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Derive the thumbnail name for an original: `X.ext` -> `X_thumb.ext`.
///
/// Only the last extension segment is considered, so `a.b.png` becomes
/// `a.b_thumb.png`.
pub fn thumbnail_name(file_name: &str) -> String {
    match split_extension(file_name) {
        (stem, Some(ext)) => format!("{}{}.{}", stem, THUMBNAIL_MARKER, ext),
        (stem, None) => format!("{}{}", stem, THUMBNAIL_MARKER),
    }
}

/// Whether `file_name` follows the thumbnail naming rule.
pub fn is_thumbnail(file_name: &str) -> bool {
    let (stem, _) = split_extension(file_name);
    stem.ends_with(THUMBNAIL_MARKER)
}

/// Inverse of [`thumbnail_name`]. Returns `None` when `file_name` is not a thumbnail name.
pub fn original_name(file_name: &str) -> Option<String> {
    let (stem, ext) = split_extension(file_name);
    let base = stem.strip_suffix(THUMBNAIL_MARKER)?;
    if base.is_empty() {
        return None;
    }
    Some(match ext {
        Some(ext) => format!("{}.{}", base, ext),
        None => base.to_string(),
    })
}

/// Extension of `file_name`, lowercased, if any.
pub fn extension(file_name: &str) -> Option<String> {
    split_extension(file_name).1.map(|e| e.to_lowercase())
}

/// Whether `file_name` is safe to use as a single path segment / key suffix.
pub fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && !file_name.starts_with('.')
        && !file_name.contains("..")
        && !file_name.contains('/')
        && !file_name.contains('\\')
        && !file_name.chars().any(|c| c.is_control())
}
