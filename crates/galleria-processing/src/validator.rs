use galleria_core::{AppError, MediaKind};

/// Validation errors raised before any image work or storage I/O
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { size, max } => AppError::PayloadTooLarge {
                size: size as u64,
                max: max as u64,
            },
            ValidationError::UnsupportedMediaType(mime) => AppError::UnsupportedMediaType(mime),
            ValidationError::EmptyFile => AppError::InvalidInput("Empty file".to_string()),
        }
    }
}

/// Image upload validator
///
/// Checks size limits and determines the real media type of an upload from
/// its magic bytes. The client-declared type is only consulted when the
/// content itself is inconclusive.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
}

impl MediaValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        Ok(())
    }

    /// Determine the media type of `data`.
    ///
    /// A recognised signature always wins over `declared`, so a PE executable
    /// labelled `image/png` is rejected and a GIF labelled `image/png` is
    /// stored as GIF.
    pub fn sniff_media_type(
        &self,
        data: &[u8],
        declared: &str,
    ) -> Result<MediaKind, ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }

        match infer::get(data) {
            Some(kind) => {
                let sniffed = kind.mime_type();
                if sniffed != declared {
                    tracing::debug!(
                        sniffed = %sniffed,
                        declared = %declared,
                        "Declared content type differs from sniffed type"
                    );
                }
                MediaKind::from_mime(sniffed)
                    .ok_or_else(|| ValidationError::UnsupportedMediaType(sniffed.to_string()))
            }
            None => {
                tracing::debug!(
                    declared = %declared,
                    "Content sniffing inconclusive, falling back to declared type"
                );
                MediaKind::from_mime(declared)
                    .ok_or_else(|| ValidationError::UnsupportedMediaType(declared.to_string()))
            }
        }
    }

    /// Validate size, then sniff.
    pub fn validate_all(&self, data: &[u8], declared: &str) -> Result<MediaKind, ValidationError> {
        self.validate_file_size(data.len())?;
        self.sniff_media_type(data, declared)
    }
}
