use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("cannot read file list {path}: {source}")]
    FileList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("cannot set up framebuffer: {0}")]
    Framebuffer(#[from] softbuffer::SoftBufferError),
}

/// Why one image could not be shown. Kept per index; never fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{path}: {message}")]
    Open { path: PathBuf, message: String },
    #[error("{path}: {message}")]
    Decode { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framebuffer_errors_convert() {
        let err: GalleryError = softbuffer::SoftBufferError::Unimplemented.into();
        assert!(matches!(err, GalleryError::Framebuffer(_)));
        assert!(err.to_string().starts_with("cannot set up framebuffer: "));
    }
}
