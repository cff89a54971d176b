//! Error types for the image-sketch crate.

/// Errors that can occur while rendering or persisting sketch images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input image cannot be processed (e.g. it has a zero dimension).
    #[error("invalid input image: {0}")]
    InvalidInput(String),

    /// Two blend operands do not share the same dimensions.
    #[error(
        "mismatched image dimensions: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    InvalidDimensions {
        /// Dimensions of the first operand.
        expected: (u32, u32),
        /// Dimensions of the offending operand.
        actual: (u32, u32),
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred while decoding or encoding an image file.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let invalid = Error::InvalidInput("image is 0x10".to_string());
        assert!(invalid.to_string().contains("0x10"));

        let mismatch = Error::InvalidDimensions {
            expected: (10, 20),
            actual: (30, 40),
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("10x20"));
        assert!(msg.contains("30x40"));
    }
}
