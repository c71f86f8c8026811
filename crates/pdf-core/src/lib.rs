//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Creating blank A4 documents
//! - Standard Type1 fonts (Helvetica family) with WinAnsi encoding and metrics
//! - Inserting text, filled rectangles and images at specific coordinates
//! - Document metadata and serialization to bytes
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, PageSize, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::new(PageSize::A4);
//! doc.set_title("Jane Doe - Resume");
//! doc.set_font(StandardFont::HelveticaBold, 20.0);
//! doc.insert_text("Jane Doe", 1, 50.0, 64.36, Align::Left)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod image;
mod text;

pub use document::{Color, PageSize, PdfDocument};
pub use font::{encode_win_ansi, StandardFont};
pub use text::{wrap_text, TextOp};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_image_error_display() {
        let err = PdfError::ImageError("Unknown image format".to_string());
        assert_eq!(err.to_string(), "Image error: Unknown image format");
    }
}
