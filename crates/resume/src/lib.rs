//! Resume - compose a resume record into a PDF
//!
//! This crate provides:
//! - The `ResumeRecord` wire model
//! - Three fixed templates (`classic`, `modern`, `creative`)
//! - Profile image loading from inline data or a remote URL
//! - Layout of a record into a `RenderPlan` and rendering it through a `Canvas`
//! - The request boundary (`ResumeRenderer`) producing a downloadable document
//!
//! # Example
//!
//! ```ignore
//! use resume::{ResumeConfig, ResumeRecord, ResumeRenderer};
//!
//! let renderer = ResumeRenderer::new(&ResumeConfig::from_env()?)?;
//! let document = renderer.render(&ResumeRecord::from_json(body)?)?;
//! std::fs::write(&document.filename, &document.bytes)?;
//! ```

pub mod composer;
pub mod config;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod render;
mod service;
pub mod template;

pub use composer::{compose, document_title, DrawOp, RenderPlan, Role, TextRun};
pub use config::ResumeConfig;
pub use image_loader::{HttpFetcher, ImageBuffer, ImageError, ImageFetcher, ImageLoader};
pub use model::{Education, Experience, ResumeRecord};
pub use render::{render_plan, Canvas, PdfCanvas};
pub use service::{
    suggested_filename, ErrorPayload, RenderedDocument, ResumeRenderer, PDF_CONTENT_TYPE,
};
pub use template::{resolve, HeaderStyle, ImagePlacement, TemplateKind, TemplateSpec, TextStyle};

use thiserror::Error;

/// Errors that can occur while producing a resume document
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] pdf_core::PdfError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type for resume operations
pub type Result<T> = std::result::Result<T, ResumeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_wraps_pdf_error() {
        let err: ResumeError = pdf_core::PdfError::InvalidPage(2, 1).into();
        assert_eq!(
            err.to_string(),
            "Render error: Invalid page number: 2 (document has 1 pages)"
        );
    }

    #[test]
    fn test_invalid_request_from_json() {
        let err: ResumeError = serde_json::from_str::<ResumeRecord>("42")
            .unwrap_err()
            .into();
        assert!(matches!(err, ResumeError::InvalidRequest(_)));
    }
}
