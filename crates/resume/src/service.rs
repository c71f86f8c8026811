//! Request boundary: record in, downloadable PDF or error payload out

use crate::composer::compose;
use crate::config::ResumeConfig;
use crate::image_loader::{HttpFetcher, ImageFetcher, ImageLoader};
use crate::model::ResumeRecord;
use crate::render::{render_plan, Canvas, PdfCanvas};
use crate::{ResumeError, Result};
use serde::{Deserialize, Serialize};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const GENERATE_FAILED: &str = "Failed to generate PDF";

/// A finished resume ready to be sent as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

impl RenderedDocument {
    /// `Content-Disposition` header value for this document
    pub fn content_disposition(&self) -> String {
        let escaped = self.filename.replace('\\', "\\\\").replace('"', "\\\"");
        format!("attachment; filename=\"{escaped}\"")
    }
}

/// Error body returned instead of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    pub detail: String,
}

impl ErrorPayload {
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.error, "detail": self.detail }).to_string()
    }
}

impl From<&ResumeError> for ErrorPayload {
    fn from(err: &ResumeError) -> Self {
        Self {
            error: GENERATE_FAILED.to_string(),
            detail: err.to_string(),
        }
    }
}

impl From<ResumeError> for ErrorPayload {
    fn from(err: ResumeError) -> Self {
        Self::from(&err)
    }
}

/// Download file name: whitespace runs become `_`, blank names are `resume`
pub fn suggested_filename(name: &str) -> String {
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// Renders resume records to PDF documents
///
/// Holds no per-request state; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ResumeRenderer<F = HttpFetcher> {
    loader: ImageLoader<F>,
    compress: bool,
}

impl ResumeRenderer<HttpFetcher> {
    /// A renderer fetching remote images over HTTP
    pub fn new(config: &ResumeConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout, &config.user_agent)?;
        Ok(Self::with_loader(ImageLoader::new(fetcher), config))
    }
}

impl<F: ImageFetcher> ResumeRenderer<F> {
    pub fn with_loader(loader: ImageLoader<F>, config: &ResumeConfig) -> Self {
        Self {
            loader,
            compress: config.compress,
        }
    }

    pub fn loader(&self) -> &ImageLoader<F> {
        &self.loader
    }

    /// Render a record to a PDF document
    pub fn render(&self, record: &ResumeRecord) -> Result<RenderedDocument> {
        let mut canvas = PdfCanvas::new();
        canvas.set_compress(self.compress);

        self.render_into(record, &mut canvas)?;
        let bytes = canvas.finish()?;

        log::info!(
            "Rendered {} resume ({} bytes)",
            record.template,
            bytes.len()
        );

        Ok(RenderedDocument {
            bytes,
            filename: suggested_filename(&record.name),
            content_type: PDF_CONTENT_TYPE,
        })
    }

    /// Load the image, compose the record and draw it onto `canvas`
    pub fn render_into<C: Canvas + ?Sized>(
        &self,
        record: &ResumeRecord,
        canvas: &mut C,
    ) -> Result<()> {
        let image = self
            .loader
            .load(record.image_url.as_deref(), record.image_data.as_deref());
        let spec = record.template.spec();
        let plan = compose(record, &spec, image.as_ref());
        render_plan(&plan, canvas)
    }

    /// Parse a JSON request body and render it
    ///
    /// Any failure is reported as an `ErrorPayload`; no partial bytes escape.
    pub fn render_json(&self, body: &str) -> std::result::Result<RenderedDocument, ErrorPayload> {
        ResumeRecord::from_json(body)
            .and_then(|record| self.render(&record))
            .map_err(|err| {
                log::error!("PDF generation error: {err}");
                ErrorPayload::from(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("Jane Doe"), "Jane_Doe.pdf");
        assert_eq!(suggested_filename("Jane \t  Q.\nDoe"), "Jane_Q._Doe.pdf");
        assert_eq!(suggested_filename(""), "resume.pdf");
        assert_eq!(suggested_filename("   "), "resume.pdf");
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let document = RenderedDocument {
            bytes: Vec::new(),
            filename: suggested_filename("Jane \"JD\" Doe"),
            content_type: PDF_CONTENT_TYPE,
        };
        assert_eq!(
            document.content_disposition(),
            "attachment; filename=\"Jane_\\\"JD\\\"_Doe.pdf\""
        );
    }

    #[test]
    fn test_error_payload_json() {
        let payload = ErrorPayload::from(ResumeError::Config("bad".to_string()));
        assert_eq!(payload.error, "Failed to generate PDF");
        assert_eq!(payload.detail, "Invalid configuration: bad");

        let parsed: ErrorPayload = serde_json::from_str(&payload.to_json()).unwrap();
        assert_eq!(parsed, payload);
    }
}
