//! Replaying a `RenderPlan` onto a page canvas

use crate::composer::{DrawOp, RenderPlan, TextRun};
use crate::layout::Rect;
use pdf_core::{Align, Color, PageSize, PdfDocument, PdfError};

/// Drawing surface a plan is rendered onto
///
/// Coordinates are top-left origin points, as in the plan.
pub trait Canvas {
    fn set_title(&mut self, title: &str);

    fn fill_rect(&mut self, rect: Rect, color: Color) -> pdf_core::Result<()>;

    /// Draw a run wrapped to its width, first line top at `run.y`
    fn draw_text(&mut self, run: &TextRun) -> pdf_core::Result<()>;

    /// Draw an image fit inside `rect`
    fn draw_image(&mut self, data: &[u8], rect: Rect, align: Align) -> pdf_core::Result<()>;

    /// Continue on a fresh page
    fn new_page(&mut self) -> pdf_core::Result<()>;
}

/// Draw every instruction of `plan` in order
///
/// Images the canvas cannot decode are skipped; any other failure aborts.
pub fn render_plan<C: Canvas + ?Sized>(plan: &RenderPlan<'_>, canvas: &mut C) -> crate::Result<()> {
    canvas.set_title(&plan.title);

    for op in &plan.ops {
        match op {
            DrawOp::FillRect { rect, color } => canvas.fill_rect(*rect, *color)?,
            DrawOp::Text(run) => canvas.draw_text(run)?,
            DrawOp::Image { data, rect, align } => {
                match canvas.draw_image(data, *rect, *align) {
                    Ok(()) => {}
                    Err(PdfError::ImageError(e)) => {
                        log::warn!("Skipping profile image: {e}");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            DrawOp::PageBreak => canvas.new_page()?,
        }
    }

    Ok(())
}

/// `Canvas` backed by a `pdf_core::PdfDocument`
pub struct PdfCanvas {
    doc: PdfDocument,
    page: usize,
}

impl PdfCanvas {
    /// A canvas on a fresh A4 document
    pub fn new() -> Self {
        let mut doc = PdfDocument::new(PageSize::A4);
        doc.set_creator(concat!("resume-pdf ", env!("CARGO_PKG_VERSION")));
        Self { doc, page: 1 }
    }

    pub fn set_compress(&mut self, compress: bool) {
        self.doc.set_compress(compress);
    }

    /// Page currently drawn on (1-indexed)
    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn document(&self) -> &PdfDocument {
        &self.doc
    }

    /// Serialize the finished document
    pub fn finish(self) -> pdf_core::Result<Vec<u8>> {
        self.doc.to_bytes()
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for PdfCanvas {
    fn set_title(&mut self, title: &str) {
        self.doc.set_title(title);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> pdf_core::Result<()> {
        self.doc
            .fill_rect(self.page, rect.x, rect.y, rect.width, rect.height, color)
    }

    fn draw_text(&mut self, run: &TextRun) -> pdf_core::Result<()> {
        self.doc.set_font(run.font, run.size);
        self.doc.set_text_color(run.color);

        let ascent = run.font.ascent(run.size);
        let line_height = run.line_height();

        for (i, line) in run.lines().iter().enumerate() {
            let baseline = run.y + i as f64 * line_height + ascent;
            self.doc
                .insert_text(line, self.page, run.x, baseline, Align::Left)?;
        }

        Ok(())
    }

    fn draw_image(&mut self, data: &[u8], rect: Rect, align: Align) -> pdf_core::Result<()> {
        self.doc.insert_image(
            data,
            self.page,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            align,
        )
    }

    fn new_page(&mut self) -> pdf_core::Result<()> {
        self.page = self.doc.add_blank_page()?;
        Ok(())
    }
}
