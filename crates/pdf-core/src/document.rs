//! PDF Document builder

use crate::font::StandardFont;
use crate::image::{draw_operators, fit_box, horizontal_offset, ImageXObject};
use crate::text::TextOp;
use crate::{Align, PdfError, Result};
use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::io::Write;

const PRODUCER: &str = concat!("pdf-core ", env!("CARGO_PKG_VERSION"));

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 (210 x 297 mm)
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

/// Content and resources of a single page
#[derive(Debug, Default)]
struct PageState {
    /// Content stream operators
    content: Vec<u8>,
    /// Fonts referenced by the content stream
    fonts: BTreeSet<StandardFont>,
    /// Image resource name -> XObject
    images: BTreeMap<String, ObjectId>,
}

/// An embedded image XObject
#[derive(Debug, Clone, Copy)]
struct EmbeddedImage {
    id: ObjectId,
    width: u32,
    height: u32,
}

/// PDF Document builder providing high-level drawing operations
///
/// All coordinates are in points with the origin at the top-left corner of
/// the page; they are converted to PDF's bottom-left origin internally.
pub struct PdfDocument {
    /// Holds shared objects (image XObjects) until serialization
    inner: Document,
    /// Size of every page
    page_size: PageSize,
    /// Pages in order (page 1 is index 0)
    pages: Vec<PageState>,
    /// Embedded images (data hash -> XObject)
    embedded_images: HashMap<u64, EmbeddedImage>,
    /// Next image resource number
    next_image_resource: u32,
    /// Current font face
    current_font: StandardFont,
    /// Current font size
    current_font_size: f64,
    /// Current text color
    current_text_color: Color,
    /// Document title for the Info dictionary
    title: Option<String>,
    /// Creating application for the Info dictionary
    creator: Option<String>,
    /// Creation timestamp, fixed when the document is created
    created_at: DateTime<Utc>,
    /// Flate-compress page content streams
    compress: bool,
}

impl PdfDocument {
    /// Create a new document with a single blank page
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::new(PageSize::A4);
    /// assert_eq!(doc.page_count(), 1);
    /// ```
    pub fn new(page_size: PageSize) -> Self {
        Self {
            inner: Document::with_version("1.7"),
            page_size,
            pages: vec![PageState::default()],
            embedded_images: HashMap::new(),
            next_image_resource: 1,
            current_font: StandardFont::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            title: None,
            creator: None,
            created_at: Utc::now(),
            compress: true,
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page dimensions
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Set the document title (Info dictionary)
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Set the creating application (Info dictionary)
    pub fn set_creator(&mut self, creator: &str) {
        self.creator = Some(creator.to_string());
    }

    /// Enable or disable Flate compression of page content streams
    pub fn set_compress(&mut self, compress: bool) {
        self.compress = compress;
    }

    /// Set the current font and size
    ///
    /// # Arguments
    /// * `font` - Standard font face
    /// * `size` - Font size in points
    pub fn set_font(&mut self, font: StandardFont, size: f64) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set the text color
    ///
    /// # Example
    /// ```ignore
    /// doc.set_text_color(Color::white());
    /// doc.set_text_color(Color::from_rgb(85, 85, 85)); // Gray
    /// ```
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Baseline Y coordinate in points (from top)
    /// * `align` - Text alignment relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let index = self.page_index(page)?;

        if text.is_empty() {
            return Ok(());
        }

        let operators = TextOp {
            text,
            font: self.current_font,
            size: self.current_font_size,
            color: self.current_text_color,
            x,
            baseline: self.page_size.height - y,
            align,
        }
        .operators();

        let state = &mut self.pages[index];
        state.fonts.insert(self.current_font);
        state.content.extend_from_slice(&operators);

        Ok(())
    }

    /// Fill a rectangle with a solid color
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `x` - Left edge in points
    /// * `y` - Top edge in points (from top)
    /// * `width` - Width in points
    /// * `height` - Height in points
    /// * `color` - Fill color
    pub fn fill_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    ) -> Result<()> {
        let index = self.page_index(page)?;

        let pdf_y = self.page_size.height - y - height;
        let operators = format!(
            "q\n{} {} {} rg\n{x} {pdf_y} {width} {height} re\nf\nQ\n",
            color.r, color.g, color.b
        );

        self.pages[index]
            .content
            .extend_from_slice(operators.as_bytes());

        Ok(())
    }

    /// Insert an image scaled to fit inside a box, preserving aspect ratio
    ///
    /// The scaled image is top-aligned in the box and placed horizontally
    /// according to `align`. Data that is not a decodable JPEG or PNG yields
    /// `PdfError::ImageError` and leaves the document unchanged.
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `width` - Target width in points
    /// * `height` - Target height in points
    /// * `align` - Horizontal placement inside the box
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        align: Align,
    ) -> Result<()> {
        let index = self.page_index(page)?;

        let image = self.get_or_embed_image(data)?;
        let resource_name = self.image_resource_name(index, image.id);

        let (actual_width, actual_height) = fit_box((image.width, image.height), (width, height));

        let pdf_x = x + horizontal_offset(actual_width, width, align);
        let pdf_y = self.page_size.height - y - actual_height;

        let operators = draw_operators(&resource_name, pdf_x, pdf_y, actual_width, actual_height);
        self.pages[index].content.extend_from_slice(&operators);

        Ok(())
    }

    /// Add a blank page to the end of the document
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_blank_page(&mut self) -> Result<usize> {
        self.pages.push(PageState::default());
        Ok(self.pages.len())
    }

    /// Serialize the document to bytes
    ///
    /// The builder is left untouched, so this may be called repeatedly.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.inner.clone();
        let pages_id = doc.new_object_id();

        // One shared font object per face actually used
        let mut font_ids: BTreeMap<StandardFont, ObjectId> = BTreeMap::new();
        for state in &self.pages {
            for font in &state.fonts {
                if !font_ids.contains_key(font) {
                    let id = doc.add_object(font.to_pdf_dictionary());
                    font_ids.insert(*font, id);
                }
            }
        }

        let mut kids = Vec::with_capacity(self.pages.len());
        for state in &self.pages {
            let contents_id = doc.add_object(self.content_stream(&state.content)?);

            let mut font_dict = Dictionary::new();
            for font in &state.fonts {
                if let Some(id) = font_ids.get(font) {
                    font_dict.set(font.resource_name(), Object::Reference(*id));
                }
            }

            let mut xobject_dict = Dictionary::new();
            for (name, id) in &state.images {
                xobject_dict.set(name.as_bytes(), Object::Reference(*id));
            }

            let mut resources = Dictionary::new();
            if !state.fonts.is_empty() {
                resources.set("Font", Object::Dictionary(font_dict));
            }
            if !state.images.is_empty() {
                resources.set("XObject", Object::Dictionary(xobject_dict));
            }

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set("MediaBox", self.media_box());
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Reference(contents_id));

            kids.push(Object::Reference(doc.add_object(page_dict)));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", self.pages.len() as i64);
        pages_dict.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);

        let info_id = doc.add_object(self.info_dictionary());

        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Validate a 1-indexed page number and return its index
    fn page_index(&self, page: usize) -> Result<usize> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }
        Ok(page - 1)
    }

    /// Get or embed an image XObject
    ///
    /// Images are deduplicated by hash of their data.
    fn get_or_embed_image(&mut self, data: &[u8]) -> Result<EmbeddedImage> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(image) = self.embedded_images.get(&data_hash) {
            return Ok(*image);
        }

        // Decode before touching any state so a bad image leaves no trace
        let xobject = ImageXObject::from_bytes(data)?;

        let image = EmbeddedImage {
            id: self.inner.add_object(xobject.to_pdf_stream()),
            width: xobject.width,
            height: xobject.height,
        };
        self.embedded_images.insert(data_hash, image);

        Ok(image)
    }

    /// Get or create the resource name of an image on a page (e.g. "Im1")
    fn image_resource_name(&mut self, index: usize, id: ObjectId) -> String {
        let images = &mut self.pages[index].images;

        if let Some((name, _)) = images.iter().find(|(_, existing)| **existing == id) {
            return name.clone();
        }

        let name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        images.insert(name.clone(), id);
        name
    }

    fn media_box(&self) -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.page_size.width as f32),
            Object::Real(self.page_size.height as f32),
        ])
    }

    fn content_stream(&self, content: &[u8]) -> Result<Stream> {
        if !self.compress {
            return Ok(Stream::new(Dictionary::new(), content.to_vec()));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content)?;
        let compressed = encoder.finish()?;

        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        Ok(Stream::new(dict, compressed))
    }

    fn info_dictionary(&self) -> Dictionary {
        let mut info = Dictionary::new();
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        if let Some(creator) = &self.creator {
            info.set("Creator", text_string(creator));
        }
        info.set("Producer", text_string(PRODUCER));
        info.set(
            "CreationDate",
            Object::String(
                self.created_at
                    .format("D:%Y%m%d%H%M%SZ")
                    .to_string()
                    .into_bytes(),
                StringFormat::Literal,
            ),
        );
        info
    }
}

/// Encode a PDF text string: literal when ASCII, UTF-16BE with BOM otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_content(doc: &PdfDocument, page: usize) -> String {
        String::from_utf8(doc.pages[page - 1].content.clone()).unwrap()
    }

    #[test]
    fn test_new_document_has_one_page() {
        let doc = PdfDocument::new(PageSize::A4);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_size(), PageSize::A4);
    }

    #[test]
    fn test_insert_text_converts_to_bottom_origin() {
        let mut doc = PdfDocument::new(PageSize::A4);
        doc.set_font(StandardFont::HelveticaBold, 20.0);
        doc.insert_text("Hi", 1, 50.0, 100.0, Align::Left).unwrap();

        let content = page_content(&doc, 1);
        assert!(content.contains("/F2 20 Tf"));
        assert!(content.contains(&format!("50 {} Td", 841.89 - 100.0)));
        assert!(content.contains("<4869> Tj"));
        assert!(doc.pages[0].fonts.contains(&StandardFont::HelveticaBold));
    }

    #[test]
    fn test_insert_empty_text_is_noop() {
        let mut doc = PdfDocument::new(PageSize::A4);
        doc.insert_text("", 1, 50.0, 100.0, Align::Left).unwrap();
        assert!(doc.pages[0].content.is_empty());
        assert!(doc.pages[0].fonts.is_empty());
    }

    #[test]
    fn test_insert_text_invalid_page() {
        let mut doc = PdfDocument::new(PageSize::A4);
        let err = doc.insert_text("x", 2, 0.0, 0.0, Align::Left).unwrap_err();
        assert!(matches!(err, PdfError::InvalidPage(2, 1)));

        let err = doc.insert_text("x", 0, 0.0, 0.0, Align::Left).unwrap_err();
        assert!(matches!(err, PdfError::InvalidPage(0, 1)));
    }

    #[test]
    fn test_fill_rect_operators() {
        let mut doc = PdfDocument::new(PageSize {
            width: 200.0,
            height: 300.0,
        });
        doc.fill_rect(1, 0.0, 0.0, 200.0, 90.0, Color::white())
            .unwrap();

        let content = page_content(&doc, 1);
        assert!(content.contains("1 1 1 rg"));
        assert!(content.contains("0 210 200 90 re"));
        assert!(content.contains("\nf\n"));
    }

    #[test]
    fn test_bad_image_leaves_document_untouched() {
        let mut doc = PdfDocument::new(PageSize::A4);
        let result = doc.insert_image(
            b"definitely not an image",
            1,
            450.0,
            18.0,
            80.0,
            80.0,
            Align::Right,
        );

        assert!(matches!(result, Err(PdfError::ImageError(_))));
        assert!(doc.embedded_images.is_empty());
        assert!(doc.pages[0].images.is_empty());
        assert!(doc.pages[0].content.is_empty());
        assert_eq!(doc.next_image_resource, 1);
    }

    #[test]
    fn test_add_blank_page() {
        let mut doc = PdfDocument::new(PageSize::A4);
        assert_eq!(doc.add_blank_page().unwrap(), 2);
        assert_eq!(doc.page_count(), 2);
        doc.insert_text("page two", 2, 40.0, 60.0, Align::Left)
            .unwrap();
        assert!(doc.pages[0].content.is_empty());
        assert!(!doc.pages[1].content.is_empty());
    }

    #[test]
    fn test_text_string_encoding() {
        match text_string("Jane Doe - Resume") {
            Object::String(bytes, StringFormat::Literal) => {
                assert_eq!(bytes, b"Jane Doe - Resume".to_vec())
            }
            other => panic!("unexpected title object: {other:?}"),
        }
        match text_string("é") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0xE9])
            }
            other => panic!("unexpected title object: {other:?}"),
        }
    }
}
