//! Image XObjects for JPEG and PNG sources

use crate::{Align, PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::io::Write;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Source format recognized from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Recognize a JPEG or PNG by its signature
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < PNG_MAGIC.len() {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }
    if data.starts_with(&JPEG_MAGIC) {
        Ok(ImageFormat::Jpeg)
    } else if data.starts_with(&PNG_MAGIC) {
        Ok(ImageFormat::Png)
    } else {
        Err(PdfError::ImageError("Unknown image format".to_string()))
    }
}

/// Largest size in points that fits a `pixels` image inside a `target`
/// box with its aspect ratio kept
pub fn fit_box(pixels: (u32, u32), target: (f64, f64)) -> (f64, f64) {
    let (px_w, px_h) = (pixels.0 as f64, pixels.1 as f64);
    let (box_w, box_h) = target;
    if px_w == 0.0 || px_h == 0.0 {
        return target;
    }

    let factor = (box_w / px_w).min(box_h / px_h);
    (px_w * factor, px_h * factor)
}

/// Offset from the left edge of a `box_width` box for content `used` wide
pub fn horizontal_offset(used: f64, box_width: f64, align: Align) -> f64 {
    let slack = box_width - used;
    match align {
        Align::Left => 0.0,
        Align::Center => slack / 2.0,
        Align::Right => slack,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
            ColorSpace::Cmyk => "DeviceCMYK",
        }
    }
}

/// Stream filter the sample data is encoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// JPEG bytes passed through
    Dct,
    /// Zlib-compressed 8-bit samples
    Flate,
}

impl ImageFilter {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        }
    }
}

/// An image ready to embed as an XObject
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    pub color_space: ColorSpace,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Build from JPEG or PNG bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// JPEG data is embedded unchanged; only the frame header is read
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let frame = jpeg_frame(data)?;
        let color_space = match frame.components {
            1 => ColorSpace::Gray,
            4 => ColorSpace::Cmyk,
            _ => ColorSpace::Rgb,
        };

        Ok(Self {
            width: frame.width,
            height: frame.height,
            color_space,
            filter: ImageFilter::Dct,
            data: data.to_vec(),
        })
    }

    /// PNG data is decoded to 8-bit samples, transparency flattened onto white
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)?;
        let color = decoded.color();

        let (samples, color_space) = match (color.has_color(), color.has_alpha()) {
            (false, false) => (decoded.to_luma8().into_raw(), ColorSpace::Gray),
            (false, true) => {
                let samples = decoded
                    .to_luma_alpha8()
                    .pixels()
                    .map(|p| over_white(p[0], p[1]))
                    .collect();
                (samples, ColorSpace::Gray)
            }
            (true, false) => (decoded.to_rgb8().into_raw(), ColorSpace::Rgb),
            (true, true) => {
                let samples = decoded
                    .to_rgba8()
                    .pixels()
                    .flat_map(|p| {
                        let alpha = p[3];
                        [p[0], p[1], p[2]].map(|value| over_white(value, alpha))
                    })
                    .collect();
                (samples, ColorSpace::Rgb)
            }
        };

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&samples)?;

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            color_space,
            filter: ImageFilter::Flate,
            data: encoder.finish()?,
        })
    }

    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::Name(self.color_space.pdf_name().into()));
        dict.set("BitsPerComponent", 8_i64);
        dict.set("Filter", Object::Name(self.filter.pdf_name().into()));

        Stream::new(dict, self.data.clone())
    }
}

fn over_white(value: u8, alpha: u8) -> u8 {
    let alpha = alpha as u16;
    ((value as u16 * alpha + 255 * (255 - alpha)) / 255) as u8
}

struct JpegFrame {
    width: u32,
    height: u32,
    components: u8,
}

/// Walk the marker segments up to the first start-of-frame
fn jpeg_frame(data: &[u8]) -> Result<JpegFrame> {
    let mut rest = data.get(2..).unwrap_or_default();

    while let [0xFF, marker, tail @ ..] = rest {
        match *marker {
            // fill byte before a marker
            0xFF => {
                rest = &rest[1..];
                continue;
            }
            // markers without a length field
            0x01 | 0xD0..=0xD8 => {
                rest = tail;
                continue;
            }
            _ => {}
        }

        let &[hi, lo, ..] = tail else { break };
        let length = u16::from_be_bytes([hi, lo]) as usize;
        if length < 2 || tail.len() < length {
            break;
        }

        if is_start_of_frame(*marker) {
            if let &[_precision, h1, h0, w1, w0, components, ..] = &tail[2..length] {
                let height = u16::from_be_bytes([h1, h0]) as u32;
                let width = u16::from_be_bytes([w1, w0]) as u32;
                if width > 0 && height > 0 {
                    return Ok(JpegFrame {
                        width,
                        height,
                        components,
                    });
                }
            }
            break;
        }

        rest = &tail[length..];
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

/// SOF0 through SOF15, excluding DHT (C4), JPG (C8) and DAC (CC)
fn is_start_of_frame(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Content operators painting image resource `name` at a bottom-origin position
pub fn draw_operators(name: &str, x: f64, y: f64, width: f64, height: f64) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{name} Do\nQ\n").into_bytes()
}
