//! Standard Type1 fonts for PDF documents
//!
//! The Helvetica family is one of the fourteen standard PDF fonts, so no font
//! program is embedded. Text is encoded with `WinAnsiEncoding` and measured with
//! the Adobe AFM advance widths.

use lopdf::{Dictionary, Object};

/// Helvetica advance widths for WinAnsi codes 32..=126 (1/1000 em)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advance widths for WinAnsi codes 32..=126 (1/1000 em)
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {..~
];

/// Ascender shared by the Helvetica family (1/1000 em)
const HELVETICA_ASCENDER: f64 = 718.0;

/// Standard Type1 font faces available without embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl StandardFont {
    /// All faces, in resource-name order
    pub const ALL: [StandardFont; 3] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
    ];

    /// PostScript name written as `BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Page resource name used in content streams (e.g. "F1")
    pub fn resource_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
            StandardFont::HelveticaOblique => "F3",
        }
    }

    /// Advance width of a WinAnsi code in 1/1000 em
    pub fn glyph_width(self, code: u8) -> u16 {
        let table = match self {
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
            StandardFont::Helvetica | StandardFont::HelveticaOblique => &HELVETICA_WIDTHS,
        };
        let bold = self == StandardFont::HelveticaBold;

        match code {
            32..=126 => table[(code - 32) as usize],
            0x85 | 0x89 | 0x97 => 1000,
            0x96 => 556,
            0x95 => 350,
            0x91 | 0x92 | 0x82 => {
                if bold {
                    278
                } else {
                    222
                }
            }
            0x93 | 0x94 | 0x84 => {
                if bold {
                    500
                } else {
                    333
                }
            }
            0xA0 => 278,
            0xC0..=0xDE => 667,
            _ => 556,
        }
    }

    /// Advance width of a character in 1/1000 em, as it will be encoded
    pub fn char_units(self, c: char) -> u64 {
        win_ansi_byte(c).map_or(0, |code| self.glyph_width(code) as u64)
    }

    /// Convert 1/1000 em units to points at `font_size`
    pub fn units_to_points(units: u64, font_size: f64) -> f64 {
        units as f64 * font_size / 1000.0
    }

    /// Width of `text` in points at `font_size`
    pub fn text_width(self, text: &str, font_size: f64) -> f64 {
        let units = text.chars().map(|c| self.char_units(c)).sum();
        Self::units_to_points(units, font_size)
    }

    /// Distance from the top of a line to its baseline, in points
    pub fn ascent(self, font_size: f64) -> f64 {
        HELVETICA_ASCENDER * font_size / 1000.0
    }

    /// Line advance in points (font bounding box height)
    pub fn line_height(self, font_size: f64) -> f64 {
        let bbox_height = match self {
            StandardFont::HelveticaBold => 1190.0,
            StandardFont::Helvetica | StandardFont::HelveticaOblique => 1156.0,
        };
        bbox_height * font_size / 1000.0
    }

    /// Font dictionary for the page resources
    pub fn to_pdf_dictionary(self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set(
            "BaseFont",
            Object::Name(self.base_font().as_bytes().to_vec()),
        );
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        dict
    }
}

/// Map a character to its WinAnsi code
fn to_win_ansi(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let mapped = match c {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => return None,
            };
            Some(mapped)
        }
    }
}

/// Encode text as WinAnsi bytes
///
/// Tabs become spaces, other control characters are dropped and characters
/// outside the encoding are replaced with `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().filter_map(win_ansi_byte).collect()
}

/// Encoded byte of one character; `None` for dropped control characters
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\t' => Some(b' '),
        c if c.is_control() => None,
        c => Some(to_win_ansi(c).unwrap_or(b'?')),
    }
}

/// Encode text as a PDF hex string (e.g. "<48656C6C6F>")
pub fn encode_text_hex(text: &str) -> String {
    let mut hex = String::from("<");
    for byte in encode_win_ansi(text) {
        hex.push_str(&format!("{byte:02X}"));
    }
    hex.push('>');
    hex
}
