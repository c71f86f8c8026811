//! Text operators and line wrapping

use crate::document::Color;
use crate::font::{encode_text_hex, StandardFont};
use crate::Align;

/// One line of text in bottom-origin page coordinates
#[derive(Debug, Clone, Copy)]
pub struct TextOp<'a> {
    pub text: &'a str,
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
    /// Anchor the line is aligned against
    pub x: f64,
    pub baseline: f64,
    pub align: Align,
}

impl TextOp<'_> {
    /// Left edge of the line once aligned against `x`
    pub fn start_x(&self) -> f64 {
        let width = self.font.text_width(self.text, self.size);
        match self.align {
            Align::Left => self.x,
            Align::Center => self.x - width / 2.0,
            Align::Right => self.x - width,
        }
    }

    /// `BT ... ET` block painting the line
    pub fn operators(&self) -> Vec<u8> {
        let Color { r, g, b } = self.color;
        format!(
            "BT\n{r} {g} {b} rg\n/{} {} Tf\n{} {} Td\n{} Tj\nET\n",
            self.font.resource_name(),
            self.size,
            self.start_x(),
            self.baseline,
            encode_text_hex(self.text),
        )
        .into_bytes()
    }
}

/// Split text into lines that fit within `max_width` points
///
/// Explicit newlines always start a new line. Words are separated by
/// whitespace; a single word wider than the line is broken between
/// characters. A non-positive `max_width` disables wrapping.
///
/// Always returns at least one line (possibly empty). Each character is
/// measured once, so the cost is linear in the length of `text`.
pub fn wrap_text(text: &str, font: StandardFont, font_size: f64, max_width: f64) -> Vec<String> {
    if max_width <= 0.0 {
        return text
            .split('\n')
            .map(|paragraph| paragraph.trim_end_matches('\r').to_string())
            .collect();
    }

    let mut fill = LineFill {
        font,
        font_size,
        max_width,
        lines: Vec::new(),
        line: String::new(),
        units: 0,
    };

    for paragraph in text.split('\n') {
        let first = fill.lines.len();
        for word in paragraph.split_whitespace() {
            fill.push_word(word);
        }
        if !fill.line.is_empty() || fill.lines.len() == first {
            fill.finish_line();
        }
    }

    fill.lines
}

/// Greedy line filling with a running width in 1/1000 em
struct LineFill {
    font: StandardFont,
    font_size: f64,
    max_width: f64,
    lines: Vec<String>,
    line: String,
    units: u64,
}

impl LineFill {
    fn fits(&self, units: u64) -> bool {
        StandardFont::units_to_points(units, self.font_size) <= self.max_width
    }

    fn push_word(&mut self, word: &str) {
        let units: u64 = word.chars().map(|c| self.font.char_units(c)).sum();

        if !self.line.is_empty() {
            let joined = self.units + self.font.char_units(' ') + units;
            if self.fits(joined) {
                self.line.push(' ');
                self.line.push_str(word);
                self.units = joined;
                return;
            }
            self.finish_line();
        }

        if self.fits(units) {
            self.line.push_str(word);
            self.units = units;
        } else {
            self.break_word(word);
        }
    }

    /// Lay out a word wider than a line; every piece holds at least one character
    fn break_word(&mut self, word: &str) {
        let mut start = 0;
        let mut units = 0;

        for (index, c) in word.char_indices() {
            let width = self.font.char_units(c);
            if index > start && !self.fits(units + width) {
                self.lines.push(word[start..index].to_string());
                start = index;
                units = 0;
            }
            units += width;
        }

        self.line.push_str(&word[start..]);
        self.units = units;
    }

    fn finish_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.line));
        self.units = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn op(text: &str, align: Align) -> TextOp<'_> {
        TextOp {
            text,
            font: StandardFont::Helvetica,
            size: 10.0,
            color: Color::black(),
            x: 300.0,
            baseline: 700.0,
            align,
        }
    }

    #[test]
    fn test_operators_left_aligned() {
        let ops = String::from_utf8(op("Go", Align::Left).operators()).unwrap();
        assert_eq!(ops, "BT\n0 0 0 rg\n/F1 10 Tf\n300 700 Td\n<476F> Tj\nET\n");
    }

    #[test]
    fn test_alignment_shifts_start() {
        // "Go" at 10pt: (778 + 556) / 1000 * 10
        let width = 13.34;
        assert!((op("Go", Align::Center).start_x() - (300.0 - width / 2.0)).abs() < 1e-9);
        assert!((op("Go", Align::Right).start_x() - (300.0 - width)).abs() < 1e-9);
    }

    #[test]
    fn test_operators_use_font_and_color() {
        let line = TextOp {
            font: StandardFont::HelveticaBold,
            size: 22.0,
            color: Color::white(),
            ..op("Jane", Align::Left)
        };
        let ops = String::from_utf8(line.operators()).unwrap();
        assert!(ops.contains("1 1 1 rg\n/F2 22 Tf"));
    }

    #[test]
    fn test_wrap_text_fits_on_one_line() {
        let lines = wrap_text("Go, Rust", StandardFont::Helvetica, 10.0, 495.0);
        assert_eq!(lines, vec!["Go, Rust".to_string()]);
    }

    #[test]
    fn test_wrap_text_breaks_at_width() {
        // "Hello world" at 10pt is ~51pt wide; "Hello" alone is ~26.7pt
        let lines = wrap_text("Hello world", StandardFont::Helvetica, 10.0, 30.0);
        assert_eq!(lines, vec!["Hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_wrap_text_empty() {
        let lines = wrap_text("", StandardFont::Helvetica, 10.0, 100.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_wrap_text_whitespace_only() {
        let lines = wrap_text("   ", StandardFont::Helvetica, 10.0, 100.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_wrap_text_explicit_newlines() {
        let lines = wrap_text("first\r\n\nthird", StandardFont::Helvetica, 10.0, 400.0);
        assert_eq!(
            lines,
            vec!["first".to_string(), String::new(), "third".to_string()]
        );
    }

    #[test]
    fn test_wrap_text_collapses_spaces() {
        let lines = wrap_text("Hello    world", StandardFont::Helvetica, 10.0, 400.0);
        assert_eq!(lines, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_wrap_text_breaks_long_word() {
        let word = "Supercalifragilisticexpialidocious";
        let lines = wrap_text(word, StandardFont::Helvetica, 10.0, 40.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(StandardFont::Helvetica.text_width(line, 10.0) <= 40.0);
        }
    }

    #[test]
    fn test_wrap_text_breaks_huge_word_in_linear_time() {
        // 'a' is 556 units: 89 characters (494.84pt) fit in 495.28pt
        let word = "a".repeat(200_000);
        let started = std::time::Instant::now();
        let lines = wrap_text(&word, StandardFont::Helvetica, 10.0, 495.28);
        let elapsed = started.elapsed();

        assert_eq!(lines.len(), 200_000_usize.div_ceil(89));
        assert!(lines[..lines.len() - 1].iter().all(|line| line.len() == 89));
        assert_eq!(lines.last().map(String::len), Some(200_000 % 89));
        assert!(elapsed < std::time::Duration::from_secs(2), "took {elapsed:?}");
    }

    #[test]
    fn test_wrap_text_word_after_broken_word() {
        let lines = wrap_text("aaaaaaaaaa b", StandardFont::Helvetica, 10.0, 40.0);
        // seven 'a' fit in 40pt (38.92), the tail shares a line with "b"
        assert_eq!(lines, vec!["aaaaaaa", "aaa b"]);
    }

    #[test]
    fn test_wrap_text_zero_width_disables_wrapping() {
        let lines = wrap_text("Hello world", StandardFont::Helvetica, 10.0, 0.0);
        assert_eq!(lines, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_wrap_text_every_line_fits() {
        let text = "Designed and shipped a distributed ingestion pipeline processing \
                    billions of events per day across three regions";
        let lines = wrap_text(text, StandardFont::Helvetica, 10.0, 200.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(StandardFont::Helvetica.text_width(line, 10.0) <= 200.0);
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }
}
