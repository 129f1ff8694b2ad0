//! Advance widths for the standard Helvetica faces.
//!
//! Widths are in 1/1000 em and cover printable ASCII plus the handful of
//! WinAnsi punctuation marks the check request uses. Anything else falls
//! back to the face's average glyph width.

/// Widths for chars 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Glyph widths for one standard font face.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
    /// Width used for characters outside the table.
    fallback: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl StandardFontMetrics {
    pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA_ASCII,
        fallback: 556,
        ascender: 718,
        descender: -207,
    };

    pub const HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA_BOLD_ASCII,
        fallback: 611,
        ascender: 718,
        descender: -207,
    };

    /// Width of a character in 1/1000 em.
    pub fn advance(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            return self.ascii[(code - 32) as usize];
        }
        match ch {
            '\u{2014}' => 1000,             // em dash
            '\u{2013}' => 556,              // en dash
            '\u{00B7}' | '\u{2022}' => 278, // middle dot, bullet
            '\u{00A0}' => 278,
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            '\u{00AB}' | '\u{00BB}' => 556,
            '\u{2026}' => 1000,
            _ => self.fallback,
        }
    }

    /// Width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points, adding `letter_spacing` after each char.
    pub fn measure_string(&self, text: &str, font_size: f64, letter_spacing: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width(ch, font_size) + letter_spacing)
            .sum()
    }
}
