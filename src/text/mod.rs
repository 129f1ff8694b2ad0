//! # Text Layout
//!
//! Greedy line breaking for table cells and the notes block.
//!
//! Break opportunities come from UAX #14 so that wrapping behaves sensibly
//! for punctuation such as `6000 - Supplies` or `CR-2026-123456`. A run with
//! no break opportunity that is wider than the box is force-broken at the
//! last character that fits.

use crate::font::FontContext;
use crate::style::TextStyle;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub text: String,
    /// Width of the line without trailing spaces.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Each entry is the opportunity *before* that char. Index 0 is always
/// `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Measure a single-line string in the given style.
    pub fn measure(&self, font_context: &FontContext, text: &str, style: &TextStyle) -> f64 {
        let text = style.transform(text);
        font_context.measure_string(
            &text,
            &style.font_family,
            style.font_weight,
            style.font_size,
            style.letter_spacing,
        )
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Always returns at least one line; an empty string yields one empty
    /// line so callers can reserve its height.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        style: &TextStyle,
    ) -> Vec<BrokenLine> {
        let text = style.transform(text);
        if text.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    font_context.char_width(
                        ch,
                        &style.font_family,
                        style.font_weight,
                        style.font_size,
                    ) + style.letter_spacing
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(&text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => last_break_point = Some(i - 1),
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            let char_width = widths[i];
            if line_width + char_width > max_width && line_start < i {
                if let Some(bp) = last_break_point.filter(|bp| *bp >= line_start) {
                    let break_at = bp + 1;
                    lines.push(self.make_line(
                        &chars[line_start..break_at],
                        &widths[line_start..break_at],
                    ));
                    line_start = break_at;
                    line_width = widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    continue;
                }

                // No break opportunity: force a break before this char.
                lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                line_start = i;
                line_width = char_width;
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            lines.push(self.make_line(&chars[line_start..], &widths[line_start..]));
        }

        if lines.is_empty() {
            lines.push(BrokenLine {
                text: String::new(),
                width: 0.0,
            });
        }

        lines
    }

    /// Trailing spaces and line terminators (including `\r\n` pairs) are
    /// not part of the line.
    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut end = chars.len();
        while end > 0 && (chars[end - 1] == ' ' || is_newline(chars[end - 1])) {
            end -= 1;
        }
        BrokenLine {
            text: chars[..end].iter().collect(),
            width: widths[..end].iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn ctx() -> FontContext {
        FontContext::new()
    }

    fn style() -> TextStyle {
        TextStyle::new(12.0, 400, Color::BLACK)
    }

    #[test]
    fn test_single_line() {
        let lines = TextLayout::new().break_into_lines(&ctx(), "Paper towels", 500.0, &style());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Paper towels");
        assert!(lines[0].width > 0.0);
    }

    #[test]
    fn test_line_break_at_space() {
        let tl = TextLayout::new();
        let lines = tl.break_into_lines(&ctx(), "Hello World", 40.0, &style());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_explicit_newline() {
        let tl = TextLayout::new();
        let lines = tl.break_into_lines(&ctx(), "first\nsecond", 500.0, &style());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn test_crlf_line_endings() {
        let tl = TextLayout::new();
        let lines = tl.break_into_lines(&ctx(), "Rush order\r\nsecond\r\n", 500.0, &style());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Rush order", "second"]);
    }

    #[test]
    fn test_blank_line_between_paragraphs() {
        let tl = TextLayout::new();
        let lines = tl.break_into_lines(&ctx(), "one\r\n\r\ntwo", 500.0, &style());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "", "two"]);
    }

    #[test]
    fn test_empty_string() {
        let lines = TextLayout::new().break_into_lines(&ctx(), "", 100.0, &style());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "");
        assert_eq!(lines[0].width, 0.0);
    }

    #[test]
    fn test_forced_break_without_opportunity() {
        let tl = TextLayout::new();
        let lines = tl.break_into_lines(&ctx(), "AAAAAAAAAA", 30.0, &style());
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width <= 30.0 + 1e-9));
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, "AAAAAAAAAA");
    }

    #[test]
    fn test_uppercase_transform_is_measured() {
        let tl = TextLayout::new();
        let plain = tl.measure(&ctx(), "amount", &style());
        let upper = tl.measure(&ctx(), "amount", &style().uppercase());
        assert!(upper > plain);
    }
}
