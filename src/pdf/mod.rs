//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a PDF file.
//!
//! A from-scratch PDF 1.7 writer covering the small subset a check request
//! needs: filled and stroked rectangles (optionally rounded), single-sided
//! rules, and text in the standard Helvetica faces.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Output is a pure function of the pages and metadata: fonts are numbered
//! in a fixed order and the creation date comes from the caller.

use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use chrono::{DateTime, Utc};
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::StandardFont;
use crate::layout::{DrawCommand, LayoutElement, LayoutPage};
use crate::style::{Color, CornerValues, Edges};

/// Document-level information written to the Info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfMetadata {
    pub title: String,
    pub creation_date: DateTime<Utc>,
}

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Font face -> object id, in resource-name order (/F0, /F1, ...).
    font_objects: Vec<(StandardFont, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &PdfMetadata) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then content stream / page pairs, then Info
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: vec![] });
        }

        self.register_fonts(&mut builder, pages);
        let font_resources = self.build_font_resource_dict(&builder.font_objects);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, &builder.font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.objects.len();
        let info = format!(
            "<< /Title {} /Creator (Reef) /Producer (Reef {}) /CreationDate ({}) >>",
            Self::text_string(&metadata.title),
            env!("CARGO_PKG_VERSION"),
            Self::pdf_date(metadata.creation_date)
        );
        builder.objects.push(PdfObject {
            data: info.into_bytes(),
        });

        let bytes = self.serialize(&builder, info_obj_id);
        tracing::debug!(pages = pages.len(), bytes = bytes.len(), "pdf written");
        bytes
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &LayoutPage,
        font_objects: &[(StandardFont, usize)],
    ) -> String {
        let mut stream = String::new();
        for element in &page.elements {
            self.write_element(&mut stream, element, page.height, font_objects);
        }
        stream
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page_height: f64,
        font_objects: &[(StandardFont, usize)],
    ) {
        match &element.draw {
            DrawCommand::None => {}

            DrawCommand::Rect {
                background,
                border_width,
                border_color,
                border_radius,
            } => {
                let x = element.x;
                let y = page_height - element.y - element.height;
                let w = element.width;
                let h = element.height;

                if let Some(bg) = background.filter(|bg| bg.a > 0.0) {
                    let _ = write!(stream, "q\n{:.3} {:.3} {:.3} rg\n", bg.r, bg.g, bg.b);
                    self.write_rect_path(stream, x, y, w, h, border_radius);
                    let _ = writeln!(stream, "f\nQ");
                }

                let bw = border_width;
                if !bw.is_zero() {
                    if bw.is_uniform() {
                        let _ = write!(
                            stream,
                            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n",
                            border_color.r, border_color.g, border_color.b, bw.top
                        );
                        self.write_rect_path(stream, x, y, w, h, border_radius);
                        let _ = writeln!(stream, "S\nQ");
                    } else {
                        self.write_border_sides(stream, x, y, w, h, bw, border_color);
                    }
                }
            }

            DrawCommand::Text {
                lines,
                font,
                font_size,
                color,
                letter_spacing,
            } => {
                let font_name = format!("F{}", self.font_index(*font, font_objects));
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/{} {:.2} Tf\n{:.3} Tc\n",
                    color.r, color.g, color.b, font_name, font_size, letter_spacing
                );

                for line in lines.iter().filter(|l| !l.text.is_empty()) {
                    let pdf_y = page_height - line.y;
                    let _ = writeln!(
                        stream,
                        "1 0 0 1 {:.2} {:.2} Tm\n<{}> Tj",
                        line.x,
                        pdf_y,
                        Self::encode_win_ansi(&line.text)
                    );
                }

                let _ = writeln!(stream, "ET");
            }
        }

        for child in &element.children {
            self.write_element(stream, child, page_height, font_objects);
        }
    }

    fn write_rect_path(
        &self,
        stream: &mut String,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        r: &CornerValues,
    ) {
        if r.is_zero() {
            let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} re", x, y, w, h);
        } else {
            self.write_rounded_rect(stream, x, y, w, h, r);
        }
    }

    fn write_rounded_rect(
        &self,
        stream: &mut String,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        r: &CornerValues,
    ) {
        let k = 0.5522847498;

        let tl = r.top_left.min(w / 2.0).min(h / 2.0);
        let tr = r.top_right.min(w / 2.0).min(h / 2.0);
        let br = r.bottom_right.min(w / 2.0).min(h / 2.0);
        let bl = r.bottom_left.min(w / 2.0).min(h / 2.0);

        let _ = writeln!(stream, "{:.2} {:.2} m", x + bl, y);

        let _ = writeln!(stream, "{:.2} {:.2} l", x + w - br, y);
        if br > 0.0 {
            let _ = writeln!(
                stream,
                "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                x + w - br + br * k,
                y,
                x + w,
                y + br - br * k,
                x + w,
                y + br
            );
        }

        let _ = writeln!(stream, "{:.2} {:.2} l", x + w, y + h - tr);
        if tr > 0.0 {
            let _ = writeln!(
                stream,
                "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                x + w,
                y + h - tr + tr * k,
                x + w - tr + tr * k,
                y + h,
                x + w - tr,
                y + h
            );
        }

        let _ = writeln!(stream, "{:.2} {:.2} l", x + tl, y + h);
        if tl > 0.0 {
            let _ = writeln!(
                stream,
                "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                x + tl - tl * k,
                y + h,
                x,
                y + h - tl + tl * k,
                x,
                y + h - tl
            );
        }

        let _ = writeln!(stream, "{:.2} {:.2} l", x, y + bl);
        if bl > 0.0 {
            let _ = writeln!(
                stream,
                "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                x,
                y + bl - bl * k,
                x + bl - bl * k,
                y,
                x + bl,
                y
            );
        }

        let _ = writeln!(stream, "h");
    }

    #[allow(clippy::too_many_arguments)]
    fn write_border_sides(
        &self,
        stream: &mut String,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        bw: &Edges,
        bc: &Color,
    ) {
        let sides = [
            (bw.top, (x, y + h), (x + w, y + h)),
            (bw.bottom, (x, y), (x + w, y)),
            (bw.left, (x, y), (x, y + h)),
            (bw.right, (x + w, y), (x + w, y + h)),
        ];
        for (width, (x1, y1), (x2, y2)) in sides {
            if width > 0.0 {
                let _ = writeln!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ",
                    bc.r, bc.g, bc.b, width, x1, y1, x2, y2
                );
            }
        }
    }

    /// Register the faces used across all pages, in a fixed order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut fonts = BTreeSet::new();
        for page in pages {
            Self::collect_fonts(&page.elements, &mut fonts);
        }
        if fonts.is_empty() {
            fonts.insert(StandardFont::Helvetica);
        }

        for font in fonts {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((font, obj_id));
        }
    }

    fn collect_fonts(elements: &[LayoutElement], fonts: &mut BTreeSet<StandardFont>) {
        for element in elements {
            if let DrawCommand::Text { font, .. } = &element.draw {
                fonts.insert(*font);
            }
            Self::collect_fonts(&element.children, fonts);
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resource index (/F0, /F1, ...) of a face; the first face if absent.
    fn font_index(&self, font: StandardFont, font_objects: &[(StandardFont, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    /// WinAnsi byte for a char, `?` when the encoding has none.
    fn win_ansi_byte(ch: char) -> u8 {
        match ch {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            '\n' | '\r' | '\t' => b' ',
            c if (c as u32) < 0x20 => b'?',
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        }
    }

    /// Hex string body for a `Tj` operand.
    fn encode_win_ansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let _ = write!(out, "{:02X}", Self::win_ansi_byte(ch));
        }
        out
    }

    /// Escape special characters in a PDF literal string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// A PDF text string: literal for ASCII, UTF-16BE hex otherwise.
    fn text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut out = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(out, "{:04X}", unit);
        }
        out.push('>');
        out
    }

    /// `D:YYYYMMDDHHmmSSZ`.
    fn pdf_date(at: DateTime<Utc>) -> String {
        at.format("D:%Y%m%d%H%M%SZ").to_string()
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TextLine;
    use chrono::TimeZone;

    fn metadata() -> PdfMetadata {
        PdfMetadata {
            title: "Check Request CR-2026-800123".to_string(),
            creation_date: Utc.timestamp_millis_opt(1_792_324_800_123).single().unwrap(),
        }
    }

    fn text(font: StandardFont, s: &str, y: f64) -> LayoutElement {
        LayoutElement {
            x: 54.0,
            y,
            width: 100.0,
            height: 14.0,
            draw: DrawCommand::Text {
                lines: vec![TextLine {
                    x: 54.0,
                    y: y + 10.0,
                    width: 50.0,
                    height: 14.0,
                    text: s.to_string(),
                }],
                font,
                font_size: 10.0,
                color: Color::BLACK,
                letter_spacing: 0.0,
            },
            children: vec![],
            node_type: None,
        }
    }

    fn page(elements: Vec<LayoutElement>) -> LayoutPage {
        LayoutPage {
            width: 612.0,
            height: 792.0,
            elements,
        }
    }

    fn assert_valid_pdf(bytes: &[u8]) {
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(bytes.windows(4).any(|w| w == b"xref"));
        assert!(bytes.windows(7).any(|w| w == b"trailer"));
    }

    /// Every xref entry must point at the start of its object.
    fn assert_xref_offsets(bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let xref = text.rfind("\nxref\n").unwrap() + 1;
        let mut lines = text[xref..].lines().skip(1);
        let count: usize = lines
            .next()
            .unwrap()
            .split_whitespace()
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        lines.next();
        for id in 1..count {
            let offset: usize = lines.next().unwrap()[..10].parse().unwrap();
            let expected = format!("{} 0 obj", id);
            assert_eq!(&bytes[offset..offset + expected.len()], expected.as_bytes());
        }
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(
            PdfWriter::escape_pdf_string("Hello (World)"),
            "Hello \\(World\\)"
        );
        assert_eq!(
            PdfWriter::escape_pdf_string("back\\slash"),
            "back\\\\slash"
        );
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(PdfWriter::encode_win_ansi("A-z"), "412D7A");
        assert_eq!(PdfWriter::encode_win_ansi("\u{2014}\u{2013}\u{00B7}"), "9796B7");
        assert_eq!(PdfWriter::encode_win_ansi("\u{2022}\u{00E9}"), "95E9");
        assert_eq!(PdfWriter::encode_win_ansi("\u{4E2D}"), "3F");
    }

    #[test]
    fn test_empty_page_produces_valid_pdf() {
        let bytes = PdfWriter::new().write(&[page(vec![])], &metadata());
        assert_valid_pdf(&bytes);
        assert_xref_offsets(&bytes);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/BaseFont /Helvetica "));
    }

    #[test]
    fn test_info_dictionary() {
        let bytes = PdfWriter::new().write(&[page(vec![])], &metadata());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (Check Request CR-2026-800123)"));
        assert!(text.contains("/Creator (Reef)"));
        assert!(text.contains("/CreationDate (D:20261018120000Z)"));
    }

    #[test]
    fn test_non_ascii_title_is_utf16() {
        assert_eq!(PdfWriter::text_string("\u{00E9}"), "<FEFF00E9>");
        assert_eq!(PdfWriter::text_string("a(b)"), "(a\\(b\\))");
    }

    #[test]
    fn test_bold_font_registered_separately() {
        let pages = vec![page(vec![
            text(StandardFont::Helvetica, "A", 54.0),
            text(StandardFont::HelveticaBold, "B", 74.0),
            text(StandardFont::Helvetica, "C", 94.0),
        ])];
        let bytes = PdfWriter::new().write(&pages, &metadata());
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/Subtype /Type1").count(), 2);
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/F0 3 0 R /F1 4 0 R"));
        assert_xref_offsets(&bytes);
    }

    #[test]
    fn test_content_stream_operators() {
        let writer = PdfWriter::new();
        let fonts = vec![(StandardFont::Helvetica, 3)];
        let mut rule = text(StandardFont::Helvetica, "(x)", 100.0);
        rule.children.push(LayoutElement {
            x: 54.0,
            y: 120.0,
            width: 504.0,
            height: 20.0,
            draw: DrawCommand::Rect {
                background: Some(Color::WHITE),
                border_width: Edges::bottom(0.75),
                border_color: Color::BLACK,
                border_radius: CornerValues::default(),
            },
            children: vec![],
            node_type: None,
        });
        let stream = writer.build_content_stream(&page(vec![rule]), &fonts);

        assert!(stream.contains("/F0 10.00 Tf"));
        assert!(stream.contains("1 0 0 1 54.00 682.00 Tm\n<287829> Tj"));
        assert!(stream.contains("54.00 652.00 504.00 20.00 re\nf"));
        assert!(stream.contains("0.75 w\n54.00 652.00 m\n558.00 652.00 l\nS"));
    }

    #[test]
    fn test_rounded_rect_uses_curves() {
        let writer = PdfWriter::new();
        let mut stream = String::new();
        writer.write_rect_path(&mut stream, 0.0, 0.0, 100.0, 40.0, &CornerValues::uniform(9.0));
        assert_eq!(stream.matches(" c\n").count(), 4);
        assert!(stream.ends_with("h\n"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let pages = vec![
            page(vec![text(StandardFont::HelveticaBold, "Total", 54.0)]),
            page(vec![text(StandardFont::Helvetica, "Notes", 54.0)]),
        ];
        let a = PdfWriter::new().write(&pages, &metadata());
        let b = PdfWriter::new().write(&pages, &metadata());
        assert_eq!(a, b);
        assert!(String::from_utf8_lossy(&a).contains("/Count 2"));
    }
}
