//! # Page Layout
//!
//! Lays a [`CheckRequestDocument`] out onto fixed-size pages.
//!
//! There is no infinite canvas that gets sliced afterwards. The engine opens
//! a page with known content bounds and places one block at a time, asking
//! before each placement whether it fits:
//!
//! 1. Header, the two metadata rows, the total box and the footer are
//!    unbreakable. If one does not fit it moves to a new page. Their text
//!    is clipped to a few lines with an ellipsis so none can outgrow a page.
//! 2. The line-item table breaks between rows. Every continuation page
//!    starts with a copy of the header row. A row taller than a page is
//!    split between its lines.
//! 3. The notes block breaks between lines. Each fragment gets its own
//!    background box.
//!
//! All coordinates are in points with the origin at the top-left of the
//! page. The PDF writer flips them.

pub mod columns;
pub mod page_break;

use crate::config::RenderConfig;
use crate::document::{CheckRequestDocument, Field, NOTES, TOTAL};
use crate::font::{FontContext, StandardFont};
use crate::style::{palette, Color, CornerValues, Edges, TextAlign, TextStyle};
use crate::text::{BrokenLine, TextLayout};

use std::ops::Range;

use columns::plan_widths;
use page_break::{fill_page, paginate, NOTE_LINES, ROWS};

/// Most lines any text in an unbreakable block, or a table header cell,
/// may take.
const MAX_BLOCK_LINES: usize = 3;
/// Fewest lines of a split row worth starting at the foot of a page.
const SPLIT_MIN_LINES: usize = 2;
const ELLIPSIS: char = '\u{2026}';

const BLOCK_GAP: f64 = 24.0;
const HEADER_GAP: f64 = 30.0;
const FIELD_GAP: f64 = 30.0;
const CELL_PAD_X: f64 = 6.0;
const CELL_PAD_Y: f64 = 7.5;
const BOX_RADIUS: f64 = 9.0;

/// A fully laid-out page ready for PDF serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Every text line on the page, in drawing order.
    pub fn texts(&self) -> Vec<String> {
        fn collect(elements: &[LayoutElement], out: &mut Vec<String>) {
            for el in elements {
                if let DrawCommand::Text { lines, .. } = &el.draw {
                    out.extend(lines.iter().map(|l| l.text.clone()));
                }
                collect(&el.children, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.elements, &mut out);
        out
    }

    /// Number of elements of the given logical kind, at any depth.
    pub fn count(&self, node_type: &str) -> usize {
        fn walk(elements: &[LayoutElement], node_type: &str) -> usize {
            elements
                .iter()
                .map(|el| {
                    usize::from(el.node_type.as_deref() == Some(node_type))
                        + walk(&el.children, node_type)
                })
                .sum()
        }
        walk(&self.elements, node_type)
    }
}

/// A positioned element on a page.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Absolute position on the page (top-left corner).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
    /// Child elements (positioned relative to page, not parent).
    pub children: Vec<LayoutElement>,
    /// Logical kind ("TableRow", "Total", ...), for tests and debugging.
    pub node_type: Option<String>,
}

/// What to actually draw for this element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Nothing to draw (just a layout container).
    None,
    /// Draw a rectangle (background, border).
    Rect {
        background: Option<Color>,
        border_width: Edges,
        border_color: Color,
        border_radius: CornerValues,
    },
    /// Draw text in a single face.
    Text {
        lines: Vec<TextLine>,
        font: StandardFont,
        font_size: f64,
        color: Color,
        letter_spacing: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

/// Shift an element and everything inside it down by `dy` points.
fn offset_element_y(el: &mut LayoutElement, dy: f64) {
    el.y += dy;
    if let DrawCommand::Text { lines, .. } = &mut el.draw {
        for line in lines.iter_mut() {
            line.y += dy;
        }
    }
    for child in &mut el.children {
        offset_element_y(child, dy);
    }
}

/// Content laid out at y = 0, ready to be dropped onto a page.
#[derive(Debug, Clone)]
struct Block {
    height: f64,
    elements: Vec<LayoutElement>,
}

/// Tracks where we are on the current page during layout.
#[derive(Debug)]
struct PageCursor {
    width: f64,
    height: f64,
    content_x: f64,
    content_y: f64,
    content_width: f64,
    content_height: f64,
    y: f64,
    elements: Vec<LayoutElement>,
}

impl PageCursor {
    fn new(config: &RenderConfig) -> Self {
        let (width, height) = config.page_size.dimensions();
        Self {
            width,
            height,
            content_x: config.margin.left,
            content_y: config.margin.top,
            content_width: config.content_width(),
            content_height: config.content_height(),
            y: 0.0,
            elements: Vec::new(),
        }
    }

    fn remaining_height(&self) -> f64 {
        (self.content_height - self.y).max(0.0)
    }

    fn is_fresh(&self) -> bool {
        self.elements.is_empty()
    }

    fn place(&mut self, block: Block, gap_after: f64) {
        let dy = self.content_y + self.y;
        for mut el in block.elements {
            offset_element_y(&mut el, dy);
            self.elements.push(el);
        }
        self.y += block.height + gap_after;
    }

    fn finalize(&mut self) -> LayoutPage {
        LayoutPage {
            width: self.width,
            height: self.height,
            elements: std::mem::take(&mut self.elements),
        }
    }

    fn break_page(&mut self, pages: &mut Vec<LayoutPage>) {
        pages.push(self.finalize());
        self.y = 0.0;
        tracing::debug!(page = pages.len() + 1, "started page");
    }

    /// Place an unbreakable block, moving to a new page if it does not fit.
    fn place_whole(&mut self, block: Block, gap_after: f64, pages: &mut Vec<LayoutPage>) {
        if block.height > self.remaining_height() && !self.is_fresh() {
            self.break_page(pages);
        }
        self.place(block, gap_after);
    }
}

/// A table row broken into lines, one list per cell.
struct RowLines {
    cells: Vec<Vec<BrokenLine>>,
    /// Lines in the tallest cell.
    line_count: usize,
}

fn row_height(style: &TextStyle, lines: usize) -> f64 {
    lines as f64 * style.line_box() + 2.0 * CELL_PAD_Y
}

/// Resolved text styles for each part of the document.
struct Typography {
    title: TextStyle,
    subtitle: TextStyle,
    reference: TextStyle,
    meta: TextStyle,
    label: TextStyle,
    party: TextStyle,
    value: TextStyle,
    detail: TextStyle,
    th: TextStyle,
    td: TextStyle,
    total_label: TextStyle,
    total_value: TextStyle,
    notes: TextStyle,
    footer: TextStyle,
}

impl Typography {
    fn new() -> Self {
        let ink = Color::hex(palette::INK);
        let muted = Color::hex(palette::MUTED);
        let faint = Color::hex(palette::FAINT);
        let body = Color::hex(palette::BODY);
        Self {
            title: TextStyle::new(21.0, 700, ink).with_line_height(1.2),
            subtitle: TextStyle::new(9.0, 400, muted)
                .with_letter_spacing(0.75)
                .uppercase(),
            reference: TextStyle::new(13.5, 700, ink),
            meta: TextStyle::new(9.0, 400, muted),
            label: TextStyle::new(7.5, 700, faint)
                .with_letter_spacing(1.1)
                .uppercase(),
            party: TextStyle::new(12.0, 700, ink),
            value: TextStyle::new(10.5, 400, ink),
            detail: TextStyle::new(9.0, 400, muted),
            th: TextStyle::new(7.5, 700, faint)
                .with_letter_spacing(1.1)
                .uppercase(),
            td: TextStyle::new(9.75, 400, body),
            total_label: TextStyle::new(9.0, 400, Color::hex(palette::ON_INK_MUTED)),
            total_value: TextStyle::new(16.5, 700, Color::WHITE).with_line_height(1.2),
            notes: TextStyle::new(9.75, 400, body).with_line_height(1.6),
            footer: TextStyle::new(8.25, 400, faint),
        }
    }
}

/// The main layout engine.
pub struct LayoutEngine {
    text_layout: TextLayout,
    type_scale: Typography,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            text_layout: TextLayout::new(),
            type_scale: Typography::new(),
        }
    }

    /// Lay out the document. Always returns at least one page.
    pub fn layout(
        &self,
        doc: &CheckRequestDocument,
        config: &RenderConfig,
        font_context: &FontContext,
    ) -> Vec<LayoutPage> {
        let mut cursor = PageCursor::new(config);
        let mut pages = Vec::new();
        let x = cursor.content_x;
        let width = cursor.content_width;

        cursor.place_whole(self.header_block(doc, x, width, font_context), HEADER_GAP, &mut pages);

        let parties = self.fields_block(&doc.parties, &self.type_scale.party, x, width, font_context);
        cursor.place_whole(parties, BLOCK_GAP, &mut pages);
        let dates = self.fields_block(&doc.dates, &self.type_scale.value, x, width, font_context);
        cursor.place_whole(dates, BLOCK_GAP, &mut pages);

        self.layout_table(doc, &mut cursor, &mut pages, font_context);

        cursor.place_whole(self.total_block(doc, x, width, font_context), BLOCK_GAP, &mut pages);

        if let Some(notes) = &doc.notes {
            self.layout_notes(notes, &mut cursor, &mut pages, font_context);
        }

        cursor.place_whole(self.footer_block(doc, x, width, font_context), 0.0, &mut pages);

        pages.push(cursor.finalize());
        tracing::debug!(pages = pages.len(), "layout complete");
        pages
    }

    fn break_text(
        &self,
        font_context: &FontContext,
        content: &str,
        width: f64,
        style: &TextStyle,
    ) -> Vec<BrokenLine> {
        self.text_layout
            .break_into_lines(font_context, content, width, style)
    }

    /// Build a text element from already broken lines, top at `y`.
    #[allow(clippy::too_many_arguments)]
    fn lines_element(
        &self,
        font_context: &FontContext,
        lines: Vec<BrokenLine>,
        style: &TextStyle,
        x: f64,
        y: f64,
        width: f64,
        align: TextAlign,
    ) -> LayoutElement {
        let font = font_context.resolve(&style.font_family, style.font_weight);
        let metrics = font.metrics();
        let line_box = style.line_box();
        let ascent = metrics.ascender as f64 / 1000.0 * style.font_size;
        let descent = -(metrics.descender as f64) / 1000.0 * style.font_size;
        let half_leading = (line_box - ascent - descent) / 2.0;

        let text_lines: Vec<TextLine> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let line_x = match align {
                    TextAlign::Left => x,
                    TextAlign::Right => x + width - line.width,
                    TextAlign::Center => x + (width - line.width) / 2.0,
                };
                TextLine {
                    x: line_x,
                    y: y + i as f64 * line_box + half_leading + ascent,
                    width: line.width,
                    height: line_box,
                    text: line.text,
                }
            })
            .collect();

        LayoutElement {
            x,
            y,
            width,
            height: text_lines.len() as f64 * line_box,
            draw: DrawCommand::Text {
                lines: text_lines,
                font,
                font_size: style.font_size,
                color: style.color,
                letter_spacing: style.letter_spacing,
            },
            children: vec![],
            node_type: Some("Text".to_string()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text_element(
        &self,
        font_context: &FontContext,
        content: &str,
        style: &TextStyle,
        x: f64,
        y: f64,
        width: f64,
        align: TextAlign,
    ) -> LayoutElement {
        let lines = self.break_text(font_context, content, width, style);
        let lines = self.clip_lines(font_context, lines, MAX_BLOCK_LINES, width, style);
        self.lines_element(font_context, lines, style, x, y, width, align)
    }

    /// Keep at most `max` lines. A cut ends in an ellipsis that fits
    /// `width`.
    fn clip_lines(
        &self,
        font_context: &FontContext,
        mut lines: Vec<BrokenLine>,
        max: usize,
        width: f64,
        style: &TextStyle,
    ) -> Vec<BrokenLine> {
        if lines.len() <= max {
            return lines;
        }
        tracing::debug!(lines = lines.len(), max, "clipping text");
        lines.truncate(max);
        if let Some(last) = lines.last_mut() {
            let mut kept = last.text.trim_end().to_string();
            loop {
                let text = format!("{}{}", kept, ELLIPSIS);
                let text_width = self.text_layout.measure(font_context, &text, style);
                if text_width <= width || kept.is_empty() {
                    *last = BrokenLine {
                        text,
                        width: text_width,
                    };
                    break;
                }
                kept.pop();
                kept.truncate(kept.trim_end().len());
            }
        }
        lines
    }

    fn container(
        node_type: &str,
        x: f64,
        width: f64,
        height: f64,
        draw: DrawCommand,
        children: Vec<LayoutElement>,
    ) -> LayoutElement {
        LayoutElement {
            x,
            y: 0.0,
            width,
            height,
            draw,
            children,
            node_type: Some(node_type.to_string()),
        }
    }

    fn header_block(
        &self,
        doc: &CheckRequestDocument,
        x: f64,
        width: f64,
        font_context: &FontContext,
    ) -> Block {
        let ts = &self.type_scale;
        let left_w = width * 0.6;
        let right_w = width - left_w;
        let right_x = x + left_w;

        let title = self.text_element(font_context, &doc.title, &ts.title, x, 0.0, left_w, TextAlign::Left);
        let subtitle = self.text_element(
            font_context,
            &doc.subtitle,
            &ts.subtitle,
            x,
            title.height + 3.0,
            left_w,
            TextAlign::Left,
        );
        let reference = self.text_element(
            font_context,
            &doc.reference,
            &ts.reference,
            right_x,
            0.0,
            right_w,
            TextAlign::Right,
        );
        let date = self.text_element(
            font_context,
            &doc.date_line,
            &ts.meta,
            right_x,
            reference.height + 3.0,
            right_w,
            TextAlign::Right,
        );

        let content_h = (subtitle.y + subtitle.height).max(date.y + date.height);
        let height = content_h + 15.0;
        let rule = Self::container(
            "Header",
            x,
            width,
            height,
            DrawCommand::Rect {
                background: None,
                border_width: Edges::bottom(2.25),
                border_color: Color::hex(palette::INK),
                border_radius: CornerValues::default(),
            },
            vec![title, subtitle, reference, date],
        );
        Block {
            height,
            elements: vec![rule],
        }
    }

    /// Labelled values side by side in equal columns.
    fn fields_block(
        &self,
        fields: &[Field],
        lead_style: &TextStyle,
        x: f64,
        width: f64,
        font_context: &FontContext,
    ) -> Block {
        let ts = &self.type_scale;
        let n = fields.len().max(1) as f64;
        let col_w = (width - FIELD_GAP * (n - 1.0)) / n;

        let mut children = Vec::new();
        let mut height: f64 = 0.0;
        for (i, field) in fields.iter().enumerate() {
            let col_x = x + i as f64 * (col_w + FIELD_GAP);
            let value_style = if i == 0 { lead_style } else { &ts.value };

            let label = self.text_element(font_context, field.label, &ts.label, col_x, 0.0, col_w, TextAlign::Left);
            let value_y = label.height + 3.0;
            let value = self.text_element(
                font_context,
                &field.value,
                value_style,
                col_x,
                value_y,
                col_w,
                TextAlign::Left,
            );
            let mut bottom = value.y + value.height;
            children.push(label);
            children.push(value);

            if let Some(detail) = &field.detail {
                let detail = self.text_element(
                    font_context,
                    detail,
                    &ts.detail,
                    col_x,
                    bottom + 1.5,
                    col_w,
                    TextAlign::Left,
                );
                bottom = detail.y + detail.height;
                children.push(detail);
            }
            height = height.max(bottom);
        }

        Block {
            height,
            elements: vec![Self::container("Fields", x, width, height, DrawCommand::None, children)],
        }
    }

    /// Break every cell of a row, keeping at most `max_lines` per cell.
    fn break_row(
        &self,
        cells: &[String],
        widths: &[f64],
        style: &TextStyle,
        max_lines: usize,
        font_context: &FontContext,
    ) -> RowLines {
        let cells: Vec<Vec<BrokenLine>> = cells
            .iter()
            .zip(widths)
            .map(|(text, width)| {
                let inner = (width - 2.0 * CELL_PAD_X).max(1.0);
                let lines = self.break_text(font_context, text, inner, style);
                self.clip_lines(font_context, lines, max_lines, inner, style)
            })
            .collect();
        let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
        RowLines { cells, line_count }
    }

    /// The `lines` slice of a row as a block. Only the piece that ends the
    /// row draws its bottom rule.
    #[allow(clippy::too_many_arguments)]
    fn row_block(
        &self,
        row: &RowLines,
        lines: Range<usize>,
        doc: &CheckRequestDocument,
        widths: &[f64],
        x: f64,
        is_header: bool,
        font_context: &FontContext,
    ) -> Block {
        let ts = &self.type_scale;
        let style = if is_header { &ts.th } else { &ts.td };

        let mut cell_x = x;
        let mut children = Vec::with_capacity(row.cells.len());
        for ((cell, width), column) in row.cells.iter().zip(widths).zip(&doc.columns) {
            let end = lines.end.min(cell.len());
            let start = lines.start.min(end);
            if start < end {
                children.push(self.lines_element(
                    font_context,
                    cell[start..end].to_vec(),
                    style,
                    cell_x + CELL_PAD_X,
                    CELL_PAD_Y,
                    (width - 2.0 * CELL_PAD_X).max(1.0),
                    column.align(),
                ));
            }
            cell_x += width;
        }

        let height = row_height(style, lines.len());
        let rule = if lines.end < row.line_count {
            Edges::default()
        } else {
            Edges::bottom(if is_header { 1.5 } else { 0.75 })
        };
        let total_width: f64 = widths.iter().sum();
        let element = Self::container(
            if is_header { "TableHeader" } else { "TableRow" },
            x,
            total_width,
            height,
            DrawCommand::Rect {
                background: is_header.then(|| Color::hex(palette::WASH)),
                border_width: rule,
                border_color: Color::hex(palette::RULE),
                border_radius: CornerValues::default(),
            },
            children,
        );
        Block {
            height,
            elements: vec![element],
        }
    }

    fn layout_table(
        &self,
        doc: &CheckRequestDocument,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        font_context: &FontContext,
    ) {
        let ts = &self.type_scale;
        let x = cursor.content_x;
        let widths = plan_widths(&doc.columns, cursor.content_width);
        let titles: Vec<String> = doc.columns.iter().map(|c| c.title.clone()).collect();

        let header_lines = self.break_row(&titles, &widths, &ts.th, MAX_BLOCK_LINES, font_context);
        let header = self.row_block(
            &header_lines,
            0..header_lines.line_count,
            doc,
            &widths,
            x,
            true,
            font_context,
        );
        let rows: Vec<RowLines> = doc
            .rows
            .iter()
            .map(|cells| self.break_row(cells, &widths, &ts.td, usize::MAX, font_context))
            .collect();
        let heights: Vec<f64> = rows.iter().map(|r| row_height(&ts.td, r.line_count)).collect();

        let page_room = cursor.content_height - header.height;
        let too_tall = |lines: usize| row_height(&ts.td, lines) > page_room;
        let split_min = row_height(&ts.td, SPLIT_MIN_LINES);

        // The header row goes wherever the first rows go.
        let room = cursor.remaining_height() - header.height;
        let starts_here = match rows.first() {
            None => true,
            Some(first) if too_tall(first.line_count) => room >= split_min,
            Some(_) => fill_page(&heights, room, false, ROWS) > 0,
        };
        if !starts_here && !cursor.is_fresh() {
            cursor.break_page(pages);
        }
        cursor.place(header.clone(), 0.0);

        let mut next = 0;
        let mut line_start = 0;
        while next < rows.len() {
            let room = cursor.remaining_height();
            let fresh = room + 1e-9 >= page_room;
            let row = &rows[next];

            if too_tall(row.line_count - line_start) {
                let fit = ((room - 2.0 * CELL_PAD_Y) / ts.td.line_box() + 1e-9).floor().max(0.0) as usize;
                let take = if fresh {
                    fit.max(1)
                } else if fit >= SPLIT_MIN_LINES {
                    fit
                } else {
                    0
                };
                if take > 0 {
                    let piece = line_start..line_start + take;
                    cursor.place(self.row_block(row, piece, doc, &widths, x, false, font_context), 0.0);
                    line_start += take;
                }
                tracing::debug!(row = next + 1, lines_placed = line_start, "row continues on next page");
                cursor.break_page(pages);
                cursor.place(header.clone(), 0.0);
                continue;
            }

            let mut run = vec![row_height(&ts.td, row.line_count - line_start)];
            run.extend_from_slice(&heights[next + 1..]);
            let take = fill_page(&run, room, fresh, ROWS);
            for (i, row) in rows[next..next + take].iter().enumerate() {
                let from = if i == 0 { line_start } else { 0 };
                cursor.place(
                    self.row_block(row, from..row.line_count, doc, &widths, x, false, font_context),
                    0.0,
                );
            }
            if take > 0 {
                next += take;
                line_start = 0;
            }
            if next == rows.len() {
                break;
            }
            // A row too tall for any page starts in whatever room is left.
            if take > 0 && too_tall(rows[next].line_count) {
                continue;
            }

            tracing::debug!(rows_placed = next, rows = rows.len(), "table continues on next page");
            cursor.break_page(pages);
            cursor.place(header.clone(), 0.0);
        }
        cursor.y += BLOCK_GAP * 0.75;
    }

    fn total_block(
        &self,
        doc: &CheckRequestDocument,
        x: f64,
        width: f64,
        font_context: &FontContext,
    ) -> Block {
        let ts = &self.type_scale;
        let (pad_x, pad_y, gap) = (21.0, 10.5, 12.0);

        let label_w = self.text_layout.measure(font_context, TOTAL, &ts.total_label);
        let value_w = self.text_layout.measure(font_context, &doc.total, &ts.total_value);
        let box_w = (pad_x * 2.0 + label_w + gap + value_w).min(width);
        let box_x = x + width - box_w;

        let value_h = ts.total_value.line_box();
        let label_h = ts.total_label.line_box();
        let box_h = pad_y * 2.0 + value_h.max(label_h);

        let label = self.text_element(
            font_context,
            TOTAL,
            &ts.total_label,
            box_x + pad_x,
            (box_h - label_h) / 2.0,
            label_w,
            TextAlign::Left,
        );
        let value = self.text_element(
            font_context,
            &doc.total,
            &ts.total_value,
            box_x + pad_x + label_w + gap,
            (box_h - value_h) / 2.0,
            value_w,
            TextAlign::Left,
        );

        Block {
            height: box_h,
            elements: vec![Self::container(
                "Total",
                box_x,
                box_w,
                box_h,
                DrawCommand::Rect {
                    background: Some(Color::hex(palette::INK)),
                    border_width: Edges::default(),
                    border_color: Color::hex(palette::INK),
                    border_radius: CornerValues::uniform(BOX_RADIUS),
                },
                vec![label, value],
            )],
        }
    }

    /// Notes split across pages between lines; each fragment is boxed.
    fn layout_notes(
        &self,
        notes: &str,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        font_context: &FontContext,
    ) {
        let ts = &self.type_scale;
        let pad = 15.0;
        let label_gap = 4.5;
        let x = cursor.content_x;
        let width = cursor.content_width;
        let inner_w = width - 2.0 * pad;

        let lines = self.break_text(font_context, notes, inner_w, &ts.notes);
        let line_h = ts.notes.line_box();
        let label_h = ts.label.line_box() + label_gap;

        // Item 0 is the label; the rest are note lines.
        let mut heights = vec![label_h];
        heights.extend(std::iter::repeat(line_h).take(lines.len()));

        let first_room = (cursor.remaining_height() - 2.0 * pad).max(0.0);
        let page_room = cursor.content_height - 2.0 * pad;
        let runs = paginate(&heights, first_room, page_room, NOTE_LINES);

        let mut remaining_lines = lines.into_iter();
        for (i, run) in runs.into_iter().enumerate() {
            if i > 0 {
                tracing::debug!(lines_placed = run.start.saturating_sub(1), "notes continue on next page");
                cursor.break_page(pages);
            }
            if run.is_empty() {
                continue;
            }

            let mut children = Vec::new();
            let mut y = pad;
            let mut line_count = run.len();
            if run.start == 0 {
                children.push(self.text_element(font_context, NOTES, &ts.label, x + pad, y, inner_w, TextAlign::Left));
                y += label_h;
                line_count -= 1;
            }
            let fragment: Vec<BrokenLine> = remaining_lines.by_ref().take(line_count).collect();
            if !fragment.is_empty() {
                children.push(self.lines_element(font_context, fragment, &ts.notes, x + pad, y, inner_w, TextAlign::Left));
                y += line_count as f64 * line_h;
            }
            let height = y + pad;

            cursor.place(
                Block {
                    height,
                    elements: vec![Self::container(
                        "Notes",
                        x,
                        width,
                        height,
                        DrawCommand::Rect {
                            background: Some(Color::hex(palette::WASH)),
                            border_width: Edges::uniform(0.75),
                            border_color: Color::hex(palette::RULE),
                            border_radius: CornerValues::uniform(BOX_RADIUS),
                        },
                        children,
                    )],
                },
                BLOCK_GAP,
            );
        }
    }

    fn footer_block(
        &self,
        doc: &CheckRequestDocument,
        x: f64,
        width: f64,
        font_context: &FontContext,
    ) -> Block {
        let ts = &self.type_scale;
        let pad_top = 12.0;
        let left_w = width * 0.6;
        let attribution = self.text_element(
            font_context,
            &doc.attribution,
            &ts.footer,
            x,
            pad_top,
            left_w,
            TextAlign::Left,
        );
        let timestamp = self.text_element(
            font_context,
            &doc.timestamp,
            &ts.footer,
            x + left_w,
            pad_top,
            width - left_w,
            TextAlign::Right,
        );
        let height = pad_top + attribution.height.max(timestamp.height);
        Block {
            height,
            elements: vec![Self::container(
                "Footer",
                x,
                width,
                height,
                DrawCommand::Rect {
                    background: None,
                    border_width: Edges::top(0.75),
                    border_color: Color::hex(palette::RULE),
                    border_radius: CornerValues::default(),
                },
                vec![attribution, timestamp],
            )],
        }
    }
}
