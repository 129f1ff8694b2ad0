//! # HTML Print View
//!
//! A self-contained HTML page with the same sections as the PDF, meant to
//! be opened in a browser and printed. Styles are inline so the file can be
//! attached or mailed on its own. All record text is escaped.

use std::fmt::Write as FmtWrite;

use crate::config::RenderConfig;
use crate::document::{CheckRequestDocument, Field, NOTES, TOTAL};
use crate::layout::columns::plan_widths;
use crate::style::{palette, Color, TextAlign};

/// A palette entry as a CSS color.
fn css(hex: &str) -> String {
    Color::hex(hex).to_css()
}

fn label_style() -> String {
    format!(
        "margin:0 0 4px;font-size:10px;font-weight:700;color:{};\
         letter-spacing:1.5px;text-transform:uppercase;",
        css(palette::FAINT)
    )
}

/// Escape text for use in element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub struct HtmlWriter;

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, doc: &CheckRequestDocument, config: &RenderConfig) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Check Request {}</title></head>\n\
             <body style=\"margin:0;padding:40px;font-family:Helvetica,Arial,sans-serif;background:#fff;color:{};\">\n\
             <div style=\"max-width:800px;margin:0 auto;\">\n",
            escape_html(&doc.reference),
            css(palette::INK)
        );

        self.write_header(&mut html, doc);
        self.write_fields(&mut html, &doc.parties, true);
        self.write_fields(&mut html, &doc.dates, false);
        self.write_table(&mut html, doc, config);
        self.write_total(&mut html, doc);
        if let Some(notes) = &doc.notes {
            self.write_notes(&mut html, notes);
        }
        self.write_footer(&mut html, doc);

        html.push_str("</div>\n</body>\n</html>\n");
        tracing::debug!(bytes = html.len(), "html written");
        html
    }

    fn write_header(&self, html: &mut String, doc: &CheckRequestDocument) {
        let _ = write!(
            html,
            "<div style=\"display:flex;justify-content:space-between;align-items:flex-start;\
             margin-bottom:40px;padding-bottom:20px;border-bottom:3px solid {ink};\">\n\
             <div>\n\
             <h1 style=\"margin:0;font-size:28px;font-weight:800;\">{title}</h1>\n\
             <p style=\"margin:4px 0 0;font-size:12px;color:{muted};letter-spacing:1px;text-transform:uppercase;\">{subtitle}</p>\n\
             </div>\n\
             <div style=\"text-align:right;\">\n\
             <p style=\"margin:0;font-size:18px;font-weight:700;\">{reference}</p>\n\
             <p style=\"margin:4px 0 0;font-size:12px;color:{muted};\">{date}</p>\n\
             </div>\n</div>\n",
            ink = css(palette::INK),
            muted = css(palette::MUTED),
            title = escape_html(&doc.title),
            subtitle = escape_html(&doc.subtitle),
            reference = escape_html(&doc.reference),
            date = escape_html(&doc.date_line),
        );
    }

    /// `stretch` gives each column equal width, as the payee block does.
    fn write_fields(&self, html: &mut String, fields: &[Field], stretch: bool) {
        let label = label_style();
        html.push_str("<div style=\"display:flex;gap:40px;margin-bottom:32px;\">\n");
        for (i, field) in fields.iter().enumerate() {
            let lead = stretch && i == 0;
            let value_style = if lead {
                "margin:0;font-size:16px;font-weight:700;"
            } else {
                "margin:0;font-size:14px;"
            };
            let _ = write!(
                html,
                "<div{}>\n<p style=\"{}\">{}</p>\n<p style=\"{}\">{}</p>\n",
                if stretch { " style=\"flex:1;\"" } else { "" },
                label,
                escape_html(field.label),
                value_style,
                escape_html(&field.value)
            );
            if let Some(detail) = &field.detail {
                let _ = writeln!(
                    html,
                    "<p style=\"margin:2px 0 0;font-size:12px;color:{};\">{}</p>",
                    css(palette::MUTED),
                    escape_html(detail)
                );
            }
            html.push_str("</div>\n");
        }
        html.push_str("</div>\n");
    }

    fn write_table(&self, html: &mut String, doc: &CheckRequestDocument, config: &RenderConfig) {
        let content_width = config.content_width();
        let widths = plan_widths(&doc.columns, content_width);
        let rule = css(palette::RULE);
        let th = format!(
            "padding:10px 14px;text-align:left;font-size:10px;font-weight:700;color:{};\
             letter-spacing:1.5px;text-transform:uppercase;border-bottom:2px solid {};",
            css(palette::FAINT),
            rule
        );
        let td = format!(
            "padding:10px 14px;border-bottom:1px solid {};font-size:13px;color:{};",
            rule,
            css(palette::BODY)
        );

        html.push_str("<table style=\"width:100%;border-collapse:collapse;margin-bottom:24px;\">\n<colgroup>");
        for w in &widths {
            let _ = write!(html, "<col style=\"width:{:.2}%;\">", w / content_width * 100.0);
        }
        let _ = write!(
            html,
            "</colgroup>\n<thead>\n<tr style=\"background:{};\">",
            css(palette::WASH)
        );
        for column in &doc.columns {
            let _ = write!(
                html,
                "<th style=\"{}{}\">{}</th>",
                th,
                align_css(column.align()),
                escape_html(&column.title)
            );
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");

        for row in &doc.rows {
            html.push_str("<tr>");
            for (cell, column) in row.iter().zip(&doc.columns) {
                let _ = write!(
                    html,
                    "<td style=\"{}{}\">{}</td>",
                    td,
                    align_css(column.align()),
                    escape_html(cell)
                );
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
    }

    fn write_total(&self, html: &mut String, doc: &CheckRequestDocument) {
        let _ = write!(
            html,
            "<div style=\"display:flex;justify-content:flex-end;margin-bottom:32px;\">\n\
             <div style=\"background:{};color:white;padding:14px 28px;border-radius:12px;\">\n\
             <span style=\"font-size:12px;font-weight:500;opacity:0.7;margin-right:16px;\">{}</span>\n\
             <span style=\"font-size:22px;font-weight:800;\">{}</span>\n\
             </div>\n</div>\n",
            css(palette::INK),
            TOTAL,
            escape_html(&doc.total)
        );
    }

    fn write_notes(&self, html: &mut String, notes: &str) {
        let _ = write!(
            html,
            "<div style=\"margin-bottom:32px;padding:20px;background:{wash};border-radius:12px;border:1px solid {rule};\">\n\
             <p style=\"{label}margin:0 0 6px;\">{title}</p>\n\
             <p style=\"margin:0;font-size:13px;line-height:1.6;color:{body};white-space:pre-wrap;\">{notes}</p>\n\
             </div>\n",
            wash = css(palette::WASH),
            rule = css(palette::RULE),
            label = label_style(),
            title = NOTES,
            body = css(palette::BODY),
            notes = escape_html(notes),
        );
    }

    fn write_footer(&self, html: &mut String, doc: &CheckRequestDocument) {
        let _ = write!(
            html,
            "<div style=\"border-top:1px solid {rule};padding-top:16px;display:flex;justify-content:space-between;\">\n\
             <p style=\"margin:0;font-size:11px;color:{faint};\">{attribution}</p>\n\
             <p style=\"margin:0;font-size:11px;color:{faint};\">{timestamp}</p>\n\
             </div>\n",
            rule = css(palette::RULE),
            faint = css(palette::FAINT),
            attribution = escape_html(&doc.attribution),
            timestamp = escape_html(&doc.timestamp),
        );
    }
}

fn align_css(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "",
        TextAlign::Right => "text-align:right;",
        TextAlign::Center => "text-align:center;",
    }
}
