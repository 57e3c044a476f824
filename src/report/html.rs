//! HTML rendering of report sections.
//!
//! Every piece of dynamic text (titles, column names, cells, error messages)
//! is escaped before it is placed in markup.

use super::ReportSection;
use crate::query::ResultSet;

const STYLE: &str = r#"body { font-family: sans-serif; margin: 2em; background: #f4f4f9; }
h1 { color: #333; }
table { border-collapse: collapse; width: 90%; margin-top: 20px; background: #fff; }
caption { caption-side: bottom; text-align: left; color: #666; padding-top: 6px; }
th, td { border: 1px solid #ccc; padding: 10px; text-align: left; }
th { background: #007bff; color: #fff; }
tr:nth-child(even) { background: #f2f2f2; }
p.error { color: red; }"#;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the full dashboard page.
pub fn render_page(title: &str, sections: &[ReportSection]) -> String {
    let title = escape_html(title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{title}</title>"));
    html.push_str(&format!("<style>\n{STYLE}\n</style>"));
    html.push_str("</head><body>\n");
    html.push_str(&format!("<h1>📊 {title}</h1>\n"));

    for section in sections {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&section.title)));
        match &section.outcome {
            Ok(result) => render_table(&mut html, result),
            Err(e) => html.push_str(&format!(
                "<p class=\"error\"><strong>Error:</strong> {}</p>\n",
                escape_html(&e.to_string())
            )),
        }
    }

    html.push_str("</body></html>\n");
    html
}

fn render_table(html: &mut String, result: &ResultSet) {
    html.push_str("<table>");
    html.push_str(&format!("<caption>{}</caption>", escape_html(&result.summary())));

    html.push_str("<thead><tr>");
    for column in &result.header {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &result.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>\n");
}
