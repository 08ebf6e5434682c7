//! HTML output format
//!
//! A single self-contained page: embedded CSS, one table, subtitle lines
//! above it and the footnote below. Emphasized rows (the pooled overall
//! row) are rendered bold on a tinted background.

use crate::table::{Cell, Tabular};

/// Escape HTML special characters
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn generate_styles() -> &'static str {
    r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1 {
            color: #333;
            font-size: 1.4em;
        }
        .subtitle {
            color: #555;
            margin: 2px 0;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin: 16px 0 20px 0;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 6px 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        td.num {
            text-align: right;
            font-family: monospace;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr.emphasis td {
            font-weight: bold;
            background-color: #eef3fb;
            border-top: 2px solid #4a90d9;
        }
        .pass {
            color: #2e7d32;
            font-weight: bold;
        }
        .fail {
            color: #c62828;
        }
        .footnote, .footer {
            margin-top: 12px;
            font-size: 0.85em;
            color: #777;
        }
        .footer {
            text-align: center;
        }
        "#
}

fn format_cell(cell: &Cell) -> String {
    let text = escape_html(&cell.display());
    match cell {
        Cell::Decision(true) => format!("<td class=\"pass\">{}</td>", text),
        Cell::Decision(false) => format!("<td class=\"fail\">{}</td>", text),
        c if c.is_numeric() => format!("<td class=\"num\">{}</td>", text),
        _ => format!("<td>{}</td>", text),
    }
}

/// Render a table as a complete HTML document
pub fn to_html(table: &dyn Tabular) -> String {
    let title = escape_html(&table.title());
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", title));
    html.push_str("    <style>");
    html.push_str(generate_styles());
    html.push_str("</style>\n");
    html.push_str("</head>\n");

    html.push_str("<body>\n");
    html.push_str(&format!("    <h1>{}</h1>\n", title));
    for line in table.subtitle() {
        html.push_str(&format!(
            "    <p class=\"subtitle\">{}</p>\n",
            escape_html(&line)
        ));
    }

    html.push_str("    <table>\n");
    html.push_str("        <tr>");
    for header in table.headers() {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr>\n");

    for (index, row) in table.rows().iter().enumerate() {
        if table.is_emphasized(index) {
            html.push_str("        <tr class=\"emphasis\">");
        } else {
            html.push_str("        <tr>");
        }
        for cell in row {
            html.push_str(&format_cell(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("    </table>\n");

    if let Some(note) = table.footnote() {
        html.push_str(&format!(
            "    <p class=\"footnote\">{}</p>\n",
            escape_html(&note)
        ));
    }

    html.push_str("    <div class=\"footer\">\n");
    html.push_str(&format!(
        "        Generated by ledgerbench {}\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("    </div>\n");
    html.push_str("</body>\n");
    html.push_str("</html>\n");

    html
}
