//! HTML preview of aggregated rows
//!
//! A single standalone table for reading through a locale side by side with
//! its reference. Rows are grouped per file; the file name is printed once at
//! the top of its group.

use std::path::Path;

use indexmap::IndexMap;

use crate::aggregate::AggregatedRow;
use crate::error::Result;
use crate::utils::write_atomic;

const COLUMNS: [&str; 7] = [
    "Filename",
    "ID",
    "Sub type",
    "Chara",
    "Chara ID",
    "Original translation",
    "Japanese",
];

/// Render rows as a standalone HTML document
#[must_use]
pub fn render_html(rows: &[AggregatedRow]) -> String {
    let mut groups: IndexMap<&str, Vec<&AggregatedRow>> = IndexMap::new();
    for row in rows {
        groups.entry(row.filename.as_str()).or_default().push(row);
    }

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<title>Subtitles</title>\n");
    html.push_str("<style>\n");
    html.push_str("body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }\n");
    html.push_str("table { border-collapse: collapse; width: 100%; }\n");
    html.push_str("th, td { border: 1px solid #ddd; padding: 4px 8px; vertical-align: top; text-align: left; }\n");
    html.push_str("th { background: #bdd7ee; position: sticky; top: 0; }\n");
    html.push_str("tr.first td { border-top: 2px solid #888; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<table>\n<thead>\n<tr>");
    for column in COLUMNS {
        html.push_str(&format!("<th>{column}</th>"));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for (filename, group) in &groups {
        for (idx, row) in group.iter().enumerate() {
            let (class, name) = if idx == 0 {
                (" class=\"first\"", html_escape(filename))
            } else {
                ("", String::new())
            };
            html.push_str(&format!("<tr{class}><td>{name}</td>"));
            for value in [
                &row.content_id,
                &row.subtype,
                &row.character,
                &row.character_id,
                &row.text,
                &row.reference,
            ] {
                html.push_str(&format!("<td>{}</td>", html_escape(value)));
            }
            html.push_str("</tr>\n");
        }
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

/// Render rows and write them to `output`
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_html<P: AsRef<Path>>(rows: &[AggregatedRow], output: P) -> Result<()> {
    let output = output.as_ref();
    write_atomic(output, render_html(rows).as_bytes())?;
    tracing::info!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(filename: &str, id: &str, text: &str) -> AggregatedRow {
        AggregatedRow {
            filename: filename.into(),
            content_id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<i>"), "&lt;i&gt;");
        assert_eq!(html_escape("a & \"b\""), "a &amp; &quot;b&quot;");
    }

    #[test]
    fn test_grouped_by_filename() {
        let rows = vec![row("a", "1", "x"), row("b", "2", "y"), row("a", "3", "<z>")];
        let html = render_html(&rows);

        assert_eq!(html.matches("<td>a</td>").count(), 1);
        assert_eq!(html.matches("<tr class=\"first\">").count(), 2);
        assert!(html.contains("&lt;z&gt;"));

        // Both rows of "a" come before "b"
        let third = html.find("<td>3</td>").unwrap();
        let b = html.find("<td>b</td>").unwrap();
        assert!(third < b);
    }

    #[test]
    fn test_export_writes_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("subs.html");
        export_html(&[row("a", "1", "Hi")], &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("<th>Japanese</th>"));
    }
}
