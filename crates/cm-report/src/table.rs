//! Plain-text Markdown tables.
//!
//! Columns are padded to the display width of their widest cell so the
//! table also reads well as raw text.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Default)]
pub struct MarkdownTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render blank, extra cells are dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        let mut row: Vec<String> = cells.into_iter().map(|c| escape_cell(&c)).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| r[i].width())
                    .chain(std::iter::once(h.width()))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&render_line(&self.headers, &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&render_line(&rule, &widths));
        for row in &self.rows {
            out.push_str(&render_line(row, &widths));
        }
        out
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{}{}", cell, " ".repeat(w.saturating_sub(cell.width()))))
        .collect();
    format!("| {} |\n", padded.join(" | "))
}

/// Keep cell text on one line and out of the column separators.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = MarkdownTable::new(&["Host", "Status"]);
        table.push_row(vec!["db-server-01".to_string(), "Down".to_string()]);
        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "| Host         | Status |");
        assert_eq!(lines[1], "| ------------ | ------ |");
        assert_eq!(lines[2], "| db-server-01 | Down   |");
    }

    #[test]
    fn test_render_pads_by_display_width() {
        let mut table = MarkdownTable::new(&["Name"]);
        table.push_row(vec!["日本".to_string()]);
        let text = table.render();
        // "日本" is four columns wide, same as "Name".
        assert!(text.contains("| 日本 |"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let mut table = MarkdownTable::new(&["Status"]);
        table.push_row(vec!["Failed | retry\nlater".to_string()]);
        assert!(table.render().contains("Failed \\| retry later"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = MarkdownTable::new(&["A", "B"]);
        table.push_row(vec!["x".to_string()]);
        assert!(table.render().lines().last().unwrap().starts_with("| x   |"));
    }
}
