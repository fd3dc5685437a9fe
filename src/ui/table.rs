//! Table rendering for formatted output.

use console::measure_text_width;

/// A simple box-drawn table.
///
/// Cell widths are measured without ANSI styling, so pre-colored cells
/// line up.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| measure_text_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = self.column_widths.get_mut(i) {
                *width = (*width).max(measure_text_width(cell));
            }
        }
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let mut lines = vec![
            self.render_border('┌', '┬', '┐'),
            self.render_row(&self.headers),
            self.render_border('├', '┼', '┤'),
        ];
        lines.extend(self.rows.iter().map(|row| self.render_row(row)));
        lines.push(self.render_border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn render_border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut s = String::from("│");
        for (i, width) in self.column_widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let padding = width.saturating_sub(measure_text_width(cell));
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(padding));
            s.push_str(" │");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_empty() {
        let table = Table::new(vec!["Module", "Status"]);
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);

        let output = table.render();
        assert!(output.contains("Module"));
        assert!(output.contains("Status"));
    }

    #[test]
    fn table_with_rows() {
        let mut table = Table::new(vec!["Module", "Status"]);
        table.add_row(vec!["Az".to_string(), "[ok]".to_string()]);
        table.add_row(vec!["MicrosoftTeams".to_string(), "[missing]".to_string()]);

        assert_eq!(table.row_count(), 2);
        let output = table.render();
        assert!(output.contains("│ Az             │ [ok]      │"));
        assert!(output.contains("│ MicrosoftTeams │ [missing] │"));
    }

    #[test]
    fn table_lines_have_equal_width() {
        let mut table = Table::new(vec!["A", "B"]);
        table.add_row(vec!["longer_value".to_string(), "x".to_string()]);

        let output = table.render();
        let widths: Vec<usize> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn styled_cells_do_not_widen_columns() {
        let mut table = Table::new(vec!["Status"]);
        table.add_row(vec!["\u{1b}[32m[ok]\u{1b}[0m".to_string()]);
        let output = table.render();
        assert!(output.starts_with("┌────────┐"));
    }

    #[test]
    fn table_uses_box_drawing() {
        let output = Table::new(vec!["Test"]).render();
        assert!(output.contains("┌"));
        assert!(output.contains("┘"));
    }
}
