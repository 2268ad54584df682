//! Column-aligned tables
//!
//! Widths are measured without ANSI escapes, so coloured cells line up.

use console::measure_text_width;
use owo_colors::OwoColorize;

/// Plain-text table with a bold header row
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given column headers
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Whether no rows were added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = measure_text_width(cell);
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }
        widths
    }

    /// Render every line, header first, without colour on the header
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        std::iter::once(&self.headers)
            .chain(&self.rows)
            .map(|cells| render_row(cells, &widths))
            .collect()
    }

    /// Print the table to stdout
    pub fn print(&self) {
        let lines = self.lines();
        let mut iter = lines.iter();
        if let Some(header) = iter.next() {
            println!("{}", header.bold());
        }
        for line in iter {
            println!("{line}");
        }
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map_or("", String::as_str);
        line.push_str(cell);
        if i + 1 < widths.len() {
            let pad = width.saturating_sub(measure_text_width(cell)) + 2;
            line.push_str(&" ".repeat(pad));
        }
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_align() {
        let mut table = Table::new(["NAME", "STATUS"]);
        table.row(["API", "up"]).row(["Checkout service", "down"]);

        assert_eq!(
            table.lines(),
            vec![
                "NAME              STATUS".to_string(),
                "API               up".to_string(),
                "Checkout service  down".to_string(),
            ]
        );
    }

    #[test]
    fn test_ansi_cells_do_not_skew_widths() {
        let mut table = Table::new(["A", "B"]);
        table.row(["\u{1b}[32mok\u{1b}[0m", "x"]);

        let lines = table.lines();
        assert_eq!(console::strip_ansi_codes(&lines[1]), "ok  x");
    }

    #[test]
    fn test_short_rows() {
        let mut table = Table::new(["A", "B", "C"]);
        table.row(["1"]);
        assert_eq!(table.lines()[1], "1");
        assert!(!table.is_empty());
    }
}
