//! Small markdown building helpers shared by the generators

use std::fmt::Write;

#[derive(Debug, Default)]
pub struct Markdown {
    buf: String,
}

impl Markdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&mut self, level: usize, text: &str) -> &mut Self {
        let _ = writeln!(self.buf, "{} {text}\n", "#".repeat(level));
        self
    }

    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.buf, "{text}\n");
        self
    }

    /// A `- **Label**: value` line. Empty values become "N/A".
    pub fn field(&mut self, label: &str, value: &str) -> &mut Self {
        let value = if value.is_empty() { "N/A" } else { value };
        let _ = writeln!(self.buf, "- **{label}**: {value}");
        self
    }

    /// Terminate a run of `field` lines.
    pub fn end_list(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> &mut Self {
        let _ = writeln!(self.buf, "| {} |", headers.join(" | "));
        let _ = writeln!(
            self.buf,
            "|{}|",
            headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        );
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            let _ = writeln!(self.buf, "| {} |", cells.join(" | "));
        }
        self.buf.push('\n');
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Keep cell content from breaking the table grid.
fn escape_cell(cell: &str) -> String {
    let cleaned = cell.replace('\n', " ").replace('|', "\\|");
    if cleaned.is_empty() {
        "-".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_escapes_pipes_and_blanks() {
        let mut md = Markdown::new();
        md.table(
            &["Name", "Value"],
            &[
                vec!["a".to_string(), "x|y".to_string()],
                vec!["b".to_string(), String::new()],
            ],
        );
        let out = md.finish();
        assert!(out.contains("| Name | Value |"));
        assert!(out.contains("|---|---|"));
        assert!(out.contains("x\\|y"));
        assert!(out.contains("| b | - |"));
    }

    #[test]
    fn fields_default_to_na() {
        let mut md = Markdown::new();
        md.field("CPU", "").field("Memory", "4.00 GB").end_list();
        let out = md.finish();
        assert!(out.contains("- **CPU**: N/A"));
        assert!(out.contains("- **Memory**: 4.00 GB"));
    }
}
