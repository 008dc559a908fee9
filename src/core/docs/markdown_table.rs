//! Markdown table text to [`TableGrid`].
//!
//! Empty cells are dropped along with the leading/trailing pipe artifacts,
//! so `| A | | C |` parses as two cells. Converted tables take their column
//! count from the first row, and callers rely on that count staying stable.

use std::sync::OnceLock;

use regex::Regex;

use super::docs_service::DocsError;
use super::document_models::TableGrid;

static SEPARATOR_LINE: OnceLock<Regex> = OnceLock::new();

/// Matches header/body rulings such as `|---|:---:|`.
fn separator_regex() -> &'static Regex {
    SEPARATOR_LINE.get_or_init(|| Regex::new(r"^[\s|:\-]+$").expect("Invalid separator regex"))
}

pub fn is_separator_line(line: &str) -> bool {
    separator_regex().is_match(line)
}

/// A line that belongs to the table: has a pipe and isn't blank.
fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.contains('|')
}

/// Non-empty trimmed cells of one row line.
pub fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `text` into a grid, failing with [`DocsError::EmptyTable`] when no
/// data row survives.
pub fn parse_markdown_table(text: &str) -> Result<TableGrid, DocsError> {
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| is_table_line(line))
        .filter(|line| !is_separator_line(line))
        .map(split_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    if rows.is_empty() {
        return Err(DocsError::EmptyTable);
    }

    Ok(TableGrid { rows })
}

/// Table lines of `text`, trimmed, as they should appear in the document.
/// Separators count since they are deleted with the table.
pub fn table_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| is_table_line(line))
        .map(str::trim)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_table() {
        let grid = parse_markdown_table("| A | B |\n|---|---|\n| 1 | 2 |").unwrap();
        assert_eq!(grid.rows, vec![cells(&["A", "B"]), cells(&["1", "2"])]);
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn test_separators_and_other_lines_never_become_rows() {
        let text = "Intro paragraph\n\
                    | Name | Qty | Price |\n\
                    |:-----|:---:|------:|\n\
                    \n\
                    | Apple | 3 | 1.20 |\n\
                    | --- | --- | --- |\n\
                    | Pear | 5 | 0.80 |\n\
                    trailing words";
        let grid = parse_markdown_table(text).unwrap();

        assert_eq!(grid.row_count(), 3);
        assert!(grid.rows.iter().all(|row| row.len() == 3));
        assert!(grid
            .rows
            .iter()
            .flatten()
            .all(|cell| !cell.contains("---")));
    }

    #[test]
    fn test_empty_cells_collapse() {
        let grid = parse_markdown_table("| A | | C |").unwrap();
        assert_eq!(grid.rows, vec![cells(&["A", "C"])]);
    }

    #[test]
    fn test_rows_without_outer_pipes() {
        let grid = parse_markdown_table("A | B\n--|--\n1 | 2").unwrap();
        assert_eq!(grid.rows, vec![cells(&["A", "B"]), cells(&["1", "2"])]);
    }

    #[test]
    fn test_no_rows_is_empty_table_error() {
        assert!(matches!(
            parse_markdown_table("|---|---|\n\njust prose"),
            Err(DocsError::EmptyTable)
        ));
        assert!(matches!(parse_markdown_table(""), Err(DocsError::EmptyTable)));
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_separator_line("|---|---|"));
        assert!(is_separator_line(" | :--- | ---: | "));
        assert!(!is_separator_line("| A | B |"));
        assert!(!is_separator_line("| - item |"));
    }

    #[test]
    fn test_table_lines() {
        let text = "\n  | A | B |\n|---|---|\nnot a row\n| 1 | 2 |  \n\n";
        assert_eq!(table_lines(text), vec!["| A | B |", "|---|---|", "| 1 | 2 |"]);
        assert!(table_lines("no table here").is_empty());
    }

    #[test]
    fn test_rows_match_row_lines_in_any_mix() {
        // 4 row lines, 3 separators, 5 other lines.
        let text = "# Inventory\n\
                    |---|---|\n\
                    | a | 1 |\n\
                    \n\
                    some prose\n\
                    |:-:|:-:|\n\
                    | b | 2 |\n\
                    - bullet\n\
                    | c | 3 |\n\
                    | - | - |\n\
                    | d | 4 |\n\
                    end";
        let grid = parse_markdown_table(text).unwrap();

        assert_eq!(
            grid.rows,
            vec![
                cells(&["a", "1"]),
                cells(&["b", "2"]),
                cells(&["c", "3"]),
                cells(&["d", "4"]),
            ]
        );
    }
}
