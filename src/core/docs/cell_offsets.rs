// Where to write each cell of a freshly inserted table.
//
// Docs only resolves concrete cell offsets once the table exists, so cell
// text goes out in a second batch. Offsets come from the re-fetched table
// when it can be found, otherwise from a fixed-stride estimate that holds
// for small tables with short content.

use super::document_models::{Document, TableGrid};
use super::edit_requests::EditRequest;

/// Offset from the insertion point to the first cell's paragraph.
const FIRST_CELL_OFFSET: u32 = 4;
/// Offset added per row.
const ROW_STRIDE: u32 = 5;
/// Offset added per column.
const COLUMN_STRIDE: u32 = 2;

/// Fixed-stride estimate: `table_start + 4 + row * 5 + column * 2`.
pub fn estimated_cell_offset(table_start: u32, row: usize, column: usize) -> u32 {
    table_start + FIRST_CELL_OFFSET + row as u32 * ROW_STRIDE + column as u32 * COLUMN_STRIDE
}

/// Where a table inserted at `insert_at` starts. `insertTable` puts a
/// newline in front of the table.
pub fn estimated_table_start(insert_at: u32) -> u32 {
    insert_at + 1
}

/// A table found in a re-fetched snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// `startIndex` of the table element itself.
    pub start: u32,
    /// `cells[row][column]` is the start of the cell's first paragraph, or
    /// `None` when the snapshot leaves it out.
    pub cells: Vec<Vec<Option<u32>>>,
}

impl TableLayout {
    pub fn cell_offset(&self, row: usize, column: usize) -> Option<u32> {
        self.cells.get(row).and_then(|r| r.get(column).copied().flatten())
    }
}

/// Layout of the first table at or after `table_start`.
pub fn structural_cell_offsets(document: &Document, table_start: u32) -> Option<TableLayout> {
    let body = document.body.as_ref()?;
    let (start, table) = body
        .content
        .iter()
        .filter_map(|element| Some((element.start_index?, element.table.as_ref()?)))
        .find(|(start, _)| *start >= table_start)?;

    let cells = table
        .table_rows
        .iter()
        .map(|row| {
            row.table_cells
                .iter()
                .map(|cell| {
                    cell.content
                        .first()
                        .and_then(|element| element.start_index)
                        .or(cell.start_index.map(|start| start + 1))
                })
                .collect()
        })
        .collect();

    Some(TableLayout { start, cells })
}

/// `insertText` requests for every non-empty cell that has an offset.
///
/// Cells past `columns` (ragged rows) have no slot in the table and are
/// skipped. Requests are ordered from the highest offset down so that no
/// insert moves a target that comes after it in the batch.
pub fn cell_text_requests<F>(grid: &TableGrid, columns: usize, offset_for: F) -> Vec<EditRequest>
where
    F: Fn(usize, usize) -> Option<u32>,
{
    let mut placements: Vec<(u32, &str)> = grid
        .rows
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(move |(column, text)| *column < columns && !text.is_empty())
                .map(move |(column, text)| (row, column, text.as_str()))
        })
        .filter_map(|(row, column, text)| offset_for(row, column).map(|offset| (offset, text)))
        .collect();

    placements.sort_by(|a, b| b.0.cmp(&a.0));

    placements
        .into_iter()
        .map(|(offset, text)| EditRequest::insert_text(offset, text))
        .collect()
}
