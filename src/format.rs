use crate::table::{Table, TableRow};

const BASE_HEIGHT: usize = 15;
const CHARS_PER_LINE: usize = 40;
const MAX_HEIGHT: usize = 300;

/// Height of a row whose longest cell has `max_len` characters: one line of
/// 15 points per 40 characters, capped at 300.
pub fn row_height(max_len: usize) -> f64 {
    let lines = max_len / CHARS_PER_LINE;
    BASE_HEIGHT
        .saturating_add(lines.saturating_mul(BASE_HEIGHT))
        .min(MAX_HEIGHT) as f64
}

fn max_cell_len(row: &TableRow) -> usize {
    row.cells().map(|cell| cell.chars().count()).max().unwrap_or(0)
}

/// Orders the data rows newest first, then marks every data row as wrapped
/// and sizes it to its content.
///
/// Received times are zero padded, so comparing the stored text orders rows
/// chronologically. Rows with the same time keep their relative order.
pub fn format_and_sort(table: &mut Table) {
    if table.is_empty() {
        return;
    }
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| b.received.cmp(&a.received));
    table.replace_rows(rows);

    let heights: Vec<f64> = table.rows().iter().map(|row| row_height(max_cell_len(row))).collect();
    for (index, height) in heights.into_iter().enumerate() {
        table.set_wrap(index, true);
        table.set_row_height(index, height);
    }
}
