use crate::source::TIME_FORMAT;
use crate::table::{Column, Table, TableRow, HEADER};
use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Shift Reports";
/// Longest text a spreadsheet cell can hold.
const MAX_CELL_CHARS: usize = 32_767;

fn column_width(column: Column) -> f64 {
    match column {
        Column::Subject => 40.0,
        Column::Sender => 20.0,
        Column::Received => 20.0,
        Column::Body => 80.0,
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Decodes the `_xHHHH_` escapes xlsx files use for control characters.
/// `_x005F_` is an escaped underscore, so `_x005F_x0041_` reads back as the
/// literal text `_x0041_`.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("_x") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| tail.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => unescape(s),
        // The time column may have been turned into real dates by hand.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| dt.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn is_header(cells: &[String]) -> bool {
    let (names, rest) = cells.split_at(cells.len().min(HEADER.len()));
    names.iter().map(String::as_str).eq(HEADER.iter().copied())
        && rest.iter().all(|cell| cell.is_empty())
}

/// Loads the data rows of the first worksheet. A first row equal to the
/// header is not part of the table; any other first row is kept as data.
/// A missing file gives an empty table.
pub fn load(path: &Path) -> Result<Table> {
    if !path.exists() {
        log::info!("Creating new sheet {}", path.display());
        return Ok(Table::new());
    }
    let mut workbook = open_workbook::<Xlsx<_>, _>(path)
        .with_context(|| format!("cannot open sheet {}", path.display()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.with_context(|| format!("cannot read sheet {}", path.display()))?,
        None => return Ok(Table::new()),
    };
    let (first_row, first_column) = match range.start() {
        Some(start) => start,
        None => return Ok(Table::new()),
    };

    let mut rows = vec![];
    for (index, cells) in range.rows().enumerate() {
        // Pad cells the range starts to the right of.
        let cells = (0..first_column)
            .map(|_| String::new())
            .chain(cells.iter().map(cell_text))
            .collect::<Vec<_>>();
        if first_row as usize + index == 0 {
            if is_header(&cells) {
                continue;
            }
            log::warn!("No header in {}, keeping first row as data", path.display());
        }
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(TableRow::from_cells(cells));
    }
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(Table::from_rows(rows))
}

fn excel_text(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            log::warn!("Truncating cell text of {} characters", value.chars().count());
            &value[..end]
        }
        None => value,
    }
}

fn write_workbook(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let wrap_format = Format::new().set_text_wrap();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        for column in Column::ALL {
            let col = column.index() as u16;
            worksheet.set_column_width(col, column_width(column))?;
            worksheet.write_string_with_format(0, col, HEADER[column.index()], &header_format)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        for (index, row) in table.rows().iter().enumerate() {
            let sheet_row = u32::try_from(index + 1)?;
            let layout = table.layout(index).unwrap_or_default();
            for (col, value) in row.cells().enumerate() {
                let value = excel_text(value);
                if layout.wrap {
                    worksheet.write_string_with_format(sheet_row, col as u16, value, &wrap_format)?;
                } else {
                    worksheet.write_string(sheet_row, col as u16, value)?;
                }
            }
            if let Some(height) = layout.height {
                worksheet.set_row_height(sheet_row, height)?;
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Writes the table to `path`. The sheet is written to a temporary file
/// first, the previous sheet is kept as `<path>.bak`.
pub fn save(table: &Table, path: &Path) -> Result<()> {
    let tmp_path = sibling(path, "tmp");
    if let Err(e) = write_workbook(table, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.context(format!("cannot write {}", tmp_path.display())));
    }
    if path.exists() {
        let backup_path = sibling(path, "bak");
        fs::rename(path, &backup_path)
            .with_context(|| format!("cannot back up {}", path.display()))?;
    }
    fs::rename(&tmp_path, path)
        .with_context(|| format!("cannot replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_and_sort;
    use rust_xlsxwriter::ExcelDateTime;

    fn row(subject: &str, received: &str, body: &str) -> TableRow {
        TableRow {
            subject: subject.to_string(),
            sender: "A".to_string(),
            received: received.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = load(&dir.path().join("Shift_Reports.xlsx")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Shift_Reports.xlsx");
        let mut table = Table::from_rows(vec![
            row("Shift Report 1", "2024-06-01 08:00:00", "Line1\nLine2"),
            row("Shift Report 2", "2024-06-02 08:00:00", ""),
        ]);
        format_and_sort(&mut table);
        save(&table, &path).unwrap();
        assert!(path.exists());
        assert!(!sibling(&path, "tmp").exists());
        assert!(!sibling(&path, "bak").exists());

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.rows(), table.rows());

        save(&loaded, &path).unwrap();
        assert!(sibling(&path, "bak").exists());
    }

    #[test]
    fn test_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Shift_Reports.xlsx");
        save(&Table::new(), &path).unwrap();
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_control_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Shift_Reports.xlsx");
        let table = Table::from_rows(vec![
            row("Shift Report\u{1}", "2024-06-01 08:00:00", "a\u{b}b"),
            row("cr\rhere", "2024-06-02 08:00:00", "lit _x0041_ esc"),
            row("_x005F_ and _x", "2024-06-03 08:00:00", "_x12_ _xZZZZ_"),
        ]);
        save(&table, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.rows(), table.rows());

        save(&loaded, &path).unwrap();
        assert_eq!(load(&path).unwrap().rows(), table.rows());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("Shift Report_x0001_"), "Shift Report\u{1}");
        assert_eq!(unescape("cr_x000D_here"), "cr\rhere");
        assert_eq!(unescape("lit _x005F_x0041_ esc"), "lit _x0041_ esc");
        assert_eq!(unescape("_x00e9_"), "\u{e9}");
        assert_eq!(unescape("_x12_ _xZZZZ_ _x"), "_x12_ _xZZZZ_ _x");
    }

    #[test]
    fn test_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Shift_Reports.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, subject) in ["Shift Report 1", "Shift Report 2"].iter().enumerate() {
            worksheet.write_string(r as u32, 0, *subject).unwrap();
            worksheet.write_string(r as u32, 2, "2024-06-01 08:00:00").unwrap();
        }
        workbook.save(&path).unwrap();

        let table = load(&path).unwrap();
        let subjects: Vec<_> = table.rows().iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, ["Shift Report 1", "Shift Report 2"]);
    }

    #[test]
    fn test_is_header() {
        let cells = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(is_header(&cells(&HEADER)));
        assert!(is_header(&cells(&["Subject", "Sender", "Received Time", "Body", ""])));
        assert!(!is_header(&cells(&["Subject", "Sender", "Received Time"])));
        assert!(!is_header(&cells(&["Shift Report", "A", "2024-06-01 08:00:00", ""])));
    }

    #[test]
    fn test_datetime_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Shift_Reports.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, name) in HEADER.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).unwrap();
        }
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let received = ExcelDateTime::from_ymd(2024, 6, 1)
            .unwrap()
            .and_hms(8, 0, 0)
            .unwrap();
        worksheet.write_string(1, 0, "Shift Report").unwrap();
        worksheet
            .write_datetime_with_format(1, 2, &received, &date_format)
            .unwrap();
        workbook.save(&path).unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].received, "2024-06-01 08:00:00");
    }

    #[test]
    fn test_excel_text() {
        assert_eq!(excel_text("short"), "short");
        let long = "\u{e9}".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(excel_text(&long).chars().count(), MAX_CELL_CHARS);
    }
}
