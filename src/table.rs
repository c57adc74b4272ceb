use crate::source::CleanedRecord;

pub const HEADER: [&str; 4] = ["Subject", "Sender", "Received Time", "Body"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Subject,
    Sender,
    Received,
    Body,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Subject,
        Column::Sender,
        Column::Received,
        Column::Body,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One data row of the sheet. The received time is kept as the text stored
/// in the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub subject: String,
    pub sender: String,
    pub received: String,
    pub body: String,
}

impl TableRow {
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Subject => &self.subject,
            Column::Sender => &self.sender,
            Column::Received => &self.received,
            Column::Body => &self.body,
        }
    }

    pub fn set(&mut self, column: Column, value: String) {
        let cell = match column {
            Column::Subject => &mut self.subject,
            Column::Sender => &mut self.sender,
            Column::Received => &mut self.received,
            Column::Body => &mut self.body,
        };
        *cell = value;
    }

    /// Builds a row from cell values in column order. Missing cells are
    /// empty, extra cells are ignored.
    pub fn from_cells<I: IntoIterator<Item = String>>(cells: I) -> Self {
        let mut row = TableRow::default();
        for (column, value) in Column::ALL.into_iter().zip(cells) {
            row.set(column, value);
        }
        row
    }

    pub fn cells(&self) -> impl Iterator<Item = &str> {
        Column::ALL.into_iter().map(move |column| self.get(column))
    }
}

impl From<CleanedRecord> for TableRow {
    fn from(record: CleanedRecord) -> Self {
        TableRow {
            received: record.received(),
            subject: record.subject,
            sender: record.sender,
            body: record.cleaned_body,
        }
    }
}

/// Display attributes of a data row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowLayout {
    /// Row height in points. `None` leaves the default height.
    pub height: Option<f64>,
    pub wrap: bool,
}

/// The sheet in memory: the data rows below the fixed header row, with their
/// layout. Row indices count data rows only, starting at 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<TableRow>,
    layout: Vec<RowLayout>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        let mut table = Table::new();
        table.replace_rows(rows);
        table
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn append(&mut self, row: TableRow) {
        self.rows.push(row);
        self.layout.push(RowLayout::default());
    }

    pub fn layout(&self, row: usize) -> Option<RowLayout> {
        self.layout.get(row).copied()
    }

    pub fn set_row_height(&mut self, row: usize, height: f64) {
        if let Some(layout) = self.layout.get_mut(row) {
            layout.height = Some(height);
        }
    }

    pub fn set_wrap(&mut self, row: usize, wrap: bool) {
        if let Some(layout) = self.layout.get_mut(row) {
            layout.wrap = wrap;
        }
    }

    /// Replaces the whole data region in one step. Layout belongs to row
    /// positions, so it is reset along with the rows.
    pub fn replace_rows(&mut self, rows: Vec<TableRow>) {
        self.layout = vec![RowLayout::default(); rows.len()];
        self.rows = rows;
    }
}
