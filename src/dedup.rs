use crate::table::{Table, TableRow};
use std::collections::HashSet;

/// Remembers the (subject, received time) pairs already in the sheet.
#[derive(Debug, Default)]
pub struct DuplicateGuard {
    keys: HashSet<(String, String)>,
}

fn key(row: &TableRow) -> (String, String) {
    (row.subject.clone(), row.received.clone())
}

impl DuplicateGuard {
    /// Builds the guard from the rows already in `table`. A row whose key
    /// occurs earlier in the table is removed from it.
    pub fn from_table(table: &mut Table) -> Self {
        let mut guard = DuplicateGuard::default();
        let rows: Vec<TableRow> = table
            .rows()
            .iter()
            .filter(|row| {
                let admitted = guard.admit(row);
                if !admitted {
                    log::warn!("Removing duplicate row: {} ({})", row.subject, row.received);
                }
                admitted
            })
            .cloned()
            .collect();
        if rows.len() != table.len() {
            table.replace_rows(rows);
        }
        guard
    }

    /// Records the key of `row`. Returns false if it was already known, in
    /// which case the row is a duplicate.
    pub fn admit(&mut self, row: &TableRow) -> bool {
        self.keys.insert(key(row))
    }
}
