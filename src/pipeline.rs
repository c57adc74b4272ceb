use crate::clean::Cleaner;
use crate::dedup::DuplicateGuard;
use crate::filter::FilterSet;
use crate::format::format_and_sort;
use crate::source::MessageRecord;
use crate::table::{Table, TableRow};
use anyhow::Result;
use indicatif::ProgressBar;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub scanned: usize,
    pub added: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} messages scanned, {} added, {} duplicates, {} failed",
            self.scanned, self.added, self.duplicates, self.failed
        )
    }
}

pub struct Pipeline<'a> {
    pub filter: &'a FilterSet,
    pub cleaner: &'a Cleaner,
}

impl<'a> Pipeline<'a> {
    /// Appends every new matching message to `table`, then sorts and formats
    /// it. A message that cannot be read is logged and skipped.
    pub fn run<I>(&self, messages: I, table: &mut Table, progress: &ProgressBar) -> Summary
    where
        I: IntoIterator<Item = Result<MessageRecord>>,
    {
        let mut guard = DuplicateGuard::from_table(table);
        let mut summary = Summary::default();
        for message in messages {
            summary.scanned += 1;
            progress.inc(1);
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    log::warn!("Error processing email: {:#}", e);
                    summary.failed += 1;
                    continue;
                }
            };
            if !self.filter.matches(&message.subject) {
                continue;
            }
            let row = TableRow::from(message.clean(self.cleaner));
            if !guard.admit(&row) {
                log::info!("Skipping duplicate email: {}", row.subject);
                summary.duplicates += 1;
                continue;
            }
            log::info!("Added email: {}", row.subject);
            table.append(row);
            summary.added += 1;
        }
        format_and_sort(table);
        summary
    }
}
