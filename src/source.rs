use crate::clean::Cleaner;
use anyhow::Result;
use chrono::NaiveDateTime;

/// Format of received times in the spreadsheet. Zero padded, so string order
/// is chronological order.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub subject: String,
    pub sender: String,
    pub received_time: NaiveDateTime,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub subject: String,
    pub sender: String,
    pub received_time: NaiveDateTime,
    pub cleaned_body: String,
}

impl MessageRecord {
    pub fn clean(self, cleaner: &Cleaner) -> CleanedRecord {
        CleanedRecord {
            cleaned_body: cleaner.clean(&self.body),
            subject: self.subject,
            sender: self.sender,
            received_time: self.received_time,
        }
    }
}

impl CleanedRecord {
    pub fn received(&self) -> String {
        self.received_time.format(TIME_FORMAT).to_string()
    }
}

pub type Messages<'a> = Box<dyn Iterator<Item = Result<MessageRecord>> + 'a>;

/// A mailbox that can be enumerated.
///
/// Failing to open the mailbox is returned from `messages` itself, a message
/// that cannot be read shows up as an `Err` item and does not end the
/// iteration.
pub trait MessageSource {
    fn messages(&self) -> Result<Messages<'_>>;
}
