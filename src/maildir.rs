use crate::datetime::{parse_datetime, parse_received};
use crate::source::{MessageRecord, MessageSource, Messages};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use mailparse::{MailAddr, MailHeaderMap, ParsedMail};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads messages from the `cur` and `new` directories of a maildir.
pub struct MaildirSource {
    dir: PathBuf,
    utc: bool,
}

impl MaildirSource {
    /// Received times are converted to local time unless `utc` is set.
    pub fn new(dir: impl Into<PathBuf>, utc: bool) -> Self {
        MaildirSource {
            dir: dir.into(),
            utc,
        }
    }

    fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            bail!("{} is not a maildir", self.dir.display());
        }
        let mut files = vec![];
        for sub in &["cur", "new"] {
            let dir = self.dir.join(sub);
            if !dir.is_dir() {
                continue;
            }
            let entries =
                fs::read_dir(&dir).with_context(|| format!("cannot list {}", dir.display()))?;
            for entry in entries {
                let path = entry?.path();
                if !is_hidden(&path) && path.is_file() {
                    files.push(path);
                }
            }
        }
        // Maildir file names start with the delivery time.
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<MessageRecord> {
        let raw = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
        let mail = mailparse::parse_mail(&raw)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        let record = parse_message(&mail, self.utc)
            .with_context(|| format!("invalid message {}", path.display()))?;
        Ok(record)
    }
}

impl MessageSource for MaildirSource {
    fn messages(&self) -> Result<Messages<'_>> {
        let files = self.list()?;
        log::info!("Found {} messages in {}", files.len(), self.dir.display());
        let messages: Messages<'_> = Box::new(files.into_iter().map(move |path| self.read(&path)));
        Ok(messages)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.'))
}

fn received_time(mail: &ParsedMail) -> Option<DateTime<FixedOffset>> {
    // The top-most Received header is the one added on final delivery.
    mail.headers
        .get_first_value("Received")
        .and_then(|value| parse_received(&value))
        .or_else(|| {
            mail.headers
                .get_first_value("Date")
                .and_then(|value| parse_datetime(value.trim().as_bytes()))
        })
}

fn sender(mail: &ParsedMail) -> String {
    let header = match mail.headers.get_first_header("From") {
        Some(header) => header,
        None => return String::new(),
    };
    let first = mailparse::addrparse_header(header)
        .ok()
        .and_then(|list| list.iter().next().cloned());
    match first {
        Some(MailAddr::Single(info)) => info.display_name.unwrap_or(info.addr),
        Some(MailAddr::Group(group)) => group.group_name,
        None => header.get_value().trim().to_string(),
    }
}

fn text_part(mail: &ParsedMail, mimetype: &str) -> Result<Option<String>> {
    if mail.subparts.is_empty() {
        if mail.ctype.mimetype.eq_ignore_ascii_case(mimetype) {
            return Ok(Some(mail.get_body()?));
        }
        return Ok(None);
    }
    for part in &mail.subparts {
        if let Some(text) = text_part(part, mimetype)? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

fn body(mail: &ParsedMail) -> Result<String> {
    if let Some(text) = text_part(mail, "text/plain")? {
        return Ok(text);
    }
    match text_part(mail, "text/html")? {
        Some(html) => Ok(html2text::from_read(html.as_bytes(), 80)?),
        None => Ok(String::new()),
    }
}

pub fn parse_message(mail: &ParsedMail, utc: bool) -> Result<MessageRecord> {
    let received = received_time(mail).ok_or_else(|| anyhow!("no usable date"))?;
    let received_time: NaiveDateTime = if utc {
        received.naive_utc()
    } else {
        received.with_timezone(&Local).naive_local()
    };
    Ok(MessageRecord {
        subject: mail.headers.get_first_value("Subject").unwrap_or_default(),
        sender: sender(mail),
        received_time,
        body: body(mail)?,
    })
}
