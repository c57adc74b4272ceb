use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "shift-reports")]
#[clap(author, version, about)]
pub struct Args {
    /// Path to the maildir.
    pub maildir: PathBuf,
    /// Maildir++ folder to read instead of the inbox, e.g. `Reports`.
    #[clap(long)]
    pub folder: Option<String>,
    /// The directory messages are read from, which is maildir/.folder if a
    /// folder is given and maildir otherwise.
    #[clap(skip)]
    pub mailbox: PathBuf,
    /// Spreadsheet the reports are collected in.
    #[clap(short, long, default_value = "Shift_Reports.xlsx")]
    pub output: PathBuf,
    /// Configuration file. Defaults to shift-reports/config.toml in the
    /// user configuration directory when that file exists.
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Use the keywords of a named preset.
    #[clap(long, conflicts_with_all = ["keywords", "interactive"])]
    pub preset: Option<String>,
    /// Comma separated subject keywords, e.g. "shift report, handover".
    #[clap(long, conflicts_with = "interactive")]
    pub keywords: Option<String>,
    /// Choose the keywords from a menu before running.
    #[clap(short, long)]
    pub interactive: bool,
    /// Keep quoted header lines (From:, Sent:, ...) in message bodies.
    #[clap(long)]
    pub keep_sections: bool,
    /// Record received times in UTC instead of local time.
    #[clap(long)]
    pub utc: bool,
    /// Suppress any progress output if set.
    #[clap(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        let mut result: Self = Self::parse();
        result.mailbox = match &result.folder {
            Some(folder) => result.maildir.join(format!(".{}", folder)),
            None => result.maildir.clone(),
        };
        result
    }
}
