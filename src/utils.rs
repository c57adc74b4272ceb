use crate::args::Args;
use indicatif::{ProgressBar, ProgressStyle};

pub fn create_progress_bar(args: &Args, len: usize) -> ProgressBar {
    if args.quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}") {
        progress.set_style(style);
    }
    progress
}
