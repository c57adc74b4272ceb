mod args;
mod clean;
mod config;
mod datetime;
mod dedup;
mod filter;
mod format;
mod maildir;
mod pipeline;
mod prompt;
mod sheet;
mod source;
mod table;
mod utils;

use anyhow::{Context, Result};
use args::Args;
use clean::Cleaner;
use filter::Selection;
use maildir::MaildirSource;
use pipeline::Pipeline;
use source::MessageSource;
use std::io;
use std::process;

fn main() {
    let args = Args::parse_args();
    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = do_main(&args) {
        log::error!("{:#}", e);
        process::exit(1);
    }
}

fn selection(args: &Args, config: &config::Config) -> Result<Selection> {
    if args.interactive {
        let stdin = io::stdin();
        return prompt::choose_selection(&config.presets, stdin.lock(), io::stdout());
    }
    Ok(match (&args.preset, &args.keywords) {
        (Some(name), _) => Selection::Preset(name.clone()),
        (None, Some(keywords)) => Selection::Custom(keywords.clone()),
        (None, None) => Selection::Default,
    })
}

fn do_main(args: &Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    if args.keep_sections {
        config.cleaner.strip_sections = false;
    }
    let filter = selection(args, &config)?.resolve(&config)?;
    log::info!("Filtering subjects by: {}", filter);
    let cleaner = Cleaner::new(&config.cleaner);

    let source = MaildirSource::new(&args.mailbox, args.utc);
    let messages = source
        .messages()
        .with_context(|| format!("cannot access mailbox {}", args.mailbox.display()))?;
    let mut table = sheet::load(&args.output)?;

    let progress = utils::create_progress_bar(args, messages.size_hint().0);
    let pipeline = Pipeline {
        filter: &filter,
        cleaner: &cleaner,
    };
    let summary = pipeline.run(messages, &mut table, &progress);
    progress.finish_and_clear();
    log::info!("{}", summary);

    sheet::save(&table, &args.output)?;
    log::info!("Sheet updated: {} ({} rows)", args.output.display(), table.len());
    Ok(())
}
