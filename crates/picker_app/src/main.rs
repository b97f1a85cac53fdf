mod console;
mod settings;
mod titles;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use picker_engine::{EventSink, FanoutSink, LogSink, Pipeline, PipelineOptions};
use picker_logging::{picker_error, picker_info, LogDestination};

use crate::console::{summary_line, ConsoleSink};

/// Match title lists against crawled source pages and download the best link per title.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Run configuration (RON)
    #[arg(long, default_value = "picker.ron")]
    config: PathBuf,

    /// Directory of `*.txt` title lists, one title per line
    #[arg(long)]
    lists: PathBuf,

    /// Destination root; each list downloads into a subfolder named after it
    #[arg(long)]
    dest: PathBuf,

    /// Maximum concurrent downloads (overrides the config file)
    #[arg(long)]
    throttle: Option<usize>,

    /// Accept beta, demo, proto and revision builds
    #[arg(long)]
    allow_prerelease: bool,

    /// Plan only; nothing is downloaded
    #[arg(long)]
    dry_run: bool,

    /// Durable log file
    #[arg(long, default_value = "picker.log")]
    log_file: PathBuf,

    /// Also log to the terminal, at debug level
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (destination, level) = if args.verbose {
        (LogDestination::Both, LevelFilter::Debug)
    } else {
        (LogDestination::File, LevelFilter::Info)
    };
    picker_logging::initialize(destination, &args.log_file, level);

    let result = run(&args);
    if let Err(err) = &result {
        picker_error!("run stopped: {err:#}");
    }
    result
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = settings::load(&args.config)?;
    if let Some(throttle) = args.throttle {
        config.throttle = throttle;
    }
    config.allow_prerelease |= args.allow_prerelease;
    config.validate()?;
    picker_info!(
        "language {} english={} japanese={} prerelease={} throttle={}",
        config.main_language,
        config.allow_english,
        config.allow_japanese,
        config.allow_prerelease,
        config.throttle
    );

    let lists = titles::load_dir(&args.lists)?;

    let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(LogSink), Arc::new(ConsoleSink)];
    let sink: Arc<dyn EventSink> = Arc::new(FanoutSink::new(sinks));
    let options = PipelineOptions {
        dry_run: args.dry_run,
        ..PipelineOptions::default()
    };
    let pipeline = Pipeline::new(Arc::new(config), sink, options);

    let runtime = tokio::runtime::Runtime::new().context("could not start async runtime")?;
    let summaries = runtime.block_on(pipeline.run(&lists, &args.dest))?;

    for summary in &summaries {
        let line = summary_line(summary, args.dry_run);
        picker_info!("{line}");
        println!("{line}");
    }
    Ok(())
}
