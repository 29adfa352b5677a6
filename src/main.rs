use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tagscan::aws::SdkConnector;
use tagscan::config::Config;
use tagscan::progress::{LogObserver, ProgressObserver, Spinner};
use tagscan::report::{self, LocalReport, ReportFormat};
use tagscan::resource::Aggregator;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Inventory tagged AWS resources across regions into a CSV report
#[derive(Parser, Debug)]
#[command(name = "tagscan", version, about, long_about = None)]
struct Args {
    /// File name to report to ("-" for stdout)
    #[arg(long, default_value = "report.csv")]
    file: PathBuf,

    /// Report layout
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Region to scan (repeatable); defaults to the config file or built-in list
    #[arg(short, long = "region")]
    regions: Vec<String>,

    /// Named AWS profile
    #[arg(long)]
    profile: Option<String>,

    /// GetResources page size
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=100))]
    page_size: Option<i32>,

    /// Log progress instead of drawing a spinner
    #[arg(short, long)]
    quiet: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Log to a file under the config directory; `RUST_LOG` refines the level
fn init_file_logging(level: LogLevel) -> Option<WorkerGuard> {
    let default = LevelFilter::from(level);
    if default == LevelFilter::OFF {
        return None;
    }

    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Failed to open log file {}: {}", log_path.display(), err);
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_line_number(true)
        .init();

    tracing::info!("tagscan {} logging to {}", tagscan::VERSION, log_path.display());
    Some(guard)
}

fn log_file_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("tagscan"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".tagscan")))
        .unwrap_or_default()
        .join("tagscan.log")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = init_file_logging(args.log_level);

    let config = Config::load();
    let regions = config.effective_regions(&args.regions)?;
    let format = config.effective_format(args.format);

    let connector = SdkConnector::new(config.effective_profile(args.profile.clone()));
    let aggregator = Aggregator::new(Arc::new(connector))
        .with_page_size(config.effective_page_size(args.page_size))
        .with_throttle(config.throttle())
        .with_tick_interval(config.tick_interval());

    let observer: Box<dyn ProgressObserver> = if args.quiet {
        Box::new(LogObserver)
    } else {
        Box::new(Spinner::new())
    };

    let inventory = aggregator.run(&regions, observer.as_ref()).await;

    let status = report::finish(
        &inventory,
        &LocalReport::new(&args.file),
        format,
        std::io::stderr(),
    )?;
    Ok(status.into())
}
