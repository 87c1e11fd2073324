use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_planner::cache::{CacheConfig, GraphCache, LoadError};
use transit_planner::domain::{ServiceTime, TransitTime};
use transit_planner::feed::{FeedError, load_feed_dir};
use transit_planner::graph::{GraphBuilder, ModeFilter};
use transit_planner::planner::{NextDepartureScanner, ScanConfig, StrategyPipeline, TimedPlanner};
use transit_planner::report::ItineraryReport;
use transit_planner::resolver::{DirectionAwareResolver, ResolveError, StopIndex};

/// Start time used when `--time` cannot be parsed.
const FALLBACK_TIME: &str = "12:00:00";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Rail,
    RailAndBus,
}

impl From<Mode> for ModeFilter {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rail => ModeFilter::RailOnly,
            Mode::RailAndBus => ModeFilter::RailAndBus,
        }
    }
}

/// Plan a journey through a timetable feed.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the feed's CSV tables
    #[arg(long, env = "TRANSIT_FEED_DIR")]
    feed: PathBuf,

    /// Service date, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,

    #[arg(long, value_enum, default_value_t = Mode::Rail)]
    mode: Mode,

    /// Start place name
    #[arg(long)]
    from: String,

    /// Destination place name
    #[arg(long)]
    to: String,

    /// Earliest departure, HH:MM or HH:MM:SS
    #[arg(long, default_value = FALLBACK_TIME)]
    time: String,

    /// Graph snapshot to reuse, written after a fresh build
    #[arg(long, env = "TRANSIT_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Search for connectivity only, ignoring the clock
    #[arg(long)]
    topological: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("invalid fallback time")]
    FallbackTime,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let start = start_time(&args.time, args.date)?;
    let feed = load_feed_dir(&args.feed)?;
    let builder = GraphBuilder::new(args.date, args.mode.into());
    let cache = GraphCache::new(&CacheConfig::default());
    let graph = cache.load_or_build(&feed, &builder, args.snapshot.as_deref())?;

    let pipeline = if args.topological {
        StrategyPipeline::topological()
    } else {
        StrategyPipeline::timed()
    };
    let resolver = DirectionAwareResolver::new(StopIndex::from_feed(&feed)).with_pipeline(pipeline);

    let mut resolution = resolver.resolve(&graph, &args.from, &args.to, start)?;

    if resolution.is_none() && !args.topological {
        info!("no route at the requested time, scanning later departures");
        let scanner = NextDepartureScanner::new(TimedPlanner::default(), ScanConfig::default());
        let resolver = DirectionAwareResolver::new(StopIndex::from_feed(&feed))
            .with_pipeline(StrategyPipeline::new(vec![Box::new(scanner)]));
        resolution = resolver.resolve(&graph, &args.from, &args.to, start)?;
    }

    match resolution {
        Some(resolution) => {
            info!(
                start = %resolution.start,
                end = %resolution.end,
                pairing = %resolution.pairing,
                strategy = %resolution.strategy,
                "route found"
            );
            print!("{}", ItineraryReport::new(&resolution.itinerary, &graph));
        }
        None => println!("No route found."),
    }
    Ok(())
}

fn start_time(time: &str, date: NaiveDate) -> Result<TransitTime, CliError> {
    let time = match ServiceTime::parse_clock(time) {
        Ok(time) => time,
        Err(e) => {
            warn!(input = time, error = %e, fallback = FALLBACK_TIME, "invalid start time");
            ServiceTime::parse(FALLBACK_TIME).map_err(|_| CliError::FallbackTime)?
        }
    };
    Ok(time.on(date))
}
