//! TLV CLI Tool
//!
//! Command-line host for TLV timelines: loads record batches, walks the
//! cursor through them and keeps cursor/zoom state between runs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tlv_core::{
    Color, Reposition, SelectionResult, TierKind, TimeRecord, TimelineConfig, TimelineHost,
    TimelineSession,
};
use tlv_store::{JsonFileStore, RecordBatch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tlv")]
#[command(about = "TLV - navigate a three-tier event timeline")]
#[command(version)]
struct Cli {
    /// Log navigation decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run navigation steps over a record batch
    Navigate {
        /// Record batch file (JSON); the built-in demo set is used if omitted
        #[arg(short, long)]
        records: Option<PathBuf>,

        /// Session params file
        #[arg(long, default_value = "timeline_params.json")]
        state: PathBuf,

        /// Timeline configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reposition instantly instead of animating
        #[arg(long)]
        instant: bool,

        /// Steps: last, prev, next, zoom-in, zoom-out, tap=<msec>
        steps: Vec<Step>,
    },

    /// Show a summary of a record batch
    Info {
        /// Record batch file (JSON)
        records: PathBuf,
    },

    /// Write the built-in demo record batch to a file
    Demo {
        /// Output batch file path
        #[arg(short, long)]
        output: PathBuf,

        /// Reference "now" in epoch milliseconds (defaults to the current time)
        #[arg(long)]
        now: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Last,
    Prev,
    Next,
    ZoomIn,
    ZoomOut,
    Tap(i64),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last" => Ok(Step::Last),
            "prev" => Ok(Step::Prev),
            "next" => Ok(Step::Next),
            "zoom-in" => Ok(Step::ZoomIn),
            "zoom-out" => Ok(Step::ZoomOut),
            _ => match s.strip_prefix("tap=") {
                Some(ms) => ms
                    .parse()
                    .map(Step::Tap)
                    .map_err(|e| format!("invalid tap time '{ms}': {e}")),
                None => Err(format!("unknown step '{s}'")),
            },
        }
    }
}

/// Host that prints every notification
struct PrintHost {
    animation_msec: u64,
}

impl PrintHost {
    fn motion(&self, reposition: Reposition) -> String {
        match reposition {
            Reposition::Instant => "instant".to_string(),
            Reposition::Animated => format!("animated {} ms", self.animation_msec),
        }
    }
}

impl TimelineHost<Value> for PrintHost {
    fn on_selected(
        &mut self,
        timestamp_msec: i64,
        record: Option<&TimeRecord<Value>>,
        reposition: Reposition,
    ) {
        match record {
            Some(record) => println!(
                "  cursor -> {} ({}) on {} payload={}",
                timestamp_msec,
                self.motion(reposition),
                record,
                record.payload()
            ),
            None => println!("  cursor -> {} ({})", timestamp_msec, self.motion(reposition)),
        }
    }

    fn on_request_more_data(&mut self, tier: TierKind) {
        println!("  host asked for older {} records", tier);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Navigate {
            records,
            state,
            config,
            instant,
            steps,
        } => navigate(records, state, config, instant, steps)?,

        Commands::Info { records } => {
            let batch = RecordBatch::<Value>::open(&records).context("Failed to read record batch")?;
            print_info(&batch);
        }

        Commands::Demo { output, now } => {
            let now = now.unwrap_or_else(now_msec);
            let batch = demo_batch(now).context("Failed to build demo records")?;
            batch.save(&output).context("Failed to write record batch")?;
            println!("Wrote {} demo records to {}", batch.len(), output.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn navigate(
    records: Option<PathBuf>,
    state: PathBuf,
    config: Option<PathBuf>,
    instant: bool,
    steps: Vec<Step>,
) -> Result<()> {
    let config = match config {
        Some(path) => tlv_store::load_config(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => TimelineConfig::default(),
    };
    let batch = load_batch(records.as_deref())?;
    let reposition = if instant {
        Reposition::Instant
    } else {
        Reposition::Animated
    };

    println!(
        "Loaded {} major1, {} major2, {} background records",
        batch.major1.len(),
        batch.major2.len(),
        batch.background.len()
    );

    let settle_msec = config.settle_delay_msec();
    let host = PrintHost {
        animation_msec: config.animation_duration_msec,
    };
    let mut session = TimelineSession::new(host, JsonFileStore::new(state), config);
    let (major1, major2, background) = batch.into_tiers();

    println!("start:");
    report(session.start(major1, major2, background), "no events to show");

    for step in steps {
        println!("{}:", step_name(step));
        match step {
            Step::Last => report(session.goto_last(reposition), "no events to show"),
            Step::Prev => report(session.goto_prev(reposition), "no previous record"),
            Step::Next => report(session.goto_next(reposition), "no next record"),
            Step::Tap(ts) => report(session.select_at(ts, reposition), "nothing selected"),
            Step::ZoomIn => {
                let zoom = session.zoom_in();
                println!(
                    "  zoom {:?} (narrowest: {}, settles after {} ms)",
                    zoom,
                    zoom.is_min(),
                    settle_msec
                );
            }
            Step::ZoomOut => {
                let zoom = session.zoom_out();
                println!(
                    "  zoom {:?} (widest: {}, settles after {} ms)",
                    zoom,
                    zoom.is_max(),
                    settle_msec
                );
            }
        }
    }

    let (model, store) = session.finish();
    if let (Some(cursor), Some(viewport)) = (model.cursor_msec(), model.viewport()) {
        println!(
            "Final cursor {} in window [{}, {}] at zoom {:?}",
            cursor,
            viewport.start_msec,
            viewport.end_msec,
            model.zoom()
        );
    }
    println!("Session params file: {}", store.path().display());

    Ok(())
}

fn load_batch(records: Option<&Path>) -> Result<RecordBatch<Value>> {
    match records {
        Some(path) => RecordBatch::open(path)
            .with_context(|| format!("Failed to read record batch {}", path.display())),
        None => demo_batch(now_msec()).context("Failed to build demo records"),
    }
}

fn report(selection: SelectionResult<Value>, empty: &str) {
    if selection.is_none() {
        println!("  {}", empty);
    }
}

fn step_name(step: Step) -> String {
    match step {
        Step::Last => "last".to_string(),
        Step::Prev => "prev".to_string(),
        Step::Next => "next".to_string(),
        Step::ZoomIn => "zoom-in".to_string(),
        Step::ZoomOut => "zoom-out".to_string(),
        Step::Tap(ts) => format!("tap={}", ts),
    }
}

fn now_msec() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Demo records relative to `now`: a day of motion events, a few
/// secondary events and the recording segments behind them
fn demo_batch(now: i64) -> Result<RecordBatch<Value>> {
    if now < 500_000_000 {
        bail!("reference time {} is too early for the demo set", now);
    }
    let event = |ago: i64, duration: i64, kind: &str| {
        TimeRecord::new(now - ago, duration, json!({ "kind": kind }))
    };

    Ok(RecordBatch {
        major1: vec![
            event(1_000, 0, "motion")?,
            event(2_000, 0, "motion")?,
            event(5_000, 1_000, "motion")?,
            event(30_000, 20_000, "motion")?,
            event(300_000, 20_000, "motion")?,
            event(1_800_000, 100_000, "motion")?,
            event(3_600_000, 70_000, "motion")?,
            event(360_000_000, 150_000, "motion")?,
            event(500_000_000, 1_500_000, "motion")?,
        ],
        major2: vec![
            event(500, 2_000, "doorbell")?,
            event(5_200, 500, "doorbell")?,
            TimeRecord::with_color(now - 6_000, 1_000, json!({ "kind": "alarm" }), Color::YELLOW)?,
        ],
        background: vec![
            event(50_000, 20_000, "recording")?,
            event(500_000, 500_000, "recording")?,
            event(1_000_000, 250_000, "recording")?,
            event(2_500_000, 1_000_000, "recording")?,
        ],
    })
}

fn print_info(batch: &RecordBatch<Value>) {
    println!("\n=== Record Batch ===");
    for kind in [TierKind::Major1, TierKind::Major2, TierKind::Background] {
        let records = batch.tier(kind);
        println!("{}: {} records", kind, records.len());
        for (i, record) in records.iter().take(10).enumerate() {
            let color = record
                .color()
                .map(|c| format!(" color=#{:08X}", c.0))
                .unwrap_or_default();
            println!(
                "  [{}] {} ms for {} ms{}",
                i,
                record.timestamp_msec(),
                record.duration_msec(),
                color
            );
        }
        if records.len() > 10 {
            println!("  ... and {} more records", records.len() - 10);
        }
    }
}
