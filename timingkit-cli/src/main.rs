use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use timingkit_core::config::CoreConfig;
use timingkit_core::logging::init_tracing;
use timingkit_protocol::prelude::TimingType;

mod commands;
mod output;

use commands::{CliError, Session};

#[derive(Parser)]
#[command(name = "timingkit")]
#[command(about = "Daily timings with per-timing corrections", long_about = None)]
struct Cli {
    /// Preferences file holding the corrections
    #[arg(long, global = true, env = "TIMINGKIT_PREFERENCES")]
    preferences: Option<PathBuf>,
    /// Offset from UTC in minutes that defines calendar days (defaults to local time)
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset: Option<i32>,
    /// How base times are produced
    #[arg(long, global = true, value_enum, default_value_t = MethodArg::Fixed)]
    method: MethodArg,
    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, env = "TIMINGKIT_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// 05:00 / 12:00 / 15:30 / 18:00 / 19:30
    Fixed,
    /// One minute apart, starting a minute after the reference instant
    Interval,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the five timings of a day
    Today {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the active and upcoming timing
    Now(AtArgs),
    /// Show the widget timeline
    Timeline {
        #[command(flatten)]
        at: AtArgs,
        #[arg(short, long, default_value_t = 6)]
        count: usize,
    },
    /// Inspect or edit corrections
    #[command(subcommand)]
    Corrections(CorrectionCommands),
    /// Show version information
    Version,
}

#[derive(Args)]
struct AtArgs {
    /// Reference instant (RFC 3339), defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum CorrectionCommands {
    /// List every correction
    List,
    /// Set the correction of one timing, in minutes
    Set {
        kind: TimingType,
        #[arg(allow_hyphen_values = true)]
        minutes: i32,
    },
    /// Clear every correction
    Reset,
    /// List the selectable corrections for one timing
    Options { kind: TimingType },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env()?;
    if let Some(path) = cli.preferences.clone() {
        config.preferences_path = path;
    }
    if let Some(minutes) = cli.utc_offset {
        config.utc_offset_minutes = Some(minutes);
    }
    init_tracing(cli.log_level.as_deref().or(config.log_level.as_deref()))?;

    if let Commands::Version = cli.command {
        println!("TimingKit v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let reference = match &cli.command {
        Commands::Now(args) | Commands::Timeline { at: args, .. } => args.at,
        _ => None,
    }
    .unwrap_or_else(Utc::now);
    let mut session = Session::open(&config, cli.method, reference)?;

    match cli.command {
        Commands::Today { date } => {
            let date = date.unwrap_or_else(|| session.date_of(reference));
            session.today(date, cli.json)?;
        }
        Commands::Now(_) => session.now(reference, cli.json)?,
        Commands::Timeline { count, .. } => {
            if count == 0 {
                return Err(CliError::Validation("--count must be at least 1".into()).into());
            }
            session.timeline(reference, count, cli.json)?
        }
        Commands::Corrections(CorrectionCommands::List) => session.list_corrections(cli.json)?,
        Commands::Corrections(CorrectionCommands::Set { kind, minutes }) => {
            session.set_correction(kind, minutes, cli.json)?
        }
        Commands::Corrections(CorrectionCommands::Reset) => session.reset_corrections(cli.json)?,
        Commands::Corrections(CorrectionCommands::Options { kind }) => {
            session.correction_options(kind, cli.json)?
        }
        Commands::Version => {}
    }

    Ok(())
}
