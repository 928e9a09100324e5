pub mod dates;
pub mod interactive;
pub mod output;

use std::{
    fmt::Display,
    io::IsTerminal,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use dates::{DateArgs, MonthArgs};
use interactive::run_interactive;
use output::{
    report::{render_month_list, render_report},
    Palette,
};
use tokio::io::BufReader;
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    tracker::{
        config::{Preset, TrackerConfig, WeekdaySet},
        entities::Status,
        store::JsonFileStore,
        InitOutcome, RemoveOutcome, Tracker,
    },
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Extended,
    Classic,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Extended => Self::Extended,
            PresetArg::Classic => Self::Classic,
        }
    }
}

impl Display for PresetArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetArg::Extended => write!(f, "extended"),
            PresetArg::Classic => write!(f, "classic"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "habit-track", version, long_about = None)]
#[command(about = "Track your habits day by day", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[command(flatten)]
    config: ConfigArgs,
    #[arg(long, global = true, help = "Echo logs to the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level. Falls back to RUST_LOG")]
    log_filter: Option<LevelFilter>,
}

#[derive(Debug, clap::Args)]
struct ConfigArgs {
    #[arg(long, global = true, default_value_t = PresetArg::Extended, help = "Extended adds 'break' and a stricter completion metric. Each preset uses its own store file")]
    preset: PresetArg,
    #[arg(
        long,
        global = true,
        env = "HABIT_TRACK_FILE",
        help = "Store file. By default it's kept in $XDG_STATE_HOME/habit-track or $HOME/.local/state/habit-track"
    )]
    file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Tracked weekdays, for example mon,tue,wed or 0,1,2 where 0 is Monday. Defaults to Monday to Saturday"
    )]
    weekdays: Option<WeekdaySet>,
    #[arg(long = "one-set", global = true, help = "Allow setting a day only once")]
    one_set: bool,
    #[arg(long = "allow-none", global = true, help = "Allow resetting a day back to 'none'")]
    allow_none: bool,
    #[arg(long = "no-color", global = true, help = "Disable colored output")]
    no_color: bool,
}

impl ConfigArgs {
    fn into_tracker_config(self, app_dir: &Path) -> TrackerConfig {
        let mut config = TrackerConfig::from_preset(self.preset.into(), app_dir);
        if let Some(file) = self.file {
            config.store_path = file;
        }
        if let Some(weekdays) = self.weekdays {
            config.tracked_weekdays = weekdays;
        }
        config.one_set_per_day = self.one_set;
        config.allow_none_write = self.allow_none;
        config
    }
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show the report of a month")]
    Show {
        #[command(flatten)]
        date: DateArgs,
    },
    #[command(about = "Set the value of today, or of --day")]
    Set {
        #[arg(help = "One of the allowed values, for example yes, no, sick, cancel, break")]
        value: String,
        #[command(flatten)]
        date: DateArgs,
    },
    #[command(about = "Create the record of a month if it doesn't exist yet")]
    Init {
        #[command(flatten)]
        month: MonthArgs,
    },
    #[command(about = "Sort the store by year and month")]
    Sort {},
    #[command(about = "Remove the record of a month")]
    Remove {
        #[command(flatten)]
        month: MonthArgs,
    },
    #[command(about = "List stored months with their completion")]
    List {},
    #[command(about = "Run an interactive prompt")]
    Interactive {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), args.log_filter, args.log)?;

    let palette = Palette::new(!args.config.no_color && std::io::stdout().is_terminal());
    let config = args.config.into_tracker_config(&app_dir);
    debug!("Using store {:?}", config.store_path);

    let store = JsonFileStore::new(config.store_path.clone());
    let tracker = Tracker::new(store, config, Box::new(DefaultClock));

    process_command(args.commands, &tracker, palette).await
}

async fn process_command(
    command: Commands,
    tracker: &Tracker<JsonFileStore>,
    palette: Palette,
) -> Result<()> {
    let today = tracker.today();
    let file = tracker.config().store_path.display();

    match command {
        Commands::Show { date } => {
            let (month, reference) = date.resolve(today)?;
            let report = tracker.month_report(month, reference).await?;
            print!("{}", render_report(&report, palette));
        }
        Commands::Set { value, date } => {
            let (month, reference) = date.resolve(today)?;
            let day = reference.map(|d| d.day());
            let value = Status::from(value);
            tracker.set_day(month, day, value.clone()).await?;
            println!("Set {} for {month}", palette.status(&value));
        }
        Commands::Init { month } => {
            let month = month.resolve(today)?;
            match tracker.init_month(month).await? {
                InitOutcome::Created { tracked_days } => {
                    println!("Added data for {month} to '{file}' with {tracked_days} tracked days.")
                }
                InitOutcome::AlreadyExists => {
                    println!("Data for {month} already exists. No changes made.")
                }
            }
        }
        Commands::Sort {} => {
            tracker.sort().await?;
            println!("Sorted '{file}' by month and year.");
        }
        Commands::Remove { month } => {
            let month = month.resolve(today)?;
            match tracker.remove_month(month).await? {
                RemoveOutcome::Removed => println!("Removed month {month} from '{file}'."),
                RemoveOutcome::NotFound => println!("⚠️ {month} not found in '{file}'."),
            }
        }
        Commands::List {} => {
            let months = tracker.list_months().await?;
            print!("{}", render_month_list(&months, palette));
        }
        Commands::Interactive {} => {
            let mut input = BufReader::new(tokio::io::stdin());
            let mut output = tokio::io::stdout();
            run_interactive(tracker, &mut input, &mut output, palette).await?;
        }
    }
    Ok(())
}
