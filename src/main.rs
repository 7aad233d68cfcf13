use clap::{Parser, Subcommand, ValueEnum};
use drill::json::{to_json, to_json_pretty};
use drill::logging::{LogFormat, LoggingConfig};
use drill::plan::{PlanDocument, WorkoutPlan};
use drill::platform::{import_workouts, schedule_workouts, RecordingClient};
use drill::DrillError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "drill")]
#[command(version, about = "Compile Drill workout plans to platform workout JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogStyle::Compact)]
    log_format: LogStyle,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the workouts of a plan file to JSON
    /// Examples:
    ///     drill compile plan.yaml
    ///     drill compile plan.yaml --workout tempo --pretty
    ///     drill compile plan.yaml --out build/
    #[command(verbatim_doc_comment)]
    Compile {
        /// Plan file (YAML)
        plan: PathBuf,

        /// Only compile the workout with this name
        #[arg(short, long)]
        workout: Option<String>,

        /// Write one <name>.json per workout into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Dry run of importing and scheduling a plan
    /// Examples:
    ///     drill plan plan.yaml
    ///     drill plan plan.yaml --existing tempo --existing long_run
    #[command(verbatim_doc_comment)]
    Plan {
        /// Plan file (YAML)
        plan: PathBuf,

        /// Pretend these workouts already exist on the platform
        #[arg(short, long)]
        existing: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogStyle {
    Compact,
    Pretty,
}

impl From<LogStyle> for LogFormat {
    fn from(style: LogStyle) -> Self {
        match style {
            LogStyle::Compact => LogFormat::Compact,
            LogStyle::Pretty => LogFormat::Pretty,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = LoggingConfig::new(&cli.log_level, cli.log_format.into()).init() {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Compile { plan, workout, out, pretty } => {
            run_compile(&plan, workout.as_deref(), out.as_deref(), pretty)
        }
        Commands::Plan { plan, existing } => run_plan(&plan, existing),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_compile(
    path: &Path,
    only: Option<&str>,
    out: Option<&Path>,
    pretty: bool,
) -> Result<(), DrillError> {
    let plan = PlanDocument::load(path)?;

    let selected: Vec<&WorkoutPlan> = match only {
        Some(name) => vec![plan
            .workout(name)
            .ok_or_else(|| DrillError::Plan(format!("no workout named '{}'", name)))?],
        None => plan.workouts.iter().collect(),
    };

    if let Some(dir) = out {
        fs::create_dir_all(dir).map_err(|e| {
            DrillError::Plan(format!("cannot create '{}': {}", dir.display(), e))
        })?;
    }

    for workout in selected {
        let model = workout.compile()?;
        let json = if pretty { to_json_pretty(&model)? } else { to_json(&model)? };

        match out {
            Some(dir) => {
                let file = dir.join(format!("{}.json", workout.name));
                fs::write(&file, &json).map_err(|e| {
                    DrillError::Plan(format!("cannot write '{}': {}", file.display(), e))
                })?;
                eprintln!("Wrote {} to {}", workout.name, file.display());
            }
            None => println!("{}", json),
        }
    }
    Ok(())
}

fn run_plan(path: &Path, existing: Vec<String>) -> Result<(), DrillError> {
    let plan = PlanDocument::load(path)?;
    let mut client = RecordingClient::with_workouts(existing);

    import_workouts(&plan.workouts, plan.settings.delete_same_name_workout, &mut client)?;

    let scheduled = match &plan.schedule {
        Some(schedule) => schedule_workouts(&schedule.start_from, &schedule.workouts, &mut client)?,
        None => Vec::new(),
    };

    for operation in client.operations() {
        println!("{}", operation);
    }
    if !scheduled.is_empty() {
        println!();
        for (name, date) in &scheduled {
            println!("{}  {}", date, name);
        }
    }
    Ok(())
}
