use clap::{Parser, Subcommand, ValueEnum};
use fern::colors::{Color, ColoredLevelConfig};
use tablp::models::{pizza, transportation};
use tablp::{solve, MicrolpSolver, Solved, TabLpError, Table, Workbook};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tablp")]
#[command(about = "Solve linear programs whose parameters live in workbook sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level written to stderr
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the transportation model and print the shipments
    Transport {
        /// Workbook with cost, capacity and demand sheets
        file: PathBuf,
        /// Also print the generated problem
        #[arg(short, long)]
        problem: bool,
        /// Feasibility tolerance used to check the solver's answer
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
    /// Solve the pizza model and print how many of each pizza to bake
    Pizza {
        /// Workbook with profit, usage and available sheets
        file: PathBuf,
        /// Also print the generated problem
        #[arg(short, long)]
        problem: bool,
        /// Feasibility tolerance used to check the solver's answer
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
    /// Print one sheet of a workbook
    Show {
        file: PathBuf,
        sheet: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn setup_logger(log_level: log::LevelFilter) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .debug(Color::White)
        .info(Color::Green)
        .warn(Color::BrightYellow)
        .error(Color::BrightRed);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} | {:5} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
                colors.color(record.level()),
                message
            ))
        })
        .level(log_level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn run_model<B, S>(
    file: &Path,
    show_problem: bool,
    tolerance: Option<f64>,
    build: B,
    show: S,
) -> Result<(), TabLpError>
where
    B: Fn(&Workbook) -> Result<tablp::AbstractModel, TabLpError>,
    S: Fn(&Solved, &Workbook) -> Result<Table, TabLpError>,
{
    let workbook = Workbook::from_path(file)?;
    let model = build(&workbook)?;
    let solved = solve(&model, &MicrolpSolver::new(tolerance))?;

    if show_problem {
        println!("{}", solved.instance.problem());
    }

    println!("Status: {}", solved.status());
    println!("Objective: {}", solved.objective()?);
    println!();
    print!("{}", show(&solved, &workbook)?);

    Ok(())
}

fn run(cli: Cli) -> Result<(), TabLpError> {
    match cli.command {
        Commands::Transport {
            file,
            problem,
            tolerance,
        } => run_model(
            &file,
            problem,
            tolerance,
            transportation::build,
            transportation::shipments,
        ),

        Commands::Pizza {
            file,
            problem,
            tolerance,
        } => run_model(&file, problem, tolerance, pizza::build, pizza::bake_plan),

        Commands::Show { file, sheet } => {
            let workbook = Workbook::from_path(&file)?;
            print!("{}", workbook.sheet(&sheet)?);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logger(cli.log_level.into()) {
        eprintln!("Error setting up logging: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
