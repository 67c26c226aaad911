//! Command line driver behind the `spread` binary.
//!
//! ```text
//! spread [OPTIONS] [ROUNDS] [BOARD_SIZE] [CLUSTERS]
//! ```
//!
//! Builds a square board, runs `ROUNDS` advances and prints a one-screen summary. With
//! `--output-dir` the per-round counts are also written to `<output-dir>/counts.csv`.
use std::error::Error;
#[cfg(feature = "progress_bar")]
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgAction, Args, Parser};
use humantime::format_duration;

use crate::engine::EpidemicGrid;
use crate::error::SpreadError;
use crate::log::{info, set_log_level, set_module_filters, trace, LevelFilter};
use crate::parameters::Parameters;
use crate::report::{CountsReport, ReportOptions};

/// Options shared by every run.
#[derive(Args, Debug, Clone, Default)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path to a JSON parameter file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Optional directory for the `counts.csv` report
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Log level, either global (`info`) or per module (`spread=info,spread::engine=trace`)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// A probabilistic cellular automaton for disease spread on a square population grid
#[derive(Parser, Debug, Clone)]
#[command(name = "spread", version)]
pub struct SpreadArgs {
    /// Number of rounds to simulate
    #[arg(default_value_t = 60)]
    pub rounds: usize,

    /// Side of the square board
    #[arg(default_value_t = 30)]
    pub board_size: usize,

    /// Number of seed infections [default: 3, or `cluster_count` from --config]
    pub clusters: Option<usize>,

    #[command(flatten)]
    pub base: BaseArgs,
}

impl Default for SpreadArgs {
    fn default() -> Self {
        SpreadArgs {
            rounds: 60,
            board_size: 30,
            clusters: None,
            base: BaseArgs::default(),
        }
    }
}

/// Splits a `--log-level` value into an optional global level and per-module filters.
///
/// # Errors
/// Returns `SpreadError::InvalidConfiguration` for an unknown level or an empty module name.
pub fn parse_log_level(
    directives: &str,
) -> Result<(Option<LevelFilter>, Vec<(String, LevelFilter)>), SpreadError> {
    let parse_level = |level: &str| {
        level.trim().parse::<LevelFilter>().map_err(|_| {
            SpreadError::InvalidConfiguration(format!("unknown log level `{}`", level.trim()))
        })
    };

    let mut global = None;
    let mut filters = Vec::new();
    for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match directive.split_once('=') {
            Some((module, level)) => {
                let module = module.trim();
                if module.is_empty() {
                    return Err(SpreadError::InvalidConfiguration(format!(
                        "missing module name in log directive `{directive}`"
                    )));
                }
                filters.push((module.to_string(), parse_level(level)?));
            }
            None => global = Some(parse_level(directive)?),
        }
    }
    Ok((global, filters))
}

fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_logging(args: &BaseArgs) -> Result<(), SpreadError> {
    let (global, filters) = match &args.log_level {
        Some(directives) => parse_log_level(directives)?,
        None => (None, Vec::new()),
    };
    let level = global.unwrap_or_else(|| verbosity_level(args.verbose));
    if level != LevelFilter::Off || !filters.is_empty() {
        set_log_level(level);
        set_module_filters(filters.as_slice());
    }
    Ok(())
}

fn load_parameters(args: &SpreadArgs) -> Result<Parameters, SpreadError> {
    let mut parameters = match &args.base.config {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            Parameters::from_json_file(path)?
        }
        None => Parameters::default(),
    };
    if let Some(clusters) = args.clusters {
        parameters.cluster_count = clusters;
    }
    Ok(parameters)
}

/// The bar shares stdout with the summary, so it is only drawn on a terminal and for a run
/// that has rounds to count.
#[cfg(feature = "progress_bar")]
fn should_draw_progress(args: &SpreadArgs, stdout_is_terminal: bool) -> bool {
    !args.base.no_progress && args.rounds > 0 && stdout_is_terminal
}

fn open_report(args: &BaseArgs) -> Result<Option<CountsReport>, SpreadError> {
    let Some(output_dir) = &args.output_dir else {
        return Ok(None);
    };
    let mut options = ReportOptions::default();
    options.directory(output_dir.clone()).overwrite(true);
    CountsReport::create(&options, "counts").map(Some)
}

/// Runs the simulation described by `args` and returns the finished engine.
///
/// # Errors
/// Returns an error if the log level, the parameter file or the board size is invalid, or if
/// the report cannot be written.
pub fn run_simulation(args: &SpreadArgs) -> Result<EpidemicGrid, SpreadError> {
    configure_logging(&args.base)?;
    let parameters = load_parameters(args)?;
    let mut grid = EpidemicGrid::with_parameters(
        args.board_size,
        args.board_size,
        parameters,
        args.base.random_seed,
    )?;

    let mut report = open_report(&args.base)?;
    if let Some(report) = report.as_mut() {
        report.send(0, grid.counts())?;
    }

    #[cfg(feature = "progress_bar")]
    let show_progress = should_draw_progress(args, std::io::stdout().is_terminal());
    #[cfg(feature = "progress_bar")]
    if show_progress {
        crate::progress::init_rounds_progress_bar(args.rounds);
    }

    let start = Instant::now();
    for _ in 0..args.rounds {
        if let Err(e) = grid.advance() {
            #[cfg(feature = "progress_bar")]
            crate::progress::finish_rounds_progress();
            return Err(e);
        }
        if let Some(report) = report.as_mut() {
            report.send(grid.current_round(), grid.counts())?;
        }
        #[cfg(feature = "progress_bar")]
        if show_progress {
            crate::progress::update_rounds_progress(grid.current_round(), grid.sick_count());
        }
    }
    let elapsed = start.elapsed();

    info!(
        "simulated {} rounds on a {}x{} board in {}",
        args.rounds,
        grid.length(),
        grid.width(),
        format_duration(elapsed)
    );
    if let Some(report) = &report {
        trace!("counts written to {}", report.path().display());
    }
    Ok(grid)
}

/// Final state of a run, as printed by the `spread` binary.
#[must_use]
pub fn summary(grid: &EpidemicGrid) -> String {
    format!(
        "round {}, population {}, R0 {:.2}\n\
         sick {}, diagnosed {}, hospitalized {}, quarantined {}, deceased {}",
        grid.current_round(),
        grid.population(),
        grid.r0(),
        grid.sick_count(),
        grid.diagnosed_count(),
        grid.hospitalized_count(),
        grid.quarantined_count(),
        grid.deceased_count(),
    )
}

/// Parses the process arguments, runs the simulation and prints the summary.
///
/// # Errors
/// Returns an error if the simulation fails; argument errors exit the process through clap.
pub fn run_with_args() -> Result<EpidemicGrid, Box<dyn Error>> {
    let args = SpreadArgs::parse();
    let grid = run_simulation(&args)?;
    println!("{}", summary(&grid));
    Ok(grid)
}
