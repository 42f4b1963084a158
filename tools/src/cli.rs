//! # Pipeline Driver Shared by the Binaries
//!
//! Reads an instance, writes its data file, runs `glpsol` and prints the
//! objective summary followed by the decoded plan. Every failure category maps
//! to its own process exit code, see [`Failure::exit_code`].

use std::{
    fs,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::Context;
use busplan::{
    instances::{
        fio::{self, report, report::SolutionReport},
        Instance,
    },
    solvers::{self, Glpsol, Solve},
    types::{Plan, Summary},
};
use clap::{CommandFactory, FromArgMatches, Parser};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The instance input file
    pub in_path: PathBuf,
    /// The path to write the MathProg data file to
    pub dat_path: PathBuf,
    /// The MathProg model file
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// The glpsol executable, looked up in PATH if not a path
    #[arg(long, default_value = "glpsol")]
    pub glpsol: PathBuf,
    /// An additional argument passed to glpsol, can be repeated
    #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub solver_args: Vec<String>,
    /// Kill glpsol if it runs for longer than this
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl Args {
    /// Parses the process arguments, showing the default model of `I` in the
    /// help text
    ///
    /// # Errors
    ///
    /// If the arguments are invalid or help or version information was
    /// requested
    pub fn parse_for<I: Instance>(about: &'static str) -> Result<Self, clap::Error> {
        let matches = Args::command()
            .about(about)
            .mut_arg("model", |arg| arg.default_value(I::MODEL_FILE))
            .try_get_matches()?;
        Args::from_arg_matches(&matches)
    }
}

/// Reasons for a run to fail
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("{0}")]
    Usage(clap::Error),
    #[error("input file `{}` does not exist", .0.display())]
    MissingInput(PathBuf),
    #[error("failed to access `{}`: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("model file `{}` does not exist", .0.display())]
    MissingModel(PathBuf),
    #[error("invalid input file `{}`: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: fio::Error,
    },
    #[error(transparent)]
    Solver(#[from] solvers::Error),
    #[error("no optimal value found: {0}")]
    NoOptimum(String),
    #[error("{0:#}")]
    Output(anyhow::Error),
}

impl Failure {
    /// The process exit code for the failure
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Failure::Usage(_) => 1,
            Failure::MissingInput(_) | Failure::Access { .. } | Failure::Output(_) => 2,
            Failure::MissingModel(_) => 3,
            Failure::Format { .. } => 4,
            Failure::Solver(solvers::Error::NotFound(_)) => 5,
            Failure::Solver(_) => 6,
            Failure::NoOptimum(_) => 7,
        }
    }

    /// Prints the failure to `stderr`
    pub fn report(&self) {
        match self {
            Failure::Usage(err) => {
                if let Err(err) = err.print() {
                    log::error!("failed to print usage: {err}");
                }
            }
            Failure::Solver(err) => {
                eprintln!("Error: {err}");
                if let Some(output) = err.output().filter(|output| !output.is_empty()) {
                    eprintln!("{output}");
                }
            }
            _ => eprintln!("Error: {self}"),
        }
    }
}

/// The result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<P> {
    pub summary: Summary,
    pub plan: P,
    /// Troubleshooting information when the report holds no selected decision
    pub diagnostic: Option<String>,
}

impl<P: Plan> Outcome<P> {
    /// Writes the summary line and the plan
    ///
    /// # Errors
    ///
    /// If writing fails
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.summary)?;
        write!(writer, "{}", self.plan)?;
        writer.flush()
    }
}

/// Runs the pipeline for instances of type `I`
///
/// # Errors
///
/// If any stage fails, nothing is printed in that case
pub fn run<I: Instance>(args: &Args) -> Result<Outcome<I::Plan>, Failure> {
    if !args.in_path.exists() {
        return Err(Failure::MissingInput(args.in_path.clone()));
    }
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(I::MODEL_FILE));
    if !model.exists() {
        return Err(Failure::MissingModel(model));
    }

    let inst: I = read_instance(&args.in_path)?;
    write_data(&inst, &args.dat_path)?;

    let solver = Glpsol::new(&args.glpsol)
        .args(&args.solver_args)
        .timeout(args.timeout.map(Duration::from_secs));
    log::info!("solving with {}", solver.signature());
    let text = solver.solve(&model, &args.dat_path)?;

    let report = SolutionReport::parse(&text, I::VARIABLES);
    if I::REQUIRES_STATUS {
        match &report.status {
            None => {
                return Err(Failure::NoOptimum(String::from(
                    "the report has no status line",
                )))
            }
            Some(status) if !status.is_optimal() => {
                return Err(Failure::NoOptimum(format!("the solver status is {status}")))
            }
            Some(_) => (),
        }
    }
    let Some(objective) = report.objective else {
        return Err(Failure::NoOptimum(String::from(
            "the report has no objective value",
        )));
    };

    let plan = I::Plan::from_records(report.selected());
    let diagnostic = plan.is_empty().then(|| diagnostic(&text));
    Ok(Outcome {
        summary: Summary {
            objective,
            n_vars: inst.n_vars(),
            n_constrs: inst.n_constrs(),
        },
        plan,
        diagnostic,
    })
}

/// Entry point of the binaries, runs the pipeline for instances of type `I`
#[must_use]
pub fn main<I: Instance>(about: &'static str) -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = match Args::parse_for::<I>(about) {
        Ok(args) => args,
        // help and version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return fail(&Failure::Usage(err)),
    };
    let outcome = match run::<I>(&args) {
        Ok(outcome) => outcome,
        Err(failure) => return fail(&failure),
    };
    if let Err(err) = outcome
        .write(&mut io::stdout().lock())
        .context("failed to write the results")
    {
        return fail(&Failure::Output(err));
    }
    if let Some(diagnostic) = &outcome.diagnostic {
        eprintln!("{diagnostic}");
    }
    ExitCode::SUCCESS
}

fn fail(failure: &Failure) -> ExitCode {
    log::debug!("{failure:?}");
    failure.report();
    ExitCode::from(failure.exit_code())
}

fn read_instance<I: Instance>(path: &Path) -> Result<I, Failure> {
    let access = |source| Failure::Access {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(fs::File::open(path).map_err(access)?);
    let lines = fio::read_lines(reader).map_err(access)?;
    I::from_lines(&lines).map_err(|source| Failure::Format {
        path: path.to_path_buf(),
        source,
    })
}

fn write_data<I: Instance>(inst: &I, path: &Path) -> Result<(), Failure> {
    let access = |source| Failure::Access {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(fs::File::create(path).map_err(access)?);
    inst.write_data(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(access)?;
    log::info!("wrote data file {}", path.display());
    Ok(())
}

fn diagnostic(text: &str) -> String {
    match report::columns_excerpt(text) {
        Some(excerpt) => format!(
            "Warning: no selected decision found in the solver report, its column section starts with:\n{excerpt}"
        ),
        None => String::from(
            "Warning: no selected decision found in the solver report and it has no column section",
        ),
    }
}
