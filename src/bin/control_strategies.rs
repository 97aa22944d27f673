use biodivine_control_strategies::ControlError;
use biodivine_control_strategies::intervention::asp::ClingoSolver;
use biodivine_control_strategies::intervention::{
    ControlProblem, ControlStrategy, ControlType, ExhaustiveSolver, ForcingRule, InterventionType,
};
use biodivine_control_strategies::network::PrimeNetwork;
use biodivine_control_strategies::report::{Intervention, summarize};
use biodivine_control_strategies::search::{
    SearchConfig, search_percolation_only, search_via_trap_spaces,
};
use biodivine_control_strategies::subspace::{ComplexAttractor, Subspace};
use biodivine_control_strategies::trap_spaces::AttractorEvidence;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "control_strategies")]
#[command(about = "Compute control strategies that drive a Boolean network into a target")]
struct Args {
    /// Path to a Boolean network file (.aeon, .bnet, etc.)
    #[arg(value_name = "FILE")]
    file: String,

    /// Target subspace as a comma separated list of assignments, e.g. `A=1,B=0`
    #[arg(long, short = 't', require_equals = true)]
    target: String,

    /// Control method
    #[arg(long, default_value = "percolation", require_equals = true)]
    method: Method,

    /// Maximal size of a control strategy
    #[arg(long, default_value_t = 3, require_equals = true)]
    limit: usize,

    /// Variables that can never be part of a control strategy (comma separated)
    #[arg(long, value_delimiter = ',', require_equals = true)]
    avoid: Vec<String>,

    /// Regulations that can never be part of a control strategy, e.g. `A:B,B:C`
    /// (intervention methods only)
    #[arg(long, value_delimiter = ',', require_equals = true)]
    avoid_edges: Vec<String>,

    /// Known complex attractors: one attractor per line, its states separated by `;`,
    /// each state written as `A=1,B=0,...`
    #[arg(long, value_name = "FILE", require_equals = true)]
    attractors: Option<PathBuf>,

    /// Ignore attractor evidence when selecting target trap spaces
    #[arg(long)]
    no_attractors: bool,

    /// Maximal number of trap spaces considered during the trap space selection
    #[arg(long, default_value_t = 1_000_000, require_equals = true)]
    max_trap_spaces: usize,

    /// Allowed interventions (intervention methods only)
    #[arg(long, default_value = "combined", require_equals = true)]
    intervention: Allowed,

    /// Value forcing rule of the exhaustive intervention solver
    #[arg(long, default_value = "percolation", require_equals = true)]
    forcing: Forcing,

    /// Control encoding; when given, interventions are solved by an external `clingo`
    #[arg(long, value_name = "ENCODING", require_equals = true)]
    clingo: Option<PathBuf>,

    /// Number of reported intervention models (0 = all)
    #[arg(long, default_value_t = 0, require_equals = true)]
    count: usize,

    /// Logging verbosity (use -v for info, or -v=LEVEL for a specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Method {
    /// Node interventions whose percolation lies in the target
    Percolation,
    /// Node interventions that percolate into a selected trap space of the target
    #[value(name = "trap-spaces")]
    TrapSpaces,
    /// Node and edge interventions forcing the target
    #[value(name = "intervention-percolation")]
    InterventionPercolation,
    /// Node and edge interventions forcing a selected trap space
    #[value(name = "intervention-trap-spaces")]
    InterventionTrapSpaces,
    /// Node and edge interventions reaching a selected trap space
    #[value(name = "intervention-transient")]
    InterventionTransient,
    /// Node and edge interventions forcing a selected trap space or the target
    #[value(name = "intervention-both")]
    InterventionBoth,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Allowed {
    Node,
    Edge,
    Combined,
}

impl From<Allowed> for InterventionType {
    fn from(value: Allowed) -> Self {
        match value {
            Allowed::Node => InterventionType::Node,
            Allowed::Edge => InterventionType::Edge,
            Allowed::Combined => InterventionType::Combined,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Forcing {
    Percolation,
    #[value(name = "positive-support")]
    PositiveSupport,
}

impl From<Forcing> for ForcingRule {
    fn from(value: Forcing) -> Self {
        match value {
            Forcing::Percolation => ForcingRule::Percolation,
            Forcing::PositiveSupport => ForcingRule::PositiveSupport,
        }
    }
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

fn main() {
    let args = Args::parse();

    // None = not specified, Some(None) = `-v` without value, Some(Some(level)) = `-v=level`
    let log_level = match &args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.clone().into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let network = PrimeNetwork::try_from_file(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to load BN file {}: {}", args.file, e);
        std::process::exit(1);
    });
    println!("Loaded BN with {} variables.", network.num_vars());

    let target = parse_target(&args.target).unwrap_or_else(|e| {
        eprintln!("Invalid target `{}`: {}", args.target, e);
        std::process::exit(1);
    });

    let evidence = if args.no_attractors {
        AttractorEvidence::disabled()
    } else {
        let attractors = match &args.attractors {
            Some(path) => read_attractors(path).unwrap_or_else(|e| {
                eprintln!("Failed to load attractors from {}: {}", path.display(), e);
                std::process::exit(1);
            }),
            None => Vec::new(),
        };
        println!("Using {} known complex attractors.", attractors.len());
        AttractorEvidence::from_attractors(attractors)
    };

    let control_type = match args.method {
        Method::Percolation | Method::TrapSpaces => {
            let strategies = run_search(&args, network, target, &evidence);
            print_strategies(&strategies);
            return;
        }
        Method::InterventionPercolation => ControlType::Percolation,
        Method::InterventionTrapSpaces => ControlType::TrapSpaces,
        Method::InterventionTransient => ControlType::Transient,
        Method::InterventionBoth => ControlType::Both,
    };

    let mut problem = ControlProblem::new(network, target, args.intervention.into(), control_type);
    problem.avoid_nodes = args.avoid.clone();
    problem.avoid_edges = parse_edges(&args.avoid_edges).unwrap_or_else(|e| {
        eprintln!("Invalid avoided edges: {}", e);
        std::process::exit(1);
    });
    problem.limit = args.limit;
    problem.evidence = evidence;
    problem.max_trap_spaces = args.max_trap_spaces;

    let strategies: Result<Vec<ControlStrategy>, ControlError> = match &args.clingo {
        Some(encoding) => {
            let mut solver = ClingoSolver::new(encoding.clone());
            solver.max_models = args.count;
            problem.solve(&solver)
        }
        None => {
            let solver = ExhaustiveSolver::new(args.forcing.into()).with_max_models(args.count);
            problem.solve(&solver)
        }
    };
    let strategies = strategies.unwrap_or_else(|e| {
        eprintln!("Error during intervention computation: {}", e);
        std::process::exit(1);
    });
    print_strategies(&strategies);
}

fn run_search(
    args: &Args,
    network: PrimeNetwork,
    target: Subspace,
    evidence: &AttractorEvidence,
) -> Vec<Subspace> {
    let config = SearchConfig::try_new(network, target)
        .and_then(|config| config.avoid_nodes(&args.avoid))
        .map(|config| config.with_size_range(0, args.limit))
        .unwrap_or_else(|e| {
            eprintln!("Invalid control problem: {}", e);
            std::process::exit(1);
        });

    let result = match args.method {
        Method::TrapSpaces => {
            search_via_trap_spaces(config, evidence, args.max_trap_spaces, Vec::new())
        }
        _ => search_percolation_only(config, Vec::new()).map_err(ControlError::from),
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error during control computation: {}", e);
        std::process::exit(1);
    })
}

/// Parse `A=1,B=0` into a subspace.
fn parse_target(text: &str) -> Result<Subspace, String> {
    let mut values = Vec::new();
    for assignment in text.split(',').map(str::trim).filter(|it| !it.is_empty()) {
        let Some((variable, value)) = assignment.split_once('=') else {
            return Err(format!("expected `NAME=VALUE`, found `{assignment}`"));
        };
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|_| format!("value of `{}` is not a number", variable.trim()))?;
        values.push((variable.trim().to_string(), value));
    }
    Subspace::try_from_values(values).map_err(|e| e.to_string())
}

/// Parse `A:B` pairs into `(source, target)` regulations.
fn parse_edges(edges: &[String]) -> Result<Vec<(String, String)>, String> {
    edges
        .iter()
        .map(|edge| match edge.split_once(':') {
            Some((source, target)) => Ok((source.trim().to_string(), target.trim().to_string())),
            None => Err(format!("expected `SOURCE:TARGET`, found `{edge}`")),
        })
        .collect()
}

fn read_attractors(path: &Path) -> Result<Vec<ComplexAttractor>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut attractors = Vec::new();
    for line in content.lines().map(str::trim).filter(|it| !it.is_empty()) {
        let states = line
            .split(';')
            .filter(|it| !it.trim().is_empty())
            .map(parse_target)
            .collect::<Result<Vec<Subspace>, String>>()?;
        attractors.push(ComplexAttractor::new(states));
    }
    Ok(attractors)
}

fn print_strategies<T: Intervention + Display>(strategies: &[T]) {
    for (i, strategy) in strategies.iter().enumerate() {
        println!("Strategy #{}: {}", i + 1, strategy);
    }
    println!("{}", summarize(strategies));
}

#[cfg(test)]
mod tests {
    use super::{parse_edges, parse_target, read_attractors};
    use biodivine_control_strategies::subspace::{ComplexAttractor, Subspace};

    #[test]
    fn edges_and_targets() {
        let edges = vec!["a:b".to_string(), " b : c ".to_string()];
        assert_eq!(
            parse_edges(&edges).unwrap(),
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string())
            ]
        );
        assert!(parse_edges(&["a-b".to_string()]).is_err());

        assert_eq!(
            parse_target("A=1, B=0").unwrap(),
            Subspace::from([("A", true), ("B", false)])
        );
        assert!(parse_target("A=2").is_err());
        assert!(parse_target("A").is_err());
    }

    #[test]
    fn attractor_file() {
        let path = std::env::temp_dir().join(format!("attractors-{}.txt", std::process::id()));
        std::fs::write(&path, "x=0,y=0;x=1,y=0\n\nx=1,y=1\n").unwrap();
        let attractors = read_attractors(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            attractors,
            vec![
                ComplexAttractor::new(vec![
                    Subspace::from([("x", false), ("y", false)]),
                    Subspace::from([("x", true), ("y", false)]),
                ]),
                ComplexAttractor::new(vec![Subspace::from([("x", true), ("y", true)])]),
            ]
        );
    }
}
