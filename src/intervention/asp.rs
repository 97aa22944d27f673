//! Translation of [`InterventionProblem`] to and from the clingo answer set format.
//!
//! The instance is a list of facts that an external control encoding reads:
//! `avoid_node/1`, `avoid_edge/2`, `formula/2`, `dnf/2`, `clause/3`, `subspace/1`, `goal/3`
//! and the constants `maxsize`, `maxnodes` and `maxedges`. Values use the `+1` / `-1`
//! encoding and a disabled intervention kind has limit `-1`. Identifiers are lower-cased.

use crate::error::ControlError;
use crate::intervention::{
    InterventionAtom, InterventionModel, InterventionProblem, InterventionSolver, Sign,
};
use log::{debug, info};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Check that every variable maps to a distinct clingo constant once lower-cased.
///
/// A constant is an optional run of underscores followed by a letter and then letters,
/// digits, underscores or primes. The keyword `not` is rejected.
pub fn validate_identifiers(problem: &InterventionProblem) -> Result<(), ControlError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for variable in &problem.variables {
        let identifier = variable.to_lowercase();
        if !is_constant(&identifier) {
            return Err(ControlError::InvalidIdentifier(variable.clone()));
        }
        if let Some(first) = seen.insert(identifier, variable) {
            return Err(ControlError::IdentifierClash {
                first: first.to_string(),
                second: variable.clone(),
            });
        }
    }
    Ok(())
}

fn is_constant(identifier: &str) -> bool {
    let mut chars = identifier.trim_start_matches('_').chars();
    let starts_with_letter = chars.next().is_some_and(|it| it.is_ascii_lowercase());
    starts_with_letter
        && chars.all(|it| it.is_ascii_lowercase() || it.is_ascii_digit() || it == '_' || it == '\'')
        && identifier != "not"
}

/// Render the problem as clingo facts. Fails if the variable names are not valid and
/// distinct clingo constants (see [`validate_identifiers`]).
pub fn render_facts(problem: &InterventionProblem) -> Result<String, ControlError> {
    validate_identifiers(problem)?;
    let name = |var: usize| problem.variables[var].as_str();

    let mut avoid_nodes = String::new();
    for var in &problem.avoid_nodes {
        avoid_nodes.push_str(&format!("avoid_node({}). ", name(*var)));
    }

    let mut avoid_edges = String::new();
    for (source, target) in &problem.avoid_edges {
        avoid_edges.push_str(&format!("avoid_edge({},{}). ", name(*source), name(*target)));
    }

    let mut formulas = String::new();
    let mut dnfs = String::new();
    let mut clauses = String::new();
    let mut clause_id = 0usize;
    for (var, formula) in problem.formulas.iter().enumerate() {
        formulas.push_str(&format!("formula({}, {}). ", name(var), var));
        for clause in formula {
            for literal in clause {
                clauses.push_str(&format!(
                    "clause({}, {}, {}). ",
                    clause_id,
                    name(literal.regulator),
                    literal.sign
                ));
            }
            dnfs.push_str(&format!("dnf({}, {}). ", var, clause_id));
            clause_id += 1;
        }
    }

    let mut subspaces = String::new();
    let mut goals = String::new();
    for (id, goal) in problem.numbered_goals() {
        subspaces.push_str(&format!("subspace({}). ", id));
        for (variable, value) in goal.space.iter() {
            goals.push_str(&format!("goal({}, {}, {}). ", id, variable, Sign::from(value)));
        }
    }

    let limit = |value: Option<usize>| value.map(|it| it as i64).unwrap_or(-1);
    let constants = format!(
        "#const maxsize={}.\n\n#const maxnodes={}.\n\n#const maxedges={}.",
        problem.limits.max_size,
        limit(problem.limits.max_nodes),
        limit(problem.limits.max_edges)
    );

    let sections = [
        avoid_nodes,
        avoid_edges,
        formulas,
        dnfs,
        clauses,
        subspaces,
        goals,
        constants,
    ];
    Ok(sections.join("\n\n").to_lowercase())
}

/// Parse the textual output of clingo into models.
///
/// `UNSATISFIABLE` yields no models. Every `Answer: N` line is followed by the atoms of
/// one model (possibly none); only `node/2` and `edge/3` atoms are read. Names are mapped
/// back to the (case-sensitive) variables of the problem.
pub fn parse_answer_sets(
    output: &str,
    problem: &InterventionProblem,
) -> Result<Vec<InterventionModel>, ControlError> {
    let lines: Vec<&str> = output.lines().map(|it| it.trim()).collect();
    if lines.contains(&"UNSATISFIABLE") {
        return Ok(Vec::new());
    }

    let mut models = Vec::new();
    let mut answers = 0;
    let mut iter = lines.iter();
    while let Some(line) = iter.next() {
        if !line.starts_with("Answer:") {
            continue;
        }
        answers += 1;
        let atoms = iter.next().copied().unwrap_or("");
        let mut model = Vec::new();
        for atom in atoms.split_whitespace() {
            if let Some(atom) = parse_atom(atom, problem)? {
                model.push(atom);
            }
        }
        models.push(model);
    }

    if answers == 0 && !lines.iter().any(|it| it.starts_with("SATISFIABLE")) {
        return Err(ControlError::Solver(
            "solver output contains no answer".to_string(),
        ));
    }

    debug!("Parsed {} answer sets.", models.len());
    Ok(models)
}

fn parse_atom(
    atom: &str,
    problem: &InterventionProblem,
) -> Result<Option<InterventionAtom>, ControlError> {
    let Some((predicate, arguments)) = atom.split_once('(') else {
        return Ok(None);
    };
    let arguments: Vec<&str> = arguments.trim_end_matches(')').split(',').collect();
    match (predicate, arguments.as_slice()) {
        ("node", [variable, value]) => {
            let variable = find_variable(problem, variable)?;
            let sign = parse_sign(&variable, value)?;
            Ok(Some(InterventionAtom::Node { variable, sign }))
        }
        ("edge", [source, target, value]) => {
            let source = find_variable(problem, source)?;
            let target = find_variable(problem, target)?;
            let sign = parse_sign(&target, value)?;
            Ok(Some(InterventionAtom::Edge {
                source,
                target,
                sign,
            }))
        }
        _ => Ok(None),
    }
}

fn find_variable(problem: &InterventionProblem, name: &str) -> Result<String, ControlError> {
    let name = name.trim();
    problem
        .variables
        .iter()
        .find(|it| it.to_lowercase() == name)
        .cloned()
        .ok_or_else(|| ControlError::UnknownVariable(name.to_string()))
}

fn parse_sign(variable: &str, value: &str) -> Result<Sign, ControlError> {
    let invalid = |value: i64| ControlError::InvalidValue {
        variable: variable.to_string(),
        value,
    };
    let value: i64 = value
        .trim()
        .parse()
        .map_err(|_| ControlError::Solver(format!("malformed value `{value}` of `{variable}`")))?;
    Sign::try_from_int(value).ok_or_else(|| invalid(value))
}

/// Solves intervention problems by running an external `clingo` process with a
/// user-supplied control encoding.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClingoSolver {
    /// The `clingo` executable (default: `clingo` on the `PATH`).
    pub executable: PathBuf,
    /// The control encoding that is combined with the rendered instance.
    pub encoding: PathBuf,
    /// The maximal number of models; `0` means all of them.
    pub max_models: usize,
}

impl ClingoSolver {
    pub fn new(encoding: PathBuf) -> ClingoSolver {
        ClingoSolver {
            executable: PathBuf::from("clingo"),
            encoding,
            max_models: 0,
        }
    }

    /// Command line arguments; the instance is read from the standard input.
    pub fn arguments(&self) -> Vec<String> {
        vec![
            "--enum-mode=domRec".to_string(),
            "--heuristic=Domain".to_string(),
            "--dom-mod=5,16".to_string(),
            self.encoding.to_string_lossy().to_string(),
            "-".to_string(),
            self.max_models.to_string(),
        ]
    }
}

impl InterventionSolver for ClingoSolver {
    fn solve(&self, problem: &InterventionProblem) -> Result<Vec<InterventionModel>, ControlError> {
        let solver_error = |e: std::io::Error| ControlError::Solver(e.to_string());
        let instance = render_facts(problem)?;

        info!("Running {} {}.", self.executable.display(), self.arguments().join(" "));
        let mut child = Command::new(&self.executable)
            .args(self.arguments())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(solver_error)?;
        // A solver that exits early closes its input; its diagnostics are reported below.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(instance.as_bytes()),
            None => Ok(()),
        };
        // Clingo reports satisfiability through its exit code, so only the output matters.
        let output = child.wait_with_output().map_err(solver_error)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("Solver diagnostics: {}", stderr.trim());
        }
        parse_answer_sets(&stdout, problem)
            .and_then(|models| written.map(|_| models).map_err(solver_error))
            .map_err(|e| with_diagnostics(e, &stderr))
    }
}

/// Append the solver diagnostics to a solver failure.
fn with_diagnostics(error: ControlError, stderr: &str) -> ControlError {
    match error {
        ControlError::Solver(message) if !stderr.trim().is_empty() => {
            ControlError::Solver(format!("{message}; {}", stderr.trim()))
        }
        other => other,
    }
}
