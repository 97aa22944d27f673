use cancel_this::Cancelled;
use std::fmt::{Display, Formatter};

/// The error type of all fallible operations of this crate.
///
/// Malformed inputs are reported before any search or solver is started. Running out of
/// candidates is never an error (the result is simply empty), while cancellation and
/// solver failures are propagated unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// A subspace, avoided node or goal references a variable the network does not have.
    UnknownVariable(String),
    /// The same variable was declared twice.
    DuplicateVariable(String),
    /// A subspace value outside of `{0, 1}`.
    InvalidValue { variable: String, value: i64 },
    /// An avoided edge is not a regulation of the network.
    UnknownEdge { source: String, target: String },
    /// The prime implicants of a variable force it to both values at once.
    InconsistentPrimes(String),
    /// A variable is fixed to both values by the same intervention.
    ConflictingNodeIntervention(String),
    /// An edge is forced to both signs by the same intervention.
    ConflictingEdgeIntervention { source: String, target: String },
    /// A node intervention and an edge intervention act on the same variable.
    NodeEdgeConflict {
        variable: String,
        source: String,
        target: String,
    },
    /// The Boolean network cannot be represented by prime implicants.
    UnsupportedNetwork(String),
    /// A variable name that is not a valid solver identifier.
    InvalidIdentifier(String),
    /// Two variable names that map to the same solver identifier.
    IdentifierClash { first: String, second: String },
    /// An external solver failed or returned output that cannot be decoded.
    Solver(String),
    Cancelled(Cancelled),
}

impl From<Cancelled> for ControlError {
    fn from(value: Cancelled) -> Self {
        ControlError::Cancelled(value)
    }
}

impl Display for ControlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlError::UnknownVariable(name) => write!(f, "Unknown variable `{name}`"),
            ControlError::DuplicateVariable(name) => {
                write!(f, "Variable `{name}` is declared more than once")
            }
            ControlError::InvalidValue { variable, value } => {
                write!(f, "Variable `{variable}` has value {value}; expected 0 or 1")
            }
            ControlError::UnknownEdge { source, target } => {
                write!(f, "Edge `{source} -> {target}` is not a network regulation")
            }
            ControlError::InconsistentPrimes(name) => {
                write!(f, "Prime implicants of `{name}` force both values")
            }
            ControlError::ConflictingNodeIntervention(name) => {
                write!(f, "Variable `{name}` is fixed to both values")
            }
            ControlError::ConflictingEdgeIntervention { source, target } => {
                write!(f, "Edge `{source} -> {target}` is forced to both signs")
            }
            ControlError::NodeEdgeConflict {
                variable,
                source,
                target,
            } => write!(
                f,
                "Variable `{variable}` is fixed but also takes part in edge `{source} -> {target}`"
            ),
            ControlError::UnsupportedNetwork(message) => {
                write!(f, "Unsupported network: {message}")
            }
            ControlError::InvalidIdentifier(name) => {
                write!(f, "Variable `{name}` is not a valid solver identifier")
            }
            ControlError::IdentifierClash { first, second } => {
                write!(f, "Variables `{first}` and `{second}` have the same solver identifier")
            }
            ControlError::Solver(message) => write!(f, "Solver failure: {message}"),
            ControlError::Cancelled(c) => write!(f, "{}", c),
        }
    }
}

impl std::error::Error for ControlError {}
