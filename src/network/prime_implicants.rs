use crate::error::ControlError;
use crate::network::{PrimeNetwork, VariablePrimes};
use crate::subspace::Subspace;
use biodivine_lib_param_bn::{BooleanNetwork, FnUpdate, VariableId};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Functions with more arguments are not expanded into prime implicants.
const MAX_ARGUMENTS: usize = 20;

/// A cube over the arguments of one function: `mask` marks fixed arguments, `bits` their
/// values (bits outside of `mask` are always zero).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
struct Cube {
    mask: u32,
    bits: u32,
}

impl PrimeNetwork {
    /// Derive the prime implicants of every update function of `network`.
    ///
    /// Variables without an update function and without regulators are treated as inputs
    /// that keep their value. Networks with uninterpreted parameters (explicit or implicit)
    /// are not supported.
    pub fn try_from_boolean_network(
        network: &BooleanNetwork,
    ) -> Result<PrimeNetwork, ControlError> {
        let mut variables = Vec::with_capacity(network.num_vars());
        for var in network.variables() {
            let name = network.get_variable_name(var).clone();
            let primes = match network.get_update_function(var) {
                None if network.regulators(var).is_empty() => VariablePrimes::input(&name),
                None => {
                    return Err(ControlError::UnsupportedNetwork(format!(
                        "variable `{name}` has an implicit update function"
                    )));
                }
                Some(function) => function_primes(network, &name, function)?,
            };
            debug!(
                "Variable `{}` has {} + {} prime implicants.",
                name,
                primes.off.len(),
                primes.on.len()
            );
            variables.push((name, primes));
        }

        let result = PrimeNetwork::try_new(variables)?;
        info!("Derived prime implicants for {} variables.", result.num_vars());
        Ok(result)
    }

    /// Parse a `.bnet` model and derive its prime implicants.
    pub fn try_from_bnet(model: &str) -> Result<PrimeNetwork, ControlError> {
        let network =
            BooleanNetwork::try_from_bnet(model).map_err(ControlError::UnsupportedNetwork)?;
        PrimeNetwork::try_from_boolean_network(&network)
    }

    /// Load any model format supported by `biodivine-lib-param-bn` and derive its prime
    /// implicants.
    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<PrimeNetwork, ControlError> {
        let network =
            BooleanNetwork::try_from_file(path).map_err(ControlError::UnsupportedNetwork)?;
        PrimeNetwork::try_from_boolean_network(&network)
    }
}

fn function_primes(
    network: &BooleanNetwork,
    name: &str,
    function: &FnUpdate,
) -> Result<VariablePrimes, ControlError> {
    if !function.collect_parameters().is_empty() {
        return Err(ControlError::UnsupportedNetwork(format!(
            "update function of `{name}` contains parameters"
        )));
    }

    let arguments = function.collect_arguments();
    if arguments.len() > MAX_ARGUMENTS {
        return Err(ControlError::UnsupportedNetwork(format!(
            "update function of `{name}` has {} arguments (at most {MAX_ARGUMENTS} are supported)",
            arguments.len()
        )));
    }

    let mut on_set = Vec::new();
    let mut off_set = Vec::new();
    let mut valuation = HashMap::with_capacity(arguments.len());
    for minterm in 0..(1u32 << arguments.len()) {
        for (i, argument) in arguments.iter().enumerate() {
            valuation.insert(*argument, minterm & (1 << i) != 0);
        }
        match function.evaluate(&valuation) {
            Some(true) => on_set.push(minterm),
            Some(false) => off_set.push(minterm),
            None => {
                return Err(ControlError::UnsupportedNetwork(format!(
                    "update function of `{name}` cannot be evaluated"
                )));
            }
        }
    }

    let full_mask = if arguments.is_empty() {
        0
    } else {
        u32::MAX >> (32 - arguments.len())
    };
    let to_subspaces = |cubes: Vec<Cube>| -> Vec<Subspace> {
        cubes
            .into_iter()
            .map(|cube| cube_to_subspace(network, &arguments, cube))
            .collect()
    };

    Ok(VariablePrimes::new(
        to_subspaces(prime_cubes(full_mask, &off_set)),
        to_subspaces(prime_cubes(full_mask, &on_set)),
    ))
}

/// Compute all prime implicants of the function whose true minterms are `minterms` by
/// repeatedly merging cubes that differ in exactly one fixed argument.
fn prime_cubes(full_mask: u32, minterms: &[u32]) -> Vec<Cube> {
    let mut primes = Vec::new();
    let mut layer: HashSet<Cube> = minterms
        .iter()
        .map(|bits| Cube {
            mask: full_mask,
            bits: *bits,
        })
        .collect();

    while !layer.is_empty() {
        let mut merged = HashSet::new();
        let mut next = HashSet::new();
        for cube in &layer {
            let mut fixed = cube.mask;
            while fixed != 0 {
                let bit = fixed & fixed.wrapping_neg();
                fixed &= !bit;
                let neighbour = Cube {
                    mask: cube.mask,
                    bits: cube.bits ^ bit,
                };
                if layer.contains(&neighbour) {
                    merged.insert(*cube);
                    next.insert(Cube {
                        mask: cube.mask & !bit,
                        bits: cube.bits & !bit,
                    });
                }
            }
        }
        primes.extend(layer.difference(&merged).cloned());
        layer = next;
    }

    primes.sort();
    primes
}

fn cube_to_subspace(network: &BooleanNetwork, arguments: &[VariableId], cube: Cube) -> Subspace {
    arguments
        .iter()
        .enumerate()
        .filter(|(i, _)| cube.mask & (1 << i) != 0)
        .map(|(i, var)| {
            (
                network.get_variable_name(*var).clone(),
                cube.bits & (1 << i) != 0,
            )
        })
        .collect()
}
