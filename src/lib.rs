#[cfg(test)]
mod test_utils;

mod error;

pub mod intervention;
pub mod network;
pub mod report;
pub mod search;
pub mod subspace;
pub mod trap_spaces;

pub use error::ControlError;

/// Extract the "simple name" of a type argument at compile time.
///
/// In the future, this should be a `const fn`, but `type_name` and `unwrap_or` are not
/// yet stabilized as `const` functions (even thought they probably are).
fn simple_type_name<T>() -> &'static str {
    std::any::type_name::<T>().split("::").last().unwrap_or("?")
}
