//! Layer merging.
//!
//! Layers are applied in the order given, lowest precedence first. Every key
//! a layer defines replaces the accumulated value for that key, so the last
//! layer to define a key decides its value. Nothing is reported when a key is
//! overridden.

use crate::environment::{EnvironmentLayer, EnvironmentMapping};

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// Merges layers into one mapping, later layers overriding earlier ones.
///
/// # Examples
///
/// ```
/// use envstack_core::{merge, parse};
///
/// let base = parse("A=base\nB=base\n", true);
/// let local = parse("B=local\nC=local\n", true);
///
/// let merged = merge([base, local]);
///
/// assert_eq!(merged.get("A"), Some("base"));
/// assert_eq!(merged.get("B"), Some("local"));
/// assert_eq!(merged.get("C"), Some("local"));
/// ```
pub fn merge<I>(layers: I) -> EnvironmentMapping
where
    I: IntoIterator<Item = EnvironmentLayer>,
{
    let mut merged = EnvironmentMapping::new();
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}

/// Applies one layer on top of an accumulated mapping.
pub fn merge_into(target: &mut EnvironmentMapping, layer: EnvironmentLayer) {
    target.extend(layer);
}
