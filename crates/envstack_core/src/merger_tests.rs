//! Tests for layer merging.

use super::*;
use crate::parser::parse;

/// Verify the documented two-layer override scenario.
#[test]
fn test_merge_later_layer_overrides_earlier() {
    let base = parse("A=base\nB=base\n", true);
    let local = parse("B=local\nC=local\n", true);

    let merged = merge(vec![base, local]);

    let expected: EnvironmentMapping = [("A", "base"), ("B", "local"), ("C", "local")]
        .into_iter()
        .collect();
    assert_eq!(merged, expected);
}

/// Verify the last layer wins for every pair of layers defining a key.
#[test]
fn test_merge_last_definition_wins_across_many_layers() {
    let layers = vec![
        parse("SHARED=1\nONLY_FIRST=1\n", true),
        parse("SHARED=2\n", true),
        parse("OTHER=3\n", true),
        parse("SHARED=4\n", true),
    ];

    let merged = merge(layers);

    assert_eq!(merged.get("SHARED"), Some("4"));
    assert_eq!(merged.get("ONLY_FIRST"), Some("1"));
    assert_eq!(merged.get("OTHER"), Some("3"));
}

/// Verify a later empty value replaces an earlier one when elision is off.
#[test]
fn test_merge_empty_value_overrides_when_kept() {
    let base = parse("TOKEN=secret\n", false);
    let local = parse("TOKEN=\n", false);

    let merged = merge([base, local]);

    assert_eq!(merged.get("TOKEN"), Some(""));
}

/// Verify an elided empty value leaves the earlier value in place.
#[test]
fn test_merge_elided_value_does_not_override() {
    let base = parse("TOKEN=secret\n", true);
    let local = parse("TOKEN=\n", true);

    let merged = merge([base, local]);

    assert_eq!(merged.get("TOKEN"), Some("secret"));
}

/// Verify merging nothing yields an empty mapping.
#[test]
fn test_merge_no_layers() {
    assert!(merge(Vec::<EnvironmentLayer>::new()).is_empty());
}

/// Verify merge_into replaces whole values, not parts of them.
#[test]
fn test_merge_into_replaces_whole_value() {
    let mut target = parse("LIST=a,b,c\n", true);
    merge_into(&mut target, parse("LIST=d\n", true));

    assert_eq!(target.get("LIST"), Some("d"));
    assert_eq!(target.len(), 1);
}
