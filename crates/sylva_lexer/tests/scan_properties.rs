//! Property tests for the scanner: termination, balance, and depth.

use proptest::prelude::*;
use sylva_lexer::{parse, parse_with, ScanError, ScanSettings};

/// Strategy producing balanced bracket strings up to the given depth.
fn balanced(depth: u32) -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just(String::new()), Just("x".to_string())];
    leaf.prop_recursive(depth, 64, 4, |inner| {
        prop::collection::vec(
            prop_oneof![
                inner.clone().prop_map(|s| format!("({s})")),
                inner.prop_map(|s| format!("{{{s}}}")),
            ],
            1..4,
        )
        .prop_map(|parts| parts.join(" "))
    })
}

proptest! {
    #[test]
    fn balanced_inputs_parse(source in balanced(6)) {
        prop_assert!(parse(&source).is_ok(), "failed for {source:?}");
    }

    #[test]
    fn arbitrary_ascii_terminates(source in "[ -~\n\t]{0,200}") {
        // Any outcome is fine; the scan must simply finish.
        let _ = parse(&source);
    }

    #[test]
    fn arbitrary_bytes_terminate(source in "\\PC{0,120}") {
        let _ = parse(&source);
    }

    #[test]
    fn extra_closer_is_fatal(prefix in balanced(3), closer in "[)}]") {
        let source = format!("{prefix}{closer}");
        let is_mismatched_closer = matches!(
            parse(&source),
            Err(ScanError::MismatchedCloser { .. })
        );
        prop_assert!(is_mismatched_closer);
    }

    #[test]
    fn pure_nesting_depth_matches_brackets(depth in 1usize..20) {
        // `((((...))))` - one implicit line wrapper plus one level per pair.
        let source = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        let parsed = parse(&source);
        prop_assert!(parsed.is_ok());
        if let Ok(tree) = parsed {
            prop_assert_eq!(tree.max_depth(), depth + 1);
        }
    }

    #[test]
    fn depth_guard_replaces_stack_overflow(depth in 70usize..140) {
        let source = "(".repeat(depth);
        let is_too_deep = matches!(
            parse(&source),
            Err(ScanError::TooDeep { .. })
        );
        prop_assert!(is_too_deep);
    }
}

#[test]
fn deep_nesting_within_custom_cap_is_fine() {
    let settings = ScanSettings::new().with_max_depth(600);
    let source = format!("{}{}", "(".repeat(500), ")".repeat(500));
    let tree = parse_with(&source, &settings).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(tree.max_depth(), 501);
}
