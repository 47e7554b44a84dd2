// tests/builder_tests.rs

use cohort_rule::{Joiner, compile, concat_search_expressions, concat_search_expressions_with};

// ============================================================================
// Joining Fragments
// ============================================================================

#[test]
fn test_skips_missing_and_empty_fragments() {
    let joined = concat_search_expressions([Some(""), Some("{a}=1"), None, Some("{b}=2")]);
    assert_eq!(joined, "{a}=1 and {b}=2");
}

#[test]
fn test_no_fragments() {
    assert_eq!(concat_search_expressions(Vec::new()), "");
    assert_eq!(concat_search_expressions([None, Some(""), None]), "");
}

#[test]
fn test_single_fragment_is_unchanged() {
    assert_eq!(
        concat_search_expressions([Some("{enrollee.subject} = true")]),
        "{enrollee.subject} = true"
    );
}

#[test]
fn test_order_is_preserved() {
    let fragments = vec![Some("{c}=3"), Some("{a}=1"), Some("{b}=2")];
    assert_eq!(concat_search_expressions(fragments), "{c}=3 and {a}=1 and {b}=2");
}

#[test]
fn test_whitespace_fragments_are_kept() {
    assert_eq!(concat_search_expressions([Some(" "), Some("{a}=1")]), "  and {a}=1");
}

#[test]
fn test_owned_strings() {
    let owned: Vec<String> = vec!["{a}=1".to_string(), String::new(), "{b}=2".to_string()];
    let joined = concat_search_expressions(owned.iter().map(|s| Some(s.as_str())));
    assert_eq!(joined, "{a}=1 and {b}=2");
}

// ============================================================================
// Joiners
// ============================================================================

#[test]
fn test_or_joiner() {
    let joined = concat_search_expressions_with([Some("{a}=1"), None, Some("{b}=2")], Joiner::Or);
    assert_eq!(joined, "{a}=1 or {b}=2");
}

#[test]
fn test_default_joiner_is_and() {
    assert_eq!(Joiner::default(), Joiner::And);
    assert_eq!(Joiner::Or.to_string(), "or");
}

// ============================================================================
// Joined Output Parses
// ============================================================================

#[test]
fn test_joined_rule_compiles() {
    let joined = concat_search_expressions([
        Some("{enrollee.subject} = true"),
        Some("({profile.sexAtBirth} = 'female' or {profile.sexAtBirth} = 'intersex')"),
        None,
        Some("{age} >= 18"),
    ]);
    assert!(compile(&joined).is_ok(), "failed to compile {}", joined);
}

#[test]
fn test_unparenthesized_or_fragment_changes_grouping() {
    let joined = concat_search_expressions([Some("{a}=1 or {b}=2"), Some("{c}=3")]);
    let grouped = concat_search_expressions([Some("({a}=1 or {b}=2)"), Some("{c}=3")]);
    assert_ne!(compile(&joined).unwrap(), compile(&grouped).unwrap());
}
