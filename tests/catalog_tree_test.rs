//! Behavioral tests for CatalogTree: ordering, lookup, duplicates, validation.

use std::collections::HashSet;

use rstest::rstest;

use coursecat::domain::{CatalogTree, CourseRecord};

fn course(identifier: &str, name: &str, prerequisites: &[&str]) -> CourseRecord {
    CourseRecord::new(identifier, name, prerequisites.iter().copied())
}

fn tree_of(identifiers: &[&str]) -> CatalogTree {
    identifiers
        .iter()
        .map(|id| course(id, &format!("{id} course"), &[]))
        .collect()
}

/// Deterministic pseudo-random permutation (LCG) so ordering is checked
/// against many insertion orders without a random-number dependency.
fn shuffled(n: usize, seed: u64) -> Vec<String> {
    let mut ids: Vec<String> = (0..n).map(|i| format!("CSCI{:03}", i * 7 % 1000)).collect();
    let mut state = seed;
    for i in (1..ids.len()).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        ids.swap(i, j);
    }
    ids
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn scenario_a_dangling_prerequisite_is_dropped() {
    let mut tree = CatalogTree::new();
    tree.insert(course("CSCI200", "Data Structures", &[]));
    tree.insert(course("CSCI300", "Algorithms", &["CSCI200", "CSCI999"]));

    tree.validate_prerequisites();

    let found = tree.search("CSCI300").expect("CSCI300 present");
    assert_eq!(found.prerequisites, vec!["CSCI200"]);
}

#[test]
fn scenario_b_enumeration_is_sorted() {
    let tree = tree_of(&["B", "A", "C"]);
    let ids: Vec<_> = tree.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn scenario_c_missing_identifier_is_not_found() {
    let tree = tree_of(&["AAA"]);
    assert!(tree.search("ZZZ").is_none());
}

#[test]
fn scenario_e_duplicates_are_kept_and_search_is_deterministic() {
    let mut tree = CatalogTree::new();
    tree.insert(course("M", "Original", &[]));
    tree.insert(course("M", "Duplicate", &[]));

    assert_eq!(tree.len(), 2);
    assert!(tree.iter().all(|c| c.identifier == "M"));

    let first = tree.search("M").map(|c| c.name.clone());
    for _ in 0..5 {
        assert_eq!(tree.search("M").map(|c| c.name.clone()), first);
    }
    assert_eq!(first.as_deref(), Some("Original"));
}

#[test]
fn given_duplicate_below_a_shallower_match_then_search_stops_at_shallowest() {
    // "M" (dup) lands right of "K", below the first "M" at the root.
    let mut tree = CatalogTree::new();
    tree.insert(course("M", "root", &[]));
    tree.insert(course("K", "left", &[]));
    tree.insert(course("M", "deeper", &[]));

    assert_eq!(tree.search("M").unwrap().name, "root");
}

// ============================================================
// Properties
// ============================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(42)]
#[case(1337)]
fn order_invariant_holds_for_any_insertion_order(#[case] seed: u64) {
    let ids = shuffled(200, seed);
    let tree: CatalogTree = ids.iter().map(|id| course(id, "x", &[])).collect();

    let listed: Vec<&str> = tree.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(listed.len(), ids.len());
    assert!(listed.windows(2).all(|w| w[0] <= w[1]));
}

#[rstest]
#[case(3)]
#[case(99)]
fn search_finds_every_present_identifier_and_nothing_else(#[case] seed: u64) {
    let ids = shuffled(100, seed);
    let tree: CatalogTree = ids.iter().map(|id| course(id, "x", &[])).collect();

    for id in &ids {
        assert_eq!(tree.search(id).map(|c| c.identifier.as_str()), Some(id.as_str()));
    }
    for absent in ["", "CSCI", "csci007", "CSCI0070", "ZZZ"] {
        assert!(tree.search(absent).is_none(), "{absent} should be absent");
    }
}

#[test]
fn validation_keeps_only_known_identifiers_in_original_order() {
    let mut tree: CatalogTree = [
        course("CSCI400", "Large Software", &["CSCI301", "BOGUS1", "CSCI350"]),
        course("CSCI350", "Operating Systems", &["CSCI300", "BOGUS2"]),
        course("CSCI300", "Algorithms", &["CSCI200", "MATH201"]),
        course("CSCI301", "Advanced C++", &["CSCI101"]),
        course("CSCI101", "Programming", &["CSCI100"]),
        course("CSCI100", "Intro", &[]),
    ]
    .into_iter()
    .collect();
    let originals: Vec<CourseRecord> = tree.iter().cloned().collect();

    let dropped = tree.validate_prerequisites();

    let known: HashSet<&str> = tree.iter().map(|c| c.identifier.as_str()).collect();
    for (after, original) in tree.iter().zip(&originals) {
        assert!(after.prerequisites.iter().all(|p| known.contains(p.as_str())));
        let expected: Vec<&String> = original
            .prerequisites
            .iter()
            .filter(|p| known.contains(p.as_str()))
            .collect();
        let actual: Vec<&String> = after.prerequisites.iter().collect();
        assert_eq!(actual, expected);
    }
    assert!(dropped.iter().all(|d| !known.contains(d.prerequisite.as_str())));
    let missing: Vec<_> = dropped.iter().map(|d| d.prerequisite.as_str()).collect();
    assert_eq!(missing, vec!["CSCI200", "MATH201", "BOGUS2", "BOGUS1"]);
}

#[test]
fn validation_twice_leaves_tree_unchanged() {
    let mut tree: CatalogTree = [
        course("B", "b", &["A", "Q"]),
        course("A", "a", &["B"]),
        course("C", "c", &["X", "Y", "A"]),
    ]
    .into_iter()
    .collect();

    tree.validate_prerequisites();
    let first: Vec<CourseRecord> = tree.iter().cloned().collect();
    tree.validate_prerequisites();
    let second: Vec<CourseRecord> = tree.iter().cloned().collect();

    assert_eq!(first, second);
}

#[test]
fn duplicate_identifier_counts_as_present_for_validation() {
    let mut tree: CatalogTree = [course("M", "one", &[]), course("M", "two", &["M"])]
        .into_iter()
        .collect();

    assert!(tree.validate_prerequisites().is_empty());
}

#[test]
fn emptiness_changes_only_on_first_insert() {
    let mut tree = CatalogTree::new();
    assert!(tree.is_empty());
    tree.insert(course("A", "a", &[]));
    assert!(!tree.is_empty());
    tree.insert(course("B", "b", &[]));
    tree.validate_prerequisites();
    assert!(!tree.is_empty());
}
