//! Boundary classification integration tests
//!
//! These tests exercise the public classification API the way an analysis
//! driver uses it: patterns in, application/library decisions out.

use appscope::boundary::{is_application, is_library, to_filter_pattern};
use appscope::{BoundaryClassifier, FilterPattern, ReferenceCensus, RuleSet, VecIndex};
use regex::Regex;

const SAMPLE_CLASSES: &[&str] = &[
    "Main",
    "a.b",
    "a.b.C",
    "a.b.c.D",
    "a.bc.D",
    "A.B.C",
    "com.app.Main",
    "com.app.ui.MainActivity",
    "com.app.ui.MainActivity$1",
    "java.lang.Object",
    "android.app.Activity",
];

// ============================================================================
// Classification properties
// ============================================================================

#[test]
fn test_application_and_library_partition_every_class() {
    let pattern_sets: &[&[&str]] = &[
        &["a.b.*"],
        &["a.b.**"],
        &["**"],
        &["com.app.Main"],
        &["com.app.**", "**", "java.lang.Object"],
    ];

    for patterns in pattern_sets {
        let rules = RuleSet::parse(*patterns).unwrap();
        for class in SAMPLE_CLASSES {
            assert_ne!(
                is_application(class, &rules),
                is_library(class, &rules),
                "{} under {:?}",
                class,
                patterns
            );
        }
    }
}

#[test]
fn test_package_rule() {
    let rules = RuleSet::parse(&["a.b.*"]).unwrap();
    assert!(is_application("a.b.C", &rules));
    assert!(is_library("a.b.c.D", &rules));
    assert!(is_library("a.b", &rules));
}

#[test]
fn test_super_package_rule() {
    let rules = RuleSet::parse(&["a.b.**"]).unwrap();
    assert!(is_application("a.b.C", &rules));
    assert!(is_application("a.b.c.D", &rules));
    assert!(is_library("a.bc.D", &rules));
}

#[test]
fn test_default_package_rule() {
    let rules = RuleSet::parse(&["**"]).unwrap();
    let app: Vec<_> = SAMPLE_CLASSES
        .iter()
        .filter(|c| is_application(c, &rules))
        .collect();
    assert_eq!(app, vec![&"Main"]);
}

#[test]
fn test_pattern_order_does_not_matter() {
    let forward = BoundaryClassifier::from_patterns(&["com.app.Main", "a.b.**", "**"]).unwrap();
    let backward = BoundaryClassifier::from_patterns(&["**", "a.b.**", "com.app.Main"]).unwrap();

    for class in SAMPLE_CLASSES {
        assert_eq!(forward.is_application(class), backward.is_application(class), "{}", class);
    }
}

#[test]
fn test_inner_classes_follow_their_package() {
    let classifier = BoundaryClassifier::from_patterns(&["com.app.ui.*"]).unwrap();
    assert!(classifier.is_application("com.app.ui.MainActivity$1"));
}

// ============================================================================
// Bulk filter and census
// ============================================================================

#[test]
fn test_filter_pattern_compiles_and_matches() {
    let pattern = to_filter_pattern(&["com.app.*"]).unwrap();
    let regex = Regex::new(&pattern).expect("filter pattern should compile");

    assert!(regex.is_match("com.app.A"));
    assert!(!regex.is_match("com.other.A"));
}

#[test]
fn test_filter_and_classifier_can_disagree() {
    // The filter scans for a match anywhere; the classifier compares packages.
    let filter = FilterPattern::new(&["com.app.*"]).unwrap();
    let classifier = BoundaryClassifier::from_patterns(&["com.app.*"]).unwrap();

    assert!(filter.is_match("com.app.ui.View"));
    assert!(classifier.is_library("com.app.ui.View"));

    assert!(filter.is_match("org.shaded.com.app.X"));
    assert!(classifier.is_library("org.shaded.com.app.X"));
}

#[test]
fn test_census_counts_application_classes() {
    let index = VecIndex::new(["Lcom/app/A;", "Ljava/lang/Object;"], Vec::<String>::new());
    let census = ReferenceCensus::from_patterns(&["com.app.*"]).unwrap();
    assert_eq!(census.count_application_classes(&index), 1);
}

#[test]
fn test_census_is_recomputed_per_call() {
    let mut index = VecIndex::new(["Lcom/app/A;"], ["Lcom/app/A;->run()V"]);
    let census = ReferenceCensus::from_patterns(&["com.app.**"]).unwrap();
    assert_eq!(census.count_application_classes(&index), 1);

    index.classes.push("Lcom/app/deep/B;".to_string());
    assert_eq!(census.count_application_classes(&index), 2);
    assert_eq!(census.count_application_methods(&index), 1);
}
