use std::collections::BTreeMap;

use super::common::*;
use crate::engine::grading::weighted_grade;

#[test]
fn averages_categories_by_weight() {
    let assignments = vec![
        graded("hw 1", "homework", 9.0, 10.0),
        graded("hw 2", "homework", 7.0, 10.0),
        graded("final", "final", 75.0, 100.0),
    ];
    let table = weights(&[("homework", 0.4), ("final", 0.6)]);

    let summary = weighted_grade(&assignments, &table, &BTreeMap::new());

    // homework 16/20 = 0.8, final 0.75 -> 0.8 * 0.4 + 0.75 * 0.6 = 0.77
    let overall = summary.overall.expect("graded work present");
    assert!(approx(overall, 0.77));
    assert!(approx(summary.weight_used, 1.0));
}

#[test]
fn ungraded_categories_are_excluded_from_the_average() {
    let assignments = vec![
        graded("hw 1", "homework", 9.0, 10.0),
        ungraded("final", "final"),
    ];
    let table = weights(&[("homework", 0.4), ("final", 0.6)]);

    let summary = weighted_grade(&assignments, &table, &BTreeMap::new());

    assert!(approx(summary.overall.expect("homework graded"), 0.9));
    assert!(approx(summary.weight_used, 0.4));
    assert_eq!(summary.categories.len(), 1);
}

#[test]
fn keep_best_drops_the_lowest_scores() {
    let assignments = vec![
        graded("hw 1", "homework", 10.0, 10.0),
        graded("hw 2", "homework", 2.0, 10.0),
        graded("hw 3", "homework", 8.0, 10.0),
    ];
    let table = weights(&[("homework", 1.0)]);
    let mut keep_best = BTreeMap::new();
    keep_best.insert("homework".to_string(), 2);

    let summary = weighted_grade(&assignments, &table, &keep_best);

    // best two: 10/10 and 8/10 -> 18/20
    assert!(approx(summary.overall.expect("graded"), 0.9));
    let homework = &summary.categories[0];
    assert_eq!(homework.counted, 2);
    assert_eq!(homework.dropped, 1);
}

#[test]
fn no_graded_work_yields_no_grade() {
    let assignments = vec![ungraded("hw 1", "homework")];
    let table = weights(&[("homework", 1.0)]);

    let summary = weighted_grade(&assignments, &table, &BTreeMap::new());

    assert_eq!(summary.overall, None);
    assert!(summary.categories.is_empty());
}

#[test]
fn zero_weight_categories_count_for_nothing() {
    let assignments = vec![
        graded("dropped", "midterm2", 0.0, 100.0),
        graded("final", "final", 80.0, 100.0),
    ];
    let table = weights(&[("midterm2", 0.0), ("final", 0.5)]);

    let summary = weighted_grade(&assignments, &table, &BTreeMap::new());

    assert!(approx(summary.overall.expect("graded"), 0.8));
}
