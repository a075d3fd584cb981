use super::common::*;
use crate::config::{
    CategoryGroup, ClobberMode, DistributionMethod, PolicyRule, RedistributeCondition,
    WeightEntry, WeightScheme,
};
use crate::engine::validation::{validate_policies, validate_weights};

fn flat_scheme(entries: &[(&str, f64)]) -> WeightScheme {
    WeightScheme {
        entries: entries
            .iter()
            .map(|(category, weight)| WeightEntry::Flat {
                category: category.to_string(),
                weight: *weight,
            })
            .collect(),
    }
}

fn group(name: &str, categories: &[&str], total_weight: f64) -> CategoryGroup {
    CategoryGroup {
        name: name.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        total_weight,
        distribution_method: DistributionMethod::Equal,
    }
}

#[test]
fn best_of_count_zero_is_rejected() {
    let scheme = flat_scheme(&[("homework", 1.0)]);
    let policies = vec![policy(
        "drop none",
        "homework",
        PolicyRule::BestOf { count: 0 },
    )];

    let report = validate_policies(&policies, &scheme);

    assert!(!report.is_valid());
    assert!(report
        .errors
        .iter()
        .any(|error| error.contains("best_of") && error.contains("count")));
}

#[test]
fn empty_targets_are_rejected() {
    let scheme = flat_scheme(&[("midterm2", 0.2), ("project", 0.1)]);
    let policies = vec![
        policy(
            "no targets",
            "midterm2",
            PolicyRule::Redistribute {
                condition: RedistributeCondition::NoSubmissions,
                target_categories: Vec::new(),
            },
        ),
        policy(
            "also no targets",
            "project",
            PolicyRule::RequireOne {
                target_categories: Vec::new(),
                failure_weight: 0.0,
            },
        ),
    ];

    let report = validate_policies(&policies, &scheme);

    assert_eq!(report.errors.len(), 2);
    assert!(report
        .errors
        .iter()
        .all(|error| error.contains("target category")));
}

#[test]
fn unknown_source_category_is_a_warning_not_an_error() {
    let scheme = flat_scheme(&[("homework", 1.0)]);
    let policies = vec![policy(
        "future category",
        "extra_credit",
        PolicyRule::BestOf { count: 2 },
    )];

    let report = validate_policies(&policies, &scheme);

    assert!(report.is_valid());
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.contains("extra_credit")));
}

#[test]
fn partial_clobber_requires_percentage_in_range() {
    let scheme = flat_scheme(&[("final", 0.4), ("midterm", 0.2)]);
    let make = |percentage| {
        vec![policy(
            "partial",
            "final",
            PolicyRule::ZScoreClobber {
                target_categories: vec!["midterm".to_string()],
                mode: ClobberMode::Partial,
                percentage,
            },
        )]
    };

    assert!(!validate_policies(&make(None), &scheme).is_valid());
    assert!(!validate_policies(&make(Some(0.0)), &scheme).is_valid());
    assert!(!validate_policies(&make(Some(1.5)), &scheme).is_valid());
    assert!(validate_policies(&make(Some(1.0)), &scheme).is_valid());
    assert!(validate_policies(&make(Some(0.25)), &scheme).is_valid());
}

#[test]
fn z_score_always_warns_about_exam_statistics() {
    let scheme = flat_scheme(&[("final", 0.4), ("midterm", 0.2)]);
    let policies = vec![policy(
        "clobber",
        "final",
        PolicyRule::ZScoreClobber {
            target_categories: vec!["midterm".to_string()],
            mode: ClobberMode::Full,
            percentage: None,
        },
    )];

    let report = validate_policies(&policies, &scheme);

    assert!(report.is_valid());
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.contains("exam statistics")));
}

#[test]
fn category_in_two_groups_is_rejected() {
    let scheme = WeightScheme {
        entries: vec![
            WeightEntry::Group(group("labs a", &["lab", "studio"], 0.3)),
            WeightEntry::Group(group("labs b", &["lab"], 0.2)),
        ],
    };

    let report = validate_weights(&scheme);

    assert!(!report.is_valid());
    assert!(report
        .errors
        .iter()
        .any(|error| error.contains("'lab'") && error.contains("group")));
}

#[test]
fn flat_weight_and_group_membership_are_exclusive() {
    let scheme = WeightScheme {
        entries: vec![
            WeightEntry::Flat {
                category: "lab".to_string(),
                weight: 0.2,
            },
            WeightEntry::Group(group("labs", &["lab", "studio"], 0.3)),
        ],
    };

    let report = validate_weights(&scheme);

    assert!(!report.is_valid());
    assert!(report
        .errors
        .iter()
        .any(|error| error.contains("flat weight") && error.contains("'labs'")));
}

#[test]
fn group_total_weight_must_be_a_fraction() {
    let scheme = WeightScheme {
        entries: vec![WeightEntry::Group(group("exams", &["midterm"], 1.4))],
    };
    assert!(!validate_weights(&scheme).is_valid());

    let scheme = WeightScheme {
        entries: vec![WeightEntry::Group(group("exams", &["midterm"], 0.0))],
    };
    assert!(!validate_weights(&scheme).is_valid());
}

#[test]
fn empty_group_is_rejected() {
    let scheme = WeightScheme {
        entries: vec![WeightEntry::Group(group("exams", &[], 0.5))],
    };

    let report = validate_weights(&scheme);

    assert!(!report.is_valid());
    assert!(report
        .errors
        .iter()
        .any(|error| error.contains("no categories")));
}

#[test]
fn duplicate_flat_category_is_rejected() {
    let scheme = flat_scheme(&[("homework", 0.4), ("homework", 0.2)]);

    let report = validate_weights(&scheme);

    assert!(!report.is_valid());
}

#[test]
fn duplicate_policy_names_only_warn() {
    let scheme = flat_scheme(&[("homework", 1.0)]);
    let policies = vec![
        policy("dup", "homework", PolicyRule::BestOf { count: 2 }),
        policy("dup", "homework", PolicyRule::BestOf { count: 3 }),
    ];

    let report = validate_policies(&policies, &scheme);

    assert!(report.is_valid());
    assert!(report.warnings.iter().any(|warning| warning.contains("dup")));
}
