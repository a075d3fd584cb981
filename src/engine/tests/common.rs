use std::collections::BTreeMap;

use crate::config::{ClobberPolicy, PolicyRule};
use crate::engine::domain::{Assignment, CategoryWeights, ExamStats};

pub(super) fn ungraded(name: &str, category: &str) -> Assignment {
    Assignment::new(name).with_category(category)
}

pub(super) fn submitted(name: &str, category: &str) -> Assignment {
    let mut assignment = ungraded(name, category);
    assignment.is_submitted = true;
    assignment
}

pub(super) fn graded(name: &str, category: &str, earned: f64, max: f64) -> Assignment {
    let mut assignment = submitted(name, category);
    assignment.is_graded = true;
    assignment.earned_points = Some(earned);
    assignment.max_points = Some(max);
    assignment
}

pub(super) fn exam(
    name: &str,
    category: &str,
    earned: Option<f64>,
    max: f64,
    mean: f64,
    std_dev: f64,
) -> Assignment {
    let mut assignment = match earned {
        Some(points) => graded(name, category, points, max),
        None => {
            let mut a = ungraded(name, category);
            a.max_points = Some(max);
            a
        }
    };
    assignment.exam_stats = Some(ExamStats {
        mean,
        std_dev,
        is_available: true,
    });
    assignment
}

pub(super) fn weights(entries: &[(&str, f64)]) -> CategoryWeights {
    entries
        .iter()
        .map(|(category, weight)| (category.to_string(), *weight))
        .collect::<BTreeMap<_, _>>()
}

pub(super) fn policy(name: &str, source: &str, rule: PolicyRule) -> ClobberPolicy {
    ClobberPolicy {
        name: name.to_string(),
        source_category: source.to_string(),
        enabled: true,
        rule,
    }
}

pub(super) fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}
