use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Assignment, CategoryWeights};

/// Per-category grade contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGrade {
    pub category: String,
    pub weight: f64,
    pub earned: f64,
    pub possible: f64,
    /// earned / possible for the counted assignments.
    pub percentage: f64,
    pub counted: usize,
    /// Graded assignments excluded by a keep-best policy.
    pub dropped: usize,
}

/// Weighted-average projection over the categories with graded work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSummary {
    /// None until at least one weighted category has a graded assignment.
    pub overall: Option<f64>,
    pub categories: Vec<CategoryGrade>,
    /// Sum of the weights actually counted, for drift visibility.
    pub weight_used: f64,
}

/// Compute the projected course grade from pipeline output.
///
/// Honors `keep_best` signals by selecting each category's top-N
/// assignments by percentage before averaging. Categories with no graded
/// work are excluded from both sides of the weighted average, so the
/// result is a grade-so-far projection rather than a floor.
pub fn weighted_grade(
    assignments: &[Assignment],
    weights: &CategoryWeights,
    keep_best: &BTreeMap<String, usize>,
) -> GradeSummary {
    let mut categories = Vec::new();
    let mut weighted_total = 0.0;
    let mut weight_used = 0.0;

    for (category, &weight) in weights {
        let mut scored: Vec<(f64, f64, f64)> = assignments
            .iter()
            .filter(|a| a.category == *category)
            .filter_map(|a| {
                let earned = a.earned_points?;
                let max = a.max_points?;
                let percentage = a.percentage()?;
                Some((percentage, earned, max))
            })
            .collect();
        if scored.is_empty() {
            continue;
        }

        let graded = scored.len();
        if let Some(&count) = keep_best.get(category) {
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
            scored.truncate(count);
        }

        let earned: f64 = scored.iter().map(|(_, earned, _)| earned).sum();
        let possible: f64 = scored.iter().map(|(_, _, max)| max).sum();
        if possible <= 0.0 {
            continue;
        }

        let percentage = earned / possible;
        weighted_total += percentage * weight;
        weight_used += weight;
        categories.push(CategoryGrade {
            category: category.clone(),
            weight,
            earned,
            possible,
            percentage,
            counted: scored.len(),
            dropped: graded - scored.len(),
        });
    }

    let overall = if weight_used > 0.0 {
        Some(weighted_total / weight_used)
    } else {
        None
    };

    GradeSummary {
        overall,
        categories,
        weight_used,
    }
}
