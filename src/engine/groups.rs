use serde::Serialize;

use crate::config::{CategoryGroup, DistributionMethod, WeightEntry, WeightScheme};

use super::domain::{CategoryIndex, CategoryWeights};

/// One grouped category's share of its group's weight bucket, for UI
/// breakdowns and grade computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub weight: f64,
    pub assignments: usize,
}

/// Split a group's total weight across its member categories.
///
/// Equal split counts every member in the denominator, including
/// categories with no assignments yet. Proportional split follows
/// assignment counts and falls back to equal when the group has no
/// assignments at all.
pub fn group_shares(group: &CategoryGroup, categories: &CategoryIndex) -> Vec<CategoryShare> {
    if group.categories.is_empty() {
        return Vec::new();
    }

    let counts: Vec<usize> = group
        .categories
        .iter()
        .map(|category| categories.count(category))
        .collect();
    let total_assignments: usize = counts.iter().sum();

    let equal_share = group.total_weight / group.categories.len() as f64;

    group
        .categories
        .iter()
        .zip(counts)
        .map(|(category, count)| {
            let weight = match group.distribution_method {
                DistributionMethod::Equal => equal_share,
                DistributionMethod::Proportional if total_assignments == 0 => equal_share,
                DistributionMethod::Proportional => {
                    group.total_weight * count as f64 / total_assignments as f64
                }
            };
            CategoryShare {
                category: category.clone(),
                weight,
                assignments: count,
            }
        })
        .collect()
}

/// Expand a weight scheme into effective per-category weights: flat
/// entries pass through, group buckets are split across their members.
pub fn effective_weights(scheme: &WeightScheme, categories: &CategoryIndex) -> CategoryWeights {
    let mut weights = CategoryWeights::new();
    for entry in &scheme.entries {
        match entry {
            WeightEntry::Flat { category, weight } => {
                weights.insert(category.clone(), *weight);
            }
            WeightEntry::Group(group) => {
                for share in group_shares(group, categories) {
                    weights.insert(share.category, share.weight);
                }
            }
        }
    }
    weights
}
