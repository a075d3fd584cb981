use crate::config::{ClobberMode, ClobberPolicy, PolicyRule, RedistributeCondition};

use super::domain::{Assignment, CategoryIndex, CategoryWeights, ClobberProvenance};

/// Result of evaluating one policy against the current course state.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyEffect {
    /// Firing condition was false; nothing to log.
    Skipped,
    /// Weight table replaced; assignment content untouched.
    Reweighted {
        weights: CategoryWeights,
        description: String,
    },
    /// Signal for the grade calculator to keep only the best `count`
    /// scores in `category`. No selection happens here.
    KeepBest {
        category: String,
        count: usize,
        description: String,
    },
    /// Assignment list replaced with clobbered copies; weights untouched.
    Clobbered {
        assignments: Vec<Assignment>,
        improved: Vec<String>,
        description: String,
    },
}

/// Runtime failure of a structurally well-formed policy. The pipeline
/// isolates these per policy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("policy '{policy}' lists no target categories")]
    NoTargets { policy: String },
    #[error("policy '{policy}' uses partial mode without a percentage")]
    MissingPercentage { policy: String },
}

/// Apply a single policy. Assumes structurally valid configuration; the
/// validator screens definitions before they are saved.
pub fn apply_policy(
    policy: &ClobberPolicy,
    assignments: &[Assignment],
    categories: &CategoryIndex,
    weights: &CategoryWeights,
) -> Result<PolicyEffect, EvaluationError> {
    match &policy.rule {
        PolicyRule::Redistribute {
            condition,
            target_categories,
        } => redistribute(policy, assignments, categories, weights, *condition, target_categories),
        PolicyRule::BestOf { count } => best_of(policy, assignments, categories, *count),
        PolicyRule::RequireOne {
            target_categories,
            failure_weight,
        } => require_one(policy, assignments, categories, weights, target_categories, *failure_weight),
        PolicyRule::ZScoreClobber {
            target_categories,
            mode,
            percentage,
        } => z_score_clobber(policy, assignments, categories, target_categories, *mode, *percentage),
    }
}

fn source_assignments<'a>(
    policy: &ClobberPolicy,
    assignments: &'a [Assignment],
    categories: &'a CategoryIndex,
) -> impl Iterator<Item = &'a Assignment> + 'a {
    categories
        .positions(&policy.source_category)
        .iter()
        .map(move |&position| &assignments[position])
}

fn redistribute(
    policy: &ClobberPolicy,
    assignments: &[Assignment],
    categories: &CategoryIndex,
    weights: &CategoryWeights,
    condition: RedistributeCondition,
    targets: &[String],
) -> Result<PolicyEffect, EvaluationError> {
    let source: Vec<&Assignment> = source_assignments(policy, assignments, categories).collect();

    let fires = match condition {
        RedistributeCondition::NoSubmissions => !source.iter().any(|a| a.is_submitted),
        RedistributeCondition::NoGrades => !source.iter().any(|a| a.is_graded),
        RedistributeCondition::AllZero => {
            let graded: Vec<&&Assignment> = source.iter().filter(|a| a.is_graded).collect();
            !graded.is_empty()
                && !graded
                    .iter()
                    .any(|a| a.earned_points.unwrap_or(0.0) > 0.0)
        }
    };
    if !fires {
        return Ok(PolicyEffect::Skipped);
    }

    let source_weight = weights
        .get(&policy.source_category)
        .copied()
        .unwrap_or(0.0);
    if source_weight <= 0.0 {
        return Ok(PolicyEffect::Skipped);
    }
    if targets.is_empty() {
        return Err(EvaluationError::NoTargets {
            policy: policy.name.clone(),
        });
    }

    // Even split; floating drift across shares is accepted.
    let share = source_weight / targets.len() as f64;
    let mut adjusted = weights.clone();
    adjusted.insert(policy.source_category.clone(), 0.0);
    for target in targets {
        *adjusted.entry(target.clone()).or_insert(0.0) += share;
    }

    let phrase = match condition {
        RedistributeCondition::NoSubmissions => "has no submissions",
        RedistributeCondition::NoGrades => "has no grades",
        RedistributeCondition::AllZero => "has only zero scores",
    };
    let description = format!(
        "{} {}; moved {:.1}% evenly to {}",
        policy.source_category,
        phrase,
        source_weight * 100.0,
        targets.join(", ")
    );

    Ok(PolicyEffect::Reweighted {
        weights: adjusted,
        description,
    })
}

fn best_of(
    policy: &ClobberPolicy,
    assignments: &[Assignment],
    categories: &CategoryIndex,
    count: usize,
) -> Result<PolicyEffect, EvaluationError> {
    let graded = source_assignments(policy, assignments, categories)
        .filter(|a| a.earned_points.is_some())
        .count();
    if graded <= count {
        return Ok(PolicyEffect::Skipped);
    }

    Ok(PolicyEffect::KeepBest {
        category: policy.source_category.clone(),
        count,
        description: format!(
            "keeping the best {count} of {graded} graded assignments in {}",
            policy.source_category
        ),
    })
}

fn require_one(
    policy: &ClobberPolicy,
    assignments: &[Assignment],
    categories: &CategoryIndex,
    weights: &CategoryWeights,
    targets: &[String],
    failure_weight: f64,
) -> Result<PolicyEffect, EvaluationError> {
    let any_graded = source_assignments(policy, assignments, categories).any(|a| a.is_graded);
    if any_graded {
        return Ok(PolicyEffect::Skipped);
    }
    if targets.is_empty() {
        return Err(EvaluationError::NoTargets {
            policy: policy.name.clone(),
        });
    }

    let source_weight = weights
        .get(&policy.source_category)
        .copied()
        .unwrap_or(0.0);
    let freed = (source_weight - failure_weight).max(0.0);
    let share = freed / targets.len() as f64;

    let mut adjusted = weights.clone();
    adjusted.insert(policy.source_category.clone(), failure_weight);
    for target in targets {
        *adjusted.entry(target.clone()).or_insert(0.0) += share;
    }

    Ok(PolicyEffect::Reweighted {
        weights: adjusted,
        description: format!(
            "{} has no graded assignments; {:.1}% moved to {}",
            policy.source_category,
            freed * 100.0,
            targets.join(", ")
        ),
    })
}

fn z_score_clobber(
    policy: &ClobberPolicy,
    assignments: &[Assignment],
    categories: &CategoryIndex,
    targets: &[String],
    mode: ClobberMode,
    percentage: Option<f64>,
) -> Result<PolicyEffect, EvaluationError> {
    if targets.is_empty() {
        return Err(EvaluationError::NoTargets {
            policy: policy.name.clone(),
        });
    }
    let scale = match mode {
        ClobberMode::Full => 1.0,
        ClobberMode::Partial => percentage.ok_or_else(|| EvaluationError::MissingPercentage {
            policy: policy.name.clone(),
        })?,
    };

    // Graded source exams with usable statistics, as (z-score, name).
    let source_scores: Vec<(f64, &str)> =
        source_assignments(policy, assignments, categories)
            .filter(|a| a.is_graded)
            .filter_map(|a| {
                let earned = a.earned_points?;
                let stats = a.usable_stats()?;
                Some(((earned - stats.mean) / stats.std_dev, a.name.as_str()))
            })
            .collect();

    let mut replaced = assignments.to_vec();
    let mut improved = Vec::new();

    for target_category in targets {
        for &position in categories.positions(target_category) {
            let target = &assignments[position];
            let Some(target_stats) = target.usable_stats() else {
                continue;
            };
            let Some(max_points) = target.max_points else {
                continue;
            };

            // Best clamped transplant across all source exams: clobbering
            // can only help, never penalize.
            let mut best: Option<(f64, &str)> = None;
            for &(z, source_name) in &source_scores {
                let transplanted = (z * scale * target_stats.std_dev + target_stats.mean)
                    .clamp(0.0, max_points);
                if best.map_or(true, |(score, _)| transplanted > score) {
                    best = Some((transplanted, source_name));
                }
            }
            let Some((score, source_name)) = best else {
                continue;
            };
            if target.earned_points.map_or(false, |earned| earned >= score) {
                continue;
            }

            let mut updated = target.clone();
            updated.clobber = Some(ClobberProvenance {
                policy: policy.name.clone(),
                source_assignment: source_name.to_string(),
                original_points: target.earned_points,
                adjusted_points: score,
            });
            updated.earned_points = Some(score);
            updated.is_graded = true;
            updated.is_submitted = true;
            replaced[position] = updated;
            improved.push(target.name.clone());
        }
    }

    if improved.is_empty() {
        return Ok(PolicyEffect::Skipped);
    }

    let description = format!(
        "raised {} assignment(s) in {} from {} exam scores",
        improved.len(),
        targets.join(", "),
        policy.source_category
    );
    Ok(PolicyEffect::Clobbered {
        assignments: replaced,
        improved,
        description,
    })
}
