use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClobberPolicy;

use super::domain::{Assignment, CategoryIndex, CategoryWeights};
use super::evaluator::{apply_policy, EvaluationError, PolicyEffect};

/// Log entry for a policy that fired, for display in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPolicy {
    pub name: String,
    pub kind: &'static str,
    pub description: String,
}

/// A policy whose evaluation failed; siblings are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyFailure {
    pub policy: String,
    pub error: EvaluationError,
}

/// Outcome of running the full policy list.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub weights: CategoryWeights,
    pub assignments: Vec<Assignment>,
    pub applied: Vec<AppliedPolicy>,
    /// Per-category keep-best-N signals for the grade calculator.
    pub keep_best: BTreeMap<String, usize>,
    pub failures: Vec<PolicyFailure>,
}

impl PipelineReport {
    /// Post-pipeline sum of effective weights, so callers can detect drift
    /// when several weight-moving policies fire together.
    pub fn weight_sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// Apply every enabled policy in list order, threading adjusted weights
/// and possibly-replaced assignments forward. Categories are re-indexed
/// after any assignment replacement so later policies see clobbered
/// grades. A failing policy is logged and skipped; the rest still run.
pub fn run_policies(
    assignments: &[Assignment],
    weights: &CategoryWeights,
    policies: &[ClobberPolicy],
) -> PipelineReport {
    let mut report = PipelineReport {
        weights: weights.clone(),
        assignments: assignments.to_vec(),
        applied: Vec::new(),
        keep_best: BTreeMap::new(),
        failures: Vec::new(),
    };
    if policies.is_empty() {
        return report;
    }

    let mut categories = CategoryIndex::build(&report.assignments);

    for policy in policies.iter().filter(|policy| policy.enabled) {
        match apply_policy(policy, &report.assignments, &categories, &report.weights) {
            Ok(PolicyEffect::Skipped) => {}
            Ok(PolicyEffect::Reweighted {
                weights,
                description,
            }) => {
                debug!(policy = %policy.name, %description, "policy adjusted weights");
                report.weights = weights;
                report.applied.push(AppliedPolicy {
                    name: policy.name.clone(),
                    kind: policy.rule.label(),
                    description,
                });
            }
            Ok(PolicyEffect::KeepBest {
                category,
                count,
                description,
            }) => {
                debug!(policy = %policy.name, %description, "policy flagged keep-best");
                report.keep_best.insert(category, count);
                report.applied.push(AppliedPolicy {
                    name: policy.name.clone(),
                    kind: policy.rule.label(),
                    description,
                });
            }
            Ok(PolicyEffect::Clobbered {
                assignments,
                improved,
                description,
            }) => {
                debug!(
                    policy = %policy.name,
                    improved = improved.len(),
                    %description,
                    "policy clobbered scores"
                );
                report.assignments = assignments;
                categories = CategoryIndex::build(&report.assignments);
                report.applied.push(AppliedPolicy {
                    name: policy.name.clone(),
                    kind: policy.rule.label(),
                    description,
                });
            }
            Err(error) => {
                warn!(policy = %policy.name, %error, "policy evaluation failed; continuing");
                report.failures.push(PolicyFailure {
                    policy: policy.name.clone(),
                    error,
                });
            }
        }
    }

    report
}
