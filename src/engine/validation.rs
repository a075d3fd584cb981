//! Structural and semantic validation of course configuration.
//!
//! Pure and total: validation never fails, it reports. Errors block
//! saving (caller responsibility); warnings are advisory. Field presence
//! and enum membership are already enforced by the typed model at
//! deserialization time, so the checks here cover the semantic rules.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::{ClobberMode, ClobberPolicy, CourseConfig, PolicyRule, WeightEntry, WeightScheme};

/// Accumulated validation outcome for display all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Validate the full persisted configuration for one course.
pub fn validate_config(config: &CourseConfig) -> ValidationReport {
    let mut report = validate_weights(&config.weights);
    report.merge(validate_policies(&config.policies, &config.weights));
    report
}

/// Validate policy definitions against the weight scheme.
pub fn validate_policies(policies: &[ClobberPolicy], scheme: &WeightScheme) -> ValidationReport {
    let mut report = ValidationReport::default();
    let known = scheme.known_categories();
    let mut seen_names = BTreeSet::new();

    for policy in policies {
        let label = policy.rule.label();

        if !seen_names.insert(policy.name.as_str()) {
            report.warning(format!(
                "duplicate policy name '{}'; both entries will run",
                policy.name
            ));
        }
        if !known.contains(policy.source_category.as_str()) {
            report.warning(format!(
                "policy '{}' sources category '{}' which carries no weight yet",
                policy.name, policy.source_category
            ));
        }

        match &policy.rule {
            PolicyRule::Redistribute {
                target_categories, ..
            } => {
                if target_categories.is_empty() {
                    report.error(format!(
                        "{label} policy '{}' must list at least one target category",
                        policy.name
                    ));
                }
            }
            PolicyRule::RequireOne {
                target_categories,
                failure_weight,
            } => {
                if target_categories.is_empty() {
                    report.error(format!(
                        "{label} policy '{}' must list at least one target category",
                        policy.name
                    ));
                }
                if !failure_weight.is_finite() || *failure_weight < 0.0 {
                    report.error(format!(
                        "require_one policy '{}' has a negative or non-finite failure weight",
                        policy.name
                    ));
                }
            }
            PolicyRule::BestOf { count } => {
                if *count < 1 {
                    report.error(format!(
                        "best_of policy '{}' needs a count of at least 1",
                        policy.name
                    ));
                }
            }
            PolicyRule::ZScoreClobber {
                target_categories,
                mode,
                percentage,
            } => {
                if target_categories.is_empty() {
                    report.error(format!(
                        "z_score_clobber policy '{}' must list at least one target category",
                        policy.name
                    ));
                }
                if *mode == ClobberMode::Partial {
                    match percentage {
                        Some(value) if *value > 0.0 && *value <= 1.0 => {}
                        Some(value) => report.error(format!(
                            "z_score_clobber policy '{}' has percentage {value} outside (0, 1]",
                            policy.name
                        )),
                        None => report.error(format!(
                            "z_score_clobber policy '{}' uses partial mode but sets no percentage",
                            policy.name
                        )),
                    }
                }
                report.warning(format!(
                    "z_score_clobber policy '{}' needs exam statistics on both source and target assignments; \
                     this is only checkable at evaluation time",
                    policy.name
                ));
            }
        }
    }

    report
}

/// Validate the weight scheme itself: fraction ranges, group shape, and
/// category exclusivity across entries.
pub fn validate_weights(scheme: &WeightScheme) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut flat_seen = BTreeSet::new();
    let mut group_membership: BTreeMap<&str, &str> = BTreeMap::new();

    for entry in &scheme.entries {
        match entry {
            WeightEntry::Flat { category, weight } => {
                if !flat_seen.insert(category.as_str()) {
                    report.error(format!("category '{category}' has more than one flat weight"));
                }
                if !weight.is_finite() || *weight < 0.0 || *weight > 1.0 {
                    report.error(format!(
                        "category '{category}' weight {weight} is outside [0, 1]"
                    ));
                }
            }
            WeightEntry::Group(group) => {
                if group.categories.is_empty() {
                    report.error(format!("group '{}' lists no categories", group.name));
                }
                if !group.total_weight.is_finite()
                    || group.total_weight <= 0.0
                    || group.total_weight > 1.0
                {
                    report.error(format!(
                        "group '{}' total weight {} is outside (0, 1]",
                        group.name, group.total_weight
                    ));
                }
                for category in &group.categories {
                    if let Some(previous) =
                        group_membership.insert(category.as_str(), group.name.as_str())
                    {
                        report.error(format!(
                            "category '{category}' belongs to both group '{previous}' and group '{}'",
                            group.name
                        ));
                    }
                }
            }
        }
    }

    for category in flat_seen {
        if let Some(group) = group_membership.get(category) {
            report.error(format!(
                "category '{category}' has a flat weight and belongs to group '{group}'"
            ));
        }
    }

    report
}
