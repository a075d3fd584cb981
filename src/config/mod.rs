//! Persisted course configuration: weight scheme, category groups, and the
//! ordered clobber-policy list.
//!
//! Field names and tag layout match the browser extension's storage records
//! (camelCase keys, a `type` tag with a `config` payload per policy), so a
//! stored document can be deserialized directly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How a group's total weight is split across its member categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMethod {
    Equal,
    Proportional,
}

/// N categories sharing one weight bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub name: String,
    pub categories: Vec<String>,
    pub total_weight: f64,
    pub distribution_method: DistributionMethod,
}

/// A category's weight comes from exactly one entry kind: a flat fraction
/// or membership in a group. The split makes flat/grouped double counting
/// unrepresentable for a single entry; the validator still flags a category
/// named by both a flat entry and a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightEntry {
    #[serde(rename_all = "camelCase")]
    Flat { category: String, weight: f64 },
    Group(CategoryGroup),
}

/// Ordered weight entries for a course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightScheme {
    pub entries: Vec<WeightEntry>,
}

impl WeightScheme {
    pub fn flat_entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().filter_map(|entry| match entry {
            WeightEntry::Flat { category, weight } => Some((category.as_str(), *weight)),
            WeightEntry::Group(_) => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.entries.iter().filter_map(|entry| match entry {
            WeightEntry::Group(group) => Some(group),
            WeightEntry::Flat { .. } => None,
        })
    }

    /// Every category named by the scheme, flat or grouped.
    pub fn known_categories(&self) -> BTreeSet<&str> {
        let mut known = BTreeSet::new();
        for entry in &self.entries {
            match entry {
                WeightEntry::Flat { category, .. } => {
                    known.insert(category.as_str());
                }
                WeightEntry::Group(group) => {
                    known.extend(group.categories.iter().map(String::as_str));
                }
            }
        }
        known
    }
}

/// Firing condition for a redistribute policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedistributeCondition {
    NoSubmissions,
    NoGrades,
    AllZero,
}

/// Scaling mode for a z-score clobber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClobberMode {
    Full,
    Partial,
}

/// Type-specific policy payload. Closed set: adding a rule kind is a
/// compile-checked change everywhere the engine matches on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum PolicyRule {
    #[serde(rename_all = "camelCase")]
    Redistribute {
        condition: RedistributeCondition,
        target_categories: Vec<String>,
    },
    BestOf {
        count: usize,
    },
    #[serde(rename_all = "camelCase")]
    RequireOne {
        target_categories: Vec<String>,
        failure_weight: f64,
    },
    #[serde(rename_all = "camelCase")]
    ZScoreClobber {
        target_categories: Vec<String>,
        mode: ClobberMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        percentage: Option<f64>,
    },
}

impl PolicyRule {
    pub const fn label(&self) -> &'static str {
        match self {
            PolicyRule::Redistribute { .. } => "redistribute",
            PolicyRule::BestOf { .. } => "best_of",
            PolicyRule::RequireOne { .. } => "require_one",
            PolicyRule::ZScoreClobber { .. } => "z_score_clobber",
        }
    }
}

/// A named, user-authored conditional grading rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClobberPolicy {
    pub name: String,
    pub source_category: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub rule: PolicyRule,
}

fn enabled_default() -> bool {
    true
}

/// Everything the engine reads for one course. Policies are an ordered
/// list; list position is application order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseConfig {
    pub weights: WeightScheme,
    pub policies: Vec<ClobberPolicy>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("course configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CourseConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigParseError> {
        Ok(serde_json::to_string(self)?)
    }
}
