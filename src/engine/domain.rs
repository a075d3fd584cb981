use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Category assigned to scraped work the parser could not classify.
pub const DEFAULT_CATEGORY: &str = "other";

/// Effective per-category weight fractions after group expansion.
pub type CategoryWeights = BTreeMap<String, f64>;

/// Population statistics for an exam's score distribution, scraped from
/// the course page when published. Required for z-score clobbering on
/// both source and target assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamStats {
    pub mean: f64,
    pub std_dev: f64,
    #[serde(default = "available_default")]
    pub is_available: bool,
}

fn available_default() -> bool {
    true
}

impl ExamStats {
    /// Statistics are usable for z-score math only with a positive spread.
    pub fn usable(&self) -> bool {
        self.is_available && self.std_dev > 0.0
    }
}

/// Record of a score replacement, attached to the replacement assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClobberProvenance {
    pub policy: String,
    pub source_assignment: String,
    pub original_points: Option<f64>,
    pub adjusted_points: f64,
}

/// One scraped assignment, normalized by the external parser.
///
/// `is_graded` implies `is_submitted`; `earned_points` and `max_points`
/// are defined together or not at all when graded. The engine never
/// mutates a record in place: score clobbering produces a replacement
/// copy carrying `clobber` provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub due_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_submitted: bool,
    #[serde(default)]
    pub is_graded: bool,
    #[serde(default)]
    pub earned_points: Option<f64>,
    #[serde(default)]
    pub max_points: Option<f64>,
    #[serde(default)]
    pub exam_stats: Option<ExamStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clobber: Option<ClobberProvenance>,
}

impl Assignment {
    /// Ungraded, unsubmitted assignment in the default category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            due_at: None,
            is_submitted: false,
            is_graded: false,
            earned_points: None,
            max_points: None,
            exam_stats: None,
            clobber: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Fraction earned of the maximum, when both points are present.
    pub fn percentage(&self) -> Option<f64> {
        match (self.earned_points, self.max_points) {
            (Some(earned), Some(max)) if max > 0.0 => Some(earned / max),
            _ => None,
        }
    }

    pub fn usable_stats(&self) -> Option<&ExamStats> {
        self.exam_stats.as_ref().filter(|stats| stats.usable())
    }
}

/// Category-to-assignment index over a fixed assignment slice. Rebuilt by
/// the pipeline whenever a policy replaces the assignment list.
#[derive(Debug, Default)]
pub struct CategoryIndex {
    by_category: BTreeMap<String, Vec<usize>>,
}

impl CategoryIndex {
    pub fn build(assignments: &[Assignment]) -> Self {
        let mut by_category: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, assignment) in assignments.iter().enumerate() {
            by_category
                .entry(assignment.category.clone())
                .or_default()
                .push(position);
        }
        Self { by_category }
    }

    /// Positions of the category's assignments; empty when the category is
    /// absent.
    pub fn positions(&self, category: &str) -> &[usize] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: &str) -> usize {
        self.positions(category).len()
    }
}
