use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::CourseConfig;
use crate::engine::domain::{Assignment, CategoryIndex};
use crate::engine::grading::{weighted_grade, GradeSummary};
use crate::engine::groups::effective_weights;
use crate::engine::pipeline::{run_policies, PipelineReport};
use crate::engine::validation::{validate_config, ValidationReport};
use crate::store::{CourseConfigStore, CourseId, StoreError};

/// Projection for one course: the pipeline report plus the grade computed
/// from its output.
#[derive(Debug, Clone, Serialize)]
pub struct GradeProjection {
    pub course: CourseId,
    #[serde(skip)]
    pub report: PipelineReport,
    pub grade: GradeSummary,
}

/// Error raised by the projection service.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no configuration saved for course '{0}'")]
    MissingConfig(String),
    #[error("configuration rejected: {}", errors.join("; "))]
    InvalidConfig { errors: Vec<String> },
}

/// Service composing the config store, validator, policy pipeline, and
/// grade calculator.
pub struct GradeProjectionService<S> {
    store: Arc<S>,
}

impl<S> GradeProjectionService<S>
where
    S: CourseConfigStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate and persist a course configuration. Validation errors
    /// block the save and are returned all at once; a valid save still
    /// surfaces any warnings.
    pub fn save_config(
        &self,
        course: &CourseId,
        config: CourseConfig,
    ) -> Result<ValidationReport, ProjectionError> {
        let report = validate_config(&config);
        if !report.is_valid() {
            return Err(ProjectionError::InvalidConfig {
                errors: report.errors,
            });
        }
        self.store.save(course, config)?;
        Ok(report)
    }

    /// Run the saved configuration against freshly scraped assignments.
    pub fn project(
        &self,
        course: &CourseId,
        assignments: &[Assignment],
    ) -> Result<GradeProjection, ProjectionError> {
        let config = self
            .store
            .fetch(course)?
            .ok_or_else(|| ProjectionError::MissingConfig(course.0.clone()))?;

        let categories = CategoryIndex::build(assignments);
        let weights = effective_weights(&config.weights, &categories);
        let report = run_policies(assignments, &weights, &config.policies);
        let grade = weighted_grade(&report.assignments, &report.weights, &report.keep_best);

        debug!(
            course = %course.0,
            applied = report.applied.len(),
            failures = report.failures.len(),
            weight_sum = report.weight_sum(),
            "projected course grade"
        );

        Ok(GradeProjection {
            course: course.clone(),
            report,
            grade,
        })
    }
}
