//! Policy-driven grade projection for scraped course assignments.
//!
//! The engine is a pure transformation: it takes a set of assignments, a
//! weight scheme, and an ordered list of clobber policies, and produces
//! adjusted category weights, a possibly-modified assignment set, and a
//! projected course grade. Inputs are never mutated in place; every
//! transformation returns replacement values, so callers can safely
//! re-invoke the engine on each configuration edit.

pub mod config;
pub mod engine;
pub mod service;
pub mod store;
pub mod telemetry;

pub use config::{
    CategoryGroup, ClobberMode, ClobberPolicy, ConfigParseError, CourseConfig,
    DistributionMethod, PolicyRule, RedistributeCondition, WeightEntry, WeightScheme,
};
pub use engine::domain::{
    Assignment, CategoryIndex, CategoryWeights, ClobberProvenance, ExamStats, DEFAULT_CATEGORY,
};
pub use engine::grading::{weighted_grade, CategoryGrade, GradeSummary};
pub use engine::groups::{effective_weights, group_shares, CategoryShare};
pub use engine::pipeline::{run_policies, AppliedPolicy, PipelineReport, PolicyFailure};
pub use engine::validation::{
    validate_config, validate_policies, validate_weights, ValidationReport,
};
pub use engine::{apply_policy, EvaluationError, PolicyEffect};
pub use service::{GradeProjection, GradeProjectionService, ProjectionError};
pub use store::{CourseConfigStore, CourseId, MemoryConfigStore, StoreError};
