//! The grade-policy evaluation engine: domain records, single-policy
//! evaluation, the ordered pipeline, group expansion, validation, and the
//! weighted-grade projection.

pub mod domain;
mod evaluator;
pub mod grading;
pub mod groups;
pub mod pipeline;
pub mod validation;

#[cfg(test)]
mod tests;

pub use evaluator::{apply_policy, EvaluationError, PolicyEffect};
