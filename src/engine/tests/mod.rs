mod common;
mod grading;
mod validation;
