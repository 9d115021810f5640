//! # Canvass Common Library
//!
//! Shared code for the Canvass survey service including:
//! - Database models and queries
//! - Event types (SurveyEvent enum)
//! - Configuration loading
//! - Error taxonomy
//! - Report compilation

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod report;

pub use error::{Error, Result};
pub use models::{Answer, Question, QuestionKind, Survey, SurveyResponse};
