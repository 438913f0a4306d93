//! Priming questionnaire and preference merging

pub mod preferences;
pub mod questions;

pub use preferences::{PreferenceAnswers, is_unconstrained, merge_answers};
pub use questions::{PrimingQuestion, QuestionOption, priming_questions};
