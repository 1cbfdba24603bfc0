//! Prompt templates for probability-estimation queries

pub mod template;

pub use template::{PromptTemplate, SystemPromptKind};
