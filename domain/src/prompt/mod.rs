//! Prompt templates for the summary, formatting and narration stages

mod template;

pub use template::PromptTemplate;
