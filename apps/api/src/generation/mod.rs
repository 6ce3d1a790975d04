//! Resume-driven question generation pipeline.
//!
//! Flow: extract document text → structured resume extraction + skill
//! unification → duplicate check / persist → prompt synthesis → LLM call →
//! response parsing. Orchestrated by `generator::generate_questions`.

pub mod document;
pub mod duplicate;
pub mod generator;
pub mod handlers;
pub mod json_span;
pub mod prompt_builder;
pub mod prompts;
pub mod resume_parser;
pub mod response_parser;
