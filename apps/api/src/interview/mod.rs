// Interview core: catalog, session state, scoring, question generation, summary.
// All text-generation calls go through llm_client::TextGenerator — no direct HTTP here.

pub mod catalog;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod question_gen;
pub mod scoring;
pub mod service;
pub mod session;
pub mod summary;
