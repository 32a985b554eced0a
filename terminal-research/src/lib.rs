//! Answer Synthesis for Prediction Market Questions
//!
//! This crate turns the listings returned by retrieval into a natural-language
//! answer, using OpenAI chat completions constrained to the retrieved context.

pub mod openai;
pub mod synthesizer;

pub use openai::OpenAIClient;
pub use synthesizer::{
    build_context, build_user_prompt, AnswerSynthesizer, CONTEXT_SEPARATOR, NO_ANSWER,
};
