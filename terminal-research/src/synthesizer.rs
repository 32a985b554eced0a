//! Answer synthesizer capability and prompt assembly

use async_trait::async_trait;
use terminal_core::TerminalError;

/// Separator placed between retrieved documents in the prompt context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Reply expected when the context does not answer the question
pub const NO_ANSWER: &str = "I could not find relevant information in the dataset.";

/// System prompt shared by chat-based synthesizers
pub(crate) const SYSTEM_PROMPT: &str = r#"You are a helpful assistant for a prediction market aggregator.
Answer the user's question based ONLY on the market listings provided in the context.
Each listing gives a product (the market question), its price, and the site it was scraped from.
If the context doesn't contain the answer, reply exactly: "I could not find relevant information in the dataset.""#;

/// Produces a free-text answer from a query and its ranked context documents
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(&self, query: &str, context: &[String]) -> Result<String, TerminalError>;
}

/// Join ranked documents into a single context block, best first
pub fn build_context(documents: &[String]) -> String {
    documents.join(CONTEXT_SEPARATOR)
}

/// User message carrying the context and the question
pub fn build_user_prompt(query: &str, documents: &[String]) -> String {
    format!(
        "CONTEXT:\n{}\n\nQUESTION:\n{}\n\nANSWER:",
        build_context(documents),
        query
    )
}
