use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use terminal_core::TerminalError;
use tracing::{debug, instrument};

use crate::synthesizer::{build_user_prompt, AnswerSynthesizer, NO_ANSWER, SYSTEM_PROMPT};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIClient {
    pub fn new() -> Result<Self, TerminalError> {
        // async-openai reads OPENAI_API_KEY from env automatically
        let config = OpenAIConfig::default();
        let client = Client::with_config(config);

        Ok(Self {
            client,
            model: "gpt-4o-mini".to_string(),
        })
    }

    pub fn with_api_key(api_key: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: "gpt-4o-mini".to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer a question using only the retrieved listings
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn answer_from_listings(
        &self,
        question: &str,
        documents: &[String],
    ) -> Result<String, TerminalError> {
        if documents.is_empty() {
            debug!("No listings retrieved, skipping completion");
            return Ok(NO_ANSWER.to_string());
        }

        let user_prompt = build_user_prompt(question, documents);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| TerminalError::internal(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(|e| TerminalError::internal(e.to_string()))?
                    .into(),
            ])
            .temperature(0.2)
            .max_tokens(400u32)
            .build()
            .map_err(|e| TerminalError::internal(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TerminalError::api(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| TerminalError::parse("No response from OpenAI"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl AnswerSynthesizer for OpenAIClient {
    async fn synthesize(&self, query: &str, context: &[String]) -> Result<String, TerminalError> {
        self.answer_from_listings(query, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_context_short_circuits() {
        let client = OpenAIClient::with_api_key("unused");
        let answer = client.synthesize("Anything about the Fed?", &[]).await.unwrap();
        assert_eq!(answer, NO_ANSWER);
    }

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_answer_from_listings() {
        let client = OpenAIClient::new().expect("client").with_model("gpt-4o-mini");
        let answer = client
            .synthesize(
                "What does Kalshi price a March rate cut at?",
                &["Product: Fed cuts rates in March?\nPrice: 0.18\nSite: Kalshi".to_string()],
            )
            .await
            .expect("Failed to synthesize answer");
        assert!(!answer.is_empty());
    }

    #[test]
    fn test_with_model() {
        let client = OpenAIClient::with_api_key("unused").with_model("gpt-4o");
        assert_eq!(client.model(), "gpt-4o");
    }
}
