use anyhow::{anyhow, Result};
use async_trait::async_trait;
use flowsmith_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use flowsmith_types::LLMConfig;
use std::sync::Arc;

/// The text-generation service every node delegates to
///
/// One call, one reply: `system_instruction` steers the model and
/// `user_message` is the text it works on.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_instruction: &str, user_message: &str) -> Result<String>;
}

/// `TextGenerator` backed by a chat completion client
pub struct ChatGenerator {
    client: Arc<dyn ChatClient>,
    llm_config: LLMConfig,
}

impl ChatGenerator {
    pub fn new(client: Arc<dyn ChatClient>, llm_config: LLMConfig) -> Self {
        Self { client, llm_config }
    }

    pub fn llm_config(&self) -> &LLMConfig {
        &self.llm_config
    }

    fn options(&self) -> ChatOptions {
        let mut options = ChatOptions::new();
        if let Some(temp) = self.llm_config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.llm_config.max_tokens {
            options = options.max_tokens(max_tokens);
        }
        options
    }
}

#[async_trait]
impl TextGenerator for ChatGenerator {
    async fn generate(&self, system_instruction: &str, user_message: &str) -> Result<String> {
        let request = ChatRequest::new(
            self.llm_config.model.clone(),
            vec![
                Message::system(system_instruction),
                Message::human(user_message),
            ],
        )
        .with_options(self.options());

        let response = self.client.chat(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.llm_config.model,
                total_tokens = usage.total_tokens,
                "Text generation completed"
            );
        }

        response
            .content
            .ok_or_else(|| anyhow!("Text generation returned no content"))
    }
}
