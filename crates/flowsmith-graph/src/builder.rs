use std::sync::Arc;
use anyhow::{Result, anyhow};

use flowsmith_llm::ChatClient;
use flowsmith_types::{EngineConfig, LLMConfig};

use crate::engine::Engine;
use crate::service::{ChatGenerator, TextGenerator};

/// Builder for constructing an Engine with optional components
pub struct EngineBuilder {
    generator: Option<Arc<dyn TextGenerator>>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            generator: None,
            config: EngineConfig::default(),
        }
    }

    /// Set the text generator every node delegates to
    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Use a chat client as the text generator
    pub fn chat_client(self, client: Arc<dyn ChatClient>, llm_config: LLMConfig) -> Self {
        self.generator(Arc::new(ChatGenerator::new(client, llm_config)))
    }

    /// Set the engine limits
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the Engine
    pub fn build(self) -> Result<Engine> {
        let generator = self.generator
            .ok_or_else(|| anyhow!("Text generator is required"))?;

        Ok(Engine::new(generator, self.config))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
