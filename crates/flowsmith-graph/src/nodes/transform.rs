use crate::service::TextGenerator;
use anyhow::Result;
use std::sync::Arc;

/// Placeholder replaced by the current value inside a prompt template
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// System instruction used when a node has no prompt
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// Turns a prompt template and the current value into a new value
#[derive(Clone)]
pub struct TransformInvoker {
    generator: Arc<dyn TextGenerator>,
}

impl TransformInvoker {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// One service call. The reply is returned verbatim.
    pub async fn apply(&self, prompt_template: &str, input: &str) -> Result<String> {
        let system_instruction = Self::render(prompt_template, input);
        self.generator.generate(&system_instruction, input).await
    }

    pub fn render(prompt_template: &str, input: &str) -> String {
        if prompt_template.trim().is_empty() {
            return DEFAULT_SYSTEM_INSTRUCTION.to_string();
        }
        prompt_template.replace(INPUT_PLACEHOLDER, input)
    }
}
