use serde::{Deserialize, Serialize};

/// What a repeat node does when its condition still holds after the last
/// permitted iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IterationCapPolicy {
    /// Treat the cap as normal loop completion
    #[default]
    Stop,
    /// Abort the run with `LimitExceeded`
    Fail,
}

/// How a condition verdict is read from the model's reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionParsing {
    /// Only "true" (trimmed, any case) is true; anything else is false
    #[default]
    Lenient,
    /// "true" or "false" (trimmed, any case); anything else fails the run
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Node processing events allowed per run, branch recursion included
    pub max_visits: usize,
    /// Iterations allowed per repeat-node activation
    pub max_iterations: usize,
    pub iteration_cap_policy: IterationCapPolicy,
    pub condition_parsing: ConditionParsing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_visits: 50,
            max_iterations: 10,
            iteration_cap_policy: IterationCapPolicy::default(),
            condition_parsing: ConditionParsing::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_visits(mut self, max: usize) -> Self {
        self.max_visits = max;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_iteration_cap_policy(mut self, policy: IterationCapPolicy) -> Self {
        self.iteration_cap_policy = policy;
        self
    }

    pub fn with_condition_parsing(mut self, parsing: ConditionParsing) -> Self {
        self.condition_parsing = parsing;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LLMConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self::new("gpt-4o")
    }
}
