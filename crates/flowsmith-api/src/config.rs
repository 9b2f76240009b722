use config::{Config as ConfigLoader, ConfigError, Environment, File};
use flowsmith_llm::{OpenAIConfig, ProviderConfig};
use flowsmith_types::{EngineConfig, LLMConfig};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for one request, streaming included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// OpenAI-compatible endpoint; the public API when unset
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl From<&LlmConfig> for LLMConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (FLOWSMITH_SERVER__PORT, FLOWSMITH_ENGINE__MAX_VISITS, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 3. Environment variables override everything
            .add_source(
                Environment::with_prefix("FLOWSMITH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Provider settings for the chat client
    pub fn provider(&self) -> ProviderConfig {
        let mut openai = OpenAIConfig::new(self.openai_api_key.clone());
        if let Some(base_url) = &self.llm.base_url {
            openai = openai.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.llm.request_timeout_secs {
            openai = openai.with_timeout_secs(secs);
        }
        ProviderConfig::from_openai(openai)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsmith_llm::config::ProviderDetails;
    use flowsmith_types::{ConditionParsing, IterationCapPolicy};

    const TOML: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [llm]
        model = "gpt-4o-mini"
        temperature = 0.2
        base_url = "http://localhost:11434/v1"

        [engine]
        max_iterations = 4
        iteration_cap_policy = "fail"

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 300);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, None);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_engine_section_fills_defaults() {
        let config: Config = toml::from_str(TOML).unwrap();

        assert_eq!(config.engine.max_iterations, 4);
        assert_eq!(config.engine.max_visits, 50);
        assert_eq!(config.engine.iteration_cap_policy, IterationCapPolicy::Fail);
        assert_eq!(config.engine.condition_parsing, ConditionParsing::Lenient);
    }

    #[test]
    fn test_llm_config_conversion() {
        let config: Config = toml::from_str(TOML).unwrap();
        let llm: LLMConfig = (&config.llm).into();

        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.temperature, Some(0.2));
    }

    #[test]
    fn test_provider_carries_base_url() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.openai_api_key = "sk-test".to_string();

        let ProviderDetails::OpenAI(openai) = config.provider().details;
        assert_eq!(openai.api_key, "sk-test");
        assert_eq!(openai.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(openai.timeout_secs, None);
    }

    #[test]
    fn test_default_toml_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = Config::from_file(path).unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.openai_api_key.is_empty());
    }
}
