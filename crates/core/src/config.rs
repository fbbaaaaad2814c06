//! Configuration management for wikiqa.
//!
//! Configuration is layered, lowest precedence first:
//! - Built-in defaults
//! - Config file (`wikiqa.yaml` or the path in `WIKIQA_CONFIG`)
//! - Environment variables
//! - Command-line flags (`with_overrides`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "wikiqa.yaml";

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "ollama"];

const DEFAULT_OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file the settings were merged from, if any
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("openai" or "ollama")
    pub provider: String,

    /// Model identifier used for both pipeline completions
    pub model: String,

    /// Explicit API key; wins over any provider `apiKeyEnv`
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations from the config file
    pub llm: Option<LlmConfig>,

    /// Knowledge source settings
    pub knowledge: KnowledgeConfig,
}

/// LLM section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
    },
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAI { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::OpenAI { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }
}

/// Knowledge source (MediaWiki Action API) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Action API endpoint, e.g. `https://en.wikipedia.org/w/api.php`
    #[serde(rename = "apiUrl")]
    pub api_url: String,

    /// Site root used to build `?curid=` fallback links
    #[serde(rename = "siteUrl")]
    pub site_url: String,

    /// User-Agent sent with every request
    #[serde(rename = "userAgent")]
    pub user_agent: String,

    /// Number of search results to fetch per question
    #[serde(rename = "topK")]
    pub top_k: u32,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            site_url: "https://en.wikipedia.org".to_string(),
            user_agent: format!("wikiqa/{} (question answering over Wikipedia)", env!("CARGO_PKG_VERSION")),
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    knowledge: Option<KnowledgeConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            knowledge: KnowledgeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file and environment.
    ///
    /// Environment variables:
    /// - `WIKIQA_CONFIG`: Path to config file
    /// - `WIKIQA_PROVIDER`: LLM provider
    /// - `WIKIQA_MODEL`: Model identifier
    /// - `WIKIQA_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use wikiqa_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Provider: {}", config.provider);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `config_file` instead of the default path.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| std::env::var("WIKIQA_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        // Environment variables override the config file
        if let Ok(provider) = std::env::var("WIKIQA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("WIKIQA_MODEL") {
            config.model = model;
        }

        if let Ok(key) = std::env::var("WIKIQA_API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut result = self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        result.config_file = Some(path.to_path_buf());

        Ok(result)
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(knowledge) = config_file.knowledge {
            result.knowledge = knowledge;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and the file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get a provider's configuration from the config file, if present.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider))
    }

    /// Custom endpoint configured for a provider.
    pub fn provider_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint())
            .map(str::to_string)
    }

    /// Whether a provider needs an API key to be usable.
    pub fn requires_api_key(provider: &str) -> bool {
        provider.eq_ignore_ascii_case("openai")
    }

    /// Environment variable holding the provider's API key.
    fn api_key_env(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => Some(api_key_env.clone()),
            Some(ProviderConfig::Ollama { .. }) => None,
            None if Self::requires_api_key(provider) => Some(DEFAULT_OPENAI_KEY_ENV.to_string()),
            None => None,
        }
    }

    /// Resolve the API key for a provider.
    ///
    /// `WIKIQA_API_KEY` / an explicit key wins, then the provider's
    /// `apiKeyEnv`, then `OPENAI_API_KEY` for the openai provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        self.api_key_env(provider)
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if Self::requires_api_key(&provider) && self.resolve_api_key(&provider).is_none() {
            let var = self
                .api_key_env(&provider)
                .unwrap_or_else(|| DEFAULT_OPENAI_KEY_ENV.to_string());
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                var
            )));
        }

        if self.knowledge.top_k == 0 {
            return Err(AppError::Config(
                "knowledge.topK must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
