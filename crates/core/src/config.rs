//! Configuration management for the Folio backend.
//!
//! Configuration is assembled in layers, later layers winning:
//! - Built-in defaults
//! - Optional YAML config file (`folio.yaml` or `FOLIO_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Everything is resolved once at startup and is fixed for the lifetime of
//! the process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "folio.yaml";

const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["openai", "hashing"];
const KNOWN_STORE_BACKENDS: [&str; 2] = ["astra", "memory"];
const KNOWN_LLM_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// A credential read from the environment. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw credential.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Config file this configuration was read from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    pub server: ServerSettings,
    pub corpus: CorpusSettings,
    pub embedding: EmbeddingSettings,
    pub store: StoreSettings,
    pub llm: LlmSettings,
    pub retrieval: RetrievalSettings,
    pub prompt: PromptSettings,
    pub logging: LoggingSettings,

    /// Resolved from `embedding.api_key_env`
    #[serde(skip)]
    pub embedding_api_key: Option<Secret>,

    /// Resolved from `llm.api_key_env`
    #[serde(skip)]
    pub llm_api_key: Option<Secret>,

    /// Resolved from `store.token_env`
    #[serde(skip)]
    pub store_token: Option<Secret>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to listen on
    pub bind: String,

    /// The single browser origin allowed by CORS
    pub cors_origin: String,

    /// Upper bound for a whole chat request
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Location of the project corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub path: PathBuf,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/projects.json"),
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Provider name: "openai" or "hashing"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Override for the provider's API base URL
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    pub timeout_secs: u64,

    /// Maximum texts per embedding request while indexing
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            batch_size: 100,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Backend name: "astra" or "memory"
    pub backend: String,

    /// Collection holding the indexed projects
    pub collection: String,

    /// Astra keyspace
    pub keyspace: String,

    /// Astra Data API endpoint, e.g. `https://<id>-<region>.apps.astra.datastax.com`
    pub api_endpoint: Option<String>,

    /// Environment variable holding the application token
    pub token_env: String,

    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: "astra".to_string(),
            collection: "projects".to_string(),
            keyspace: "default_keyspace".to_string(),
            api_endpoint: None,
            token_env: "ASTRA_DB_APPLICATION_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider name: "openai" or "ollama"
    pub provider: String,

    pub model: String,

    /// Override for the provider's API base URL
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,

    pub max_tokens: Option<u32>,

    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of nearest documents fed to the prompt
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Prompt settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// YAML prompt definition replacing the built-in grounding prompt
    pub template_file: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level or filter directive
    pub level: Option<String>,
    pub color: bool,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: None,
            color: true,
            json: false,
        }
    }
}

/// Command-line overrides applied on top of file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub corpus: Option<PathBuf>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from the config file and the process environment.
    ///
    /// When `config_file` is `None`, `FOLIO_CONFIG` is consulted, then
    /// `folio.yaml` in the working directory. An explicitly named file must
    /// exist; the implicit one is optional.
    ///
    /// Environment variables:
    /// - `FOLIO_CONFIG`: Path to config file
    /// - `FOLIO_BIND`, `FOLIO_CORS_ORIGIN`, `FOLIO_CORPUS`
    /// - `FOLIO_EMBEDDING_PROVIDER`, `FOLIO_STORE`, `FOLIO_LLM_PROVIDER`, `FOLIO_LLM_MODEL`
    /// - `FOLIO_TOP_K`
    /// - `OPENAI_BASE_URL`: base URL for both OpenAI services
    /// - `ASTRA_DB_API_ENDPOINT`, or `ASTRA_DB_ID` + `ASTRA_DB_REGION`
    /// - API keys through the `*_env` names (default `OPENAI_API_KEY`, `ASTRA_DB_APPLICATION_TOKEN`)
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use folio_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Corpus: {:?}", config.corpus.path);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an explicit environment lookup.
    pub fn load_with<F>(config_file: Option<&Path>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| env("FOLIO_CONFIG").map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                Self::from_yaml_file(&path)?
            }
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::from_yaml_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(&env)?;
        Ok(config)
    }

    /// Read a YAML config file. Missing sections and fields keep their defaults.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config: AppConfig = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.config_file = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment variables over the current values and resolve secrets.
    fn apply_env<F>(&mut self, env: &F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = env("FOLIO_BIND") {
            self.server.bind = bind;
        }
        if let Some(origin) = env("FOLIO_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Some(corpus) = env("FOLIO_CORPUS") {
            self.corpus.path = PathBuf::from(corpus);
        }
        if let Some(provider) = env("FOLIO_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }
        if let Some(backend) = env("FOLIO_STORE") {
            self.store.backend = backend;
        }
        if let Some(provider) = env("FOLIO_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = env("FOLIO_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(top_k) = env("FOLIO_TOP_K") {
            self.retrieval.top_k = top_k.trim().parse().map_err(|_| {
                AppError::Config(format!("FOLIO_TOP_K must be a positive integer, got '{}'", top_k))
            })?;
        }

        if let Some(base_url) = env("OPENAI_BASE_URL") {
            if self.embedding.provider == "openai" && self.embedding.base_url.is_none() {
                self.embedding.base_url = Some(base_url.clone());
            }
            if self.llm.provider == "openai" && self.llm.base_url.is_none() {
                self.llm.base_url = Some(base_url);
            }
        }

        if let Some(endpoint) = env("ASTRA_DB_API_ENDPOINT") {
            self.store.api_endpoint = Some(endpoint);
        } else if self.store.api_endpoint.is_none() {
            if let (Some(id), Some(region)) = (env("ASTRA_DB_ID"), env("ASTRA_DB_REGION")) {
                self.store.api_endpoint = Some(astra_endpoint(&id, &region));
            }
        }

        if let Some(level) = env("RUST_LOG") {
            self.logging.level = Some(level);
        }
        if env("NO_COLOR").is_some() {
            self.logging.color = false;
        }

        self.embedding_api_key = env(&self.embedding.api_key_env)
            .filter(|v| !v.is_empty())
            .map(Secret::new);
        self.llm_api_key = env(&self.llm.api_key_env)
            .filter(|v| !v.is_empty())
            .map(Secret::new);
        self.store_token = env(&self.store.token_env)
            .filter(|v| !v.is_empty())
            .map(Secret::new);

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over file and environment.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }

        if let Some(corpus) = overrides.corpus {
            self.corpus.path = corpus;
        }

        if let Some(level) = overrides.log_level {
            self.logging.level = Some(level);
        }

        if overrides.verbose {
            // Verbose mode implies debug logging
            if self.logging.level.is_none() {
                self.logging.level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.logging.color = false;
        }

        if overrides.log_json {
            self.logging.json = true;
        }

        self
    }

    /// Validate configuration before any service is constructed.
    pub fn validate(&self) -> AppResult<()> {
        check_known("embedding provider", &self.embedding.provider, &KNOWN_EMBEDDING_PROVIDERS)?;
        check_known("store backend", &self.store.backend, &KNOWN_STORE_BACKENDS)?;
        check_known("LLM provider", &self.llm.provider, &KNOWN_LLM_PROVIDERS)?;

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(AppError::Config(
                "embedding.batch_size must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "retrieval.top_k must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AppError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.store.collection.trim().is_empty() {
            return Err(AppError::Config(
                "store.collection cannot be empty".to_string(),
            ));
        }

        if self.embedding.provider == "openai" && self.embedding_api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                self.embedding.api_key_env
            )));
        }

        if self.llm.provider == "openai" && self.llm_api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                self.llm.api_key_env
            )));
        }

        if self.store.backend == "astra" {
            if self.store.api_endpoint.is_none() {
                return Err(AppError::Config(
                    "Astra endpoint not configured. Set ASTRA_DB_API_ENDPOINT or ASTRA_DB_ID and ASTRA_DB_REGION"
                        .to_string(),
                ));
            }
            if self.store_token.is_none() {
                return Err(AppError::Config(format!(
                    "Astra token not found in environment variable: {}",
                    self.store.token_env
                )));
            }
        }

        Ok(())
    }
}

/// Build the Astra Data API endpoint from a database id and region.
pub fn astra_endpoint(db_id: &str, region: &str) -> String {
    format!("https://{}-{}.apps.astra.datastax.com", db_id, region)
}

fn check_known(what: &str, value: &str, known: &[&str]) -> AppResult<()> {
    if known.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "Unknown {}: {}. Supported: {}",
            what,
            value,
            known.join(", ")
        )))
    }
}
