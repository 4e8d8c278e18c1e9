//! Configuration system (layered: code > env > `.env` file).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use strum::{EnumIter, IntoEnumIterator};

use crate::error::{AgentError, Result};

/// Model used by the agent when neither the invocation nor `DEFAULT_MODEL` names one.
pub const FALLBACK_MODEL: &str = "openai:gpt-4o-mini";

/// A credential the drivers refuse to run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Credential {
    Tavily,
    OpenAi,
}

impl Credential {
    /// Environment variable that carries the credential.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Tavily => "TAVILY_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Key under which [`AgentConfig`] stores the credential.
    pub fn service(self) -> &'static str {
        match self {
            Self::Tavily => "tavily",
            Self::OpenAi => "openai",
        }
    }

    /// Instruction printed before the process exits on a missing credential.
    pub fn diagnostic(self) -> String {
        format!(
            "{} environment variable is not set.\n\
             Please set it in your .env file or export it in your shell.",
            self.env_var()
        )
    }

    /// All credentials, in the order they are checked.
    pub fn all() -> Vec<Credential> {
        Self::iter().collect()
    }
}

/// Layered configuration for the search agent.
///
/// Keys and base URLs are stored per service name (`tavily`, `openai`,
/// `openai-compatible`). Setters take `&self` so a config can be shared
/// between the search adapter and the model provider.
#[derive(Clone, Default)]
pub struct AgentConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    default_model: Arc<RwLock<Option<String>>>,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let services: Vec<String> = self
            .api_keys
            .read()
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("AgentConfig")
            .field("api_keys", &services)
            .field("base_urls", &self.base_urls)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl AgentConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let config = Self::new();

        let key_mappings = [
            ("TAVILY_API_KEY", "tavily"),
            ("OPENAI_API_KEY", "openai"),
            ("OPENAI_COMPAT_API_KEY", "openai-compatible"),
        ];
        for (env_var, service) in &key_mappings {
            if let Some(key) = non_empty_env(env_var) {
                config.set_api_key(service, key);
            }
        }

        let url_mappings = [
            ("TAVILY_BASE_URL", "tavily"),
            ("OPENAI_BASE_URL", "openai"),
            ("OPENAI_COMPAT_BASE_URL", "openai-compatible"),
        ];
        for (env_var, service) in &url_mappings {
            if let Some(url) = non_empty_env(env_var) {
                config.set_base_url(service, url);
            }
        }

        if let Some(model) = non_empty_env("DEFAULT_MODEL") {
            config.set_default_model(model);
        }

        config
    }

    pub fn set_api_key(&self, service: &str, key: String) {
        if let Ok(mut keys) = self.api_keys.write() {
            keys.insert(service.to_string(), key);
        }
    }

    pub fn get_api_key(&self, service: &str) -> Option<String> {
        self.api_keys.read().ok()?.get(service).cloned()
    }

    pub fn set_base_url(&self, service: &str, url: String) {
        if let Ok(mut urls) = self.base_urls.write() {
            urls.insert(service.to_string(), url);
        }
    }

    pub fn get_base_url(&self, service: &str) -> Option<String> {
        self.base_urls.read().ok()?.get(service).cloned()
    }

    pub fn set_default_model(&self, model: String) {
        if let Ok(mut slot) = self.default_model.write() {
            *slot = Some(model);
        }
    }

    /// Default model id, falling back to [`FALLBACK_MODEL`].
    pub fn default_model(&self) -> String {
        self.default_model
            .read()
            .ok()
            .and_then(|m| m.clone())
            .unwrap_or_else(|| FALLBACK_MODEL.to_string())
    }

    pub fn has_credential(&self, credential: Credential) -> bool {
        self.get_api_key(credential.service()).is_some()
    }

    /// First credential in `credentials` that is not configured.
    pub fn missing(&self, credentials: &[Credential]) -> Option<Credential> {
        credentials
            .iter()
            .copied()
            .find(|c| !self.has_credential(*c))
    }

    /// Fail on the first missing credential, in argument order.
    pub fn require(&self, credentials: &[Credential]) -> Result<()> {
        match self.missing(credentials) {
            Some(missing) => Err(AgentError::MissingCredential {
                var: missing.env_var(),
            }),
            None => Ok(()),
        }
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
