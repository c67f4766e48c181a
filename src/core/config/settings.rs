use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::paths::AppPaths;

/// Runtime configuration, read from `config.yml` with `CODESMITH_*`
/// environment overrides applied on top.
///
/// A missing file means defaults. A malformed file logs a warning and falls
/// back to defaults; only the knowledge snapshot is allowed to fail startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub embedding: EndpointSettings,
    pub generation: EndpointSettings,
    pub retrieval: RetrievalSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
}

/// One OpenAI-compatible endpoint: where it lives, which model to ask for,
/// and how long to wait. The default base URL is LM Studio's local server,
/// which exposes chat and embeddings on the same port.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Snippets per query; the generator caps this at the corpus size.
    pub top_k: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings::default(),
            embedding: EndpointSettings {
                model: "text-embedding-nomic-embed-text-v1.5".to_string(),
                ..EndpointSettings::default()
            },
            generation: EndpointSettings {
                model: "qwen2.5-coder-7b-instruct".to_string(),
                timeout_secs: 120,
                ..EndpointSettings::default()
            },
            retrieval: RetrievalSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings { port: 8000 }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        EndpointSettings {
            base_url: "http://127.0.0.1:1234".to_string(),
            model: String::new(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        RetrievalSettings { top_k: 3 }
    }
}

impl Settings {
    pub fn load(paths: &AppPaths) -> Self {
        let mut settings = read_file(&config_path(paths));
        settings.apply_env();
        settings
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var("PORT") {
            if let Ok(port) = value.parse() {
                self.server.port = port;
            }
        }
        if let Ok(value) = env::var("CODESMITH_EMBEDDING_URL") {
            self.embedding.base_url = value;
        }
        if let Ok(value) = env::var("CODESMITH_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Ok(value) = env::var("CODESMITH_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(value);
        }
        if let Ok(value) = env::var("CODESMITH_GENERATION_URL") {
            self.generation.base_url = value;
        }
        if let Ok(value) = env::var("CODESMITH_GENERATION_MODEL") {
            self.generation.model = value;
        }
        if let Ok(value) = env::var("CODESMITH_GENERATION_API_KEY") {
            self.generation.api_key = Some(value);
        }
        if let Ok(value) = env::var("CODESMITH_TOP_K") {
            if let Ok(top_k) = value.parse() {
                self.retrieval.top_k = top_k;
            }
        }
    }
}

fn config_path(paths: &AppPaths) -> PathBuf {
    if let Ok(path) = env::var("CODESMITH_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    let user_config = paths.data_dir.join("config.yml");
    if user_config.exists() {
        return user_config;
    }

    paths.project_root.join("config.yml")
}

fn read_file(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("Ignoring malformed {}: {}", path.display(), err);
                Settings::default()
            }
        },
        Err(err) => {
            tracing::warn!("Could not read {}: {}", path.display(), err);
            Settings::default()
        }
    }
}
