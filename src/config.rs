//! Configuration for execbrief.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (EXECBRIEF_HOME, EXECBRIEF_MODEL_URL, EXECBRIEF_MODEL,
//!    EXECBRIEF_API_KEY)
//! 2. Config file (.execbrief/config.yaml)
//! 3. Defaults (~/.execbrief, local Ollama endpoint)
//!
//! Config file discovery:
//! - Searches current directory and parents for .execbrief/config.yaml
//! - Paths in the config file are relative to the .execbrief/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::{BackendKind, GeneratorSettings, LoadRetryPolicy, SamplingConfig};
use crate::extract::Vocabulary;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".execbrief";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub version: Option<String>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
    #[serde(default)]
    pub model_load: Option<LoadRetryPolicy>,
    /// YAML file replacing the built-in extraction vocabulary
    pub vocabulary_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .execbrief/)
    pub home: Option<String>,
    /// Report history file (relative to .execbrief/)
    pub history: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorConfig {
    pub backend: Option<BackendKind>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub command: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
    pub sampling: Option<SamplingConfig>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Report history JSON file
    pub history: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub generator: GeneratorSettings,
    pub model_load: LoadRetryPolicy,
    pub vocabulary_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// The extraction vocabulary: the configured file, or the built-in one
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        match &self.vocabulary_file {
            Some(path) => Vocabulary::from_file(path),
            None => Ok(Vocabulary::default()),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge file values and environment overrides over the defaults
fn resolve(
    file: ConfigFile,
    config_file: Option<PathBuf>,
    default_home: PathBuf,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let config_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);
    let relative = |value: &str| match &config_dir {
        Some(dir) => resolve_path(dir, value),
        None => PathBuf::from(value),
    };

    let home = env("EXECBRIEF_HOME")
        .map(PathBuf::from)
        .or_else(|| file.paths.home.as_deref().map(&relative))
        .unwrap_or(default_home);

    let history = file
        .paths
        .history
        .as_deref()
        .map(&relative)
        .unwrap_or_else(|| home.join("history.json"));

    let defaults = GeneratorSettings::default();
    let section = file.generator.unwrap_or_default();
    let generator = GeneratorSettings {
        backend: section.backend.unwrap_or(defaults.backend),
        base_url: env("EXECBRIEF_MODEL_URL")
            .or(section.base_url)
            .unwrap_or(defaults.base_url),
        model: env("EXECBRIEF_MODEL")
            .or(section.model)
            .unwrap_or(defaults.model),
        api_key: env("EXECBRIEF_API_KEY").or(section.api_key),
        command: section
            .command
            .filter(|argv| !argv.is_empty())
            .unwrap_or(defaults.command),
        timeout_seconds: section.timeout_seconds.unwrap_or(defaults.timeout_seconds),
        sampling: section.sampling.unwrap_or(defaults.sampling),
    };

    ResolvedConfig {
        home,
        history,
        config_file,
        generator,
        model_load: file.model_load.unwrap_or_default(),
        vocabulary_file: file.vocabulary_file.as_deref().map(&relative),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let config_file = find_config_file();
    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    Ok(resolve(file, config_file, default_home, |key| {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the report history path
pub fn history_path() -> Result<PathBuf> {
    Ok(config()?.history.clone())
}
