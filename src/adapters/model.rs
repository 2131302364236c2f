//! Lazily loaded generator shared across requests.
//!
//! Lifecycle: uninitialized -> loading -> ready, or -> failed. Loading holds
//! the cell's lock, so concurrent callers wait for the one load in flight
//! instead of starting their own. The reported phase is kept apart from the
//! lock; only an actual load reports as loading. After a failure the next load is allowed
//! once the backoff delay for that attempt count has elapsed; callers arriving
//! earlier get [`ModelUnavailable::CoolingDown`] without touching the loader.

use std::sync::{Arc, Mutex as StdMutex, OnceLock};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::{BackendKind, CommandGenerator, Generator, GeneratorSettings, HttpGenerator};

/// Process-wide cell used by the CLI and by embedders that want one model
static SHARED_MODEL: OnceLock<Arc<ModelCell>> = OnceLock::new();

/// Builds a ready-to-use generator; may be slow
#[async_trait]
pub trait GeneratorLoader: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    async fn load(&self) -> Result<Arc<dyn Generator>>;
}

/// Loader driven by resolved configuration
pub struct BackendLoader {
    settings: GeneratorSettings,
}

impl BackendLoader {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl GeneratorLoader for BackendLoader {
    fn describe(&self) -> String {
        match self.settings.backend {
            BackendKind::Http => {
                format!("http {} ({})", self.settings.base_url, self.settings.model)
            }
            BackendKind::Command => format!("command {}", self.settings.command.join(" ")),
        }
    }

    async fn load(&self) -> Result<Arc<dyn Generator>> {
        let call_timeout = Duration::from_secs(self.settings.timeout_seconds);
        let generator: Arc<dyn Generator> = match self.settings.backend {
            BackendKind::Http => Arc::new(HttpGenerator::new(
                self.settings.base_url.clone(),
                self.settings.model.clone(),
                self.settings.api_key.clone(),
                call_timeout,
            )?),
            BackendKind::Command => {
                Arc::new(CommandGenerator::from_argv(&self.settings.command, call_timeout)?)
            }
        };

        generator.health_check().await?;
        Ok(generator)
    }
}

/// Backoff between load attempts after a failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRetryPolicy {
    /// Delay after the first failed load in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between load attempts in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Backoff multiplier (delay *= multiplier after each failure)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_initial_delay() -> u64 {
    1000
}
fn default_max_delay() -> u64 {
    60_000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for LoadRetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl LoadRetryPolicy {
    /// Delay to wait after `failures` consecutive failed loads
    pub fn delay_for_attempt(&self, failures: u32) -> Duration {
        if failures <= 1 {
            return Duration::from_millis(self.initial_delay_ms.min(self.max_delay_ms));
        }

        let delay =
            self.initial_delay_ms as f64 * self.backoff_multiplier.powi((failures - 1) as i32);
        let capped = delay.min(self.max_delay_ms as f64) as u64;
        Duration::from_millis(capped)
    }
}

/// Why no generator could be handed out
#[derive(Debug, Clone, Error)]
pub enum ModelUnavailable {
    #[error("Model load failed (attempt {attempts}): {message}")]
    LoadFailed { attempts: u32, message: String },

    #[error("Model unavailable after {attempts} failed load(s), retry in {retry_in:?}: {message}")]
    CoolingDown {
        attempts: u32,
        retry_in: Duration,
        message: String,
    },
}

/// Observable lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ModelStatus {
    Uninitialized,
    Loading,
    Ready,
    Failed { attempts: u32 },
}

enum LoadState {
    Uninitialized,
    Ready(Arc<dyn Generator>),
    Failed {
        attempts: u32,
        failed_at: Instant,
        message: String,
    },
}

/// Lazily initialized, shareable generator handle
pub struct ModelCell {
    loader: Box<dyn GeneratorLoader>,
    retry: LoadRetryPolicy,
    state: Mutex<LoadState>,
    phase: StdMutex<ModelStatus>,
}

impl ModelCell {
    pub fn new(loader: impl GeneratorLoader + 'static, retry: LoadRetryPolicy) -> Self {
        Self {
            loader: Box::new(loader),
            retry,
            state: Mutex::new(LoadState::Uninitialized),
            phase: StdMutex::new(ModelStatus::Uninitialized),
        }
    }

    fn set_phase(&self, phase: ModelStatus) {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = phase;
    }

    /// The process-wide cell, created from the first settings seen
    pub fn shared(settings: &GeneratorSettings, retry: &LoadRetryPolicy) -> Arc<ModelCell> {
        SHARED_MODEL
            .get_or_init(|| {
                Arc::new(ModelCell::new(
                    BackendLoader::new(settings.clone()),
                    retry.clone(),
                ))
            })
            .clone()
    }

    /// Return the loaded generator, loading it first if needed
    pub async fn get(&self) -> Result<Arc<dyn Generator>, ModelUnavailable> {
        let mut state = self.state.lock().await;

        let previous_failures = match &*state {
            LoadState::Ready(generator) => return Ok(Arc::clone(generator)),
            LoadState::Uninitialized => 0,
            LoadState::Failed {
                attempts,
                failed_at,
                message,
            } => {
                let wait = self.retry.delay_for_attempt(*attempts);
                let elapsed = failed_at.elapsed();
                if elapsed < wait {
                    return Err(ModelUnavailable::CoolingDown {
                        attempts: *attempts,
                        retry_in: wait - elapsed,
                        message: message.clone(),
                    });
                }
                warn!(attempts = *attempts, "Retrying model load after failure");
                *attempts
            }
        };

        let attempt = previous_failures + 1;
        let started = Instant::now();
        self.set_phase(ModelStatus::Loading);
        info!(attempt, loader = %self.loader.describe(), "Loading generator");

        match self.loader.load().await {
            Ok(generator) => {
                info!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    backend = generator.name(),
                    "Generator ready"
                );
                *state = LoadState::Ready(Arc::clone(&generator));
                self.set_phase(ModelStatus::Ready);
                Ok(generator)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(attempt, error = %message, "Generator failed to load");
                *state = LoadState::Failed {
                    attempts: attempt,
                    failed_at: Instant::now(),
                    message: message.clone(),
                };
                self.set_phase(ModelStatus::Failed { attempts: attempt });
                Err(ModelUnavailable::LoadFailed {
                    attempts: attempt,
                    message,
                })
            }
        }
    }

    /// Current phase
    pub fn status(&self) -> ModelStatus {
        let phase = *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if phase != ModelStatus::Loading {
            return phase;
        }

        // A free lock means the load in flight was cancelled with its caller
        match self.state.try_lock() {
            Err(_) => ModelStatus::Loading,
            Ok(state) => match &*state {
                LoadState::Uninitialized => ModelStatus::Uninitialized,
                LoadState::Ready(_) => ModelStatus::Ready,
                LoadState::Failed { attempts, .. } => ModelStatus::Failed {
                    attempts: *attempts,
                },
            },
        }
    }

    /// Drop any loaded generator or failure record
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = LoadState::Uninitialized;
        self.set_phase(ModelStatus::Uninitialized);
    }
}
