//! Model Lifecycle Integration Tests
//!
//! Lazy loading, single-flight under concurrency, and retry with backoff
//! after failed loads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use execbrief::adapters::{
    GenerationOutput, Generator, GeneratorLoader, LoadRetryPolicy, ModelCell, ModelStatus,
    ModelUnavailable, SamplingConfig,
};

struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(
        &self,
        prompt: &str,
        _max_output_tokens: u32,
        _sampling: &SamplingConfig,
    ) -> Result<GenerationOutput> {
        Ok(GenerationOutput::new(prompt.to_string()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Fails the first `failures` loads, then succeeds after `delay`
struct FlakyLoader {
    failures: usize,
    delay: Duration,
    loads: Arc<AtomicUsize>,
}

#[async_trait]
impl GeneratorLoader for FlakyLoader {
    fn describe(&self) -> String {
        "flaky".to_string()
    }

    async fn load(&self) -> Result<Arc<dyn Generator>> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if attempt <= self.failures {
            anyhow::bail!("load attempt {} failed", attempt);
        }
        Ok(Arc::new(EchoGenerator))
    }
}

fn cell(
    failures: usize,
    delay: Duration,
    retry: LoadRetryPolicy,
) -> (Arc<ModelCell>, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let cell = ModelCell::new(
        FlakyLoader {
            failures,
            delay,
            loads: Arc::clone(&loads),
        },
        retry,
    );
    (Arc::new(cell), loads)
}

fn no_backoff() -> LoadRetryPolicy {
    LoadRetryPolicy {
        initial_delay_ms: 0,
        max_delay_ms: 0,
        backoff_multiplier: 2.0,
    }
}

#[tokio::test]
async fn test_loads_lazily_and_once() {
    let (cell, loads) = cell(0, Duration::ZERO, LoadRetryPolicy::default());

    assert_eq!(cell.status(), ModelStatus::Uninitialized);
    assert_eq!(loads.load(Ordering::SeqCst), 0);

    let generator = cell.get().await.unwrap();
    assert_eq!(generator.name(), "echo");
    assert_eq!(cell.status(), ModelStatus::Ready);

    cell.get().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_load() {
    let (cell, loads) = cell(0, Duration::from_millis(50), LoadRetryPolicy::default());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cell = Arc::clone(&cell);
            tokio::spawn(async move { cell.get().await.map(|g| g.name().to_string()) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "echo");
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_status_reports_loading_while_in_flight() {
    let (cell, _loads) = cell(0, Duration::from_millis(200), LoadRetryPolicy::default());

    let pending = {
        let cell = Arc::clone(&cell);
        tokio::spawn(async move { cell.get().await.is_ok() })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cell.status(), ModelStatus::Loading);

    assert!(pending.await.unwrap());
    assert_eq!(cell.status(), ModelStatus::Ready);
}

#[tokio::test]
async fn test_failed_load_cools_down() {
    let retry = LoadRetryPolicy {
        initial_delay_ms: 60_000,
        ..Default::default()
    };
    let (cell, loads) = cell(usize::MAX, Duration::ZERO, retry);

    let first = cell.get().await;
    assert!(matches!(first, Err(ModelUnavailable::LoadFailed { attempts: 1, .. })));
    assert_eq!(cell.status(), ModelStatus::Failed { attempts: 1 });

    match cell.get().await {
        Err(ModelUnavailable::CoolingDown {
            attempts,
            retry_in,
            message,
        }) => {
            assert_eq!(attempts, 1);
            assert!(retry_in <= Duration::from_secs(60));
            assert!(message.contains("load attempt 1 failed"));
        }
        other => panic!("expected cooldown, got {:?}", other.map(|g| g.name().to_string())),
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retries_until_load_succeeds() {
    let (cell, loads) = cell(2, Duration::ZERO, no_backoff());

    assert!(matches!(
        cell.get().await,
        Err(ModelUnavailable::LoadFailed { attempts: 1, .. })
    ));
    assert!(matches!(
        cell.get().await,
        Err(ModelUnavailable::LoadFailed { attempts: 2, .. })
    ));
    assert_eq!(cell.status(), ModelStatus::Failed { attempts: 2 });

    assert!(cell.get().await.is_ok());
    assert_eq!(cell.status(), ModelStatus::Ready);
    assert_eq!(loads.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_allowed_after_backoff_elapses() {
    let retry = LoadRetryPolicy {
        initial_delay_ms: 30,
        max_delay_ms: 1_000,
        backoff_multiplier: 2.0,
    };
    let (cell, loads) = cell(1, Duration::ZERO, retry);

    assert!(cell.get().await.is_err());
    assert!(matches!(
        cell.get().await,
        Err(ModelUnavailable::CoolingDown { .. })
    ));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(cell.get().await.is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reset_forces_reload() {
    let (cell, loads) = cell(0, Duration::ZERO, LoadRetryPolicy::default());

    cell.get().await.unwrap();
    cell.reset().await;
    assert_eq!(cell.status(), ModelStatus::Uninitialized);

    cell.get().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}
