//! Synthesis Integration Tests
//!
//! End-to-end behavior of `ReportEngine::synthesize` with scripted generators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use execbrief::adapters::{
    GenerationOutput, Generator, GeneratorLoader, LoadRetryPolicy, ModelCell, SamplingConfig,
};
use execbrief::core::format::build_fallback;
use execbrief::core::{
    normalize, ReportEngine, SynthesisError, FALLBACK_ANALYSIS_TEMPLATE,
    STRATEGIC_INSIGHTS_TEMPLATE,
};
use execbrief::domain::{Category, ReportOptions, ReportPath, ReportRequest, SizeTier};
use execbrief::extract::Vocabulary;

/// Generator returning a fixed reply and recording what it was asked
struct ScriptedGenerator {
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
    last_prompt: Mutex<Option<String>>,
    last_max_tokens: AtomicUsize,
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        _sampling: &SamplingConfig,
    ) -> Result<GenerationOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.last_max_tokens
            .store(max_output_tokens as usize, Ordering::SeqCst);

        match &self.reply {
            Ok(text) => Ok(GenerationOutput::new(text.clone())),
            Err(message) => anyhow::bail!("{}", message),
        }
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

struct ScriptedLoader {
    generator: Option<Arc<ScriptedGenerator>>,
    loads: Arc<AtomicUsize>,
}

#[async_trait]
impl GeneratorLoader for ScriptedLoader {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn load(&self) -> Result<Arc<dyn Generator>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.generator {
            Some(generator) => Ok(Arc::clone(generator) as Arc<dyn Generator>),
            None => anyhow::bail!("model weights not found"),
        }
    }
}

struct Harness {
    engine: ReportEngine,
    generator: Option<Arc<ScriptedGenerator>>,
    calls: Arc<AtomicUsize>,
    loads: Arc<AtomicUsize>,
}

fn harness(reply: Option<Result<&str, &str>>) -> Harness {
    let calls = Arc::new(AtomicUsize::new(0));
    let loads = Arc::new(AtomicUsize::new(0));

    let generator = reply.map(|reply| {
        Arc::new(ScriptedGenerator {
            reply: reply.map(str::to_string).map_err(str::to_string),
            calls: Arc::clone(&calls),
            last_prompt: Mutex::new(None),
            last_max_tokens: AtomicUsize::new(0),
        })
    });

    let cell = ModelCell::new(
        ScriptedLoader {
            generator: generator.clone(),
            loads: Arc::clone(&loads),
        },
        LoadRetryPolicy::default(),
    );
    let engine = ReportEngine::new(&Vocabulary::default(), Arc::new(cell)).unwrap();

    Harness {
        engine,
        generator,
        calls,
        loads,
    }
}

const NARRATIVE: &str = "The rollout is on track across regions. Training lags behind plan. \
                         Budget remains within the approved envelope.";

#[tokio::test]
async fn test_list_metrics_produce_chart() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = "Progress: - Data migration: 85% concluded - User training: 40% concluded\n\
                   The rollout continues across all regional offices during this quarter.";

    let result = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Medium))
        .await
        .unwrap();

    assert_eq!(result.path, ReportPath::Generated);

    let metrics: Vec<(&str, u8)> = result
        .facts
        .metrics
        .iter()
        .map(|m| (m.label.as_str(), m.value))
        .collect();
    assert_eq!(metrics, vec![("Data migration", 85), ("User training", 40)]);

    let chart = result.chart.expect("chart with two metrics");
    assert_eq!(chart.chart_type, "bar");
    assert_eq!(chart.values, vec![85, 40]);
    assert_eq!(chart.labels, vec!["Data migration", "User training"]);
}

#[tokio::test]
async fn test_generated_report_layout() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = "Status: In Progress\n\
                   Owner: Maria Souza\n\
                   Deployment reached 60% of the planned sites by 15/03/2024.\n\
                   Migration work continues. Migration risks are tracked weekly.";

    let result = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Short))
        .await
        .unwrap();

    let narrative = &result.narrative;
    assert!(narrative.starts_with("## Analysis"));
    assert!(narrative.contains(
        "The rollout is on track across regions. Training lags behind plan.\n\nBudget"
    ));
    assert!(narrative.contains("## Data & Information"));
    assert!(narrative.contains("- **Status**: In Progress"));
    assert!(narrative.contains("- **Responsible**: Maria Souza"));
    assert!(narrative.contains("- 15/03/2024"));
    assert!(narrative.contains("**60%**"));
    assert!(narrative.contains(STRATEGIC_INSIGHTS_TEMPLATE));
    assert!(result.themes.contains(&"Migration".to_string()));
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_first_status_line_wins() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = "Status: In Progress\n\
                   The team met on Monday to review the deliverables and the budget.\n\
                   Status: Done";

    let result = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Medium))
        .await
        .unwrap();

    let statuses: Vec<&str> = result
        .facts
        .categories
        .iter()
        .filter(|f| f.category == Category::Status)
        .map(|f| f.value.as_str())
        .collect();
    assert_eq!(statuses, vec!["In Progress"]);
    assert!(!result.narrative.contains("Done"));
}

#[tokio::test]
async fn test_twelve_dates_are_dropped() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content: String = (1..=12)
        .map(|d| format!("Milestone review scheduled for {:02}/03/2024.\n", d))
        .collect();

    let result = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Medium))
        .await
        .unwrap();

    assert!(result.facts.dates.is_empty());
    assert!(!result.narrative.contains("### Dates"));
}

#[tokio::test]
async fn test_short_input_never_reaches_the_model() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = "x".repeat(49);

    let err = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Medium))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SynthesisError::InputTooShort {
            actual: 49,
            minimum: 50
        }
    );
    assert_eq!(h.loads.load(Ordering::SeqCst), 0);
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

const SEVEN_SENTENCES: &str = "First sentence about revenue. Second sentence about costs. \
     Third sentence about hiring. Fourth sentence about suppliers. Fifth sentence about risks. \
     Sixth sentence about the roadmap. Seventh sentence about governance.";

#[tokio::test]
async fn test_failing_generator_yields_identical_fallback() {
    let h = harness(Some(Err("out of memory")));
    let request = ReportRequest::new(SEVEN_SENTENCES, SizeTier::Medium);

    let first = h.engine.synthesize(&request).await.unwrap();
    let second = h.engine.synthesize(&request).await.unwrap();

    assert_eq!(first.path, ReportPath::Fallback);
    assert!(first.is_fallback());
    assert_eq!(first.narrative, second.narrative);
    assert_eq!(first.narrative, build_fallback(&normalize(SEVEN_SENTENCES), None));

    assert!(first.narrative.contains("Fifth sentence about risks."));
    assert!(!first.narrative.contains("Sixth sentence"));
    assert!(first.narrative.contains(FALLBACK_ANALYSIS_TEMPLATE));

    // loaded once, called on every request
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_model_load_failure_falls_back() {
    let h = harness(None);
    let request =
        ReportRequest::new(SEVEN_SENTENCES, SizeTier::Medium).with_focus("Focus on supplier risk");

    let first = h.engine.synthesize(&request).await.unwrap();
    let second = h.engine.synthesize(&request).await.unwrap();

    assert!(first.is_fallback());
    assert!(first.narrative.ends_with("Focus on supplier risk"));
    assert_eq!(first.narrative, second.narrative);
    // second request arrives inside the backoff window
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_blank_generation_falls_back() {
    let h = harness(Some(Ok("   \n  ")));
    let result = h
        .engine
        .synthesize(&ReportRequest::new(SEVEN_SENTENCES, SizeTier::Medium))
        .await
        .unwrap();

    assert!(result.is_fallback());
    assert!(!result.narrative.trim().is_empty());
}

#[tokio::test]
async fn test_chart_requires_two_metrics() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = "- Data migration: 85% concluded\n\
                   The remaining workstreams have not reported any figures yet this month.";

    let result = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Medium))
        .await
        .unwrap();

    assert_eq!(result.facts.metrics.len(), 1);
    assert!(result.chart.is_none());
}

#[tokio::test]
async fn test_options_disable_chart_and_insights() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = "- Data migration: 85% concluded\n- User training: 40% concluded\n\
                   Both workstreams report to the steering committee.";
    let options = ReportOptions {
        include_chart: false,
        include_insights: false,
    };

    let result = h
        .engine
        .synthesize(&ReportRequest::new(content, SizeTier::Medium).with_options(options))
        .await
        .unwrap();

    assert_eq!(result.facts.metrics.len(), 2);
    assert!(result.chart.is_none());
    assert!(!result.narrative.contains("## Strategic Insights"));
    assert!(!result.narrative.contains("## Next Actions"));
}

#[tokio::test]
async fn test_prompt_carries_tier_budget_and_focus() {
    let h = harness(Some(Ok(NARRATIVE)));
    let request = ReportRequest::new(SEVEN_SENTENCES, SizeTier::Long).with_focus("Compare with Q2");

    h.engine.synthesize(&request).await.unwrap();

    let generator = h.generator.as_ref().unwrap();
    assert_eq!(
        generator.last_max_tokens.load(Ordering::SeqCst),
        SizeTier::Long.max_output_tokens() as usize
    );
    let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains(SizeTier::Long.verbosity()));
    assert!(prompt.contains("Seventh sentence about governance."));
    assert!(prompt.trim_end().ends_with("Compare with Q2"));
}

#[tokio::test]
async fn test_content_is_truncated_to_tier_budget() {
    let h = harness(Some(Ok(NARRATIVE)));
    let content = format!("{} TAILMARKER", "word ".repeat(1_000));

    h.engine
        .synthesize(&ReportRequest::new(content, SizeTier::VeryShort))
        .await
        .unwrap();

    let generator = h.generator.as_ref().unwrap();
    let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
    assert!(!prompt.contains("TAILMARKER"));
}
