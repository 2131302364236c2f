//! Saved report history.
//!
//! Simple JSON file store kept outside the engine, which stays stateless.
//! Records carry the inputs of a run alongside the rendered report so it can
//! be listed, searched and reopened later.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::domain::{content_fingerprint, SizeTier};

/// History of saved reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportHistory {
    /// History format version
    pub version: u32,

    pub reports: Vec<SavedReport>,

    #[serde(skip)]
    path: PathBuf,
}

impl ReportHistory {
    /// Empty history bound to a file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            version: 1,
            reports: Vec::new(),
            path: path.into(),
        }
    }

    /// Load the history at `path`, or start an empty one if the file is absent
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self::new(path));
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read report history: {}", path.display()))?;

        let mut history: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report history: {}", path.display()))?;
        history.path = path;
        Ok(history)
    }

    /// Load the history at the configured location
    pub async fn load() -> Result<Self> {
        Self::open(crate::config::history_path()?).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the history to its file
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write report history: {}", self.path.display()))?;

        Ok(())
    }

    /// Add a report, replacing any record with the same id
    pub fn add(&mut self, report: SavedReport) {
        if let Some(existing) = self.reports.iter_mut().find(|r| r.id == report.id) {
            *existing = report;
        } else {
            self.reports.push(report);
        }
    }

    /// Find a report by id or unambiguous id prefix
    pub fn get(&self, id: &str) -> Option<&SavedReport> {
        if let Some(exact) = self.reports.iter().find(|r| r.id == id) {
            return Some(exact);
        }

        let mut matches = self.reports.iter().filter(|r| r.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(only), None) if !id.is_empty() => Some(only),
            _ => None,
        }
    }

    /// Remove a report by id or unambiguous id prefix
    pub fn remove(&mut self, id: &str) -> Option<SavedReport> {
        let full_id = self.get(id)?.id.clone();
        let pos = self.reports.iter().position(|r| r.id == full_id)?;
        Some(self.reports.remove(pos))
    }

    /// Search by label, tags or source file name (case-insensitive substring)
    pub fn search(&self, query: &str) -> Vec<&SavedReport> {
        let query_lower = query.to_lowercase();

        self.reports
            .iter()
            .filter(|report| {
                report.label.to_lowercase().contains(&query_lower)
                    || report
                        .source_file_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&query_lower))
                    || report
                        .tags
                        .iter()
                        .any(|t| t.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Reports sorted by creation time (most recent first)
    pub fn list(&self, limit: Option<usize>) -> Vec<&SavedReport> {
        let mut reports: Vec<_> = self.reports.iter().collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            reports.truncate(limit);
        }

        reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// One stored report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedReport {
    pub id: String,

    /// User-facing name
    pub label: String,

    /// Rendered report text
    pub content: String,

    /// Name of the document the report was built from
    pub source_file_name: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub size_tier: SizeTier,

    pub custom_focus: Option<String>,

    /// Digest of the source text ("sha256:<hex>")
    pub content_sha256: Option<String>,
}

impl SavedReport {
    pub fn new(label: impl Into<String>, content: impl Into<String>, size_tier: SizeTier) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            content: content.into(),
            source_file_name: None,
            tags: Vec::new(),
            created_at: Utc::now(),
            size_tier,
            custom_focus: None,
            content_sha256: None,
        }
    }

    pub fn with_source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file_name = Some(name.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_focus(mut self, focus: Option<String>) -> Self {
        self.custom_focus = focus;
        self
    }

    /// Record the digest of the text the report was built from
    pub fn with_source_text(mut self, text: &str) -> Self {
        self.content_sha256 = Some(content_fingerprint(text));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_add_and_get_by_prefix() {
        let mut history = ReportHistory::new("/tmp/unused.json");
        let report = SavedReport::new("Q3 review", "## Analysis", SizeTier::Short);
        let id = report.id.clone();
        history.add(report);

        assert_eq!(history.len(), 1);
        assert!(history.get(&id).is_some());
        assert!(history.get(&id[..8]).is_some());
        assert!(history.get("").is_none());
        assert!(history.get("zzzz").is_none());
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut history = ReportHistory::new("/tmp/unused.json");
        let mut report = SavedReport::new("Draft", "v1", SizeTier::Medium);
        history.add(report.clone());
        report.content = "v2".to_string();
        history.add(report);

        assert_eq!(history.len(), 1);
        assert_eq!(history.reports[0].content, "v2");
    }

    #[test]
    fn test_search() {
        let mut history = ReportHistory::new("/tmp/unused.json");
        history.add(
            SavedReport::new("Board update", "x", SizeTier::Long)
                .with_source_file("status_march.pdf")
                .with_tags(["finance"]),
        );
        history.add(SavedReport::new("Team sync", "y", SizeTier::Short).with_tags(["hr"]));

        assert_eq!(history.search("board").len(), 1);
        assert_eq!(history.search("MARCH").len(), 1);
        assert_eq!(history.search("finance").len(), 1);
        assert_eq!(history.search("python").len(), 0);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let mut history = ReportHistory::new("/tmp/unused.json");
        let now = Utc::now();
        for (i, label) in ["oldest", "middle", "newest"].iter().enumerate() {
            let mut report = SavedReport::new(*label, "", SizeTier::Medium);
            report.created_at = now + Duration::minutes(i as i64);
            history.add(report);
        }

        let labels: Vec<&str> = history.list(None).iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["newest", "middle", "oldest"]);
        assert_eq!(history.list(Some(2)).len(), 2);
    }

    #[test]
    fn test_source_digest() {
        let report = SavedReport::new("r", "c", SizeTier::Medium).with_source_text("abc");
        assert_eq!(
            report.content_sha256.as_deref(),
            Some("sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }
}
