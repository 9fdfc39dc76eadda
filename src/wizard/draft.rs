//! Draft answers kept between wizard steps, and their final submission.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::FlowKind;
use crate::storage::{KeyValueStore, StorageError};

#[derive(Error, Debug)]
pub enum DraftError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to deliver submission: {0}")]
    Delivery(String),
}

/// Answers collected so far in one flow, keyed by step key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub flow: FlowKind,
    #[serde(default)]
    pub answers: BTreeMap<String, Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    fn empty(flow: FlowKind) -> Self {
        Self {
            flow,
            answers: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn answers_for(&self, step_key: &str) -> &[String] {
        self.answers.get(step_key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of steps with a saved answer
    pub fn answered_steps(&self) -> usize {
        self.answers.len()
    }
}

/// A finished onboarding flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub flow: FlowKind,
    pub email: Option<String>,
    pub answers: BTreeMap<String, Vec<String>>,
    pub submitted_at: DateTime<Utc>,
}

/// Destination for finished flows
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, submission: &Submission) -> anyhow::Result<()>;
}

/// Writes each submission to `<dir>/<id>.json`
pub struct FileSubmissionSink {
    dir: PathBuf,
}

impl FileSubmissionSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, submission: &Submission) -> PathBuf {
        self.dir.join(format!("{}.json", submission.id))
    }
}

#[async_trait]
impl SubmissionSink for FileSubmissionSink {
    async fn deliver(&self, submission: &Submission) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create submissions directory")?;
        let contents = serde_json::to_string_pretty(submission)?;
        let path = self.path_for(submission);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write submission {}", path.display()))?;
        Ok(())
    }
}

/// Per-flow draft persistence over a key-value store
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn key(flow: FlowKind) -> String {
        format!("civic.draft.{}", flow.key())
    }

    /// Load the saved draft. A malformed draft is deleted and reported as absent.
    pub fn load(&self, flow: FlowKind) -> Result<Option<Draft>, DraftError> {
        let key = Self::key(flow);
        let Some(raw) = self.storage.get(&key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) if draft.flow == flow => Ok(Some(draft)),
            Ok(_) | Err(_) => {
                tracing::warn!(flow = %flow, "Discarding malformed draft");
                self.storage.remove(&key)?;
                Ok(None)
            }
        }
    }

    /// Record the answers of one step, replacing earlier answers for that step
    pub fn save_step(
        &self,
        flow: FlowKind,
        step_key: &str,
        answers: Vec<String>,
    ) -> Result<Draft, DraftError> {
        let mut draft = self.load(flow)?.unwrap_or_else(|| Draft::empty(flow));
        draft.answers.insert(step_key.to_string(), answers);
        draft.updated_at = Utc::now();

        let raw = serde_json::to_string(&draft).map_err(StorageError::from)?;
        self.storage.set(&Self::key(flow), &raw)?;
        tracing::debug!(flow = %flow, step = step_key, "Draft saved");
        Ok(draft)
    }

    pub fn discard(&self, flow: FlowKind) -> Result<(), DraftError> {
        self.storage.remove(&Self::key(flow))?;
        Ok(())
    }

    /// All saved drafts, in flow order
    pub fn list(&self) -> Result<Vec<Draft>, DraftError> {
        let mut drafts = Vec::new();
        for flow in FlowKind::all() {
            if let Some(draft) = self.load(*flow)? {
                drafts.push(draft);
            }
        }
        Ok(drafts)
    }

    /// Hand the draft to `sink` and delete it once delivered.
    ///
    /// The draft survives a failed delivery.
    pub async fn submit(
        &self,
        flow: FlowKind,
        email: Option<&str>,
        sink: &dyn SubmissionSink,
    ) -> Result<Submission, DraftError> {
        let answers = self.load(flow)?.map(|d| d.answers).unwrap_or_default();
        let submission = Submission {
            id: Uuid::new_v4(),
            flow,
            email: email.map(str::to_string),
            answers,
            submitted_at: Utc::now(),
        };

        sink.deliver(&submission)
            .await
            .map_err(|e| DraftError::Delivery(format!("{e:#}")))?;
        self.discard(flow)?;

        tracing::info!(flow = %flow, id = %submission.id, "Onboarding submitted");
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<Submission>>,
        fail: bool,
    }

    #[async_trait]
    impl SubmissionSink for RecordingSink {
        async fn deliver(&self, submission: &Submission) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("backend offline");
            }
            self.delivered.lock().unwrap().push(submission.clone());
            Ok(())
        }
    }

    fn drafts(storage: &MemoryStore) -> DraftStore {
        DraftStore::new(Arc::new(storage.clone()))
    }

    #[test]
    fn test_save_and_reload_across_instances() {
        let storage = MemoryStore::new();
        drafts(&storage)
            .save_step(FlowKind::Ngo, "identity", vec!["Registered NGO".into()])
            .unwrap();
        drafts(&storage)
            .save_step(FlowKind::Ngo, "legal", vec!["Board resolution".into()])
            .unwrap();

        let draft = drafts(&storage).load(FlowKind::Ngo).unwrap().unwrap();
        assert_eq!(draft.answers_for("identity"), ["Registered NGO".to_string()]);
        assert_eq!(draft.answered_steps(), 2);
        assert!(draft.answers_for("visibility").is_empty());
    }

    #[test]
    fn test_resaving_a_step_replaces_answers() {
        let storage = MemoryStore::new();
        let store = drafts(&storage);
        store
            .save_step(FlowKind::Donor, "interests", vec!["Health".into()])
            .unwrap();
        let draft = store
            .save_step(FlowKind::Donor, "interests", vec!["Education".into()])
            .unwrap();
        assert_eq!(draft.answers_for("interests"), ["Education".to_string()]);
    }

    #[test]
    fn test_flows_are_isolated() {
        let storage = MemoryStore::new();
        let store = drafts(&storage);
        store
            .save_step(FlowKind::Donor, "identity", vec!["Individual".into()])
            .unwrap();
        assert!(store.load(FlowKind::Ngo).unwrap().is_none());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_draft_is_removed() {
        let storage = MemoryStore::new();
        storage.set(&DraftStore::key(FlowKind::Ngo), "{oops").unwrap();
        let store = drafts(&storage);

        assert!(store.load(FlowKind::Ngo).unwrap().is_none());
        assert!(!storage.contains(&DraftStore::key(FlowKind::Ngo)).unwrap());
    }

    #[test]
    fn test_draft_under_wrong_flow_key_is_removed() {
        let storage = MemoryStore::new();
        let store = drafts(&storage);
        store
            .save_step(FlowKind::Donor, "identity", vec!["Individual".into()])
            .unwrap();
        let raw = storage.get(&DraftStore::key(FlowKind::Donor)).unwrap().unwrap();
        storage.set(&DraftStore::key(FlowKind::Ngo), &raw).unwrap();

        assert!(store.load(FlowKind::Ngo).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_delivers_and_clears_draft() {
        let storage = MemoryStore::new();
        let store = drafts(&storage);
        store
            .save_step(FlowKind::Ngo, "identity", vec!["Foundation or trust".into()])
            .unwrap();

        let sink = RecordingSink::default();
        let submission = store
            .submit(FlowKind::Ngo, Some("a@b.com"), &sink)
            .await
            .unwrap();

        assert_eq!(submission.email.as_deref(), Some("a@b.com"));
        assert_eq!(
            submission.answers.get("identity"),
            Some(&vec!["Foundation or trust".to_string()])
        );
        assert_eq!(sink.delivered.lock().unwrap().len(), 1);
        assert!(store.load(FlowKind::Ngo).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_draft() {
        let storage = MemoryStore::new();
        let store = drafts(&storage);
        store
            .save_step(FlowKind::Talent, "profile", vec!["Design".into()])
            .unwrap();

        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let err = store.submit(FlowKind::Talent, None, &sink).await.unwrap_err();
        assert!(matches!(err, DraftError::Delivery(_)));
        assert!(store.load(FlowKind::Talent).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_sink_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSubmissionSink::new(temp_dir.path().join("submissions"));
        let storage = MemoryStore::new();
        let submission = drafts(&storage)
            .submit(FlowKind::Donor, Some("d@e.org"), &sink)
            .await
            .unwrap();

        let contents = fs::read_to_string(sink.path_for(&submission)).unwrap();
        let parsed: Submission = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, submission);
        assert!(parsed.answers.is_empty());
    }
}
