#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use audio_digest::llm::{GenerationRequest, TextGenerator};
use audio_digest::storage::ObjectStore;
use audio_digest::transcription::{JobStatus, TranscriptionJob, TranscriptionService};
use audio_digest::{DigestError, Result};

pub const FIXTURE_TRANSCRIPT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/transcript.json");

/// Reshaped text of the fixture transcript.
pub const FIXTURE_RESHAPED: &str = "\nspk_0: Hi, is this support? \nspk_1: Yes. How can I help? ";

pub fn run_digest(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

/// Runs the binary with isolated XDG directories and no ambient overrides.
pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    /// Like [`TestEnv::run`] with extra environment variables set.
    pub fn run_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_audio-digest"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("RUST_LOG")
            .env_remove("AUDIO_DIGEST_BUCKET")
            .env_remove("AUDIO_DIGEST_PROFILE")
            .env_remove("AUDIO_DIGEST_REGION")
            .env_remove("AUDIO_DIGEST_MODEL")
            .envs(vars.iter().copied())
            .output()
            .expect("failed to execute audio-digest binary")
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}

/// In-memory buckets with call counters.
#[derive(Default)]
pub struct MemoryStore {
    buckets: Mutex<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
    bucket_creations: Mutex<u32>,
    uploads: Mutex<u32>,
}

impl MemoryStore {
    pub fn put(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body);
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key))
    }

    pub fn bucket_creations(&self) -> u32 {
        *self.bucket_creations.lock().unwrap()
    }

    pub fn uploads(&self) -> u32 {
        *self.uploads.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.buckets.lock().unwrap().keys().cloned().collect())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        *self.bucket_creations.lock().unwrap() += 1;
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .ok_or_else(|| DigestError::Storage(format!("no such bucket: {bucket}")))
    }

    async fn upload_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let body = std::fs::read(local_path)
            .map_err(|e| DigestError::Storage(format!("cannot read {}: {e}", local_path.display())))?;
        *self.uploads.lock().unwrap() += 1;
        self.put(bucket, key, body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| DigestError::Storage(format!("no such key: s3://{bucket}/{key}")))
    }
}

/// Replays job statuses and drops the output document into the store when a
/// job starts, the way the real service writes `<job>.json`.
pub struct ScriptedTranscriber {
    store: Arc<MemoryStore>,
    document: Vec<u8>,
    statuses: Mutex<VecDeque<JobStatus>>,
    started: Mutex<Vec<TranscriptionJob>>,
}

impl ScriptedTranscriber {
    pub fn new(store: Arc<MemoryStore>, document: Vec<u8>, statuses: Vec<JobStatus>) -> Self {
        Self {
            store,
            document,
            statuses: Mutex::new(statuses.into()),
            started: Mutex::new(Vec::new()),
        }
    }

    pub fn started(&self) -> Vec<TranscriptionJob> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionService for ScriptedTranscriber {
    async fn start_job(&self, job: &TranscriptionJob) -> Result<()> {
        self.started.lock().unwrap().push(job.clone());
        self.store
            .put(&job.output_bucket, &job.output_key(), self.document.clone());
        Ok(())
    }

    async fn job_status(&self, _job_name: &str) -> Result<JobStatus> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JobStatus::InProgress))
    }
}

/// Returns a fixed reply and remembers every request.
pub struct CannedGenerator {
    reply: String,
    requests: Mutex<Vec<(String, String)>>,
}

impl CannedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(model_id, prompt)` pairs in call order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((request.model_id.to_string(), request.prompt.to_string()));
        Ok(self.reply.clone())
    }
}
