// Integration tests for the post-session pipeline coordinator
//
// These verify stage ordering, at-most-once execution, failure propagation
// along declared inputs, and the bounded artifact poll.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use casebook::pipeline::{
    ArtifactCompiler, ArtifactStatus, Collaborators, EntityNames, FollowUpLink,
    FollowUpProvisioner, PipelineCoordinator, PollBudget, StageKind, StageStatus, Summarizer,
    Summary, TranscriptHandle, TranscriptStore,
};
use casebook::{SessionProfile, Speaker, Transcript, TranscriptAssembler};

#[derive(Default)]
struct MockBackend {
    save_calls: AtomicUsize,
    summarize_calls: AtomicUsize,
    provision_calls: AtomicUsize,
    compile_calls: AtomicUsize,
    poll_calls: AtomicUsize,
    fail_save: bool,
    fail_summarize: bool,
    /// Poll attempts before the artifact reports ready; `None` = never.
    ready_after: Option<usize>,
    provisioned_names: Mutex<Option<EntityNames>>,
}

fn test_names() -> EntityNames {
    EntityNames {
        lead_entity: "Acme Robotics".to_string(),
        partner_entity: "Globex".to_string(),
        project_title: "Warehouse Vision".to_string(),
    }
}

#[async_trait::async_trait]
impl TranscriptStore for MockBackend {
    async fn save(&self, session_id: &str, _transcript: &Transcript) -> Result<TranscriptHandle> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            bail!("storage unavailable");
        }
        Ok(TranscriptHandle {
            id: format!("{session_id}-transcript"),
        })
    }
}

#[async_trait::async_trait]
impl Summarizer for MockBackend {
    async fn summarize(&self, _transcript: &Transcript) -> Result<Summary> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_summarize {
            bail!("summarization model unavailable");
        }
        Ok(Summary {
            text: "Acme Robotics delivered Warehouse Vision for Globex.".to_string(),
            names: test_names(),
        })
    }

    async fn extract_names(&self, _text: &str) -> Result<EntityNames> {
        Ok(test_names())
    }
}

#[async_trait::async_trait]
impl FollowUpProvisioner for MockBackend {
    async fn provision(&self, _session_id: &str, names: &EntityNames) -> Result<FollowUpLink> {
        self.provision_calls.fetch_add(1, Ordering::SeqCst);
        *self.provisioned_names.lock().unwrap() = Some(names.clone());
        Ok(FollowUpLink {
            url: "https://interviews.example.com/client/token-123".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ArtifactCompiler for MockBackend {
    async fn compile(&self, _session_id: &str) -> Result<()> {
        self.compile_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn poll(&self, _session_id: &str) -> Result<ArtifactStatus> {
        let attempt = self.poll_calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.ready_after {
            Some(n) if attempt >= n => Ok(ArtifactStatus::Ready {
                url: "https://artifacts.example.com/final.pdf".to_string(),
            }),
            _ => Ok(ArtifactStatus::Pending),
        }
    }
}

fn collaborators(backend: &Arc<MockBackend>) -> Collaborators {
    Collaborators {
        store: backend.clone(),
        summarizer: backend.clone(),
        provisioner: backend.clone(),
        compiler: backend.clone(),
    }
}

fn sample_transcript() -> Transcript {
    let mut assembler = TranscriptAssembler::new();
    assembler.finalize(Speaker::Participant, "Hi");
    assembler.finalize(Speaker::Assistant, "Hello there");
    assembler.finalize(Speaker::Participant, "goodbye");
    assembler.freeze().clone()
}

fn quick_poll() -> PollBudget {
    PollBudget {
        max_attempts: 3,
        interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn provider_plan_runs_all_stages() {
    let backend = Arc::new(MockBackend {
        ready_after: Some(1),
        ..Default::default()
    });
    let coordinator = PipelineCoordinator::new(
        SessionProfile::provider().stages,
        collaborators(&backend),
        quick_poll(),
    );

    coordinator.run("s-1", &sample_transcript()).await;

    let records = coordinator.stage_records().await;
    assert_eq!(records.len(), 4);
    for record in &records {
        assert_eq!(record.status, StageStatus::Succeeded, "{:?}", record.kind);
    }

    // The provisioner received the names the summarizer extracted.
    let names = backend.provisioned_names.lock().unwrap().clone();
    assert_eq!(names, Some(test_names()));
}

#[tokio::test]
async fn summarizer_failure_propagates_to_dependents_only() {
    let backend = Arc::new(MockBackend {
        fail_summarize: true,
        ..Default::default()
    });
    let coordinator = PipelineCoordinator::new(
        SessionProfile::provider().stages,
        collaborators(&backend),
        quick_poll(),
    );

    coordinator.run("s-2", &sample_transcript()).await;

    let records = coordinator.stage_records().await;

    // Persistence is independent of summarization and still succeeds.
    assert_eq!(records[0].kind, StageKind::PersistTranscript);
    assert_eq!(records[0].status, StageStatus::Succeeded);

    assert_eq!(records[1].kind, StageKind::GenerateSummary);
    assert_eq!(records[1].status, StageStatus::Failed);

    // Dependent stages are failed without being attempted.
    assert_eq!(records[2].kind, StageKind::ProvisionFollowUp);
    assert_eq!(records[2].status, StageStatus::Failed);
    assert!(records[2].error.as_deref().unwrap().contains("not attempted"));
    assert_eq!(backend.provision_calls.load(Ordering::SeqCst), 0);

    assert_eq!(records[3].kind, StageKind::PollArtifact);
    assert_eq!(records[3].status, StageStatus::Failed);
    assert_eq!(backend.poll_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn persistence_failure_does_not_block_summary() {
    let backend = Arc::new(MockBackend {
        fail_save: true,
        ready_after: Some(1),
        ..Default::default()
    });
    let coordinator = PipelineCoordinator::new(
        SessionProfile::provider().stages,
        collaborators(&backend),
        quick_poll(),
    );

    coordinator.run("s-3", &sample_transcript()).await;

    let records = coordinator.stage_records().await;
    assert_eq!(records[0].status, StageStatus::Failed);
    assert_eq!(records[1].status, StageStatus::Succeeded);
    assert_eq!(records[2].status, StageStatus::Succeeded);
    assert_eq!(records[3].status, StageStatus::Succeeded);
}

#[tokio::test]
async fn coordinator_runs_at_most_once() {
    let backend = Arc::new(MockBackend {
        ready_after: Some(1),
        ..Default::default()
    });
    let coordinator = PipelineCoordinator::new(
        SessionProfile::feedback().stages,
        collaborators(&backend),
        quick_poll(),
    );

    let transcript = sample_transcript();
    coordinator.run("s-4", &transcript).await;
    coordinator.run("s-4", &transcript).await;

    assert_eq!(backend.save_calls.load(Ordering::SeqCst), 1);
    assert!(coordinator.has_run());
}

#[tokio::test(start_paused = true)]
async fn poll_stage_times_out_after_attempt_budget() {
    let backend = Arc::new(MockBackend {
        ready_after: None,
        ..Default::default()
    });
    let coordinator = PipelineCoordinator::new(
        SessionProfile::client(test_names()).stages,
        collaborators(&backend),
        PollBudget {
            max_attempts: 3,
            interval: Duration::from_secs(4),
        },
    );

    coordinator.run("s-5", &sample_transcript()).await;

    let records = coordinator.stage_records().await;
    let poll = records
        .iter()
        .find(|r| r.kind == StageKind::PollArtifact)
        .unwrap();
    assert_eq!(poll.status, StageStatus::Failed);
    assert!(poll.error.as_deref().unwrap().contains("3 attempts"));
    assert_eq!(backend.poll_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn poll_stage_succeeds_when_artifact_turns_up_late() {
    let backend = Arc::new(MockBackend {
        ready_after: Some(3),
        ..Default::default()
    });
    let coordinator = PipelineCoordinator::new(
        SessionProfile::client(test_names()).stages,
        collaborators(&backend),
        PollBudget {
            max_attempts: 5,
            interval: Duration::from_secs(4),
        },
    );

    coordinator.run("s-6", &sample_transcript()).await;

    let records = coordinator.stage_records().await;
    let poll = records
        .iter()
        .find(|r| r.kind == StageKind::PollArtifact)
        .unwrap();
    assert_eq!(poll.status, StageStatus::Succeeded);
    assert_eq!(backend.poll_calls.load(Ordering::SeqCst), 3);
    assert_eq!(backend.compile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn feedback_plan_only_persists() {
    let backend = Arc::new(MockBackend::default());
    let coordinator = PipelineCoordinator::new(
        SessionProfile::feedback().stages,
        collaborators(&backend),
        quick_poll(),
    );

    coordinator.run("s-7", &sample_transcript()).await;

    let records = coordinator.stage_records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, StageKind::PersistTranscript);
    assert_eq!(records[0].status, StageStatus::Succeeded);
    assert_eq!(backend.summarize_calls.load(Ordering::SeqCst), 0);
}
