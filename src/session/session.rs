use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use super::profile::SessionProfile;
use super::state::{EndLatch, EndReason, SessionState};
use super::stats::SessionStats;
use crate::error::EngineError;
use crate::pipeline::{PipelineCoordinator, StageRecord};
use crate::protocol::{decode_frame, ClientEvent, ServerEvent};
use crate::transcript::{Speaker, Transcript, TranscriptAssembler, Utterance};
use crate::transport::TransportAdapter;

/// Placeholder deadline for timers that are not armed yet.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365);

/// What the dispatcher asks the event loop to do after a frame.
enum Action {
    Continue,
    /// Arm the maximum-duration timer (the session just went live).
    ArmDeadline,
    /// Arm the farewell grace timer (a closing remark is playing out).
    ArmGrace,
    End(EndReason),
}

/// One spoken interview: owns the transport for its active lifetime, the
/// transcript, and the post-session pipeline handoff.
///
/// All live work happens on a single event-loop task that multiplexes
/// inbound frames with the deadline and farewell-grace timers, so frames are
/// processed in arrival order and timers die with the loop. The single-fire
/// latch makes termination idempotent no matter how many causes race.
pub struct InterviewSession {
    id: String,
    surface: String,
    profile: SessionProfile,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
    latch: EndLatch,
    /// Wakes the event loop when termination fires outside of it.
    ended: Notify,
    end_reason: Mutex<Option<EndReason>>,
    assembler: Mutex<TranscriptAssembler>,
    transport: Mutex<TransportAdapter>,
    outbound: Mutex<Option<mpsc::Sender<String>>>,
    pipeline: Arc<PipelineCoordinator>,
    event_task: Mutex<Option<JoinHandle<()>>>,
    pipeline_task: Mutex<Option<JoinHandle<()>>>,
}

impl InterviewSession {
    pub fn new(
        id: impl Into<String>,
        surface: impl Into<String>,
        profile: SessionProfile,
        transport: TransportAdapter,
        pipeline: PipelineCoordinator,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            surface: surface.into(),
            profile,
            created_at: Utc::now(),
            state: Mutex::new(SessionState::Idle),
            latch: EndLatch::new(),
            ended: Notify::new(),
            end_reason: Mutex::new(None),
            assembler: Mutex::new(TranscriptAssembler::new()),
            transport: Mutex::new(transport),
            outbound: Mutex::new(None),
            pipeline: Arc::new(pipeline),
            event_task: Mutex::new(None),
            pipeline_task: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    /// Connect the transport and go live.
    ///
    /// Failure to obtain the credential, the connection, or capture
    /// permission leaves the session in `Idle` and surfaces the error; the
    /// caller decides whether to trigger another attempt.
    pub async fn start(self: &Arc<Self>) -> Result<(), EngineError> {
        {
            let mut state = self.state.lock().await;
            if *state != SessionState::Idle {
                return Err(EngineError::Connection(format!(
                    "session {} already started",
                    self.id
                )));
            }
            *state = SessionState::Connecting;
        }

        info!(
            "Starting interview session {} ({} interview)",
            self.id,
            self.profile.role.name()
        );

        let channel = {
            let mut transport = self.transport.lock().await;
            match transport.connect().await {
                Ok(channel) => channel,
                Err(e) => {
                    *self.state.lock().await = SessionState::Idle;
                    error!("Session {} failed to connect: {}", self.id, e);
                    return Err(e);
                }
            }
        };

        *self.state.lock().await = SessionState::Negotiating;
        *self.outbound.lock().await = Some(channel.outbound.clone());

        self.send_event(&ClientEvent::SessionConfiguration {
            instructions: self.profile.prompt.render(),
            voice: self.profile.voice.clone(),
            modalities: vec!["audio".to_string(), "text".to_string()],
            transcription_model: self.profile.transcription_model.clone(),
            turn_detection_mode: self.profile.turn_detection_mode.clone(),
        })
        .await;

        let session = Arc::clone(self);
        let task = tokio::spawn(session.run_event_loop(channel.inbound));
        *self.event_task.lock().await = Some(task);

        Ok(())
    }

    /// End the session. Idempotent: exactly one caller performs the
    /// teardown handoff, every later or racing call is a no-op.
    ///
    /// The winning path freezes the transcript, releases the transport
    /// unconditionally, and hands the frozen transcript to the pipeline
    /// coordinator exactly once.
    pub async fn end_conversation(self: &Arc<Self>, reason: EndReason) {
        if !self.latch.fire() {
            debug!("Session {} already ending, ignoring: {}", self.id, reason);
            return;
        }

        info!("Conversation ended for session {}: {}", self.id, reason);
        *self.state.lock().await = SessionState::Ending;
        *self.end_reason.lock().await = Some(reason);

        // Wake the event loop; its timers are cancelled by the loop exiting.
        self.ended.notify_one();

        let transcript = {
            let mut assembler = self.assembler.lock().await;
            assembler.freeze().clone()
        };

        // Unconditional teardown, error paths included.
        self.transport.lock().await.release().await;
        *self.outbound.lock().await = None;

        let pipeline = Arc::clone(&self.pipeline);
        let id = self.id.clone();
        let task = tokio::spawn(async move {
            pipeline.run(&id, &transcript).await;
        });
        *self.pipeline_task.lock().await = Some(task);

        *self.state.lock().await = SessionState::Ended;
    }

    /// Per-session event loop: inbound frames, the deadline timer, and the
    /// farewell-grace timer, multiplexed on one task.
    async fn run_event_loop(self: Arc<Self>, mut inbound: mpsc::Receiver<String>) {
        let deadline = sleep(FAR_FUTURE);
        tokio::pin!(deadline);
        let grace = sleep(FAR_FUTURE);
        tokio::pin!(grace);
        let mut deadline_armed = false;
        let mut grace_armed = false;

        loop {
            tokio::select! {
                _ = self.ended.notified() => break,

                _ = deadline.as_mut(), if deadline_armed => {
                    info!("Session {} reached its time budget", self.id);
                    self.end_conversation(EndReason::TimeLimit).await;
                    break;
                }

                _ = grace.as_mut(), if grace_armed => {
                    self.end_conversation(EndReason::Farewell).await;
                    break;
                }

                frame = inbound.recv() => {
                    let Some(raw) = frame else { break };
                    match self.handle_frame(&raw).await {
                        Action::Continue => {}
                        Action::ArmDeadline => {
                            deadline.as_mut().reset(Instant::now() + self.profile.max_duration);
                            deadline_armed = true;
                        }
                        Action::ArmGrace => {
                            grace.as_mut().reset(Instant::now() + self.profile.farewell_grace);
                            grace_armed = true;
                        }
                        Action::End(reason) => {
                            self.end_conversation(reason).await;
                            break;
                        }
                    }
                    if self.latch.is_fired() {
                        break;
                    }
                }
            }
        }

        debug!("Event loop for session {} exited", self.id);
    }

    /// Route one inbound frame. Malformed frames are logged and dropped; the
    /// session continues.
    async fn handle_frame(&self, raw: &str) -> Action {
        let event = match decode_frame(raw) {
            Ok(Some(event)) => event,
            Ok(None) => return Action::Continue,
            Err(e) => {
                warn!("Session {}: {}", self.id, e);
                return Action::Continue;
            }
        };

        match event {
            ServerEvent::SessionConfigurationAcknowledged => {
                {
                    let mut state = self.state.lock().await;
                    if *state != SessionState::Negotiating {
                        return Action::Continue;
                    }
                    *state = SessionState::Active;
                }
                info!("Session {} is live", self.id);
                self.send_event(&ClientEvent::speak(&self.profile.opening_line))
                    .await;
                Action::ArmDeadline
            }

            ServerEvent::AssistantSpeechDelta { delta } => {
                self.assembler
                    .lock()
                    .await
                    .push_delta(Speaker::Assistant, &delta);
                Action::Continue
            }

            ServerEvent::AssistantSpeechFinal { transcript } => {
                self.assembler
                    .lock()
                    .await
                    .finalize(Speaker::Assistant, &transcript);
                Action::Continue
            }

            ServerEvent::ParticipantSpeechDelta { delta } => {
                self.assembler
                    .lock()
                    .await
                    .push_delta(Speaker::Participant, &delta);
                Action::Continue
            }

            ServerEvent::ParticipantSpeechFinal { transcript } => {
                if self.latch.is_fired() {
                    return Action::Continue;
                }
                let finalized = {
                    let mut assembler = self.assembler.lock().await;
                    assembler
                        .finalize(Speaker::Participant, &transcript)
                        .map(|index| assembler.transcript().entries()[index].text.clone())
                };
                if let Some(text) = finalized {
                    if self.profile.farewell.matches(&text) {
                        info!("Session {}: participant said farewell", self.id);
                        if let Some(remark) = &self.profile.closing_remark {
                            // Let the remark be spoken before teardown; the
                            // grace timer is cancelled if another cause
                            // fires first.
                            self.send_event(&ClientEvent::speak(remark)).await;
                            return Action::ArmGrace;
                        }
                        return Action::End(EndReason::Farewell);
                    }
                }
                Action::Continue
            }

            ServerEvent::ParticipantSpeechEndOfTurn => {
                debug!("Session {}: participant finished speaking", self.id);
                Action::Continue
            }
        }
    }

    /// Serialize and send an outbound frame. Fire-and-forget: a closed
    /// channel drops the frame with a warning.
    async fn send_event(&self, event: &ClientEvent) {
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Session {}: could not serialize event: {}", self.id, e);
                return;
            }
        };
        let sender = self.outbound.lock().await.clone();
        if let Some(tx) = sender {
            if tx.send(frame).await.is_err() {
                warn!("Session {}: event channel closed, frame dropped", self.id);
            }
        }
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    pub fn is_ended(&self) -> bool {
        self.latch.is_fired()
    }

    pub async fn end_reason(&self) -> Option<EndReason> {
        *self.end_reason.lock().await
    }

    /// Snapshot of the transcript so far.
    pub async fn transcript(&self) -> Transcript {
        self.assembler.lock().await.transcript().clone()
    }

    pub async fn utterances(&self) -> Vec<Utterance> {
        self.assembler.lock().await.transcript().entries().to_vec()
    }

    /// Post-session stage statuses, for surfacing partial success.
    pub async fn pipeline_records(&self) -> Vec<StageRecord> {
        self.pipeline.stage_records().await
    }

    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.created_at);
        SessionStats {
            session_id: self.id.clone(),
            role: self.profile.role,
            state: self.state().await,
            started_at: self.created_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            utterances: self.assembler.lock().await.transcript().len(),
            end_reason: self.end_reason().await,
        }
    }

    /// Whether the transport has been torn down.
    pub async fn transport_released(&self) -> bool {
        self.transport.lock().await.is_released()
    }

    /// Wait for the event loop to finish.
    pub async fn join(&self) {
        let task = self.event_task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Session {} event loop panicked: {}", self.id, e);
            }
        }
    }

    /// Wait for the post-session pipeline to finish, if it started.
    pub async fn wait_for_pipeline(&self) {
        let task = self.pipeline_task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Session {} pipeline task panicked: {}", self.id, e);
            }
        }
    }
}
