//! Session runtime — the single consumer of viewer transitions.
//!
//! One actor task owns the [`ViewerState`]. Handle calls, pacing ticks,
//! episode load results, and drop-off reports all arrive on one channel and
//! are applied in arrival order. After each transition the actor runs the
//! side effects the reducer must not perform:
//!
//! 1. telemetry records derived by the tracker,
//! 2. persistence of the episode run and stage position,
//! 3. starting or cancelling the pacing task,
//! 4. fetching the episode of a newly current stage,
//! 5. publishing a fresh snapshot.
//!
//! Telemetry is handed to a separate worker so a slow sink never holds up
//! progression.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use witnesslab_content::application::loader::EpisodeLoader;
use witnesslab_content::domain::stages::StageId;
use witnesslab_core::clock::Clock;
use witnesslab_core::error::DomainError;
use witnesslab_core::reducer::{Action, Reducer};
use witnesslab_core::store::KeyValueStore;
use witnesslab_core::telemetry::TelemetrySink;
use witnesslab_episode::application::persistence::{EpisodePersistence, load_persisted};
use witnesslab_episode::application::telemetry::{EpisodeTelemetryTracker, TelemetryRecord};
use witnesslab_episode::domain::actions::EpisodeAction;
use witnesslab_episode::domain::events::{Event, PromptChoice};
use witnesslab_episode::domain::mapper::{MapperOptions, map_episode_to_events};
use witnesslab_episode::domain::run::Gating;

use crate::application::persistence::{StagePersistence, load_stage_state};
use crate::domain::actions::ViewerAction;
use crate::domain::viewer::ViewerState;

/// Default pacing interval between automatic advances.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

const REQUEST_BUFFER: usize = 64;

/// Collaborators the runtime depends on.
#[derive(Clone)]
pub struct SessionDeps {
    pub store: Arc<dyn KeyValueStore>,
    pub loader: Arc<dyn EpisodeLoader>,
    pub telemetry: Arc<dyn TelemetrySink>,
    pub clock: Arc<dyn Clock>,
}

/// Runtime tuning.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Period of the pacing task. The first tick fires one period after an
    /// episode is loaded.
    pub tick_interval: Duration,
    pub mapper: MapperOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            mapper: MapperOptions::default(),
        }
    }
}

/// Read-only view of the session published after every transition.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub state: ViewerState,
    /// Why the most recent episode load failed, until a load succeeds.
    pub load_error: Option<String>,
}

enum Request {
    Dispatch {
        action: ViewerAction,
        correlation_id: Uuid,
        reply: oneshot::Sender<()>,
    },
    SelectChoice {
        prompt_id: String,
        choice_id: String,
        correlation_id: Uuid,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    LoadEpisode {
        episode_id: String,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Loaded {
        generation: u64,
        episode_id: String,
        result: Result<Vec<Event>, DomainError>,
        reply: Option<oneshot::Sender<Result<(), DomainError>>>,
    },
    Tick,
    Dropoff {
        reply: oneshot::Sender<()>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

enum TelemetryJob {
    Track(TelemetryRecord),
    Flush(oneshot::Sender<()>),
}

fn stopped() -> DomainError {
    DomainError::Infrastructure("session runtime stopped".to_owned())
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, DomainError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(make(reply))
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())
    }

    /// Applies `action` and waits until its side effects have run.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn dispatch(&self, action: impl Into<ViewerAction>) -> Result<(), DomainError> {
        let action = action.into();
        let correlation_id = Uuid::new_v4();
        self.request(|reply| Request::Dispatch {
            action,
            correlation_id,
            reply,
        })
        .await
    }

    /// Advances one event, subject to prompt and progress gating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn advance(&self) -> Result<(), DomainError> {
        self.dispatch(EpisodeAction::Advance).await
    }

    /// Answers a prompt already shown in the feed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the prompt is not in the feed or
    /// has no such choice, and `DomainError::Infrastructure` if the runtime
    /// has stopped.
    pub async fn select_choice(&self, prompt_id: &str, choice_id: &str) -> Result<(), DomainError> {
        let correlation_id = Uuid::new_v4();
        self.request(|reply| Request::SelectChoice {
            prompt_id: prompt_id.to_owned(),
            choice_id: choice_id.to_owned(),
            correlation_id,
            reply,
        })
        .await?
    }

    /// Replaces the gating flags.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn set_gating(&self, gating: Gating) -> Result<(), DomainError> {
        self.dispatch(EpisodeAction::SetGating(gating)).await
    }

    /// Resets the episode run and stage progression, then reloads the
    /// first stage's episode.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn reset(&self) -> Result<(), DomainError> {
        self.dispatch(ViewerAction::Reset).await
    }

    /// Loads a specific episode and waits for the result.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, `DomainError::Validation` if a newer load
    /// superseded this one, and `DomainError::Infrastructure` if the runtime
    /// has stopped.
    pub async fn load_episode(&self, episode_id: &str) -> Result<(), DomainError> {
        self.request(|reply| Request::LoadEpisode {
            episode_id: episode_id.to_owned(),
            reply,
        })
        .await?
    }

    /// Records that the viewer left, capturing the last index reached.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn report_dropoff(&self) -> Result<(), DomainError> {
        self.request(|reply| Request::Dropoff { reply }).await
    }

    /// Waits until every telemetry record emitted so far reached the sink.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime has stopped.
    pub async fn flush(&self) -> Result<(), DomainError> {
        self.request(|reply| Request::Flush { reply }).await
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::clone(&self.snapshots.borrow())
    }

    /// A receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Waits for the first snapshot, current one included, that satisfies
    /// `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime stops first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, DomainError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots.wait_for(predicate).await.map_err(|_| stopped())?;
        Ok(SessionSnapshot::clone(&snapshot))
    }

    /// Stops the runtime after draining pending telemetry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the runtime already stopped.
    pub async fn shutdown(&self) -> Result<(), DomainError> {
        self.request(|reply| Request::Shutdown { reply }).await
    }
}

/// Entry point for starting a session.
pub struct SessionRuntime;

impl SessionRuntime {
    /// Restores persisted state, spawns the runtime tasks, and returns a
    /// handle. The current stage's episode starts loading immediately.
    pub async fn start(deps: SessionDeps, config: RuntimeConfig) -> SessionHandle {
        let mut state = ViewerState::new();
        let restored = load_persisted(deps.store.as_ref()).await;
        state.apply(&EpisodeAction::Hydrate(restored).into());
        if let Some(stage) = load_stage_state(deps.store.as_ref()).await {
            state.apply(&ViewerAction::RestoreStage(stage));
        }

        let (requests_tx, requests_rx) = mpsc::channel(REQUEST_BUFFER);
        let (snapshots_tx, snapshots_rx) = watch::channel(SessionSnapshot {
            state: state.clone(),
            load_error: None,
        });
        let (telemetry_tx, telemetry_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_telemetry(Arc::clone(&deps.telemetry), telemetry_rx));

        let actor = SessionActor {
            state,
            load_error: None,
            deps,
            config,
            requests: requests_rx,
            self_sender: requests_tx.downgrade(),
            snapshots: snapshots_tx,
            telemetry: telemetry_tx,
            tracker: EpisodeTelemetryTracker::new(),
            episode_persistence: EpisodePersistence::new(),
            stage_persistence: StagePersistence::new(),
            generation: 0,
            requested_stage: None,
            pacer: None,
        };
        tokio::spawn(actor.run());

        SessionHandle {
            requests: requests_tx,
            snapshots: snapshots_rx,
        }
    }
}

async fn run_telemetry(
    sink: Arc<dyn TelemetrySink>,
    mut jobs: mpsc::UnboundedReceiver<TelemetryJob>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            TelemetryJob::Track(record) => sink.track(record.event_name, record.payload).await,
            TelemetryJob::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
}

struct Pacer {
    episode_id: String,
    task: JoinHandle<()>,
}

struct SessionActor {
    state: ViewerState,
    load_error: Option<String>,
    deps: SessionDeps,
    config: RuntimeConfig,
    requests: mpsc::Receiver<Request>,
    self_sender: mpsc::WeakSender<Request>,
    snapshots: watch::Sender<SessionSnapshot>,
    telemetry: mpsc::UnboundedSender<TelemetryJob>,
    tracker: EpisodeTelemetryTracker,
    episode_persistence: EpisodePersistence,
    stage_persistence: StagePersistence,
    /// Bumped on every fetch; only the latest fetch may apply.
    generation: u64,
    requested_stage: Option<StageId>,
    pacer: Option<Pacer>,
}

impl SessionActor {
    async fn run(mut self) {
        info!(
            stage_id = %self.state.stage().current_stage_id,
            tick_interval = ?self.config.tick_interval,
            "session runtime started"
        );
        self.after_transition(false).await;

        while let Some(request) = self.requests.recv().await {
            if self.handle(request).await.is_break() {
                return;
            }
        }
        self.stop().await;
    }

    async fn handle(&mut self, request: Request) -> ControlFlow<()> {
        match request {
            Request::Dispatch {
                action,
                correlation_id,
                reply,
            } => {
                self.apply(&action, correlation_id).await;
                let _ = reply.send(());
            }
            Request::SelectChoice {
                prompt_id,
                choice_id,
                correlation_id,
                reply,
            } => {
                let result = match self.resolve_choice(&prompt_id, &choice_id) {
                    Ok(choice) => {
                        let action = EpisodeAction::SelectChoice { prompt_id, choice };
                        self.apply(&action.into(), correlation_id).await;
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(result);
            }
            Request::LoadEpisode { episode_id, reply } => self.fetch(episode_id, Some(reply)),
            Request::Loaded {
                generation,
                episode_id,
                result,
                reply,
            } => self.loaded(generation, episode_id, result, reply).await,
            Request::Tick => {
                if self.state.episode().is_loaded() {
                    self.apply(&EpisodeAction::Advance.into(), Uuid::new_v4())
                        .await;
                }
            }
            Request::Dropoff { reply } => {
                if let Some(record) =
                    EpisodeTelemetryTracker::dropoff(self.state.episode(), self.deps.clock.now())
                {
                    self.emit(record);
                }
                let _ = reply.send(());
            }
            Request::Flush { reply } => {
                if let Err(mpsc::error::SendError(TelemetryJob::Flush(reply))) =
                    self.telemetry.send(TelemetryJob::Flush(reply))
                {
                    let _ = reply.send(());
                }
            }
            Request::Shutdown { reply } => {
                self.stop().await;
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    async fn apply(&mut self, action: &ViewerAction, correlation_id: Uuid) {
        debug!(
            %correlation_id,
            action_type = action.action_type(),
            "applying viewer action"
        );
        if let ViewerAction::Episode(EpisodeAction::SelectChoice { prompt_id, choice }) = action
            && let Some(record) = EpisodeTelemetryTracker::choice_selected(
                self.state.episode(),
                prompt_id,
                choice,
                self.deps.clock.now(),
            )
        {
            self.emit(record);
        }

        self.state.apply(action);
        self.after_transition(matches!(action, ViewerAction::Reset))
            .await;
    }

    async fn after_transition(&mut self, reload_stage: bool) {
        let records = self
            .tracker
            .observe(self.state.episode(), self.deps.clock.now());
        for record in records {
            self.emit(record);
        }

        self.episode_persistence
            .sync(self.deps.store.as_ref(), self.state.episode())
            .await;
        self.stage_persistence
            .sync(self.deps.store.as_ref(), self.state.stage())
            .await;

        self.sync_pacer();

        let stage_id = self.state.stage().current_stage_id;
        if reload_stage || self.requested_stage != Some(stage_id) {
            if self.requested_stage != Some(stage_id) {
                info!(%stage_id, "stage started");
            }
            self.requested_stage = Some(stage_id);
            let episode_id = self.state.current_stage().episode_file.to_owned();
            self.fetch(episode_id, None);
        }

        self.publish();
    }

    fn resolve_choice(&self, prompt_id: &str, choice_id: &str) -> Result<PromptChoice, DomainError> {
        let episode = self.state.episode();
        let shown = episode
            .visible_events()
            .iter()
            .filter_map(Event::as_prompt)
            .any(|prompt| prompt.prompt_id == prompt_id);
        if !shown {
            return Err(DomainError::Validation(format!(
                "prompt {prompt_id} is not in the feed"
            )));
        }
        episode
            .find_choice(prompt_id, choice_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::Validation(format!("prompt {prompt_id} has no choice {choice_id}"))
            })
    }

    /// Starts loading `episode_id` in the background. Any earlier fetch
    /// still in flight becomes stale.
    fn fetch(
        &mut self,
        episode_id: String,
        reply: Option<oneshot::Sender<Result<(), DomainError>>>,
    ) {
        self.generation += 1;
        let generation = self.generation;
        let loader = Arc::clone(&self.deps.loader);
        let mapper = self.config.mapper.clone();
        let sender = self.self_sender.clone();
        debug!(%episode_id, generation, "fetching episode");

        tokio::spawn(async move {
            let result = loader
                .load(&episode_id)
                .await
                .map(|doc| map_episode_to_events(&doc, &mapper));
            if let Some(sender) = sender.upgrade() {
                let _ = sender
                    .send(Request::Loaded {
                        generation,
                        episode_id,
                        result,
                        reply,
                    })
                    .await;
            }
        });
    }

    async fn loaded(
        &mut self,
        generation: u64,
        episode_id: String,
        result: Result<Vec<Event>, DomainError>,
        reply: Option<oneshot::Sender<Result<(), DomainError>>>,
    ) {
        if generation != self.generation {
            debug!(
                %episode_id,
                generation,
                latest = self.generation,
                "discarding stale episode load"
            );
            if let Some(reply) = reply {
                let _ = reply.send(Err(DomainError::Validation(format!(
                    "load of {episode_id} was superseded"
                ))));
            }
            return;
        }

        let outcome = match result {
            Ok(events) => {
                info!(%episode_id, events = events.len(), "episode loaded");
                self.load_error = None;
                let action = EpisodeAction::LoadEpisode { episode_id, events };
                self.apply(&action.into(), Uuid::new_v4()).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, %episode_id, "episode load failed");
                self.load_error = Some(e.to_string());
                self.publish();
                Err(e)
            }
        };
        if let Some(reply) = reply {
            let _ = reply.send(outcome);
        }
    }

    /// Keeps exactly one pacing task alive while an episode is loaded.
    fn sync_pacer(&mut self) {
        let episode = self.state.episode();
        let wanted = episode
            .episode_id()
            .filter(|_| episode.is_loaded())
            .map(str::to_owned);
        let current = self.pacer.as_ref().map(|pacer| pacer.episode_id.as_str());
        if current == wanted.as_deref() {
            return;
        }

        if let Some(previous) = self.pacer.take() {
            previous.task.abort();
            debug!(episode_id = %previous.episode_id, "pacing stopped");
        }
        if let Some(episode_id) = wanted {
            let task = spawn_pacer(self.self_sender.clone(), self.config.tick_interval);
            debug!(%episode_id, "pacing started");
            self.pacer = Some(Pacer { episode_id, task });
        }
    }

    fn emit(&self, record: TelemetryRecord) {
        if self.telemetry.send(TelemetryJob::Track(record)).is_err() {
            debug!("telemetry worker stopped; record dropped");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(SessionSnapshot {
            state: self.state.clone(),
            load_error: self.load_error.clone(),
        });
    }

    async fn stop(&mut self) {
        if let Some(pacer) = self.pacer.take() {
            pacer.task.abort();
        }
        let (reply, drained) = oneshot::channel();
        if self.telemetry.send(TelemetryJob::Flush(reply)).is_ok() {
            let _ = drained.await;
        }
        info!("session runtime stopped");
    }
}

fn spawn_pacer(sender: mpsc::WeakSender<Request>, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticks.tick().await;
            let Some(sender) = sender.upgrade() else {
                break;
            };
            if sender.send(Request::Tick).await.is_err() {
                break;
            }
        }
    })
}
