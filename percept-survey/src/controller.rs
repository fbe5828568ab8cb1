use log::{debug, error, info, warn};
use percept_core::{ImageDescriptor, ImageSource, ResultRecord, ResultSink, SessionId, SurveyMode};
use percept_timing::Clock;
use rand::Rng;

use crate::config::SurveyConfig;
use crate::error::SurveyError;
use crate::event::{SurveyEvent, SurveyStatus};
use crate::listen::{BroadcastError, Listenable, ListenerFailure, ListenerId, ListenerResult};
use crate::order;
use crate::trial::{Trial, TrialSnapshot};

/// Deadlines for the trial at `index`. Owned by the controller so that
/// cancellation is a single `Option` clear and nothing cancellable ever
/// travels inside an event payload.
#[derive(Debug, Clone, Copy)]
struct TrialDeadlines {
    index: usize,
    /// Cleared once the reveal has fired.
    reveal_at: Option<u64>,
    skip_at: u64,
}

/// Survey session state machine.
///
/// Owns the trial sequence, the cursor, the per-trial deadlines and the
/// session identity, and broadcasts every transition through an internal
/// [`Listenable`]. All work happens on the caller's thread; deadlines are
/// polled via [`tick`](Self::tick), so no two transitions ever interleave
/// and events go out in causal order.
pub struct SurveyController<S, K, C, R>
where
    S: ImageSource,
    K: ResultSink,
    C: Clock,
    R: Rng,
{
    source: S,
    sink: K,
    clock: C,
    rng: R,
    config: SurveyConfig,
    events: Listenable<SurveyEvent>,

    /// Full descriptor set, loaded once by `initialize`.
    all: Vec<ImageDescriptor>,
    /// Filtered/ordered trials for the current run, rebuilt on every start.
    active: Vec<Trial>,
    /// -1 before the first trial, `active.len()` once completed.
    cursor: isize,
    session: SessionId,
    status: SurveyStatus,
    pending: Option<TrialDeadlines>,
    initialized: bool,
}

impl<S, K, C, R> SurveyController<S, K, C, R>
where
    S: ImageSource,
    K: ResultSink,
    C: Clock,
    R: Rng,
{
    pub fn new(source: S, sink: K, clock: C, mut rng: R, config: SurveyConfig) -> Self {
        let session = Self::generate_session_id(&mut rng);
        Self {
            source,
            sink,
            clock,
            rng,
            config,
            events: Listenable::new(),
            all: Vec::new(),
            active: Vec::new(),
            cursor: -1,
            session,
            status: SurveyStatus::Uninitialized,
            pending: None,
            initialized: false,
        }
    }

    /// Loads the image list from the source. Until this succeeds the
    /// controller refuses to start; a failure is surfaced exactly once
    /// per attempt and leaves everything else usable for `reset`.
    pub fn initialize(&mut self) -> Result<(), SurveyError> {
        match self.source.image_list() {
            Ok(images) => {
                info!("survey controller loaded {} image(s)", images.len());
                self.all = images;
                self.initialized = true;
                self.status = SurveyStatus::Idle;
                Ok(())
            }
            Err(err) => {
                error!("survey controller initialization failed: {err:#}");
                Err(SurveyError::Source(err))
            }
        }
    }

    pub fn subscribe(&self, handler: impl FnMut(&SurveyEvent) -> ListenerResult + 'static) -> ListenerId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.events.unsubscribe(id);
    }

    /// Builds the active trial list (mode filter, then ordering policy),
    /// regenerates the session id and advances to the first trial. An
    /// empty image set completes immediately.
    pub fn start(&mut self) -> Result<(), SurveyError> {
        if !self.initialized {
            return Err(SurveyError::NotInitialized);
        }

        self.pending = None;
        self.session = Self::generate_session_id(&mut self.rng);

        let mut images: Vec<ImageDescriptor> = self
            .all
            .iter()
            .filter(|image| self.config.mode.admits(image.mode))
            .cloned()
            .collect();
        order::apply(self.config.ordering, &mut images, &mut self.rng);

        self.active = images.into_iter().map(Trial::new).collect();
        self.cursor = -1;
        self.status = SurveyStatus::InProgress;
        info!(
            "starting survey session {} with {} trial(s)",
            self.session,
            self.active.len()
        );

        let mut failures = Vec::new();
        self.emit(SurveyEvent::Started, &mut failures);
        self.advance(false, &mut failures);
        BroadcastError::from_failures(failures).map_err(SurveyError::from)
    }

    /// Participant acknowledged the trial they are looking at. Stale
    /// snapshots (a delayed UI callback racing a timer-driven advance)
    /// and not-yet-revealed trials are silently ignored.
    pub fn acknowledge(&mut self, trial: &TrialSnapshot) -> Result<(), BroadcastError> {
        if self.status != SurveyStatus::InProgress {
            return Ok(());
        }
        let Some(pending) = self.pending else {
            return Ok(());
        };
        if trial.index != pending.index
            || trial.image.name != self.active[pending.index].image.name
        {
            return Ok(());
        }
        let Some(revealed_at) = self.active[pending.index].revealed_at else {
            return Ok(());
        };

        let now = self.clock.now_ms();
        let duration = now.saturating_sub(revealed_at);
        debug!(
            "acknowledged {} in {duration} ms",
            self.active[pending.index].image.name
        );

        self.pending = None;
        self.record(pending.index, Some(duration), true);

        let mut failures = Vec::new();
        self.advance(false, &mut failures);
        BroadcastError::from_failures(failures)
    }

    /// Explicitly gives up on the current trial; records the same
    /// unacknowledged result as the auto-skip timeout.
    pub fn skip(&mut self) -> Result<(), BroadcastError> {
        if self.status != SurveyStatus::InProgress {
            return Ok(());
        }
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        debug!("skipped {}", self.active[pending.index].image.name);
        self.record(pending.index, None, false);

        let mut failures = Vec::new();
        self.advance(false, &mut failures);
        BroadcastError::from_failures(failures)
    }

    /// Leaves a rest break, bypassing the break boundary for one step.
    pub fn resume(&mut self) -> Result<(), BroadcastError> {
        if self.status != SurveyStatus::OnBreak {
            return Ok(());
        }
        let mut failures = Vec::new();
        self.advance(true, &mut failures);
        BroadcastError::from_failures(failures)
    }

    /// Cancels any pending deadlines, clears the run and hands out a
    /// fresh session id. Works from any state.
    pub fn reset(&mut self) -> Result<(), BroadcastError> {
        self.pending = None;
        self.cursor = -1;
        self.active.clear();
        self.session = Self::generate_session_id(&mut self.rng);
        if self.initialized {
            self.status = SurveyStatus::Idle;
        }
        info!("survey reset, new session {}", self.session);

        let mut failures = Vec::new();
        self.emit(
            SurveyEvent::Reset {
                session_id: self.session.clone(),
            },
            &mut failures,
        );
        BroadcastError::from_failures(failures)
    }

    /// Polls the current trial's deadlines against the clock. The reveal
    /// deadline always fires before the auto-skip one, so events keep
    /// their causal order even under large virtual-time jumps.
    pub fn tick(&mut self) -> Result<(), BroadcastError> {
        if self.status != SurveyStatus::InProgress {
            return Ok(());
        }
        let now = self.clock.now_ms();
        let mut failures = Vec::new();

        let reveal_due = self
            .pending
            .and_then(|p| p.reveal_at.map(|at| (p.index, at)))
            .filter(|(_, at)| now >= *at);
        if let Some((index, _)) = reveal_due {
            if let Some(pending) = self.pending.as_mut() {
                pending.reveal_at = None;
            }
            let trial = &mut self.active[index];
            trial.hidden = false;
            trial.revealed_at = Some(now);
            let snapshot = trial.snapshot(index);
            self.emit(SurveyEvent::TrialUpdated(snapshot), &mut failures);
        }

        match self.pending {
            Some(pending) if now >= pending.skip_at => {
                self.pending = None;
                info!(
                    "trial {} timed out unacknowledged",
                    self.active[pending.index].image.name
                );
                self.record(pending.index, None, false);
                self.advance(false, &mut failures);
            }
            _ => {}
        }

        BroadcastError::from_failures(failures)
    }

    /// Takes effect on the next start.
    pub fn set_mode(&mut self, mode: SurveyMode) {
        self.config.mode = mode;
    }

    pub fn set_break_cadence(&mut self, cadence: usize) -> Result<(), SurveyError> {
        if cadence == 0 {
            return Err(SurveyError::InvalidCadence(cadence));
        }
        self.config.break_cadence = cadence;
        Ok(())
    }

    pub fn status(&self) -> SurveyStatus {
        self.status
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    pub fn mode(&self) -> SurveyMode {
        self.config.mode
    }

    pub fn break_cadence(&self) -> usize {
        self.config.break_cadence
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn trial_count(&self) -> usize {
        self.active.len()
    }

    pub fn current_trial(&self) -> Option<TrialSnapshot> {
        if self.cursor < 0 {
            return None;
        }
        let index = self.cursor as usize;
        self.active.get(index).map(|trial| trial.snapshot(index))
    }

    /// `(position, total)` for progress display; position counts the
    /// current trial, so it reads "trial 3 of 40".
    pub fn progress(&self) -> (usize, usize) {
        let total = self.active.len();
        let position = (self.cursor + 1).clamp(0, total as isize) as usize;
        (position, total)
    }

    /// Advance algorithm: break boundary check, completion check, then
    /// arm the next trial with a randomized reveal delay and the two
    /// deadlines derived from it.
    fn advance(&mut self, resuming: bool, failures: &mut Vec<ListenerFailure>) {
        let total = self.active.len();
        let next = self.cursor + 1;

        if !resuming && next > 0 && (next as usize) % self.config.break_cadence == 0 {
            self.status = SurveyStatus::OnBreak;
            self.emit(
                SurveyEvent::Break {
                    current: next as usize,
                    total,
                },
                failures,
            );
            return;
        }

        self.cursor = next;
        let index = next as usize;
        if index >= total {
            self.status = SurveyStatus::Completed;
            info!("survey session {} completed", self.session);
            self.emit(SurveyEvent::Completed, failures);
            return;
        }

        self.status = SurveyStatus::InProgress;
        let now = self.clock.now_ms();
        let (lo, hi) = self.config.reveal_delay_range_ms;
        let delay = self.rng.random_range(lo..=hi);

        let trial = &mut self.active[index];
        trial.hidden = true;
        trial.revealed_at = None;
        trial.delay_ms = Some(delay);
        let snapshot = trial.snapshot(index);

        self.pending = Some(TrialDeadlines {
            index,
            reveal_at: Some(now + delay),
            skip_at: now + delay + self.config.skip_timeout_ms,
        });
        self.emit(SurveyEvent::TrialUpdated(snapshot), failures);
    }

    /// Fire-and-forget result write; sink failures are logged, never
    /// allowed to stall the survey.
    fn record(&mut self, index: usize, duration_ms: Option<u64>, acknowledged: bool) {
        let trial = &self.active[index];
        let record = ResultRecord {
            session_id: self.session.clone(),
            test_name: trial.image.name.clone(),
            test_index: index,
            duration_ms,
            delay_ms: trial.delay_ms.unwrap_or(0),
            acknowledged,
        };
        if let Err(err) = self.sink.submit(record) {
            warn!("failed to submit result for trial {index}: {err:#}");
        }
    }

    fn emit(&self, event: SurveyEvent, failures: &mut Vec<ListenerFailure>) {
        if let Err(err) = self.events.publish(&event) {
            failures.extend(err.failures);
        }
    }

    fn generate_session_id(rng: &mut R) -> SessionId {
        SessionId::new(format!("{:016x}", rng.random::<u64>()))
    }
}
