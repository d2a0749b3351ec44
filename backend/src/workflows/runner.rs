//! Workflow runner
//!
//! Drives workflows on a virtual clock and applies their effects to the
//! store.
//!
//! # Execution Model
//!
//! ```text
//! launch(workflow)
//!   ├─ check preconditions (rejects without registering the run)
//!   ├─ initial delay 0 → start now
//!   └─ otherwise       → timer(start)
//!
//! each step (timer fire or explicit advance)
//!   1. re-check preconditions; a failure stops the run before it moves
//!   2. call start/advance on the workflow
//!   3. apply its effects: render documents, then change status
//!   4. append its log lines and schedule the next step if asked
//! ```
//!
//! Timers fire only inside [`WorkflowRunner::advance_time`] and
//! [`WorkflowRunner::run_until_idle`], one at a time in due order, so a step
//! scheduled by an earlier step in the same window still fires in that
//! window. A failing timer step is reported in its [`RunUpdate`] and never
//! stops the other runs.
//!
//! # Critical Invariants
//!
//! 1. **No half-committed steps**: A run never reports a step whose effects
//!    were rejected by the store; it is stopped instead
//! 2. **Bounded history**: At most [`RETAINED_FINISHED_RUNS`] finished or
//!    stopped runs are kept for inspection

use super::{Effect, Workflow, WorkflowError, WorkflowKind};
use crate::core::scheduler::{TimerId, TimerQueue};
use crate::document::{render_form_1040, DocumentRenderer, PdfRenderer, RenderedDocument};
use crate::metrics::TaxRates;
use crate::models::client::Client;
use crate::models::event::{ChangeCause, Event};
use crate::models::status::ClientStatus;
use crate::store::{ClientStore, Command, StoreError};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use tracing::{debug, warn};

/// Finished or stopped runs kept before the oldest is dropped
pub const RETAINED_FINISHED_RUNS: usize = 32;

/// Identifier of one launched workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// What a single step of a run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunUpdate {
    pub run: RunId,
    pub kind: WorkflowKind,
    pub client_id: String,

    /// Virtual time of the step (ms)
    pub at_ms: u64,

    /// Log lines the step produced
    pub log: Vec<String>,

    /// Store events caused by the step's effects
    pub events: Vec<Event>,

    /// Documents the step produced
    pub documents: Vec<RenderedDocument>,

    pub finished: bool,

    /// Why the run was stopped at this step
    pub error: Option<WorkflowError>,
}

impl RunUpdate {
    fn empty(run: RunId, kind: WorkflowKind, client_id: &str, at_ms: u64) -> Self {
        Self {
            run,
            kind,
            client_id: client_id.to_string(),
            at_ms,
            log: Vec::new(),
            events: Vec::new(),
            documents: Vec::new(),
            finished: false,
            error: None,
        }
    }

    /// True if the run was stopped at this step
    pub fn is_stopped(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Advance,
}

struct ActiveRun {
    client_id: String,
    workflow: Box<dyn Workflow>,
    log: Vec<String>,
    documents: Vec<RenderedDocument>,
    started: bool,
    stopped: bool,

    /// Timer for the next automatic step, if one is pending
    timer: Option<TimerId>,
}

impl ActiveRun {
    fn is_done(&self) -> bool {
        self.stopped || self.workflow.is_finished()
    }
}

/// Runs workflows against a [`ClientStore`]
///
/// # Example
/// ```
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::store::{ClientStore, StoreConfig};
/// use orcatax_core_rs::workflows::{AgentRun, WorkflowRunner};
///
/// let mut store = ClientStore::new(generate(3, 2025), &StoreConfig::default()).unwrap();
/// let mut runner = WorkflowRunner::new();
///
/// let first = runner.launch(&mut store, "C0002", Box::new(AgentRun::new())).unwrap();
/// assert_eq!(first.log.len(), 6);
///
/// let updates = runner.advance_time(&mut store, 800);
/// assert_eq!(updates[0].log, vec!["Recommended actions prepared."]);
/// assert!(updates[0].finished);
/// ```
pub struct WorkflowRunner {
    timers: TimerQueue<(RunId, Step)>,
    runs: BTreeMap<RunId, ActiveRun>,
    next_run: u64,

    /// Finished or stopped runs, oldest first
    done: VecDeque<RunId>,

    rates: TaxRates,
    renderer: Box<dyn DocumentRenderer>,
}

impl Default for WorkflowRunner {
    fn default() -> Self {
        Self::with_documents(TaxRates::default(), Box::new(PdfRenderer::new()))
    }
}

impl WorkflowRunner {
    /// Runner rendering documents as PDF with the default rates
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner rendering documents with `renderer` at `rates`
    pub fn with_documents(rates: TaxRates, renderer: Box<dyn DocumentRenderer>) -> Self {
        Self {
            timers: TimerQueue::new(),
            runs: BTreeMap::new(),
            next_run: 0,
            done: VecDeque::new(),
            rates,
            renderer,
        }
    }

    /// Current virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Number of steps waiting on a timer
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Number of runs still held, active or retained
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Launch a workflow for a client
    ///
    /// Returns the update of the first step when the workflow starts
    /// immediately, or an empty update when its start is delayed.
    ///
    /// # Errors
    /// - `Store(ClientNotFound)` for an unknown client
    /// - `AlreadyStarted` if an unfinished run of the same kind exists for
    ///   this client
    /// - whatever the workflow's precondition check or first step rejects;
    ///   the run is not registered in that case
    pub fn launch(
        &mut self,
        store: &mut ClientStore,
        client_id: &str,
        workflow: Box<dyn Workflow>,
    ) -> Result<RunUpdate, WorkflowError> {
        let kind = workflow.kind();
        let client = store
            .get(client_id)
            .ok_or_else(|| StoreError::ClientNotFound(client_id.to_string()))?;

        let duplicate = self.runs.values().any(|run| {
            run.client_id == client_id && run.workflow.kind() == kind && !run.is_done()
        });
        if duplicate {
            return Err(WorkflowError::AlreadyStarted(kind));
        }
        workflow.check(client)?;

        let run_id = RunId(self.next_run);
        let delay = workflow.initial_delay_ms();
        self.runs.insert(
            run_id,
            ActiveRun {
                client_id: client_id.to_string(),
                workflow,
                log: Vec::new(),
                documents: Vec::new(),
                started: false,
                stopped: false,
                timer: None,
            },
        );
        self.next_run += 1;
        debug!(%run_id, %kind, client_id, delay_ms = delay, "workflow launched");

        if delay > 0 {
            let timer = self.timers.schedule_after(delay, (run_id, Step::Start));
            if let Some(run) = self.runs.get_mut(&run_id) {
                run.timer = Some(timer);
            }
            return Ok(RunUpdate::empty(run_id, kind, client_id, self.now_ms()));
        }

        self.step(store, run_id, Step::Start).map_err(|e| {
            self.runs.remove(&run_id);
            self.done.retain(|id| *id != run_id);
            e
        })
    }

    /// Move a run one step forward now
    ///
    /// Used for advisor-driven workflows (e-sign, wizard). A pending timer
    /// for the run is cancelled first so the run never moves twice for one
    /// step.
    ///
    /// # Errors
    /// - `Stopped` if the run was stopped earlier
    /// - a failed precondition, which stops the run
    /// - whatever the workflow's step rejects (e.g. `Blocked`); the run
    ///   stays where it was and may be advanced again
    pub fn advance(&mut self, store: &mut ClientStore, run_id: RunId) -> Result<RunUpdate, WorkflowError> {
        let run = self
            .runs
            .get_mut(&run_id)
            .ok_or(WorkflowError::UnknownRun(run_id.0))?;
        if run.stopped {
            return Err(WorkflowError::Stopped(run.workflow.kind()));
        }
        if run.workflow.is_finished() {
            return Err(WorkflowError::AlreadyFinished(run.workflow.kind()));
        }

        if let Some(timer) = run.timer.take() {
            self.timers.cancel(timer);
        }
        let step = if run.started { Step::Advance } else { Step::Start };
        self.step(store, run_id, step)
    }

    /// Advance virtual time by `ms`, running every step that comes due
    ///
    /// The clock always ends at the target. A failing step stops only its
    /// own run and is reported in that run's update.
    pub fn advance_time(&mut self, store: &mut ClientStore, ms: u64) -> Vec<RunUpdate> {
        let target = self.now_ms().saturating_add(ms);
        let mut updates = Vec::new();

        while self.timers.next_due_ms().is_some_and(|due| due <= target) {
            updates.extend(self.fire_next(store));
        }
        self.timers.advance_to(target);

        updates
    }

    /// Run every pending step, however far in the future
    pub fn run_until_idle(&mut self, store: &mut ClientStore) -> Vec<RunUpdate> {
        let mut updates = Vec::new();
        while !self.timers.is_idle() {
            updates.extend(self.fire_next(store));
        }
        updates
    }

    /// Full log of a run
    pub fn log(&self, run_id: RunId) -> Option<&[String]> {
        self.runs.get(&run_id).map(|run| run.log.as_slice())
    }

    /// Documents a run has produced so far
    pub fn documents(&self, run_id: RunId) -> Option<&[RenderedDocument]> {
        self.runs.get(&run_id).map(|run| run.documents.as_slice())
    }

    pub fn is_finished(&self, run_id: RunId) -> Option<bool> {
        self.runs.get(&run_id).map(|run| run.workflow.is_finished())
    }

    /// True if the run was stopped before finishing
    pub fn is_stopped(&self, run_id: RunId) -> Option<bool> {
        self.runs.get(&run_id).map(|run| run.stopped)
    }

    /// Typed access to a run's workflow (e.g. to tick wizard checkboxes)
    pub fn workflow_mut<W: Workflow + 'static>(&mut self, run_id: RunId) -> Option<&mut W> {
        self.runs
            .get_mut(&run_id)?
            .workflow
            .as_any_mut()
            .downcast_mut::<W>()
    }

    fn fire_next(&mut self, store: &mut ClientStore) -> Option<RunUpdate> {
        let fired = self.timers.fire_next()?;
        let (run_id, step) = fired.payload;

        let run = self.runs.get_mut(&run_id)?;
        run.timer = None;
        let kind = run.workflow.kind();
        let client_id = run.client_id.clone();

        match self.step(store, run_id, step) {
            Ok(update) => Some(update),
            Err(error) => {
                // nothing would ever advance this run again
                let mut update = RunUpdate::empty(run_id, kind, &client_id, self.now_ms());
                if let Some(line) = self.stop(run_id, &error) {
                    update.log.push(line);
                }
                update.error = Some(error);
                Some(update)
            }
        }
    }

    fn step(
        &mut self,
        store: &mut ClientStore,
        run_id: RunId,
        step: Step,
    ) -> Result<RunUpdate, WorkflowError> {
        let at_ms = self.timers.now_ms();
        let run = self
            .runs
            .get_mut(&run_id)
            .ok_or(WorkflowError::UnknownRun(run_id.0))?;
        let kind = run.workflow.kind();

        let client = store
            .get(&run.client_id)
            .ok_or_else(|| StoreError::ClientNotFound(run.client_id.clone()))?
            .clone();

        if let Err(error) = run.workflow.check(&client) {
            // the client changed under the run; stop before the workflow moves
            self.stop(run_id, &error);
            return Err(error);
        }

        let outcome = match step {
            Step::Start => run.workflow.start(&client)?,
            Step::Advance => run.workflow.advance(&client)?,
        };
        run.started = true;

        let client_id = run.client_id.clone();
        let mut documents = Vec::new();
        let mut events = Vec::new();
        for effect in &outcome.effects {
            let applied = match effect {
                Effect::IssueReturnDocument => {
                    render_form_1040(&client, &self.rates, self.renderer.as_ref())
                        .map(|doc| documents.push(doc))
                        .map_err(WorkflowError::from)
                }
                Effect::RequestStatus { to, cause } => {
                    apply_status(store, &client, *to, *cause).map(|e| events.extend(e))
                }
            };
            if let Err(error) = applied {
                self.stop(run_id, &error);
                return Err(error);
            }
        }

        let run = self
            .runs
            .get_mut(&run_id)
            .ok_or(WorkflowError::UnknownRun(run_id.0))?;
        run.log.extend(outcome.log.iter().cloned());
        run.documents.extend(documents.iter().cloned());
        if let Some(delay) = outcome.next_after_ms {
            run.timer = Some(self.timers.schedule_after(delay, (run_id, Step::Advance)));
        }

        let finished = run.workflow.is_finished();
        debug!(%run_id, %kind, at_ms, finished, "workflow step");
        if finished {
            self.retire(run_id);
        }

        Ok(RunUpdate {
            run: run_id,
            kind,
            client_id,
            at_ms,
            log: outcome.log,
            events,
            documents,
            finished,
            error: None,
        })
    }

    /// Mark a run stopped and log why; returns the logged line
    fn stop(&mut self, run_id: RunId, error: &WorkflowError) -> Option<String> {
        let run = self.runs.get_mut(&run_id)?;
        if run.stopped {
            return run.log.last().cloned();
        }
        if let Some(timer) = run.timer.take() {
            self.timers.cancel(timer);
        }
        let kind = run.workflow.kind();
        let line = format!("{} stopped: {}", kind, error);
        warn!(%run_id, %kind, client_id = %run.client_id, %error, "workflow stopped");

        run.stopped = true;
        run.log.push(line.clone());
        self.retire(run_id);
        Some(line)
    }

    /// Remember a run that will not move again, dropping the oldest ones
    fn retire(&mut self, run_id: RunId) {
        self.done.push_back(run_id);
        while self.done.len() > RETAINED_FINISHED_RUNS {
            if let Some(oldest) = self.done.pop_front() {
                self.runs.remove(&oldest);
            }
        }
    }
}

/// Move the client to `to`; a status it already has is a no-op
fn apply_status(
    store: &mut ClientStore,
    client: &Client,
    to: ClientStatus,
    cause: ChangeCause,
) -> Result<Vec<Event>, WorkflowError> {
    if client.status() == to {
        debug!(client_id = client.id(), %to, "client already in requested status");
        return Ok(Vec::new());
    }

    store
        .apply(Command::ChangeStatus {
            client_id: client.id().to_string(),
            to,
            cause,
        })
        .map_err(|e| {
            warn!(client_id = client.id(), %to, error = %e, "workflow status change rejected");
            WorkflowError::from(e)
        })
}
