//! Client workflows
//!
//! # Overview
//!
//! The profile screen runs short, scripted workflows against one client:
//! engagement e-sign, the return wizard, e-file submission, the AI agent
//! run, the document check and upload detection. Each is a small state
//! machine that moves exactly one step per call and reports what happened
//! as a [`StepOutcome`]; it never sleeps and never touches the store.
//!
//! Timing lives outside the step logic. A workflow says how long to wait
//! before its next automatic step, and [`WorkflowRunner`] turns that into
//! timers on a virtual clock. Status changes and generated documents are
//! requested as [`Effect`]s and applied by the runner, so the transition
//! table still has the final word.
//!
//! # Workflow Interface
//!
//! ```rust
//! use orcatax_core_rs::models::Client;
//! use orcatax_core_rs::workflows::{StepOutcome, Workflow, WorkflowError, WorkflowKind};
//!
//! struct Ping {
//!     done: bool,
//! }
//!
//! impl Workflow for Ping {
//!     fn kind(&self) -> WorkflowKind {
//!         WorkflowKind::AgentRun
//!     }
//!
//!     fn start(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
//!         Ok(StepOutcome::log("ping").then_after(100))
//!     }
//!
//!     fn advance(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
//!         self.done = true;
//!         Ok(StepOutcome::log("pong"))
//!     }
//!
//!     fn is_finished(&self) -> bool {
//!         self.done
//!     }
//!
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
//!         self
//!     }
//! }
//! ```

pub mod agent_run;
pub mod doc_check;
pub mod efile;
pub mod esign;
pub mod return_wizard;
pub mod runner;

use crate::document::DocumentError;
use crate::models::client::Client;
use crate::models::event::ChangeCause;
use crate::models::status::ClientStatus;
use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

pub use agent_run::AgentRun;
pub use doc_check::{DocCheck, UploadDetection};
pub use efile::{EFileStage, EFileWorkflow};
pub use esign::{ESignStage, ESignWorkflow};
pub use return_wizard::{Deductions, IncomeDocs, ReturnWizard, WizardStep};
pub use runner::{RunId, RunUpdate, WorkflowRunner};

/// Which workflow a run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    ESign,
    ReturnWizard,
    EFile,
    AgentRun,
    DocCheck,
    UploadDetection,
}

impl WorkflowKind {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowKind::ESign => "Engagement eSign",
            WorkflowKind::ReturnWizard => "Return Builder",
            WorkflowKind::EFile => "IRS e-File",
            WorkflowKind::AgentRun => "TaxAgent run",
            WorkflowKind::DocCheck => "AI doc check",
            WorkflowKind::UploadDetection => "Upload detection",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Side effect a step asks the runner to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move the client to `to`
    RequestStatus { to: ClientStatus, cause: ChangeCause },

    /// Render the client's mock Form 1040 and attach it to the run
    IssueReturnDocument,
}

/// What one step produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Lines to append to the run's log
    pub log: Vec<String>,

    /// Requested side effects, applied in order
    pub effects: Vec<Effect>,

    /// Delay before the next automatic step; `None` waits for the caller
    pub next_after_ms: Option<u64>,
}

impl StepOutcome {
    /// Outcome with a single log line
    pub fn log(line: impl Into<String>) -> Self {
        Self {
            log: vec![line.into()],
            ..Self::default()
        }
    }

    /// Outcome with several log lines
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            log: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Schedule the next step `ms` from now
    pub fn then_after(mut self, ms: u64) -> Self {
        self.next_after_ms = Some(ms);
        self
    }

    /// Request a status change
    pub fn request_status(mut self, to: ClientStatus, cause: ChangeCause) -> Self {
        self.effects.push(Effect::RequestStatus { to, cause });
        self
    }

    /// Request the mock Form 1040
    pub fn issue_return_document(mut self) -> Self {
        self.effects.push(Effect::IssueReturnDocument);
        self
    }
}

/// Reasons a workflow step fails
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    /// A validation check stopped the step; state is unchanged
    #[error("{0}")]
    Blocked(String),

    #[error("{workflow} cannot run for a client in {status}")]
    NotEligible {
        workflow: WorkflowKind,
        status: ClientStatus,
    },

    #[error("{0} already started")]
    AlreadyStarted(WorkflowKind),

    #[error("{0} already finished")]
    AlreadyFinished(WorkflowKind),

    #[error("{0} has not started")]
    NotStarted(WorkflowKind),

    #[error("{0} was stopped")]
    Stopped(WorkflowKind),

    #[error("Unknown workflow run: {0}")]
    UnknownRun(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// A scripted, single-client workflow
///
/// `start` enters the first step; each `advance` moves exactly one step.
/// Implementations keep all state needed to resume and never block.
pub trait Workflow {
    fn kind(&self) -> WorkflowKind;

    /// Delay before `start` runs when launched through the runner
    fn initial_delay_ms(&self) -> u64 {
        0
    }

    /// Preconditions, checked at launch and again before every step
    ///
    /// Must reject any client whose status would make the effects of the
    /// next step fail, so a run never moves past a step it cannot commit.
    fn check(&self, _client: &Client) -> Result<(), WorkflowError> {
        Ok(())
    }

    /// Enter the first step
    ///
    /// # Errors
    /// `Blocked` or `NotEligible` when the workflow cannot begin
    fn start(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError>;

    /// Move one step forward
    fn advance(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError>;

    /// True once the last step has run
    fn is_finished(&self) -> bool;

    /// Downcast support so callers can reach workflow-specific inputs
    /// (e.g. the wizard's checkboxes) while the runner owns the workflow
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
