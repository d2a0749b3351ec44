//! TaxAgent run: scripted analysis log, then recommendations after a pause

use super::{StepOutcome, Workflow, WorkflowError, WorkflowKind};
use crate::models::client::Client;

/// Pause before recommendations are ready (ms)
pub const ANALYSIS_DELAY_MS: u64 = 800;

/// Two-step agent run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentRun {
    started: bool,
    finished: bool,
}

impl AgentRun {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Workflow for AgentRun {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::AgentRun
    }

    fn start(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        if self.started {
            return Err(WorkflowError::AlreadyStarted(self.kind()));
        }

        self.started = true;
        Ok(StepOutcome::lines([
            format!("Analyzing {} ({})…", client.name(), client.id()),
            "Gathering prior-year signals…".to_string(),
            "Scanning docs & 1099/W-2 completeness…".to_string(),
            "Checking KY local obligations…".to_string(),
            "Evaluating deductions & credits…".to_string(),
            "Projecting refund/balance range…".to_string(),
        ])
        .then_after(ANALYSIS_DELAY_MS))
    }

    fn advance(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
        if !self.started {
            return Err(WorkflowError::NotStarted(self.kind()));
        }
        if self.finished {
            return Err(WorkflowError::AlreadyFinished(self.kind()));
        }

        self.finished = true;
        Ok(StepOutcome::log("Recommended actions prepared."))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
