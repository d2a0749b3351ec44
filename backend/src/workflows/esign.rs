//! Engagement e-signature
//!
//! Draft → Sent → Signed → Archived, one step per advisor action.
//! Archiving the signed engagement moves the client to Review.

use super::{StepOutcome, Workflow, WorkflowError, WorkflowKind};
use crate::models::client::Client;
use crate::models::event::ChangeCause;
use crate::models::status::ClientStatus;

/// Engagement letter covered by the signature request
pub const ENGAGEMENT_TITLE: &str = "2025 Tax Preparation & Advisory";

/// E-sign stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ESignStage {
    Draft,
    Sent,
    Signed,
    Archived,
}

impl ESignStage {
    pub const ALL: [ESignStage; 4] = [
        ESignStage::Draft,
        ESignStage::Sent,
        ESignStage::Signed,
        ESignStage::Archived,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ESignStage::Draft => "Draft",
            ESignStage::Sent => "Sent",
            ESignStage::Signed => "Signed",
            ESignStage::Archived => "Archived",
        }
    }

    fn next(self) -> Option<ESignStage> {
        match self {
            ESignStage::Draft => Some(ESignStage::Sent),
            ESignStage::Sent => Some(ESignStage::Signed),
            ESignStage::Signed => Some(ESignStage::Archived),
            ESignStage::Archived => None,
        }
    }
}

/// E-sign state machine
///
/// # Example
/// ```
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::workflows::{ESignStage, ESignWorkflow, Workflow};
///
/// let client = &generate(1, 2025)[0];
/// let mut esign = ESignWorkflow::new();
/// esign.start(client).unwrap();
/// esign.advance(client).unwrap();
/// esign.advance(client).unwrap();
/// let outcome = esign.advance(client).unwrap();
///
/// assert_eq!(esign.stage(), Some(ESignStage::Archived));
/// assert_eq!(outcome.effects.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ESignWorkflow {
    stage: Option<ESignStage>,
}

impl ESignWorkflow {
    pub fn new() -> Self {
        Self { stage: None }
    }

    /// Current stage; `None` before `start`
    pub fn stage(&self) -> Option<ESignStage> {
        self.stage
    }
}

impl Workflow for ESignWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::ESign
    }

    fn start(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        if self.stage.is_some() {
            return Err(WorkflowError::AlreadyStarted(self.kind()));
        }

        self.stage = Some(ESignStage::Draft);
        Ok(StepOutcome::lines([
            "eSign initiated".to_string(),
            format!(
                "Engagement \"{}\" drafted for {} <{}>",
                ENGAGEMENT_TITLE,
                client.name(),
                client.contact().email
            ),
        ]))
    }

    fn advance(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        let current = self.stage.ok_or(WorkflowError::NotStarted(self.kind()))?;
        let next = current
            .next()
            .ok_or(WorkflowError::AlreadyFinished(self.kind()))?;
        self.stage = Some(next);

        Ok(match next {
            ESignStage::Sent => {
                StepOutcome::log(format!("Sent for signature to {}", client.contact().email))
            }
            ESignStage::Signed => StepOutcome::log("Marked as signed"),
            ESignStage::Archived => StepOutcome::log("eSign completed")
                .request_status(ClientStatus::Review, ChangeCause::ESignCompleted),
            ESignStage::Draft => StepOutcome::default(),
        })
    }

    fn is_finished(&self) -> bool {
        self.stage == Some(ESignStage::Archived)
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
