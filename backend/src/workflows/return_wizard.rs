//! Return builder wizard
//!
//! Identity → Income → Deductions → Review. Moving forward is gated: the
//! identity step needs a KYC check, the income step needs at least one
//! income document. A blocked move leaves the wizard where it was.

use super::{StepOutcome, Workflow, WorkflowError, WorkflowKind};
use crate::models::client::Client;
use crate::models::document::{DocumentKind, DocumentLedger};
use crate::models::event::ChangeCause;
use crate::models::status::ClientStatus;

pub const ID_VERIFICATION_REQUIRED: &str = "ID verification required";
pub const INCOME_DOCUMENT_REQUIRED: &str = "Upload at least one income document";

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Identity,
    Income,
    Deductions,
    Review,
}

impl WizardStep {
    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Identity => "Identity",
            WizardStep::Income => "Income",
            WizardStep::Deductions => "Deductions",
            WizardStep::Review => "Review",
        }
    }

    fn next(self) -> WizardStep {
        match self {
            WizardStep::Identity => WizardStep::Income,
            WizardStep::Income => WizardStep::Deductions,
            WizardStep::Deductions | WizardStep::Review => WizardStep::Review,
        }
    }

    fn previous(self) -> WizardStep {
        match self {
            WizardStep::Identity | WizardStep::Income => WizardStep::Identity,
            WizardStep::Deductions => WizardStep::Income,
            WizardStep::Review => WizardStep::Deductions,
        }
    }
}

/// Income documents ticked on the Income step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncomeDocs {
    pub w2: bool,
    pub form_1099: bool,
    pub k1: bool,
}

impl IncomeDocs {
    /// Pre-tick the boxes for documents already uploaded
    pub fn from_ledger(ledger: &DocumentLedger) -> Self {
        ledger
            .documents()
            .iter()
            .fold(IncomeDocs::default(), |mut docs, doc| {
                match doc.kind {
                    DocumentKind::W2 => docs.w2 = true,
                    DocumentKind::Form1099 => docs.form_1099 = true,
                    DocumentKind::K1 => docs.k1 = true,
                    _ => {}
                }
                docs
            })
    }

    pub fn any(&self) -> bool {
        self.w2 || self.form_1099 || self.k1
    }

    /// Ticked document labels, e.g. `"W2, 1099"`, or `"None"`
    pub fn summary(&self) -> String {
        let ticked: Vec<&str> = [(self.w2, "W2"), (self.form_1099, "1099"), (self.k1, "K1")]
            .into_iter()
            .filter_map(|(on, label)| on.then_some(label))
            .collect();

        if ticked.is_empty() {
            "None".to_string()
        } else {
            ticked.join(", ")
        }
    }
}

/// Deduction method chosen on the Deductions step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Deductions {
    #[default]
    Standard,
    Itemized,
}

impl Deductions {
    pub fn label(self) -> &'static str {
        match self {
            Deductions::Standard => "standard",
            Deductions::Itemized => "itemized",
        }
    }
}

/// Return builder state
///
/// The public fields are the form inputs; the step only moves through
/// [`next`](ReturnWizard::next), [`back`](ReturnWizard::back) and
/// [`finish`](ReturnWizard::finish).
///
/// # Example
/// ```
/// use orcatax_core_rs::workflows::{ReturnWizard, WizardStep, WorkflowError};
///
/// let mut wizard = ReturnWizard::new(2);
/// assert_eq!(
///     wizard.next(),
///     Err(WorkflowError::Blocked("ID verification required".to_string()))
/// );
///
/// wizard.id_verified = true;
/// wizard.next().unwrap();
/// assert_eq!(wizard.step(), WizardStep::Income);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnWizard {
    step: WizardStep,
    started: bool,
    finished: bool,

    /// KYC check passed
    pub id_verified: bool,

    pub income_docs: IncomeDocs,

    /// Dependents claimed (pre-filled from the client)
    pub dependents: u8,

    pub deductions: Deductions,
}

impl ReturnWizard {
    pub fn new(dependents: u8) -> Self {
        Self {
            step: WizardStep::Identity,
            started: false,
            finished: false,
            id_verified: false,
            income_docs: IncomeDocs::default(),
            dependents,
            deductions: Deductions::Standard,
        }
    }

    /// Wizard pre-filled from a client and their uploaded documents
    pub fn for_client(client: &Client, ledger: &DocumentLedger) -> Self {
        Self {
            income_docs: IncomeDocs::from_ledger(ledger),
            ..Self::new(client.dependents())
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Move to the next step
    ///
    /// # Errors
    /// `Blocked` with the form message when the current step is incomplete
    pub fn next(&mut self) -> Result<WizardStep, WorkflowError> {
        if self.finished {
            return Err(WorkflowError::AlreadyFinished(WorkflowKind::ReturnWizard));
        }
        match self.step {
            WizardStep::Identity if !self.id_verified => {
                return Err(WorkflowError::Blocked(ID_VERIFICATION_REQUIRED.to_string()))
            }
            WizardStep::Income if !self.income_docs.any() => {
                return Err(WorkflowError::Blocked(INCOME_DOCUMENT_REQUIRED.to_string()))
            }
            _ => {}
        }

        self.step = self.step.next();
        Ok(self.step)
    }

    /// Move to the previous step; stays on Identity
    pub fn back(&mut self) -> WizardStep {
        if !self.finished {
            self.step = self.step.previous();
        }
        self.step
    }

    /// Complete the return from the Review step
    ///
    /// # Errors
    /// `Blocked` unless the wizard is on Review
    pub fn finish(&mut self) -> Result<StepOutcome, WorkflowError> {
        if self.finished {
            return Err(WorkflowError::AlreadyFinished(WorkflowKind::ReturnWizard));
        }
        if self.step != WizardStep::Review {
            return Err(WorkflowError::Blocked(format!(
                "Finish is only available on {}",
                WizardStep::Review.label()
            )));
        }

        self.finished = true;
        Ok(StepOutcome::lines([
            format!("Dependents: {}", self.dependents),
            format!("Docs: {}", self.income_docs.summary()),
            format!("Deductions: {}", self.deductions.label()),
            "Return complete (demo)".to_string(),
        ])
        .request_status(ClientStatus::Review, ChangeCause::ReturnCompleted))
    }
}

impl Workflow for ReturnWizard {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::ReturnWizard
    }

    fn start(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        if self.started {
            return Err(WorkflowError::AlreadyStarted(self.kind()));
        }

        self.started = true;
        Ok(StepOutcome::log(format!(
            "Return builder opened for {} ({})",
            client.name(),
            client.id()
        )))
    }

    /// `next` on every step but Review, where it finishes
    fn advance(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
        if !self.started {
            return Err(WorkflowError::NotStarted(self.kind()));
        }
        if self.step == WizardStep::Review {
            return self.finish();
        }

        let step = self.next()?;
        Ok(StepOutcome::log(format!("Step: {}", step.label())))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
