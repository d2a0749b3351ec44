//! IRS e-file submission (mock)
//!
//! Validate → Package → Transmit → AwaitAck → Accepted. Each stage waits a
//! fixed delay before the next; reaching Accepted requests the Filed
//! status once, asks for the mock Form 1040 and issues an acknowledgement
//! id.
//!
//! # Critical Invariants
//!
//! 1. **One step per call**: `start` enters Validate; four `advance` calls
//!    reach Accepted
//! 2. **Single filing**: Only the Accepted step requests `Filed`
//! 3. **Deterministic ack**: The acknowledgement id comes from a seeded
//!    stream, so a replayed session files with the same id

use super::{StepOutcome, Workflow, WorkflowError, WorkflowKind};
use crate::models::client::Client;
use crate::models::event::ChangeCause;
use crate::models::status::ClientStatus;
use crate::rng::RngManager;
use tracing::debug;
use uuid::{Builder, Uuid};

/// E-file stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EFileStage {
    Validate,
    Package,
    Transmit,
    AwaitAck,
    Accepted,
}

impl EFileStage {
    pub const ALL: [EFileStage; 5] = [
        EFileStage::Validate,
        EFileStage::Package,
        EFileStage::Transmit,
        EFileStage::AwaitAck,
        EFileStage::Accepted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EFileStage::Validate => "Validate",
            EFileStage::Package => "Package",
            EFileStage::Transmit => "Transmit",
            EFileStage::AwaitAck => "Await Ack",
            EFileStage::Accepted => "Accepted",
        }
    }

    /// Log line shown when the stage is reached
    pub fn message(self) -> &'static str {
        match self {
            EFileStage::Validate => "Validating return data…",
            EFileStage::Package => "Packaging IRS XML (Form 1040)…",
            EFileStage::Transmit => "Transmitting to IRS gateway…",
            EFileStage::AwaitAck => "Awaiting acknowledgment…",
            EFileStage::Accepted => "IRS Accepted (mock).",
        }
    }

    /// Wait before the stage is reached (ms)
    pub fn delay_ms(self) -> u64 {
        match self {
            EFileStage::Validate => 500,
            EFileStage::Package => 900,
            EFileStage::Transmit => 1_100,
            EFileStage::AwaitAck => 800,
            EFileStage::Accepted => 600,
        }
    }

    fn next(self) -> Option<EFileStage> {
        match self {
            EFileStage::Validate => Some(EFileStage::Package),
            EFileStage::Package => Some(EFileStage::Transmit),
            EFileStage::Transmit => Some(EFileStage::AwaitAck),
            EFileStage::AwaitAck => Some(EFileStage::Accepted),
            EFileStage::Accepted => None,
        }
    }
}

/// E-file state machine
///
/// # Example
/// ```
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::workflows::{EFileStage, EFileWorkflow, Workflow};
///
/// // Waiting Docs cannot move to Filed; put the client in Review first
/// let client = generate(1, 2025)[0].with_status(orcatax_core_rs::ClientStatus::Review).unwrap();
///
/// let mut efile = EFileWorkflow::with_seed(7);
/// efile.start(&client).unwrap();
/// for _ in 0..4 {
///     efile.advance(&client).unwrap();
/// }
/// assert_eq!(efile.stage(), Some(EFileStage::Accepted));
/// assert!(efile.ack_id().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct EFileWorkflow {
    stage: Option<EFileStage>,
    ack_rng: RngManager,
    ack_id: Option<Uuid>,
}

impl EFileWorkflow {
    /// Workflow whose acknowledgement id is drawn from `seed`
    pub fn with_seed(seed: u32) -> Self {
        Self {
            stage: None,
            ack_rng: RngManager::new(seed),
            ack_id: None,
        }
    }

    /// Current stage; `None` before `start`
    pub fn stage(&self) -> Option<EFileStage> {
        self.stage
    }

    /// Acknowledgement id, set once Accepted
    pub fn ack_id(&self) -> Option<Uuid> {
        self.ack_id
    }

    /// Submission reference of the filing (`C0042` → `TX0042-MOCK`)
    pub fn submission_id(client: &Client) -> String {
        format!("TX{}-MOCK", &client.id()[1..])
    }

    fn draw_ack_id(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.ack_rng.fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid()
    }
}

impl Workflow for EFileWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::EFile
    }

    fn initial_delay_ms(&self) -> u64 {
        EFileStage::Validate.delay_ms()
    }

    /// # Errors
    /// `NotEligible` unless the client can move to Filed
    fn check(&self, client: &Client) -> Result<(), WorkflowError> {
        if client.status().can_transition_to(ClientStatus::Filed) {
            Ok(())
        } else {
            Err(WorkflowError::NotEligible {
                workflow: self.kind(),
                status: client.status(),
            })
        }
    }

    fn start(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        if self.stage.is_some() {
            return Err(WorkflowError::AlreadyStarted(self.kind()));
        }
        self.check(client)?;

        self.stage = Some(EFileStage::Validate);
        debug!(client_id = client.id(), "e-file started");
        Ok(StepOutcome::log(EFileStage::Validate.message())
            .then_after(EFileStage::Package.delay_ms()))
    }

    fn advance(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        let current = self.stage.ok_or(WorkflowError::NotStarted(self.kind()))?;
        let next = current
            .next()
            .ok_or(WorkflowError::AlreadyFinished(self.kind()))?;
        self.stage = Some(next);
        debug!(client_id = client.id(), stage = next.label(), "e-file advanced");

        let outcome = StepOutcome::log(next.message());
        Ok(match next.next() {
            Some(after) => outcome.then_after(after.delay_ms()),
            None => {
                let ack = self.draw_ack_id();
                self.ack_id = Some(ack);

                let mut accepted = outcome
                    .issue_return_document()
                    .request_status(ClientStatus::Filed, ChangeCause::EFileAccepted);
                accepted
                    .log
                    .push(format!("Submission ID: {}", Self::submission_id(client)));
                accepted.log.push(format!("Acknowledgement ID: {}", ack));
                accepted
            }
        })
    }

    fn is_finished(&self) -> bool {
        self.stage == Some(EFileStage::Accepted)
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::generate;
    use crate::workflows::Effect;

    fn reviewable() -> Client {
        generate(1, 2025)[0].with_status(ClientStatus::Review).unwrap()
    }

    #[test]
    fn test_stage_delays_sum() {
        let total: u64 = EFileStage::ALL.iter().map(|s| s.delay_ms()).sum();
        assert_eq!(total, 3_900);
    }

    #[test]
    fn test_log_lines_in_order() {
        let client = reviewable();
        let mut efile = EFileWorkflow::with_seed(1);

        let mut lines = efile.start(&client).unwrap().log;
        for _ in 0..4 {
            lines.extend(efile.advance(&client).unwrap().log);
        }

        assert_eq!(&lines[..5], &[
            "Validating return data…",
            "Packaging IRS XML (Form 1040)…",
            "Transmitting to IRS gateway…",
            "Awaiting acknowledgment…",
            "IRS Accepted (mock).",
        ]);
        assert_eq!(lines[5], "Submission ID: TX0001-MOCK");
        assert!(lines[6].starts_with("Acknowledgement ID: "));
    }

    #[test]
    fn test_only_accepted_requests_filed() {
        let client = reviewable();
        let mut efile = EFileWorkflow::with_seed(1);

        assert!(efile.start(&client).unwrap().effects.is_empty());
        for _ in 0..3 {
            let step = efile.advance(&client).unwrap();
            assert!(step.effects.is_empty());
            assert!(step.next_after_ms.is_some());
        }
        let accepted = efile.advance(&client).unwrap();
        assert_eq!(
            accepted.effects,
            vec![
                Effect::IssueReturnDocument,
                Effect::RequestStatus {
                    to: ClientStatus::Filed,
                    cause: ChangeCause::EFileAccepted,
                },
            ]
        );
        assert!(accepted.next_after_ms.is_none());
        assert!(efile.is_finished());
        assert_eq!(
            efile.advance(&client),
            Err(WorkflowError::AlreadyFinished(WorkflowKind::EFile))
        );
    }

    #[test]
    fn test_ack_id_is_seeded() {
        let client = reviewable();
        let run = |seed| {
            let mut efile = EFileWorkflow::with_seed(seed);
            efile.start(&client).unwrap();
            for _ in 0..4 {
                efile.advance(&client).unwrap();
            }
            efile.ack_id().unwrap()
        };

        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
        assert_eq!(run(11).get_version_num(), 4);
    }

    #[test]
    fn test_ineligible_status() {
        // Waiting Docs cannot move straight to Filed
        let client = &generate(1, 2025)[0];
        let mut efile = EFileWorkflow::with_seed(1);

        assert_eq!(
            efile.start(client),
            Err(WorkflowError::NotEligible {
                workflow: WorkflowKind::EFile,
                status: ClientStatus::WaitingDocs,
            })
        );
        assert_eq!(efile.stage(), None);
    }

    #[test]
    fn test_submission_id() {
        assert_eq!(EFileWorkflow::submission_id(&reviewable()), "TX0001-MOCK");
    }
}
