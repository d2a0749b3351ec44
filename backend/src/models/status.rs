//! Client filing status and the allowed-transition table
//!
//! Status changes only happen through explicit commands. Every change is
//! checked against [`ClientStatus::allowed_next`]; anything outside the
//! table is rejected with [`StatusError::TransitionNotAllowed`].
//!
//! The happy path is `Ready → InProgress → WaitingDocs → Review → Filed`.
//! `PaymentDue` can be entered from every working state and leaves back into
//! work, review or filing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Filing status of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClientStatus {
    /// Intake complete, work not started
    Ready,

    /// Preparer is working on the return
    InProgress,

    /// Blocked on documents from the client
    WaitingDocs,

    /// Return submitted and accepted
    Filed,

    /// Return assembled, awaiting review / sign-off
    Review,

    /// Client owes a balance
    PaymentDue,
}

/// Errors raised when changing a client's status
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Status transition {from} -> {to} is not allowed")]
    TransitionNotAllowed { from: ClientStatus, to: ClientStatus },

    #[error("Unknown status label: {0}")]
    UnknownLabel(String),
}

impl ClientStatus {
    /// All statuses in display order (the order reports are zero-filled in)
    pub const ALL: [ClientStatus; 6] = [
        ClientStatus::Ready,
        ClientStatus::InProgress,
        ClientStatus::WaitingDocs,
        ClientStatus::Filed,
        ClientStatus::Review,
        ClientStatus::PaymentDue,
    ];

    /// Statuses reachable from `self` in one step
    pub fn allowed_next(self) -> &'static [ClientStatus] {
        use ClientStatus::*;

        match self {
            Ready => &[InProgress, WaitingDocs, Review, PaymentDue],
            InProgress => &[WaitingDocs, Review, PaymentDue],
            WaitingDocs => &[InProgress, Review, PaymentDue],
            Review => &[InProgress, WaitingDocs, Filed, PaymentDue],
            Filed => &[Review, PaymentDue],
            PaymentDue => &[InProgress, Review, Filed],
        }
    }

    /// Check whether `self → to` is in the transition table
    pub fn can_transition_to(self, to: ClientStatus) -> bool {
        self.allowed_next().contains(&to)
    }

    /// Validate a transition, returning the target on success
    ///
    /// # Example
    /// ```
    /// use orcatax_core_rs::{ClientStatus, StatusError};
    ///
    /// assert_eq!(
    ///     ClientStatus::Review.transition_to(ClientStatus::Filed),
    ///     Ok(ClientStatus::Filed)
    /// );
    /// assert!(matches!(
    ///     ClientStatus::Ready.transition_to(ClientStatus::Filed),
    ///     Err(StatusError::TransitionNotAllowed { .. })
    /// ));
    /// ```
    pub fn transition_to(self, to: ClientStatus) -> Result<ClientStatus, StatusError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StatusError::TransitionNotAllowed { from: self, to })
        }
    }

    /// Human-readable label ("Waiting Docs", "Payment Due", ...)
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Ready => "Ready",
            ClientStatus::InProgress => "In Progress",
            ClientStatus::WaitingDocs => "Waiting Docs",
            ClientStatus::Filed => "Filed",
            ClientStatus::Review => "Review",
            ClientStatus::PaymentDue => "Payment Due",
        }
    }

    /// Parse a label or variant name, case-insensitively, ignoring spaces
    pub fn from_label(label: &str) -> Result<Self, StatusError> {
        let wanted: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|status| status.label().replace(' ', "").to_ascii_lowercase() == wanted)
            .ok_or_else(|| StatusError::UnknownLabel(label.to_string()))
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
