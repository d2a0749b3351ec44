//! Client model
//!
//! Represents one taxpayer in the practice roster.
//! Each client has:
//! - Identity (id `C####`, name, entity type, filing status)
//! - Financials (income, expenses, dependents, posture) in i64 cents
//! - Workflow status (see [`ClientStatus`])
//! - A synthetic 0-99 risk score
//! - Contact details
//!
//! A `Client` is a value: it is never mutated in place. Edits produce a new
//! `Client` that replaces the old one wholesale in the store.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::status::{ClientStatus, StatusError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest representable risk score
pub const MAX_RISK_SCORE: u8 = 99;

/// Default city for every client in the demo practice
pub const DEFAULT_CITY: &str = "Lexington";

/// Default state for every client in the demo practice
pub const DEFAULT_STATE: &str = "KY";

/// Errors that can occur while building clients
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Client name required")]
    NameRequired,

    #[error("Invalid client id {0:?}: expected 'C' followed by digits")]
    InvalidId(String),

    #[error("Unknown {kind} label: {label}")]
    UnknownLabel { kind: &'static str, label: String },

    #[error("{field} out of range: {cents} cents (allowed 0..={max})", max = MAX_AMOUNT_CENTS)]
    AmountOutOfRange { field: &'static str, cents: i64 },
}

/// Largest money amount a client may carry ($100,000,000 in cents)
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

/// Legal entity type of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    Individual,
    #[serde(rename = "LLC")]
    Llc,
    #[serde(rename = "S-Corp")]
    SCorp,
    #[serde(rename = "C-Corp")]
    CCorp,
    Partnership,
    #[serde(rename = "Sole Prop")]
    SoleProp,
}

impl ClientType {
    /// All entity types, in the order the generator draws from
    pub const ALL: [ClientType; 6] = [
        ClientType::Individual,
        ClientType::Llc,
        ClientType::SCorp,
        ClientType::CCorp,
        ClientType::Partnership,
        ClientType::SoleProp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClientType::Individual => "Individual",
            ClientType::Llc => "LLC",
            ClientType::SCorp => "S-Corp",
            ClientType::CCorp => "C-Corp",
            ClientType::Partnership => "Partnership",
            ClientType::SoleProp => "Sole Prop",
        }
    }

    /// Parse a display label, case-insensitively
    pub fn from_label(label: &str) -> Result<Self, ClientError> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| ClientError::UnknownLabel {
                kind: "client type",
                label: label.to_string(),
            })
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filing status on the return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    /// All filing statuses, in the order the generator draws from
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadOfHousehold,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedJoint => "Married Joint",
            FilingStatus::MarriedSeparate => "Married Separate",
            FilingStatus::HeadOfHousehold => "Head of Household",
        }
    }

    /// Parse a display label, case-insensitively
    pub fn from_label(label: &str) -> Result<Self, ClientError> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| ClientError::UnknownLabel {
                kind: "filing status",
                label: label.to_string(),
            })
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a client nets a refund, owes a balance, or is neutral
///
/// Holding the two amounts in one enum makes "at most one of refund /
/// balance due is nonzero" true by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Posture {
    /// Client expects a refund (i64 cents, > 0)
    Refund(i64),

    /// Client owes a balance (i64 cents, > 0)
    BalanceDue(i64),

    /// Nothing owed either way
    Neutral,
}

impl Posture {
    /// Refund posture; zero or negative amounts collapse to `Neutral`
    pub fn refund(cents: i64) -> Self {
        if cents > 0 {
            Posture::Refund(cents)
        } else {
            Posture::Neutral
        }
    }

    /// Balance-due posture; zero or negative amounts collapse to `Neutral`
    pub fn balance_due(cents: i64) -> Self {
        if cents > 0 {
            Posture::BalanceDue(cents)
        } else {
            Posture::Neutral
        }
    }

    /// Refund amount in cents (0 unless `Refund`)
    pub fn refund_amount(&self) -> i64 {
        match self {
            Posture::Refund(cents) => *cents,
            _ => 0,
        }
    }

    /// Balance due in cents (0 unless `BalanceDue`)
    pub fn balance_due_amount(&self) -> i64 {
        match self {
            Posture::BalanceDue(cents) => *cents,
            _ => 0,
        }
    }

    /// Short direction label used in advisory text
    pub fn direction(&self) -> &'static str {
        match self {
            Posture::Refund(_) => "refund",
            Posture::BalanceDue(_) => "balance due",
            Posture::Neutral => "neutral",
        }
    }
}

/// Numeric profile of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Financials {
    /// Gross income (i64 cents, whole dollars for generated clients)
    pub income: i64,

    /// Deductible expenses (i64 cents)
    pub expenses: i64,

    /// Number of dependents (0-3 for generated clients)
    pub dependents: u8,

    /// Most recent tax year filed
    pub last_filed_year: u16,

    /// Refund / balance posture
    pub posture: Posture,

    /// Synthetic risk score (0-99)
    pub risk_score: u8,
}

impl Financials {
    /// All-zero financials used by manual client creation
    pub fn zeroed(last_filed_year: u16) -> Self {
        Self {
            income: 0,
            expenses: 0,
            dependents: 0,
            last_filed_year,
            posture: Posture::Neutral,
            risk_score: 0,
        }
    }
}

/// Contact details of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
}

impl ContactInfo {
    /// Contact block in the practice's home city
    pub fn local(email: String, phone: String) -> Self {
        Self {
            email,
            phone,
            city: DEFAULT_CITY.to_string(),
            state: DEFAULT_STATE.to_string(),
        }
    }
}

/// Input for manually adding a client (the "Add Client" form)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub client_type: ClientType,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl NewClient {
    /// Form with the defaults the UI pre-selects
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_type: ClientType::Individual,
            filing_status: FilingStatus::Single,
            email: String::new(),
            phone: String::new(),
        }
    }

    /// Reject forms without a usable name
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::NameRequired);
        }
        Ok(())
    }
}

/// A client of the practice
///
/// # Example
/// ```
/// use orcatax_core_rs::models::{Client, ClientType, FilingStatus, ContactInfo, Financials, Posture};
/// use orcatax_core_rs::ClientStatus;
///
/// let client = Client::from_parts(
///     "C0001".to_string(),
///     "Reese Jones".to_string(),
///     ClientType::Llc,
///     FilingStatus::MarriedSeparate,
///     Financials {
///         income: 20_760_500,
///         expenses: 2_113_900,
///         dependents: 2,
///         last_filed_year: 2023,
///         posture: Posture::refund(108_627),
///         risk_score: 74,
///     },
///     ClientStatus::WaitingDocs,
///     ContactInfo::local("reese.jones@example.com".into(), "859-605-1274".into()),
/// ).unwrap();
///
/// assert_eq!(client.refund(), 108_627);
/// assert_eq!(client.balance_due(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Practice-unique identifier, `C` followed by at least four digits
    id: String,

    /// Display name
    name: String,

    /// Entity type
    client_type: ClientType,

    /// Filing status
    filing_status: FilingStatus,

    /// Numeric profile
    financials: Financials,

    /// Current workflow status
    status: ClientStatus,

    /// Contact details
    contact: ContactInfo,
}

impl Client {
    /// Assemble a client from its parts
    ///
    /// The risk score is capped at [`MAX_RISK_SCORE`].
    ///
    /// # Errors
    /// - `InvalidId` if `id` is not `C` followed by at least four digits
    /// - `NameRequired` if `name` is blank
    /// - `AmountOutOfRange` if income, expenses or the posture amount is
    ///   negative or above [`MAX_AMOUNT_CENTS`]
    pub fn from_parts(
        id: String,
        name: String,
        client_type: ClientType,
        filing_status: FilingStatus,
        mut financials: Financials,
        status: ClientStatus,
        contact: ContactInfo,
    ) -> Result<Self, ClientError> {
        if !is_valid_client_id(&id) {
            return Err(ClientError::InvalidId(id));
        }
        if name.trim().is_empty() {
            return Err(ClientError::NameRequired);
        }
        let amounts = [
            ("income", financials.income),
            ("expenses", financials.expenses),
            ("refund", financials.posture.refund_amount()),
            ("balance due", financials.posture.balance_due_amount()),
        ];
        if let Some((field, cents)) = amounts
            .into_iter()
            .find(|(_, cents)| !(0..=MAX_AMOUNT_CENTS).contains(cents))
        {
            return Err(ClientError::AmountOutOfRange { field, cents });
        }
        financials.risk_score = financials.risk_score.min(MAX_RISK_SCORE);

        Ok(Self::from_trusted_parts(
            id,
            name,
            client_type,
            filing_status,
            financials,
            status,
            contact,
        ))
    }

    /// Assemble a client whose id and name were produced by the engine itself
    pub(crate) fn from_trusted_parts(
        id: String,
        name: String,
        client_type: ClientType,
        filing_status: FilingStatus,
        financials: Financials,
        status: ClientStatus,
        contact: ContactInfo,
    ) -> Self {
        debug_assert!(is_valid_client_id(&id), "engine produced bad id {}", id);
        Self {
            id,
            name,
            client_type,
            filing_status,
            financials,
            status,
            contact,
        }
    }

    /// Get client ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get display name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client_type(&self) -> ClientType {
        self.client_type
    }

    pub fn filing_status(&self) -> FilingStatus {
        self.filing_status
    }

    /// Get gross income (i64 cents)
    pub fn income(&self) -> i64 {
        self.financials.income
    }

    /// Get expenses (i64 cents)
    pub fn expenses(&self) -> i64 {
        self.financials.expenses
    }

    /// Income minus expenses (i64 cents, may be negative)
    pub fn net_income(&self) -> i64 {
        self.financials.income - self.financials.expenses
    }

    pub fn dependents(&self) -> u8 {
        self.financials.dependents
    }

    pub fn last_filed_year(&self) -> u16 {
        self.financials.last_filed_year
    }

    pub fn posture(&self) -> Posture {
        self.financials.posture
    }

    /// Get refund amount (i64 cents, 0 unless posture is `Refund`)
    pub fn refund(&self) -> i64 {
        self.financials.posture.refund_amount()
    }

    /// Get balance due (i64 cents, 0 unless posture is `BalanceDue`)
    pub fn balance_due(&self) -> i64 {
        self.financials.posture.balance_due_amount()
    }

    pub fn risk_score(&self) -> u8 {
        self.financials.risk_score
    }

    pub fn status(&self) -> ClientStatus {
        self.status
    }

    pub fn financials(&self) -> &Financials {
        &self.financials
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Produce a copy of this client in a new status
    ///
    /// # Errors
    /// `TransitionNotAllowed` if the move is not in the transition table.
    pub fn with_status(&self, to: ClientStatus) -> Result<Client, StatusError> {
        let status = self.status.transition_to(to)?;
        Ok(Client {
            status,
            ..self.clone()
        })
    }
}

/// Format a sequence number as a client id (`7` → `C0007`)
pub fn format_client_id(sequence: u32) -> String {
    format!("C{:04}", sequence)
}

/// Check the `C####` id shape
pub fn is_valid_client_id(id: &str) -> bool {
    match id.strip_prefix('C') {
        Some(digits) => digits.len() >= 4 && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ClientStatus) -> Client {
        Client::from_parts(
            "C0042".to_string(),
            "Avery Moore".to_string(),
            ClientType::Individual,
            FilingStatus::Single,
            Financials {
                income: 5_000_000,
                expenses: 1_000_000,
                dependents: 1,
                last_filed_year: 2024,
                posture: Posture::balance_due(25_000),
                risk_score: 120,
            },
            status,
            ContactInfo::local("avery.moore@example.com".into(), "859-300-0001".into()),
        )
        .unwrap()
    }

    #[test]
    fn test_risk_score_capped() {
        assert_eq!(sample(ClientStatus::Ready).risk_score(), MAX_RISK_SCORE);
    }

    #[test]
    fn test_posture_zero_is_neutral() {
        assert_eq!(Posture::refund(0), Posture::Neutral);
        assert_eq!(Posture::balance_due(0), Posture::Neutral);
        assert_eq!(Posture::Neutral.refund_amount(), 0);
        assert_eq!(Posture::Neutral.balance_due_amount(), 0);
    }

    #[test]
    fn test_with_status_returns_new_value() {
        let original = sample(ClientStatus::Review);
        let filed = original.with_status(ClientStatus::Filed).unwrap();

        assert_eq!(original.status(), ClientStatus::Review);
        assert_eq!(filed.status(), ClientStatus::Filed);
        assert_eq!(filed.id(), original.id());
        assert_eq!(filed.financials(), original.financials());
    }

    #[test]
    fn test_with_status_rejects_disallowed() {
        let ready = sample(ClientStatus::Ready);
        assert!(ready.with_status(ClientStatus::Filed).is_err());
    }

    #[test]
    fn test_invalid_ids_rejected() {
        for id in ["", "C12", "X0001", "C00a1"] {
            let result = Client::from_parts(
                id.to_string(),
                "Name".to_string(),
                ClientType::Individual,
                FilingStatus::Single,
                Financials::zeroed(2024),
                ClientStatus::Ready,
                ContactInfo::local(String::new(), String::new()),
            );
            assert_eq!(result, Err(ClientError::InvalidId(id.to_string())));
        }
    }

    #[test]
    fn test_amounts_bounded() {
        let build = |financials: Financials| {
            Client::from_parts(
                "C0042".to_string(),
                "Avery Moore".to_string(),
                ClientType::Individual,
                FilingStatus::Single,
                financials,
                ClientStatus::Ready,
                ContactInfo::local(String::new(), String::new()),
            )
        };

        let negative = Financials { income: -1, ..Financials::zeroed(2024) };
        assert_eq!(
            build(negative),
            Err(ClientError::AmountOutOfRange { field: "income", cents: -1 })
        );

        let huge = Financials { expenses: i64::MAX, ..Financials::zeroed(2024) };
        assert_eq!(
            build(huge),
            Err(ClientError::AmountOutOfRange { field: "expenses", cents: i64::MAX })
        );

        let refund = Financials {
            posture: Posture::Refund(MAX_AMOUNT_CENTS + 1),
            ..Financials::zeroed(2024)
        };
        assert!(matches!(
            build(refund),
            Err(ClientError::AmountOutOfRange { field: "refund", .. })
        ));

        let at_cap = Financials { income: MAX_AMOUNT_CENTS, ..Financials::zeroed(2024) };
        assert!(build(at_cap).is_ok());
    }

    #[test]
    fn test_format_client_id() {
        assert_eq!(format_client_id(1), "C0001");
        assert_eq!(format_client_id(740), "C0740");
        assert_eq!(format_client_id(12345), "C12345");
        assert!(is_valid_client_id(&format_client_id(9)));
    }

    #[test]
    fn test_new_client_requires_name() {
        assert_eq!(
            NewClient::named("   ").validate(),
            Err(ClientError::NameRequired)
        );
        assert!(NewClient::named("Blake White").validate().is_ok());
    }

    #[test]
    fn test_type_labels_parse() {
        assert_eq!(ClientType::from_label("s-corp"), Ok(ClientType::SCorp));
        assert_eq!(
            FilingStatus::from_label("Head of Household"),
            Ok(FilingStatus::HeadOfHousehold)
        );
        assert!(ClientType::from_label("Trust").is_err());
    }
}
