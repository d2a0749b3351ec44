//! Collection-level rollups
//!
//! Every function takes `&[Client]`, makes one pass, and never mutates its
//! input. The dashboard KPIs and the three canned reports are built from
//! these.

use crate::core::money::round_div;
use crate::models::client::{Client, ClientType, Posture};
use crate::models::status::ClientStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk score at or above which a client is listed as high risk
pub const HIGH_RISK_THRESHOLD: u8 = 75;

/// Count of clients in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: ClientStatus,
    pub count: usize,
}

/// Clients per posture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureMix {
    pub refund: usize,
    pub balance_due: usize,
    pub neutral: usize,
}

/// Dashboard headline numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    pub total: usize,
    pub filed: usize,
    pub waiting: usize,

    /// Mean refund over all clients, non-refund clients counting as 0 (cents)
    pub avg_refund: i64,
}

/// Count clients per status, zero-filled, in [`ClientStatus::ALL`] order
///
/// The counts always sum to `clients.len()`.
pub fn status_counts(clients: &[Client]) -> Vec<StatusCount> {
    let mut counts = [0usize; ClientStatus::ALL.len()];
    for client in clients {
        counts[status_slot(client.status())] += 1;
    }

    ClientStatus::ALL
        .into_iter()
        .zip(counts)
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

/// Clients with a risk score at or above `threshold`, in input order
pub fn high_risk(clients: &[Client], threshold: u8) -> Vec<&Client> {
    clients
        .iter()
        .filter(|c| c.risk_score() >= threshold)
        .collect()
}

/// Count clients per posture
pub fn posture_mix(clients: &[Client]) -> PostureMix {
    clients
        .iter()
        .fold(PostureMix::default(), |mut mix, client| {
            match client.posture() {
                Posture::Refund(_) => mix.refund += 1,
                Posture::BalanceDue(_) => mix.balance_due += 1,
                Posture::Neutral => mix.neutral += 1,
            }
            mix
        })
}

/// Dashboard KPIs; an empty collection yields all zeros
pub fn kpis(clients: &[Client]) -> Kpis {
    let mut kpis = Kpis {
        total: clients.len(),
        ..Kpis::default()
    };
    let mut refund_sum: i64 = 0;

    for client in clients {
        match client.status() {
            ClientStatus::Filed => kpis.filed += 1,
            ClientStatus::WaitingDocs => kpis.waiting += 1,
            _ => {}
        }
        refund_sum += client.refund();
    }

    if kpis.total > 0 {
        kpis.avg_refund = round_div(refund_sum, kpis.total as i64);
    }
    kpis
}

/// Client list filter
///
/// `query` matches a case-insensitive substring of the name or id, taken as
/// typed with no trimming; only the empty query matches everything. `None`
/// filters match any type or status.
pub fn filter_clients<'a>(
    clients: &'a [Client],
    query: &str,
    client_type: Option<ClientType>,
    status: Option<ClientStatus>,
) -> Vec<&'a Client> {
    let needle = query.to_lowercase();

    clients
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name().to_lowercase().contains(&needle)
                || c.id().to_lowercase().contains(&needle)
        })
        .filter(|c| client_type.map_or(true, |t| c.client_type() == t))
        .filter(|c| status.map_or(true, |s| c.status() == s))
        .collect()
}

/// The canned reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Report {
    WorkloadByStatus,
    HighRiskClients,
    RefundVsBalanceMix,
}

impl Report {
    pub const ALL: [Report; 3] = [
        Report::WorkloadByStatus,
        Report::HighRiskClients,
        Report::RefundVsBalanceMix,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Report::WorkloadByStatus => "Workload by Status",
            Report::HighRiskClients => "High Risk Clients",
            Report::RefundVsBalanceMix => "Refund vs Balance Mix",
        }
    }

    /// Build the report's rows
    pub fn rows(self, clients: &[Client]) -> Vec<ReportRow> {
        match self {
            Report::WorkloadByStatus => status_counts(clients)
                .into_iter()
                .map(|sc| ReportRow::new(sc.status.label(), sc.count as i64))
                .collect(),

            Report::HighRiskClients => high_risk(clients, HIGH_RISK_THRESHOLD)
                .into_iter()
                .map(|c| {
                    ReportRow::new(
                        format!("{} ({})", c.name(), c.id()),
                        i64::from(c.risk_score()),
                    )
                })
                .collect(),

            Report::RefundVsBalanceMix => {
                let mix = posture_mix(clients);
                vec![
                    ReportRow::new("Refund", mix.refund as i64),
                    ReportRow::new("Balance Due", mix.balance_due as i64),
                    ReportRow::new("Neutral", mix.neutral as i64),
                ]
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One labeled row of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub value: i64,
}

impl ReportRow {
    fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

fn status_slot(status: ClientStatus) -> usize {
    match status {
        ClientStatus::Ready => 0,
        ClientStatus::InProgress => 1,
        ClientStatus::WaitingDocs => 2,
        ClientStatus::Filed => 3,
        ClientStatus::Review => 4,
        ClientStatus::PaymentDue => 5,
    }
}
