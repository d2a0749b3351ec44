//! Rule-based client advisory
//!
//! Threshold labels over the client's fields, shown as "AI insights" in the
//! practice console. No model is involved.

use crate::core::money::format_usd;
use crate::models::client::{Client, ClientType, Posture};
use crate::models::status::ClientStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores above this are High risk
pub const HIGH_RISK_ABOVE: u8 = 75;

/// Scores above this (and not High) are Medium risk
pub const MEDIUM_RISK_ABOVE: u8 = 45;

/// Risk bucket of a 0..=99 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score > HIGH_RISK_ABOVE {
            RiskLevel::High
        } else if score > MEDIUM_RISK_ABOVE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observations and recommended next steps for one client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Five observations, in display order
    pub bullets: Vec<String>,

    /// Three recommended actions, in display order
    pub actions: Vec<String>,
}

/// Summarize a client snapshot
///
/// # Example
/// ```
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::metrics::summarize;
///
/// let advisory = summarize(&generate(1, 2025)[0]);
/// assert_eq!(advisory.bullets[3], "Risk indicators: Medium (74)");
/// assert_eq!(advisory.actions[0], "Send secure doc request");
/// ```
pub fn summarize(client: &Client) -> Advisory {
    let net = client.net_income();
    let waiting_docs = client.status() == ClientStatus::WaitingDocs;
    let posture = client.posture();
    let estimate = match posture {
        Posture::Refund(cents) | Posture::BalanceDue(cents) => format_usd(cents),
        Posture::Neutral => "$0".to_string(),
    };
    let risk = RiskLevel::from_score(client.risk_score());

    let bullets = vec![
        format!("Projected net income: {}", format_usd(net)),
        format!(
            "Filing status: {} ({})",
            client.filing_status(),
            client.client_type()
        ),
        format!("Current posture: {} {}", posture.direction(), estimate),
        format!("Risk indicators: {} ({})", risk, client.risk_score()),
        format!("Docs outstanding: {}", if waiting_docs { "Yes" } else { "No" }),
    ];

    let actions = vec![
        if waiting_docs {
            "Send secure doc request"
        } else {
            "Run final review check"
        },
        if net < 0 {
            "Consider NOL carryforward/carryback options"
        } else {
            "Review estimated tax payments"
        },
        if client.client_type() != ClientType::Individual {
            "Verify KY local business obligations & registrations"
        } else {
            "Confirm KY W-2/1099 completeness"
        },
    ]
    .into_iter()
    .map(String::from)
    .collect();

    Advisory { bullets, actions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::client::{ContactInfo, Financials, FilingStatus};

    fn client(status: ClientStatus, client_type: ClientType, expenses: i64, risk: u8) -> Client {
        Client::from_parts(
            "C0042".to_string(),
            "Jordan Smith".to_string(),
            client_type,
            FilingStatus::HeadOfHousehold,
            Financials {
                income: 5_000_000,
                expenses,
                dependents: 1,
                last_filed_year: 2023,
                posture: Posture::BalanceDue(123_450),
                risk_score: risk,
            },
            status,
            ContactInfo::local(String::new(), String::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(45), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(46), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(76), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(99), RiskLevel::High);
    }

    #[test]
    fn test_bullets() {
        let advisory = summarize(&client(ClientStatus::Review, ClientType::Individual, 1_000_000, 80));

        assert_eq!(
            advisory.bullets,
            vec![
                "Projected net income: $40,000",
                "Filing status: Head of Household (Individual)",
                "Current posture: balance due $1,234.50",
                "Risk indicators: High (80)",
                "Docs outstanding: No",
            ]
        );
    }

    #[test]
    fn test_actions_for_waiting_business_at_a_loss() {
        let advisory = summarize(&client(ClientStatus::WaitingDocs, ClientType::Llc, 6_000_000, 10));

        assert_eq!(
            advisory.actions,
            vec![
                "Send secure doc request",
                "Consider NOL carryforward/carryback options",
                "Verify KY local business obligations & registrations",
            ]
        );
        assert_eq!(advisory.bullets[4], "Docs outstanding: Yes");
    }

    #[test]
    fn test_actions_for_individual() {
        let advisory = summarize(&client(ClientStatus::Ready, ClientType::Individual, 0, 10));

        assert_eq!(advisory.actions[0], "Run final review check");
        assert_eq!(advisory.actions[1], "Review estimated tax payments");
        assert_eq!(advisory.actions[2], "Confirm KY W-2/1099 completeness");
    }
}
