//! Mock tax profile
//!
//! Flat federal, state and local rates applied to gross income, a flat
//! credit per dependent, and a refund estimate netted against a share of
//! the total tax. Amounts are micro-dollars (see [`crate::core::money`]).

use crate::core::money::{
    cents_times_bps, micros_to_dollars, round_div, BPS_DENOMINATOR, MICROS_PER_CENT,
    MICROS_PER_DOLLAR,
};
use crate::models::client::Client;
use serde::{Deserialize, Serialize};

/// Highest accepted rate (100%)
pub const MAX_RATE_BPS: i64 = BPS_DENOMINATOR;

/// Highest accepted credit per dependent ($1,000,000)
pub const MAX_CREDIT_PER_DEPENDENT: i64 = 100_000_000;

/// Tax rates applied by [`compute_tax_profile`]
///
/// Rates stay within 0..=[`MAX_RATE_BPS`] and the credit within
/// 0..=[`MAX_CREDIT_PER_DEPENDENT`]; together with the client amount cap
/// this keeps every intermediate of the profile inside `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxRates {
    /// Federal rate in basis points (2200 = 22%)
    pub federal_bps: i64,

    /// State rate in basis points
    pub state_bps: i64,

    /// Local rate in basis points
    pub local_bps: i64,

    /// Credit per dependent (cents)
    pub credit_per_dependent: i64,

    /// Share of total tax subtracted from credits when estimating the refund
    pub refund_offset_bps: i64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            federal_bps: 2_200,           // 22%
            state_bps: 500,               // 5% (KY)
            local_bps: 225,               // 2.25% (Lexington)
            credit_per_dependent: 200_000, // $2,000
            refund_offset_bps: 1_000,     // 10%
        }
    }
}

impl TaxRates {
    /// First out-of-range field as `(name, value, max)`
    pub fn out_of_range(&self) -> Option<(&'static str, i64, i64)> {
        [
            ("federal_bps", self.federal_bps, MAX_RATE_BPS),
            ("state_bps", self.state_bps, MAX_RATE_BPS),
            ("local_bps", self.local_bps, MAX_RATE_BPS),
            ("credit_per_dependent", self.credit_per_dependent, MAX_CREDIT_PER_DEPENDENT),
            ("refund_offset_bps", self.refund_offset_bps, MAX_RATE_BPS),
        ]
        .into_iter()
        .find(|(_, value, max)| !(0..=*max).contains(value))
    }
}

/// One labeled line of the tax breakdown, in whole dollars
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLine {
    pub label: &'static str,
    pub dollars: i64,
}

/// Derived tax view of a client snapshot
///
/// Never stored; recompute whenever the client changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Federal tax (micro-dollars)
    pub federal: i64,

    /// State tax (micro-dollars)
    pub state: i64,

    /// Local tax (micro-dollars)
    pub local: i64,

    /// federal + state + local (micro-dollars)
    pub total_tax: i64,

    /// Dependent credits (micro-dollars)
    pub credits: i64,

    /// max(credits − offset share of total tax, 0) (micro-dollars)
    pub estimated_refund: i64,

    /// Percentage of income kept after tax, clamped to 0..=100
    pub efficiency: u8,
}

impl TaxProfile {
    /// Federal, state, local and credits rounded to whole dollars
    pub fn breakdown(&self) -> Vec<TaxLine> {
        vec![
            TaxLine {
                label: "Federal Tax",
                dollars: micros_to_dollars(self.federal),
            },
            TaxLine {
                label: "KY State Tax",
                dollars: micros_to_dollars(self.state),
            },
            TaxLine {
                label: "Lexington Local Tax",
                dollars: micros_to_dollars(self.local),
            },
            TaxLine {
                label: "Credits",
                dollars: micros_to_dollars(self.credits),
            },
        ]
    }

    /// Total tax rounded to whole dollars
    pub fn total_tax_dollars(&self) -> i64 {
        micros_to_dollars(self.total_tax)
    }

    /// Estimated refund rounded to whole dollars
    pub fn estimated_refund_dollars(&self) -> i64 {
        micros_to_dollars(self.estimated_refund)
    }
}

/// Compute the tax profile of a client
///
/// # Example
/// ```
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::metrics::{compute_tax_profile, TaxRates};
///
/// let client = &generate(1, 2025)[0];
/// let profile = compute_tax_profile(client, &TaxRates::default());
///
/// assert_eq!(profile.total_tax, profile.federal + profile.state + profile.local);
/// assert!(profile.efficiency <= 100);
/// ```
pub fn compute_tax_profile(client: &Client, rates: &TaxRates) -> TaxProfile {
    let income = client.income();

    let federal = cents_times_bps(income, rates.federal_bps);
    let state = cents_times_bps(income, rates.state_bps);
    let local = cents_times_bps(income, rates.local_bps);
    let total_tax = federal + state + local;

    let credits =
        i64::from(client.dependents()) * rates.credit_per_dependent * MICROS_PER_CENT;
    let offset = round_div(total_tax * rates.refund_offset_bps, BPS_DENOMINATOR);
    let estimated_refund = (credits - offset).max(0);

    let income_micros = income * MICROS_PER_CENT;
    let efficiency = round_div(
        (income_micros - total_tax) * 100,
        income_micros.max(MICROS_PER_DOLLAR),
    )
    .clamp(0, 100) as u8;

    TaxProfile {
        federal,
        state,
        local,
        total_tax,
        credits,
        estimated_refund,
        efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::client::{ClientType, ContactInfo, Financials, FilingStatus, Posture};
    use crate::models::status::ClientStatus;

    fn client_with(income_dollars: i64, dependents: u8) -> Client {
        Client::from_parts(
            "C0001".to_string(),
            "Test Client".to_string(),
            ClientType::Individual,
            FilingStatus::Single,
            Financials {
                income: income_dollars * 100,
                expenses: 0,
                dependents,
                last_filed_year: 2024,
                posture: Posture::Neutral,
                risk_score: 10,
            },
            ClientStatus::Ready,
            ContactInfo::local(String::new(), String::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let profile = compute_tax_profile(&client_with(100_000, 2), &TaxRates::default());

        assert_eq!(micros_to_dollars(profile.credits), 4_000);
        assert_eq!(micros_to_dollars(profile.federal), 22_000);
        assert_eq!(micros_to_dollars(profile.state), 5_000);
        assert_eq!(micros_to_dollars(profile.local), 2_250);
        assert_eq!(profile.total_tax_dollars(), 29_250);
        assert_eq!(profile.estimated_refund_dollars(), 1_075);
        assert_eq!(profile.efficiency, 71);
    }

    #[test]
    fn test_breakdown_labels_and_order() {
        let profile = compute_tax_profile(&client_with(100_000, 2), &TaxRates::default());
        let lines = profile.breakdown();

        let labels: Vec<_> = lines.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec!["Federal Tax", "KY State Tax", "Lexington Local Tax", "Credits"]
        );
        assert_eq!(lines[2].dollars, 2_250);
        assert_eq!(lines[3].dollars, 4_000);
    }

    #[test]
    fn test_zero_income() {
        let profile = compute_tax_profile(&client_with(0, 3), &TaxRates::default());

        assert_eq!(profile.total_tax, 0);
        assert_eq!(profile.efficiency, 0);
        assert_eq!(profile.estimated_refund_dollars(), 6_000);
    }

    #[test]
    fn test_no_dependents_means_no_refund() {
        let profile = compute_tax_profile(&client_with(50_000, 0), &TaxRates::default());
        assert_eq!(profile.estimated_refund, 0);
    }

    #[test]
    fn test_efficiency_clamped_for_confiscatory_rates() {
        let rates = TaxRates {
            federal_bps: 9_000,
            state_bps: 2_000,
            ..TaxRates::default()
        };
        let profile = compute_tax_profile(&client_with(80_000, 0), &rates);
        assert_eq!(profile.efficiency, 0);
    }
}
