//! Tax profile, advisory and forecast over real and hand-built clients

use orcatax_core_rs::core::money::micros_to_dollars;
use orcatax_core_rs::factory::generate;
use orcatax_core_rs::metrics::{
    compute_tax_profile, forecast_refunds, income_expense_series, summarize, RiskLevel, TaxRates,
};
use orcatax_core_rs::models::{
    Client, ClientType, ContactInfo, Financials, FilingStatus, Posture,
};
use orcatax_core_rs::{ClientStatus, RngManager};
use proptest::prelude::*;

fn client(income_dollars: i64, expenses_dollars: i64, dependents: u8, risk: u8) -> Client {
    Client::from_parts(
        "C0100".to_string(),
        "Jordan Miller".to_string(),
        ClientType::Individual,
        FilingStatus::HeadOfHousehold,
        Financials {
            income: income_dollars * 100,
            expenses: expenses_dollars * 100,
            dependents,
            last_filed_year: 2023,
            posture: Posture::balance_due(50_000),
            risk_score: risk,
        },
        ClientStatus::InProgress,
        ContactInfo::local(
            "jordan.miller@example.com".to_string(),
            "859-555-0100".to_string(),
        ),
    )
    .unwrap()
}

// ============================================================================
// Tax profile
// ============================================================================

#[test]
fn test_reference_scenario() {
    let profile = compute_tax_profile(&client(100_000, 0, 2, 10), &TaxRates::default());

    assert_eq!(micros_to_dollars(profile.credits), 4_000);
    assert_eq!(micros_to_dollars(profile.federal), 22_000);
    assert_eq!(micros_to_dollars(profile.state), 5_000);
    assert_eq!(micros_to_dollars(profile.local), 2_250);
    assert_eq!(profile.total_tax_dollars(), 29_250);
    assert_eq!(profile.estimated_refund_dollars(), 1_075);
    assert_eq!(profile.efficiency, 71);
}

#[test]
fn test_golden_client_profile() {
    let reese = &generate(1, 2025)[0];
    let profile = compute_tax_profile(reese, &TaxRates::default());

    // $207,605 at 22% / 5% / 2.25%
    assert_eq!(profile.federal, 45_673_100_000);
    assert_eq!(profile.state, 10_380_250_000);
    assert_eq!(profile.local, 4_671_112_500);
    assert_eq!(profile.estimated_refund, 0);
    assert_eq!(profile.efficiency, 71);
}

#[test]
fn test_custom_rates() {
    let rates = TaxRates {
        local_bps: 0,
        credit_per_dependent: 100_000,
        ..TaxRates::default()
    };
    let profile = compute_tax_profile(&client(100_000, 0, 2, 10), &rates);

    assert_eq!(profile.local, 0);
    assert_eq!(profile.total_tax_dollars(), 27_000);
    // $2,000 credits − 10% of $27,000
    assert_eq!(profile.estimated_refund_dollars(), 0);
}

// ============================================================================
// Advisory
// ============================================================================

#[test]
fn test_advisory_for_golden_client() {
    let advisory = summarize(&generate(1, 2025)[0]);

    assert_eq!(advisory.bullets.len(), 5);
    assert_eq!(advisory.bullets[0], "Projected net income: $186,466");
    assert_eq!(advisory.bullets[1], "Filing status: Married Separate (LLC)");
    assert_eq!(advisory.bullets[2], "Current posture: refund $1,086.27");
    assert_eq!(advisory.bullets[4], "Docs outstanding: Yes");
    assert_eq!(
        advisory.actions,
        vec![
            "Send secure doc request",
            "Review estimated tax payments",
            "Verify KY local business obligations & registrations",
        ]
    );
}

#[test]
fn test_advisory_negative_net() {
    let advisory = summarize(&client(40_000, 55_000, 0, 90));

    assert_eq!(advisory.bullets[3], "Risk indicators: High (90)");
    assert_eq!(advisory.actions[0], "Run final review check");
    assert_eq!(advisory.actions[1], "Consider NOL carryforward/carryback options");
    assert_eq!(advisory.actions[2], "Confirm KY W-2/1099 completeness");
}

#[test]
fn test_risk_level_boundaries() {
    assert_eq!(RiskLevel::from_score(45), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(46), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(75), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(76), RiskLevel::High);
}

// ============================================================================
// Chart series
// ============================================================================

#[test]
fn test_forecast_years_and_fallback_base() {
    let c = client(60_000, 10_000, 1, 10);
    let points = forecast_refunds(&c, &mut RngManager::new(1));

    let years: Vec<u16> = points.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2021, 2022, 2023, 2024, 2025]);

    // no refund: base $2,000, drift −16%..+16%, jitter up to +5%
    for point in &points {
        assert!((1_680..=2_420).contains(&point.refund), "{:?}", point);
    }
}

#[test]
fn test_forecast_is_seeded() {
    let reese = &generate(1, 2025)[0];
    assert_eq!(
        forecast_refunds(reese, &mut RngManager::new(9)),
        forecast_refunds(reese, &mut RngManager::new(9))
    );
}

#[test]
fn test_income_expense_series() {
    let rows = income_expense_series(&client(60_000, 10_000, 1, 10));

    assert_eq!(rows[0].income, 6_000_000);
    assert_eq!(rows[1].expenses, 1_000_000);
    assert_eq!(rows[2].label, "Net");
    assert_eq!(rows[2].income, 5_000_000);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_total_is_sum_and_efficiency_bounded(
        income in 0i64..5_000_000,
        dependents in 0u8..=10,
        federal_bps in 0i64..12_000,
    ) {
        let rates = TaxRates { federal_bps, ..TaxRates::default() };
        let profile = compute_tax_profile(&client(income, 0, dependents, 10), &rates);

        prop_assert_eq!(profile.total_tax, profile.federal + profile.state + profile.local);
        prop_assert!(profile.efficiency <= 100);
        prop_assert!(profile.estimated_refund >= 0);
        prop_assert!(profile.estimated_refund <= profile.credits);
    }

    #[test]
    fn prop_generated_profiles_consistent(seed in any::<u32>()) {
        for c in generate(20, seed) {
            let profile = compute_tax_profile(&c, &TaxRates::default());
            prop_assert_eq!(profile.total_tax, profile.federal + profile.state + profile.local);
            prop_assert!(profile.efficiency <= 100);
        }
    }
}
