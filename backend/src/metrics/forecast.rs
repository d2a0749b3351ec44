//! Chart series for the client profile: refund forecast and income mix

use crate::models::client::Client;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// First year of the forecast window
pub const FORECAST_FIRST_YEAR: u16 = 2021;

/// Number of forecast points
pub const FORECAST_YEARS: usize = 5;

/// Base used when the client has no refund (whole dollars)
const FALLBACK_BASE_DOLLARS: f64 = 2_000.0;

/// Year-over-year drift around the middle year
const DRIFT_PER_YEAR: f64 = 0.08;

/// Maximum random uplift per point
const JITTER: f64 = 0.05;

/// One point of the refund forecast, in whole dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundForecastPoint {
    pub year: u16,
    pub refund: i64,
}

/// One bar of the income / expense chart (cents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeExpenseRow {
    pub label: &'static str,
    pub income: i64,
    pub expenses: i64,
}

/// Project the refund over five years centred on the middle year
///
/// Draws one value from `rng` per point, so a seeded stream gives a
/// reproducible chart.
pub fn forecast_refunds(client: &Client, rng: &mut RngManager) -> Vec<RefundForecastPoint> {
    let base = match client.refund() {
        0 => FALLBACK_BASE_DOLLARS,
        cents => cents as f64 / 100.0,
    };

    (0..FORECAST_YEARS)
        .map(|i| {
            let drift = (i as f64 - 2.0) * DRIFT_PER_YEAR;
            let factor = 1.0 + drift + rng.next_f64() * JITTER;
            RefundForecastPoint {
                year: FORECAST_FIRST_YEAR + i as u16,
                refund: (base * factor).round() as i64,
            }
        })
        .collect()
}

/// Income, Expenses and Net rows
pub fn income_expense_series(client: &Client) -> Vec<IncomeExpenseRow> {
    vec![
        IncomeExpenseRow {
            label: "Income",
            income: client.income(),
            expenses: 0,
        },
        IncomeExpenseRow {
            label: "Expenses",
            income: 0,
            expenses: client.expenses(),
        },
        IncomeExpenseRow {
            label: "Net",
            income: client.net_income(),
            expenses: 0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::manual_client;
    use crate::models::client::NewClient;

    #[test]
    fn test_forecast_years_and_bounds() {
        let client = manual_client(NewClient::named("Avery Lee"), "C0100".to_string()).unwrap();
        let mut rng = RngManager::new(9);
        let points = forecast_refunds(&client, &mut rng);

        let years: Vec<u16> = points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2021, 2022, 2023, 2024, 2025]);

        // $2,000 base: point i lies in [base·(1+(i−2)·0.08), base·(1+(i−2)·0.08+0.05)]
        for (i, point) in points.iter().enumerate() {
            let low = 2_000.0 * (1.0 + (i as f64 - 2.0) * 0.08);
            assert!(point.refund as f64 >= low.floor());
            assert!(point.refund as f64 <= (low + 100.0).ceil());
        }
    }

    #[test]
    fn test_forecast_is_seeded() {
        let client = manual_client(NewClient::named("Avery Lee"), "C0100".to_string()).unwrap();
        let a = forecast_refunds(&client, &mut RngManager::new(4));
        let b = forecast_refunds(&client, &mut RngManager::new(4));
        assert_eq!(a, b);
    }

    #[test]
    fn test_income_expense_series() {
        let client = &crate::factory::generate(1, 2025)[0];
        let rows = income_expense_series(client);

        assert_eq!(rows[0].income, 20_760_500);
        assert_eq!(rows[1].expenses, 2_113_900);
        assert_eq!(rows[2].income, 20_760_500 - 2_113_900);
    }
}
