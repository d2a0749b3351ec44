//! Derived per-client views
//!
//! Everything here is a pure function of a client snapshot (plus an
//! explicit RNG for the forecast). Nothing is stored.

pub mod advisory;
pub mod forecast;
pub mod tax;

pub use advisory::{summarize, Advisory, RiskLevel};
pub use forecast::{forecast_refunds, income_expense_series, IncomeExpenseRow, RefundForecastPoint};
pub use tax::{compute_tax_profile, TaxLine, TaxProfile, TaxRates};
