//! Client record factory for deterministic roster generation.
//!
//! This module creates the synthetic client roster the practice console
//! starts with. All generation is deterministic based on the RNG seed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same roster
//! 2. **Fixed draw order**: Every record consumes draws in the same order
//!    (first name, last name, type, filing status, income, expenses,
//!    dependents, year, status, posture amount, risk, phone), so the main
//!    stream stays aligned with the historical demo dataset
//! 3. **Separate posture coin**: The refund-vs-balance coin comes from its own
//!    stream and never shifts the main stream
//!
//! # Example
//!
//! ```
//! use orcatax_core_rs::factory::{generate, generate_with, CoinSource, FactoryConfig};
//!
//! let roster = generate(3, 2025);
//! assert_eq!(roster[0].id(), "C0001");
//! assert_eq!(roster[0].name(), "Reese Jones");
//!
//! let config = FactoryConfig { count: 3, seed: 2025, coin: CoinSource::Seeded };
//! assert_eq!(generate_with(&config), roster);
//! ```

pub mod names;

use crate::models::client::{
    format_client_id, Client, ClientError, ClientType, ContactInfo, Financials, FilingStatus,
    NewClient, Posture,
};
use crate::models::status::ClientStatus;
use crate::rng::RngManager;
use names::{FIRST_NAMES, LAST_NAMES};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Size of the default demo roster
pub const DEFAULT_CLIENT_COUNT: usize = 740;

/// Seed of the default demo roster
pub const DEFAULT_SEED: u32 = 2025;

/// Last-filed year given to manually added clients
pub const MANUAL_LAST_FILED_YEAR: u16 = 2024;

/// Salt mixed into the seed to derive the posture coin stream
const COIN_STREAM_SALT: u32 = 0x9E37_79B9;

/// Number of random id draws before falling back to probing
const MAX_ID_DRAWS: usize = 16;

/// Size of the four-digit manual id space (`C0000`..`C9999`)
const MANUAL_ID_SPACE: i64 = 10_000;

/// Where the refund-vs-balance coin flip comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinSource {
    /// A second seeded stream derived from the roster seed (fully reproducible)
    #[default]
    Seeded,

    /// Operating-system randomness (postures differ between runs)
    Entropy,
}

/// Configuration for roster generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactoryConfig {
    /// Number of clients to generate
    pub count: usize,

    /// Seed of the main stream
    pub seed: u32,

    /// Source of the posture coin
    pub coin: CoinSource,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_CLIENT_COUNT,
            seed: DEFAULT_SEED,
            coin: CoinSource::Seeded,
        }
    }
}

/// Generate `count` clients from `seed` with the seeded posture coin
pub fn generate(count: usize, seed: u32) -> Vec<Client> {
    generate_with(&FactoryConfig {
        count,
        seed,
        coin: CoinSource::Seeded,
    })
}

/// Generate a roster from a full configuration
///
/// Clients are returned in id order `C0001..C<count>`.
pub fn generate_with(config: &FactoryConfig) -> Vec<Client> {
    let mut rng = RngManager::new(config.seed);
    let mut coin = PostureCoin::new(config.coin, config.seed);

    let clients: Vec<Client> = (1..=config.count)
        .map(|sequence| make_client(sequence as u32, &mut rng, &mut coin))
        .collect();

    debug!(
        count = clients.len(),
        seed = config.seed,
        coin = ?config.coin,
        "generated client roster"
    );
    clients
}

/// Build a manually added client from the form input
///
/// Financials are zeroed, status is `Ready`, and the contact block uses the
/// practice's home city.
///
/// # Errors
/// - `NameRequired` if the form name is blank
/// - `InvalidId` if `id` is malformed
pub fn manual_client(form: NewClient, id: String) -> Result<Client, ClientError> {
    form.validate()?;

    Client::from_parts(
        id,
        form.name.trim().to_string(),
        form.client_type,
        form.filing_status,
        Financials::zeroed(MANUAL_LAST_FILED_YEAR),
        ClientStatus::Ready,
        ContactInfo::local(form.email, form.phone),
    )
}

/// Draw a four-digit client id that `is_taken` does not reject
///
/// Up to a fixed number of random draws are tried; after that the id space
/// is searched linearly from the last draw. Returns `None` only when all
/// 10,000 ids are taken.
pub fn allocate_manual_id(rng: &mut RngManager, is_taken: impl Fn(&str) -> bool) -> Option<String> {
    let mut candidate = 0;
    for _ in 0..MAX_ID_DRAWS {
        candidate = rng.range(0, MANUAL_ID_SPACE);
        let id = format_client_id(candidate as u32);
        if !is_taken(&id) {
            return Some(id);
        }
    }

    (1..MANUAL_ID_SPACE)
        .map(|offset| format_client_id(((candidate + offset) % MANUAL_ID_SPACE) as u32))
        .find(|id| !is_taken(id))
}

/// Generate one client; consumes draws in the fixed order
fn make_client(sequence: u32, rng: &mut RngManager, coin: &mut PostureCoin) -> Client {
    let name = format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES));
    let client_type: ClientType = *rng.pick(&ClientType::ALL);
    let filing_status: FilingStatus = *rng.pick(&FilingStatus::ALL);

    let income = (35_000.0 + rng.next_f64() * 185_000.0).floor() as i64;
    let expenses = (income as f64 * (0.08 + rng.next_f64() * 0.25)).floor() as i64;
    let dependents = (rng.next_f64() * 4.0).floor() as u8;
    let last_filed_year = 2021 + (rng.next_f64() * 4.0).floor() as u16;
    let status: ClientStatus = *rng.pick(&ClientStatus::ALL);
    let posture = draw_posture(rng, coin);
    let risk_score = (rng.next_f64() * 100.0).floor() as u8;

    let email = format!(
        "{}@example.com",
        name.to_lowercase().replace(char::is_whitespace, ".")
    );
    let exchange = (200.0 + rng.next_f64() * 700.0).floor() as u32;
    let line = (rng.next_f64() * 10_000.0).floor() as u32;
    let phone = format!("859-{}-{:04}", exchange, line);

    Client::from_trusted_parts(
        format_client_id(sequence),
        name,
        client_type,
        filing_status,
        Financials {
            income: income * 100,
            expenses: expenses * 100,
            dependents,
            last_filed_year,
            posture,
            risk_score,
        },
        status,
        ContactInfo::local(email, phone),
    )
}

/// Draw the refund / balance posture
///
/// A refund that rounds to $0.00 falls through to a balance draw, so the
/// main stream consumes two draws in that (rare) case.
fn draw_posture(rng: &mut RngManager, coin: &mut PostureCoin) -> Posture {
    let refund = if coin.refund() {
        round_to_cents(rng.next_f64() * 4_500.0)
    } else {
        0
    };
    if refund > 0 {
        return Posture::Refund(refund);
    }

    Posture::balance_due(round_to_cents(rng.next_f64() * 3_500.0))
}

/// Round a dollar amount to whole cents (half away from zero)
fn round_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Refund-vs-balance coin
enum PostureCoin {
    Seeded(RngManager),
    Entropy,
}

impl PostureCoin {
    fn new(source: CoinSource, seed: u32) -> Self {
        match source {
            CoinSource::Seeded => PostureCoin::Seeded(RngManager::new(seed ^ COIN_STREAM_SALT)),
            CoinSource::Entropy => PostureCoin::Entropy,
        }
    }

    /// True when the client should get a refund
    fn refund(&mut self) -> bool {
        match self {
            PostureCoin::Seeded(rng) => rng.next_f64() < 0.5,
            PostureCoin::Entropy => rand::random::<f64>() < 0.5,
        }
    }
}
