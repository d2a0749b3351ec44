//! Fixed page layouts: the client summary and the mock Form 1040
//!
//! A layout is a plain value: a list of positioned text runs and rules in
//! PDF points, origin bottom-left. Renderers only draw it.

use crate::core::money::{format_usd, micros_to_cents};
use crate::metrics::advisory::RiskLevel;
use crate::metrics::{Advisory, TaxProfile, TaxRates};
use crate::models::client::{Client, Posture};
use serde::Serialize;

/// A4 width in points
pub const PAGE_WIDTH: f32 = 595.28;

/// A4 height in points
pub const PAGE_HEIGHT: f32 = 841.89;

pub const MARGIN: f32 = 48.0;

pub const DISCLAIMER: &str =
    "Demo document generated by OrcaTax with mock rates. Not tax advice and not for filing.";

pub const FORM_1040_DISCLAIMER: &str =
    "This is a demo PDF generated by OrcaTax Cloud. Not a valid IRS submission.";

const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;
const LEADING: f32 = 14.0;
const SECTION_GAP: f32 = 10.0;
const FOOTER_RULE_Y: f32 = 64.0;

/// Typeface of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Font {
    Regular,
    Bold,
}

/// One drawable item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
}

/// A single page of positioned elements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<Element>,
}

impl PageLayout {
    /// Text runs in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Line { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

/// Top-down writer that keeps the baseline cursor
struct Cursor {
    y: f32,
    elements: Vec<Element>,
}

impl Cursor {
    fn text(&mut self, size: f32, font: Font, text: impl Into<String>) {
        self.elements.push(Element::Text {
            x: MARGIN,
            y: self.y,
            size,
            font,
            text: text.into(),
        });
        self.y -= LEADING.max(size + 4.0);
    }

    fn rule(&mut self) {
        self.elements.push(rule_at(self.y + LEADING / 2.0));
        self.y -= SECTION_GAP;
    }

    fn heading(&mut self, text: &str) {
        self.y -= SECTION_GAP;
        self.text(HEADING_SIZE, Font::Bold, text);
    }

    fn row(&mut self, label: &str, value: impl AsRef<str>) {
        self.text(BODY_SIZE, Font::Regular, format!("{}: {}", label, value.as_ref()));
    }
}

fn rule_at(y: f32) -> Element {
    Element::Line {
        x1: MARGIN,
        y1: y,
        x2: PAGE_WIDTH - MARGIN,
        y2: y,
        width: 0.75,
    }
}

fn micros_usd(micros: i64) -> String {
    format_usd(micros_to_cents(micros))
}

/// Basis points as a percentage label (`2200` → `22%`, `225` → `2.25%`)
fn percent_label(bps: i64) -> String {
    let whole = bps / 100;
    match bps % 100 {
        0 => format!("{}%", whole),
        frac if frac % 10 == 0 => format!("{}.{}%", whole, frac / 10),
        frac => format!("{}.{:02}%", whole, frac),
    }
}

fn with_footer(page: Cursor, disclaimer: &str) -> PageLayout {
    let mut elements = page.elements;
    elements.push(rule_at(FOOTER_RULE_Y));
    elements.push(Element::Text {
        x: MARGIN,
        y: FOOTER_RULE_Y - 16.0,
        size: FOOTER_SIZE,
        font: Font::Regular,
        text: disclaimer.to_string(),
    });

    PageLayout {
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        elements,
    }
}

fn top_of_page() -> Cursor {
    Cursor {
        y: PAGE_HEIGHT - MARGIN - TITLE_SIZE,
        elements: Vec::new(),
    }
}

/// Lay out the one-page summary of a client
///
/// # Example
/// ```
/// use orcatax_core_rs::document::layout_summary;
/// use orcatax_core_rs::factory::generate;
/// use orcatax_core_rs::metrics::{compute_tax_profile, summarize, TaxRates};
///
/// let client = &generate(1, 2025)[0];
/// let layout = layout_summary(
///     client,
///     &compute_tax_profile(client, &TaxRates::default()),
///     &summarize(client),
/// );
/// assert!(layout.contains_text("Name: Reese Jones"));
/// ```
pub fn layout_summary(client: &Client, tax: &TaxProfile, advisory: &Advisory) -> PageLayout {
    let mut page = top_of_page();

    page.text(TITLE_SIZE, Font::Bold, "OrcaTax Client Summary");
    page.text(
        SUBTITLE_SIZE,
        Font::Regular,
        format!(
            "{} ({}) | Last filed {}",
            client.name(),
            client.id(),
            client.last_filed_year()
        ),
    );
    page.rule();

    let contact = client.contact();
    page.heading("Taxpayer");
    page.row("Name", client.name());
    page.row("Client ID", client.id());
    page.row("Entity type", client.client_type().label());
    page.row("Filing status", client.filing_status().label());
    page.row("Dependents", client.dependents().to_string());
    page.row("Location", format!("{}, {}", contact.city, contact.state));
    page.row("Contact", format!("{} | {}", contact.email, contact.phone));
    page.row("Status", client.status().label());

    page.heading("Financial Summary");
    page.row("Income", format_usd(client.income()));
    page.row("Expenses", format_usd(client.expenses()));
    page.row("Net income", format_usd(client.net_income()));
    let posture = match client.posture() {
        Posture::Refund(cents) => format!("Refund {}", format_usd(cents)),
        Posture::BalanceDue(cents) => format!("Balance due {}", format_usd(cents)),
        Posture::Neutral => "Neutral".to_string(),
    };
    page.row("Posture", posture);
    page.row(
        "Risk score",
        format!(
            "{} ({})",
            client.risk_score(),
            RiskLevel::from_score(client.risk_score())
        ),
    );

    page.heading("Computed Tax (mock rates)");
    page.row("Federal tax", micros_usd(tax.federal));
    page.row("KY state tax", micros_usd(tax.state));
    page.row("Lexington local tax", micros_usd(tax.local));
    page.row("Total tax", micros_usd(tax.total_tax));
    page.row("Credits", micros_usd(tax.credits));
    page.row("Estimated refund", micros_usd(tax.estimated_refund));
    page.row("Efficiency", format!("{}%", tax.efficiency));

    page.heading("Advisory");
    for bullet in &advisory.bullets {
        page.text(BODY_SIZE, Font::Regular, format!("- {}", bullet));
    }
    page.y -= SECTION_GAP / 2.0;
    page.text(BODY_SIZE, Font::Bold, "Recommended actions");
    for (i, action) in advisory.actions.iter().enumerate() {
        page.text(BODY_SIZE, Font::Regular, format!("{}. {}", i + 1, action));
    }

    with_footer(page, DISCLAIMER)
}

/// Lay out the mock Form 1040 issued when an e-file is accepted
pub fn layout_form_1040(client: &Client, tax: &TaxProfile, rates: &TaxRates) -> PageLayout {
    let mut page = top_of_page();

    page.text(
        HEADING_SIZE + 2.0,
        Font::Bold,
        "Form 1040 (Mock) - U.S. Individual Income Tax Return",
    );
    page.text(SUBTITLE_SIZE, Font::Regular, "OrcaTax Cloud - Demonstration Output");
    page.rule();

    let contact = client.contact();
    page.heading("Taxpayer");
    page.row("Name", format!("{} ({})", client.name(), client.id()));
    page.row("City/State", format!("{}, {}", contact.city, contact.state));
    page.row("Email", &contact.email);

    page.heading("Summary");
    page.row("Income", format_usd(client.income()));
    page.row("Expenses", format_usd(client.expenses()));
    page.row("Net Income", format_usd(client.net_income()));

    page.heading("Computed (Mock)");
    page.row(
        &format!("Federal Tax ({})", percent_label(rates.federal_bps)),
        micros_usd(tax.federal),
    );
    page.row(
        &format!("KY State Tax ({})", percent_label(rates.state_bps)),
        micros_usd(tax.state),
    );
    page.row(
        &format!("Lexington Local ({})", percent_label(rates.local_bps)),
        micros_usd(tax.local),
    );
    page.row("Credits", micros_usd(tax.credits));
    page.row("Total Tax", micros_usd(tax.total_tax));
    page.row("Estimated Refund", micros_usd(tax.estimated_refund));

    with_footer(page, FORM_1040_DISCLAIMER)
}

/// Download name of a client's summary (`OrcaTax_C0001_Reese_Jones.pdf`)
pub fn summary_file_name(client: &Client) -> String {
    let name: Vec<&str> = client.name().split_whitespace().collect();
    format!("OrcaTax_{}_{}.pdf", client.id(), name.join("_"))
}

/// Download name of a client's mock 1040 (`OrcaTax_C0001_1040.pdf`)
pub fn form_1040_file_name(client: &Client) -> String {
    format!("OrcaTax_{}_1040.pdf", client.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::generate;
    use crate::metrics::{compute_tax_profile, summarize, TaxRates};

    fn reese_layout() -> PageLayout {
        let client = &generate(1, 2025)[0];
        layout_summary(
            client,
            &compute_tax_profile(client, &TaxRates::default()),
            &summarize(client),
        )
    }

    #[test]
    fn test_blocks_in_order() {
        let layout = reese_layout();
        let texts: Vec<&str> = layout.texts().collect();

        assert_eq!(texts[0], "OrcaTax Client Summary");
        let pos = |needle: &str| texts.iter().position(|t| *t == needle).unwrap();
        assert!(pos("Taxpayer") < pos("Financial Summary"));
        assert!(pos("Financial Summary") < pos("Computed Tax (mock rates)"));
        assert!(pos("Computed Tax (mock rates)") < pos("Advisory"));
        assert_eq!(*texts.last().unwrap(), DISCLAIMER);
    }

    #[test]
    fn test_figures() {
        let layout = reese_layout();

        assert!(layout.contains_text("Income: $207,605"));
        assert!(layout.contains_text("Posture: Refund $1,086.27"));
        assert!(layout.contains_text("Federal tax: $45,673.10"));
        assert!(layout.contains_text("Total tax: $60,724.46"));
        assert!(layout.contains_text("Estimated refund: $0"));
        assert!(layout.contains_text("Risk score: 74 (Medium)"));
        assert!(layout.contains_text("1. Send secure doc request"));
    }

    #[test]
    fn test_everything_on_page() {
        let layout = reese_layout();
        for element in &layout.elements {
            if let Element::Text { x, y, .. } = element {
                assert!(*x >= MARGIN && *y > 0.0 && *y < PAGE_HEIGHT);
            }
        }

        // body never runs into the footer rule
        let lowest_body = layout
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { y, text, .. } if text != DISCLAIMER => Some(*y),
                _ => None,
            })
            .fold(f32::MAX, f32::min);
        assert!(lowest_body > FOOTER_RULE_Y);
    }

    #[test]
    fn test_file_name() {
        let client = &generate(1, 2025)[0];
        assert_eq!(summary_file_name(client), "OrcaTax_C0001_Reese_Jones.pdf");
        assert_eq!(form_1040_file_name(client), "OrcaTax_C0001_1040.pdf");
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(2_200), "22%");
        assert_eq!(percent_label(500), "5%");
        assert_eq!(percent_label(225), "2.25%");
        assert_eq!(percent_label(250), "2.5%");
    }

    #[test]
    fn test_form_1040_figures() {
        let client = &generate(1, 2025)[0];
        let rates = TaxRates::default();
        let layout = layout_form_1040(client, &compute_tax_profile(client, &rates), &rates);
        let texts: Vec<&str> = layout.texts().collect();

        assert_eq!(texts[0], "Form 1040 (Mock) - U.S. Individual Income Tax Return");
        assert!(layout.contains_text("Name: Reese Jones (C0001)"));
        assert!(layout.contains_text("City/State: Lexington, KY"));
        assert!(layout.contains_text("Net Income: $186,466"));
        assert!(layout.contains_text("Federal Tax (22%): $45,673.10"));
        assert!(layout.contains_text("Lexington Local (2.25%): $4,671.11"));
        assert!(layout.contains_text("Total Tax: $60,724.46"));
        assert_eq!(*texts.last().unwrap(), FORM_1040_DISCLAIMER);
    }
}
