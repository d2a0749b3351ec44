//! Client documents: the one-page summary and the mock Form 1040
//!
//! [`layout_summary`] and [`layout_form_1040`] place a document on an A4
//! page; a [`DocumentRenderer`] turns the layout into bytes.
//! [`render_summary`] and [`render_form_1040`] do both.

pub mod layout;
pub mod pdf;

pub use layout::{
    form_1040_file_name, layout_form_1040, layout_summary, summary_file_name, Element, Font,
    PageLayout,
};
pub use pdf::{DocumentRenderer, PdfRenderer};

use crate::metrics::{compute_tax_profile, summarize, TaxRates};
use crate::models::client::Client;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Render failed: {0}")]
    Render(String),
}

/// A rendered summary ready to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Compute, lay out and render a client's summary
pub fn render_summary(
    client: &Client,
    rates: &TaxRates,
    renderer: &dyn DocumentRenderer,
) -> Result<RenderedDocument, DocumentError> {
    let layout = layout_summary(client, &compute_tax_profile(client, rates), &summarize(client));
    let bytes = renderer.render(&layout)?;

    Ok(RenderedDocument {
        file_name: with_extension(summary_file_name(client), renderer),
        bytes,
    })
}

/// Compute, lay out and render a client's mock Form 1040
pub fn render_form_1040(
    client: &Client,
    rates: &TaxRates,
    renderer: &dyn DocumentRenderer,
) -> Result<RenderedDocument, DocumentError> {
    let layout = layout_form_1040(client, &compute_tax_profile(client, rates), rates);
    let bytes = renderer.render(&layout)?;

    Ok(RenderedDocument {
        file_name: with_extension(form_1040_file_name(client), renderer),
        bytes,
    })
}

/// Swap the `.pdf` suffix for the renderer's own extension
fn with_extension(pdf_name: String, renderer: &dyn DocumentRenderer) -> String {
    match pdf_name.strip_suffix(".pdf") {
        Some(base) if renderer.extension() != "pdf" => format!("{}.{}", base, renderer.extension()),
        _ => pdf_name,
    }
}
