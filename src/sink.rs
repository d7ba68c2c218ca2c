//! DOM presentation of a collected fingerprint.
//!
//! The widget writes into two host-page elements: a hash node that gets the
//! digest (or the fixed relay error text) and a table body that gets one row
//! per signal. Rows are built with `create_element`/`set_text_content`, never
//! innerHTML, so signal values cannot inject markup.

use serde_json::Value;
use web_sys::{Document, Element};

use crate::error::{FingerprintError, Result};
use crate::relay::RelayReport;
use crate::signal::FingerprintRecord;

/// Default host-page element ids.
pub const HASH_ELEMENT_ID: &str = "fingerprintHash";
pub const TABLE_ELEMENT_ID: &str = "fingerprintTable";

pub struct DomSink {
    hash_id: String,
    table_id: String,
}

impl DomSink {
    pub fn new(hash_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        DomSink {
            hash_id: hash_id.into(),
            table_id: table_id.into(),
        }
    }

    /// Write the digest and one labelled row per signal.
    pub fn render(&self, record: &FingerprintRecord, digest: &str) -> Result<()> {
        let document = document()?;
        self.element(&document, &self.hash_id)?
            .set_text_content(Some(digest));

        let table = self.element(&document, &self.table_id)?;
        table.set_text_content(None);
        for (label, value) in record.display_pairs() {
            append_row(&document, &table, &label, &value)?;
        }
        Ok(())
    }

    /// Write a relay answer: the remote fingerprint plus its auxiliary
    /// fields. Relay keys are the service's own vocabulary and stay raw;
    /// only local signal keys get humanized.
    pub fn render_report(&self, report: &RelayReport) -> Result<()> {
        let document = document()?;
        self.element(&document, &self.hash_id)?
            .set_text_content(Some(&report.fingerprint));

        let table = self.element(&document, &self.table_id)?;
        table.set_text_content(None);
        for (key, value) in &report.fields {
            append_row(&document, &table, key, &field_text(value))?;
        }
        Ok(())
    }

    /// Append follow-up rows (the analysis answer) below whatever the table
    /// already holds.
    pub fn append_fields(&self, fields: &[(String, Value)]) -> Result<()> {
        let document = document()?;
        let table = self.element(&document, &self.table_id)?;
        for (key, value) in fields {
            append_row(&document, &table, key, &field_text(value))?;
        }
        Ok(())
    }

    /// Put fixed failure text where the digest would have gone.
    pub fn render_error(&self, message: &str) {
        let Ok(document) = document() else { return };
        if let Ok(node) = self.element(&document, &self.hash_id) {
            node.set_text_content(Some(message));
        }
        if let Ok(table) = self.element(&document, &self.table_id) {
            table.set_text_content(None);
        }
    }

    fn element(&self, document: &Document, id: &str) -> Result<Element> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| FingerprintError::MissingElement(id.to_string()))
    }
}

impl Default for DomSink {
    fn default() -> Self {
        DomSink::new(HASH_ELEMENT_ID, TABLE_ELEMENT_ID)
    }
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| FingerprintError::Js("no document object".to_string()))
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn append_row(document: &Document, table: &Element, label: &str, value: &str) -> Result<()> {
    let row = document.create_element("tr")?;
    let label_cell = document.create_element("td")?;
    label_cell.set_text_content(Some(label));
    let value_cell = document.create_element("td")?;
    value_cell.set_text_content(Some(value));
    row.append_child(&label_cell)?;
    row.append_child(&value_cell)?;
    table.append_child(&row)?;
    Ok(())
}
