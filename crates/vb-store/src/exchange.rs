//! Bulk export/import and share links.
//!
//! Export is a snapshot of the manager's collections; import is wholesale
//! replacement with atomic failure (a parse error leaves existing state
//! untouched). CSV output is RFC 4180 quoted, which deliberately tightens
//! the legacy exporter's unescaped cells.

use crate::manager::DataManager;
use crate::types::{CalculationResult, SavedCalculation};
use crate::{StoreError, StoreResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use vb_core::{Inputs, date_stamp, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    /// Declared but not implemented yet; callers surface it as a distinct
    /// "coming soon" case, never a silent no-op.
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// `calculator-data-<YYYY-MM-DD>.<ext>`
pub fn export_filename(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!("calculator-data-{}.{}", date_stamp(at), format.extension())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub history_replaced: bool,
    pub saved_replaced: bool,
}

/// What a share link carries: enough to replay the calculation, nothing
/// else. Encoding is purely a serialization concern; no network involved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub calculator_type: String,
    pub inputs: Inputs,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    history: &'a [CalculationResult],
    saved: &'a [SavedCalculation],
    export_date: DateTime<Utc>,
}

/// Import shape: the bulk-export envelope with every section optional.
/// Unknown top-level keys are ignored; a `null` section leaves the matching
/// collection untouched.
#[derive(Deserialize)]
struct ImportEnvelope {
    #[serde(default)]
    history: Option<Vec<CalculationResult>>,
    #[serde(default)]
    saved: Option<Vec<SavedCalculation>>,
}

#[derive(Serialize)]
struct SingleExport<'a> {
    calculator: &'a str,
    timestamp: DateTime<Utc>,
    inputs: &'a Inputs,
    outputs: &'a vb_core::Outputs,
}

impl DataManager {
    pub fn export(&self, format: ExportFormat) -> StoreResult<String> {
        self.export_at(format, now())
    }

    pub fn export_at(&self, format: ExportFormat, at: DateTime<Utc>) -> StoreResult<String> {
        match format {
            ExportFormat::Json => {
                let envelope = ExportEnvelope {
                    history: self.history(),
                    saved: self.saved(),
                    export_date: at,
                };
                Ok(serde_json::to_string_pretty(&envelope)?)
            }
            ExportFormat::Csv => self.export_csv(),
            ExportFormat::Pdf => Err(StoreError::ExportUnsupported { format: "pdf" }),
        }
    }

    fn export_csv(&self) -> StoreResult<String> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(vec![]);

        writer.write_record(["Type", "Date", "Inputs", "Outputs", "Project", "Notes"])?;
        for entry in self.history() {
            writer.write_record([
                entry.calculator_type.as_str(),
                &entry.timestamp.to_rfc3339(),
                &serde_json::to_string(&entry.inputs)?,
                &serde_json::to_string(&entry.outputs)?,
                entry.project.as_deref().unwrap_or(""),
                entry.notes.as_deref().unwrap_or(""),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// One result as a standalone JSON document,
    /// `{calculator, timestamp, inputs, outputs}`.
    pub fn export_single(result: &CalculationResult) -> StoreResult<String> {
        let doc = SingleExport {
            calculator: &result.calculator_type,
            timestamp: result.timestamp,
            inputs: &result.inputs,
            outputs: &result.outputs,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// `<calculatorType>-calculation-<YYYY-MM-DD>.json`
    pub fn single_filename(result: &CalculationResult) -> String {
        format!(
            "{}-calculation-{}.json",
            result.calculator_type,
            date_stamp(result.timestamp)
        )
    }

    /// Wholesale replacement from a bulk-export document. Parsing happens
    /// up front; nothing mutates on failure.
    pub fn import(&mut self, contents: &str) -> StoreResult<ImportSummary> {
        let envelope: ImportEnvelope = serde_json::from_str(contents)?;

        let mut summary = ImportSummary::default();
        if let Some(history) = envelope.history {
            self.replace_history(history)?;
            summary.history_replaced = true;
        }
        if let Some(saved) = envelope.saved {
            self.replace_saved(saved)?;
            summary.saved_replaced = true;
        }
        Ok(summary)
    }

    /// Shareable link: base URL plus `?shared=<base64(JSON payload)>`.
    pub fn share_url(base_url: &str, result: &CalculationResult) -> StoreResult<String> {
        let payload = SharePayload {
            calculator_type: result.calculator_type.clone(),
            inputs: result.inputs.clone(),
            timestamp: result.timestamp,
        };
        let json = serde_json::to_string(&payload)?;
        Ok(format!("{base_url}?shared={}", BASE64.encode(json)))
    }
}

/// Decode a `shared` query parameter (or a whole URL containing one) back
/// into its payload.
pub fn decode_share_payload(shared: &str) -> StoreResult<SharePayload> {
    let encoded = match shared.find("shared=") {
        Some(idx) => &shared[idx + "shared=".len()..],
        None => shared,
    };
    let bytes = BASE64.decode(encoded)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}
