pub mod csv;
pub mod workbook;

use std::io::Cursor;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::CombinedRecord;

pub use csv::export_csv;
pub use workbook::{build_workbook, HEADERS};

pub const DEFAULT_SHEET_NAME: &str = "STAFF 2025";
pub const DEFAULT_TITLE: &str = "STAFF DE MÉDICOS";

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid sheet name: {0}")]
    SheetName(String),

    #[error("failed to write xlsx: {0}")]
    Write(String),
}

/// One line of the staff sheet, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub specialty: String,
    pub doctor_name: String,
    pub day: String,
    pub building: String,
    pub floor: String,
    pub room: String,
    pub start_time: String,
    pub end_time: String,
    pub kind: String,
}

impl ExportRow {
    pub fn cells(&self) -> [String; 9] {
        [
            self.specialty.clone(),
            self.doctor_name.clone(),
            self.day.clone(),
            self.building.clone(),
            self.floor.clone(),
            self.room.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.kind.clone(),
        ]
    }
}

impl From<&CombinedRecord> for ExportRow {
    fn from(record: &CombinedRecord) -> Self {
        let room = match (&record.room_description, record.room_code) {
            (Some(desc), _) if !desc.is_empty() => desc.clone(),
            (_, Some(code)) => code.to_string(),
            _ => String::new(),
        };
        Self {
            specialty: record.specialty.clone(),
            doctor_name: record.doctor_name.clone(),
            day: record.day_name.clone(),
            building: record.building_name.clone(),
            floor: record.floor_label.clone(),
            room,
            start_time: record.start_time.clone(),
            end_time: record.end_time.clone(),
            kind: record.kind.label().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub sheet_name: String,
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFile {
    Xlsx(Vec<u8>),
    Csv(String),
}

impl ExportFile {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFile::Xlsx(_) => XLSX_CONTENT_TYPE,
            ExportFile::Csv(_) => CSV_CONTENT_TYPE,
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            ExportFile::Xlsx(_) => "STAFF.xlsx".to_string(),
            ExportFile::Csv(_) => format!("STAFF_{}.csv", chrono::Local::now().format("%Y-%m-%d")),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ExportFile::Xlsx(bytes) => bytes,
            ExportFile::Csv(text) => text.into_bytes(),
        }
    }
}

/// Rows for the staff sheet, ordered by specialty and then doctor.
pub fn export_rows(records: &[CombinedRecord]) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();
    rows.sort_by(|a, b| {
        a.specialty
            .cmp(&b.specialty)
            .then_with(|| a.doctor_name.cmp(&b.doctor_name))
    });
    rows
}

fn write_xlsx(items: &[ExportRow], options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let book = build_workbook(items, options)?;
    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer)
        .map_err(|e| ExportError::Write(format!("{:?}", e)))?;
    Ok(buffer.into_inner())
}

/// Produce the staff sheet. When the xlsx cannot be produced the same rows
/// are returned as CSV instead; this never fails.
pub fn generate_workbook(items: &[ExportRow], options: &ExportOptions) -> ExportFile {
    match write_xlsx(items, options) {
        Ok(bytes) => {
            info!(rows = items.len(), size = bytes.len(), "generated staff workbook");
            ExportFile::Xlsx(bytes)
        }
        Err(e) => {
            warn!(target: "agenda::fallback", error = %e, "xlsx export failed, falling back to csv");
            ExportFile::Csv(export_csv(items))
        }
    }
}
