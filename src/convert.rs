use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::DataType;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde_json::json;
use serde_json::Value as JSValue;

use crate::convert::config::ConvertConfig;
use crate::convert::sheet::SheetTable;
use crate::model::{DateEntry, DutyCounts, Preference, ResidentAssistant, SurveyDocument};

pub mod config;
pub mod sheet;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SurveyError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningWorkbook {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {sheet} not found in the workbook"))]
    MissingWorksheet { sheet: String },
    #[snafu(display("The worksheet has no header row"))]
    EmptyWorksheet {},
    #[snafu(display("The worksheet has no response rows"))]
    NoResponses {},
    #[snafu(display("Column {name} not found in the header row"))]
    MissingColumn { name: String },
    #[snafu(display(
        "Date field must be either a date type or a string type. (header: {header})"
    ))]
    HeaderNotDate { header: String },
    #[snafu(display("Options must be of the form option_name=option_value"))]
    OptionSyntax { option: String },
    #[snafu(display("Unrecognized option: {name}"))]
    UnknownOption { name: String },
    #[snafu(display("{message}"))]
    Usage { message: String },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error encoding the output document"))]
    EncodingJson { source: serde_json::Error },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

// ********* Cell handling ***********

/// One text rendering for headers and name/location cells, shared by the
/// grouping, the name extraction and the duty-name derivation.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::DateTime(serial) => match serial_to_datetime(*serial) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => serial.to_string(),
        },
        DataType::Empty => "".to_string(),
        other => other.to_string(),
    }
}

/// Maps a cell onto the JSON value written as `prefVal`. Spreadsheets store
/// integer ratings as floats; those must come out as JSON integers.
fn cell_to_json(cell: &DataType) -> JSValue {
    match cell {
        DataType::Int(i) => json!(i),
        DataType::Float(f) if f.fract() == 0.0 => json!(*f as i64),
        DataType::Float(f) => json!(f),
        DataType::String(s) => json!(s),
        DataType::Bool(b) => json!(b),
        DataType::DateTime(_) => json!(cell_text(cell)),
        DataType::Error(e) => {
            warn!("error cell {:?} recorded as null", e);
            JSValue::Null
        }
        DataType::Empty => JSValue::Null,
    }
}

/// Excel serial date (days since 1899-12-30, fraction = time of day).
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=3_000_000.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let secs = (serial * 86400.0).round() as i64;
    base.checked_add_signed(Duration::seconds(secs))
}

// ********* Conversion core ***********

/// Parses one duty column header as a calendar date. Date-typed headers go
/// through the serial conversion; string headers must be `month/day/year`.
fn header_date(header: &DataType) -> SurveyResult<DateEntry> {
    match header {
        DataType::DateTime(serial) => {
            let dt = serial_to_datetime(*serial).context(HeaderNotDateSnafu {
                header: serial.to_string(),
            })?;
            Ok(DateEntry {
                day: dt.day(),
                month: dt.month(),
                year: dt.year(),
            })
        }
        DataType::String(s) => {
            let parts: Vec<&str> = s.split('/').collect();
            ensure!(parts.len() == 3, HeaderNotDateSnafu { header: s.clone() });
            let month = parts[0]
                .trim()
                .parse::<u32>()
                .ok()
                .context(HeaderNotDateSnafu { header: s.clone() })?;
            let day = parts[1]
                .trim()
                .parse::<u32>()
                .ok()
                .context(HeaderNotDateSnafu { header: s.clone() })?;
            let year = parts[2]
                .trim()
                .parse::<i32>()
                .ok()
                .context(HeaderNotDateSnafu { header: s.clone() })?;
            Ok(DateEntry { day, month, year })
        }
        other => HeaderNotDateSnafu {
            header: cell_text(other),
        }
        .fail(),
    }
}

/// Builds one [`ResidentAssistant`] from one response row: the name field
/// becomes `name`, every non-ignored column becomes a preference, in column
/// order.
fn extract_assistant(
    headers: &[DataType],
    row: &[DataType],
    config: &ConvertConfig,
    duty_counts: &dyn DutyCounts,
) -> SurveyResult<ResidentAssistant> {
    let mut name: Option<String> = None;
    let mut preferences: Vec<Preference> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let header_text = cell_text(header);
        let cell = row.get(idx).cloned().unwrap_or(DataType::Empty);
        if header_text == config.name_field {
            name = Some(cell_text(&cell));
        } else if !config.ignore_fields.contains(&header_text) {
            preferences.push(Preference {
                duty: config.duty_rule.duty_name(&header_text),
                pref_val: cell_to_json(&cell),
            });
        }
    }
    let name = name.context(MissingColumnSnafu {
        name: config.name_field.clone(),
    })?;
    let duties = duty_counts.duties_for(&name);
    Ok(ResidentAssistant {
        name,
        preferences,
        duties,
    })
}

/// The shared `dates` sequence. Derived exactly once, after the row loop,
/// from the retained headers; a sheet without response rows has nothing to
/// anchor it and is rejected by the callers with [`SurveyError::NoResponses`].
fn derive_dates(headers: &[DataType], config: &ConvertConfig) -> SurveyResult<Vec<DateEntry>> {
    let mut dates: Vec<DateEntry> = Vec::new();
    for header in headers {
        let text = cell_text(header);
        if config.ignore_fields.contains(&text) {
            continue;
        }
        dates.push(header_date(header)?);
    }
    Ok(dates)
}

/// The grouped conversion: one document per distinct location value, in
/// first-seen row order, all sharing the one derived `dates` sequence.
pub fn convert_grouped(
    table: &SheetTable,
    config: &ConvertConfig,
    duty_counts: &dyn DutyCounts,
) -> SurveyResult<Vec<(String, SurveyDocument)>> {
    let loc_idx = table
        .headers
        .iter()
        .position(|h| cell_text(h) == config.loc_field)
        .context(MissingColumnSnafu {
            name: config.loc_field.clone(),
        })?;
    let row_location =
        |row: &[DataType]| cell_text(row.get(loc_idx).unwrap_or(&DataType::Empty));

    // One empty group per distinct location, before any row is converted.
    let mut groups: Vec<(String, Vec<ResidentAssistant>)> = Vec::new();
    for row in &table.rows {
        let loc = row_location(row);
        if !groups.iter().any(|(key, _)| *key == loc) {
            groups.push((loc, Vec::new()));
        }
    }
    debug!("convert_grouped: {} location groups", groups.len());

    for row in &table.rows {
        let ra = extract_assistant(&table.headers, row, config, duty_counts)?;
        let loc = row_location(row);
        if let Some((_, members)) = groups.iter_mut().find(|(key, _)| *key == loc) {
            members.push(ra);
        }
    }

    ensure!(!table.rows.is_empty(), NoResponsesSnafu {});
    let dates = derive_dates(&table.headers, config)?;

    Ok(groups
        .into_iter()
        .map(|(location, resident_assistants)| {
            (
                location,
                SurveyDocument {
                    resident_assistants,
                    dates: dates.clone(),
                },
            )
        })
        .collect())
}

/// The combined conversion: every row in one document, no grouping.
pub fn convert_combined(
    table: &SheetTable,
    config: &ConvertConfig,
    duty_counts: &dyn DutyCounts,
) -> SurveyResult<SurveyDocument> {
    let mut resident_assistants: Vec<ResidentAssistant> = Vec::new();
    for row in &table.rows {
        resident_assistants.push(extract_assistant(&table.headers, row, config, duty_counts)?);
    }
    ensure!(!table.rows.is_empty(), NoResponsesSnafu {});
    let dates = derive_dates(&table.headers, config)?;
    Ok(SurveyDocument {
        resident_assistants,
        dates,
    })
}

// ********* Output ***********

pub fn render_document(document: &SurveyDocument) -> SurveyResult<String> {
    serde_json::to_string_pretty(document).context(EncodingJsonSnafu {})
}

/// Writes `<location>.json` under `dir` for each document. Files written
/// before a failure stay on disk.
pub fn write_documents(
    dir: &Path,
    documents: &[(String, SurveyDocument)],
) -> SurveyResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::new();
    for (location, document) in documents {
        let path = dir.join(format!("{}.json", location));
        let text = render_document(document)?;
        fs::write(&path, text).context(WritingOutputSnafu {
            path: path.display().to_string(),
        })?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
