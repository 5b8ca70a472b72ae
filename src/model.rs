// ********* Output data structures ***********
//
// These mirror the JSON contract of the downstream scheduling algorithm:
// field names and field order are part of the wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

/// One rated duty for one respondent.
///
/// `duty` is derived from the column header (see [`DutyRule`]); `pref_val`
/// is the raw cell value of that column in the respondent's row.
///
/// [`DutyRule`]: crate::convert::config::DutyRule
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub duty: String,
    #[serde(rename = "prefVal")]
    pub pref_val: JSValue,
}

/// One survey respondent: their name and their preference for every duty
/// column, in column order.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResidentAssistant {
    pub name: String,
    pub preferences: Vec<Preference>,
    /// Required duty count. Not computed yet; carries the placeholder from
    /// the injected [`DutyCounts`] provider until a real one exists.
    pub duties: String,
}

/// A calendar date parsed from a duty column header.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DateEntry {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

/// The document handed to the scheduler: every respondent of one group plus
/// the duty dates shared by the whole sheet.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDocument {
    #[serde(rename = "residentAssistants")]
    pub resident_assistants: Vec<ResidentAssistant>,
    pub dates: Vec<DateEntry>,
}

// ********* Duty counts ***********

/// Sentinel written to the `duties` field while no duty-count source exists.
/// The scheduler expects an integer there, so the value is edited by hand
/// before the document is fed to it.
pub const PLACEHOLDER_DUTIES: &str = "FILL THIS IN MANUALLY";

/// Source of the number of duties each resident assistant must take.
///
/// The survey does not carry this information today. Implementations that
/// pull it from a roster or a second sheet can be injected into the
/// conversion without touching the row loop.
pub trait DutyCounts {
    fn duties_for(&self, ra_name: &str) -> String;
}

/// The only current provider: every assistant gets [`PLACEHOLDER_DUTIES`].
pub struct ManualFill;

impl DutyCounts for ManualFill {
    fn duties_for(&self, _ra_name: &str) -> String {
        PLACEHOLDER_DUTIES.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_fill_is_name_independent() {
        assert_eq!(ManualFill.duties_for("A. Lee"), PLACEHOLDER_DUTIES);
        assert_eq!(ManualFill.duties_for(""), PLACEHOLDER_DUTIES);
    }

    #[test]
    fn document_wire_names() {
        let doc = SurveyDocument {
            resident_assistants: vec![ResidentAssistant {
                name: "A. Lee".to_string(),
                preferences: vec![Preference {
                    duty: "Weekday".to_string(),
                    pref_val: serde_json::json!(3),
                }],
                duties: PLACEHOLDER_DUTIES.to_string(),
            }],
            dates: vec![DateEntry {
                day: 15,
                month: 9,
                year: 2021,
            }],
        };
        let js = serde_json::to_value(&doc).unwrap();
        assert_eq!(js["residentAssistants"][0]["name"], "A. Lee");
        assert_eq!(js["residentAssistants"][0]["preferences"][0]["prefVal"], 3);
        assert_eq!(js["dates"][0]["month"], 9);
    }
}
