use snafu::prelude::*;

use crate::convert::{OptionSyntaxSnafu, SurveyResult, UnknownOptionSnafu};

/// How a duty name is derived from a column header.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DutyRule {
    /// First space-delimited token of the header text (grouped default).
    FirstToken,
    /// The whole header text (combined default).
    FullHeader,
}

impl DutyRule {
    pub fn duty_name(&self, header: &str) -> String {
        match self {
            DutyRule::FirstToken => header.split(' ').next().unwrap_or("").to_string(),
            DutyRule::FullHeader => header.to_string(),
        }
    }
}

/// The conversion settings, fixed before the conversion starts. CLI
/// overrides are folded in with [`apply_overrides`]; nothing reads mutable
/// globals.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConvertConfig {
    /// Header of the column holding the respondent's name.
    pub name_field: String,
    /// Header of the column the output documents are grouped by.
    pub loc_field: String,
    /// Headers excluded from preference extraction and date derivation.
    pub ignore_fields: Vec<String>,
    pub duty_rule: DutyRule,
}

impl ConvertConfig {
    /// Defaults of the grouped variant: survey bookkeeping columns ignored,
    /// first-token duty names.
    pub fn grouped_defaults() -> ConvertConfig {
        ConvertConfig {
            name_field: "Name".to_string(),
            loc_field: "Location".to_string(),
            ignore_fields: vec![
                "Timestamp".to_string(),
                "Username".to_string(),
                "Location".to_string(),
                "Name".to_string(),
            ],
            duty_rule: DutyRule::FirstToken,
        }
    }

    /// Defaults of the combined variant: only the name column is special,
    /// headers are kept whole.
    pub fn combined_defaults() -> ConvertConfig {
        ConvertConfig {
            name_field: "Name".to_string(),
            loc_field: "Location".to_string(),
            ignore_fields: vec!["Name".to_string()],
            duty_rule: DutyRule::FullHeader,
        }
    }
}

/// Folds trailing `KEY=VALUE` arguments into the configuration. Spaces are
/// stripped from the option string before it is split. `IGNORE_FIELDS`
/// takes a comma-separated list of field names and replaces the ignore set.
pub fn apply_overrides(config: &mut ConvertConfig, options: &[String]) -> SurveyResult<()> {
    for option in options {
        let cleaned = option.replace(' ', "");
        let parts: Vec<&str> = cleaned.split('=').collect();
        ensure!(
            parts.len() == 2,
            OptionSyntaxSnafu {
                option: option.clone()
            }
        );
        match parts[0] {
            "LOC_FIELD" => config.loc_field = parts[1].to_string(),
            "NAME_FIELD" => config.name_field = parts[1].to_string(),
            "IGNORE_FIELDS" => {
                config.ignore_fields = parts[1]
                    .split(',')
                    .filter(|field| !field.is_empty())
                    .map(|field| field.to_string())
                    .collect();
            }
            other => {
                return UnknownOptionSnafu { name: other }.fail();
            }
        }
    }
    Ok(())
}
