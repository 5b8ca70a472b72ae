use std::path::Path;
use std::process::exit;

use clap::Parser;
use log::{error, info};

use duty_survey::convert::config::{apply_overrides, ConvertConfig};
use duty_survey::convert::sheet::load_sheet;
use duty_survey::convert::{convert_grouped, write_documents, UsageSnafu};
use duty_survey::model::ManualFill;
use duty_survey::report::record_failure;
use duty_survey::SurveyResult;

/// Converts a duty-preference survey workbook into the JSON consumed by the
/// duty scheduling algorithm, one file per location.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path of the survey workbook (.xlsx).
    #[clap(value_parser)]
    path: String,

    /// Name of the worksheet holding the responses.
    #[clap(value_parser)]
    sheet: String,

    /// Configuration overrides of the form KEY=VALUE. Recognized keys:
    /// LOC_FIELD, NAME_FIELD and IGNORE_FIELDS (a comma-separated list of
    /// field names).
    #[clap(value_parser)]
    options: Vec<String>,
}

fn run() -> SurveyResult<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            return UsageSnafu {
                message: err.to_string(),
            }
            .fail();
        }
        // --help and --version exit normally.
        Err(err) => err.exit(),
    };

    let mut config = ConvertConfig::grouped_defaults();
    apply_overrides(&mut config, &args.options)?;
    info!("configuration: {:?}", config);

    let table = load_sheet(&args.path, &args.sheet)?;
    let documents = convert_grouped(&table, &config, &ManualFill)?;
    let written = write_documents(Path::new("."), &documents)?;
    info!("wrote {} documents", written.len());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        record_failure(&err);
        error!("{}", err);
        exit(1);
    }
}
