use std::process::exit;

use clap::Parser;

use duty_survey::convert::config::ConvertConfig;
use duty_survey::convert::sheet::load_sheet;
use duty_survey::convert::{convert_combined, render_document, UsageSnafu};
use duty_survey::model::ManualFill;
use duty_survey::SurveyResult;

/// Converts a duty-preference survey workbook into one combined JSON
/// document for the duty scheduling algorithm, printed to stdout.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path of the survey workbook (.xlsx).
    #[clap(value_parser)]
    path: String,

    /// Name of the worksheet holding the responses.
    #[clap(value_parser)]
    sheet: String,
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

    let table = load_sheet(&args.path, &args.sheet)?;
    let document = convert_combined(&table, &ConvertConfig::combined_defaults(), &ManualFill)?;
    println!("{}", render_document(&document)?);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{}", err);
        exit(1);
    }
}
