//! The grouped variant's failure log: every failed run appends one
//! timestamped block to a fixed-name text file next to the output, so
//! whoever runs the conversion by hand can see what went wrong later.

use std::error::Error;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use chrono::Local;

pub const FAILURE_LOG: &str = "parsing_errors.log";

/// One log block: the timestamp line, the error, one `caused by:` line per
/// source in the chain, then a blank separator line.
fn render_block(timestamp: &str, err: &dyn Error) -> String {
    let mut block = format!("({})\n", timestamp);
    let _ = writeln!(block, "{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(block, "caused by: {}", cause);
        source = cause.source();
    }
    block.push('\n');
    block
}

fn append_block(path: &Path, block: &str) -> std::io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut log| log.write_all(block.as_bytes()))
}

/// Appends a failure block to [`FAILURE_LOG`] in the working directory.
/// Best-effort: if the log itself cannot be written, the block goes to
/// stderr instead.
pub fn record_failure(err: &dyn Error) {
    record_failure_at(Path::new(FAILURE_LOG), err)
}

pub fn record_failure_at(path: &Path, err: &dyn Error) {
    let block = render_block(
        &Local::now().format("%m/%d/%Y-%H:%M:%S").to_string(),
        err,
    );
    if let Err(io_err) = append_block(path, &block) {
        eprintln!("could not append to {}: {}", path.display(), io_err);
        eprint!("{}", block);
    }
}
