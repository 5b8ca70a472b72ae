use log::debug;
use snafu::prelude::*;

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::convert::{
    EmptyWorksheetSnafu, MissingWorksheetSnafu, OpeningWorkbookSnafu, SurveyResult,
};

/// The loaded worksheet: the first row as headers, the rest as response
/// rows. Rows may be shorter than the header row; missing cells read as
/// empty.
#[derive(PartialEq, Debug, Clone)]
pub struct SheetTable {
    pub headers: Vec<DataType>,
    pub rows: Vec<Vec<DataType>>,
}

/// Opens the workbook at `path` and loads the worksheet named `sheet`.
pub fn load_sheet(path: &str, sheet: &str) -> SurveyResult<SheetTable> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningWorkbookSnafu { path })?;
    let wrange = workbook
        .worksheet_range(sheet)
        .context(MissingWorksheetSnafu { sheet })?
        .context(OpeningWorkbookSnafu { path })?;

    let mut rows = wrange.rows();
    let headers: Vec<DataType> = rows.next().context(EmptyWorksheetSnafu {})?.to_vec();
    debug!("load_sheet: headers: {:?}", headers);
    let rows: Vec<Vec<DataType>> = rows.map(|row| row.to_vec()).collect();
    debug!("load_sheet: {} response rows", rows.len());
    Ok(SheetTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::SurveyError;

    #[test]
    fn unreadable_workbook_is_an_io_error() {
        let err = load_sheet("/no/such/workbook.xlsx", "Sheet1").unwrap_err();
        assert!(matches!(err, SurveyError::OpeningWorkbook { ref path, .. }
            if path.as_str() == "/no/such/workbook.xlsx"));
    }
}
