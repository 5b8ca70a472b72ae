//! Converts duty-preference survey workbooks (xlsx) into the JSON documents
//! consumed by the duty scheduling algorithm: one document per location in
//! the grouped variant, one combined document in the simple variant.

pub mod convert;
pub mod model;
pub mod report;

pub use convert::{SurveyError, SurveyResult};
