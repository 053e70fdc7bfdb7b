use serde::Serialize;

use super::{Frame, RenderError};

/// One `(time, series, value)` observation. Non-finite values are kept and
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub time: i32,
    pub series: String,
    pub value: f64,
}

/// Row-major reshape: every row emits one record per requested column, in
/// the order the columns were requested.
pub fn to_long_form(frame: &Frame, value_columns: &[&str]) -> Result<Vec<LongRecord>, RenderError> {
    let selected = value_columns
        .iter()
        .map(|name| frame.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(frame.len() * selected.len());
    for (row, time) in frame.times().iter().enumerate() {
        for column in &selected {
            records.push(LongRecord {
                time: *time,
                series: column.name.clone(),
                value: column.values[row],
            });
        }
    }
    Ok(records)
}
