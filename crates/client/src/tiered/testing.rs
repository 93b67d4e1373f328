//! Scripted document API for retrieval tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use sheetscope_core::MemoryCache;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::TieredRetrieval;
use crate::sheets::{SheetsApi, SheetsError, Spreadsheet, SpreadsheetRequest, ValueRange, ValueRenderOption};

/// Answers every "get spreadsheet" with `document` and every "get range
/// values" with the leading rows of `values` up to the range's end row.
pub(crate) struct FakeSheets {
    document: Value,
    values: Vec<Vec<Value>>,
    failure: Mutex<Option<SheetsError>>,
    spreadsheet_calls: AtomicUsize,
    values_calls: AtomicUsize,
    requests: Mutex<Vec<SpreadsheetRequest>>,
    ranges: Mutex<Vec<String>>,
}

impl FakeSheets {
    pub(crate) fn new(document: Value) -> Self {
        Self {
            document,
            values: Vec::new(),
            failure: Mutex::new(None),
            spreadsheet_calls: AtomicUsize::new(0),
            values_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            ranges: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_values(mut self, values: Vec<Vec<Value>>) -> Self {
        self.values = values;
        self
    }

    /// Make every later call fail with `err`.
    pub(crate) fn fail_with(&self, err: SheetsError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub(crate) fn spreadsheet_calls(&self) -> usize {
        self.spreadsheet_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn values_calls(&self) -> usize {
        self.values_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<SpreadsheetRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn ranges(&self) -> Vec<String> {
        self.ranges.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), SheetsError> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// End row of an A1 range such as `Sheet1!A1:C6`.
fn end_row(range: &str) -> Option<usize> {
    let end = range.rsplit(':').next()?;
    let digits: String = end.chars().skip_while(|c| c.is_ascii_alphabetic()).collect();
    digits.parse().ok()
}

#[async_trait]
impl SheetsApi for FakeSheets {
    async fn get_spreadsheet(
        &self, _spreadsheet_id: &str, request: &SpreadsheetRequest,
    ) -> Result<Spreadsheet, SheetsError> {
        self.spreadsheet_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.check_failure()?;
        serde_json::from_value(self.document.clone()).map_err(|e| SheetsError::Parse(e.to_string()))
    }

    async fn get_values(
        &self, _spreadsheet_id: &str, range: &str, _render: ValueRenderOption,
    ) -> Result<ValueRange, SheetsError> {
        self.values_calls.fetch_add(1, Ordering::SeqCst);
        self.ranges.lock().unwrap().push(range.to_string());
        self.check_failure()?;
        let rows = end_row(range).unwrap_or(self.values.len()).min(self.values.len());
        Ok(ValueRange { range: Some(range.to_string()), values: self.values[..rows].to_vec(), ..Default::default() })
    }
}

/// Document whose sheets are `(sheet_id, title, row_count, column_count)`.
pub(crate) fn document(sheets: &[(i64, &str, u32, u32)]) -> Value {
    let sheets: Vec<Value> = sheets
        .iter()
        .enumerate()
        .map(|(index, (sheet_id, title, rows, columns))| {
            json!({
                "properties": {
                    "sheetId": sheet_id,
                    "title": title,
                    "index": index,
                    "gridProperties": {"rowCount": rows, "columnCount": columns}
                }
            })
        })
        .collect();
    json!({"spreadsheetId": "doc-1", "properties": {"title": "Test Doc"}, "sheets": sheets})
}

pub(crate) fn retrieval(fake: &Arc<FakeSheets>) -> TieredRetrieval {
    TieredRetrieval::new(fake.clone(), Arc::new(MemoryCache::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_row() {
        assert_eq!(end_row("Sheet1!A1:C6"), Some(6));
        assert_eq!(end_row("'My Sheet'!A1:AB120"), Some(120));
        assert_eq!(end_row("Sheet1!A1:B"), None);
    }
}
