//! Document API request types.

use serde::{Deserialize, Serialize};

/// Parameters for a "get spreadsheet" call.
///
/// `fields` is a server-side field mask in dot/paren notation; only the
/// named fields come back, which is what keeps tier payloads small.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetRequest {
    /// Field mask, e.g. `sheets.properties(sheetId,title)`.
    pub fields: String,

    /// A1 ranges restricting which grid data is returned.
    pub ranges: Vec<String>,

    /// Whether cell-level grid data is included.
    pub include_grid_data: bool,
}

impl SpreadsheetRequest {
    /// Request restricted to `fields`, without grid data.
    pub fn new(fields: impl Into<String>) -> Self {
        Self { fields: fields.into(), ..Default::default() }
    }

    /// Restrict the request to an A1 range.
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.ranges.push(range.into());
        self
    }

    /// Include grid data in the response.
    pub fn with_grid_data(mut self) -> Self {
        self.include_grid_data = true;
        self
    }

    /// Render as URL query pairs. Ranges repeat, one pair per range.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(self.ranges.len() + 2);
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.clone()));
        }
        pairs.push(("includeGridData", self.include_grid_data.to_string()));
        for range in &self.ranges {
            pairs.push(("ranges", range.clone()));
        }
        pairs
    }
}

/// How cell values are rendered by "get range values".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    /// Raw values: numbers stay numbers, formulas show their result.
    #[default]
    UnformattedValue,
    FormattedValue,
    Formula,
}

impl ValueRenderOption {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_without_ranges() {
        let req = SpreadsheetRequest::new("spreadsheetId,properties.title");
        let pairs = req.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("fields", "spreadsheetId,properties.title".to_string()),
                ("includeGridData", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_with_ranges_and_grid_data() {
        let req = SpreadsheetRequest::new("sheets.data")
            .with_range("Sheet1!A1:C10")
            .with_range("Sheet2!A1:B2")
            .with_grid_data();
        let pairs = req.query_pairs();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[1], ("includeGridData", "true".to_string()));
        assert_eq!(pairs[2], ("ranges", "Sheet1!A1:C10".to_string()));
        assert_eq!(pairs[3], ("ranges", "Sheet2!A1:B2".to_string()));
    }

    #[test]
    fn test_value_render_option_wire_names() {
        assert_eq!(ValueRenderOption::default(), ValueRenderOption::UnformattedValue);
        assert_eq!(
            serde_json::to_string(&ValueRenderOption::UnformattedValue).unwrap(),
            format!("\"{}\"", ValueRenderOption::UnformattedValue.as_str())
        );
        assert_eq!(ValueRenderOption::Formula.as_str(), "FORMULA");
    }
}
