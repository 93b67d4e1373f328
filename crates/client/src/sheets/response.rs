//! Document API response types.
//!
//! Mirrors the subset of the spreadsheet resource that the tier projections
//! request. Every collection defaults to empty because the API omits empty
//! arrays and anything outside the field mask.

use serde::Deserialize;

/// Top-level spreadsheet resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub properties: Option<SpreadsheetProperties>,
    /// `None` when the response carried no sheets collection at all.
    #[serde(default)]
    pub sheets: Option<Vec<Sheet>>,
    #[serde(default)]
    pub named_ranges: Vec<NamedRange>,
    #[serde(default)]
    pub developer_metadata: Vec<DeveloperMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// One sheet (tab) of a spreadsheet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default)]
    pub properties: SheetProperties,
    #[serde(default)]
    pub merges: Vec<GridRange>,
    #[serde(default)]
    pub conditional_formats: Vec<ConditionalFormatRule>,
    #[serde(default)]
    pub protected_ranges: Vec<ProtectedRange>,
    #[serde(default)]
    pub charts: Vec<EmbeddedChart>,
    #[serde(default)]
    pub filter_views: Vec<FilterView>,
    #[serde(default)]
    pub basic_filter: Option<BasicFilter>,
    #[serde(default)]
    pub developer_metadata: Vec<DeveloperMetadata>,
    #[serde(default)]
    pub data: Vec<GridData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub sheet_type: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub grid_properties: Option<GridProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: Option<u32>,
    #[serde(default)]
    pub column_count: Option<u32>,
    #[serde(default)]
    pub frozen_row_count: u32,
    #[serde(default)]
    pub frozen_column_count: u32,
}

/// A rectangle on a sheet. Indices are 0-based, end-exclusive; a missing
/// bound means the range is unbounded on that side.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    #[serde(default)]
    pub sheet_id: Option<i64>,
    #[serde(default)]
    pub start_row_index: Option<u32>,
    #[serde(default)]
    pub end_row_index: Option<u32>,
    #[serde(default)]
    pub start_column_index: Option<u32>,
    #[serde(default)]
    pub end_column_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormatRule {
    #[serde(default)]
    pub ranges: Vec<GridRange>,
    #[serde(default)]
    pub boolean_rule: Option<BooleanRule>,
    #[serde(default)]
    pub gradient_rule: Option<GradientRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanRule {
    #[serde(default)]
    pub condition: Option<BooleanCondition>,
    #[serde(default)]
    pub format: Option<CellFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanCondition {
    #[serde(default, rename = "type")]
    pub condition_type: Option<String>,
    #[serde(default)]
    pub values: Vec<ConditionValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionValue {
    #[serde(default)]
    pub user_entered_value: Option<String>,
    #[serde(default)]
    pub relative_date: Option<String>,
}

impl ConditionValue {
    /// The value as shown to a user: the entered value, else the relative date keyword.
    pub fn display(&self) -> Option<&str> {
        self.user_entered_value.as_deref().or(self.relative_date.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientRule {
    #[serde(default)]
    pub minpoint: Option<InterpolationPoint>,
    #[serde(default)]
    pub midpoint: Option<InterpolationPoint>,
    #[serde(default)]
    pub maxpoint: Option<InterpolationPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationPoint {
    #[serde(default, rename = "type")]
    pub point_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedRange {
    #[serde(default)]
    pub protected_range_id: Option<i64>,
    #[serde(default)]
    pub range: Option<GridRange>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub warning_only: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedChart {
    #[serde(default)]
    pub chart_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterView {
    #[serde(default)]
    pub filter_view_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub range: Option<GridRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFilter {
    #[serde(default)]
    pub range: Option<GridRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperMetadata {
    #[serde(default)]
    pub metadata_id: Option<i64>,
    #[serde(default)]
    pub metadata_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRange {
    #[serde(default)]
    pub named_range_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub range: Option<GridRange>,
}

/// A block of cells starting at (`start_row`, `start_column`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub start_row: u32,
    #[serde(default)]
    pub start_column: u32,
    #[serde(default)]
    pub row_data: Vec<RowData>,
    #[serde(default)]
    pub row_metadata: Vec<DimensionProperties>,
    #[serde(default)]
    pub column_metadata: Vec<DimensionProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionProperties {
    #[serde(default)]
    pub hidden_by_user: bool,
    #[serde(default)]
    pub hidden_by_filter: bool,
    #[serde(default)]
    pub pixel_size: Option<u32>,
}

impl DimensionProperties {
    pub fn is_hidden(&self) -> bool {
        self.hidden_by_user || self.hidden_by_filter
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    #[serde(default)]
    pub user_entered_value: Option<ExtendedValue>,
    #[serde(default)]
    pub effective_value: Option<ExtendedValue>,
    #[serde(default)]
    pub formatted_value: Option<String>,
    #[serde(default)]
    pub user_entered_format: Option<CellFormat>,
    #[serde(default)]
    pub data_validation: Option<DataValidationRule>,
    #[serde(default)]
    pub hyperlink: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl CellData {
    pub fn has_formula(&self) -> bool {
        self.user_entered_value
            .as_ref()
            .is_some_and(|v| v.formula_value.is_some())
    }

    /// A cell counts as populated when it has an effective or formatted value.
    pub fn is_populated(&self) -> bool {
        self.effective_value.is_some() || self.formatted_value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValue {
    #[serde(default)]
    pub number_value: Option<f64>,
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub bool_value: Option<bool>,
    #[serde(default)]
    pub formula_value: Option<String>,
    #[serde(default)]
    pub error_value: Option<ErrorValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorValue {
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default)]
    pub number_format: Option<NumberFormat>,
    #[serde(default)]
    pub text_format: Option<TextFormat>,
    #[serde(default)]
    pub background_color: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormat {
    #[serde(default, rename = "type")]
    pub format_type: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
}

/// RGBA color, components in `0.0..=1.0`. Missing components are 0,
/// except alpha which the API treats as 1.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    #[serde(default)]
    pub red: Option<f32>,
    #[serde(default)]
    pub green: Option<f32>,
    #[serde(default)]
    pub blue: Option<f32>,
    #[serde(default)]
    pub alpha: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValidationRule {
    #[serde(default)]
    pub condition: Option<BooleanCondition>,
    #[serde(default)]
    pub input_message: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub show_custom_ui: bool,
}

/// Response of "get range values".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}
