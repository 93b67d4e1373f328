//! Pure tier derivations.
//!
//! Each function takes the tier below plus the raw response of that tier's
//! incremental fetch and returns the next record. No I/O happens here.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::bounds::SnapshotWindow;
use super::error::RetrievalError;
use super::stats::{CellStatsAccumulator, MAX_CONDITIONAL_FORMATS_PER_SHEET, describe_conditional_formats};
use super::types::{
    NamedRangeInfo, SamplingMethod, SheetInfo, SheetSnapshotStats, StructureProjection, Tier1Metadata,
    Tier2Structure, Tier3Sample, Tier4Full, Tier5Snapshot,
};
use crate::a1;
use crate::sheets::response::{GridData, NamedRange, Sheet, Spreadsheet, ValueRange};

/// Row count assumed when the response omits grid properties.
pub const DEFAULT_ROW_COUNT: u32 = 1000;

/// Column count assumed when the response omits grid properties.
pub const DEFAULT_COLUMN_COUNT: u32 = 26;

fn require_sheets<'a>(response: &'a Spreadsheet, spreadsheet_id: &str) -> Result<&'a [Sheet], RetrievalError> {
    match response.sheets.as_deref() {
        Some(sheets) if !sheets.is_empty() => Ok(sheets),
        _ => Err(RetrievalError::NotFound(format!("spreadsheet {spreadsheet_id} has no sheets"))),
    }
}

fn sheet_dimensions(sheet: &Sheet) -> (u32, u32) {
    let grid = sheet.properties.grid_properties.as_ref();
    (
        grid.and_then(|g| g.row_count).unwrap_or(DEFAULT_ROW_COUNT),
        grid.and_then(|g| g.column_count).unwrap_or(DEFAULT_COLUMN_COUNT),
    )
}

/// Tier 1 from a metadata-projection response.
pub fn derive_metadata(
    spreadsheet_id: &str, response: &Spreadsheet, retrieved_at: DateTime<Utc>,
) -> Result<Tier1Metadata, RetrievalError> {
    let sheets = require_sheets(response, spreadsheet_id)?
        .iter()
        .map(|sheet| {
            let (row_count, column_count) = sheet_dimensions(sheet);
            SheetInfo {
                sheet_id: sheet.properties.sheet_id,
                title: sheet.properties.title.clone(),
                index: sheet.properties.index,
                row_count,
                column_count,
            }
        })
        .collect();

    Ok(Tier1Metadata {
        spreadsheet_id: spreadsheet_id.to_string(),
        title: response.properties.as_ref().and_then(|p| p.title.clone()).unwrap_or_default(),
        sheets,
        retrieved_at,
    })
}

/// Tier 2 from tier 1 and a structure-projection response.
pub fn derive_structure(
    metadata: Tier1Metadata, response: &Spreadsheet, projection: StructureProjection,
) -> Result<Tier2Structure, RetrievalError> {
    let sheets = require_sheets(response, &metadata.spreadsheet_id)?;

    let mut merge_count = 0;
    let mut conditional_format_count = 0;
    let mut protected_range_count = 0;
    let mut chart_count = 0;
    let mut filter_count = 0;
    let mut filter_view_count = 0;
    let mut developer_metadata_count = response.developer_metadata.len();
    let mut frozen_row_count = 0;
    let mut frozen_column_count = 0;
    let mut hidden_rows = 0;
    let mut hidden_columns = 0;
    let mut conditional_formats = Vec::new();

    for sheet in sheets {
        merge_count += sheet.merges.len();
        conditional_format_count += sheet.conditional_formats.len();
        protected_range_count += sheet.protected_ranges.len();
        chart_count += sheet.charts.len();
        filter_count += usize::from(sheet.basic_filter.is_some());
        filter_view_count += sheet.filter_views.len();
        developer_metadata_count += sheet.developer_metadata.len();

        if let Some(grid) = &sheet.properties.grid_properties {
            frozen_row_count = frozen_row_count.max(grid.frozen_row_count);
            frozen_column_count = frozen_column_count.max(grid.frozen_column_count);
        }

        for data in &sheet.data {
            hidden_rows += data.row_metadata.iter().filter(|m| m.is_hidden()).count();
            hidden_columns += data.column_metadata.iter().filter(|m| m.is_hidden()).count();
        }

        let (rows, columns) = sheet_dimensions(sheet);
        conditional_formats.extend(describe_conditional_formats(
            &sheet.conditional_formats,
            &sheet.properties.title,
            rows,
            columns,
            MAX_CONDITIONAL_FORMATS_PER_SHEET,
        ));
    }

    let named_ranges = response
        .named_ranges
        .iter()
        .map(|named| NamedRangeInfo { name: named.name.clone(), range: render_named_range(named, &metadata) })
        .collect();

    let full = projection == StructureProjection::Full;

    Ok(Tier2Structure {
        metadata,
        projection,
        merge_count,
        conditional_format_count,
        protected_range_count,
        chart_count,
        pivot_table_count: 0,
        filter_count,
        filter_view_count,
        developer_metadata_count,
        named_ranges,
        frozen_row_count,
        frozen_column_count,
        hidden_row_count: full.then_some(hidden_rows),
        hidden_column_count: full.then_some(hidden_columns),
        conditional_formats,
    })
}

fn render_named_range(named: &NamedRange, metadata: &Tier1Metadata) -> String {
    let Some(range) = &named.range else {
        return String::new();
    };
    // The API omits sheetId when it is 0.
    match metadata.sheet_by_id(range.sheet_id.unwrap_or(0)) {
        Some(sheet) => format!(
            "{}!{}",
            a1::quote_sheet_title(&sheet.title),
            a1::grid_range_to_a1(range, sheet.row_count, sheet.column_count)
        ),
        None => a1::grid_range_to_a1(range, DEFAULT_ROW_COUNT, DEFAULT_COLUMN_COUNT),
    }
}

/// Tier 3 from tier 2 and the values of the sample range.
///
/// Row 0 of `values` is the header; at most `effective_sample_size` rows follow.
pub fn derive_sample(
    structure: Tier2Structure, sheet: &SheetInfo, requested_sample_size: u32, effective_sample_size: u32,
    values: ValueRange,
) -> Tier3Sample {
    let mut rows = values.values.into_iter();
    let headers = rows.next().unwrap_or_default();
    let sampled_rows: Vec<Vec<Value>> = rows.take(effective_sample_size as usize).collect();

    Tier3Sample {
        structure,
        sheet_id: sheet.sheet_id,
        sheet_title: sheet.title.clone(),
        headers,
        sample_size: u32::try_from(sampled_rows.len()).unwrap_or(u32::MAX),
        sampled_rows,
        total_rows: sheet.row_count.saturating_sub(1),
        sampling_method: SamplingMethod::TopN,
        requested_sample_size,
    }
}

/// Tier 4 from tier 3 and the complete value grid.
pub fn derive_full(sample: Tier3Sample, values: ValueRange) -> Tier4Full {
    let row_count = values.values.len();
    let column_count = values.values.iter().map(Vec::len).max().unwrap_or(0);
    Tier4Full { sample, values: values.values, row_count, column_count }
}

/// Tier 5 from tier 4 and the rich grid response for the window.
///
/// `response` is `None` when the window is empty and nothing was fetched.
pub fn derive_snapshot(
    full: Tier4Full, window: SnapshotWindow, max_rows: u32, response: Option<&Spreadsheet>,
) -> Result<Tier5Snapshot, RetrievalError> {
    let sheet_stats: Vec<SheetSnapshotStats> = match response {
        Some(response) => require_sheets(response, &full.sample.structure.metadata.spreadsheet_id)?
            .iter()
            .map(|sheet| sheet_stats(sheet, &window))
            .collect(),
        None => vec![SheetSnapshotStats {
            sheet_id: full.sample.sheet_id,
            title: full.sample.sheet_title.clone(),
            ..SheetSnapshotStats::default()
        }],
    };

    Ok(Tier5Snapshot {
        full,
        sheet_stats,
        max_rows,
        window_rows: window.rows,
        window_columns: window.columns,
        truncated: window.truncated,
        truncation_reason: window.reason,
    })
}

fn sheet_stats(sheet: &Sheet, window: &SnapshotWindow) -> SheetSnapshotStats {
    let mut cells = CellStatsAccumulator::new();
    for grid in &sheet.data {
        observe_grid(&mut cells, grid);
    }
    let cells = cells.finish();

    let (rows, columns) = sheet_dimensions(sheet);
    SheetSnapshotStats {
        sheet_id: sheet.properties.sheet_id,
        title: sheet.properties.title.clone(),
        scanned_rows: window.rows,
        scanned_columns: window.columns,
        formula_count: cells.formula_count,
        populated_cell_count: cells.populated_cell_count,
        hyperlink_count: cells.hyperlink_count,
        note_count: cells.note_count,
        validation_rule_count: cells.validation_rule_count,
        validation_rules: cells.validation_rules,
        conditional_formats: describe_conditional_formats(
            &sheet.conditional_formats,
            &sheet.properties.title,
            rows,
            columns,
            MAX_CONDITIONAL_FORMATS_PER_SHEET,
        ),
        format_diversity: cells.format_diversity,
        merge_count: sheet.merges.len(),
        protected_range_count: sheet.protected_ranges.len(),
        chart_count: sheet.charts.len(),
        filter_view_count: sheet.filter_views.len(),
    }
}

fn observe_grid(cells: &mut CellStatsAccumulator, grid: &GridData) {
    for (r, row) in grid.row_data.iter().enumerate() {
        let row_index = grid.start_row.saturating_add(u32::try_from(r).unwrap_or(u32::MAX));
        for (c, cell) in row.values.iter().enumerate() {
            let column_index = grid.start_column.saturating_add(u32::try_from(c).unwrap_or(u32::MAX));
            cells.observe(row_index, column_index, cell);
        }
    }
}
