//! Size bounds for the sample and snapshot tiers.

/// Rows to sample: the requested size (or the default), capped by the
/// configured maximum and the sheet's row count.
pub fn effective_sample_size(requested: Option<u32>, default: u32, max: u32, row_count: u32) -> u32 {
    requested.unwrap_or(default).min(max).min(row_count)
}

/// The block of a sheet a snapshot scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotWindow {
    pub rows: u32,
    pub columns: u32,
    pub truncated: bool,
    pub reason: Option<String>,
}

impl SnapshotWindow {
    /// Clamp the sheet's dimensions to the row and column caps.
    pub fn compute(sheet_rows: u32, sheet_columns: u32, max_rows: u32, max_columns: u32) -> Self {
        let rows = sheet_rows.min(max_rows);
        let columns = sheet_columns.min(max_columns);

        let mut limits = Vec::new();
        if sheet_rows > max_rows {
            limits.push(format!("{max_rows} of {sheet_rows} rows"));
        }
        if sheet_columns > max_columns {
            limits.push(format!("{max_columns} of {sheet_columns} columns"));
        }

        let truncated = !limits.is_empty();
        let reason = truncated.then(|| format!("Snapshot limited to {}", limits.join(" and ")));

        Self { rows, columns, truncated, reason }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }
}
