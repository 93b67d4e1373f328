//! Column-letter codec and A1 range construction.
//!
//! Column letters are bijective base-26: `A`=0 … `Z`=25, `AA`=26, `AZ`=51,
//! `BA`=52, `ZZ`=701, `AAA`=702. There is no zero digit, so encoding
//! decrements after each division.

use crate::sheets::response::GridRange;

/// Convert a 0-based column index to its letter form.
pub fn column_to_letters(index: u32) -> String {
    let mut n = i64::from(index);
    let mut letters = Vec::new();
    while n >= 0 {
        letters.push(char::from(b'A' + (n % 26) as u8));
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Convert column letters (case-insensitive) back to a 0-based index.
///
/// Returns `None` for empty input, non-letters, or values past `u32`.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = u64::from(c.to_ascii_uppercase()) - u64::from('A') + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }
    u32::try_from(n - 1).ok()
}

/// Single-cell reference for a 0-based (row, column), e.g. (2, 1) → `B3`.
pub fn cell_ref(row: u32, column: u32) -> String {
    format!("{}{}", column_to_letters(column), u64::from(row) + 1)
}

/// Sheet title as it must appear before `!` in a range.
///
/// Plain identifiers (`Sheet1`, `raw_data`) pass through; anything else is
/// wrapped in single quotes with embedded quotes doubled.
pub fn quote_sheet_title(title: &str) -> String {
    let plain = title.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && title.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain { title.to_string() } else { format!("'{}'", title.replace('\'', "''")) }
}

/// Range covering the top-left `rows` × `columns` block of a sheet.
///
/// Both dimensions are clamped to at least 1 so the range stays well-formed.
pub fn sheet_range(title: &str, rows: u32, columns: u32) -> String {
    format!(
        "{}!A1:{}{}",
        quote_sheet_title(title),
        column_to_letters(columns.max(1) - 1),
        rows.max(1)
    )
}

/// Render a grid range as 1-based A1 notation without the sheet prefix.
///
/// Unbounded sides extend to the sheet's extent. A one-cell range renders
/// as a single reference.
pub fn grid_range_to_a1(range: &GridRange, sheet_rows: u32, sheet_columns: u32) -> String {
    let start_row = range.start_row_index.unwrap_or(0);
    let start_col = range.start_column_index.unwrap_or(0);
    let end_row = range.end_row_index.unwrap_or(sheet_rows).max(start_row.saturating_add(1));
    let end_col = range.end_column_index.unwrap_or(sheet_columns).max(start_col.saturating_add(1));

    let start = cell_ref(start_row, start_col);
    if end_row - start_row == 1 && end_col - start_col == 1 {
        return start;
    }
    format!("{}:{}", start, cell_ref(end_row - 1, end_col - 1))
}
