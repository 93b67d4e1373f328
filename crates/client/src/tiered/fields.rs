//! Field masks per tier.
//!
//! Each tier asks the document API for the narrowest projection that
//! answers it. The structure tier switches to a reduced mask for large
//! workbooks because per-row/per-column metadata grows with every sheet.

use super::types::StructureProjection;

/// Tier 1: identity and sheet dimensions, no grid data.
pub const METADATA_FIELDS: &str =
    "spreadsheetId,properties.title,sheets.properties(sheetId,title,index,gridProperties(rowCount,columnCount))";

/// Tier 2, small workbooks: everything structural plus row/column metadata.
pub const STRUCTURE_FIELDS_FULL: &str = "spreadsheetId,properties.title,\
namedRanges(namedRangeId,name,range),developerMetadata(metadataId),\
sheets(properties(sheetId,title,index,gridProperties),merges,conditionalFormats,\
protectedRanges(protectedRangeId,range),charts(chartId),basicFilter(range),\
filterViews(filterViewId),developerMetadata(metadataId),\
data(rowMetadata(hiddenByUser,hiddenByFilter),columnMetadata(hiddenByUser,hiddenByFilter)))";

/// Tier 2, large workbooks: same as the full mask without `data(...)`.
pub const STRUCTURE_FIELDS_REDUCED: &str = "spreadsheetId,properties.title,\
namedRanges(namedRangeId,name,range),developerMetadata(metadataId),\
sheets(properties(sheetId,title,index,gridProperties),merges,conditionalFormats,\
protectedRanges(protectedRangeId,range),charts(chartId),basicFilter(range),\
filterViews(filterViewId),developerMetadata(metadataId))";

/// Tier 5: narrow per-cell projection plus sheet-level structure.
pub const SNAPSHOT_FIELDS: &str = "sheets(properties(sheetId,title,index,gridProperties),\
merges,conditionalFormats,protectedRanges(protectedRangeId),charts(chartId),filterViews(filterViewId),\
data(startRow,startColumn,rowData.values(userEnteredValue,effectiveValue,formattedValue,\
userEnteredFormat(numberFormat.type,textFormat(bold,italic),backgroundColor),\
dataValidation,hyperlink,note)))";

impl StructureProjection {
    /// Reduced strictly above `threshold` sheets.
    pub fn for_sheet_count(sheet_count: usize, threshold: usize) -> Self {
        if sheet_count > threshold { StructureProjection::Reduced } else { StructureProjection::Full }
    }

    pub fn fields(self) -> &'static str {
        match self {
            StructureProjection::Full => STRUCTURE_FIELDS_FULL,
            StructureProjection::Reduced => STRUCTURE_FIELDS_REDUCED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_boundary() {
        assert_eq!(StructureProjection::for_sheet_count(10, 10), StructureProjection::Full);
        assert_eq!(StructureProjection::for_sheet_count(11, 10), StructureProjection::Reduced);
        assert_eq!(StructureProjection::for_sheet_count(1, 10), StructureProjection::Full);
    }

    #[test]
    fn test_reduced_mask_drops_row_metadata() {
        assert!(STRUCTURE_FIELDS_FULL.contains("rowMetadata"));
        assert!(STRUCTURE_FIELDS_FULL.contains("columnMetadata"));
        assert!(!STRUCTURE_FIELDS_REDUCED.contains("rowMetadata"));
        assert!(!STRUCTURE_FIELDS_REDUCED.contains("columnMetadata"));
        assert!(STRUCTURE_FIELDS_REDUCED.contains("gridProperties"));
    }

    #[test]
    fn test_masks_have_no_whitespace() {
        for mask in [METADATA_FIELDS, STRUCTURE_FIELDS_FULL, STRUCTURE_FIELDS_REDUCED, SNAPSHOT_FIELDS] {
            assert!(!mask.contains(char::is_whitespace), "{mask}");
        }
    }

    #[test]
    fn test_masks_balanced_parens() {
        for mask in [METADATA_FIELDS, STRUCTURE_FIELDS_FULL, STRUCTURE_FIELDS_REDUCED, SNAPSHOT_FIELDS] {
            let mut depth = 0i32;
            for c in mask.chars() {
                match c {
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => {}
                }
                assert!(depth >= 0, "{mask}");
            }
            assert_eq!(depth, 0, "{mask}");
        }
    }
}
