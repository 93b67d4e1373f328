//! Tier records.
//!
//! Each tier embeds the previous one (`#[serde(flatten)]`), so its serialized
//! field set is a superset of the tier below. [`TierData`] is the tagged
//! union over all five shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Retrieval tier, ordered by completeness and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Metadata = 1,
    Structure = 2,
    Sample = 3,
    Full = 4,
    Snapshot = 5,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Metadata, Tier::Structure, Tier::Sample, Tier::Full, Tier::Snapshot];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.number() == n)
    }

    /// Cache lifetime. Higher tiers are larger and must reflect fresher state.
    pub fn ttl(self) -> Duration {
        match self {
            Tier::Metadata => Duration::from_secs(300),
            Tier::Structure => Duration::from_secs(180),
            Tier::Sample => Duration::from_secs(60),
            Tier::Full => Duration::from_secs(30),
            Tier::Snapshot => Duration::from_secs(15),
        }
    }

    /// Cache key: `tier:{n}:{id}` for document-wide tiers,
    /// `tier:{n}:{id}:{sheetId|all}` for sheet-targeted ones.
    pub fn cache_key(self, spreadsheet_id: &str, sheet_id: Option<i64>) -> String {
        match self {
            Tier::Metadata | Tier::Structure => format!("tier:{}:{}", self.number(), spreadsheet_id),
            _ => match sheet_id {
                Some(id) => format!("tier:{}:{}:{}", self.number(), spreadsheet_id, id),
                None => format!("tier:{}:{}:all", self.number(), spreadsheet_id),
            },
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Sheet dimensions and identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInfo {
    pub sheet_id: i64,
    pub title: String,
    pub index: u32,
    pub row_count: u32,
    pub column_count: u32,
}

/// Tier 1: document identity and sheet dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier1Metadata {
    pub spreadsheet_id: String,
    pub title: String,
    pub sheets: Vec<SheetInfo>,
    pub retrieved_at: DateTime<Utc>,
}

impl Tier1Metadata {
    /// Resolve a target sheet: the given id, else the first sheet.
    pub fn find_sheet(&self, sheet_id: Option<i64>) -> Option<&SheetInfo> {
        match sheet_id {
            Some(id) => self.sheets.iter().find(|s| s.sheet_id == id),
            None => self.sheets.first(),
        }
    }

    pub fn sheet_by_id(&self, sheet_id: i64) -> Option<&SheetInfo> {
        self.sheets.iter().find(|s| s.sheet_id == sheet_id)
    }
}

/// Field mask chosen for the structure fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureProjection {
    /// Includes per-row/per-column metadata.
    Full,
    /// Omits per-row/per-column metadata for large workbooks.
    Reduced,
}

/// A named range rendered as `Sheet!A1:B2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRangeInfo {
    pub name: String,
    pub range: String,
}

/// Human-oriented description of one conditional-format rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFormatSummary {
    pub sheet: String,
    /// 1-based A1 ranges the rule applies to.
    pub ranges: Vec<String>,
    /// Boolean condition type, or `GRADIENT`.
    pub rule_type: String,
    pub description: String,
}

/// One data-validation rule, located by its single-cell reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRuleSummary {
    pub cell: String,
    pub condition_type: String,
    pub values: Vec<String>,
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_message: Option<String>,
}

/// Tier 2: structural counts across all sheets.
///
/// `pivot_table_count` is always 0: neither structure projection can see pivots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier2Structure {
    #[serde(flatten)]
    pub metadata: Tier1Metadata,
    pub projection: StructureProjection,
    pub merge_count: usize,
    pub conditional_format_count: usize,
    pub protected_range_count: usize,
    pub chart_count: usize,
    pub pivot_table_count: usize,
    pub filter_count: usize,
    pub filter_view_count: usize,
    pub developer_metadata_count: usize,
    pub named_ranges: Vec<NamedRangeInfo>,
    /// Maximum across sheets.
    pub frozen_row_count: u32,
    /// Maximum across sheets.
    pub frozen_column_count: u32,
    /// Only known under the full projection.
    pub hidden_row_count: Option<usize>,
    /// Only known under the full projection.
    pub hidden_column_count: Option<usize>,
    pub conditional_formats: Vec<ConditionalFormatSummary>,
}

/// How sample rows were chosen. Only `TopN` is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMethod {
    #[serde(rename = "top-N")]
    TopN,
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "stratified")]
    Stratified,
}

/// Tier 3: header row plus the first rows of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier3Sample {
    #[serde(flatten)]
    pub structure: Tier2Structure,
    pub sheet_id: i64,
    pub sheet_title: String,
    pub headers: Vec<Value>,
    pub sampled_rows: Vec<Vec<Value>>,
    /// Rows actually returned, excluding the header.
    pub sample_size: u32,
    /// Declared rows excluding the header.
    pub total_rows: u32,
    pub sampling_method: SamplingMethod,
    /// Requested size after defaulting and the configured cap.
    pub requested_sample_size: u32,
}

/// Tier 4: the complete value grid of the sampled sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier4Full {
    #[serde(flatten)]
    pub sample: Tier3Sample,
    pub values: Vec<Vec<Value>>,
    /// Rows in the returned grid.
    pub row_count: usize,
    /// Widest returned row.
    pub column_count: usize,
}

/// Cell-level statistics for one sheet within the snapshot window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSnapshotStats {
    pub sheet_id: i64,
    pub title: String,
    pub scanned_rows: u32,
    pub scanned_columns: u32,
    pub formula_count: usize,
    pub populated_cell_count: usize,
    pub hyperlink_count: usize,
    pub note_count: usize,
    pub validation_rule_count: usize,
    /// At most 50 entries; `validation_rule_count` is the true total.
    pub validation_rules: Vec<ValidationRuleSummary>,
    /// At most 20 entries.
    pub conditional_formats: Vec<ConditionalFormatSummary>,
    /// Distinct formatting signatures among populated cells.
    pub format_diversity: usize,
    pub merge_count: usize,
    pub protected_range_count: usize,
    pub chart_count: usize,
    pub filter_view_count: usize,
}

/// Tier 5: bounded, cell-level snapshot of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier5Snapshot {
    #[serde(flatten)]
    pub full: Tier4Full,
    pub sheet_stats: Vec<SheetSnapshotStats>,
    /// Row cap the snapshot was taken with.
    pub max_rows: u32,
    pub window_rows: u32,
    pub window_columns: u32,
    pub truncated: bool,
    pub truncation_reason: Option<String>,
}

/// Any tier record, discriminated by tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "lowercase")]
pub enum TierData {
    Metadata(Tier1Metadata),
    Structure(Tier2Structure),
    Sample(Tier3Sample),
    Full(Tier4Full),
    Snapshot(Tier5Snapshot),
}

impl TierData {
    pub fn tier(&self) -> Tier {
        match self {
            TierData::Metadata(_) => Tier::Metadata,
            TierData::Structure(_) => Tier::Structure,
            TierData::Sample(_) => Tier::Sample,
            TierData::Full(_) => Tier::Full,
            TierData::Snapshot(_) => Tier::Snapshot,
        }
    }

    /// The common tier-1 prefix every record carries.
    pub fn metadata(&self) -> &Tier1Metadata {
        match self {
            TierData::Metadata(t) => t,
            TierData::Structure(t) => &t.metadata,
            TierData::Sample(t) => &t.structure.metadata,
            TierData::Full(t) => &t.sample.structure.metadata,
            TierData::Snapshot(t) => &t.full.sample.structure.metadata,
        }
    }
}

impl From<Tier1Metadata> for TierData {
    fn from(t: Tier1Metadata) -> Self {
        TierData::Metadata(t)
    }
}

impl From<Tier2Structure> for TierData {
    fn from(t: Tier2Structure) -> Self {
        TierData::Structure(t)
    }
}

impl From<Tier3Sample> for TierData {
    fn from(t: Tier3Sample) -> Self {
        TierData::Sample(t)
    }
}

impl From<Tier4Full> for TierData {
    fn from(t: Tier4Full) -> Self {
        TierData::Full(t)
    }
}

impl From<Tier5Snapshot> for TierData {
    fn from(t: Tier5Snapshot) -> Self {
        TierData::Snapshot(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_strictly_decreasing() {
        let millis: Vec<u128> = Tier::ALL.iter().map(|t| t.ttl().as_millis()).collect();
        assert_eq!(millis, vec![300_000, 180_000, 60_000, 30_000, 15_000]);
        assert!(millis.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_tier_numbers() {
        for (i, tier) in Tier::ALL.iter().enumerate() {
            assert_eq!(tier.number() as usize, i + 1);
            assert_eq!(Tier::from_number(tier.number()), Some(*tier));
        }
        assert_eq!(Tier::from_number(0), None);
        assert_eq!(Tier::from_number(6), None);
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(Tier::Metadata.cache_key("abc", None), "tier:1:abc");
        assert_eq!(Tier::Structure.cache_key("abc", Some(7)), "tier:2:abc");
        assert_eq!(Tier::Sample.cache_key("abc", Some(7)), "tier:3:abc:7");
        assert_eq!(Tier::Full.cache_key("abc", None), "tier:4:abc:all");
        assert_eq!(Tier::Snapshot.cache_key("abc", Some(0)), "tier:5:abc:0");
    }

    #[test]
    fn test_sampling_method_wire_names() {
        assert_eq!(serde_json::to_string(&SamplingMethod::TopN).unwrap(), r#""top-N""#);
        assert_eq!(serde_json::to_string(&SamplingMethod::Stratified).unwrap(), r#""stratified""#);
    }

    #[test]
    fn test_find_sheet() {
        let metadata = Tier1Metadata {
            spreadsheet_id: "abc".into(),
            title: "Doc".into(),
            sheets: vec![
                SheetInfo { sheet_id: 5, title: "First".into(), index: 0, row_count: 10, column_count: 2 },
                SheetInfo { sheet_id: 9, title: "Second".into(), index: 1, row_count: 10, column_count: 2 },
            ],
            retrieved_at: Utc::now(),
        };
        assert_eq!(metadata.find_sheet(None).unwrap().sheet_id, 5);
        assert_eq!(metadata.find_sheet(Some(9)).unwrap().title, "Second");
        assert!(metadata.find_sheet(Some(404)).is_none());
    }

    #[test]
    fn test_tier_data_tagging() {
        let metadata = Tier1Metadata {
            spreadsheet_id: "abc".into(),
            title: "Doc".into(),
            sheets: vec![],
            retrieved_at: Utc::now(),
        };
        let data = TierData::from(metadata.clone());
        assert_eq!(data.tier(), Tier::Metadata);
        assert_eq!(data.metadata(), &metadata);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["tier"], "metadata");
        assert_eq!(json["spreadsheet_id"], "abc");

        let back: TierData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
