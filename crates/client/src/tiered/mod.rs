//! Five-tier progressive retrieval.
//!
//! Every tier is cache-first, builds on the tier below through the pure
//! functions in [`derive`], and caches its own record with a tier-specific
//! TTL (5 min, 3 min, 1 min, 30 s, 15 s).
//!
//! ### Tiers
//!
//! 1. **metadata**: identity and per-sheet dimensions
//! 2. **structure**: structural counts; reduced field mask above the
//!    large-workbook threshold
//! 3. **sample**: header row plus the first N rows of one sheet
//! 4. **full**: the whole value grid of that sheet (unbounded)
//! 5. **snapshot**: cell-level statistics over a bounded window
//!
//! Errors from the remote client pass through as [`RetrievalError::Remote`].
//! Cache failures never fail a tier: they are logged and read as misses.
//! Concurrent calls for the same key are not coalesced.

pub mod bounds;
pub mod derive;
pub mod error;
pub mod fields;
pub mod stats;
pub mod types;

#[cfg(test)]
mod testing;

pub use bounds::{SnapshotWindow, effective_sample_size};
pub use error::RetrievalError;
pub use types::{
    ConditionalFormatSummary, NamedRangeInfo, SamplingMethod, SheetInfo, SheetSnapshotStats, StructureProjection,
    Tier, Tier1Metadata, Tier2Structure, Tier3Sample, Tier4Full, Tier5Snapshot, TierData, ValidationRuleSummary,
};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sheetscope_core::{AppConfig, TierCache};
use std::sync::Arc;

use crate::a1;
use crate::sheets::{SheetsApi, SpreadsheetRequest, ValueRange, ValueRenderOption};

/// Size limits applied by the sample and snapshot tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalOptions {
    /// Sample rows when the caller gives no size (default: 100).
    pub default_sample_size: u32,
    /// Upper bound on sample rows (default: 500).
    pub max_sample_size: u32,
    /// Snapshot row cap when the caller gives none (default: 5000).
    pub snapshot_max_rows: u32,
    /// Snapshot column cap (default: 100).
    pub snapshot_max_columns: u32,
    /// Sheet count above which the reduced structure mask is used (default: 10).
    pub large_workbook_sheets: usize,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            default_sample_size: 100,
            max_sample_size: 500,
            snapshot_max_rows: 5000,
            snapshot_max_columns: 100,
            large_workbook_sheets: 10,
        }
    }
}

impl From<&AppConfig> for RetrievalOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_sample_size: config.default_sample_size,
            max_sample_size: config.max_sample_size,
            snapshot_max_rows: config.snapshot_max_rows,
            snapshot_max_columns: config.snapshot_max_columns,
            large_workbook_sheets: config.large_workbook_sheets,
        }
    }
}

/// One tier call with its optional parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRequest {
    pub tier: Tier,
    pub sheet_id: Option<i64>,
    pub sample_size: Option<u32>,
    pub max_rows: Option<u32>,
}

impl TierRequest {
    pub fn new(tier: Tier) -> Self {
        Self { tier, sheet_id: None, sample_size: None, max_rows: None }
    }

    pub fn with_sheet(mut self, sheet_id: i64) -> Self {
        self.sheet_id = Some(sheet_id);
        self
    }

    pub fn with_sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    pub fn with_max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Tiered, cache-first spreadsheet retrieval.
#[derive(Clone)]
pub struct TieredRetrieval {
    api: Arc<dyn SheetsApi>,
    cache: Arc<dyn TierCache>,
    options: RetrievalOptions,
}

impl TieredRetrieval {
    pub fn new(api: Arc<dyn SheetsApi>, cache: Arc<dyn TierCache>) -> Self {
        Self { api, cache, options: RetrievalOptions::default() }
    }

    pub fn with_options(mut self, options: RetrievalOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RetrievalOptions {
        &self.options
    }

    /// Run the tier named by `request`.
    pub async fn get_tier(&self, spreadsheet_id: &str, request: TierRequest) -> Result<TierData, RetrievalError> {
        let data = match request.tier {
            Tier::Metadata => self.get_metadata(spreadsheet_id).await?.into(),
            Tier::Structure => self.get_structure(spreadsheet_id).await?.into(),
            Tier::Sample => self
                .get_sample(spreadsheet_id, request.sheet_id, request.sample_size)
                .await?
                .into(),
            Tier::Full => self.get_full(spreadsheet_id, request.sheet_id).await?.into(),
            Tier::Snapshot => self
                .get_full_snapshot(spreadsheet_id, request.sheet_id, request.max_rows)
                .await?
                .into(),
        };
        Ok(data)
    }

    /// Tier 1: document identity and sheet dimensions.
    pub async fn get_metadata(&self, spreadsheet_id: &str) -> Result<Tier1Metadata, RetrievalError> {
        let key = Tier::Metadata.cache_key(spreadsheet_id, None);
        if let Some(cached) = self.cached::<Tier1Metadata>(&key, |_| true).await {
            return Ok(cached);
        }

        let request = SpreadsheetRequest::new(fields::METADATA_FIELDS);
        let response = self.api.get_spreadsheet(spreadsheet_id, &request).await?;
        let metadata = derive::derive_metadata(spreadsheet_id, &response, Utc::now())?;

        self.store(Tier::Metadata, &key, &metadata).await;
        Ok(metadata)
    }

    /// Tier 2: structural counts across all sheets.
    pub async fn get_structure(&self, spreadsheet_id: &str) -> Result<Tier2Structure, RetrievalError> {
        let key = Tier::Structure.cache_key(spreadsheet_id, None);
        if let Some(cached) = self.cached::<Tier2Structure>(&key, |_| true).await {
            return Ok(cached);
        }

        let metadata = self.get_metadata(spreadsheet_id).await?;
        let projection =
            StructureProjection::for_sheet_count(metadata.sheets.len(), self.options.large_workbook_sheets);
        if projection == StructureProjection::Reduced {
            tracing::info!(
                "{} has {} sheets, using reduced structure projection",
                spreadsheet_id,
                metadata.sheets.len()
            );
        }

        let request = SpreadsheetRequest::new(projection.fields());
        let response = self.api.get_spreadsheet(spreadsheet_id, &request).await?;
        let structure = derive::derive_structure(metadata, &response, projection)?;

        self.store(Tier::Structure, &key, &structure).await;
        Ok(structure)
    }

    /// Tier 3: header row plus up to `sample_size` rows of one sheet
    /// (default: the first sheet).
    pub async fn get_sample(
        &self, spreadsheet_id: &str, sheet_id: Option<i64>, sample_size: Option<u32>,
    ) -> Result<Tier3Sample, RetrievalError> {
        let requested = sample_size
            .unwrap_or(self.options.default_sample_size)
            .min(self.options.max_sample_size);

        let key = Tier::Sample.cache_key(spreadsheet_id, sheet_id);
        if let Some(cached) = self
            .cached::<Tier3Sample>(&key, |s| s.requested_sample_size == requested)
            .await
        {
            return Ok(cached);
        }

        let structure = self.get_structure(spreadsheet_id).await?;
        let sheet = resolve_sheet(&structure.metadata, sheet_id)?;
        let effective = effective_sample_size(
            sample_size,
            self.options.default_sample_size,
            self.options.max_sample_size,
            sheet.row_count,
        );

        // One extra row for the header.
        let values = self
            .fetch_values(spreadsheet_id, &sheet, effective.saturating_add(1), sheet.column_count)
            .await?;
        let sample = derive::derive_sample(structure, &sheet, requested, effective, values);

        self.store(Tier::Sample, &key, &sample).await;
        Ok(sample)
    }

    /// Tier 4: every value of the target sheet. Unbounded.
    pub async fn get_full(&self, spreadsheet_id: &str, sheet_id: Option<i64>) -> Result<Tier4Full, RetrievalError> {
        let key = Tier::Full.cache_key(spreadsheet_id, sheet_id);
        if let Some(cached) = self.cached::<Tier4Full>(&key, |_| true).await {
            return Ok(cached);
        }

        let sample = self.get_sample(spreadsheet_id, sheet_id, None).await?;
        let sheet = resolve_sheet(&sample.structure.metadata, Some(sample.sheet_id))?;

        tracing::warn!(
            "fetching all {}x{} cells of sheet {} in {}; this may be slow for large sheets",
            sheet.row_count,
            sheet.column_count,
            sheet.title,
            spreadsheet_id
        );
        let values = self
            .fetch_values(spreadsheet_id, &sheet, sheet.row_count, sheet.column_count)
            .await?;
        let full = derive::derive_full(sample, values);

        self.store(Tier::Full, &key, &full).await;
        Ok(full)
    }

    /// Tier 5: cell-level statistics over at most `max_rows` rows
    /// (default: 5000) and the configured column cap.
    pub async fn get_full_snapshot(
        &self, spreadsheet_id: &str, sheet_id: Option<i64>, max_rows: Option<u32>,
    ) -> Result<Tier5Snapshot, RetrievalError> {
        let max_rows = max_rows.unwrap_or(self.options.snapshot_max_rows);

        let key = Tier::Snapshot.cache_key(spreadsheet_id, sheet_id);
        if let Some(cached) = self
            .cached::<Tier5Snapshot>(&key, |s| s.max_rows == max_rows)
            .await
        {
            return Ok(cached);
        }

        let full = self.get_full(spreadsheet_id, sheet_id).await?;
        let sheet = resolve_sheet(&full.sample.structure.metadata, Some(full.sample.sheet_id))?;
        let window = SnapshotWindow::compute(
            sheet.row_count,
            sheet.column_count,
            max_rows,
            self.options.snapshot_max_columns,
        );
        if let Some(reason) = &window.reason {
            tracing::debug!("snapshot of {} truncated: {}", spreadsheet_id, reason);
        }

        let response = if window.is_empty() {
            None
        } else {
            let request = SpreadsheetRequest::new(fields::SNAPSHOT_FIELDS)
                .with_range(a1::sheet_range(&sheet.title, window.rows, window.columns))
                .with_grid_data();
            Some(self.api.get_spreadsheet(spreadsheet_id, &request).await?)
        };
        let snapshot = derive::derive_snapshot(full, window, max_rows, response.as_ref())?;

        self.store(Tier::Snapshot, &key, &snapshot).await;
        Ok(snapshot)
    }

    /// Raw values of the top-left `rows` x `columns` block; nothing is
    /// fetched for an empty sheet.
    async fn fetch_values(
        &self, spreadsheet_id: &str, sheet: &SheetInfo, rows: u32, columns: u32,
    ) -> Result<ValueRange, RetrievalError> {
        if sheet.row_count == 0 || sheet.column_count == 0 {
            return Ok(ValueRange::default());
        }
        let range = a1::sheet_range(&sheet.title, rows, columns);
        Ok(self
            .api
            .get_values(spreadsheet_id, &range, ValueRenderOption::UnformattedValue)
            .await?)
    }

    /// Live cache entry under `key` that also satisfies `accept`.
    async fn cached<T: DeserializeOwned>(&self, key: &str, accept: impl Fn(&T) -> bool) -> Option<T> {
        let json = match self.cache.get(key).await {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!("cache miss for {}", key);
                return None;
            }
            Err(e) => {
                tracing::warn!("cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<T>(&json) {
            Ok(value) if accept(&value) => {
                tracing::debug!("cache hit for {}", key);
                Some(value)
            }
            Ok(_) => {
                tracing::debug!("cache entry for {} has different parameters, recomputing", key);
                None
            }
            Err(e) => {
                tracing::warn!("discarding undecodable cache entry for {}: {}", key, e);
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, tier: Tier, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize tier {} for {}: {}", tier, key, e);
                return;
            }
        };
        if let Err(e) = self.cache.set(key, &json, tier.ttl()).await {
            tracing::warn!("failed to cache tier {} for {}: {}", tier, key, e);
        }
    }
}

fn resolve_sheet(metadata: &Tier1Metadata, sheet_id: Option<i64>) -> Result<SheetInfo, RetrievalError> {
    metadata.find_sheet(sheet_id).cloned().ok_or_else(|| {
        RetrievalError::NotFound(match sheet_id {
            Some(id) => format!("sheet {} in spreadsheet {}", id, metadata.spreadsheet_id),
            None => format!("spreadsheet {} has no sheets", metadata.spreadsheet_id),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeSheets, document, retrieval};
    use super::*;
    use crate::sheets::SheetsError;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn abc_values() -> Vec<Vec<Value>> {
        vec![vec![json!("A"), json!("B"), json!("C")], vec![json!(1), json!(2), json!(3)], vec![json!(4), json!(5), json!(6)]]
    }

    fn small_doc() -> Arc<FakeSheets> {
        Arc::new(FakeSheets::new(document(&[(0, "Sheet1", 5, 3)])).with_values(abc_values()))
    }

    #[tokio::test]
    async fn test_metadata_cache_hit_fetches_once() {
        let fake = small_doc();
        let tiers = retrieval(&fake);

        let first = tiers.get_metadata("doc-1").await.unwrap();
        let second = tiers.get_metadata("doc-1").await.unwrap();

        assert_eq!(fake.spreadsheet_calls(), 1);
        assert_eq!(first, second);
        assert_eq!(first.title, "Test Doc");
        assert_eq!(first.sheets[0].row_count, 5);
    }

    #[tokio::test]
    async fn test_metadata_request_has_no_grid_data() {
        let fake = small_doc();
        retrieval(&fake).get_metadata("doc-1").await.unwrap();

        let requests = fake.requests();
        assert_eq!(requests[0].fields, fields::METADATA_FIELDS);
        assert!(!requests[0].include_grid_data);
        assert!(requests[0].ranges.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_sample() {
        let fake = small_doc();
        let sample = retrieval(&fake).get_sample("doc-1", Some(0), Some(10)).await.unwrap();

        assert_eq!(sample.headers, vec![json!("A"), json!("B"), json!("C")]);
        assert_eq!(sample.sampled_rows, vec![vec![json!(1), json!(2), json!(3)], vec![json!(4), json!(5), json!(6)]]);
        assert_eq!(sample.sample_size, 2);
        assert_eq!(sample.total_rows, 4);
        assert_eq!(sample.sampling_method, SamplingMethod::TopN);
        // min(10, 500, 5) rows plus the header.
        assert_eq!(fake.ranges(), vec!["Sheet1!A1:C6"]);
    }

    #[tokio::test]
    async fn test_tier_fields_are_supersets() {
        let fake = small_doc();
        let tiers = retrieval(&fake);

        let mut previous: Option<BTreeSet<String>> = None;
        for tier in Tier::ALL {
            let data = tiers.get_tier("doc-1", TierRequest::new(tier)).await.unwrap();
            assert_eq!(data.tier(), tier);

            let json = serde_json::to_value(&data).unwrap();
            let keys: BTreeSet<String> = json.as_object().unwrap().keys().cloned().collect();
            if let Some(previous) = &previous {
                assert!(keys.is_superset(previous), "tier {tier} is missing fields of tier {}", tier.number() - 1);
                assert!(keys.len() > previous.len());
            }
            previous = Some(keys);
        }
    }

    #[tokio::test]
    async fn test_higher_tiers_reuse_cached_lower_tiers() {
        let fake = small_doc();
        let tiers = retrieval(&fake);

        tiers.get_structure("doc-1").await.unwrap();
        assert_eq!(fake.spreadsheet_calls(), 2);

        tiers.get_sample("doc-1", None, None).await.unwrap();
        assert_eq!(fake.spreadsheet_calls(), 2);
        assert_eq!(fake.values_calls(), 1);
    }

    #[tokio::test]
    async fn test_full_fetches_declared_dimensions() {
        let fake = small_doc();
        let full = retrieval(&fake).get_full("doc-1", None).await.unwrap();

        assert_eq!(fake.ranges(), vec!["Sheet1!A1:C6", "Sheet1!A1:C5"]);
        assert_eq!(full.values, abc_values());
        assert_eq!(full.row_count, 3);
        assert_eq!(full.column_count, 3);
    }

    #[tokio::test]
    async fn test_snapshot_truncates_large_sheet() {
        let fake = Arc::new(FakeSheets::new(document(&[(7, "Big", 20_000, 250)])));
        let snapshot = retrieval(&fake).get_full_snapshot("doc-1", Some(7), None).await.unwrap();

        assert!(snapshot.truncated);
        let reason = snapshot.truncation_reason.unwrap();
        assert!(reason.contains("5000"));
        assert!(reason.contains("20000"));
        assert_eq!(snapshot.max_rows, 5000);
        assert_eq!(snapshot.window_rows, 5000);
        assert_eq!(snapshot.window_columns, 100);

        let last = fake.requests().pop().unwrap();
        assert_eq!(last.fields, fields::SNAPSHOT_FIELDS);
        assert!(last.include_grid_data);
        assert_eq!(last.ranges, vec!["Big!A1:CV5000"]);
    }

    #[tokio::test]
    async fn test_snapshot_within_caps_not_truncated() {
        let fake = Arc::new(FakeSheets::new(document(&[(0, "Small", 100, 10)])));
        let snapshot = retrieval(&fake).get_full_snapshot("doc-1", None, None).await.unwrap();

        assert!(!snapshot.truncated);
        assert!(snapshot.truncation_reason.is_none());
        assert_eq!(snapshot.sheet_stats.len(), 1);
        assert_eq!(snapshot.sheet_stats[0].scanned_rows, 100);
    }

    #[tokio::test]
    async fn test_snapshot_counts_cells() {
        let mut doc = document(&[(0, "Sheet1", 5, 3)]);
        doc["sheets"][0]["data"] = json!([{"rowData": [
            {"values": [
                {"userEnteredValue": {"formulaValue": "=SUM(B1:C1)"}, "effectiveValue": {"numberValue": 5}},
                {"formattedValue": "2", "note": "checked"},
                {"formattedValue": "3", "hyperlink": "https://example.com",
                 "userEnteredFormat": {"textFormat": {"bold": true}}}
            ]}
        ]}]);
        let fake = Arc::new(FakeSheets::new(doc));
        let snapshot = retrieval(&fake).get_full_snapshot("doc-1", None, None).await.unwrap();

        let stats = &snapshot.sheet_stats[0];
        assert_eq!(stats.formula_count, 1);
        assert_eq!(stats.populated_cell_count, 3);
        assert_eq!(stats.note_count, 1);
        assert_eq!(stats.hyperlink_count, 1);
        assert_eq!(stats.format_diversity, 2);
    }

    #[tokio::test]
    async fn test_projection_threshold() {
        for (sheet_count, expected) in [(10, fields::STRUCTURE_FIELDS_FULL), (11, fields::STRUCTURE_FIELDS_REDUCED)] {
            let sheets: Vec<(i64, String)> = (0..sheet_count).map(|i| (i, format!("S{i}"))).collect();
            let layout: Vec<(i64, &str, u32, u32)> = sheets.iter().map(|(id, t)| (*id, t.as_str(), 10, 2)).collect();
            let fake = Arc::new(FakeSheets::new(document(&layout)));

            let structure = retrieval(&fake).get_structure("doc-1").await.unwrap();

            let requests = fake.requests();
            assert_eq!(requests[1].fields, expected);
            if sheet_count > 10 {
                assert_eq!(structure.projection, StructureProjection::Reduced);
                assert!(!requests[1].fields.contains("rowMetadata"));
                assert!(structure.hidden_row_count.is_none());
            } else {
                assert_eq!(structure.projection, StructureProjection::Full);
                assert_eq!(structure.hidden_row_count, Some(0));
            }
        }
    }

    #[tokio::test]
    async fn test_threshold_follows_options() {
        let fake = small_doc();
        let options = RetrievalOptions { large_workbook_sheets: 0, ..RetrievalOptions::default() };
        let structure = retrieval(&fake).with_options(options).get_structure("doc-1").await.unwrap();
        assert_eq!(structure.projection, StructureProjection::Reduced);
    }

    #[tokio::test]
    async fn test_unknown_sheet_is_not_found() {
        let fake = small_doc();
        let err = retrieval(&fake).get_sample("doc-1", Some(404), None).await.unwrap_err();

        assert!(matches!(err, RetrievalError::NotFound(_)));
        assert!(err.to_string().contains("404"));
        assert_eq!(fake.values_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_sheets_is_not_found() {
        let fake = Arc::new(FakeSheets::new(json!({"spreadsheetId": "doc-1"})));
        let err = retrieval(&fake).get_metadata("doc-1").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_remote_error_passes_through() {
        let fake = small_doc();
        fake.fail_with(SheetsError::RateLimited);
        let tiers = retrieval(&fake);

        let err = tiers.get_full_snapshot("doc-1", None, None).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Remote(SheetsError::RateLimited)));
        assert!(err.is_retryable());

        // Failures are not cached.
        tiers.get_metadata("doc-1").await.unwrap_err();
        assert_eq!(fake.spreadsheet_calls(), 2);
    }

    #[tokio::test]
    async fn test_remote_not_found_is_not_found() {
        let fake = small_doc();
        fake.fail_with(SheetsError::NotFound("doc-1".into()));
        let err = retrieval(&fake).get_structure("doc-1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_sample_cache_respects_requested_size() {
        let fake = small_doc();
        let tiers = retrieval(&fake);

        tiers.get_sample("doc-1", Some(0), Some(1)).await.unwrap();
        let again = tiers.get_sample("doc-1", Some(0), Some(1)).await.unwrap();
        assert_eq!(fake.values_calls(), 1);
        assert_eq!(again.sample_size, 1);

        let wider = tiers.get_sample("doc-1", Some(0), Some(10)).await.unwrap();
        assert_eq!(fake.values_calls(), 2);
        assert_eq!(wider.sample_size, 2);
    }

    #[tokio::test]
    async fn test_snapshot_cache_respects_row_cap() {
        let fake = small_doc();
        let tiers = retrieval(&fake);

        tiers.get_full_snapshot("doc-1", None, Some(2)).await.unwrap();
        let calls = fake.spreadsheet_calls();
        tiers.get_full_snapshot("doc-1", None, Some(2)).await.unwrap();
        assert_eq!(fake.spreadsheet_calls(), calls);

        let wider = tiers.get_full_snapshot("doc-1", None, Some(100)).await.unwrap();
        assert_eq!(fake.spreadsheet_calls(), calls + 1);
        assert!(!wider.truncated);
    }

    #[tokio::test]
    async fn test_empty_sheet_skips_range_fetches() {
        let fake = Arc::new(FakeSheets::new(document(&[(0, "Empty", 0, 0)])));
        let tiers = retrieval(&fake);

        let sample = tiers.get_sample("doc-1", None, None).await.unwrap();
        assert!(sample.headers.is_empty());
        assert_eq!(sample.total_rows, 0);

        let snapshot = tiers.get_full_snapshot("doc-1", None, None).await.unwrap();
        assert_eq!(snapshot.window_rows, 0);
        assert_eq!(fake.values_calls(), 0);
        // metadata + structure only
        assert_eq!(fake.spreadsheet_calls(), 2);
    }

    struct BrokenCache;

    #[async_trait]
    impl TierCache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, sheetscope_core::Error> {
            Err(sheetscope_core::Error::InvalidInput("cache offline".into()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), sheetscope_core::Error> {
            Err(sheetscope_core::Error::InvalidInput("cache offline".into()))
        }
    }

    #[tokio::test]
    async fn test_cache_failures_do_not_fail_tiers() {
        let fake = small_doc();
        let tiers = TieredRetrieval::new(fake.clone(), Arc::new(BrokenCache));

        tiers.get_metadata("doc-1").await.unwrap();
        tiers.get_metadata("doc-1").await.unwrap();
        assert_eq!(fake.spreadsheet_calls(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let fake = small_doc();
        let cache = Arc::new(sheetscope_core::MemoryCache::new());
        cache
            .set(&Tier::Metadata.cache_key("doc-1", None), "not json", Duration::from_secs(60))
            .await
            .unwrap();

        let metadata = TieredRetrieval::new(fake.clone(), cache).get_metadata("doc-1").await.unwrap();
        assert_eq!(metadata.spreadsheet_id, "doc-1");
        assert_eq!(fake.spreadsheet_calls(), 1);
    }

    #[test]
    fn test_options_from_config() {
        let config = AppConfig { max_sample_size: 50, large_workbook_sheets: 3, ..AppConfig::default() };
        let options = RetrievalOptions::from(&config);
        assert_eq!(options.max_sample_size, 50);
        assert_eq!(options.large_workbook_sheets, 3);
        assert_eq!(options.default_sample_size, 100);
        assert_eq!(RetrievalOptions::from(&AppConfig::default()), RetrievalOptions::default());
    }

    #[test]
    fn test_tier_request_builder() {
        let request = TierRequest::new(Tier::Snapshot).with_sheet(3).with_max_rows(10).with_sample_size(5);
        assert_eq!(request.sheet_id, Some(3));
        assert_eq!(request.max_rows, Some(10));
        assert_eq!(request.sample_size, Some(5));
    }
}
