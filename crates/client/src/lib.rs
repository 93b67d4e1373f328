//! Client code for sheetscope.
//!
//! This crate provides the spreadsheet document API client, the column-letter
//! codec, and the five-tier cached retrieval engine built on top of them.

pub mod a1;
pub mod sheets;
pub mod tiered;

pub use sheets::{
    SheetsApi, SheetsAuth, SheetsClient, SheetsConfig, SheetsError, Spreadsheet, SpreadsheetRequest, ValueRange,
    ValueRenderOption,
};

pub use tiered::{
    RetrievalError, RetrievalOptions, SamplingMethod, SheetInfo, Tier, Tier1Metadata, Tier2Structure, Tier3Sample,
    Tier4Full, Tier5Snapshot, TierData, TierRequest, TieredRetrieval,
};
