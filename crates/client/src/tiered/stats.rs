//! Cell-level statistics and rule descriptions.

use std::collections::HashSet;

use super::types::{ConditionalFormatSummary, ValidationRuleSummary};
use crate::a1;
use crate::sheets::response::{
    BooleanCondition, CellData, CellFormat, Color, ConditionalFormatRule, GradientRule, InterpolationPoint,
};

/// Validation summaries kept per sheet.
pub const MAX_VALIDATION_SUMMARIES: usize = 50;

/// Conditional-format descriptions kept per sheet.
pub const MAX_CONDITIONAL_FORMATS_PER_SHEET: usize = 20;

/// Visual formatting of a cell reduced to what distinguishes it.
///
/// Colors are quantized to 8-bit channels so equal colors compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FormatSignature {
    pub number_format: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub background: Option<[u8; 4]>,
}

impl FormatSignature {
    pub fn of(format: Option<&CellFormat>) -> Self {
        let Some(format) = format else {
            return Self::default();
        };
        let text = format.text_format.as_ref();
        Self {
            number_format: format.number_format.as_ref().and_then(|n| n.format_type.clone()),
            bold: text.and_then(|t| t.bold).unwrap_or(false),
            italic: text.and_then(|t| t.italic).unwrap_or(false),
            background: format.background_color.as_ref().map(quantize),
        }
    }
}

fn quantize(color: &Color) -> [u8; 4] {
    let channel = |v: Option<f32>, missing: f32| (v.unwrap_or(missing).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color.red, 0.0), channel(color.green, 0.0), channel(color.blue, 0.0), channel(color.alpha, 1.0)]
}

/// Counts accumulated over the cells of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStats {
    pub formula_count: usize,
    pub populated_cell_count: usize,
    pub hyperlink_count: usize,
    pub note_count: usize,
    pub validation_rule_count: usize,
    pub validation_rules: Vec<ValidationRuleSummary>,
    pub format_diversity: usize,
}

/// Single-pass accumulator; feed every cell once through [`observe`](Self::observe).
#[derive(Debug, Default)]
pub struct CellStatsAccumulator {
    stats: CellStats,
    signatures: HashSet<FormatSignature>,
}

impl CellStatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cell at absolute 0-based (`row`, `column`).
    pub fn observe(&mut self, row: u32, column: u32, cell: &CellData) {
        let stats = &mut self.stats;
        if cell.has_formula() {
            stats.formula_count += 1;
        }
        if cell.hyperlink.as_deref().is_some_and(|h| !h.is_empty()) {
            stats.hyperlink_count += 1;
        }
        if cell.note.as_deref().is_some_and(|n| !n.is_empty()) {
            stats.note_count += 1;
        }
        if let Some(rule) = &cell.data_validation {
            stats.validation_rule_count += 1;
            if stats.validation_rules.len() < MAX_VALIDATION_SUMMARIES {
                let (condition_type, values) = condition_parts(rule.condition.as_ref());
                stats.validation_rules.push(ValidationRuleSummary {
                    cell: a1::cell_ref(row, column),
                    condition_type,
                    values,
                    strict: rule.strict,
                    input_message: rule.input_message.clone(),
                });
            }
        }
        if cell.is_populated() {
            stats.populated_cell_count += 1;
            self.signatures
                .insert(FormatSignature::of(cell.user_entered_format.as_ref()));
        }
    }

    pub fn finish(mut self) -> CellStats {
        self.stats.format_diversity = self.signatures.len();
        self.stats
    }
}

fn condition_parts(condition: Option<&BooleanCondition>) -> (String, Vec<String>) {
    match condition {
        Some(c) => (
            c.condition_type.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            c.values.iter().filter_map(|v| v.display()).map(str::to_string).collect(),
        ),
        None => ("UNKNOWN".to_string(), Vec::new()),
    }
}

/// Describe up to `limit` conditional-format rules of one sheet.
pub fn describe_conditional_formats(
    rules: &[ConditionalFormatRule], sheet_title: &str, sheet_rows: u32, sheet_columns: u32, limit: usize,
) -> Vec<ConditionalFormatSummary> {
    rules
        .iter()
        .take(limit)
        .map(|rule| {
            let ranges = rule
                .ranges
                .iter()
                .map(|r| a1::grid_range_to_a1(r, sheet_rows, sheet_columns))
                .collect();
            let (rule_type, description) = match (&rule.boolean_rule, &rule.gradient_rule) {
                (Some(boolean), _) => {
                    let (condition_type, values) = condition_parts(boolean.condition.as_ref());
                    let description = describe_condition(&condition_type, &values);
                    (condition_type, description)
                }
                (None, Some(gradient)) => ("GRADIENT".to_string(), describe_gradient(gradient)),
                (None, None) => ("UNKNOWN".to_string(), "Unrecognized rule".to_string()),
            };
            ConditionalFormatSummary { sheet: sheet_title.to_string(), ranges, rule_type, description }
        })
        .collect()
}

/// `NUMBER_GREATER` + `["10"]` → `Number greater: 10`.
fn describe_condition(condition_type: &str, values: &[String]) -> String {
    let mut words = condition_type.to_lowercase().replace('_', " ");
    if let Some(first) = words.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    if values.is_empty() { words } else { format!("{}: {}", words, values.join(", ")) }
}

fn describe_gradient(gradient: &GradientRule) -> String {
    let point = |p: Option<&InterpolationPoint>| {
        p.map(|p| match (&p.point_type, &p.value) {
            (Some(t), Some(v)) => format!("{t} {v}"),
            (Some(t), None) => t.clone(),
            (None, Some(v)) => v.clone(),
            (None, None) => "?".to_string(),
        })
    };
    let stops: Vec<String> = [
        point(gradient.minpoint.as_ref()),
        point(gradient.midpoint.as_ref()),
        point(gradient.maxpoint.as_ref()),
    ]
    .into_iter()
    .flatten()
    .collect();
    if stops.is_empty() { "Color scale".to_string() } else { format!("Color scale: {}", stops.join(" → ")) }
}
