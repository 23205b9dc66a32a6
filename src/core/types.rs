use std::collections::BTreeMap;

use serde::Serialize;

/// Per-month contribution overrides, keyed by year (1-based) then by
/// calendar month (1-12). Values are sanitized to non-negative amounts
/// when the schedule is calculated.
pub type ContributionOverrides = BTreeMap<u32, BTreeMap<u32, f64>>;

#[derive(Debug, Clone, Default)]
pub struct DividendInputs {
    pub years: f64,
    pub base_rate: f64,
    pub bonus_rate: f64,
    pub start_month: f64,
    pub initial_amount: f64,
    pub monthly_amount: f64,
    pub investment_limit: Option<f64>,
    pub bonus_cap: Option<f64>,
    pub bonus_eligible_years: Option<u32>,
    pub custom_contributions: ContributionOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    pub month: u32,
    pub contribution: f64,
    pub end_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: u32,
    pub contributed: f64,
    #[serde(rename = "averageMMB")]
    pub average_mmb: f64,
    pub dividend: f64,
    pub bonus: f64,
    pub total_units_end: f64,
    #[serde(rename = "monthlyMMB")]
    pub monthly_mmb: Vec<f64>,
    pub monthly_breakdown: Vec<MonthRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTotals {
    pub contributed: f64,
    pub dividend: f64,
    pub bonus: f64,
    pub final_units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendSchedule {
    pub years: Vec<YearResult>,
    pub totals: ScheduleTotals,
}

/// One point of the flat month-indexed growth series derived from a
/// schedule: cumulative principal paid in versus the balance on record at
/// that month's end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub month_index: u32,
    pub principal: f64,
    pub total: f64,
}
