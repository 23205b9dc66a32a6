mod engine;
mod types;

pub use engine::{calculate_schedule, run_monthly_growth_trace};
pub use types::{
    ContributionOverrides, DividendInputs, DividendSchedule, GrowthPoint, MonthRecord,
    ScheduleTotals, YearResult,
};
