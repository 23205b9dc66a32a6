use super::types::{
    DividendInputs, DividendSchedule, GrowthPoint, MonthRecord, ScheduleTotals, YearResult,
};

const MAX_YEARS: f64 = 50.0;
const MONTHS_PER_YEAR: u32 = 12;

fn as_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn round_clamped(value: f64, min: f64, max: f64, fallback: f64) -> u32 {
    let rounded = if value.is_finite() {
        value.round()
    } else {
        fallback
    };
    rounded.clamp(min, max) as u32
}

/// Projects the year-by-year dividend schedule for a monthly-minimum-balance
/// savings plan. Every input is sanitized rather than rejected, so the
/// projection always succeeds; malformed parameters degrade to a valid
/// (possibly empty) schedule.
pub fn calculate_schedule(inputs: &DividendInputs) -> DividendSchedule {
    let years_count = round_clamped(inputs.years, 0.0, MAX_YEARS, 0.0);
    let start_month = round_clamped(inputs.start_month, 1.0, 12.0, 1.0);
    let monthly_amount = as_non_negative(inputs.monthly_amount);
    let base_rate = as_non_negative(inputs.base_rate);
    let bonus_rate = as_non_negative(inputs.bonus_rate);
    let investment_limit = inputs.investment_limit.map(as_non_negative);
    let bonus_cap = inputs.bonus_cap.map(as_non_negative);

    let mut balance = as_non_negative(inputs.initial_amount);
    let mut total_contributed = 0.0;
    let mut total_dividend = 0.0;
    let mut total_bonus = 0.0;

    let mut years = Vec::with_capacity(years_count as usize);

    for year in 1..=years_count {
        let mut monthly_mmb = Vec::with_capacity(MONTHS_PER_YEAR as usize);
        let mut monthly_breakdown = Vec::with_capacity(MONTHS_PER_YEAR as usize);

        // The initial seed is attributed to year 1's contributed figure.
        let mut year_contribution = if year == 1 { balance } else { 0.0 };
        let overrides = inputs.custom_contributions.get(&year);

        for month in 1..=MONTHS_PER_YEAR {
            let planned = match overrides.and_then(|by_month| by_month.get(&month)) {
                Some(&amount) => as_non_negative(amount),
                None if year > 1 || month >= start_month => monthly_amount,
                None => 0.0,
            };

            // Contributions never push the balance past the investment limit;
            // dividends that already did are not clawed back.
            let contribution = match investment_limit {
                Some(limit) => planned.min((limit - balance).max(0.0)),
                None => planned,
            };

            if contribution > 0.0 {
                balance += contribution;
                year_contribution += contribution;
            }

            monthly_mmb.push(balance);
            monthly_breakdown.push(MonthRecord {
                month,
                contribution,
                end_balance: balance,
            });
        }

        let average_mmb = monthly_mmb.iter().sum::<f64>() / monthly_mmb.len() as f64;
        let dividend = average_mmb * base_rate / 100.0;

        // Bonus eligibility: cap the average first, then zero it outside the
        // eligible-year window.
        let mut bonus_eligible = match bonus_cap {
            Some(cap) => average_mmb.min(cap),
            None => average_mmb,
        };
        if inputs
            .bonus_eligible_years
            .is_some_and(|window| year > window)
        {
            bonus_eligible = 0.0;
        }
        let bonus = bonus_eligible * bonus_rate / 100.0;

        // Reinvested after the month loop, so it never feeds this year's own
        // average.
        balance += dividend + bonus;

        total_contributed += year_contribution;
        total_dividend += dividend;
        total_bonus += bonus;

        years.push(YearResult {
            year,
            contributed: year_contribution,
            average_mmb,
            dividend,
            bonus,
            total_units_end: balance,
            monthly_mmb,
            monthly_breakdown,
        });
    }

    DividendSchedule {
        years,
        totals: ScheduleTotals {
            contributed: total_contributed,
            dividend: total_dividend,
            bonus: total_bonus,
            final_units: balance,
        },
    }
}

/// Flattens a schedule into the month-indexed principal/total series used by
/// growth charts: principal is the running sum of applied contributions and
/// total is the balance on record at each month's end.
pub fn run_monthly_growth_trace(schedule: &DividendSchedule) -> Vec<GrowthPoint> {
    let mut points = Vec::with_capacity(schedule.years.len() * MONTHS_PER_YEAR as usize);
    let mut principal = 0.0;

    for year in &schedule.years {
        for record in &year.monthly_breakdown {
            principal += record.contribution;
            points.push(GrowthPoint {
                month_index: (year.year - 1) * MONTHS_PER_YEAR + record.month,
                principal,
                total: record.end_balance,
            });
        }
    }

    points
}
