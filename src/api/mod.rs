use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ContributionOverrides, DividendInputs, DividendSchedule, GrowthPoint, calculate_schedule,
    run_monthly_growth_trace,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    years: Option<f64>,
    base_rate: Option<f64>,
    bonus_rate: Option<f64>,
    start_month: Option<u32>,
    initial_amount: Option<f64>,
    monthly_amount: Option<f64>,
    investment_limit: Option<f64>,
    bonus_cap: Option<f64>,
    bonus_eligible_years: Option<u32>,
    custom_monthly_contributions: Option<ContributionOverrides>,
}

#[derive(Parser, Debug)]
#[command(
    name = "divplan",
    about = "Monthly-minimum-balance dividend projector (annual + bonus dividends, reinvested)"
)]
struct Cli {
    #[arg(long, default_value_t = 5.0, help = "Number of years to project (0-50)")]
    years: f64,
    #[arg(
        long,
        default_value_t = 5.5,
        help = "Annual dividend rate in percent, e.g. 5.5"
    )]
    base_rate: f64,
    #[arg(
        long,
        default_value_t = 0.25,
        help = "Annual bonus dividend rate in percent"
    )]
    bonus_rate: f64,
    #[arg(
        long,
        default_value_t = 1,
        help = "Calendar month (1-12) in which year-1 contributions begin"
    )]
    start_month: u32,
    #[arg(long, default_value_t = 0.0, help = "Opening balance before year 1")]
    initial_amount: f64,
    #[arg(long, default_value_t = 500.0, help = "Planned contribution per month")]
    monthly_amount: f64,
    #[arg(
        long,
        help = "Balance ceiling past which monthly contributions are truncated"
    )]
    investment_limit: Option<f64>,
    #[arg(
        long,
        help = "Cap on the average balance eligible for the bonus dividend"
    )]
    bonus_cap: Option<f64>,
    #[arg(
        long,
        help = "Bonus dividend only accrues for the first N projected years"
    )]
    bonus_eligible_years: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    schedule: DividendSchedule,
    growth_trace: Vec<GrowthPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<DividendInputs, String> {
    if !cli.years.is_finite() || !(0.0..=50.0).contains(&cli.years) {
        return Err("--years must be between 0 and 50".to_string());
    }

    if !cli.base_rate.is_finite() || !(0.0..=100.0).contains(&cli.base_rate) {
        return Err("--base-rate must be between 0 and 100".to_string());
    }

    if !cli.bonus_rate.is_finite() || !(0.0..=100.0).contains(&cli.bonus_rate) {
        return Err("--bonus-rate must be between 0 and 100".to_string());
    }

    if !(1..=12).contains(&cli.start_month) {
        return Err("--start-month must be between 1 and 12".to_string());
    }

    if !cli.initial_amount.is_finite() || cli.initial_amount < 0.0 {
        return Err("--initial-amount must be >= 0".to_string());
    }

    if !cli.monthly_amount.is_finite() || cli.monthly_amount < 0.0 {
        return Err("--monthly-amount must be >= 0".to_string());
    }

    if let Some(limit) = cli.investment_limit {
        if !limit.is_finite() || limit <= 0.0 {
            return Err("--investment-limit must be > 0".to_string());
        }
    }

    if let Some(cap) = cli.bonus_cap {
        if !cap.is_finite() || cap <= 0.0 {
            return Err("--bonus-cap must be > 0".to_string());
        }
    }

    Ok(DividendInputs {
        years: cli.years,
        base_rate: cli.base_rate,
        bonus_rate: cli.bonus_rate,
        start_month: f64::from(cli.start_month),
        initial_amount: cli.initial_amount,
        monthly_amount: cli.monthly_amount,
        investment_limit: cli.investment_limit,
        bonus_cap: cli.bonus_cap,
        bonus_eligible_years: cli.bonus_eligible_years,
        custom_contributions: ContributionOverrides::new(),
    })
}

fn validate_overrides(overrides: &ContributionOverrides) -> Result<(), String> {
    for (year, by_month) in overrides {
        if !(1..=50).contains(year) {
            return Err("customMonthlyContributions years must be between 1 and 50".to_string());
        }
        for (month, amount) in by_month {
            if !(1..=12).contains(month) {
                return Err(
                    "customMonthlyContributions months must be between 1 and 12".to_string()
                );
            }
            if !amount.is_finite() || *amount < 0.0 {
                return Err("customMonthlyContributions amounts must be >= 0".to_string());
            }
        }
    }
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("divplan HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

pub fn run_project_once<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let inputs = build_inputs(cli)?;
    let response = build_project_response(&inputs);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("failed to serialize projection: {e}"))?;
    println!("{json}");
    Ok(())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_project_response(&inputs))
}

fn build_project_response(inputs: &DividendInputs) -> ProjectResponse {
    let schedule = calculate_schedule(inputs);
    let growth_trace = run_monthly_growth_trace(&schedule);
    ProjectResponse {
        schedule,
        growth_trace,
    }
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<DividendInputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ProjectPayload) -> Result<DividendInputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.base_rate {
        cli.base_rate = v;
    }
    if let Some(v) = payload.bonus_rate {
        cli.bonus_rate = v;
    }
    if let Some(v) = payload.start_month {
        cli.start_month = v;
    }
    if let Some(v) = payload.initial_amount {
        cli.initial_amount = v;
    }
    if let Some(v) = payload.monthly_amount {
        cli.monthly_amount = v;
    }
    if let Some(v) = payload.investment_limit {
        cli.investment_limit = Some(v);
    }
    if let Some(v) = payload.bonus_cap {
        cli.bonus_cap = Some(v);
    }
    if let Some(v) = payload.bonus_eligible_years {
        cli.bonus_eligible_years = Some(v);
    }

    let mut inputs = build_inputs(cli)?;
    if let Some(overrides) = payload.custom_monthly_contributions {
        validate_overrides(&overrides)?;
        inputs.custom_contributions = overrides;
    }

    Ok(inputs)
}

fn default_cli_for_api() -> Cli {
    Cli {
        years: 5.0,
        base_rate: 5.5,
        bonus_rate: 0.25,
        start_month: 1,
        initial_amount: 0.0,
        monthly_amount: 500.0,
        investment_limit: None,
        bonus_cap: None,
        bonus_eligible_years: None,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
