use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use wealth_core::repository::simulate;

use crate::conversion::{parse_body, run_request_to_overrides};
use crate::error::{ApiError, ApiResult};
use crate::models::*;
use crate::repository::SqliteRepository;
use crate::validation;

pub type DbConn = std::sync::Arc<std::sync::Mutex<rusqlite::Connection>>;

fn summary(id: &str, body: &ScenarioBody, created_at: String, updated_at: String) -> ScenarioSummary {
    ScenarioSummary {
        id: id.to_string(),
        name: body.name.clone(),
        account_count: body.accounts.len(),
        transaction_count: body.transactions.len(),
        created_at,
        updated_at,
    }
}

fn detail(id: &str, body: ScenarioBody, created_at: String, updated_at: String) -> ScenarioDetail {
    ScenarioDetail {
        id: id.to_string(),
        name: body.name,
        window: body.window,
        inflation_rate: body.inflation_rate,
        income_tax_rate: body.income_tax_rate,
        wealth_tax_rate: body.wealth_tax_rate,
        household_status: body.household_status,
        child_count: body.child_count,
        tax_config: body.tax_config,
        accounts: body.accounts,
        transactions: body.transactions,
        created_at,
        updated_at,
    }
}

fn validate_body(body: &ScenarioBody) -> ApiResult<()> {
    validation::validate_scenario_name(&body.name)?;
    validation::validate_scenario_has_accounts(body.accounts.len())?;
    validation::validate_window(body.window)?;
    Ok(())
}

pub async fn list_scenarios(State(db): State<DbConn>) -> ApiResult<Json<Vec<ScenarioSummary>>> {
    let conn = db.lock()?;
    let mut stmt = conn.prepare(
        "SELECT id, body, created_at, updated_at FROM scenarios ORDER BY updated_at DESC",
    )?;

    let scenarios = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let body_json: String = row.get(1)?;
            let created_at: String = row.get(2)?;
            let updated_at: String = row.get(3)?;
            Ok((id, body_json, created_at, updated_at))
        })?
        .filter_map(|r| r.ok())
        .filter_map(|(id, body_json, created_at, updated_at)| {
            parse_body(&body_json)
                .ok()
                .map(|body| summary(&id, &body, created_at, updated_at))
        })
        .collect();

    Ok(Json(scenarios))
}

pub async fn create_scenario(
    State(db): State<DbConn>,
    Json(req): Json<CreateScenarioRequest>,
) -> ApiResult<Json<ScenarioDetail>> {
    validate_body(&req)?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let body_json = serde_json::to_string(&req)?;

    let conn = db.lock()?;
    conn.execute(
        "INSERT INTO scenarios (id, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![id, body_json, now, now],
    )?;

    Ok(Json(detail(&id, req, now.clone(), now)))
}

pub async fn get_scenario(
    State(db): State<DbConn>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScenarioDetail>> {
    let conn = db.lock()?;
    let (body_json, created_at, updated_at): (String, String, String) = conn
        .query_row(
            "SELECT body, created_at, updated_at FROM scenarios WHERE id = ?1",
            [&id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => ApiError::ScenarioNotFound(id.clone()),
            _ => ApiError::from(e),
        })?;

    let body = parse_body(&body_json)?;
    Ok(Json(detail(&id, body, created_at, updated_at)))
}

pub async fn update_scenario(
    State(db): State<DbConn>,
    Path(id): Path<String>,
    Json(req): Json<UpdateScenarioRequest>,
) -> ApiResult<Json<ScenarioDetail>> {
    validate_body(&req)?;

    let conn = db.lock()?;
    let created_at: String = conn
        .query_row(
            "SELECT created_at FROM scenarios WHERE id = ?1",
            [&id],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => ApiError::ScenarioNotFound(id.clone()),
            _ => ApiError::from(e),
        })?;

    let now = chrono::Utc::now().to_rfc3339();
    let body_json = serde_json::to_string(&req)?;
    conn.execute(
        "UPDATE scenarios SET body = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![body_json, now, id],
    )?;

    Ok(Json(detail(&id, req, created_at, now)))
}

pub async fn delete_scenario(
    State(db): State<DbConn>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let conn = db.lock()?;
    let affected = conn.execute("DELETE FROM scenarios WHERE id = ?1", [&id])?;

    if affected == 0 {
        Err(ApiError::ScenarioNotFound(id))
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

/// `POST /api/scenarios/:id/run`. The body is the optional stress-shock
/// set; an empty/absent body is a no-op run against the scenario's own
/// rates. The blocking `rusqlite` load and the simulation itself both run
/// on `spawn_blocking` so a long-running tax-convergence loop doesn't
/// stall the executor.
pub async fn run_scenario(
    State(db): State<DbConn>,
    Path(id): Path<String>,
    body: axum::body::Bytes,
) -> ApiResult<Json<wealth_core::SimulationResult>> {
    let request: RunScenarioRequest = if body.is_empty() {
        RunScenarioRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    tokio::task::spawn_blocking(move || {
        let conn = db.lock()?;
        let repo = SqliteRepository::load(&conn, &id)?;
        let overrides = run_request_to_overrides(&request);
        simulate(&id, &repo, Some(&overrides))
            .map(Json)
            .map_err(|e| ApiError::from_simulation_error(e, &id))
    })
    .await
    .map_err(|_| ApiError::DatabaseError("simulation task panicked".to_string()))?
}
