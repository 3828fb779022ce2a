//! Converts the wire DTOs in [`crate::models`] into `wealth_core` domain
//! types, resolving each transaction's account name to the
//! [`wealth_core::AccountId`] handle the engine's arena-of-accounts model
//! needs. This is the server's half of the same name-to-id resolution
//! `wealth_core::config::ScenarioBuilder` does for the builder DSL — the
//! DTO shape carries its own account list already split out, so it
//! resolves names directly rather than going through the builder's
//! fluent API.

use std::collections::HashMap;

use wealth_core::model::account::Account;
use wealth_core::model::ids::{AccountId, TransactionId};
use wealth_core::model::scenario::Scenario;
use wealth_core::model::tax::{BracketRow, BracketTable, FederalTable, TariffRow, TariffTable, TaxConfig};
use wealth_core::model::transaction::{MortgageInterest, OneTime, Regular, Transaction, TransactionMeta};
use wealth_core::overrides::{Shock, StressOverrides};
use wealth_core::schedule::Schedule;
use wealth_core::time::Window;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    ScenarioBody, ScheduleEntryDto, ShockDto, TariffRowDto, TaxConfigDto, TransactionDto,
    TransactionMetaDto, WindowDto,
};

fn window_from_dto(dto: WindowDto) -> Window {
    Window::new(dto.start, dto.end)
}

fn schedule_from_dto(entries: &[ScheduleEntryDto]) -> Schedule<f64> {
    let mut schedule = Schedule::new();
    for entry in entries {
        schedule.push(window_from_dto(entry.window), entry.value);
    }
    schedule
}

fn tariff_from_dto(rows: &[TariffRowDto]) -> Option<TariffTable> {
    if rows.is_empty() {
        return None;
    }
    Some(TariffTable::new(
        rows.iter()
            .map(|r| TariffRow {
                threshold: r.threshold,
                base_amount: r.base_amount,
                per_100_amount: r.per_100_amount,
            })
            .collect(),
    ))
}

fn tax_config_from_dto(dto: &TaxConfigDto) -> TaxConfig {
    TaxConfig {
        income_tariff: tariff_from_dto(&dto.income_tariff),
        wealth_tariff: tariff_from_dto(&dto.wealth_tariff),
        federal_table: dto.federal_table.as_ref().map(|f| {
            FederalTable::new(
                BracketTable::new(
                    f.brackets
                        .iter()
                        .map(|b| BracketRow {
                            cap: b.cap,
                            rate: b.rate,
                        })
                        .collect(),
                ),
                f.child_deduction,
            )
        }),
        municipal_factor: dto.municipal_factor,
        cantonal_factor: dto.cantonal_factor,
        church_factor: dto.church_factor,
        personal_tax: dto.personal_tax,
        tax_account: None, // resolved below, once account ids are known
    }
}

fn meta_from_dto(id: TransactionId, name: String, dto: &TransactionMetaDto) -> TransactionMeta {
    TransactionMeta {
        id,
        name,
        internal: dto.internal,
        taxable: dto.taxable,
        taxable_amount: dto.taxable_amount,
        tax_effect: dto.tax_effect,
    }
}

/// Parse a stored [`ScenarioBody`] into the engine's runtime model:
/// `(Scenario, accounts, transactions)`. A transaction naming an account
/// absent from the body's account list is dropped — the same
/// unknown-reference-is-non-fatal rule `ScenarioBuilder::build` follows.
pub fn scenario_body_to_domain(
    id: &str,
    body: &ScenarioBody,
) -> (Scenario, Vec<Account>, Vec<Transaction>) {
    let mut scenario = Scenario::new(id, body.name.clone(), window_from_dto(body.window));
    scenario.inflation_rate = body.inflation_rate;
    scenario.income_tax_rate = body.income_tax_rate;
    scenario.wealth_tax_rate = body.wealth_tax_rate;
    scenario.household_status = body.household_status;
    scenario.child_count = body.child_count;

    let mut account_ids: HashMap<&str, AccountId> = HashMap::new();
    let mut accounts = Vec::with_capacity(body.accounts.len());
    for (i, dto) in body.accounts.iter().enumerate() {
        let account_id = AccountId(i as u16);
        account_ids.insert(dto.name.as_str(), account_id);
        let mut account = Account::new(
            account_id,
            dto.name.clone(),
            dto.kind,
            dto.initial_balance,
            dto.annual_growth_rate,
        );
        account.active_window = window_from_dto(dto.active_window);
        account.growth_schedule = schedule_from_dto(&dto.growth_overrides);
        accounts.push(account);
    }

    if let Some(tax_dto) = &body.tax_config {
        let mut tax_config = tax_config_from_dto(tax_dto);
        tax_config.tax_account = tax_dto
            .tax_account
            .as_deref()
            .and_then(|name| account_ids.get(name).copied());
        scenario.tax_config = Some(tax_config);
    }

    let mut transactions = Vec::with_capacity(body.transactions.len());
    for (i, dto) in body.transactions.iter().enumerate() {
        let tx_id = TransactionId(i as u16);
        let resolved = match dto {
            TransactionDto::OneTime {
                name,
                account,
                amount,
                month_key,
                meta,
            } => account_ids.get(account.as_str()).map(|&account_id| {
                Transaction::OneTime(OneTime {
                    meta: meta_from_dto(tx_id, name.clone(), meta),
                    account: account_id,
                    amount: *amount,
                    month_key: *month_key,
                })
            }),
            TransactionDto::Regular {
                name,
                account,
                base_amount,
                window,
                frequency_months,
                indexation_rate,
                inflation_overrides,
                meta,
            } => account_ids.get(account.as_str()).map(|&account_id| {
                Transaction::Regular(Regular {
                    meta: meta_from_dto(tx_id, name.clone(), meta),
                    account: account_id,
                    base_amount: *base_amount,
                    window: window_from_dto(*window),
                    frequency_months: *frequency_months,
                    indexation_rate: *indexation_rate,
                    inflation_schedule: schedule_from_dto(inflation_overrides),
                })
            }),
            TransactionDto::MortgageInterest {
                name,
                mortgage_account,
                payer_account,
                annual_interest_rate,
                window,
                frequency_months,
                rate_overrides,
                meta,
            } => {
                let mortgage_id = account_ids.get(mortgage_account.as_str()).copied();
                let payer_id = account_ids.get(payer_account.as_str()).copied();
                mortgage_id.zip(payer_id).map(|(mortgage_id, payer_id)| {
                    Transaction::MortgageInterest(MortgageInterest {
                        meta: meta_from_dto(tx_id, name.clone(), meta),
                        mortgage_account: mortgage_id,
                        payer_account: payer_id,
                        annual_interest_rate: *annual_interest_rate,
                        rate_schedule: schedule_from_dto(rate_overrides),
                        frequency_months: *frequency_months,
                        window: window_from_dto(*window),
                    })
                })
            }
        };
        if let Some(tx) = resolved {
            transactions.push(tx);
        }
    }

    (scenario, accounts, transactions)
}

fn shock_from_dto(dto: &ShockDto) -> Shock {
    Shock {
        pct: dto.pct,
        start_year: dto.start_year,
        start_month: dto.start_month,
        end_year: dto.end_year,
        end_month: dto.end_month,
    }
}

/// Build the engine's [`StressOverrides`] from a run request body. All
/// fields are optional lists — an absent/empty `RunScenarioRequest` is a
/// no-op.
pub fn run_request_to_overrides(req: &crate::models::RunScenarioRequest) -> StressOverrides {
    StressOverrides {
        portfolio_growth_shocks: req.portfolio_growth_shocks.iter().map(shock_from_dto).collect(),
        real_estate_shocks: req.real_estate_shocks.iter().map(shock_from_dto).collect(),
        mortgage_rate_shocks: req.mortgage_rate_shocks.iter().map(shock_from_dto).collect(),
        inflation_shocks: req.inflation_shocks.iter().map(shock_from_dto).collect(),
        income_tax_shocks: req.income_tax_shocks.iter().map(shock_from_dto).collect(),
        ..StressOverrides::default()
    }
}

/// Parse a JSON-encoded [`ScenarioBody`] row, turning a corrupt stored
/// document into a `500` rather than a panic.
pub fn parse_body(raw: &str) -> ApiResult<ScenarioBody> {
    serde_json::from_str(raw).map_err(ApiError::from)
}
