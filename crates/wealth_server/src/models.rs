//! Wire DTOs for the scenario CRUD and run surface.
//!
//! `wealth_core`'s domain types (`Account`, `Transaction`, `Scenario`,
//! `TaxConfig`) deliberately carry no `serde` impls beyond the pieces
//! that round-trip through `SimulationResult` — the engine performs no
//! I/O at all. These DTOs are the server's own wire shapes;
//! `conversion.rs` resolves the name-based references they carry into
//! the engine's id-based handles.

use serde::{Deserialize, Serialize};
use wealth_core::model::account::AccountKind;
use wealth_core::model::tax::HouseholdStatus;

fn default_frequency() -> u32 {
    1
}

fn default_household_status() -> HouseholdStatus {
    HouseholdStatus::Single
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct WindowDto {
    #[serde(default)]
    pub start: Option<i32>,
    #[serde(default)]
    pub end: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleEntryDto {
    #[serde(default)]
    pub window: WindowDto,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: f64,
    pub annual_growth_rate: f64,
    #[serde(default)]
    pub active_window: WindowDto,
    #[serde(default)]
    pub growth_overrides: Vec<ScheduleEntryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransactionMetaDto {
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub taxable: bool,
    #[serde(default)]
    pub taxable_amount: Option<f64>,
    #[serde(default)]
    pub tax_effect: Option<f64>,
}

/// One transaction, named by the accounts it touches rather than by id.
/// Shape mirrors `wealth_core::model::transaction::Transaction` exactly —
/// no "transfer" convenience variant at the wire level, since a transfer
/// is just two linked `Regular` rows and the caller submits both
/// (matching how `ScenarioBuilder::transfer` expands at build time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransactionDto {
    OneTime {
        name: String,
        account: String,
        amount: f64,
        month_key: i32,
        #[serde(flatten)]
        meta: TransactionMetaDto,
    },
    Regular {
        name: String,
        account: String,
        base_amount: f64,
        window: WindowDto,
        #[serde(default = "default_frequency")]
        frequency_months: u32,
        #[serde(default)]
        indexation_rate: f64,
        #[serde(default)]
        inflation_overrides: Vec<ScheduleEntryDto>,
        #[serde(flatten)]
        meta: TransactionMetaDto,
    },
    MortgageInterest {
        name: String,
        mortgage_account: String,
        payer_account: String,
        annual_interest_rate: f64,
        window: WindowDto,
        #[serde(default = "default_frequency")]
        frequency_months: u32,
        #[serde(default)]
        rate_overrides: Vec<ScheduleEntryDto>,
        #[serde(flatten)]
        meta: TransactionMetaDto,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TariffRowDto {
    pub threshold: f64,
    pub base_amount: f64,
    pub per_100_amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BracketRowDto {
    pub cap: Option<f64>,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FederalTableDto {
    #[serde(default)]
    pub brackets: Vec<BracketRowDto>,
    #[serde(default)]
    pub child_deduction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaxConfigDto {
    #[serde(default)]
    pub income_tariff: Vec<TariffRowDto>,
    #[serde(default)]
    pub wealth_tariff: Vec<TariffRowDto>,
    #[serde(default)]
    pub federal_table: Option<FederalTableDto>,
    #[serde(default)]
    pub municipal_factor: f64,
    #[serde(default)]
    pub cantonal_factor: f64,
    #[serde(default)]
    pub church_factor: f64,
    #[serde(default)]
    pub personal_tax: f64,
    /// Name of the account December's tax charge is posted against.
    #[serde(default)]
    pub tax_account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioBody {
    pub name: String,
    pub window: WindowDto,
    #[serde(default)]
    pub inflation_rate: f64,
    #[serde(default)]
    pub income_tax_rate: f64,
    #[serde(default)]
    pub wealth_tax_rate: f64,
    #[serde(default = "default_household_status")]
    pub household_status: HouseholdStatus,
    #[serde(default)]
    pub child_count: u32,
    #[serde(default)]
    pub tax_config: Option<TaxConfigDto>,
    pub accounts: Vec<AccountDto>,
    #[serde(default)]
    pub transactions: Vec<TransactionDto>,
}

pub type CreateScenarioRequest = ScenarioBody;

/// PUT replaces every field rather than patching individual ones: a
/// scenario's accounts and transactions can't be updated piecemeal —
/// renaming an account changes what every transaction name resolves
/// against — so the whole body is required, same as create.
pub type UpdateScenarioRequest = ScenarioBody;

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub account_count: usize,
    pub transaction_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioDetail {
    pub id: String,
    pub name: String,
    pub window: WindowDto,
    pub inflation_rate: f64,
    pub income_tax_rate: f64,
    pub wealth_tax_rate: f64,
    pub household_status: HouseholdStatus,
    pub child_count: u32,
    pub tax_config: Option<TaxConfigDto>,
    pub accounts: Vec<AccountDto>,
    pub transactions: Vec<TransactionDto>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ShockDto {
    pub pct: f64,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub start_month: Option<u32>,
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub end_month: Option<u32>,
}

/// Optional stress-override body for `POST /scenarios/:id/run`. Absent or
/// all-empty is a no-op — the run simply uses the scenario's own rates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunScenarioRequest {
    #[serde(default)]
    pub portfolio_growth_shocks: Vec<ShockDto>,
    #[serde(default)]
    pub real_estate_shocks: Vec<ShockDto>,
    #[serde(default)]
    pub mortgage_rate_shocks: Vec<ShockDto>,
    #[serde(default)]
    pub inflation_shocks: Vec<ShockDto>,
    #[serde(default)]
    pub income_tax_shocks: Vec<ShockDto>,
}
