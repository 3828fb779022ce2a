//! Simulation output types: balance/wealth histories, per-month cash-flow
//! detail records, and per-year tax computations. camelCase conversion
//! for the tax row happens at the `serde(rename_all)` boundary so Rust
//! code still reads snake_case.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::account::{Account, AccountKind};
use crate::model::ids::AccountId;
use crate::time::MonthKey;

/// A thin, wire-facing snapshot of an [`Account`]'s static configuration
/// (no runtime `balance`) — the `accounts` entry of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: f64,
    pub annual_growth_rate: f64,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        AccountSummary {
            id: account.id,
            name: account.name.clone(),
            kind: account.kind,
            initial_balance: account.initial_balance,
            annual_growth_rate: account.annual_growth_rate,
        }
    }
}

/// One `(date, value)` sample in a balance or wealth history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: String,
    pub value: f64,
}

impl BalancePoint {
    pub fn new(key: MonthKey, value: f64) -> Self {
        BalancePoint {
            date: crate::time::to_iso_date(key),
            value,
        }
    }
}

/// One income or expense line in a month's cash-flow record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowDetail {
    pub name: String,
    pub amount: f64,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<u16>,
}

/// One account's growth contribution in a month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthDetail {
    pub name: String,
    pub amount: f64,
}

/// One tax charge/credit applied during a month (mortgage-interest
/// deduction credits, December's scheduled annual charge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxDetail {
    pub name: String,
    pub amount: f64,
    pub account: String,
}

/// Per-month cash-flow breakdown. `net` excludes `growth` by design —
/// growth is a non-cash marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowRecord {
    pub date: String,
    pub income: f64,
    pub expenses: f64,
    pub growth: f64,
    pub taxes: f64,
    pub net: f64,
    pub income_details: Vec<CashFlowDetail>,
    pub expense_details: Vec<CashFlowDetail>,
    pub growth_details: Vec<GrowthDetail>,
    pub tax_details: Vec<TaxDetail>,
}

/// Per-year progressive tax computation, one row per calendar year the
/// tax engine has aggregated income/expense activity for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTax {
    pub year: i32,
    pub net: f64,
    pub wealth: f64,
    pub income_tax: f64,
    pub wealth_tax: f64,
    pub base_tax: f64,
    pub personal_tax: f64,
    pub tax_total: f64,
    pub federal_tax: f64,
    pub total_all: f64,
}

/// Full simulation output: the scenario configuration and its accounts
/// as run, per-account balance histories, aggregate wealth history,
/// per-month cash-flow records, and per-year tax rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: crate::model::scenario::Scenario,
    pub accounts: Vec<AccountSummary>,
    pub account_balances: FxHashMap<String, Vec<BalancePoint>>,
    pub total_wealth: Vec<BalancePoint>,
    pub cash_flows: Vec<CashFlowRecord>,
    pub taxes: Vec<YearlyTax>,
}
