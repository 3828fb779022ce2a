//! Transactions: cash flows applied to accounts during the simulation.
//!
//! A tagged variant with shared metadata and per-variant payload, per the
//! design notes — the simulation loop dispatches on the tag, no virtual
//! dispatch needed.

use serde::{Deserialize, Serialize};

use crate::model::ids::{AccountId, TransactionId};
use crate::schedule::Schedule;
use crate::time::{MonthKey, Window};

/// Shared metadata every transaction variant carries.
#[derive(Debug, Clone)]
pub struct TransactionMeta {
    pub id: TransactionId,
    pub name: String,
    /// Bookkeeping side of a double-entry pair: excluded from
    /// income/expense cash-flow lines even though it still moves balance.
    pub internal: bool,
    pub taxable: bool,
    /// Overrides `|amount|` for tax aggregation when present.
    pub taxable_amount: Option<f64>,
    /// Pre-computed flat-rate tax credit/debit this transaction carries
    /// independent of the progressive tax engine — a one-off stamp-duty
    /// charge or subsidy credit, for example.
    pub tax_effect: Option<f64>,
}

impl TransactionMeta {
    pub fn new(id: TransactionId, name: impl Into<String>) -> Self {
        TransactionMeta {
            id,
            name: name.into(),
            internal: false,
            taxable: false,
            taxable_amount: None,
            tax_effect: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OneTime {
    pub meta: TransactionMeta,
    pub account: AccountId,
    pub amount: f64,
    pub month_key: MonthKey,
}

#[derive(Debug, Clone)]
pub struct Regular {
    pub meta: TransactionMeta,
    pub account: AccountId,
    pub base_amount: f64,
    pub window: Window,
    pub frequency_months: u32,
    pub indexation_rate: f64,
    pub inflation_schedule: Schedule<f64>,
}

#[derive(Debug, Clone)]
pub struct MortgageInterest {
    pub meta: TransactionMeta,
    pub mortgage_account: AccountId,
    pub payer_account: AccountId,
    pub annual_interest_rate: f64,
    pub rate_schedule: Schedule<f64>,
    pub frequency_months: u32,
    pub window: Window,
}

/// A single economic event affecting one account's balance.
#[derive(Debug, Clone)]
pub enum Transaction {
    OneTime(OneTime),
    Regular(Regular),
    MortgageInterest(MortgageInterest),
}

fn months_since_start(window_start: Option<MonthKey>, key: MonthKey) -> i64 {
    match window_start {
        Some(start) => crate::time::months_between(start, key),
        None => 0,
    }
}

/// A non-positive frequency is silently clamped to 1 rather than treated
/// as an error.
fn clamp_frequency(frequency: u32) -> i64 {
    frequency.max(1) as i64
}

/// Shared window+frequency occurrence test used by `Regular` and
/// `MortgageInterest`: in window, and on a multiple of `frequency` months
/// since the window opened.
fn occurs_on_schedule(window: Window, frequency_months: u32, key: MonthKey) -> bool {
    if !window.contains(key) {
        return false;
    }
    let elapsed = months_since_start(window.start, key);
    elapsed >= 0 && elapsed % clamp_frequency(frequency_months) == 0
}

impl Transaction {
    pub fn meta(&self) -> &TransactionMeta {
        match self {
            Transaction::OneTime(t) => &t.meta,
            Transaction::Regular(t) => &t.meta,
            Transaction::MortgageInterest(t) => &t.meta,
        }
    }

    /// `true` if this transaction fires for `key`. `mortgage_active` and
    /// `payer_active` are only consulted for the `MortgageInterest`
    /// variant (both must be active for interest to accrue).
    pub fn applicable(&self, key: MonthKey, mortgage_active: bool, payer_active: bool) -> bool {
        match self {
            Transaction::OneTime(t) => key == t.month_key,
            Transaction::Regular(t) => occurs_on_schedule(t.window, t.frequency_months, key),
            Transaction::MortgageInterest(t) => {
                mortgage_active
                    && payer_active
                    && occurs_on_schedule(t.window, t.frequency_months, key)
            }
        }
    }

    /// Effective amount to apply for `key`. Caller must have already
    /// confirmed `applicable(key, ..)`. `mortgage_balance` is only used by
    /// the `MortgageInterest` variant.
    pub fn effective_amount(&self, key: MonthKey, mortgage_balance: f64) -> f64 {
        match self {
            Transaction::OneTime(t) => t.amount,
            Transaction::Regular(t) => {
                let elapsed = months_since_start(t.window.start, key).max(0);
                let periods_elapsed = elapsed / clamp_frequency(t.frequency_months);
                let monthly_indexation = (1.0 + t.indexation_rate).powf(1.0 / 12.0) - 1.0;
                let indexed =
                    t.base_amount * (1.0 + monthly_indexation).powi(periods_elapsed as i32);
                match t.inflation_schedule.try_resolve(key) {
                    Some(pct) => indexed * (1.0 + pct),
                    None => indexed,
                }
            }
            Transaction::MortgageInterest(t) => {
                let rate = t.rate_schedule.resolve(key, t.annual_interest_rate);
                let frequency = clamp_frequency(t.frequency_months) as f64;
                -(mortgage_balance.abs() * rate * frequency / 12.0)
            }
        }
    }

    /// The account this transaction credits/debits directly — the payer
    /// account for `MortgageInterest`, since the mortgage account itself
    /// is only read, never written, by the interest transaction.
    pub fn account(&self) -> AccountId {
        match self {
            Transaction::OneTime(t) => t.account,
            Transaction::Regular(t) => t.account,
            Transaction::MortgageInterest(t) => t.payer_account,
        }
    }

    pub fn taxable_figure(&self, effective_amount: f64) -> f64 {
        self.meta()
            .taxable_amount
            .unwrap_or_else(|| effective_amount.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: u16, name: &str) -> TransactionMeta {
        TransactionMeta::new(TransactionId(id), name)
    }

    #[test]
    fn one_time_applicable_only_on_exact_month() {
        let tx = Transaction::OneTime(OneTime {
            meta: meta(0, "Bonus"),
            account: AccountId(0),
            amount: 500.0,
            month_key: 202406,
        });
        assert!(tx.applicable(202406, true, true));
        assert!(!tx.applicable(202405, true, true));
    }

    #[test]
    fn regular_fires_every_frequency_months_within_window() {
        let tx = Transaction::Regular(Regular {
            meta: meta(1, "Rent"),
            account: AccountId(0),
            base_amount: 1000.0,
            window: Window::closed(202401, 202412),
            frequency_months: 3,
            indexation_rate: 0.0,
            inflation_schedule: Schedule::new(),
        });
        assert!(tx.applicable(202401, true, true));
        assert!(!tx.applicable(202402, true, true));
        assert!(!tx.applicable(202403, true, true));
        assert!(tx.applicable(202404, true, true));
        assert!(!tx.applicable(203001, true, true));
    }

    #[test]
    fn regular_indexation_compounds_per_period_not_per_month() {
        let annual = 0.12;
        let tx = Transaction::Regular(Regular {
            meta: meta(2, "Salary"),
            account: AccountId(0),
            base_amount: 1000.0,
            window: Window::new(Some(202401), None),
            frequency_months: 1,
            indexation_rate: annual,
            inflation_schedule: Schedule::new(),
        });
        let monthly = (1.0 + annual).powf(1.0 / 12.0) - 1.0;
        let expected_month_12 = 1000.0 * (1.0 + monthly).powi(11);
        assert!((tx.effective_amount(202412, 0.0) - expected_month_12).abs() < 1e-6);
    }

    #[test]
    fn inflation_schedule_applies_once_not_compounded() {
        let mut inflation = Schedule::new();
        inflation.push(Window::closed(202407, 202412), 0.1);
        let tx = Transaction::Regular(Regular {
            meta: meta(3, "Groceries"),
            account: AccountId(0),
            base_amount: 100.0,
            window: Window::new(Some(202401), None),
            frequency_months: 1,
            indexation_rate: 0.0,
            inflation_schedule: inflation,
        });
        assert!((tx.effective_amount(202407, 0.0) - 110.0).abs() < 1e-9);
        assert!((tx.effective_amount(202412, 0.0) - 110.0).abs() < 1e-9);
        assert!((tx.effective_amount(202406, 0.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn mortgage_interest_requires_both_accounts_active() {
        let tx = Transaction::MortgageInterest(MortgageInterest {
            meta: meta(4, "Interest"),
            mortgage_account: AccountId(0),
            payer_account: AccountId(1),
            annual_interest_rate: 0.03,
            rate_schedule: Schedule::new(),
            frequency_months: 1,
            window: Window::closed(202401, 202412),
        });
        assert!(!tx.applicable(202401, false, true));
        assert!(!tx.applicable(202401, true, false));
        assert!(tx.applicable(202401, true, true));
    }

    #[test]
    fn mortgage_interest_amount_is_negative_and_uses_live_balance() {
        let tx = Transaction::MortgageInterest(MortgageInterest {
            meta: meta(5, "Interest"),
            mortgage_account: AccountId(0),
            payer_account: AccountId(1),
            annual_interest_rate: 0.03,
            rate_schedule: Schedule::new(),
            frequency_months: 1,
            window: Window::closed(202401, 202412),
        });
        let amount = tx.effective_amount(202401, -500_000.0);
        assert!((amount - (-1250.0)).abs() < 1e-6);
    }

    #[test]
    fn frequency_zero_is_clamped_to_one() {
        let tx = Transaction::Regular(Regular {
            meta: meta(6, "Weird"),
            account: AccountId(0),
            base_amount: 10.0,
            window: Window::new(Some(202401), None),
            frequency_months: 0,
            indexation_rate: 0.0,
            inflation_schedule: Schedule::new(),
        });
        assert!(tx.applicable(202401, true, true));
        assert!(tx.applicable(202402, true, true));
    }
}
