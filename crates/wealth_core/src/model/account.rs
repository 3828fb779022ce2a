//! Accounts: balances that compound monthly and gate on an active window.

use serde::{Deserialize, Serialize};

use crate::model::ids::AccountId;
use crate::schedule::Schedule;
use crate::time::{MonthKey, Window};

/// What an account represents. No per-kind payload — this engine tracks a
/// single scalar balance per account rather than asset lots or
/// contribution limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Generic,
    BankAccount,
    RealEstate,
    Mortgage,
    Portfolio,
}

/// A single asset or liability. `balance` is the only runtime-mutable
/// field; everything else is immutable scenario configuration.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: f64,
    pub annual_growth_rate: f64,
    pub active_window: Window,
    pub growth_schedule: Schedule<f64>,
    /// Current balance. Reset to `initial_balance` at simulation start and
    /// on reactivation; mutated by `compound`/`apply` during the run.
    pub balance: f64,
    was_active_last_step: bool,
}

impl Account {
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        kind: AccountKind,
        initial_balance: f64,
        annual_growth_rate: f64,
    ) -> Self {
        Account {
            id,
            name: name.into(),
            kind,
            initial_balance,
            annual_growth_rate,
            active_window: Window::unbounded(),
            growth_schedule: Schedule::new(),
            balance: initial_balance,
            was_active_last_step: false,
        }
    }

    /// Reset runtime state to the start of a simulation. Must be called
    /// once before the first month is processed.
    pub fn reset(&mut self) {
        self.balance = self.initial_balance;
        self.was_active_last_step = false;
    }

    pub fn is_active(&self, key: MonthKey) -> bool {
        self.active_window.contains(key)
    }

    /// Monthly rate equivalent to `annual_growth_rate`, compounded once a
    /// month: `(1+r)^(1/12) - 1`.
    fn monthly_rate(annual: f64) -> f64 {
        (1.0 + annual).powf(1.0 / 12.0) - 1.0
    }

    /// Gate the account for `key`: zero its balance while inactive, and
    /// restore `initial_balance` the first month it (re)activates, before
    /// any compounding or transaction is applied for that month.
    ///
    /// Explicit and called once per month, in place of hidden
    /// `_current_year`/`_current_month` state set by a prior call.
    pub fn step(&mut self, key: MonthKey) {
        let active = self.is_active(key);
        if !active {
            self.balance = 0.0;
            self.was_active_last_step = false;
            return;
        }
        if !self.was_active_last_step {
            self.balance = self.initial_balance;
        }
        self.was_active_last_step = true;
    }

    /// Compound the current balance by one month, using the
    /// `growth_schedule` override for `key` if present, else the base
    /// rate. No-op while inactive. Returns the growth amount added (may
    /// be zero or negative).
    pub fn compound(&mut self, key: MonthKey) -> f64 {
        if !self.is_active(key) {
            return 0.0;
        }
        let annual = self.growth_schedule.resolve(key, self.annual_growth_rate);
        let monthly = Self::monthly_rate(annual);
        let growth = self.balance * monthly;
        self.balance += growth;
        growth
    }

    pub fn apply(&mut self, delta: f64) {
        self.balance += delta;
    }

    pub fn snapshot(&self) -> f64 {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(rate: f64) -> Account {
        let mut a = Account::new(AccountId(0), "Test", AccountKind::Portfolio, 1000.0, rate);
        a.reset();
        a
    }

    #[test]
    fn compounds_monthly_rate_from_annual() {
        let mut a = account(0.12);
        a.step(202401);
        let growth = a.compound(202401);
        let expected_rate = 1.12f64.powf(1.0 / 12.0) - 1.0;
        assert!((growth - 1000.0 * expected_rate).abs() < 1e-9);
    }

    #[test]
    fn inactive_outside_window_zeroes_balance() {
        let mut a = account(0.1);
        a.active_window = Window::closed(202401, 202406);
        a.step(202407);
        assert_eq!(a.balance, 0.0);
        assert!(!a.is_active(202407));
    }

    #[test]
    fn reactivation_restores_initial_balance() {
        let mut a = account(0.0);
        a.active_window = Window::new(Some(202403), None);
        a.step(202401);
        assert_eq!(a.balance, 0.0);
        a.step(202403);
        assert_eq!(a.balance, 1000.0);
    }

    #[test]
    fn growth_schedule_override_takes_precedence() {
        let mut a = account(0.03);
        a.growth_schedule.push(Window::closed(202407, 202412), 0.5);
        a.step(202401);
        let base_growth = a.compound(202401);
        a.step(202407);
        let overridden_growth = a.compound(202407);
        assert!(overridden_growth > base_growth);
    }
}
