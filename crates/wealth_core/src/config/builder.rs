//! [`ScenarioBuilder`]: fluent construction of a [`Scenario`] plus its
//! accounts and transactions, with automatic id assignment and
//! name-based lookups.
//!
//! # Example
//!
//! ```ignore
//! use wealth_core::config::ScenarioBuilder;
//! use wealth_core::model::account::AccountKind;
//!
//! let (scenario, accounts, transactions) = ScenarioBuilder::new("Household")
//!     .window(202401, 205012)
//!     .account("Savings", AccountKind::BankAccount, 0.0, 0.0)
//!     .account("Portfolio", AccountKind::Portfolio, 0.0, 0.07)
//!     .one_time("Portfolio", "Initial deposit", 1_300_000.0, 202405)
//!     .regular("Savings", "Salary", 17_814.0, 202401, 205001, 1, 0.02)
//!     .build();
//! ```

use std::collections::HashMap;

use crate::model::account::{Account, AccountKind};
use crate::model::ids::{AccountId, TransactionId};
use crate::model::scenario::Scenario;
use crate::model::tax::{HouseholdStatus, TaxConfig};
use crate::model::transaction::{MortgageInterest, OneTime, Regular, Transaction, TransactionMeta};
use crate::schedule::Schedule;
use crate::time::{MonthKey, Window};

#[derive(Debug, Clone)]
struct PendingAccount {
    name: String,
    kind: AccountKind,
    initial_balance: f64,
    annual_growth_rate: f64,
    active_window: Window,
    growth_schedule: Schedule<f64>,
}

#[derive(Debug, Clone)]
enum PendingTransaction {
    OneTime {
        account: String,
        name: String,
        amount: f64,
        month_key: MonthKey,
        taxable: bool,
        taxable_amount: Option<f64>,
        internal: bool,
    },
    Regular {
        account: String,
        name: String,
        base_amount: f64,
        window: Window,
        frequency_months: u32,
        indexation_rate: f64,
        inflation_schedule: Schedule<f64>,
        taxable: bool,
        taxable_amount: Option<f64>,
        internal: bool,
    },
    MortgageInterest {
        mortgage_account: String,
        payer_account: String,
        name: String,
        annual_interest_rate: f64,
        rate_schedule: Schedule<f64>,
        frequency_months: u32,
        window: Window,
        taxable: bool,
    },
}

/// Builder for a [`Scenario`] and its accounts/transactions. Accounts and
/// transactions are referenced by name until [`ScenarioBuilder::build`]
/// assigns stable [`AccountId`]/[`TransactionId`] handles; a transaction
/// naming an account that was never added is dropped at build time
/// rather than treated as fatal.
pub struct ScenarioBuilder {
    scenario: Scenario,
    pending_accounts: Vec<PendingAccount>,
    pending_transactions: Vec<PendingTransaction>,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        ScenarioBuilder {
            scenario: Scenario::new(name.clone(), name, Window::unbounded()),
            pending_accounts: Vec::new(),
            pending_transactions: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.scenario.id = id.into();
        self
    }

    pub fn window(mut self, start: MonthKey, end: MonthKey) -> Self {
        self.scenario.window = Window::closed(start, end);
        self
    }

    pub fn tax_config(mut self, tax_config: TaxConfig) -> Self {
        self.scenario.tax_config = Some(tax_config);
        self
    }

    pub fn inflation_rate(mut self, rate: f64) -> Self {
        self.scenario.inflation_rate = rate;
        self
    }

    pub fn income_tax_rate(mut self, rate: f64) -> Self {
        self.scenario.income_tax_rate = rate;
        self
    }

    pub fn wealth_tax_rate(mut self, rate: f64) -> Self {
        self.scenario.wealth_tax_rate = rate;
        self
    }

    pub fn household(mut self, status: HouseholdStatus, child_count: u32) -> Self {
        self.scenario.household_status = status;
        self.scenario.child_count = child_count;
        self
    }

    /// Add an account with an unbounded active window. Use
    /// [`ScenarioBuilder::active_window`]/[`ScenarioBuilder::growth_override`]
    /// to refine the account just added.
    pub fn account(
        mut self,
        name: impl Into<String>,
        kind: AccountKind,
        initial_balance: f64,
        annual_growth_rate: f64,
    ) -> Self {
        self.pending_accounts.push(PendingAccount {
            name: name.into(),
            kind,
            initial_balance,
            annual_growth_rate,
            active_window: Window::unbounded(),
            growth_schedule: Schedule::new(),
        });
        self
    }

    /// Narrow the active window of the most recently added account.
    pub fn active_window(mut self, start: MonthKey, end: MonthKey) -> Self {
        if let Some(account) = self.pending_accounts.last_mut() {
            account.active_window = Window::closed(start, end);
        }
        self
    }

    /// Attach a growth-schedule override to the most recently added
    /// account.
    pub fn growth_override(mut self, start: MonthKey, end: MonthKey, rate: f64) -> Self {
        if let Some(account) = self.pending_accounts.last_mut() {
            account
                .growth_schedule
                .push(Window::closed(start, end), rate);
        }
        self
    }

    /// A single fixed-amount flow, posted to `account` in `month_key`.
    pub fn one_time(
        mut self,
        account: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        month_key: MonthKey,
    ) -> Self {
        self.pending_transactions.push(PendingTransaction::OneTime {
            account: account.into(),
            name: name.into(),
            amount,
            month_key,
            taxable: false,
            taxable_amount: None,
            internal: false,
        });
        self
    }

    /// A periodic flow with annual indexation, posted to `account` every
    /// `frequency_months` within `[start, end]`.
    #[allow(clippy::too_many_arguments)]
    pub fn regular(
        mut self,
        account: impl Into<String>,
        name: impl Into<String>,
        base_amount: f64,
        start: MonthKey,
        end: MonthKey,
        frequency_months: u32,
        indexation_rate: f64,
    ) -> Self {
        self.pending_transactions.push(PendingTransaction::Regular {
            account: account.into(),
            name: name.into(),
            base_amount,
            window: Window::closed(start, end),
            frequency_months,
            indexation_rate,
            inflation_schedule: Schedule::new(),
            taxable: false,
            taxable_amount: None,
            internal: false,
        });
        self
    }

    /// Interest on `mortgage_account`'s live balance, debited from
    /// `payer_account` every `frequency_months`.
    #[allow(clippy::too_many_arguments)]
    pub fn mortgage_interest(
        mut self,
        mortgage_account: impl Into<String>,
        payer_account: impl Into<String>,
        name: impl Into<String>,
        annual_interest_rate: f64,
        start: MonthKey,
        end: MonthKey,
        frequency_months: u32,
    ) -> Self {
        self.pending_transactions
            .push(PendingTransaction::MortgageInterest {
                mortgage_account: mortgage_account.into(),
                payer_account: payer_account.into(),
                name: name.into(),
                annual_interest_rate,
                rate_schedule: Schedule::new(),
                frequency_months,
                window: Window::closed(start, end),
                taxable: false,
            });
        self
    }

    /// A linked double-entry pair: `amount` moves monthly from `from` to
    /// `to` over `[start, end]`. Both legs are marked internal so neither
    /// contributes to income/expense cash-flow lines, and they mirror
    /// window/frequency/magnitude by construction.
    pub fn transfer(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        start: MonthKey,
        end: MonthKey,
        frequency_months: u32,
    ) -> Self {
        let name = name.into();
        let window = Window::closed(start, end);
        self.pending_transactions.push(PendingTransaction::Regular {
            account: from.into(),
            name: format!("{name} (out)"),
            base_amount: -amount,
            window,
            frequency_months,
            indexation_rate: 0.0,
            inflation_schedule: Schedule::new(),
            taxable: false,
            taxable_amount: None,
            internal: true,
        });
        self.pending_transactions.push(PendingTransaction::Regular {
            account: to.into(),
            name: format!("{name} (in)"),
            base_amount: amount,
            window,
            frequency_months,
            indexation_rate: 0.0,
            inflation_schedule: Schedule::new(),
            taxable: false,
            taxable_amount: None,
            internal: true,
        });
        self
    }

    /// Mark the most recently added transaction taxable, optionally
    /// overriding the nominal amount used for tax aggregation.
    pub fn taxable(mut self, taxable_amount: Option<f64>) -> Self {
        if let Some(tx) = self.pending_transactions.last_mut() {
            match tx {
                PendingTransaction::OneTime {
                    taxable,
                    taxable_amount: slot,
                    ..
                }
                | PendingTransaction::Regular {
                    taxable,
                    taxable_amount: slot,
                    ..
                } => {
                    *taxable = true;
                    *slot = taxable_amount;
                }
                PendingTransaction::MortgageInterest { taxable, .. } => *taxable = true,
            }
        }
        self
    }

    /// Attach an inflation-schedule entry to the most recently added
    /// `Regular` transaction. A no-op on other transaction kinds.
    pub fn inflation_override(mut self, start: MonthKey, end: MonthKey, pct: f64) -> Self {
        if let Some(PendingTransaction::Regular {
            inflation_schedule, ..
        }) = self.pending_transactions.last_mut()
        {
            inflation_schedule.push(Window::closed(start, end), pct);
        }
        self
    }

    /// Attach a rate-schedule entry to the most recently added
    /// `MortgageInterest` transaction. A no-op on other transaction
    /// kinds.
    pub fn mortgage_rate_override(mut self, start: MonthKey, end: MonthKey, rate: f64) -> Self {
        if let Some(PendingTransaction::MortgageInterest { rate_schedule, .. }) =
            self.pending_transactions.last_mut()
        {
            rate_schedule.push(Window::closed(start, end), rate);
        }
        self
    }

    /// Resolve names to ids and produce the runtime-ready account and
    /// transaction lists.
    pub fn build(self) -> (Scenario, Vec<Account>, Vec<Transaction>) {
        let mut accounts = Vec::with_capacity(self.pending_accounts.len());
        let mut account_ids: HashMap<String, AccountId> = HashMap::new();
        for (i, pending) in self.pending_accounts.into_iter().enumerate() {
            let id = AccountId(i as u16);
            account_ids.insert(pending.name.clone(), id);
            let mut account = Account::new(
                id,
                pending.name,
                pending.kind,
                pending.initial_balance,
                pending.annual_growth_rate,
            );
            account.active_window = pending.active_window;
            account.growth_schedule = pending.growth_schedule;
            accounts.push(account);
        }

        let mut transactions = Vec::with_capacity(self.pending_transactions.len());
        for (i, pending) in self.pending_transactions.into_iter().enumerate() {
            let id = TransactionId(i as u16);
            let resolved = match pending {
                PendingTransaction::OneTime {
                    account,
                    name,
                    amount,
                    month_key,
                    taxable,
                    taxable_amount,
                    internal,
                } => account_ids.get(&account).map(|&account_id| {
                    let mut meta = TransactionMeta::new(id, name);
                    meta.taxable = taxable;
                    meta.taxable_amount = taxable_amount;
                    meta.internal = internal;
                    Transaction::OneTime(OneTime {
                        meta,
                        account: account_id,
                        amount,
                        month_key,
                    })
                }),
                PendingTransaction::Regular {
                    account,
                    name,
                    base_amount,
                    window,
                    frequency_months,
                    indexation_rate,
                    inflation_schedule,
                    taxable,
                    taxable_amount,
                    internal,
                } => account_ids.get(&account).map(|&account_id| {
                    let mut meta = TransactionMeta::new(id, name);
                    meta.taxable = taxable;
                    meta.taxable_amount = taxable_amount;
                    meta.internal = internal;
                    Transaction::Regular(Regular {
                        meta,
                        account: account_id,
                        base_amount,
                        window,
                        frequency_months,
                        indexation_rate,
                        inflation_schedule,
                    })
                }),
                PendingTransaction::MortgageInterest {
                    mortgage_account,
                    payer_account,
                    name,
                    annual_interest_rate,
                    rate_schedule,
                    frequency_months,
                    window,
                    taxable,
                } => {
                    let mortgage_id = account_ids.get(&mortgage_account).copied();
                    let payer_id = account_ids.get(&payer_account).copied();
                    mortgage_id.zip(payer_id).map(|(mortgage_id, payer_id)| {
                        let mut meta = TransactionMeta::new(id, name);
                        meta.taxable = taxable;
                        Transaction::MortgageInterest(MortgageInterest {
                            meta,
                            mortgage_account: mortgage_id,
                            payer_account: payer_id,
                            annual_interest_rate,
                            rate_schedule,
                            frequency_months,
                            window,
                        })
                    })
                }
            };
            if let Some(tx) = resolved {
                transactions.push(tx);
            }
        }

        (self.scenario, accounts, transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_accounts_and_transactions_with_resolved_ids() {
        let (scenario, accounts, transactions) = ScenarioBuilder::new("Household")
            .window(202401, 205012)
            .account("Savings", AccountKind::BankAccount, 0.0, 0.0)
            .account("Portfolio", AccountKind::Portfolio, 0.0, 0.07)
            .one_time("Portfolio", "Initial deposit", 1_300_000.0, 202405)
            .regular("Savings", "Salary", 17_814.0, 202401, 205001, 1, 0.02)
            .build();

        assert_eq!(scenario.window, Window::closed(202401, 205012));
        assert_eq!(accounts.len(), 2);
        assert_eq!(transactions.len(), 2);
        assert_eq!(accounts[1].name, "Portfolio");
        if let Transaction::OneTime(t) = &transactions[0] {
            assert_eq!(t.account, accounts[1].id);
        } else {
            unreachable!()
        }
    }

    #[test]
    fn transaction_referencing_unknown_account_is_dropped() {
        let (_, _, transactions) = ScenarioBuilder::new("Bad ref")
            .one_time("Nonexistent", "Oops", 100.0, 202401)
            .build();
        assert!(transactions.is_empty());
    }

    #[test]
    fn transfer_produces_an_internal_linked_pair() {
        let (_, _, transactions) = ScenarioBuilder::new("Transfers")
            .account("A", AccountKind::BankAccount, 10_000.0, 0.0)
            .account("B", AccountKind::BankAccount, 10_000.0, 0.0)
            .transfer("A", "B", "Savings sweep", 500.0, 202401, 202406, 1)
            .build();
        assert_eq!(transactions.len(), 2);
        for tx in &transactions {
            assert!(tx.meta().internal);
        }
    }

    #[test]
    fn taxable_modifier_applies_to_last_transaction() {
        let (_, _, transactions) = ScenarioBuilder::new("Taxes")
            .account("Checking", AccountKind::BankAccount, 0.0, 0.0)
            .regular("Checking", "Salary", 5_000.0, 202401, 202412, 1, 0.0)
            .taxable(Some(4_500.0))
            .build();
        assert!(transactions[0].meta().taxable);
        assert_eq!(transactions[0].meta().taxable_amount, Some(4_500.0));
    }

    #[test]
    fn mortgage_interest_resolves_both_account_handles() {
        let (_, accounts, transactions) = ScenarioBuilder::new("Mortgage")
            .account("Checking", AccountKind::BankAccount, 100_000.0, 0.0)
            .account("Home loan", AccountKind::Mortgage, -500_000.0, 0.0)
            .mortgage_interest("Home loan", "Checking", "Interest", 0.03, 202401, 202412, 1)
            .mortgage_rate_override(202407, 202412, 0.05)
            .build();
        let Transaction::MortgageInterest(m) = &transactions[0] else {
            unreachable!()
        };
        assert_eq!(m.mortgage_account, accounts[1].id);
        assert_eq!(m.payer_account, accounts[0].id);
        assert_eq!(m.rate_schedule.resolve(202407, 0.0), 0.05);
    }
}
