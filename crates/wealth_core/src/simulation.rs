//! The monthly state machine: reset, then for each month in the window
//! — activate, compound, apply non-interest transactions, apply interest
//! transactions, apply the scheduled annual tax charge, snapshot. Step
//! order within a month is load-bearing; see the per-step comments below
//! for why each one matters.

use rustc_hash::FxHashMap;

use crate::cancellation::CancellationToken;
use crate::error::SimulationError;
use crate::model::account::Account;
use crate::model::ids::AccountId;
use crate::model::results::{CashFlowDetail, CashFlowRecord, GrowthDetail, TaxDetail};
use crate::model::transaction::Transaction;
use crate::time::{MonthKey, Window};

/// Raw per-month output of a simulation pass, before the tax engine
/// converts it into yearly tax rows and the repository layer renders it
/// to the wire shape. Accounts are addressed by their position in the
/// `accounts` slice the loop was given — the arena-index pattern the
/// whole engine relies on to avoid lifetime entanglement between
/// `MortgageInterest`'s two account handles.
#[derive(Debug, Clone)]
pub struct MonthlySimulation {
    pub keys: Vec<MonthKey>,
    /// `account_balances[account_index][month_index]`.
    pub account_balances: Vec<Vec<f64>>,
    pub total_wealth: Vec<f64>,
    pub cash_flows: Vec<CashFlowRecord>,
}

/// Group each non-mortgage transaction under the index of the account it
/// posts to, preserving insertion order — the loop processes accounts in
/// order, and each account's transactions in the order they were defined.
fn group_by_account<'a>(
    accounts: &[Account],
    transactions: &'a [Transaction],
    index_of: &FxHashMap<AccountId, usize>,
) -> Vec<Vec<&'a Transaction>> {
    let mut groups: Vec<Vec<&Transaction>> = vec![Vec::new(); accounts.len()];
    for tx in transactions {
        if matches!(tx, Transaction::MortgageInterest(_)) {
            continue;
        }
        if let Some(&idx) = index_of.get(&tx.account()) {
            groups[idx].push(tx);
        }
    }
    groups
}

/// Tax credits/debits land on the configured `tax_target` if it's
/// active, else fall back to the first active account.
fn resolve_tax_target(
    configured: Option<AccountId>,
    active: &[bool],
    index_of: &FxHashMap<AccountId, usize>,
) -> Option<usize> {
    if let Some(id) = configured
        && let Some(&idx) = index_of.get(&id)
        && active[idx]
    {
        return Some(idx);
    }
    active.iter().position(|&a| a)
}

/// Run the monthly loop over `[window.start, window.end]`.
///
/// `tax_charges` maps calendar year to a (typically negative) amount
/// applied every December — the fixed-point tax convergence loop in
/// [`crate::convergence`] is what supplies a non-empty map on later
/// iterations. `mortgage_tax_rate` is the flat rate used for the
/// mortgage-interest tax-deduction credit.
pub fn simulate_months(
    accounts: &mut [Account],
    transactions: &[Transaction],
    window: Window,
    tax_charges: &FxHashMap<i32, f64>,
    tax_target: Option<AccountId>,
    mortgage_tax_rate: f64,
    cancellation: &CancellationToken,
) -> Result<MonthlySimulation, SimulationError> {
    let mut out = MonthlySimulation {
        keys: Vec::new(),
        account_balances: vec![Vec::new(); accounts.len()],
        total_wealth: Vec::new(),
        cash_flows: Vec::new(),
    };
    let (Some(start), Some(end)) = (window.start, window.end) else {
        return Ok(out);
    };

    for account in accounts.iter_mut() {
        account.reset();
    }

    let index_of: FxHashMap<AccountId, usize> = accounts
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id, i))
        .collect();
    let mortgage_txs: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| matches!(t, Transaction::MortgageInterest(_)))
        .collect();
    let standard_by_account = group_by_account(accounts, transactions, &index_of);

    let mut key = start;
    while key <= end {
        if cancellation.is_cancelled() {
            return Err(SimulationError::Cancelled);
        }

        // Step 1: activate. `Account::step` zeroes inactive balances and
        // restores `initial_balance` on reactivation, before anything
        // else touches balance this month.
        for account in accounts.iter_mut() {
            account.step(key);
        }
        let active: Vec<bool> = accounts.iter().map(|a| a.is_active(key)).collect();

        // Step 2: compounding, tracked separately from transaction flow.
        let mut monthly_growth = 0.0;
        let mut growth_details = Vec::new();
        for account in accounts.iter_mut() {
            let growth = account.compound(key);
            if growth != 0.0 {
                monthly_growth += growth;
                growth_details.push(GrowthDetail {
                    name: account.name.clone(),
                    amount: growth,
                });
            }
        }

        let mut monthly_income = 0.0;
        let mut monthly_expense = 0.0;
        let mut monthly_tax = 0.0;
        let mut income_details = Vec::new();
        let mut expense_details = Vec::new();
        let mut tax_details = Vec::new();

        // Step 3: standard (non-mortgage-interest) transactions, account
        // by account, in each account's own insertion order.
        for idx in 0..accounts.len() {
            if !active[idx] {
                continue;
            }
            for tx in &standard_by_account[idx] {
                if !tx.applicable(key, true, true) {
                    continue;
                }
                let eff = tx.effective_amount(key, 0.0);
                accounts[idx].apply(eff);

                let meta = tx.meta();
                if !meta.internal {
                    let detail = CashFlowDetail {
                        name: meta.name.clone(),
                        amount: eff,
                        account: accounts[idx].name.clone(),
                        tx_type: Some(tx_type_label(tx).to_string()),
                        transaction_id: Some(meta.id.0),
                    };
                    if eff >= 0.0 {
                        monthly_income += eff;
                        income_details.push(detail);
                    } else {
                        monthly_expense += eff;
                        expense_details.push(detail);
                    }
                }

                if let Some(tax_effect) = meta.tax_effect
                    && let Some(target_idx) = resolve_tax_target(tax_target, &active, &index_of)
                {
                    accounts[target_idx].apply(tax_effect);
                    monthly_tax += tax_effect;
                    tax_details.push(TaxDetail {
                        name: meta.name.clone(),
                        amount: tax_effect,
                        account: accounts[target_idx].name.clone(),
                    });
                }
            }
        }

        // Step 4: mortgage interest, strictly after standard transactions
        // so it reflects this month's principal moves.
        for tx in &mortgage_txs {
            let Transaction::MortgageInterest(m) = tx else {
                unreachable!()
            };
            let (Some(&mortgage_idx), Some(&payer_idx)) = (
                index_of.get(&m.mortgage_account),
                index_of.get(&m.payer_account),
            ) else {
                continue;
            };
            if !tx.applicable(key, active[mortgage_idx], active[payer_idx]) {
                continue;
            }
            let mortgage_balance = accounts[mortgage_idx].balance;
            let amount = tx.effective_amount(key, mortgage_balance);
            accounts[payer_idx].apply(amount);
            monthly_expense += amount;
            expense_details.push(CashFlowDetail {
                name: m.meta.name.clone(),
                amount,
                account: accounts[payer_idx].name.clone(),
                tx_type: Some("mortgage_interest".to_string()),
                transaction_id: Some(m.meta.id.0),
            });

            if m.meta.taxable
                && let Some(target_idx) = resolve_tax_target(tax_target, &active, &index_of)
            {
                let credit = amount.abs() * mortgage_tax_rate;
                accounts[target_idx].apply(credit);
                monthly_tax += credit;
                tax_details.push(TaxDetail {
                    name: format!("{} deduction", m.meta.name),
                    amount: credit,
                    account: accounts[target_idx].name.clone(),
                });
            }
        }

        // Step 5: scheduled annual tax charge, December only.
        let (year, month) = crate::time::split(key);
        if month == 12
            && let Some(&charge) = tax_charges.get(&year)
            && let Some(target_idx) = resolve_tax_target(tax_target, &active, &index_of)
        {
            accounts[target_idx].apply(charge);
            monthly_tax += charge;
            tax_details.push(TaxDetail {
                name: "Annual tax".to_string(),
                amount: charge,
                account: accounts[target_idx].name.clone(),
            });
        }

        // Step 6: snapshot.
        let mut total = 0.0;
        for (idx, account) in accounts.iter().enumerate() {
            out.account_balances[idx].push(account.snapshot());
            total += account.snapshot();
        }
        out.total_wealth.push(total);
        out.keys.push(key);
        out.cash_flows.push(CashFlowRecord {
            date: crate::time::to_iso_date(key),
            income: monthly_income,
            expenses: monthly_expense,
            growth: monthly_growth,
            taxes: monthly_tax,
            net: monthly_income + monthly_expense + monthly_tax,
            income_details,
            expense_details,
            growth_details,
            tax_details,
        });

        key = crate::time::next(key);
    }

    Ok(out)
}

fn tx_type_label(tx: &Transaction) -> &'static str {
    match tx {
        Transaction::OneTime(_) => "one_time",
        Transaction::Regular(_) => "regular",
        Transaction::MortgageInterest(_) => "mortgage_interest",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::AccountKind;
    use crate::model::ids::TransactionId;
    use crate::model::transaction::{MortgageInterest, OneTime, Regular, TransactionMeta};
    use crate::schedule::Schedule;
    use crate::time::Window;

    fn account(id: u16, name: &str, kind: AccountKind, balance: f64, rate: f64) -> Account {
        Account::new(AccountId(id), name, kind, balance, rate)
    }

    #[test]
    fn pure_compound_matches_scenario_a() {
        let mut accounts = vec![account(0, "Savings", AccountKind::Portfolio, 1000.0, 0.12)];
        let out = simulate_months(
            &mut accounts,
            &[],
            Window::closed(202401, 202412),
            &FxHashMap::default(),
            None,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out.keys.len(), 12);
        assert!((out.account_balances[0][11] - 1120.0).abs() < 0.01);
        for cf in &out.cash_flows {
            assert_eq!(cf.income, 0.0);
            assert_eq!(cf.expenses, 0.0);
            assert_eq!(cf.taxes, 0.0);
            assert!(cf.growth > 0.0);
            assert_eq!(cf.net, 0.0);
        }
    }

    #[test]
    fn regular_with_indexation_matches_scenario_b() {
        let mut accounts = vec![account(0, "Checking", AccountKind::BankAccount, 0.0, 0.0)];
        let txs = vec![Transaction::Regular(Regular {
            meta: TransactionMeta::new(TransactionId(0), "Salary"),
            account: AccountId(0),
            base_amount: 1000.0,
            window: Window::closed(202401, 202412),
            frequency_months: 1,
            indexation_rate: 0.12,
            inflation_schedule: Schedule::new(),
        })];
        let out = simulate_months(
            &mut accounts,
            &txs,
            Window::closed(202401, 202412),
            &FxHashMap::default(),
            None,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        // Sum of 12 monthly deposits of 1000, each indexed by
        // (1.12)^(1/12)-1 compounded per elapsed period: a geometric
        // series summing to 1000 * (r^12 - 1) / (r - 1) with r = 1.12^(1/12).
        assert!((out.account_balances[0][11] - 12_646.47).abs() < 0.5);
    }

    #[test]
    fn mortgage_interest_matches_scenario_c() {
        let mut accounts = vec![
            account(0, "Payer", AccountKind::BankAccount, 100_000.0, 0.0),
            account(1, "Mortgage", AccountKind::Mortgage, -500_000.0, 0.0),
        ];
        let txs = vec![Transaction::MortgageInterest(MortgageInterest {
            meta: TransactionMeta::new(TransactionId(0), "Interest"),
            mortgage_account: AccountId(1),
            payer_account: AccountId(0),
            annual_interest_rate: 0.03,
            rate_schedule: Schedule::new(),
            frequency_months: 1,
            window: Window::closed(202401, 202412),
        })];
        let out = simulate_months(
            &mut accounts,
            &txs,
            Window::closed(202401, 202412),
            &FxHashMap::default(),
            None,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!((out.account_balances[0][11] - 85_000.0).abs() < 0.01);
        assert!((out.account_balances[1][11] - (-500_000.0)).abs() < 0.01);
    }

    #[test]
    fn double_entry_pair_nets_to_zero_wealth_change() {
        let mut accounts = vec![
            account(0, "A", AccountKind::BankAccount, 10_000.0, 0.0),
            account(1, "B", AccountKind::BankAccount, 10_000.0, 0.0),
        ];
        let mut debit_meta = TransactionMeta::new(TransactionId(0), "Transfer out");
        debit_meta.internal = true;
        let mut credit_meta = TransactionMeta::new(TransactionId(1), "Transfer in");
        credit_meta.internal = true;
        let txs = vec![
            Transaction::Regular(Regular {
                meta: debit_meta,
                account: AccountId(0),
                base_amount: -500.0,
                window: Window::closed(202401, 202406),
                frequency_months: 1,
                indexation_rate: 0.0,
                inflation_schedule: Schedule::new(),
            }),
            Transaction::Regular(Regular {
                meta: credit_meta,
                account: AccountId(1),
                base_amount: 500.0,
                window: Window::closed(202401, 202406),
                frequency_months: 1,
                indexation_rate: 0.0,
                inflation_schedule: Schedule::new(),
            }),
        ];
        let out = simulate_months(
            &mut accounts,
            &txs,
            Window::closed(202401, 202406),
            &FxHashMap::default(),
            None,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!((out.account_balances[0][5] - 7_000.0).abs() < 1e-6);
        assert!((out.account_balances[1][5] - 13_000.0).abs() < 1e-6);
        for &w in &out.total_wealth {
            assert!((w - 20_000.0).abs() < 1e-6);
        }
        for cf in &out.cash_flows {
            assert!(cf.income_details.is_empty());
            assert!(cf.expense_details.is_empty());
        }
    }

    #[test]
    fn inactive_account_outside_window_reports_zero_balance() {
        let mut acc = account(0, "Late starter", AccountKind::BankAccount, 1000.0, 0.0);
        acc.active_window = Window::new(Some(202404), None);
        let mut accounts = vec![acc];
        let out = simulate_months(
            &mut accounts,
            &[],
            Window::closed(202401, 202406),
            &FxHashMap::default(),
            None,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out.account_balances[0][0], 0.0);
        assert_eq!(out.account_balances[0][1], 0.0);
        assert_eq!(out.account_balances[0][3], 1000.0);
    }

    #[test]
    fn cancellation_is_observed_at_month_boundary() {
        let mut accounts = vec![account(0, "A", AccountKind::BankAccount, 100.0, 0.0)];
        let token = CancellationToken::new();
        token.cancel();
        let result = simulate_months(
            &mut accounts,
            &[],
            Window::closed(202401, 202412),
            &FxHashMap::default(),
            None,
            0.0,
            &token,
        );
        assert!(matches!(result, Err(SimulationError::Cancelled)));
    }
}
