//! Fixed-point tax convergence: each round re-simulates with
//! the prior round's yearly tax injected as a December charge, recomputes
//! tax from the resulting trajectory, and stops once every year's total
//! tax has settled within tolerance or the iteration cap is hit.

use rustc_hash::FxHashMap;

use crate::cancellation::CancellationToken;
use crate::error::SimulationError;
use crate::model::account::Account;
use crate::model::results::{AccountSummary, BalancePoint, SimulationResult, YearlyTax};
use crate::model::scenario::Scenario;
use crate::model::transaction::Transaction;
use crate::simulation::{self, MonthlySimulation};
use crate::taxes;

const MAX_ITERS: u32 = 10;
const TOLERANCE: f64 = 0.01;

fn same_years(a: &[YearlyTax], b: &[YearlyTax]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.year == y.year)
}

fn converged(new_rows: &[YearlyTax], prev_rows: &[YearlyTax]) -> bool {
    same_years(new_rows, prev_rows)
        && new_rows
            .iter()
            .zip(prev_rows)
            .all(|(new, prev)| (new.total_all - prev.total_all).abs() < TOLERANCE)
}

fn to_charges(rows: &[YearlyTax]) -> FxHashMap<i32, f64> {
    rows.iter().map(|r| (r.year, -r.total_all.abs())).collect()
}

fn account_balances(
    accounts: &[Account],
    run: &MonthlySimulation,
) -> rustc_hash::FxHashMap<String, Vec<BalancePoint>> {
    accounts
        .iter()
        .zip(&run.account_balances)
        .map(|(account, values)| {
            let points = run
                .keys
                .iter()
                .zip(values)
                .map(|(&key, &value)| BalancePoint::new(key, value))
                .collect();
            (account.name.clone(), points)
        })
        .collect()
}

fn total_wealth(run: &MonthlySimulation) -> Vec<BalancePoint> {
    run.keys
        .iter()
        .zip(&run.total_wealth)
        .map(|(&key, &value)| BalancePoint::new(key, value))
        .collect()
}

/// Run the fixed-point loop to convergence (or the iteration cap) and
/// assemble the final [`SimulationResult`]. `accounts`/`transactions` are
/// the already-override-applied runtime model; `transactions_for_tax` is
/// the un-overridden original set the tax engine aggregates against.
#[allow(clippy::too_many_arguments)]
pub fn run_to_convergence(
    scenario_id: &str,
    accounts: &mut [Account],
    transactions: &[Transaction],
    transactions_for_tax: &[Transaction],
    scenario: &Scenario,
    mortgage_tax_rate: f64,
    cancellation: &CancellationToken,
) -> Result<SimulationResult, SimulationError> {
    let mut tax_rows: Vec<YearlyTax> = Vec::new();
    let mut tax_charges: FxHashMap<i32, f64> = FxHashMap::default();
    let mut last_run: Option<MonthlySimulation> = None;

    for _ in 0..MAX_ITERS {
        if cancellation.is_cancelled() {
            return Err(SimulationError::Cancelled);
        }

        let run = simulation::simulate_months(
            accounts,
            transactions,
            scenario.window,
            &tax_charges,
            scenario.tax_config.as_ref().and_then(|c| c.tax_account),
            mortgage_tax_rate,
            cancellation,
        )?;

        let wealth = total_wealth(&run);
        let new_rows = taxes::compute_yearly_taxes(
            transactions_for_tax,
            &run.cash_flows,
            &wealth,
            scenario,
        );

        let done = converged(&new_rows, &tax_rows);
        tax_rows = new_rows;
        tax_charges = to_charges(&tax_rows);
        last_run = Some(run);
        if done {
            break;
        }
    }

    let run = last_run.expect("MAX_ITERS is non-zero");
    let mut scenario = scenario.clone();
    scenario.id = scenario_id.to_string();
    Ok(SimulationResult {
        accounts: accounts.iter().map(AccountSummary::from).collect(),
        scenario,
        account_balances: account_balances(accounts, &run),
        total_wealth: total_wealth(&run),
        cash_flows: run.cash_flows.clone(),
        taxes: tax_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::AccountKind;
    use crate::model::ids::{AccountId, TransactionId};
    use crate::model::tax::{BracketRow, BracketTable, FederalTable, TariffRow, TariffTable, TaxConfig};
    use crate::model::transaction::{Regular, TransactionMeta};
    use crate::schedule::Schedule;
    use crate::time::Window;

    fn flat_tax_scenario() -> Scenario {
        let mut scenario = Scenario::new("s1", "Test", Window::closed(202401, 202512));
        scenario.tax_config = Some(TaxConfig {
            income_tariff: Some(TariffTable::new(vec![TariffRow {
                threshold: 0.0,
                base_amount: 0.0,
                per_100_amount: 10.0,
            }])),
            wealth_tariff: None,
            federal_table: Some(FederalTable::new(
                BracketTable::new(vec![BracketRow {
                    cap: None,
                    rate: 0.0,
                }]),
                0.0,
            )),
            municipal_factor: 1.0,
            cantonal_factor: 0.0,
            church_factor: 0.0,
            personal_tax: 0.0,
            tax_account: Some(AccountId(0)),
        });
        scenario
    }

    #[test]
    fn converges_within_iteration_cap() {
        let scenario = flat_tax_scenario();
        let mut accounts = vec![Account::new(
            AccountId(0),
            "Checking",
            AccountKind::BankAccount,
            0.0,
            0.0,
        )];
        let mut salary_meta = TransactionMeta::new(TransactionId(0), "Salary");
        salary_meta.taxable = true;
        let txs = vec![Transaction::Regular(Regular {
            meta: salary_meta,
            account: AccountId(0),
            base_amount: 5_000.0,
            window: scenario.window,
            frequency_months: 1,
            indexation_rate: 0.0,
            inflation_schedule: Schedule::new(),
        })];
        let result = run_to_convergence(
            &scenario.id,
            &mut accounts,
            &txs,
            &txs,
            &scenario,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(result.taxes.len(), 2);
        assert!(result.taxes.iter().all(|row| row.total_all > 0.0));
    }

    #[test]
    fn zero_tax_scenario_converges_on_first_pass() {
        let mut scenario = Scenario::new("s2", "No tax", Window::closed(202401, 202412));
        scenario.tax_config = None;
        let mut accounts = vec![Account::new(
            AccountId(0),
            "Savings",
            AccountKind::Portfolio,
            1_000.0,
            0.05,
        )];
        let result = run_to_convergence(
            &scenario.id,
            &mut accounts,
            &[],
            &[],
            &scenario,
            0.0,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(result.taxes.iter().all(|row| row.total_all == 0.0));
    }
}
